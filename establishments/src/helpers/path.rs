use axum::async_trait;
use axum::extract::{FromRequest, RequestParts};
use serde::de::DeserializeOwned;

use crate::error;

/// `axum::extract::Path` with the rejection rendered as our JSON error body.
#[derive(Debug)]
pub struct Path<T>(pub T);

#[async_trait]
impl<T, B> FromRequest<B> for Path<T>
where
	T: DeserializeOwned + Send,
	B: Send,
{
	type Rejection = error::Rejected;

	async fn from_request(req: &mut RequestParts<B>) -> Result<Self, Self::Rejection> {
		axum::extract::Path::<T>::from_request(req)
			.await
			.map(|axum::extract::Path(value)| Self(value))
			.map_err(|rejection| {
				tracing::warn!(%rejection, "rejected path");
				super::rejected(rejection)
			})
	}
}
