use axum::async_trait;
use axum::extract::{FromRequest, RequestParts};
use axum::BoxError;
use serde::de::DeserializeOwned;

use crate::error;

/// Like `axum::Json`, but a body that fails to parse is answered with our JSON error body instead of axum's plain-text rejection.
#[derive(Debug)]
pub struct Json<T>(pub T);

#[async_trait]
impl<T, B> FromRequest<B> for Json<T>
where
	T: DeserializeOwned,
	B: http_body::Body + Send,
	B::Data: Send,
	B::Error: Into<BoxError>,
{
	type Rejection = error::Rejected;

	async fn from_request(req: &mut RequestParts<B>) -> Result<Self, Self::Rejection> {
		axum::Json::<T>::from_request(req)
			.await
			.map(|axum::Json(value)| Self(value))
			.map_err(|rejection| {
				tracing::warn!(%rejection, "rejected request body");
				super::rejected(rejection)
			})
	}
}
