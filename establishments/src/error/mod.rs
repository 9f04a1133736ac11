use std::borrow::Cow;

use axum::response::{IntoResponse, Response};
use http::StatusCode;

use crate::database::{self, models};
use crate::validation::ValidationErrors;

mod body;
pub use body::{default_handler, error_response, Body};

#[derive(Debug, thiserror::Error)]
#[error("storage error while {0}: {1}")]
pub struct Storage(pub &'static str, #[source] pub database::Error);

#[derive(Debug, Clone, Copy, thiserror::Error)]
#[error("{0} not found")]
pub struct EntityNotFound(pub &'static str);

#[derive(Debug, Clone, Copy, thiserror::Error)]
#[error("category with ID {0} does not exist")]
pub struct MissingCategory(pub models::CategoryId);

#[derive(Debug, thiserror::Error)]
#[error("tags with IDs [{}] do not exist", join_ids(.0))]
pub struct MissingTags(pub Vec<models::TagId>);

#[derive(Debug, Clone, Copy, thiserror::Error)]
#[error("ID in URL ({path}) does not match ID in request body ({body})")]
pub struct IdMismatch {
	pub path: i32,
	pub body: i32,
}

#[derive(Debug, Clone, Copy, thiserror::Error)]
#[error("{0} was modified concurrently; re-read it and try again")]
pub struct Conflict(pub &'static str);

/// An extractor refused the request. Keeps the status axum chose for it.
#[derive(Debug, thiserror::Error)]
#[error("{1}")]
pub struct Rejected(pub StatusCode, pub Cow<'static, str>);

fn join_ids(ids: &[i32]) -> String {
	ids
		.iter()
		.map(i32::to_string)
		.collect::<Vec<_>>()
		.join(", ")
}

macro_rules! impl_response {
	($struct_name:ident, $status:ident) => {
		impl axum::response::IntoResponse for $struct_name {
			fn into_response(self) -> axum::response::Response {
				crate::error::error_response(&self, http::StatusCode::$status)
			}
		}
	};
}

impl_response!(EntityNotFound, NOT_FOUND);
impl_response!(MissingCategory, BAD_REQUEST);
impl_response!(IdMismatch, BAD_REQUEST);
impl_response!(Conflict, INTERNAL_SERVER_ERROR);

impl IntoResponse for MissingTags {
	fn into_response(self) -> Response {
		Body::new(StatusCode::BAD_REQUEST, self.to_string())
			.missing_ids(&self.0)
			.into_response()
	}
}

impl IntoResponse for Rejected {
	fn into_response(self) -> Response {
		Body::new(self.0, self.1).into_response()
	}
}

impl IntoResponse for Storage {
	fn into_response(self) -> Response {
		// the details stay in the log
		tracing::error!(error = %self, "storage failure");
		Body::new(StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
	}
}

/// Everything an operation on the catalog can fail with.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Validation(#[from] ValidationErrors),
	#[error(transparent)]
	NotFound(#[from] EntityNotFound),
	#[error(transparent)]
	MissingCategory(#[from] MissingCategory),
	#[error(transparent)]
	MissingTags(#[from] MissingTags),
	#[error(transparent)]
	IdMismatch(#[from] IdMismatch),
	#[error(transparent)]
	Conflict(#[from] Conflict),
	#[error(transparent)]
	Storage(#[from] Storage),
}

impl Error {
	/// For `map_err`: wraps a storage error with what was being done at the time.
	pub fn storage(context: &'static str) -> impl FnOnce(database::Error) -> Self {
		move |error| Self::Storage(Storage(context, error))
	}
}

impl IntoResponse for Error {
	fn into_response(self) -> Response {
		match self {
			Self::Validation(inner) => inner.into_response(),
			Self::NotFound(inner) => inner.into_response(),
			Self::MissingCategory(inner) => inner.into_response(),
			Self::MissingTags(inner) => inner.into_response(),
			Self::IdMismatch(inner) => inner.into_response(),
			Self::Conflict(inner) => inner.into_response(),
			Self::Storage(inner) => inner.into_response(),
		}
	}
}
