use std::borrow::Cow;

use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;

use crate::validation::FieldError;

/// The JSON shape of every error response.
#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Body<'a> {
	#[serde(skip)]
	status_code: StatusCode,
	status: u16,
	error: Option<&'static str>,
	message: Cow<'a, str>,
	#[serde(skip_serializing_if = "<[_]>::is_empty")]
	fields: &'a [FieldError],
	#[serde(skip_serializing_if = "<[_]>::is_empty")]
	missing_ids: &'a [i32],
}

impl<'a> Body<'a> {
	pub fn new(status_code: StatusCode, message: impl Into<Cow<'a, str>>) -> Self {
		Self {
			status_code,
			status: status_code.as_u16(),
			error: status_code.canonical_reason(),
			message: message.into(),
			fields: &[],
			missing_ids: &[],
		}
	}

	pub fn fields(mut self, fields: &'a [FieldError]) -> Self {
		self.fields = fields;
		self
	}

	pub fn missing_ids(mut self, missing_ids: &'a [i32]) -> Self {
		self.missing_ids = missing_ids;
		self
	}
}

impl IntoResponse for Body<'_> {
	fn into_response(self) -> Response {
		(self.status_code, Json(&self)).into_response()
	}
}

pub fn error_response(error: &dyn std::error::Error, status_code: StatusCode) -> Response {
	Body::new(status_code, error.to_string()).into_response()
}

pub async fn default_handler() -> Response {
	Body::new(StatusCode::NOT_FOUND, "no such route").into_response()
}
