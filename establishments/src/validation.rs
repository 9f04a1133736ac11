//! Field-level validation of incoming transfer shapes.
//!
//! Checks never stop at the first problem; every violated field is collected into one [`ValidationErrors`].

use std::borrow::Cow;
use std::fmt::{self, Display, Formatter};

use axum::response::{IntoResponse, Response};
use http::StatusCode;

use crate::error::Body;
use crate::helpers::set_none_if_empty;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FieldError {
	pub field: &'static str,
	pub message: Cow<'static, str>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl std::error::Error for ValidationErrors {}

impl Display for ValidationErrors {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str("validation failed")?;
		for (i, error) in self.0.iter().enumerate() {
			f.write_str(if i == 0 { ": " } else { "; " })?;
			write!(f, "{}: {}", error.field, error.message)?;
		}
		Ok(())
	}
}

impl ValidationErrors {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn fields(&self) -> &[FieldError] {
		&self.0
	}

	pub fn add(&mut self, field: &'static str, message: impl Into<Cow<'static, str>>) {
		self.0.push(FieldError {
			field,
			message: message.into(),
		});
	}

	/// A blank value counts as missing. Returns an empty string after recording the error, so the caller can keep checking other fields.
	pub fn required_text(&mut self, field: &'static str, value: Option<String>) -> String {
		match value {
			Some(value) if !value.trim().is_empty() => value,
			_ => {
				self.add(field, format!("{field} is required"));
				String::new()
			}
		}
	}

	pub fn required<T: Default>(&mut self, field: &'static str, value: Option<T>) -> T {
		value.unwrap_or_else(|| {
			self.add(field, format!("{field} is required"));
			T::default()
		})
	}

	/// Empty strings become `None`.
	pub fn optional_text(&mut self, mut value: Option<String>) -> Option<String> {
		set_none_if_empty(&mut value);
		value
	}

	pub fn max_chars(&mut self, field: &'static str, value: Option<&str>, max: usize) {
		if value.map_or(false, |value| value.chars().count() > max) {
			self.add(field, format!("{field} must be at most {max} characters"));
		}
	}

	pub fn finish<T>(self, value: T) -> Result<T, Self> {
		if self.0.is_empty() {
			Ok(value)
		} else {
			Err(self)
		}
	}
}

impl IntoResponse for ValidationErrors {
	fn into_response(self) -> Response {
		Body::new(StatusCode::BAD_REQUEST, self.to_string())
			.fields(&self.0)
			.into_response()
	}
}
