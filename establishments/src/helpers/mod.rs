use axum::response::IntoResponse;

use crate::error;

pub mod json;
pub mod path;

pub use json::Json;
pub use path::Path;

/// Keeps the status axum picked for the rejection and its message.
fn rejected<R: IntoResponse + std::fmt::Display>(rejection: R) -> error::Rejected {
	let message = rejection.to_string();
	error::Rejected(rejection.into_response().status(), message.into())
}

pub fn set_none_if_empty(opt: &mut Option<String>) {
	if opt.as_deref() == Some("") {
		*opt = None;
	}
}
