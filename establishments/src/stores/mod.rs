//! Operations on the catalog, one module per entity. Each takes the store handle explicitly and returns model values; routes turn those into transfer shapes.

pub mod category;
pub mod establishment;
pub mod tag;

use crate::error::{self, Error};

fn check_body_id(path: i32, body: Option<i32>) -> Result<(), Error> {
	match body {
		Some(body) if body != path => {
			tracing::warn!(path, body, "ID mismatch between URL and body");
			Err(error::IdMismatch { path, body }.into())
		}
		_ => Ok(()),
	}
}

fn invalid(entity: &'static str) -> impl FnOnce(crate::validation::ValidationErrors) -> Error {
	move |errors| {
		tracing::warn!(entity, %errors, "invalid input");
		errors.into()
	}
}
