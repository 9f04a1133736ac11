use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Router;

mod categories;
mod establishments;
mod tags;

macro_rules! merge {
	($app:ident, $name:ident) => {
		$app = $app.merge($name::configure());
	};
	($app:ident; $($name:ident),+) => {
		$(merge!($app, $name));+
	};
}

pub fn configure() -> Router {
	let mut app = Router::new();

	merge!(app; categories, establishments, tags);

	app.fallback(axum::handler::Handler::into_service(
		crate::error::default_handler,
	))
}

/// `201 Created` with a `Location` pointing at the new item.
fn created(collection: &str, id: i32, item: impl serde::Serialize) -> impl IntoResponse {
	(
		StatusCode::CREATED,
		[(http::header::LOCATION, format!("/{collection}/{id}"))],
		axum::Json(item),
	)
}
