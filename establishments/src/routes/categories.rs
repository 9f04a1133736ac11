use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{ErrorResponse, IntoResponse};
use axum::{extract, Json, Router};

use crate::database::{models, Database};
use crate::helpers;
use crate::projection::{CategoryDto, CategoryRequest};
use crate::stores;

pub async fn list_handler(
	extract::Extension(database): extract::Extension<Arc<Database>>,
) -> Result<Json<Vec<CategoryDto>>, ErrorResponse> {
	let categories = stores::category::list(&*database).await?;
	Ok(Json(categories.into_iter().map(CategoryDto::from).collect()))
}

pub async fn get_handler(
	helpers::Path((category_id,)): helpers::Path<(models::CategoryId,)>,
	extract::Extension(database): extract::Extension<Arc<Database>>,
) -> Result<Json<CategoryDto>, ErrorResponse> {
	let category = stores::category::get(&*database, category_id).await?;
	Ok(Json(category.into()))
}

pub async fn create_handler(
	extract::Extension(database): extract::Extension<Arc<Database>>,
	helpers::Json(request): helpers::Json<CategoryRequest>,
) -> Result<impl IntoResponse, ErrorResponse> {
	let category = stores::category::create(&*database, request).await?;
	Ok(super::created(
		"categories",
		category.id,
		CategoryDto::from(category),
	))
}

pub async fn update_handler(
	helpers::Path((category_id,)): helpers::Path<(models::CategoryId,)>,
	extract::Extension(database): extract::Extension<Arc<Database>>,
	helpers::Json(request): helpers::Json<CategoryRequest>,
) -> Result<StatusCode, ErrorResponse> {
	stores::category::update(&*database, category_id, request).await?;
	Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_handler(
	helpers::Path((category_id,)): helpers::Path<(models::CategoryId,)>,
	extract::Extension(database): extract::Extension<Arc<Database>>,
) -> Result<StatusCode, ErrorResponse> {
	stores::category::delete(&*database, category_id).await?;
	Ok(StatusCode::NO_CONTENT)
}

pub fn configure() -> Router {
	Router::new()
		.route(
			"/categories",
			axum::routing::get(list_handler).post(create_handler),
		)
		.route(
			"/categories/:category_id",
			axum::routing::get(get_handler)
				.put(update_handler)
				.delete(delete_handler),
		)
}
