use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{ErrorResponse, IntoResponse};
use axum::{extract, Json, Router};

use crate::database::{models, Database};
use crate::helpers;
use crate::projection::{TagDto, TagRequest};
use crate::stores;

pub async fn list_handler(
	extract::Extension(database): extract::Extension<Arc<Database>>,
) -> Result<Json<Vec<TagDto>>, ErrorResponse> {
	let tags = stores::tag::list(&*database).await?;
	Ok(Json(tags.into_iter().map(TagDto::from).collect()))
}

pub async fn get_handler(
	helpers::Path((tag_id,)): helpers::Path<(models::TagId,)>,
	extract::Extension(database): extract::Extension<Arc<Database>>,
) -> Result<Json<TagDto>, ErrorResponse> {
	let tag = stores::tag::get(&*database, tag_id).await?;
	Ok(Json(tag.into()))
}

pub async fn create_handler(
	extract::Extension(database): extract::Extension<Arc<Database>>,
	helpers::Json(request): helpers::Json<TagRequest>,
) -> Result<impl IntoResponse, ErrorResponse> {
	let tag = stores::tag::create(&*database, request).await?;
	Ok(super::created(
		"tags",
		tag.id,
		TagDto::from(tag),
	))
}

pub async fn update_handler(
	helpers::Path((tag_id,)): helpers::Path<(models::TagId,)>,
	extract::Extension(database): extract::Extension<Arc<Database>>,
	helpers::Json(request): helpers::Json<TagRequest>,
) -> Result<StatusCode, ErrorResponse> {
	stores::tag::update(&*database, tag_id, request).await?;
	Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_handler(
	helpers::Path((tag_id,)): helpers::Path<(models::TagId,)>,
	extract::Extension(database): extract::Extension<Arc<Database>>,
) -> Result<StatusCode, ErrorResponse> {
	stores::tag::delete(&*database, tag_id).await?;
	Ok(StatusCode::NO_CONTENT)
}

pub fn configure() -> Router {
	Router::new()
		.route(
			"/tags",
			axum::routing::get(list_handler).post(create_handler),
		)
		.route(
			"/tags/:tag_id",
			axum::routing::get(get_handler)
				.put(update_handler)
				.delete(delete_handler),
		)
}
