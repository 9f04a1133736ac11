use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{ErrorResponse, IntoResponse};
use axum::{extract, Json, Router};

use crate::database::{models, Database};
use crate::helpers;
use crate::projection::{EstablishmentDto, EstablishmentRequest};
use crate::stores;

pub async fn list_handler(
	extract::Extension(database): extract::Extension<Arc<Database>>,
) -> Result<Json<Vec<EstablishmentDto>>, ErrorResponse> {
	let establishments = stores::establishment::list(&*database).await?;
	Ok(Json(
		establishments
			.into_iter()
			.map(EstablishmentDto::from)
			.collect(),
	))
}

pub async fn get_handler(
	helpers::Path((establishment_id,)): helpers::Path<(models::EstablishmentId,)>,
	extract::Extension(database): extract::Extension<Arc<Database>>,
) -> Result<Json<EstablishmentDto>, ErrorResponse> {
	let establishment = stores::establishment::get(&*database, establishment_id).await?;
	Ok(Json(establishment.into()))
}

pub async fn create_handler(
	extract::Extension(database): extract::Extension<Arc<Database>>,
	helpers::Json(request): helpers::Json<EstablishmentRequest>,
) -> Result<impl IntoResponse, ErrorResponse> {
	let establishment = stores::establishment::create(&*database, request).await?;
	let id = establishment.establishment.id;
	Ok(super::created(
		"establishments",
		id,
		EstablishmentDto::from(establishment),
	))
}

/// `tagIds` in the body is the complete new tag set; leaving it out keeps the current one.
pub async fn update_handler(
	helpers::Path((establishment_id,)): helpers::Path<(models::EstablishmentId,)>,
	extract::Extension(database): extract::Extension<Arc<Database>>,
	helpers::Json(request): helpers::Json<EstablishmentRequest>,
) -> Result<StatusCode, ErrorResponse> {
	stores::establishment::update(&*database, establishment_id, request).await?;
	Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_handler(
	helpers::Path((establishment_id,)): helpers::Path<(models::EstablishmentId,)>,
	extract::Extension(database): extract::Extension<Arc<Database>>,
) -> Result<StatusCode, ErrorResponse> {
	stores::establishment::delete(&*database, establishment_id).await?;
	Ok(StatusCode::NO_CONTENT)
}

pub fn configure() -> Router {
	Router::new()
		.route(
			"/establishments",
			axum::routing::get(list_handler).post(create_handler),
		)
		.route(
			"/establishments/:establishment_id",
			axum::routing::get(get_handler)
				.put(update_handler)
				.delete(delete_handler),
		)
}
