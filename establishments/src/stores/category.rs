use crate::database::models::{self, category};
use crate::database::Database;
use crate::error::{self, Error};
use crate::projection::CategoryRequest;

pub async fn list(database: &Database) -> Result<Vec<models::Category>, Error> {
	database
		.categories()
		.await
		.map_err(Error::storage("listing categories"))
}

pub async fn get(database: &Database, id: models::CategoryId) -> Result<models::Category, Error> {
	database
		.category_by_id(id)
		.await
		.map_err(Error::storage("getting category"))?
		.ok_or_else(|| {
			tracing::warn!(id, "category not found");
			error::EntityNotFound("category").into()
		})
}

pub async fn create(
	database: &Database,
	request: CategoryRequest,
) -> Result<models::Category, Error> {
	let create = category::Create::try_from(request).map_err(super::invalid("category"))?;
	tracing::info!(name = %create.name, "creating category");

	let category = database
		.insert_category(&create)
		.await
		.map_err(Error::storage("creating category"))?;
	tracing::info!(id = category.id, "created category");
	Ok(category)
}

pub async fn update(
	database: &Database,
	id: models::CategoryId,
	request: CategoryRequest,
) -> Result<(), Error> {
	super::check_body_id(id, request.id)?;
	let update = category::Create::try_from(request).map_err(super::invalid("category"))?;

	let updated = database
		.update_category(id, &update)
		.await
		.map_err(Error::storage("updating category"))?;
	if !updated {
		tracing::warn!(id, "category to update not found");
		return Err(error::EntityNotFound("category").into());
	}
	tracing::info!(id, "updated category");
	Ok(())
}

/// Establishments in the category are deleted with it.
pub async fn delete(database: &Database, id: models::CategoryId) -> Result<(), Error> {
	let deleted = database
		.delete_category(id)
		.await
		.map_err(Error::storage("deleting category"))?;
	if !deleted {
		tracing::warn!(id, "category to delete not found");
		return Err(error::EntityNotFound("category").into());
	}
	tracing::info!(id, "deleted category");
	Ok(())
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::database::MemoryRepository;

	fn request(name: &str) -> CategoryRequest {
		CategoryRequest {
			name: Some(name.to_owned()),
			..CategoryRequest::default()
		}
	}

	#[tokio::test]
	async fn create_then_get() {
		let database = MemoryRepository::default();
		let created = create(&database, request("Food")).await.unwrap();
		assert_eq!(created.id, 1);
		assert_eq!(get(&database, created.id).await.unwrap(), created);
		assert_eq!(list(&database).await.unwrap(), [created]);
	}

	#[tokio::test]
	async fn invalid_create_writes_nothing() {
		let database = MemoryRepository::default();
		let result = create(&database, request("")).await;
		assert!(matches!(result, Err(Error::Validation(_))));
		assert!(list(&database).await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn update_checks_id_and_existence() {
		let database = MemoryRepository::default();
		let created = create(&database, request("Food")).await.unwrap();

		let mismatched = CategoryRequest {
			id: Some(created.id + 1),
			..request("Shops")
		};
		assert!(matches!(
			update(&database, created.id, mismatched).await,
			Err(Error::IdMismatch(_))
		));
		assert!(matches!(
			update(&database, 42, request("Shops")).await,
			Err(Error::NotFound(_))
		));

		update(&database, created.id, request("Shops"))
			.await
			.unwrap();
		assert_eq!(get(&database, created.id).await.unwrap().name, "Shops");
	}

	#[tokio::test]
	async fn delete_missing() {
		let database = MemoryRepository::default();
		assert!(matches!(
			delete(&database, 1).await,
			Err(Error::NotFound(error::EntityNotFound("category")))
		));
	}
}
