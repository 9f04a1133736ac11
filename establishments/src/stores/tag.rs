use crate::database::models::{self, tag};
use crate::database::Database;
use crate::error::{self, Error};
use crate::projection::TagRequest;

pub async fn list(database: &Database) -> Result<Vec<models::Tag>, Error> {
	database
		.tags()
		.await
		.map_err(Error::storage("listing tags"))
}

pub async fn get(database: &Database, id: models::TagId) -> Result<models::Tag, Error> {
	database
		.tag_by_id(id)
		.await
		.map_err(Error::storage("getting tag"))?
		.ok_or_else(|| {
			tracing::warn!(id, "tag not found");
			error::EntityNotFound("tag").into()
		})
}

pub async fn create(
	database: &Database,
	request: TagRequest,
) -> Result<models::Tag, Error> {
	let create = tag::Create::try_from(request).map_err(super::invalid("tag"))?;
	tracing::info!(name = %create.name, "creating tag");

	let tag = database
		.insert_tag(&create)
		.await
		.map_err(Error::storage("creating tag"))?;
	tracing::info!(id = tag.id, "created tag");
	Ok(tag)
}

pub async fn update(
	database: &Database,
	id: models::TagId,
	request: TagRequest,
) -> Result<(), Error> {
	super::check_body_id(id, request.id)?;
	let update = tag::Create::try_from(request).map_err(super::invalid("tag"))?;

	let updated = database
		.update_tag(id, &update)
		.await
		.map_err(Error::storage("updating tag"))?;
	if !updated {
		tracing::warn!(id, "tag to update not found");
		return Err(error::EntityNotFound("tag").into());
	}
	tracing::info!(id, "updated tag");
	Ok(())
}

/// Associations referencing the tag go with it; the establishments themselves stay.
pub async fn delete(database: &Database, id: models::TagId) -> Result<(), Error> {
	let deleted = database
		.delete_tag(id)
		.await
		.map_err(Error::storage("deleting tag"))?;
	if !deleted {
		tracing::warn!(id, "tag to delete not found");
		return Err(error::EntityNotFound("tag").into());
	}
	tracing::info!(id, "deleted tag");
	Ok(())
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::database::MemoryRepository;

	#[tokio::test]
	async fn blank_description_is_absent() {
		let database = MemoryRepository::default();
		let created = create(
			&database,
			TagRequest {
				id: None,
				name: Some("Popular".to_owned()),
				description: Some(String::new()),
			},
		)
		.await
		.unwrap();
		assert_eq!(created.description, None);
		assert_eq!(get(&database, created.id).await.unwrap(), created);
	}

	#[tokio::test]
	async fn update_rejects_other_id_in_body() {
		let database = MemoryRepository::default();
		let request = || TagRequest {
			id: Some(2),
			name: Some("New".to_owned()),
			description: None,
		};
		assert!(matches!(
			update(&database, 1, request()).await,
			Err(Error::IdMismatch(error::IdMismatch { path: 1, body: 2 }))
		));
		// body ID agrees with the path, but there is no such tag
		assert!(matches!(
			update(&database, 2, request()).await,
			Err(Error::NotFound(error::EntityNotFound("tag")))
		));
	}

	#[tokio::test]
	async fn delete_then_get() {
		let database = MemoryRepository::default();
		let created = create(
			&database,
			TagRequest {
				name: Some("Discounts".to_owned()),
				..TagRequest::default()
			},
		)
		.await
		.unwrap();
		delete(&database, created.id).await.unwrap();
		assert!(matches!(
			get(&database, created.id).await,
			Err(Error::NotFound(_))
		));
		assert!(matches!(
			delete(&database, created.id).await,
			Err(Error::NotFound(_))
		));
	}
}
