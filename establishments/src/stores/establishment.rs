use crate::database::models::{self, establishment};
use crate::database::{self, Database};
use crate::error::{self, Error};
use crate::projection::{self, EstablishmentRequest};
use crate::reconcile::{self, Replacement};

pub async fn list(database: &Database) -> Result<Vec<establishment::Loaded>, Error> {
	database
		.establishments()
		.await
		.map_err(Error::storage("listing establishments"))
}

pub async fn get(
	database: &Database,
	id: models::EstablishmentId,
) -> Result<establishment::Loaded, Error> {
	database
		.establishment_by_id(id)
		.await
		.map_err(Error::storage("getting establishment"))?
		.ok_or_else(|| {
			tracing::warn!(id, "establishment not found");
			error::EntityNotFound("establishment").into()
		})
}

async fn require_category(
	database: &Database,
	id: models::CategoryId,
) -> Result<models::Category, Error> {
	database
		.category_by_id(id)
		.await
		.map_err(Error::storage("looking up category"))?
		.ok_or_else(|| {
			tracing::warn!(category_id = id, "category not found");
			error::MissingCategory(id).into()
		})
}

/// The row disappeared or a reference broke between our checks and the write.
async fn concurrent_modification(database: &Database, id: models::EstablishmentId) -> Error {
	match database.establishment_exists(id).await {
		Ok(false) => {
			tracing::warn!(id, "establishment deleted while being updated");
			error::EntityNotFound("establishment").into()
		}
		Ok(true) => {
			tracing::error!(id, "establishment modified concurrently");
			error::Conflict("establishment").into()
		}
		Err(error) => Error::storage("re-checking establishment")(error),
	}
}

/// Creates the establishment and its whole tag set in one atomic write.
/// A missing category or any unknown tag ID fails before anything is written.
pub async fn create(
	database: &Database,
	mut request: EstablishmentRequest,
) -> Result<establishment::Loaded, Error> {
	let requested_tags = request.tag_ids.take().unwrap_or_default();
	let create =
		establishment::Create::try_from(request).map_err(super::invalid("establishment"))?;
	tracing::info!(name = %create.name, "creating establishment");

	let category = require_category(database, create.category_id).await?;
	let tags = reconcile::resolve(database, &requested_tags).await?;

	let inserted = match database.insert_establishment(&create, tags.ids()).await {
		Ok(inserted) => inserted,
		Err(database::Error::ForeignKey) => {
			tracing::error!("category or tag deleted while creating establishment");
			return Err(error::Conflict("establishment").into());
		}
		Err(other) => return Err(Error::storage("creating establishment")(other)),
	};
	tracing::info!(id = inserted.id, tags = ?tags.ids(), "created establishment");

	Ok(establishment::Loaded {
		tags: tags.associate(inserted.id),
		establishment: inserted,
		category,
	})
}

/// Overwrites the scalar fields and, when `tagIds` is given, replaces the tag set wholesale.
///
/// Tags are resolved before any association is touched: an unknown ID fails the update and the previous associations survive.
pub async fn update(
	database: &Database,
	id: models::EstablishmentId,
	mut request: EstablishmentRequest,
) -> Result<(), Error> {
	super::check_body_id(id, request.id)?;
	let requested_tags = request.tag_ids.take();
	let update =
		establishment::Create::try_from(request).map_err(super::invalid("establishment"))?;

	let current = get(database, id).await?;
	require_category(database, update.category_id).await?;
	let tags = match requested_tags {
		Some(requested) => Some(reconcile::resolve(database, &requested).await?),
		None => None,
	};

	let written = database
		.update_establishment(id, &update, tags.as_ref().map(reconcile::ResolvedTags::ids))
		.await;
	match written {
		Ok(true) => {}
		Ok(false) | Err(database::Error::ForeignKey) => {
			return Err(concurrent_modification(database, id).await)
		}
		Err(other) => return Err(Error::storage("updating establishment")(other)),
	}

	if let Some(tags) = &tags {
		let replacement = Replacement::between(&projection::tag_ids(&current.tags), tags);
		tracing::debug!(
			id,
			removed = ?replacement.removed,
			added = ?replacement.added,
			kept = replacement.kept,
			noop = replacement.is_noop(),
			"replaced tags"
		);
	}
	tracing::info!(id, "updated establishment");
	Ok(())
}

/// The establishment's associations are removed with it; the tags themselves are untouched.
pub async fn delete(database: &Database, id: models::EstablishmentId) -> Result<(), Error> {
	let deleted = database
		.delete_establishment(id)
		.await
		.map_err(Error::storage("deleting establishment"))?;
	if !deleted {
		tracing::warn!(id, "establishment to delete not found");
		return Err(error::EntityNotFound("establishment").into());
	}
	tracing::info!(id, "deleted establishment");
	Ok(())
}
