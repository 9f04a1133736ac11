use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use super::models::{self, category, establishment, tag};
use super::{Repository, Result};

#[derive(Clone, Debug)]
pub struct PgRepository {
	pool: PgPool,
}

impl PgRepository {
	pub fn new(pool: PgPool) -> Self {
		Self { pool }
	}
}

/// `establishments` joined with its category.
#[derive(sqlx::FromRow)]
struct EstablishmentRow {
	id: models::EstablishmentId,
	name: String,
	category_id: models::CategoryId,
	address: String,
	description: Option<String>,
	category_name: String,
	category_description: Option<String>,
}

impl EstablishmentRow {
	fn with_tags(self, tags: Vec<models::EstablishmentTag>) -> establishment::Loaded {
		establishment::Loaded {
			establishment: models::Establishment {
				id: self.id,
				name: self.name,
				category_id: self.category_id,
				address: self.address,
				description: self.description,
			},
			category: models::Category {
				id: self.category_id,
				name: self.category_name,
				description: self.category_description,
			},
			tags,
		}
	}
}

const SELECT_ESTABLISHMENT: &str = "SELECT establishments.id, establishments.name, establishments.category_id, establishments.address, establishments.description, categories.name AS category_name, categories.description AS category_description FROM establishments INNER JOIN categories ON categories.id = establishments.category_id";

async fn insert_tags(
	transaction: &mut Transaction<'_, Postgres>,
	establishment_id: models::EstablishmentId,
	tags: &[models::TagId],
) -> Result<()> {
	if tags.is_empty() {
		return Ok(());
	}
	sqlx::query(
		"INSERT INTO establishment_tags (establishment_id, tag_id) (SELECT $1 AS establishment_id, unnest AS tag_id FROM unnest(cast($2 AS int[])))",
	)
	.bind(establishment_id)
	.bind(tags)
	.execute(&mut *transaction)
	.await?;
	Ok(())
}

#[async_trait]
impl Repository for PgRepository {
	async fn categories(&self) -> Result<Vec<models::Category>> {
		let categories = sqlx::query_as::<_, models::Category>(
			"SELECT id, name, description FROM categories ORDER BY id",
		)
		.fetch_all(&self.pool)
		.await?;
		Ok(categories)
	}

	async fn category_by_id(&self, id: models::CategoryId) -> Result<Option<models::Category>> {
		let category = sqlx::query_as::<_, models::Category>(
			"SELECT id, name, description FROM categories WHERE id = $1",
		)
		.bind(id)
		.fetch_optional(&self.pool)
		.await?;
		Ok(category)
	}

	async fn insert_category(&self, category: &category::Create) -> Result<models::Category> {
		let category = sqlx::query_as::<_, models::Category>(
			"INSERT INTO categories (name, description) VALUES ($1, $2) RETURNING id, name, description",
		)
		.bind(&category.name)
		.bind(category.description.as_deref())
		.fetch_one(&self.pool)
		.await?;
		Ok(category)
	}

	async fn update_category(
		&self,
		id: models::CategoryId,
		category: &category::Create,
	) -> Result<bool> {
		let query_result =
			sqlx::query("UPDATE categories SET name = $2, description = $3 WHERE id = $1")
				.bind(id)
				.bind(&category.name)
				.bind(category.description.as_deref())
				.execute(&self.pool)
				.await?;
		Ok(query_result.rows_affected() > 0)
	}

	async fn delete_category(&self, id: models::CategoryId) -> Result<bool> {
		let query_result = sqlx::query("DELETE FROM categories WHERE id = $1")
			.bind(id)
			.execute(&self.pool)
			.await?;
		Ok(query_result.rows_affected() > 0)
	}

	async fn tags(&self) -> Result<Vec<models::Tag>> {
		let tags = sqlx::query_as::<_, models::Tag>("SELECT id, name, description FROM tags ORDER BY id")
			.fetch_all(&self.pool)
			.await?;
		Ok(tags)
	}

	async fn tag_by_id(&self, id: models::TagId) -> Result<Option<models::Tag>> {
		let tag =
			sqlx::query_as::<_, models::Tag>("SELECT id, name, description FROM tags WHERE id = $1")
				.bind(id)
				.fetch_optional(&self.pool)
				.await?;
		Ok(tag)
	}

	async fn insert_tag(&self, tag: &tag::Create) -> Result<models::Tag> {
		let tag = sqlx::query_as::<_, models::Tag>(
			"INSERT INTO tags (name, description) VALUES ($1, $2) RETURNING id, name, description",
		)
		.bind(&tag.name)
		.bind(tag.description.as_deref())
		.fetch_one(&self.pool)
		.await?;
		Ok(tag)
	}

	async fn update_tag(&self, id: models::TagId, tag: &tag::Create) -> Result<bool> {
		let query_result = sqlx::query("UPDATE tags SET name = $2, description = $3 WHERE id = $1")
			.bind(id)
			.bind(&tag.name)
			.bind(tag.description.as_deref())
			.execute(&self.pool)
			.await?;
		Ok(query_result.rows_affected() > 0)
	}

	async fn delete_tag(&self, id: models::TagId) -> Result<bool> {
		let query_result = sqlx::query("DELETE FROM tags WHERE id = $1")
			.bind(id)
			.execute(&self.pool)
			.await?;
		Ok(query_result.rows_affected() > 0)
	}

	async fn existing_tag_ids(&self, ids: &[models::TagId]) -> Result<Vec<models::TagId>> {
		let found = sqlx::query_scalar::<_, models::TagId>(
			"SELECT id FROM tags WHERE id = ANY(cast($1 AS int[]))",
		)
		.bind(ids)
		.fetch_all(&self.pool)
		.await?;
		Ok(found)
	}

	async fn establishments(&self) -> Result<Vec<establishment::Loaded>> {
		let rows = sqlx::query_as::<_, EstablishmentRow>(&format!(
			"{SELECT_ESTABLISHMENT} ORDER BY establishments.id"
		))
		.fetch_all(&self.pool)
		.await?;

		let mut tags_by_establishment: HashMap<models::EstablishmentId, Vec<models::EstablishmentTag>> =
			HashMap::new();
		let associations = sqlx::query_as::<_, models::EstablishmentTag>(
			"SELECT establishment_id, tag_id FROM establishment_tags ORDER BY establishment_id, tag_id",
		)
		.fetch_all(&self.pool)
		.await?;
		for association in associations {
			tags_by_establishment
				.entry(association.establishment_id)
				.or_default()
				.push(association);
		}

		Ok(
			rows
				.into_iter()
				.map(|row| {
					let tags = tags_by_establishment.remove(&row.id).unwrap_or_default();
					row.with_tags(tags)
				})
				.collect(),
		)
	}

	async fn establishment_by_id(
		&self,
		id: models::EstablishmentId,
	) -> Result<Option<establishment::Loaded>> {
		let row = sqlx::query_as::<_, EstablishmentRow>(&format!(
			"{SELECT_ESTABLISHMENT} WHERE establishments.id = $1"
		))
		.bind(id)
		.fetch_optional(&self.pool)
		.await?;
		let row = match row {
			Some(row) => row,
			None => return Ok(None),
		};

		let tags = sqlx::query_as::<_, models::EstablishmentTag>(
			"SELECT establishment_id, tag_id FROM establishment_tags WHERE establishment_id = $1 ORDER BY tag_id",
		)
		.bind(id)
		.fetch_all(&self.pool)
		.await?;

		Ok(Some(row.with_tags(tags)))
	}

	async fn establishment_exists(&self, id: models::EstablishmentId) -> Result<bool> {
		let exists = sqlx::query_scalar::<_, bool>(
			"SELECT EXISTS(SELECT 1 FROM establishments WHERE id = $1)",
		)
		.bind(id)
		.fetch_one(&self.pool)
		.await?;
		Ok(exists)
	}

	async fn insert_establishment(
		&self,
		establishment: &establishment::Create,
		tags: &[models::TagId],
	) -> Result<models::Establishment> {
		let mut transaction = self.pool.begin().await?;
		let inserted = sqlx::query_as::<_, models::Establishment>(
			"INSERT INTO establishments (name, category_id, address, description) VALUES ($1, $2, $3, $4) RETURNING id, name, category_id, address, description",
		)
		.bind(&establishment.name)
		.bind(establishment.category_id)
		.bind(&establishment.address)
		.bind(establishment.description.as_deref())
		.fetch_one(&mut transaction)
		.await?;
		insert_tags(&mut transaction, inserted.id, tags).await?;
		transaction.commit().await?;
		Ok(inserted)
	}

	async fn update_establishment(
		&self,
		id: models::EstablishmentId,
		establishment: &establishment::Create,
		tags: Option<&[models::TagId]>,
	) -> Result<bool> {
		let mut transaction = self.pool.begin().await?;
		let query_result = sqlx::query(
			"UPDATE establishments SET name = $2, category_id = $3, address = $4, description = $5 WHERE id = $1",
		)
		.bind(id)
		.bind(&establishment.name)
		.bind(establishment.category_id)
		.bind(&establishment.address)
		.bind(establishment.description.as_deref())
		.execute(&mut transaction)
		.await?;
		if query_result.rows_affected() == 0 {
			// dropping the transaction rolls it back
			return Ok(false);
		}

		if let Some(tags) = tags {
			sqlx::query("DELETE FROM establishment_tags WHERE establishment_id = $1")
				.bind(id)
				.execute(&mut transaction)
				.await?;
			insert_tags(&mut transaction, id, tags).await?;
		}

		transaction.commit().await?;
		Ok(true)
	}

	async fn delete_establishment(&self, id: models::EstablishmentId) -> Result<bool> {
		// `establishment_tags` rows go with it through `ON DELETE CASCADE`
		let query_result = sqlx::query("DELETE FROM establishments WHERE id = $1")
			.bind(id)
			.execute(&self.pool)
			.await?;
		Ok(query_result.rows_affected() > 0)
	}
}
