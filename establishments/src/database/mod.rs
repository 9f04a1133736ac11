use std::sync::Arc;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;

pub mod memory;
pub mod models;
pub mod postgres;

pub use memory::MemoryRepository;
pub use postgres::PgRepository;

use models::{category, establishment, tag};

/// Connection string that selects [`MemoryRepository`] instead of PostgreSQL.
pub const MEMORY_URL: &str = "memory:";

/// The store handle passed explicitly into every operation.
pub type Database = dyn Repository;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("SQL error: {0}")]
	Sqlx(#[source] sqlx::Error),
	/// A category or tag referenced by the write was deleted in the meantime.
	#[error("a referenced row does not exist")]
	ForeignKey,
}

// https://www.postgresql.org/docs/current/errcodes-appendix.html
const FOREIGN_KEY_VIOLATION: &str = "23503";

impl From<sqlx::Error> for Error {
	fn from(error: sqlx::Error) -> Self {
		if let sqlx::Error::Database(database_error) = &error {
			if database_error.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) {
				return Self::ForeignKey;
			}
		}
		Self::Sqlx(error)
	}
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Persistence for categories, tags, establishments, and the establishment/tag join relation.
///
/// Writes that return `bool` report whether a row with the given ID existed.
/// Establishment writes that take tags are atomic: either the establishment and its whole association set are written, or nothing is.
#[async_trait]
pub trait Repository: Send + Sync {
	async fn categories(&self) -> Result<Vec<models::Category>>;
	async fn category_by_id(&self, id: models::CategoryId) -> Result<Option<models::Category>>;
	async fn insert_category(&self, category: &category::Create) -> Result<models::Category>;
	async fn update_category(&self, id: models::CategoryId, category: &category::Create)
		-> Result<bool>;
	/// Cascades to the establishments in the category.
	async fn delete_category(&self, id: models::CategoryId) -> Result<bool>;

	async fn tags(&self) -> Result<Vec<models::Tag>>;
	async fn tag_by_id(&self, id: models::TagId) -> Result<Option<models::Tag>>;
	async fn insert_tag(&self, tag: &tag::Create) -> Result<models::Tag>;
	async fn update_tag(&self, id: models::TagId, tag: &tag::Create) -> Result<bool>;
	/// Cascades to the associations referencing the tag.
	async fn delete_tag(&self, id: models::TagId) -> Result<bool>;
	/// Batch lookup: the subset of `ids` that name existing tags, in no particular order.
	async fn existing_tag_ids(&self, ids: &[models::TagId]) -> Result<Vec<models::TagId>>;

	async fn establishments(&self) -> Result<Vec<establishment::Loaded>>;
	async fn establishment_by_id(
		&self,
		id: models::EstablishmentId,
	) -> Result<Option<establishment::Loaded>>;
	async fn establishment_exists(&self, id: models::EstablishmentId) -> Result<bool>;
	async fn insert_establishment(
		&self,
		establishment: &establishment::Create,
		tags: &[models::TagId],
	) -> Result<models::Establishment>;
	/// `tags: None` leaves the association set alone; `Some` replaces it wholesale.
	async fn update_establishment(
		&self,
		id: models::EstablishmentId,
		establishment: &establishment::Create,
		tags: Option<&[models::TagId]>,
	) -> Result<bool>;
	/// Removes the establishment's associations along with it.
	async fn delete_establishment(&self, id: models::EstablishmentId) -> Result<bool>;
}

pub async fn connect(conn_str: &str, max_connections: u32) -> sqlx::Result<Arc<Database>> {
	if conn_str == MEMORY_URL {
		tracing::warn!("using the in-memory store; nothing will survive a restart");
		return Ok(Arc::new(MemoryRepository::default()));
	}

	let pool = PgPoolOptions::new()
		.max_connections(max_connections)
		.connect(conn_str)
		.await?;
	sqlx::migrate!().run(&pool).await?;
	Ok(Arc::new(PgRepository::new(pool)))
}
