use super::{EstablishmentId, TagId};

/// Join row between an establishment and a tag.
/// The pair is the whole identity; the establishment owns the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, sqlx::FromRow)]
pub struct EstablishmentTag {
	pub establishment_id: EstablishmentId,
	pub tag_id: TagId,
}
