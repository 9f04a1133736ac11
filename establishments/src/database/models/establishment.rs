use super::{Category, CategoryId, EstablishmentTag};

pub type Id = super::Id;

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Establishment {
	pub id: Id,
	pub name: String,
	pub category_id: CategoryId,
	pub address: String,
	pub description: Option<String>,
}

/// Scalar columns of `establishments`. Tags are never part of this; they go through `crate::reconcile`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Create {
	pub name: String,
	pub category_id: CategoryId,
	pub address: String,
	pub description: Option<String>,
}

impl Create {
	pub fn into_establishment(self, id: Id) -> Establishment {
		Establishment {
			id,
			name: self.name,
			category_id: self.category_id,
			address: self.address,
			description: self.description,
		}
	}
}

/// An establishment with its category and tag associations eagerly loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loaded {
	pub establishment: Establishment,
	pub category: Category,
	pub tags: Vec<EstablishmentTag>,
}
