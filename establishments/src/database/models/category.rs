pub type Id = super::Id;

pub const NAME_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Category {
	pub id: Id,
	pub name: String,
	pub description: Option<String>,
}

/// The writable columns of `categories`, already validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Create {
	pub name: String,
	pub description: Option<String>,
}

impl Create {
	pub fn into_category(self, id: Id) -> Category {
		Category {
			id,
			name: self.name,
			description: self.description,
		}
	}
}
