pub type Id = super::Id;

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Tag {
	pub id: Id,
	pub name: String,
	pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Create {
	pub name: String,
	pub description: Option<String>,
}

impl Create {
	pub fn into_tag(self, id: Id) -> Tag {
		Tag {
			id,
			name: self.name,
			description: self.description,
		}
	}
}
