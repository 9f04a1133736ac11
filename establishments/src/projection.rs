//! Transfer shapes and the explicit conversions between them and the models.
//!
//! Reading flattens an establishment's associations into `tagIds`.
//! Writing maps scalar fields only: `tagIds` never reaches an `establishment::Create`, it is handed to [`crate::reconcile`] instead.

use serde::{Deserialize, Serialize};

use crate::database::models::{self, category, establishment, tag};
use crate::validation::ValidationErrors;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDto {
	pub id: models::CategoryId,
	pub name: String,
	pub description: Option<String>,
}

impl From<models::Category> for CategoryDto {
	fn from(category: models::Category) -> Self {
		Self {
			id: category.id,
			name: category.name,
			description: category.description,
		}
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryRequest {
	pub id: Option<models::CategoryId>,
	pub name: Option<String>,
	pub description: Option<String>,
}

impl TryFrom<CategoryRequest> for category::Create {
	type Error = ValidationErrors;

	fn try_from(request: CategoryRequest) -> Result<Self, Self::Error> {
		let mut errors = ValidationErrors::new();
		let name = errors.required_text("name", request.name);
		errors.max_chars("name", Some(name.as_str()), category::NAME_MAX_CHARS);
		let description = errors.optional_text(request.description);
		errors.max_chars(
			"description",
			description.as_deref(),
			category::DESCRIPTION_MAX_CHARS,
		);
		errors.finish(Self { name, description })
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagDto {
	pub id: models::TagId,
	pub name: String,
	pub description: Option<String>,
}

impl From<models::Tag> for TagDto {
	fn from(tag: models::Tag) -> Self {
		Self {
			id: tag.id,
			name: tag.name,
			description: tag.description,
		}
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TagRequest {
	pub id: Option<models::TagId>,
	pub name: Option<String>,
	pub description: Option<String>,
}

impl TryFrom<TagRequest> for tag::Create {
	type Error = ValidationErrors;

	fn try_from(request: TagRequest) -> Result<Self, Self::Error> {
		let mut errors = ValidationErrors::new();
		let name = errors.required_text("name", request.name);
		let description = errors.optional_text(request.description);
		errors.finish(Self { name, description })
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstablishmentDto {
	pub id: models::EstablishmentId,
	pub name: String,
	pub category_id: models::CategoryId,
	pub address: String,
	pub description: Option<String>,
	pub tag_ids: Vec<models::TagId>,
	pub category: CategoryDto,
}

/// Flattens associations to their tag IDs, in the order they were loaded.
pub fn tag_ids(associations: &[models::EstablishmentTag]) -> Vec<models::TagId> {
	associations
		.iter()
		.map(|association| association.tag_id)
		.collect()
}

impl From<establishment::Loaded> for EstablishmentDto {
	fn from(loaded: establishment::Loaded) -> Self {
		let tag_ids = tag_ids(&loaded.tags);
		let establishment = loaded.establishment;
		Self {
			id: establishment.id,
			name: establishment.name,
			category_id: establishment.category_id,
			address: establishment.address,
			description: establishment.description,
			tag_ids,
			category: loaded.category.into(),
		}
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstablishmentRequest {
	pub id: Option<models::EstablishmentId>,
	pub name: Option<String>,
	pub category_id: Option<models::CategoryId>,
	pub address: Option<String>,
	pub description: Option<String>,
	/// The complete desired tag set. Absent or `null` means "leave the tags alone" on update.
	pub tag_ids: Option<Vec<models::TagId>>,
}

impl TryFrom<EstablishmentRequest> for establishment::Create {
	type Error = ValidationErrors;

	fn try_from(request: EstablishmentRequest) -> Result<Self, Self::Error> {
		let mut errors = ValidationErrors::new();
		let name = errors.required_text("name", request.name);
		let category_id = errors.required("categoryId", request.category_id);
		let address = errors.required_text("address", request.address);
		let description = errors.optional_text(request.description);
		errors.finish(Self {
			name,
			category_id,
			address,
			description,
		})
	}
}

#[cfg(test)]
mod test {
	use super::*;

	fn loaded() -> establishment::Loaded {
		establishment::Loaded {
			establishment: models::Establishment {
				id: 4,
				name: "Cafe".to_owned(),
				category_id: 1,
				address: "Main St".to_owned(),
				description: None,
			},
			category: models::Category {
				id: 1,
				name: "Food".to_owned(),
				description: Some("Places to eat".to_owned()),
			},
			tags: vec![
				models::EstablishmentTag {
					establishment_id: 4,
					tag_id: 9,
				},
				models::EstablishmentTag {
					establishment_id: 4,
					tag_id: 2,
				},
			],
		}
	}

	#[test]
	fn read_flattens_tags_in_collection_order() {
		let dto = EstablishmentDto::from(loaded());
		assert_eq!(dto.tag_ids, [9, 2]);
		assert_eq!(dto.category.name, "Food");

		let json = serde_json::to_value(&dto).unwrap();
		assert_eq!(json["categoryId"], 1);
		assert_eq!(json["tagIds"], serde_json::json!([9, 2]));
		assert_eq!(json["description"], serde_json::Value::Null);
	}

	#[test]
	fn write_ignores_tag_ids() {
		let request: EstablishmentRequest = serde_json::from_value(serde_json::json!({
			"name": "Cafe",
			"categoryId": 1,
			"address": "Main St",
			"description": "",
			"tagIds": [1, 2, 3],
		}))
		.unwrap();
		assert_eq!(
			establishment::Create::try_from(request),
			Ok(establishment::Create {
				name: "Cafe".to_owned(),
				category_id: 1,
				address: "Main St".to_owned(),
				description: None,
			})
		);
	}

	#[test]
	fn write_reports_every_missing_field() {
		let errors = establishment::Create::try_from(EstablishmentRequest::default()).unwrap_err();
		let fields: Vec<_> = errors.fields().iter().map(|error| error.field).collect();
		assert_eq!(fields, ["name", "categoryId", "address"]);
	}

	#[test]
	fn category_length_bounds() {
		let request = CategoryRequest {
			id: None,
			name: Some("n".repeat(101)),
			description: Some("d".repeat(501)),
		};
		let errors = category::Create::try_from(request).unwrap_err();
		let fields: Vec<_> = errors.fields().iter().map(|error| error.field).collect();
		assert_eq!(fields, ["name", "description"]);

		let request = CategoryRequest {
			id: None,
			name: Some("n".repeat(100)),
			description: Some("d".repeat(500)),
		};
		assert!(category::Create::try_from(request).is_ok());
	}

	#[test]
	fn tag_requires_name() {
		let request = TagRequest {
			id: None,
			name: None,
			description: Some("Popular places".to_owned()),
		};
		let errors = tag::Create::try_from(request).unwrap_err();
		assert_eq!(errors.fields()[0].field, "name");
	}
}
