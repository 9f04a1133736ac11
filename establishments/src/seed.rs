//! Demo data for a fresh store. Each entity kind is only seeded while it has no rows, so running this on every startup is harmless.

use crate::database::Database;
use crate::error::Error;
use crate::projection::{CategoryRequest, EstablishmentRequest, TagRequest};
use crate::stores;

const CATEGORIES: [(&str, &str); 4] = [
	("Food", "Places to eat"),
	("Shops", "Retail outlets"),
	("Entertainment", "Places to relax and have fun"),
	("Services", "Assorted services"),
];

const TAGS: [(&str, &str); 4] = [
	("Popular", "Popular places"),
	("New", "Newly opened"),
	("Discounts", "Places with discounts"),
	("Recommended", "Recommended places"),
];

pub async fn run(database: &Database) -> Result<(), Error> {
	if stores::category::list(database).await?.is_empty() {
		for (name, description) in CATEGORIES {
			stores::category::create(
				database,
				CategoryRequest {
					id: None,
					name: Some(name.to_owned()),
					description: Some(description.to_owned()),
				},
			)
			.await?;
		}
		tracing::info!(count = CATEGORIES.len(), "seeded categories");
	}

	if stores::tag::list(database).await?.is_empty() {
		for (name, description) in TAGS {
			stores::tag::create(
				database,
				TagRequest {
					id: None,
					name: Some(name.to_owned()),
					description: Some(description.to_owned()),
				},
			)
			.await?;
		}
		tracing::info!(count = TAGS.len(), "seeded tags");
	}

	if !stores::establishment::list(database).await?.is_empty() {
		return Ok(());
	}

	let categories = stores::category::list(database).await?;
	let tags = stores::tag::list(database).await?;
	let category = |name: &str| {
		categories
			.iter()
			.find(|category| category.name == name)
			.map(|category| category.id)
	};
	let tag = |name: &str| tags.iter().find(|tag| tag.name == name).map(|tag| tag.id);

	let (Some(food), Some(shops), Some(popular), Some(new)) =
		(category("Food"), category("Shops"), tag("Popular"), tag("New"))
	else {
		tracing::warn!("demo categories or tags were renamed; not seeding establishments");
		return Ok(());
	};

	let establishments = [
		EstablishmentRequest {
			id: None,
			name: Some("Restaurant \"Hearty Lunch\"".to_owned()),
			category_id: Some(food),
			address: Some("10 Lenin St".to_owned()),
			description: Some("A popular restaurant with a varied menu".to_owned()),
			tag_ids: Some(vec![popular, new]),
		},
		EstablishmentRequest {
			id: None,
			name: Some("Supermarket \"Groceries Plus\"".to_owned()),
			category_id: Some(shops),
			address: Some("5 Peace Ave".to_owned()),
			description: Some("A wide choice of food and everyday goods".to_owned()),
			tag_ids: Some(vec![popular]),
		},
	];
	let count = establishments.len();
	for request in establishments {
		stores::establishment::create(database, request).await?;
	}
	tracing::info!(count, "seeded establishments");

	Ok(())
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::database::MemoryRepository;
	use crate::projection;

	#[tokio::test]
	async fn seeds_once() {
		let database = MemoryRepository::default();
		run(&database).await.unwrap();
		run(&database).await.unwrap();

		assert_eq!(stores::category::list(&database).await.unwrap().len(), 4);
		assert_eq!(stores::tag::list(&database).await.unwrap().len(), 4);

		let establishments = stores::establishment::list(&database).await.unwrap();
		assert_eq!(establishments.len(), 2);
		assert_eq!(projection::tag_ids(&establishments[0].tags), [1, 2]);
		assert_eq!(establishments[0].category.name, "Food");
		assert_eq!(projection::tag_ids(&establishments[1].tags), [1]);
		assert_eq!(establishments[1].category.name, "Shops");
	}

	#[tokio::test]
	async fn leaves_existing_categories_alone() {
		let database = MemoryRepository::default();
		stores::category::create(
			&database,
			CategoryRequest {
				id: None,
				name: Some("Parks".to_owned()),
				description: None,
			},
		)
		.await
		.unwrap();

		run(&database).await.unwrap();

		let categories = stores::category::list(&database).await.unwrap();
		assert_eq!(categories.len(), 1);
		assert_eq!(stores::tag::list(&database).await.unwrap().len(), 4);
		assert!(stores::establishment::list(&database).await.unwrap().is_empty());
	}
}
