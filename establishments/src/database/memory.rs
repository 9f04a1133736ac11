use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::models::{self, category, establishment, tag};
use super::{Error, Repository, Result};

/// A process-local store with the same foreign-key and cascade rules as the PostgreSQL schema.
#[derive(Debug, Default)]
pub struct MemoryRepository {
	state: RwLock<State>,
}

#[derive(Debug, Default)]
struct State {
	categories: BTreeMap<models::CategoryId, models::Category>,
	tags: BTreeMap<models::TagId, models::Tag>,
	establishments: BTreeMap<models::EstablishmentId, models::Establishment>,
	/// Insertion order is the read order.
	associations: Vec<models::EstablishmentTag>,
	last_category_id: models::CategoryId,
	last_tag_id: models::TagId,
	last_establishment_id: models::EstablishmentId,
}

fn next_id(last: &mut i32) -> i32 {
	*last += 1;
	*last
}

impl State {
	fn load(&self, establishment: &models::Establishment) -> Option<establishment::Loaded> {
		let category = self.categories.get(&establishment.category_id)?.clone();
		let tags = self
			.associations
			.iter()
			.filter(|association| association.establishment_id == establishment.id)
			.copied()
			.collect();
		Some(establishment::Loaded {
			establishment: establishment.clone(),
			category,
			tags,
		})
	}

	fn check_references(
		&self,
		category_id: models::CategoryId,
		tags: Option<&[models::TagId]>,
	) -> Result<()> {
		if !self.categories.contains_key(&category_id) {
			return Err(Error::ForeignKey);
		}
		if let Some(tags) = tags {
			if !tags.iter().all(|tag_id| self.tags.contains_key(tag_id)) {
				return Err(Error::ForeignKey);
			}
		}
		Ok(())
	}

	fn associate(&mut self, establishment_id: models::EstablishmentId, tags: &[models::TagId]) {
		for &tag_id in tags {
			let association = models::EstablishmentTag {
				establishment_id,
				tag_id,
			};
			if !self.associations.contains(&association) {
				self.associations.push(association);
			}
		}
	}

	fn remove_establishments(&mut self, ids: &HashSet<models::EstablishmentId>) {
		self.establishments.retain(|id, _| !ids.contains(id));
		self
			.associations
			.retain(|association| !ids.contains(&association.establishment_id));
	}
}

#[async_trait]
impl Repository for MemoryRepository {
	async fn categories(&self) -> Result<Vec<models::Category>> {
		Ok(self.state.read().await.categories.values().cloned().collect())
	}

	async fn category_by_id(&self, id: models::CategoryId) -> Result<Option<models::Category>> {
		Ok(self.state.read().await.categories.get(&id).cloned())
	}

	async fn insert_category(&self, category: &category::Create) -> Result<models::Category> {
		let mut state = self.state.write().await;
		let id = next_id(&mut state.last_category_id);
		let category = category.clone().into_category(id);
		state.categories.insert(id, category.clone());
		Ok(category)
	}

	async fn update_category(
		&self,
		id: models::CategoryId,
		category: &category::Create,
	) -> Result<bool> {
		let mut state = self.state.write().await;
		match state.categories.get_mut(&id) {
			Some(existing) => {
				*existing = category.clone().into_category(id);
				Ok(true)
			}
			None => Ok(false),
		}
	}

	async fn delete_category(&self, id: models::CategoryId) -> Result<bool> {
		let mut state = self.state.write().await;
		if state.categories.remove(&id).is_none() {
			return Ok(false);
		}
		let orphaned: HashSet<_> = state
			.establishments
			.values()
			.filter(|establishment| establishment.category_id == id)
			.map(|establishment| establishment.id)
			.collect();
		state.remove_establishments(&orphaned);
		Ok(true)
	}

	async fn tags(&self) -> Result<Vec<models::Tag>> {
		Ok(self.state.read().await.tags.values().cloned().collect())
	}

	async fn tag_by_id(&self, id: models::TagId) -> Result<Option<models::Tag>> {
		Ok(self.state.read().await.tags.get(&id).cloned())
	}

	async fn insert_tag(&self, tag: &tag::Create) -> Result<models::Tag> {
		let mut state = self.state.write().await;
		let id = next_id(&mut state.last_tag_id);
		let tag = tag.clone().into_tag(id);
		state.tags.insert(id, tag.clone());
		Ok(tag)
	}

	async fn update_tag(&self, id: models::TagId, tag: &tag::Create) -> Result<bool> {
		let mut state = self.state.write().await;
		match state.tags.get_mut(&id) {
			Some(existing) => {
				*existing = tag.clone().into_tag(id);
				Ok(true)
			}
			None => Ok(false),
		}
	}

	async fn delete_tag(&self, id: models::TagId) -> Result<bool> {
		let mut state = self.state.write().await;
		if state.tags.remove(&id).is_none() {
			return Ok(false);
		}
		state
			.associations
			.retain(|association| association.tag_id != id);
		Ok(true)
	}

	async fn existing_tag_ids(&self, ids: &[models::TagId]) -> Result<Vec<models::TagId>> {
		let state = self.state.read().await;
		Ok(
			ids
				.iter()
				.copied()
				.filter(|id| state.tags.contains_key(id))
				.collect::<HashSet<_>>()
				.into_iter()
				.collect(),
		)
	}

	async fn establishments(&self) -> Result<Vec<establishment::Loaded>> {
		let state = self.state.read().await;
		Ok(
			state
				.establishments
				.values()
				.filter_map(|establishment| state.load(establishment))
				.collect(),
		)
	}

	async fn establishment_by_id(
		&self,
		id: models::EstablishmentId,
	) -> Result<Option<establishment::Loaded>> {
		let state = self.state.read().await;
		Ok(
			state
				.establishments
				.get(&id)
				.and_then(|establishment| state.load(establishment)),
		)
	}

	async fn establishment_exists(&self, id: models::EstablishmentId) -> Result<bool> {
		Ok(self.state.read().await.establishments.contains_key(&id))
	}

	async fn insert_establishment(
		&self,
		establishment: &establishment::Create,
		tags: &[models::TagId],
	) -> Result<models::Establishment> {
		let mut state = self.state.write().await;
		state.check_references(establishment.category_id, Some(tags))?;
		let id = next_id(&mut state.last_establishment_id);
		let establishment = establishment.clone().into_establishment(id);
		state.establishments.insert(id, establishment.clone());
		state.associate(id, tags);
		Ok(establishment)
	}

	async fn update_establishment(
		&self,
		id: models::EstablishmentId,
		establishment: &establishment::Create,
		tags: Option<&[models::TagId]>,
	) -> Result<bool> {
		let mut state = self.state.write().await;
		if !state.establishments.contains_key(&id) {
			return Ok(false);
		}
		state.check_references(establishment.category_id, tags)?;
		state
			.establishments
			.insert(id, establishment.clone().into_establishment(id));
		if let Some(tags) = tags {
			state
				.associations
				.retain(|association| association.establishment_id != id);
			state.associate(id, tags);
		}
		Ok(true)
	}

	async fn delete_establishment(&self, id: models::EstablishmentId) -> Result<bool> {
		let mut state = self.state.write().await;
		if !state.establishments.contains_key(&id) {
			return Ok(false);
		}
		state.remove_establishments(&HashSet::from([id]));
		Ok(true)
	}
}

#[cfg(test)]
mod test {
	use super::*;

	fn food() -> category::Create {
		category::Create {
			name: "Food".to_owned(),
			description: None,
		}
	}

	fn popular() -> tag::Create {
		tag::Create {
			name: "Popular".to_owned(),
			description: None,
		}
	}

	fn cafe(category_id: models::CategoryId) -> establishment::Create {
		establishment::Create {
			name: "Cafe".to_owned(),
			category_id,
			address: "Main St".to_owned(),
			description: None,
		}
	}

	#[tokio::test]
	async fn ids_start_at_one() {
		let repository = MemoryRepository::default();
		assert_eq!(repository.insert_category(&food()).await.unwrap().id, 1);
		assert_eq!(repository.insert_category(&food()).await.unwrap().id, 2);
		assert_eq!(repository.insert_tag(&popular()).await.unwrap().id, 1);
	}

	#[tokio::test]
	async fn insert_rejects_dangling_references() {
		let repository = MemoryRepository::default();
		let category = repository.insert_category(&food()).await.unwrap();

		assert!(matches!(
			repository.insert_establishment(&cafe(category.id + 1), &[]).await,
			Err(Error::ForeignKey)
		));
		assert!(matches!(
			repository.insert_establishment(&cafe(category.id), &[7]).await,
			Err(Error::ForeignKey)
		));
		assert!(repository.establishments().await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn deleting_category_cascades() {
		let repository = MemoryRepository::default();
		let category = repository.insert_category(&food()).await.unwrap();
		let tag = repository.insert_tag(&popular()).await.unwrap();
		let establishment = repository
			.insert_establishment(&cafe(category.id), &[tag.id])
			.await
			.unwrap();

		assert!(repository.delete_category(category.id).await.unwrap());
		assert!(!repository
			.establishment_exists(establishment.id)
			.await
			.unwrap());
		assert!(repository.state.read().await.associations.is_empty());
		assert!(repository.tag_by_id(tag.id).await.unwrap().is_some());
	}

	#[tokio::test]
	async fn deleting_tag_drops_its_associations() {
		let repository = MemoryRepository::default();
		let category = repository.insert_category(&food()).await.unwrap();
		let first = repository.insert_tag(&popular()).await.unwrap();
		let second = repository.insert_tag(&popular()).await.unwrap();
		let establishment = repository
			.insert_establishment(&cafe(category.id), &[first.id, second.id])
			.await
			.unwrap();

		assert!(repository.delete_tag(first.id).await.unwrap());
		let loaded = repository
			.establishment_by_id(establishment.id)
			.await
			.unwrap()
			.unwrap();
		assert_eq!(
			loaded.tags,
			[models::EstablishmentTag {
				establishment_id: establishment.id,
				tag_id: second.id,
			}]
		);
	}

	#[tokio::test]
	async fn update_of_missing_row_reports_false() {
		let repository = MemoryRepository::default();
		let category = repository.insert_category(&food()).await.unwrap();
		assert!(!repository
			.update_establishment(1, &cafe(category.id), Some(&[][..]))
			.await
			.unwrap());
		assert!(!repository.update_tag(1, &popular()).await.unwrap());
		assert!(!repository.delete_establishment(1).await.unwrap());
	}
}
