//! Reconciliation of an establishment's tag set.
//!
//! A requested `tagIds` list is always the complete desired state.
//! It is deduplicated and resolved against the tag table in one batch before anything is written, so an unknown ID fails the whole operation and leaves the current associations as they were.

use std::collections::HashSet;

use crate::database::{models, Database};
use crate::error::{self, Error};

/// Tag IDs that all exist, without duplicates, in request order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedTags(Vec<models::TagId>);

impl ResolvedTags {
	pub fn ids(&self) -> &[models::TagId] {
		&self.0
	}

	/// The association rows this set turns into for `establishment_id`.
	pub fn associate(
		&self,
		establishment_id: models::EstablishmentId,
	) -> Vec<models::EstablishmentTag> {
		self
			.0
			.iter()
			.map(|&tag_id| models::EstablishmentTag {
				establishment_id,
				tag_id,
			})
			.collect()
	}
}

/// Collapses repeats, keeping the first occurrence of each ID.
pub fn dedup(requested: &[models::TagId]) -> Vec<models::TagId> {
	let mut seen = HashSet::with_capacity(requested.len());
	requested
		.iter()
		.copied()
		.filter(|id| seen.insert(*id))
		.collect()
}

/// `requested` minus `resolved`, in request order.
pub fn missing(requested: &[models::TagId], resolved: &[models::TagId]) -> Vec<models::TagId> {
	let resolved: HashSet<_> = resolved.iter().copied().collect();
	requested
		.iter()
		.copied()
		.filter(|id| !resolved.contains(id))
		.collect()
}

pub async fn resolve(
	database: &Database,
	requested: &[models::TagId],
) -> Result<ResolvedTags, Error> {
	let requested = dedup(requested);
	if requested.is_empty() {
		return Ok(ResolvedTags::default());
	}

	let found = database
		.existing_tag_ids(&requested)
		.await
		.map_err(Error::storage("resolving tags"))?;
	tracing::debug!(
		requested = requested.len(),
		found = found.len(),
		"resolved tags"
	);

	let missing = missing(&requested, &found);
	if !missing.is_empty() {
		tracing::warn!(?missing, "requested tags do not exist");
		return Err(error::MissingTags(missing).into());
	}

	Ok(ResolvedTags(requested))
}

/// What a full replace changes relative to the current set. Only used for reporting; the write itself is always delete-all-then-insert.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Replacement {
	pub removed: Vec<models::TagId>,
	pub added: Vec<models::TagId>,
	pub kept: usize,
}

impl Replacement {
	pub fn between(current: &[models::TagId], desired: &ResolvedTags) -> Self {
		let removed = missing(current, desired.ids());
		let added = missing(desired.ids(), current);
		let kept = desired.ids().len() - added.len();
		Self {
			removed,
			added,
			kept,
		}
	}

	pub fn is_noop(&self) -> bool {
		self.removed.is_empty() && self.added.is_empty()
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::database::models::tag;
	use crate::database::{MemoryRepository, Repository};

	async fn repository_with_tags(count: usize) -> MemoryRepository {
		let repository = MemoryRepository::default();
		for i in 0..count {
			repository
				.insert_tag(&tag::Create {
					name: format!("tag {i}"),
					description: None,
				})
				.await
				.unwrap();
		}
		repository
	}

	#[test]
	fn dedup_keeps_first_occurrence() {
		assert_eq!(dedup(&[3, 1, 3, 2, 1]), [3, 1, 2]);
		assert!(dedup(&[]).is_empty());
	}

	#[test]
	fn missing_is_difference_in_request_order() {
		assert_eq!(missing(&[5, 1, 4, 2], &[2, 1]), [5, 4]);
		assert!(missing(&[1, 2], &[2, 1, 3]).is_empty());
	}

	#[tokio::test]
	async fn resolve_empty_request() {
		let repository = repository_with_tags(0).await;
		let resolved = resolve(&repository, &[]).await.unwrap();
		assert!(resolved.ids().is_empty());
	}

	#[tokio::test]
	async fn resolve_is_exactly_the_requested_set() {
		let repository = repository_with_tags(3).await;
		let resolved = resolve(&repository, &[3, 1, 3]).await.unwrap();
		assert_eq!(resolved.ids(), [3, 1]);
		assert_eq!(
			resolved.associate(8),
			[
				models::EstablishmentTag {
					establishment_id: 8,
					tag_id: 3
				},
				models::EstablishmentTag {
					establishment_id: 8,
					tag_id: 1
				},
			]
		);
	}

	#[tokio::test]
	async fn resolve_names_missing_ids() {
		let repository = repository_with_tags(1).await;
		match resolve(&repository, &[1, 2, 7, 2]).await {
			Err(Error::MissingTags(error::MissingTags(missing))) => assert_eq!(missing, [2, 7]),
			other => panic!("expected missing tags, got {other:?}"),
		}
	}

	#[test]
	fn replacement_between_sets() {
		let desired = ResolvedTags(vec![3]);
		let replacement = Replacement::between(&[1, 2], &desired);
		assert_eq!(
			replacement,
			Replacement {
				removed: vec![1, 2],
				added: vec![3],
				kept: 0,
			}
		);

		let same = Replacement::between(&[1, 2], &ResolvedTags(vec![2, 1]));
		assert!(same.is_noop());
		assert_eq!(same.kept, 2);
	}
}
