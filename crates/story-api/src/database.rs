//! Local structured store used as an offline read cache.
//!
//! Two collections: `stories` keyed by id with a `created_at` ordering, and
//! `user` holding the single `currentUser` record. Callers use the
//! degrading accessors (`save_stories`, `stories`, ...) which turn every
//! [`StorageError`] into an empty value.

use crate::error::StorageError;
use crate::models::{Story, User};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Key of the single user record.
pub const CURRENT_USER_KEY: &str = "currentUser";

#[async_trait]
pub trait StoryDatabase: Send + Sync {
	/// Upsert stories by id.
	async fn put_stories(&self, stories: &[Story]) -> Result<(), StorageError>;

	/// All stories, newest `created_at` first.
	async fn all_stories(&self) -> Result<Vec<Story>, StorageError>;

	async fn put_user(&self, user: &User) -> Result<(), StorageError>;

	async fn get_user(&self) -> Result<Option<User>, StorageError>;

	async fn delete_user(&self) -> Result<(), StorageError>;

	async fn save_stories(&self, stories: &[Story]) -> bool {
		match self.put_stories(stories).await {
			Ok(()) => true,
			Err(e) => {
				tracing::error!(error = %e, "failed to save stories");
				false
			}
		}
	}

	async fn stories(&self) -> Vec<Story> {
		self.all_stories().await.unwrap_or_else(|e| {
			tracing::error!(error = %e, "failed to read stories");
			Vec::new()
		})
	}

	async fn save_user(&self, user: &User) -> bool {
		match self.put_user(user).await {
			Ok(()) => true,
			Err(e) => {
				tracing::error!(error = %e, "failed to save user data");
				false
			}
		}
	}

	async fn current_user(&self) -> Option<User> {
		self.get_user().await.unwrap_or_else(|e| {
			tracing::error!(error = %e, "failed to read user data");
			None
		})
	}

	async fn clear_user(&self) -> bool {
		match self.delete_user().await {
			Ok(()) => true,
			Err(e) => {
				tracing::error!(error = %e, "failed to clear user data");
				false
			}
		}
	}
}

/// In-memory [`StoryDatabase`].
#[derive(Debug, Default)]
pub struct MemoryStoryDatabase {
	stories: RwLock<HashMap<String, Story>>,
	users: RwLock<HashMap<String, User>>,
	unavailable: bool,
}

impl MemoryStoryDatabase {
	pub fn new() -> Self {
		Self::default()
	}

	/// A database whose every operation fails, as when the platform store
	/// cannot be opened.
	pub fn unavailable() -> Self {
		Self {
			unavailable: true,
			..Self::default()
		}
	}

	fn check(&self) -> Result<(), StorageError> {
		if self.unavailable {
			Err(StorageError::Unavailable("database could not be opened".to_string()))
		} else {
			Ok(())
		}
	}
}

#[async_trait]
impl StoryDatabase for MemoryStoryDatabase {
	async fn put_stories(&self, stories: &[Story]) -> Result<(), StorageError> {
		self.check()?;
		let mut store = self.stories.write();
		for story in stories {
			store.insert(story.id.clone(), story.clone());
		}
		Ok(())
	}

	async fn all_stories(&self) -> Result<Vec<Story>, StorageError> {
		self.check()?;
		let mut stories: Vec<Story> = self.stories.read().values().cloned().collect();
		stories.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
		Ok(stories)
	}

	async fn put_user(&self, user: &User) -> Result<(), StorageError> {
		self.check()?;
		self.users
			.write()
			.insert(CURRENT_USER_KEY.to_string(), user.clone());
		Ok(())
	}

	async fn get_user(&self) -> Result<Option<User>, StorageError> {
		self.check()?;
		Ok(self.users.read().get(CURRENT_USER_KEY).cloned())
	}

	async fn delete_user(&self) -> Result<(), StorageError> {
		self.check()?;
		self.users.write().remove(CURRENT_USER_KEY);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::{TimeZone, Utc};
	use rstest::rstest;

	fn story(id: &str, day: u32) -> Story {
		Story {
			id: id.to_string(),
			name: "Dimas".to_string(),
			description: format!("story {}", id),
			photo_url: format!("https://example.com/{}.jpg", id),
			created_at: Utc.with_ymd_and_hms(2024, 1, day, 8, 0, 0).unwrap(),
			lat: None,
			lon: None,
		}
	}

	#[rstest]
	#[tokio::test]
	async fn test_stories_upsert_by_id_newest_first() {
		let db = MemoryStoryDatabase::new();

		assert!(db.save_stories(&[story("a", 1), story("b", 3)]).await);
		let mut updated = story("a", 5);
		updated.description = "edited".to_string();
		assert!(db.save_stories(&[updated]).await);

		let stories = db.stories().await;
		assert_eq!(stories.len(), 2);
		assert_eq!(stories[0].id, "a");
		assert_eq!(stories[0].description, "edited");
		assert_eq!(stories[1].id, "b");
	}

	#[rstest]
	#[tokio::test]
	async fn test_user_record_round_trip() {
		let db = MemoryStoryDatabase::new();
		let user = User {
			user_id: "u1".to_string(),
			name: "Dimas".to_string(),
		};

		assert_eq!(db.current_user().await, None);
		assert!(db.save_user(&user).await);
		assert_eq!(db.current_user().await, Some(user));
		assert!(db.clear_user().await);
		assert_eq!(db.current_user().await, None);
	}

	#[rstest]
	#[tokio::test]
	async fn test_unavailable_database_degrades() {
		let db = MemoryStoryDatabase::unavailable();

		assert!(!db.save_stories(&[story("a", 1)]).await);
		assert!(db.stories().await.is_empty());
		assert_eq!(db.current_user().await, None);
		assert!(matches!(db.all_stories().await, Err(StorageError::Unavailable(_))));
	}
}
