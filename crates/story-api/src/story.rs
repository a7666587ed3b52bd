//! Story model: list, detail and upload.

use crate::auth::AuthModel;
use crate::client::StoryApi;
use crate::database::StoryDatabase;
use crate::error::{ModelFailure, ModelResult};
use crate::models::{ListQuery, NewStory, Photo, Story};
use std::sync::Arc;

/// Unvalidated upload input as collected by the add-story form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoryDraft {
	pub description: String,
	pub photo: Option<Photo>,
	pub lat: Option<f64>,
	pub lon: Option<f64>,
}

impl StoryDraft {
	fn into_new_story(self) -> ModelResult<NewStory> {
		let description = self.description.trim().to_string();
		match self.photo {
			Some(photo) if !description.is_empty() => Ok(NewStory {
				description,
				photo,
				lat: self.lat,
				lon: self.lon,
			}),
			_ => Err(ModelFailure::new("Description and photo are required")),
		}
	}
}

pub struct StoryModel {
	api: Arc<dyn StoryApi>,
	auth: Arc<AuthModel>,
	database: Option<Arc<dyn StoryDatabase>>,
}

impl StoryModel {
	pub fn new(api: Arc<dyn StoryApi>, auth: Arc<AuthModel>) -> Self {
		Self {
			api,
			auth,
			database: None,
		}
	}

	/// Cache successful list loads locally and serve them when the network is down.
	pub fn with_database(mut self, database: Arc<dyn StoryDatabase>) -> Self {
		self.database = Some(database);
		self
	}

	pub fn auth(&self) -> &Arc<AuthModel> {
		&self.auth
	}

	/// Fetch a page of stories.
	pub async fn all_stories(&self, query: ListQuery) -> ModelResult<Vec<Story>> {
		match self.api.list_stories(self.auth.token(), query).await {
			Ok(response) if !response.error => {
				if let Some(database) = &self.database {
					database.save_stories(&response.list_story).await;
				}
				Ok(response.list_story)
			}
			Ok(response) => Err(ModelFailure::new(non_empty_or(
				response.message,
				"Failed to fetch stories",
			))),
			Err(e) => {
				tracing::error!(error = %e, "failed to fetch stories");
				if let Some(database) = &self.database {
					let cached = database.stories().await;
					if !cached.is_empty() {
						tracing::warn!(count = cached.len(), "serving stories from local database");
						return Ok(cached);
					}
				}
				Err(ModelFailure::new("Network error while fetching stories"))
			}
		}
	}

	/// Fetch a single story. Requires a session.
	pub async fn story_detail(&self, id: &str) -> ModelResult<Story> {
		let Some(token) = self.auth.token() else {
			return Err(ModelFailure::new("Authentication required"));
		};

		match self.api.story_detail(id, &token).await {
			Ok(response) if !response.error => response
				.story
				.ok_or_else(|| ModelFailure::new("Story not found")),
			Ok(response) => Err(ModelFailure::new(non_empty_or(
				response.message,
				"Failed to fetch story",
			))),
			Err(e) => {
				tracing::error!(error = %e, id, "failed to fetch story detail");
				Err(ModelFailure::new("Network error while fetching story"))
			}
		}
	}

	/// Upload a story, as the logged-in user when there is a session, as a
	/// guest otherwise. Returns the success message.
	pub async fn add_story(&self, draft: StoryDraft) -> ModelResult<String> {
		let story = draft.into_new_story()?;

		let response = match self.auth.token() {
			Some(token) => self.api.add_story(&story, &token).await,
			None => self.api.add_story_guest(&story).await,
		};

		match response {
			Ok(response) if !response.error => {
				tracing::info!("story uploaded");
				Ok("Story added successfully".to_string())
			}
			Ok(response) => Err(ModelFailure::new(non_empty_or(
				response.message,
				"Failed to add story",
			))),
			Err(e) => {
				tracing::error!(error = %e, "failed to add story");
				Err(ModelFailure::new("Network error while adding story"))
			}
		}
	}
}

fn non_empty_or(message: String, fallback: &str) -> String {
	if message.is_empty() {
		fallback.to_string()
	} else {
		message
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::auth::MemoryStore;
	use crate::client::MockStoryApi;
	use crate::database::MemoryStoryDatabase;
	use crate::error::ApiError;
	use crate::models::{ApiMessage, StoriesResponse, StoryResponse};
	use chrono::Utc;
	use rstest::rstest;

	fn story(id: &str) -> Story {
		Story {
			id: id.to_string(),
			name: "Dimas".to_string(),
			description: "Lorem Ipsum".to_string(),
			photo_url: "https://example.com/p.jpg".to_string(),
			created_at: Utc::now(),
			lat: None,
			lon: None,
		}
	}

	fn model(api: MockStoryApi, logged_in: bool) -> StoryModel {
		let api: Arc<dyn StoryApi> = Arc::new(api);
		let store = if logged_in {
			MemoryStore::with_entries([("token", "tok")])
		} else {
			MemoryStore::new()
		};
		let auth = Arc::new(AuthModel::new(api.clone(), Arc::new(store)));
		StoryModel::new(api, auth)
	}

	fn draft() -> StoryDraft {
		StoryDraft {
			description: "Morning walk".to_string(),
			photo: Some(Photo::jpeg(vec![1, 2, 3])),
			lat: Some(-6.2),
			lon: Some(106.8),
		}
	}

	#[rstest]
	#[tokio::test]
	async fn test_list_sends_token_and_caches_result() {
		let mut api = MockStoryApi::new();
		api.expect_list_stories()
			.withf(|token, query| token.as_deref() == Some("tok") && query.page == 1)
			.times(1)
			.returning(|_, _| {
				Ok(StoriesResponse {
					error: false,
					message: "Stories fetched successfully".to_string(),
					list_story: vec![story("s1"), story("s2")],
				})
			});
		let database = Arc::new(MemoryStoryDatabase::new());

		let model = model(api, true).with_database(database.clone());
		let stories = model.all_stories(ListQuery::default()).await.unwrap();

		assert_eq!(stories.len(), 2);
		assert_eq!(database.stories().await.len(), 2);
	}

	#[rstest]
	#[tokio::test]
	async fn test_list_falls_back_to_local_database() {
		let mut api = MockStoryApi::new();
		api.expect_list_stories()
			.returning(|_, _| Err(ApiError::Network("offline".to_string())));
		let database = Arc::new(MemoryStoryDatabase::new());
		database.save_stories(&[story("cached")]).await;

		let model = model(api, true).with_database(database);
		let stories = model.all_stories(ListQuery::default()).await.unwrap();

		assert_eq!(stories[0].id, "cached");
	}

	#[rstest]
	#[tokio::test]
	async fn test_list_network_failure_without_cache() {
		let mut api = MockStoryApi::new();
		api.expect_list_stories()
			.returning(|_, _| Err(ApiError::Network("offline".to_string())));

		let failure = model(api, true)
			.all_stories(ListQuery::default())
			.await
			.unwrap_err();

		assert_eq!(failure.message, "Network error while fetching stories");
	}

	#[rstest]
	#[case("", "Failed to fetch stories")]
	#[case("Missing authentication", "Missing authentication")]
	#[tokio::test]
	async fn test_list_api_error_message(#[case] message: &'static str, #[case] expected: &str) {
		let mut api = MockStoryApi::new();
		api.expect_list_stories().returning(move |_, _| {
			Ok(StoriesResponse {
				error: true,
				message: message.to_string(),
				list_story: Vec::new(),
			})
		});

		let failure = model(api, true)
			.all_stories(ListQuery::default())
			.await
			.unwrap_err();

		assert_eq!(failure.message, expected);
	}

	#[rstest]
	#[tokio::test]
	async fn test_detail_requires_session() {
		let mut api = MockStoryApi::new();
		api.expect_story_detail().never();

		let failure = model(api, false).story_detail("7").await.unwrap_err();

		assert_eq!(failure.message, "Authentication required");
	}

	#[rstest]
	#[tokio::test]
	async fn test_detail_requests_id() {
		let mut api = MockStoryApi::new();
		api.expect_story_detail()
			.withf(|id, token| id.starts_with('7') && token.starts_with("tok"))
			.times(1)
			.returning(|id, _| {
				Ok(StoryResponse {
					error: false,
					message: "Story fetched successfully".to_string(),
					story: Some(story(id)),
				})
			});

		let story = model(api, true).story_detail("7").await.unwrap();

		assert_eq!(story.id, "7");
	}

	#[rstest]
	#[case(StoryDraft { photo: None, ..draft() })]
	#[case(StoryDraft { description: "   ".to_string(), ..draft() })]
	#[tokio::test]
	async fn test_add_story_requires_description_and_photo(#[case] input: StoryDraft) {
		let mut api = MockStoryApi::new();
		api.expect_add_story().never();
		api.expect_add_story_guest().never();

		let failure = model(api, true).add_story(input).await.unwrap_err();

		assert_eq!(failure.message, "Description and photo are required");
	}

	#[rstest]
	#[case(true)]
	#[case(false)]
	#[tokio::test]
	async fn test_add_story_picks_endpoint_by_session(#[case] logged_in: bool) {
		let mut api = MockStoryApi::new();
		let ok = || -> Result<ApiMessage, ApiError> {
			Ok(ApiMessage {
				error: false,
				message: "success".to_string(),
			})
		};
		api.expect_add_story()
			.times(usize::from(logged_in))
			.returning(move |story, _| {
				assert_eq!(story.location(), Some((-6.2, 106.8)));
				ok()
			});
		api.expect_add_story_guest()
			.times(usize::from(!logged_in))
			.returning(move |_| ok());

		let message = model(api, logged_in).add_story(draft()).await.unwrap();

		assert_eq!(message, "Story added successfully");
	}
}
