//! Remote story API client.
//!
//! [`StoryApi`] is the seam the models depend on; [`HttpStoryApi`] is the
//! `reqwest` implementation against the real service.

use crate::error::ApiError;
use crate::models::{
	ApiMessage, ListQuery, LoginResponse, NewStory, PushSubscription, StoriesResponse,
	StoryResponse,
};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, multipart};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;
use story_conf::ApiSettings;

/// Remote story API.
///
/// Every call returns the decoded body whether or not the API flagged an
/// error; callers inspect `error`/`message` themselves.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoryApi: Send + Sync {
	/// `POST /register`
	async fn register(&self, name: &str, email: &str, password: &str) -> Result<ApiMessage, ApiError>;

	/// `POST /login`
	async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError>;

	/// `GET /stories?page&size&location`
	async fn list_stories(
		&self,
		token: Option<String>,
		query: ListQuery,
	) -> Result<StoriesResponse, ApiError>;

	/// `GET /stories/{id}`
	async fn story_detail(&self, id: &str, token: &str) -> Result<StoryResponse, ApiError>;

	/// `POST /stories` (multipart, bearer)
	async fn add_story(&self, story: &NewStory, token: &str) -> Result<ApiMessage, ApiError>;

	/// `POST /stories/guest` (multipart)
	async fn add_story_guest(&self, story: &NewStory) -> Result<ApiMessage, ApiError>;

	/// `POST /notifications/subscribe`
	async fn subscribe(
		&self,
		subscription: &PushSubscription,
		token: &str,
	) -> Result<ApiMessage, ApiError>;

	/// `DELETE /notifications/subscribe`
	async fn unsubscribe(&self, endpoint: &str, token: &str) -> Result<ApiMessage, ApiError>;
}

/// `reqwest`-backed [`StoryApi`].
///
/// # Examples
///
/// ```no_run
/// use story_api::{HttpStoryApi, StoryApi};
/// use story_conf::ApiSettings;
///
/// # async fn run() -> Result<(), story_api::ApiError> {
/// let api = HttpStoryApi::new(&ApiSettings::default())?;
/// let response = api.login("dimas@example.com", "secret123").await?;
/// assert!(!response.error);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpStoryApi {
	base_url: String,
	client: Client,
}

impl HttpStoryApi {
	/// Create a client for the configured base URL.
	pub fn new(settings: &ApiSettings) -> Result<Self, ApiError> {
		let client = Client::builder()
			.timeout(Duration::from_secs(30))
			.build()
			.map_err(|e| ApiError::Network(format!("failed to create HTTP client: {}", e)))?;

		Ok(Self::with_client(&settings.base_url, client))
	}

	/// Create a client reusing an existing `reqwest::Client`.
	pub fn with_client(base_url: &str, client: Client) -> Self {
		Self {
			base_url: base_url.trim_end_matches('/').to_string(),
			client,
		}
	}

	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	fn endpoint(&self, path: &str) -> String {
		format!("{}/{}", self.base_url, path.trim_start_matches('/'))
	}

	fn story_form(story: &NewStory) -> Result<multipart::Form, ApiError> {
		let part = multipart::Part::bytes(story.photo.bytes.to_vec())
			.file_name(story.photo.file_name.clone())
			.mime_str(&story.photo.mime)?;

		let mut form = multipart::Form::new()
			.text("description", story.description.clone())
			.part("photo", part);

		if let Some((lat, lon)) = story.location() {
			form = form.text("lat", lat.to_string()).text("lon", lon.to_string());
		}

		Ok(form)
	}

	async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
		let response = request.send().await?;
		let status = response.status();
		let body = response.bytes().await?;

		match serde_json::from_slice::<T>(&body) {
			Ok(decoded) => Ok(decoded),
			Err(_) if !status.is_success() => Err(ApiError::Status {
				status: status.as_u16(),
			}),
			Err(e) => Err(ApiError::Decode(e.to_string())),
		}
	}
}

#[async_trait]
impl StoryApi for HttpStoryApi {
	async fn register(&self, name: &str, email: &str, password: &str) -> Result<ApiMessage, ApiError> {
		tracing::debug!(email, "POST /register");
		let request = self
			.client
			.post(self.endpoint("register"))
			.json(&json!({ "name": name, "email": email, "password": password }));
		self.send(request).await
	}

	async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
		tracing::debug!(email, "POST /login");
		let request = self
			.client
			.post(self.endpoint("login"))
			.json(&json!({ "email": email, "password": password }));
		self.send(request).await
	}

	async fn list_stories(
		&self,
		token: Option<String>,
		query: ListQuery,
	) -> Result<StoriesResponse, ApiError> {
		tracing::debug!(page = query.page, size = query.size, "GET /stories");
		let mut request = self
			.client
			.get(self.endpoint("stories"))
			.query(&query.to_pairs());
		if let Some(token) = token {
			request = request.bearer_auth(token);
		}
		self.send(request).await
	}

	async fn story_detail(&self, id: &str, token: &str) -> Result<StoryResponse, ApiError> {
		tracing::debug!(id, "GET /stories/:id");
		let request = self
			.client
			.get(self.endpoint(&format!("stories/{}", id)))
			.bearer_auth(token);
		self.send(request).await
	}

	async fn add_story(&self, story: &NewStory, token: &str) -> Result<ApiMessage, ApiError> {
		tracing::debug!("POST /stories");
		let request = self
			.client
			.post(self.endpoint("stories"))
			.bearer_auth(token)
			.multipart(Self::story_form(story)?);
		self.send(request).await
	}

	async fn add_story_guest(&self, story: &NewStory) -> Result<ApiMessage, ApiError> {
		tracing::debug!("POST /stories/guest");
		let request = self
			.client
			.post(self.endpoint("stories/guest"))
			.multipart(Self::story_form(story)?);
		self.send(request).await
	}

	async fn subscribe(
		&self,
		subscription: &PushSubscription,
		token: &str,
	) -> Result<ApiMessage, ApiError> {
		tracing::debug!(endpoint = %subscription.endpoint, "POST /notifications/subscribe");
		let request = self
			.client
			.post(self.endpoint("notifications/subscribe"))
			.bearer_auth(token)
			.json(subscription);
		self.send(request).await
	}

	async fn unsubscribe(&self, endpoint: &str, token: &str) -> Result<ApiMessage, ApiError> {
		tracing::debug!(endpoint, "DELETE /notifications/subscribe");
		let request = self
			.client
			.delete(self.endpoint("notifications/subscribe"))
			.bearer_auth(token)
			.json(&json!({ "endpoint": endpoint }));
		self.send(request).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::models::Photo;
	use rstest::rstest;

	fn new_story(lat: Option<f64>, lon: Option<f64>) -> NewStory {
		NewStory {
			description: "Sunset at the harbour".to_string(),
			photo: Photo::jpeg(vec![0xFF, 0xD8, 0xFF]),
			lat,
			lon,
		}
	}

	#[rstest]
	#[case("https://story-api.dicoding.dev/v1", "stories", "https://story-api.dicoding.dev/v1/stories")]
	#[case("https://story-api.dicoding.dev/v1/", "/login", "https://story-api.dicoding.dev/v1/login")]
	fn test_endpoint_join(#[case] base: &str, #[case] path: &str, #[case] expected: &str) {
		let api = HttpStoryApi::with_client(base, Client::new());
		assert_eq!(api.endpoint(path), expected);
	}

	#[rstest]
	fn test_new_uses_configured_base_url() {
		let api = HttpStoryApi::new(&ApiSettings::default()).unwrap();
		assert_eq!(api.base_url(), "https://story-api.dicoding.dev/v1");
	}

	#[rstest]
	#[case(Some(-6.2), Some(106.8))]
	#[case(Some(-6.2), None)]
	#[case(None, None)]
	fn test_story_form_builds(#[case] lat: Option<f64>, #[case] lon: Option<f64>) {
		let form = HttpStoryApi::story_form(&new_story(lat, lon));
		assert!(form.is_ok());
	}

	#[rstest]
	fn test_story_form_rejects_bad_mime() {
		let mut story = new_story(None, None);
		story.photo.mime = "not a mime\n".to_string();

		assert!(HttpStoryApi::story_form(&story).is_err());
	}

	#[tokio::test]
	async fn test_mock_api_returns_scripted_login() {
		let mut api = MockStoryApi::new();
		api.expect_login()
			.withf(|email, _| email.starts_with("dimas@"))
			.times(1)
			.returning(|_, _| {
				Ok(LoginResponse {
					error: true,
					message: "Invalid password".to_string(),
					login_result: None,
				})
			});

		let response = api.login("dimas@example.com", "wrong").await.unwrap();
		assert!(response.error);
	}
}
