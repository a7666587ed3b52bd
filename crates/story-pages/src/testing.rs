//! In-memory collaborators for driving pages without a browser.
//!
//! Each fake records what was asked of it so tests can assert on the exact
//! sequence of map, camera and API calls.

use crate::platform::{
	Camera, CameraDevice, CameraStream, Geolocation, MapInstance, MapWidget, Position,
	ResourceError,
};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use story_api::{
	ApiError, ApiMessage, ListQuery, LoginResponse, LoginResult, NewStory, Photo,
	PushSubscription, StoriesResponse, Story, StoryApi, StoryResponse,
};

/// A call made against a [`RecordingMap`].
#[derive(Debug, Clone, PartialEq)]
pub enum MapCall {
	Create {
		container: String,
		center: Position,
		zoom: u8,
	},
	SetView {
		center: Position,
		zoom: u8,
	},
	Marker {
		at: Position,
		popup: String,
	},
	ClearMarkers,
	Remove,
}

/// [`MapWidget`] that records every call of every map it creates.
#[derive(Debug, Default)]
pub struct RecordingMap {
	calls: Arc<Mutex<Vec<MapCall>>>,
	missing: Mutex<Vec<String>>,
}

impl RecordingMap {
	/// Map creation in `container_id` fails as if the element were absent.
	pub fn without_container(self, container_id: &str) -> Self {
		self.missing.lock().push(container_id.to_string());
		self
	}

	pub fn calls(&self) -> Vec<MapCall> {
		self.calls.lock().clone()
	}

	/// Containers maps were created in, in order.
	pub fn created_in(&self) -> Vec<String> {
		self.calls
			.lock()
			.iter()
			.filter_map(|call| match call {
				MapCall::Create { container, .. } => Some(container.clone()),
				_ => None,
			})
			.collect()
	}

	pub fn markers(&self) -> Vec<(Position, String)> {
		self.calls
			.lock()
			.iter()
			.filter_map(|call| match call {
				MapCall::Marker { at, popup } => Some((*at, popup.clone())),
				_ => None,
			})
			.collect()
	}
}

impl MapWidget for RecordingMap {
	fn create(
		&self,
		container_id: &str,
		center: Position,
		zoom: u8,
	) -> Result<Box<dyn MapInstance>, ResourceError> {
		if self.missing.lock().iter().any(|id| id == container_id) {
			return Err(ResourceError::ContainerMissing(container_id.to_string()));
		}
		self.calls.lock().push(MapCall::Create {
			container: container_id.to_string(),
			center,
			zoom,
		});
		Ok(Box::new(RecordedInstance {
			calls: self.calls.clone(),
		}))
	}
}

struct RecordedInstance {
	calls: Arc<Mutex<Vec<MapCall>>>,
}

impl MapInstance for RecordedInstance {
	fn set_view(&mut self, center: Position, zoom: u8) {
		self.calls.lock().push(MapCall::SetView { center, zoom });
	}

	fn add_marker(&mut self, at: Position, popup: &str) {
		self.calls.lock().push(MapCall::Marker {
			at,
			popup: popup.to_string(),
		});
	}

	fn clear_markers(&mut self) {
		self.calls.lock().push(MapCall::ClearMarkers);
	}

	fn remove(&mut self) {
		self.calls.lock().push(MapCall::Remove);
	}
}

#[derive(Debug, Clone)]
enum GeoBehavior {
	At(Position),
	Hanging,
	Failing(ResourceError),
}

/// Scripted [`Geolocation`].
#[derive(Debug, Clone)]
pub struct FakeGeolocation {
	behavior: GeoBehavior,
}

impl FakeGeolocation {
	pub fn at(position: Position) -> Self {
		Self {
			behavior: GeoBehavior::At(position),
		}
	}

	/// Never answers.
	pub fn hanging() -> Self {
		Self {
			behavior: GeoBehavior::Hanging,
		}
	}

	pub fn failing(error: ResourceError) -> Self {
		Self {
			behavior: GeoBehavior::Failing(error),
		}
	}
}

#[async_trait]
impl Geolocation for FakeGeolocation {
	async fn current_position(&self) -> Result<Position, ResourceError> {
		match &self.behavior {
			GeoBehavior::At(position) => Ok(*position),
			GeoBehavior::Hanging => futures::future::pending().await,
			GeoBehavior::Failing(error) => Err(error.clone()),
		}
	}
}

#[derive(Debug, Default)]
struct CameraLog {
	opened: Vec<Option<String>>,
	started: usize,
	stopped: usize,
}

/// Scripted [`Camera`] whose streams capture a fixed JPEG.
#[derive(Debug, Default)]
pub struct FakeCamera {
	devices: Vec<CameraDevice>,
	failing: Vec<String>,
	unavailable: bool,
	log: Arc<Mutex<CameraLog>>,
}

impl FakeCamera {
	pub fn new<'a>(devices: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
		Self {
			devices: devices
				.into_iter()
				.map(|(id, label)| CameraDevice {
					id: id.to_string(),
					label: label.to_string(),
				})
				.collect(),
			..Self::default()
		}
	}

	/// Opening `device_id` fails; opening without a constraint still works.
	pub fn failing_device(mut self, device_id: &str) -> Self {
		self.failing.push(device_id.to_string());
		self
	}

	/// Every open fails.
	pub fn unavailable(mut self) -> Self {
		self.unavailable = true;
		self
	}

	/// Device constraint of each open attempt.
	pub fn opened(&self) -> Vec<Option<String>> {
		self.log.lock().opened.clone()
	}

	/// Streams opened and not yet stopped.
	pub fn live_streams(&self) -> usize {
		let log = self.log.lock();
		log.started - log.stopped
	}

	pub fn stopped(&self) -> usize {
		self.log.lock().stopped
	}
}

#[async_trait]
impl Camera for FakeCamera {
	async fn devices(&self) -> Result<Vec<CameraDevice>, ResourceError> {
		if self.unavailable {
			return Err(ResourceError::Unsupported("camera"));
		}
		Ok(self.devices.clone())
	}

	async fn open(&self, device_id: Option<&str>) -> Result<Box<dyn CameraStream>, ResourceError> {
		let mut log = self.log.lock();
		log.opened.push(device_id.map(str::to_string));
		if self.unavailable {
			return Err(ResourceError::PermissionDenied);
		}
		if let Some(id) = device_id {
			if self.failing.iter().any(|f| f == id) {
				return Err(ResourceError::Failed(format!("device {} is busy", id)));
			}
		}
		log.started += 1;
		Ok(Box::new(FakeStream {
			log: self.log.clone(),
			stopped: false,
		}))
	}
}

struct FakeStream {
	log: Arc<Mutex<CameraLog>>,
	stopped: bool,
}

impl CameraStream for FakeStream {
	fn capture(&mut self) -> Result<Photo, ResourceError> {
		if self.stopped {
			return Err(ResourceError::Failed("stream stopped".to_string()));
		}
		Ok(Photo::jpeg(vec![0xFF, 0xD8, 0xFF, 0xD9]))
	}

	fn stop(&mut self) {
		if !self.stopped {
			self.stopped = true;
			self.log.lock().stopped += 1;
		}
	}
}

/// A request received by [`StubStoryApi`].
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
	Register { email: String },
	Login { email: String },
	ListStories { query: ListQuery, token: Option<String> },
	StoryDetail { id: String },
	AddStory { description: String, guest: bool },
	Subscribe { endpoint: String },
	Unsubscribe { endpoint: String },
}

/// A story dated 2024-01-15 with the given coordinates.
pub fn sample_story(id: &str, lat: Option<f64>, lon: Option<f64>) -> Story {
	Story {
		id: id.to_string(),
		name: "Dimas".to_string(),
		description: format!("Story {} description", id),
		photo_url: format!("https://story-api.dicoding.dev/images/{}.jpg", id),
		created_at: Utc.with_ymd_and_hms(2024, 1, 15, 8, 30, 0).single().unwrap_or_default(),
		lat,
		lon,
	}
}

#[derive(Debug, Default)]
struct StubState {
	stories: Vec<Story>,
	offline: bool,
	login_error: Option<String>,
	upload_error: Option<String>,
	calls: Vec<ApiCall>,
}

/// [`StoryApi`] answering from an in-memory story list.
///
/// Logins succeed with token `token-1` unless rejected; unknown story ids
/// answer with the API's not-found body.
#[derive(Debug, Default)]
pub struct StubStoryApi {
	state: Mutex<StubState>,
}

impl StubStoryApi {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_story(self, story: Story) -> Self {
		self.state.lock().stories.push(story);
		self
	}

	pub fn reject_login(self, message: &str) -> Self {
		self.state.lock().login_error = Some(message.to_string());
		self
	}

	pub fn reject_upload(self, message: &str) -> Self {
		self.state.lock().upload_error = Some(message.to_string());
		self
	}

	/// Every later call fails at the transport level.
	pub fn go_offline(&self) {
		self.state.lock().offline = true;
	}

	pub fn calls(&self) -> Vec<ApiCall> {
		self.state.lock().calls.clone()
	}

	fn record(&self, call: ApiCall) -> Result<(), ApiError> {
		let mut state = self.state.lock();
		state.calls.push(call);
		if state.offline {
			return Err(ApiError::Network("offline".to_string()));
		}
		Ok(())
	}
}

fn ok_message(message: &str) -> ApiMessage {
	ApiMessage {
		error: false,
		message: message.to_string(),
	}
}

#[async_trait]
impl StoryApi for StubStoryApi {
	async fn register(&self, _name: &str, email: &str, _password: &str) -> Result<ApiMessage, ApiError> {
		self.record(ApiCall::Register {
			email: email.to_string(),
		})?;
		Ok(ok_message("User Created"))
	}

	async fn login(&self, email: &str, _password: &str) -> Result<LoginResponse, ApiError> {
		self.record(ApiCall::Login {
			email: email.to_string(),
		})?;
		let rejected = self.state.lock().login_error.clone();
		Ok(match rejected {
			Some(message) => LoginResponse {
				error: true,
				message,
				login_result: None,
			},
			None => LoginResponse {
				error: false,
				message: "success".to_string(),
				login_result: Some(LoginResult {
					user_id: "user-1".to_string(),
					name: "Dimas".to_string(),
					token: "token-1".to_string(),
				}),
			},
		})
	}

	async fn list_stories(
		&self,
		token: Option<String>,
		query: ListQuery,
	) -> Result<StoriesResponse, ApiError> {
		self.record(ApiCall::ListStories { query, token })?;
		Ok(StoriesResponse {
			error: false,
			message: "Stories fetched successfully".to_string(),
			list_story: self.state.lock().stories.clone(),
		})
	}

	async fn story_detail(&self, id: &str, _token: &str) -> Result<StoryResponse, ApiError> {
		self.record(ApiCall::StoryDetail { id: id.to_string() })?;
		let story = self.state.lock().stories.iter().find(|s| s.id == id).cloned();
		Ok(match story {
			Some(story) => StoryResponse {
				error: false,
				message: "Story fetched successfully".to_string(),
				story: Some(story),
			},
			None => StoryResponse {
				error: true,
				message: "Story not found".to_string(),
				story: None,
			},
		})
	}

	async fn add_story(&self, story: &NewStory, _token: &str) -> Result<ApiMessage, ApiError> {
		self.record(ApiCall::AddStory {
			description: story.description.clone(),
			guest: false,
		})?;
		Ok(self.upload_response())
	}

	async fn add_story_guest(&self, story: &NewStory) -> Result<ApiMessage, ApiError> {
		self.record(ApiCall::AddStory {
			description: story.description.clone(),
			guest: true,
		})?;
		Ok(self.upload_response())
	}

	async fn subscribe(
		&self,
		subscription: &PushSubscription,
		_token: &str,
	) -> Result<ApiMessage, ApiError> {
		self.record(ApiCall::Subscribe {
			endpoint: subscription.endpoint.clone(),
		})?;
		Ok(ok_message("Success to subscribe web push notification."))
	}

	async fn unsubscribe(&self, endpoint: &str, _token: &str) -> Result<ApiMessage, ApiError> {
		self.record(ApiCall::Unsubscribe {
			endpoint: endpoint.to_string(),
		})?;
		Ok(ok_message("Success to unsubscribe web push notification."))
	}
}

impl StubStoryApi {
	fn upload_response(&self) -> ApiMessage {
		match self.state.lock().upload_error.clone() {
			Some(message) => ApiMessage {
				error: true,
				message,
			},
			None => ok_message("Story created successfully"),
		}
	}
}
