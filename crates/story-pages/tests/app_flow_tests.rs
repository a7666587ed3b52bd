//! End-to-end flows through the assembled story client
//!
//! Every flow runs over the in-memory platform: recording map, fake camera
//! and geolocation, stub API, memory location and root, manual scheduler.

use parking_lot::Mutex;
use rstest::rstest;
use std::sync::Arc;
use std::time::Duration;
use story_api::{MemoryStore, Story};
use story_conf::StorySettings;
use story_pages::form::{RegisterForm, ValidationError};
use story_pages::platform::Position;
use story_pages::scheduler::ManualScheduler;
use story_pages::testing::{
	ApiCall, FakeCamera, FakeGeolocation, MapCall, RecordingMap, StubStoryApi, sample_story,
};
use story_pages::view::{AddStoryView, LoginView, RegisterView, StoriesView, StoryDetailView};
use story_pages::{AppEvent, MemoryRoot, NavigationOutcome, Platform, StoryApp};

struct Client {
	app: StoryApp,
	api: Arc<StubStoryApi>,
	map: Arc<RecordingMap>,
	camera: Arc<FakeCamera>,
	root: Arc<MemoryRoot>,
	scheduler: Arc<ManualScheduler>,
}

impl Client {
	fn fragment(&self) -> String {
		self.app.navigator().location().fragment()
	}
}

struct ClientBuilder {
	signed_in: bool,
	stories: Vec<Story>,
	camera: FakeCamera,
	login_error: Option<&'static str>,
}

impl ClientBuilder {
	fn new() -> Self {
		Self {
			signed_in: false,
			stories: Vec::new(),
			camera: FakeCamera::new([("cam-0", "Front"), ("cam-1", "Back")]),
			login_error: None,
		}
	}

	fn signed_in(mut self) -> Self {
		self.signed_in = true;
		self
	}

	fn story(mut self, story: Story) -> Self {
		self.stories.push(story);
		self
	}

	fn reject_login(mut self, message: &'static str) -> Self {
		self.login_error = Some(message);
		self
	}

	fn camera(mut self, camera: FakeCamera) -> Self {
		self.camera = camera;
		self
	}

	fn build(self) -> Client {
		let mut api = StubStoryApi::new();
		for story in self.stories {
			api = api.with_story(story);
		}
		if let Some(message) = self.login_error {
			api = api.reject_login(message);
		}
		let api = Arc::new(api);
		let map = Arc::new(RecordingMap::default());
		let camera = Arc::new(self.camera);
		let root = Arc::new(MemoryRoot::new());
		let scheduler = Arc::new(ManualScheduler::new());
		let store = if self.signed_in {
			MemoryStore::with_entries([("token", "token-1")])
		} else {
			MemoryStore::new()
		};

		let platform = Platform {
			map: map.clone(),
			camera: camera.clone(),
			geolocation: Arc::new(FakeGeolocation::at(Position::new(-6.9, 107.6))),
			push: None,
		};
		let app = StoryApp::builder(StorySettings::default(), platform)
			.api(api.clone())
			.store(Arc::new(store))
			.root(root.clone())
			.scheduler(scheduler.clone())
			.build()
			.unwrap();

		Client {
			app,
			api,
			map,
			camera,
			root,
			scheduler,
		}
	}
}

fn mounted(path: &str) -> NavigationOutcome {
	NavigationOutcome::Mounted {
		path: path.to_string(),
	}
}

// ============================================================================
// Authentication
// ============================================================================

/// Tests mismatched passwords never reach the network and show the message
#[rstest]
#[tokio::test]
async fn test_register_password_mismatch() {
	let client = ClientBuilder::new().build();
	assert_eq!(client.app.navigate("/register").await, mounted("/register"));
	let view = client
		.app
		.lifecycle()
		.current_controller::<RegisterView>()
		.unwrap();

	let result = view
		.submit(RegisterForm {
			name: "Dimas".to_string(),
			email: "dimas@example.com".to_string(),
			password: "password123".to_string(),
			confirm_password: "password321".to_string(),
		})
		.await;

	assert_eq!(result, Err(ValidationError::PasswordMismatch));
	assert!(client.api.calls().is_empty());
	assert_eq!(view.messages().error().as_deref(), Some("Passwords don't match!"));
}

/// Tests a successful registration confirms and moves to the login page
#[rstest]
#[tokio::test]
async fn test_register_success_redirects_to_login() {
	let client = ClientBuilder::new().build();
	client.app.navigate("/register").await;
	let view = client
		.app
		.lifecycle()
		.current_controller::<RegisterView>()
		.unwrap();

	view.submit(RegisterForm {
		name: "Dimas".to_string(),
		email: "dimas@example.com".to_string(),
		password: "password123".to_string(),
		confirm_password: "password123".to_string(),
	})
	.await
	.unwrap();

	assert_eq!(
		client.api.calls(),
		vec![ApiCall::Register {
			email: "dimas@example.com".to_string()
		}]
	);
	assert_eq!(
		view.messages().success().as_deref(),
		Some("Registration successful. Please login.")
	);
	assert_eq!(client.fragment(), "#/login");
}

/// Tests login publishes the auth state and lands on the story list
#[rstest]
#[tokio::test]
async fn test_login_then_story_list() {
	let client = ClientBuilder::new()
		.story(sample_story("story-1", None, None))
		.build();
	client.app.navigate("/login").await;
	let login = client
		.app
		.lifecycle()
		.current_controller::<LoginView>()
		.unwrap();

	login.submit("dimas@example.com", "password123").await.unwrap();

	assert!(client.app.state().is_authenticated());
	assert_eq!(client.fragment(), "#/stories");

	let outcome = client.app.lifecycle().handle_navigation().await;
	assert_eq!(outcome, mounted("/stories"));
	let stories = client
		.app
		.lifecycle()
		.current_controller::<StoriesView>()
		.unwrap();
	assert_eq!(stories.stories().len(), 1);
	assert!(client.root.snapshot().find_by_id("logout-button").is_some());
}

/// Tests the signed-in state is published before the fragment moves on
#[rstest]
#[tokio::test]
async fn test_login_publishes_auth_before_navigating() {
	let client = ClientBuilder::new().build();
	client.app.navigate("/login").await;
	let login = client
		.app
		.lifecycle()
		.current_controller::<LoginView>()
		.unwrap();
	let seen = Arc::new(Mutex::new(Vec::new()));
	let location = client.app.navigator().location().clone();
	let _subscription = client.app.state().subscribe({
		let seen = seen.clone();
		move |event| {
			if *event == AppEvent::AuthChanged(true) {
				seen.lock().push(location.fragment());
			}
		}
	});

	login.submit("dimas@example.com", "password123").await.unwrap();

	assert_eq!(*seen.lock(), vec!["#/login".to_string()]);
	assert_eq!(client.fragment(), "#/stories");
}

/// Tests a rejected login shows the API message and stays put
#[rstest]
#[tokio::test]
async fn test_login_rejected() {
	let client = ClientBuilder::new().reject_login("Invalid password").build();
	client.app.navigate("/login").await;
	let login = client
		.app
		.lifecycle()
		.current_controller::<LoginView>()
		.unwrap();

	login.submit("dimas@example.com", "password123").await.unwrap();

	assert!(!client.app.auth().is_authenticated());
	assert!(!client.app.state().is_authenticated());
	assert_eq!(login.messages().error().as_deref(), Some("Invalid password"));
	assert_eq!(client.fragment(), "#/login");
}

/// Tests a short password is rejected before any request
#[rstest]
#[tokio::test]
async fn test_login_short_password() {
	let client = ClientBuilder::new().build();
	client.app.navigate("/login").await;
	let login = client
		.app
		.lifecycle()
		.current_controller::<LoginView>()
		.unwrap();

	let result = login.submit("dimas@example.com", "short").await;

	assert_eq!(
		result,
		Err(ValidationError::TooShort {
			field: "Password",
			min: 8
		})
	);
	assert!(client.api.calls().is_empty());
	assert_eq!(
		login.messages().error().as_deref(),
		Some("Password must be at least 8 characters")
	);
}

// ============================================================================
// Route guards
// ============================================================================

/// Tests guarded routes redirect, superseding the guarded navigation
#[rstest]
#[case(false, "/stories", "/login")]
#[case(false, "/stories/7", "/login")]
#[case(false, "/", "/login")]
#[case(true, "/login", "/stories")]
#[case(true, "/register", "/stories")]
#[tokio::test]
async fn test_route_guards(#[case] signed_in: bool, #[case] path: &str, #[case] target: &str) {
	let builder = ClientBuilder::new();
	let client = (if signed_in { builder.signed_in() } else { builder }).build();

	let outcome = client.app.navigate(path).await;

	assert_eq!(
		outcome,
		NavigationOutcome::Superseded {
			path: path.to_string()
		}
	);
	assert_eq!(client.fragment(), format!("#{}", target));
	assert_eq!(client.app.lifecycle().handle_navigation().await, mounted(target));
}

/// Tests the add-story page is open to guests
#[rstest]
#[tokio::test]
async fn test_add_story_is_unguarded() {
	let client = ClientBuilder::new().build();

	assert_eq!(client.app.navigate("/add-story").await, mounted("/add-story"));
}

/// Tests the logout route and the header's logout control sign out
#[rstest]
#[case(true)]
#[case(false)]
#[tokio::test]
async fn test_logout(#[case] via_route: bool) {
	let client = ClientBuilder::new().signed_in().build();
	client.app.navigate("/stories").await;

	if via_route {
		client.app.navigate("/logout").await;
	} else {
		client.app.request_logout();
	}

	assert!(!client.app.auth().is_authenticated());
	assert!(!client.app.state().is_authenticated());
	assert_eq!(client.fragment(), "#/login");
	client.app.lifecycle().handle_navigation().await;
	assert!(client.root.snapshot().find_by_tag("header").is_none());
}

// ============================================================================
// Story detail
// ============================================================================

/// Tests the detail route loads the routed id and maps only located stories
#[rstest]
#[case(Some(-6.2), Some(106.8), true)]
#[case(Some(0.0), Some(0.0), true)]
#[case(Some(-6.2), None, false)]
#[case(None, None, false)]
#[tokio::test]
async fn test_detail_map_needs_both_coordinates(
	#[case] lat: Option<f64>,
	#[case] lon: Option<f64>,
	#[case] has_map: bool,
) {
	let client = ClientBuilder::new()
		.signed_in()
		.story(sample_story("7", lat, lon))
		.build();

	let outcome = client.app.navigate("/stories/7").await;

	assert_eq!(outcome, mounted("/stories/7"));
	assert_eq!(
		client.api.calls(),
		vec![ApiCall::StoryDetail { id: "7".to_string() }]
	);
	let view = client
		.app
		.lifecycle()
		.current_controller::<StoryDetailView>()
		.unwrap();
	assert_eq!(view.story().map(|s| s.id), Some("7".to_string()));
	assert_eq!(view.map_visible(), has_map);
	if has_map {
		assert_eq!(client.map.created_in(), vec!["story-map"]);
		let markers = client.map.markers();
		assert_eq!(markers.len(), 1);
		assert!(markers[0].1.starts_with("<b>Dimas</b><br>"));
	} else {
		assert!(client.map.created_in().is_empty());
	}
}

/// Tests an unknown story shows the error and returns to the list
#[rstest]
#[tokio::test]
async fn test_missing_story_returns_to_list() {
	let client = ClientBuilder::new().signed_in().build();

	client.app.navigate("/stories/404").await;

	let view = client
		.app
		.lifecycle()
		.current_controller::<StoryDetailView>()
		.unwrap();
	assert_eq!(view.messages().error().as_deref(), Some("Story not found"));
	assert_eq!(client.fragment(), "#/stories");
}

/// Tests leaving the detail page removes its map
#[rstest]
#[tokio::test]
async fn test_leaving_detail_removes_map() {
	let client = ClientBuilder::new()
		.signed_in()
		.story(sample_story("7", Some(-6.2), Some(106.8)))
		.build();
	client.app.navigate("/stories/7").await;

	client.app.navigate("/stories").await;

	assert!(client.map.calls().contains(&MapCall::Remove));
}

// ============================================================================
// Add story
// ============================================================================

async fn open_add_story(client: &Client) -> Arc<AddStoryView> {
	assert_eq!(client.app.navigate("/add-story").await, mounted("/add-story"));
	client
		.app
		.lifecycle()
		.current_controller::<AddStoryView>()
		.unwrap()
}

/// Tests the page activates map and camera once mounted
#[rstest]
#[tokio::test]
async fn test_add_story_activation() {
	let client = ClientBuilder::new().signed_in().build();

	let view = open_add_story(&client).await;

	assert!(view.is_active());
	assert!(view.camera_active());
	assert_eq!(view.devices().len(), 2);
	assert_eq!(client.camera.opened(), vec![Some("cam-0".to_string())]);
	assert_eq!(client.map.created_in(), vec!["map"]);
}

/// Tests a failing device is retried once without the constraint
#[rstest]
#[tokio::test]
async fn test_camera_falls_back_to_any_device() {
	let client = ClientBuilder::new()
		.signed_in()
		.camera(FakeCamera::new([("cam-0", "Front")]).failing_device("cam-0"))
		.build();

	let view = open_add_story(&client).await;

	assert_eq!(client.camera.opened(), vec![Some("cam-0".to_string()), None]);
	assert!(view.camera_active());
}

/// Tests the full upload: photo, map location, description, redirect
#[rstest]
#[tokio::test]
async fn test_upload_story() {
	let client = ClientBuilder::new().signed_in().build();
	let view = open_add_story(&client).await;

	assert!(view.capture_photo());
	assert!(!view.camera_active());
	view.select_location(-6.3, 106.9);
	assert_eq!(view.location_status().as_deref(), Some("Location set: -6.3000, 106.9000"));

	view.submit("  A walk in the park  ").await.unwrap();

	assert!(client.api.calls().contains(&ApiCall::AddStory {
		description: "A walk in the park".to_string(),
		guest: false,
	}));
	assert_eq!(view.messages().success().as_deref(), Some("Story added successfully!"));
	assert!(!view.is_active());
	assert_eq!(client.camera.live_streams(), 0);
	assert!(
		client
			.scheduler
			.pending_delays()
			.contains(&Duration::from_millis(1500))
	);

	client.scheduler.run_pending();
	assert_eq!(client.fragment(), "#/stories");
}

/// Tests a guest upload goes to the guest endpoint
#[rstest]
#[tokio::test]
async fn test_guest_upload() {
	let client = ClientBuilder::new().build();
	let view = open_add_story(&client).await;
	view.capture_photo();
	view.select_location(-6.3, 106.9);

	view.submit("Guest story").await.unwrap();

	assert!(client.api.calls().contains(&ApiCall::AddStory {
		description: "Guest story".to_string(),
		guest: true,
	}));
}

/// Tests validation runs in order: photo, description, location
#[rstest]
#[tokio::test]
async fn test_upload_validation_order() {
	let client = ClientBuilder::new().signed_in().build();
	let view = open_add_story(&client).await;

	assert_eq!(view.submit("text").await, Err(ValidationError::MissingPhoto));
	view.capture_photo();
	assert_eq!(view.submit("   ").await, Err(ValidationError::MissingDescription));
	assert_eq!(view.submit("text").await, Err(ValidationError::MissingLocation));
	assert!(client.api.calls().is_empty());
	assert_eq!(view.messages().error().as_deref(), Some("Please select a location"));
}

/// Tests the device position can be used as the story location
#[rstest]
#[tokio::test]
async fn test_use_current_location() {
	let client = ClientBuilder::new().signed_in().build();
	let view = open_add_story(&client).await;

	assert!(view.use_current_location().await);

	assert_eq!(view.location(), Some(Position::new(-6.9, 107.6)));
	assert_eq!(
		view.messages().success().as_deref(),
		Some("Current location obtained!")
	);
	assert_eq!(
		client.map.markers(),
		vec![(Position::new(-6.9, 107.6), "Current location".to_string())]
	);
}

/// Tests following a header link releases the camera before navigating
#[rstest]
#[tokio::test]
async fn test_header_navigation_stops_camera() {
	let client = ClientBuilder::new().signed_in().build();
	let view = open_add_story(&client).await;
	assert_eq!(client.camera.live_streams(), 1);

	client.app.follow_header_link("/stories");

	assert_eq!(client.camera.live_streams(), 0);
	assert!(!view.is_active());
	assert_eq!(client.fragment(), "#/stories");
}
