//! Application assembly: models, route table and the navigation loop.

use crate::chrome::not_found;
use crate::dom::{MemoryRoot, MountTarget};
use crate::error::{AppError, NavigationError};
use crate::handle::ViewHandle;
use crate::history::{Location, MemoryLocation};
use crate::lifecycle::{LifecycleManager, NavigationOutcome};
use crate::navigator::Navigator;
use crate::platform::{Camera, Geolocation, MapWidget};
use crate::presenter::{
	AddStoryPresenter, AuthPresenter, MapPresenter, StoryDetailPresenter, StoryListPresenter,
};
use crate::router::{Params, Router};
use crate::scheduler::{TaskScheduler, TokioScheduler};
use crate::state::{AppEvent, AppState, Subscription};
use crate::view::{AddStoryView, LoginView, RegisterView, StoriesView, StoryDetailView};
use crate::component::View;
use std::sync::Arc;
use std::time::Duration;
use story_api::{
	AuthModel, HttpStoryApi, KeyValueStore, MemoryStore, MemoryStoryDatabase,
	NotificationService, PushManager, StoryApi, StoryDatabase, StoryModel,
};
use story_conf::StorySettings;

type PageResult = Result<ViewHandle, NavigationError>;

/// Device and widget implementations of the host platform.
#[derive(Clone)]
pub struct Platform {
	pub map: Arc<dyn MapWidget>,
	pub camera: Arc<dyn Camera>,
	pub geolocation: Arc<dyn Geolocation>,
	/// Push messaging; notifications are skipped when absent.
	pub push: Option<Arc<dyn PushManager>>,
}

impl std::fmt::Debug for Platform {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Platform")
			.field("push", &self.push.is_some())
			.finish()
	}
}

/// Shared by every route factory.
struct Pages {
	settings: StorySettings,
	platform: Platform,
	auth: Arc<AuthModel>,
	stories: Arc<StoryModel>,
	state: Arc<AppState>,
	navigator: Navigator,
	scheduler: Arc<dyn TaskScheduler>,
	notifications: Option<NotificationService>,
}

impl Pages {
	fn rejected(&self, redirect: &str) -> ViewHandle {
		self.navigator.navigate_to(redirect);
		ViewHandle::new(not_found(&self.settings.router.content_id))
	}

	/// Signed-in users are sent to the story list.
	fn guest_only(&self) -> Option<ViewHandle> {
		self.auth
			.is_authenticated()
			.then(|| self.rejected("/stories"))
	}

	/// Guests are sent to the login page.
	fn members_only(&self) -> Option<ViewHandle> {
		(!self.auth.is_authenticated()).then(|| self.rejected("/login"))
	}

	fn map_presenter(&self) -> Arc<MapPresenter> {
		Arc::new(MapPresenter::new(
			self.platform.map.clone(),
			self.platform.geolocation.clone(),
			Duration::from_millis(self.settings.map.geolocation_timeout_ms),
		))
	}

	async fn login(self: Arc<Self>) -> PageResult {
		if let Some(redirect) = self.guest_only() {
			return Ok(redirect);
		}
		let view = Arc::new(LoginView::new());
		let presenter = AuthPresenter::new(
			self.auth.clone(),
			self.state.clone(),
			self.navigator.clone(),
			view.clone(),
		);
		view.bind_login(presenter.login_handler());
		Ok(ViewHandle::new(view.render())
			.with_presenter(presenter)
			.with_controller(view))
	}

	async fn register(self: Arc<Self>) -> PageResult {
		if let Some(redirect) = self.guest_only() {
			return Ok(redirect);
		}
		let view = Arc::new(RegisterView::new());
		let presenter = AuthPresenter::new(
			self.auth.clone(),
			self.state.clone(),
			self.navigator.clone(),
			view.clone(),
		);
		view.bind_register(presenter.register_handler());
		Ok(ViewHandle::new(view.render())
			.with_presenter(presenter)
			.with_controller(view))
	}

	async fn home(self: Arc<Self>) -> PageResult {
		if let Some(redirect) = self.members_only() {
			return Ok(redirect);
		}
		self.setup_notifications().await;
		self.story_list()
	}

	async fn stories(self: Arc<Self>) -> PageResult {
		if let Some(redirect) = self.members_only() {
			return Ok(redirect);
		}
		self.story_list()
	}

	fn story_list(&self) -> PageResult {
		let view = Arc::new(StoriesView::new());
		let presenter = StoryListPresenter::new(self.stories.clone(), view.clone());
		Ok(ViewHandle::new(view.render())
			.with_presenter(presenter)
			.with_controller(view))
	}

	async fn story_detail(self: Arc<Self>, params: Params) -> PageResult {
		if let Some(redirect) = self.members_only() {
			return Ok(redirect);
		}
		let id = params.require("id")?.to_string();
		let view = Arc::new(StoryDetailView::new(
			self.map_presenter(),
			self.settings.map.detail_zoom,
		));
		let presenter = StoryDetailPresenter::new(
			self.stories.clone(),
			view.clone(),
			self.navigator.clone(),
			id,
		);
		Ok(ViewHandle::new(view.render())
			.with_presenter(presenter)
			.with_controller(view))
	}

	async fn add_story(self: Arc<Self>) -> PageResult {
		let view = Arc::new(AddStoryView::new(
			self.platform.camera.clone(),
			self.map_presenter(),
			self.settings.map.clone(),
		));
		view.listen(&self.state);
		let presenter = AddStoryPresenter::new(
			self.stories.clone(),
			view.clone(),
			self.navigator.clone(),
			self.scheduler.clone(),
			Duration::from_millis(self.settings.router.redirect_delay_ms),
		);
		view.bind_add_story(presenter.add_story_handler());
		Ok(ViewHandle::new(view.render())
			.with_presenter(presenter)
			.with_controller(view))
	}

	async fn logout(self: Arc<Self>) -> PageResult {
		sign_out(&self.auth, &self.state, &self.navigator);
		Ok(ViewHandle::new(View::element("div")))
	}

	async fn not_found(self: Arc<Self>) -> PageResult {
		Ok(ViewHandle::new(not_found(&self.settings.router.content_id)))
	}

	/// Failures are logged and never block the page.
	async fn setup_notifications(&self) {
		let (Some(notifications), Some(token)) = (&self.notifications, self.auth.token()) else {
			return;
		};
		if !notifications.request_permission().await {
			tracing::info!("notification permission not granted");
			return;
		}
		if let Err(e) = notifications.subscribe_user(&token).await {
			tracing::error!(error = %e, "notification setup failed");
		}
	}
}

fn sign_out(auth: &AuthModel, state: &AppState, navigator: &Navigator) {
	auth.logout();
	state.set_authenticated(false);
	navigator.navigate_to("/login");
}

fn route_table(pages: &Arc<Pages>) -> Result<Router, AppError> {
	let p = pages.clone();
	let login = move |_: Params| p.clone().login();
	let p = pages.clone();
	let register = move |_: Params| p.clone().register();
	let p = pages.clone();
	let home = move |_: Params| p.clone().home();
	let p = pages.clone();
	let stories = move |_: Params| p.clone().stories();
	let p = pages.clone();
	let detail = move |params: Params| p.clone().story_detail(params);
	let p = pages.clone();
	let add_story = move |_: Params| p.clone().add_story();
	let p = pages.clone();
	let logout = move |_: Params| p.clone().logout();
	let p = pages.clone();
	let fallback = move |_: Params| p.clone().not_found();

	Ok(Router::builder()
		.route("/login", login)
		.route("/register", register)
		.route("/", home)
		.route("/stories", stories)
		.route("/stories/:id", detail)
		.route("/add-story", add_story)
		.route("/logout", logout)
		.route("*", fallback)
		.build()?)
}

/// Builder for [`StoryApp`].
///
/// Everything but the settings and the platform has an in-memory default;
/// the API defaults to [`HttpStoryApi`] against the configured base URL.
pub struct StoryAppBuilder {
	settings: StorySettings,
	platform: Platform,
	api: Option<Arc<dyn StoryApi>>,
	store: Option<Arc<dyn KeyValueStore>>,
	database: Option<Arc<dyn StoryDatabase>>,
	location: Option<Arc<dyn Location>>,
	root: Option<Arc<dyn MountTarget>>,
	scheduler: Option<Arc<dyn TaskScheduler>>,
}

impl StoryAppBuilder {
	pub fn api(mut self, api: Arc<dyn StoryApi>) -> Self {
		self.api = Some(api);
		self
	}

	pub fn store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
		self.store = Some(store);
		self
	}

	pub fn database(mut self, database: Arc<dyn StoryDatabase>) -> Self {
		self.database = Some(database);
		self
	}

	pub fn location(mut self, location: Arc<dyn Location>) -> Self {
		self.location = Some(location);
		self
	}

	pub fn root(mut self, root: Arc<dyn MountTarget>) -> Self {
		self.root = Some(root);
		self
	}

	pub fn scheduler(mut self, scheduler: Arc<dyn TaskScheduler>) -> Self {
		self.scheduler = Some(scheduler);
		self
	}

	pub fn build(self) -> Result<StoryApp, AppError> {
		self.settings.validate()?;

		let api = match self.api {
			Some(api) => api,
			None => Arc::new(HttpStoryApi::new(&self.settings.api)?),
		};
		let store = self.store.unwrap_or_else(|| Arc::new(MemoryStore::new()));
		let database = self
			.database
			.unwrap_or_else(|| Arc::new(MemoryStoryDatabase::new()));
		let location = self
			.location
			.unwrap_or_else(|| Arc::new(MemoryLocation::default()));
		let root = self.root.unwrap_or_else(|| Arc::new(MemoryRoot::new()));
		let scheduler = self.scheduler.unwrap_or_else(|| Arc::new(TokioScheduler));

		let auth = Arc::new(AuthModel::new(api.clone(), store).with_database(database.clone()));
		let stories = Arc::new(StoryModel::new(api.clone(), auth.clone()).with_database(database));
		let state = AppState::new(auth.is_authenticated());
		let navigator = Navigator::new(location, &self.settings.router);
		let notifications = self.platform.push.clone().map(|manager| {
			NotificationService::new(manager, api, self.settings.push.vapid_public_key.clone())
		});

		let router_settings = self.settings.router.clone();
		let pages = Arc::new(Pages {
			settings: self.settings,
			platform: self.platform,
			auth: auth.clone(),
			stories: stories.clone(),
			state: state.clone(),
			navigator: navigator.clone(),
			scheduler: scheduler.clone(),
			notifications,
		});

		let lifecycle = LifecycleManager::new(
			route_table(&pages)?,
			navigator.clone(),
			root,
			state.clone(),
			&router_settings,
		)
		.with_scheduler(scheduler);

		let logout_listener = {
			let auth = Arc::downgrade(&auth);
			let state_ref = Arc::downgrade(&state);
			state.subscribe(move |event| {
				if *event != AppEvent::LogoutRequested {
					return;
				}
				if let (Some(auth), Some(state)) = (auth.upgrade(), state_ref.upgrade()) {
					sign_out(&auth, &state, &navigator);
				}
			})
		};

		tracing::info!(
			authenticated = state.is_authenticated(),
			"story client assembled"
		);
		Ok(StoryApp {
			lifecycle: Arc::new(lifecycle),
			state,
			auth,
			stories,
			_logout_listener: logout_listener,
		})
	}
}

/// The assembled story client.
pub struct StoryApp {
	lifecycle: Arc<LifecycleManager>,
	state: Arc<AppState>,
	auth: Arc<AuthModel>,
	stories: Arc<StoryModel>,
	_logout_listener: Subscription,
}

impl std::fmt::Debug for StoryApp {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("StoryApp")
			.field("lifecycle", &self.lifecycle)
			.field("state", &self.state)
			.finish()
	}
}

impl StoryApp {
	pub fn builder(settings: StorySettings, platform: Platform) -> StoryAppBuilder {
		StoryAppBuilder {
			settings,
			platform,
			api: None,
			store: None,
			database: None,
			location: None,
			root: None,
			scheduler: None,
		}
	}

	pub fn lifecycle(&self) -> &Arc<LifecycleManager> {
		&self.lifecycle
	}

	pub fn navigator(&self) -> &Navigator {
		self.lifecycle.navigator()
	}

	pub fn state(&self) -> &Arc<AppState> {
		&self.state
	}

	pub fn auth(&self) -> &Arc<AuthModel> {
		&self.auth
	}

	pub fn stories(&self) -> &Arc<StoryModel> {
		&self.stories
	}

	/// Writes the fragment and handles the resulting navigation in place.
	pub async fn navigate(&self, path: &str) -> NavigationOutcome {
		self.navigator().navigate_to(path);
		self.lifecycle.handle_navigation().await
	}

	/// A header link was followed: views holding devices release them first.
	pub fn follow_header_link(&self, path: &str) {
		self.state.emit(AppEvent::HeaderNavigation);
		self.navigator().navigate_to(path);
	}

	/// The header's logout control was activated.
	pub fn request_logout(&self) {
		self.state.emit(AppEvent::LogoutRequested);
	}

	/// Drives navigation from location changes until the location is dropped.
	pub async fn run(&self) {
		self.lifecycle.clone().run().await;
	}
}
