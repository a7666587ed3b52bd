//! View lifecycle manager.
//!
//! Drives one navigation at a time through
//! `Idle → Resolving → Transitioning → Mounted`:
//!
//! 1. read the path from the fragment and resolve it against the [`Router`];
//! 2. clean up the previous presenter, then the previous view;
//! 3. inside the [`ViewTransition`], stage skip link and header, await the
//!    route's view factory, then stage content and footer;
//! 4. commit the staged views to the root unless a newer navigation started
//!    meanwhile;
//! 5. schedule focus restoration and run the presenter's post-render hook.
//!
//! Factory failures and unattachable views end in the layout's fallback view;
//! nothing escapes [`LifecycleManager::handle_navigation`].

use crate::chrome::{DefaultLayout, Layout};
use crate::component::View;
use crate::dom::MountTarget;
use crate::error::NavigationError;
use crate::handle::ViewHandle;
use crate::navigator::{CurrentMount, Navigator};
use crate::router::{RouteMatch, Router};
use crate::scheduler::{TaskScheduler, TokioScheduler};
use crate::state::AppState;
use crate::transition::{PassThroughTransition, ViewTransition};
use parking_lot::Mutex;
use std::any::Any;
use std::sync::Arc;
use std::time::Duration;
use story_conf::RouterSettings;

/// Where the manager is in handling a navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationPhase {
	Idle,
	Resolving,
	Transitioning,
	Mounted,
}

/// How a navigation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
	/// The route's view is mounted.
	Mounted { path: String },
	/// Routing failed and the fallback view is mounted.
	Fallback { path: String, reason: String },
	/// A newer navigation started first; nothing was written.
	Superseded { path: String },
}

/// Mounts routed views into a root container.
pub struct LifecycleManager {
	router: Router,
	navigator: Navigator,
	root: Arc<dyn MountTarget>,
	state: Arc<AppState>,
	layout: Arc<dyn Layout>,
	scheduler: Arc<dyn TaskScheduler>,
	transition: Arc<dyn ViewTransition>,
	bare_paths: Vec<String>,
	content_id: String,
	focus_delay: Duration,
	phase: Mutex<NavigationPhase>,
}

impl std::fmt::Debug for LifecycleManager {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("LifecycleManager")
			.field("router", &self.router)
			.field("phase", &self.phase())
			.field("mounted_path", &self.navigator.mounted_path())
			.finish()
	}
}

impl LifecycleManager {
	pub fn new(
		router: Router,
		navigator: Navigator,
		root: Arc<dyn MountTarget>,
		state: Arc<AppState>,
		settings: &RouterSettings,
	) -> Self {
		Self {
			router,
			navigator,
			root,
			state,
			layout: Arc::new(DefaultLayout),
			scheduler: Arc::new(TokioScheduler),
			transition: Arc::new(PassThroughTransition),
			bare_paths: settings.bare_paths.clone(),
			content_id: settings.content_id.clone(),
			focus_delay: Duration::from_millis(settings.focus_delay_ms),
			phase: Mutex::new(NavigationPhase::Idle),
		}
	}

	pub fn with_layout(mut self, layout: Arc<dyn Layout>) -> Self {
		self.layout = layout;
		self
	}

	pub fn with_scheduler(mut self, scheduler: Arc<dyn TaskScheduler>) -> Self {
		self.scheduler = scheduler;
		self
	}

	pub fn with_transition(mut self, transition: Arc<dyn ViewTransition>) -> Self {
		self.transition = transition;
		self
	}

	pub fn navigator(&self) -> &Navigator {
		&self.navigator
	}

	pub fn phase(&self) -> NavigationPhase {
		*self.phase.lock()
	}

	/// Path of the mounted view.
	pub fn mounted_path(&self) -> Option<String> {
		self.navigator.mounted_path()
	}

	/// The live view object of the current mount, when it exposes one of type `T`.
	pub fn current_controller<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
		self.navigator.controller::<T>()
	}

	/// Handles the navigation to the location's current path.
	pub async fn handle_navigation(&self) -> NavigationOutcome {
		let path = self.navigator.current_path();
		self.set_phase(NavigationPhase::Resolving);

		let matched = self.router.match_path(&path);
		tracing::debug!(
			path = %path,
			route = %matched.route.pattern(),
			"resolved route"
		);

		let (generation, previous) = self.navigator.begin();
		if let Some(previous) = previous {
			tracing::debug!(path = %previous.path, "tearing down previous view");
			previous.mounted.release();
		}

		self.set_phase(NavigationPhase::Transitioning);
		let outcome = self
			.transition
			.run(Box::pin(self.compose(path.clone(), matched, generation)))
			.await;

		match &outcome {
			NavigationOutcome::Mounted { .. } => {
				self.set_phase(NavigationPhase::Mounted);
				if let Some(slot) = self.navigator.presenter_for(generation) {
					slot.presenter().after_render().await;
				}
			}
			NavigationOutcome::Fallback { .. } => self.set_phase(NavigationPhase::Idle),
			NavigationOutcome::Superseded { .. } => {
				tracing::debug!(path = %path, generation, "navigation superseded");
			}
		}
		outcome
	}

	/// Handles the initial location, then every fragment change until the
	/// location is dropped. Each change runs as its own task so a newer
	/// navigation can supersede a slow one.
	pub async fn run(self: Arc<Self>) {
		let mut changes = self.navigator.location().subscribe();
		self.handle_navigation().await;

		while changes.changed().await.is_ok() {
			changes.borrow_and_update();
			let manager = self.clone();
			tokio::spawn(async move {
				manager.handle_navigation().await;
			});
		}
	}

	async fn compose(&self, path: String, matched: RouteMatch, generation: u64) -> NavigationOutcome {
		let mut staged = vec![self.layout.skip_link(&self.content_id)];
		if !self.bare_paths.iter().any(|p| *p == path) {
			staged.push(self.layout.header(self.state.is_authenticated()));
		}

		let handle = match matched.route.render(matched.params).await {
			Ok(handle) if handle.view().is_attachable() => handle,
			Ok(handle) => {
				handle.discard();
				let error = NavigationError::NotAttachable { path: path.clone() };
				return self.fail(path, generation, error);
			}
			Err(error) => return self.fail(path, generation, error),
		};

		self.mount(path, generation, handle, staged)
	}

	fn mount(
		&self,
		path: String,
		generation: u64,
		handle: ViewHandle,
		mut staged: Vec<View>,
	) -> NavigationOutcome {
		let (view, mounted) = handle.into_parts();
		staged.push(content_region(view, &self.content_id));
		staged.push(self.layout.footer());

		let next = CurrentMount {
			path: path.clone(),
			generation,
			mounted,
		};
		let committed = self.navigator.commit(generation, Some(next), || {
			self.root.clear();
			for view in staged {
				self.root.append(view);
			}
		});

		match committed {
			Ok(()) => {
				self.schedule_focus(generation);
				tracing::info!(path = %path, "view mounted");
				NavigationOutcome::Mounted { path }
			}
			Err(next) => {
				if let Some(next) = next {
					next.mounted.release();
				}
				NavigationOutcome::Superseded { path }
			}
		}
	}

	fn fail(&self, path: String, generation: u64, error: NavigationError) -> NavigationOutcome {
		let committed = self.navigator.commit(generation, None, || {
			self.root.clear();
			self.root.append(self.layout.fallback(&self.content_id));
		});

		match committed {
			Ok(()) => {
				tracing::error!(path = %path, error = %error, "routing failed, rendered fallback view");
				NavigationOutcome::Fallback {
					path,
					reason: error.to_string(),
				}
			}
			Err(_) => NavigationOutcome::Superseded { path },
		}
	}

	fn schedule_focus(&self, generation: u64) {
		let navigator = self.navigator.clone();
		let root = self.root.clone();
		self.scheduler.defer(
			self.focus_delay,
			Box::new(move || {
				if navigator.is_current(generation) && !root.focus_first_focusable() {
					tracing::debug!("nothing focusable after mount");
				}
			}),
		);
	}

	fn set_phase(&self, phase: NavigationPhase) {
		*self.phase.lock() = phase;
	}
}

/// Gives the content region the skip-link target id when it has none.
///
/// The region is the first `<main>` of the view, else the view root; roots
/// that are not elements are wrapped in a `<div>`.
fn content_region(mut view: View, id: &str) -> View {
	if let Some(main) = view.find_by_tag_mut("main") {
		if main.id().is_none() {
			main.set_attr("id", id.to_string());
		}
		return view;
	}

	match view {
		View::Element(mut el) => {
			if el.id().is_none() {
				el.set_attr("id", id.to_string());
			}
			View::Element(el)
		}
		other => View::element("div")
			.attr("id", id.to_string())
			.child(other)
			.into(),
	}
}
