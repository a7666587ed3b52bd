//! Ownership of a mounted view and its presenter.

use crate::component::{IntoView, View};
use crate::presenter::Presenter;
use std::any::Any;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

type Cleanup = Box<dyn FnOnce() + Send>;

/// What a view factory hands to the lifecycle manager.
///
/// Owns the view tree, the presenter wired to it, an optional view-level
/// cleanup, and an optional controller object exposing the live view.
pub struct ViewHandle {
	view: View,
	presenter: Option<Arc<dyn Presenter>>,
	cleanup: Option<Cleanup>,
	controller: Option<Arc<dyn Any + Send + Sync>>,
}

impl std::fmt::Debug for ViewHandle {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ViewHandle")
			.field("view", &self.view)
			.field("has_presenter", &self.presenter.is_some())
			.field("has_cleanup", &self.cleanup.is_some())
			.finish()
	}
}

impl ViewHandle {
	pub fn new(view: impl IntoView) -> Self {
		Self {
			view: view.into_view(),
			presenter: None,
			cleanup: None,
			controller: None,
		}
	}

	pub fn with_presenter(mut self, presenter: Arc<dyn Presenter>) -> Self {
		self.presenter = Some(presenter);
		self
	}

	/// Runs when the view is replaced, after the presenter's cleanup.
	pub fn on_cleanup(mut self, cleanup: impl FnOnce() + Send + 'static) -> Self {
		self.cleanup = Some(Box::new(cleanup));
		self
	}

	/// Exposes the live view object while it is mounted.
	pub fn with_controller<T: Any + Send + Sync>(mut self, controller: Arc<T>) -> Self {
		self.controller = Some(controller);
		self
	}

	pub fn view(&self) -> &View {
		&self.view
	}

	pub(crate) fn into_parts(self) -> (View, MountedView) {
		(
			self.view,
			MountedView {
				presenter: self.presenter.map(PresenterSlot::new),
				cleanup: self.cleanup,
				controller: self.controller,
			},
		)
	}

	/// Releases a handle that was never mounted.
	pub(crate) fn discard(self) {
		self.into_parts().1.release();
	}
}

/// A presenter whose cleanup runs at most once.
pub(crate) struct PresenterSlot {
	presenter: Arc<dyn Presenter>,
	cleaned: AtomicBool,
}

impl PresenterSlot {
	fn new(presenter: Arc<dyn Presenter>) -> Arc<Self> {
		Arc::new(Self {
			presenter,
			cleaned: AtomicBool::new(false),
		})
	}

	pub(crate) fn presenter(&self) -> &Arc<dyn Presenter> {
		&self.presenter
	}

	/// Runs the presenter's cleanup unless it already ran.
	pub(crate) fn cleanup_once(&self) -> bool {
		if self.cleaned.swap(true, Ordering::AcqRel) {
			return false;
		}
		self.presenter.cleanup();
		true
	}
}

/// State retained for the current mount.
pub(crate) struct MountedView {
	pub(crate) presenter: Option<Arc<PresenterSlot>>,
	cleanup: Option<Cleanup>,
	pub(crate) controller: Option<Arc<dyn Any + Send + Sync>>,
}

impl MountedView {
	/// Presenter cleanup first, then the view-level cleanup.
	pub(crate) fn release(mut self) {
		if let Some(slot) = &self.presenter {
			slot.cleanup_once();
		}
		if let Some(cleanup) = self.cleanup.take() {
			cleanup();
		}
	}
}
