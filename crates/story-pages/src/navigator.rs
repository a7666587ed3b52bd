//! Programmatic navigation and the shared current-mount slot.

use crate::handle::{MountedView, PresenterSlot};
use crate::history::{Location, path_from_fragment};
use parking_lot::Mutex;
use std::any::Any;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use story_conf::RouterSettings;

/// The view currently owned by the lifecycle manager.
pub(crate) struct CurrentMount {
	pub(crate) path: String,
	pub(crate) generation: u64,
	pub(crate) mounted: MountedView,
}

struct Shared {
	location: Arc<dyn Location>,
	generation: AtomicU64,
	current: Mutex<Option<CurrentMount>>,
	stateful_paths: Vec<String>,
}

/// Cheap-to-clone handle for changing the route.
///
/// Shared by the lifecycle manager, presenters and application event
/// handlers.
#[derive(Clone)]
pub struct Navigator {
	shared: Arc<Shared>,
}

impl std::fmt::Debug for Navigator {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Navigator")
			.field("fragment", &self.shared.location.fragment())
			.field("generation", &self.generation())
			.finish()
	}
}

impl Navigator {
	pub fn new(location: Arc<dyn Location>, settings: &RouterSettings) -> Self {
		Self {
			shared: Arc::new(Shared {
				location,
				generation: AtomicU64::new(0),
				current: Mutex::new(None),
				stateful_paths: settings.stateful_paths.clone(),
			}),
		}
	}

	pub fn location(&self) -> &Arc<dyn Location> {
		&self.shared.location
	}

	/// Path of the current fragment.
	pub fn current_path(&self) -> String {
		path_from_fragment(&self.shared.location.fragment())
	}

	/// Path of the mounted view, if any.
	pub fn mounted_path(&self) -> Option<String> {
		self.shared.current.lock().as_ref().map(|m| m.path.clone())
	}

	/// Writes `#{path}` to the location.
	///
	/// Leaving a stateful path cleans up its presenter first. The write
	/// supersedes any navigation still in flight; the navigation to `path`
	/// itself runs on the location's change notification.
	pub fn navigate_to(&self, path: &str) {
		let active = self.current_path();
		if self.shared.stateful_paths.iter().any(|p| *p == active) {
			let slot = self
				.shared
				.current
				.lock()
				.as_ref()
				.and_then(|m| m.mounted.presenter.clone());
			if let Some(slot) = slot {
				if slot.cleanup_once() {
					tracing::debug!(path = %active, "cleaned up stateful presenter before navigating");
				}
			}
		}

		let fragment = format!("#{}", path);
		if self.shared.location.fragment() == fragment {
			return;
		}
		self.shared.generation.fetch_add(1, Ordering::SeqCst);
		tracing::info!(from = %active, to = %path, "navigate");
		self.shared.location.set_fragment(&fragment);
	}

	pub(crate) fn generation(&self) -> u64 {
		self.shared.generation.load(Ordering::SeqCst)
	}

	pub(crate) fn is_current(&self, generation: u64) -> bool {
		self.generation() == generation
	}

	/// Takes a fresh generation and the previous mount, atomically.
	pub(crate) fn begin(&self) -> (u64, Option<CurrentMount>) {
		let mut current = self.shared.current.lock();
		let generation = self.shared.generation.fetch_add(1, Ordering::SeqCst) + 1;
		(generation, current.take())
	}

	/// Runs `write` and installs `next` unless `generation` went stale.
	///
	/// On a stale generation nothing is written and `next` is handed back.
	pub(crate) fn commit(
		&self,
		generation: u64,
		next: Option<CurrentMount>,
		write: impl FnOnce(),
	) -> Result<(), Option<CurrentMount>> {
		let replaced = {
			let mut current = self.shared.current.lock();
			if !self.is_current(generation) {
				return Err(next);
			}
			write();
			std::mem::replace(&mut *current, next)
		};
		if let Some(replaced) = replaced {
			replaced.mounted.release();
		}
		Ok(())
	}

	/// Presenter of the mount made by `generation`, if still mounted.
	pub(crate) fn presenter_for(&self, generation: u64) -> Option<Arc<PresenterSlot>> {
		self.shared
			.current
			.lock()
			.as_ref()
			.filter(|m| m.generation == generation)
			.and_then(|m| m.mounted.presenter.clone())
	}

	pub(crate) fn controller<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
		let controller = self
			.shared
			.current
			.lock()
			.as_ref()
			.and_then(|m| m.mounted.controller.clone())?;
		controller.downcast::<T>().ok()
	}
}
