//! Application-wide auth flag and event bus.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

/// Events published across views and the application loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
	/// The authenticated flag was published.
	AuthChanged(bool),
	/// The header's logout control was activated.
	LogoutRequested,
	/// A header navigation link was activated.
	HeaderNavigation,
}

type Listener = Arc<dyn Fn(&AppEvent) + Send + Sync>;

/// Shared client state: whether a user is signed in, plus subscribers.
pub struct AppState {
	authenticated: AtomicBool,
	listeners: Mutex<Vec<(u64, Listener)>>,
	next_id: AtomicU64,
}

impl std::fmt::Debug for AppState {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AppState")
			.field("authenticated", &self.is_authenticated())
			.field("listeners", &self.listeners.lock().len())
			.finish()
	}
}

impl AppState {
	pub fn new(authenticated: bool) -> Arc<Self> {
		Arc::new(Self {
			authenticated: AtomicBool::new(authenticated),
			listeners: Mutex::new(Vec::new()),
			next_id: AtomicU64::new(0),
		})
	}

	pub fn is_authenticated(&self) -> bool {
		self.authenticated.load(Ordering::Acquire)
	}

	/// Stores the flag and publishes [`AppEvent::AuthChanged`].
	pub fn set_authenticated(&self, authenticated: bool) {
		self.authenticated.store(authenticated, Ordering::Release);
		self.emit(AppEvent::AuthChanged(authenticated));
	}

	/// Delivers an event to every subscriber.
	///
	/// Listeners run outside the subscriber lock, so they may subscribe,
	/// unsubscribe or emit.
	pub fn emit(&self, event: AppEvent) {
		let listeners: Vec<Listener> = self
			.listeners
			.lock()
			.iter()
			.map(|(_, l)| l.clone())
			.collect();
		tracing::debug!(?event, listeners = listeners.len(), "app event");
		for listener in listeners {
			listener(&event);
		}
	}

	/// Registers a listener for as long as the returned guard lives.
	pub fn subscribe(
		self: &Arc<Self>,
		listener: impl Fn(&AppEvent) + Send + Sync + 'static,
	) -> Subscription {
		let id = self.next_id.fetch_add(1, Ordering::Relaxed);
		self.listeners.lock().push((id, Arc::new(listener)));
		Subscription {
			id,
			state: Arc::downgrade(self),
		}
	}

	fn unsubscribe(&self, id: u64) {
		self.listeners.lock().retain(|(i, _)| *i != id);
	}
}

/// Unsubscribes on drop.
#[derive(Debug)]
pub struct Subscription {
	id: u64,
	state: Weak<AppState>,
}

impl Drop for Subscription {
	fn drop(&mut self) {
		if let Some(state) = self.state.upgrade() {
			state.unsubscribe(self.id);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_subscription_lifetime() {
		let state = AppState::new(false);
		let seen = Arc::new(Mutex::new(Vec::new()));

		let sink = seen.clone();
		let subscription = state.subscribe(move |e| sink.lock().push(e.clone()));
		state.set_authenticated(true);
		state.emit(AppEvent::HeaderNavigation);
		drop(subscription);
		state.emit(AppEvent::LogoutRequested);

		assert!(state.is_authenticated());
		assert_eq!(
			*seen.lock(),
			vec![AppEvent::AuthChanged(true), AppEvent::HeaderNavigation]
		);
	}

	#[rstest]
	fn test_listener_may_emit() {
		let state = AppState::new(true);
		let inner = state.clone();
		let _logout = state.subscribe(move |e| {
			if *e == AppEvent::LogoutRequested {
				inner.set_authenticated(false);
			}
		});

		state.emit(AppEvent::LogoutRequested);

		assert!(!state.is_authenticated());
	}
}
