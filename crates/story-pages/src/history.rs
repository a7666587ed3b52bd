//! Navigation fragment (the `#/path` part of the location).

use tokio::sync::watch;

/// The page location as far as routing is concerned.
///
/// Platform bindings feed hash changes into [`set_fragment`](Self::set_fragment);
/// the application loop listens through [`subscribe`](Self::subscribe).
pub trait Location: Send + Sync {
	/// The raw fragment, `#` included when present.
	fn fragment(&self) -> String;

	/// Replaces the fragment. Returns whether it changed; unchanged writes
	/// notify nobody.
	fn set_fragment(&self, fragment: &str) -> bool;

	/// Receiver notified on every fragment change.
	fn subscribe(&self) -> watch::Receiver<String>;
}

/// Route path of a fragment: `#/x` → `/x`, empty → `/`.
pub fn path_from_fragment(fragment: &str) -> String {
	let path = fragment.strip_prefix('#').unwrap_or(fragment);
	if path.is_empty() {
		"/".to_string()
	} else {
		path.to_string()
	}
}

/// In-memory [`Location`].
#[derive(Debug)]
pub struct MemoryLocation {
	fragment: watch::Sender<String>,
}

impl MemoryLocation {
	pub fn new(initial: impl Into<String>) -> Self {
		let (fragment, _) = watch::channel(initial.into());
		Self { fragment }
	}
}

impl Default for MemoryLocation {
	fn default() -> Self {
		Self::new("")
	}
}

impl Location for MemoryLocation {
	fn fragment(&self) -> String {
		self.fragment.borrow().clone()
	}

	fn set_fragment(&self, fragment: &str) -> bool {
		self.fragment.send_if_modified(|current| {
			if current.as_str() == fragment {
				false
			} else {
				*current = fragment.to_string();
				true
			}
		})
	}

	fn subscribe(&self) -> watch::Receiver<String> {
		self.fragment.subscribe()
	}
}
