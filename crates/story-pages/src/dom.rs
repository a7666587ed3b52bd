//! Mount targets for composed views.

use crate::component::{ElementView, View};
use parking_lot::Mutex;

/// The root container the lifecycle manager renders into.
pub trait MountTarget: Send + Sync {
	/// Removes every child.
	fn clear(&self);

	/// Appends a view as the last child.
	fn append(&self, view: View);

	/// Moves focus to the first focusable element. Returns `false` when there
	/// is none.
	fn focus_first_focusable(&self) -> bool;
}

/// In-memory [`MountTarget`] recording what was mounted and focused.
#[derive(Debug, Default)]
pub struct MemoryRoot {
	children: Mutex<Vec<View>>,
	focused: Mutex<Option<ElementView>>,
}

impl MemoryRoot {
	pub fn new() -> Self {
		Self::default()
	}

	/// Copy of the mounted children.
	pub fn snapshot(&self) -> View {
		View::Fragment(self.children.lock().clone())
	}

	pub fn child_count(&self) -> usize {
		self.children.lock().len()
	}

	pub fn render_to_string(&self) -> String {
		self.snapshot().render_to_string()
	}

	/// The element that last received focus.
	pub fn focused(&self) -> Option<ElementView> {
		self.focused.lock().clone()
	}
}

impl MountTarget for MemoryRoot {
	fn clear(&self) {
		self.children.lock().clear();
	}

	fn append(&self, view: View) {
		self.children.lock().push(view);
	}

	fn focus_first_focusable(&self) -> bool {
		let target = self.snapshot().first_focusable().cloned();
		let found = target.is_some();
		*self.focused.lock() = target;
		found
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_focus_first_focusable() {
		let root = MemoryRoot::new();
		root.append(View::element("h1").child("Stories").into());
		root.append(
			View::element("main")
				.child(View::element("input").attr("id", "email"))
				.into(),
		);

		assert!(root.focus_first_focusable());
		assert_eq!(root.focused().and_then(|e| e.id().map(str::to_string)), Some("email".to_string()));

		root.clear();
		assert!(!root.focus_first_focusable());
		assert!(root.focused().is_none());
	}
}
