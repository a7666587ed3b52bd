//! Views and the contracts presenters drive them through.
//!
//! Each view owns its live state behind a lock and renders a [`View`] tree
//! from it on demand. Presenters only see the contract traits below; every
//! optional operation has a no-op default.

mod add_story;
mod auth;
mod detail;
mod stories;

pub use add_story::AddStoryView;
pub use auth::{LoginView, RegisterView};
pub use detail::StoryDetailView;
pub use stories::StoriesView;

use crate::component::View;
use async_trait::async_trait;
use futures::future::BoxFuture;
use parking_lot::Mutex;
use std::sync::Arc;
use story_api::Story;

/// Callback a view invokes with validated input.
pub type Handler<T> = Arc<dyn Fn(T) -> BoxFuture<'static, ()> + Send + Sync>;

/// Transient user-facing messages.
pub trait MessageView: Send + Sync {
	fn show_error(&self, _message: &str) {}
	fn show_success(&self, _message: &str) {}
}

pub trait AuthViewContract: MessageView {}

pub trait StoriesViewContract: MessageView {
	fn show_loading(&self) {}
	fn display_stories(&self, stories: &[Story]);
}

pub trait StoryDetailViewContract: MessageView {
	/// Drops any map left from a previous story.
	fn prepare_map_container(&self) {}
	fn display_story_detail(&self, story: &Story);
	fn cleanup(&self) {}
}

#[async_trait]
pub trait AddStoryViewContract: MessageView {
	/// Acquires the camera and map once the view is mounted.
	async fn activate(&self) {}
	/// Releases the camera and map.
	fn cleanup(&self) {}
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct MessageState {
	error: Option<String>,
	success: Option<String>,
}

/// Error and success regions shared by every view.
#[derive(Debug, Default)]
pub struct Messages {
	state: Mutex<MessageState>,
}

impl Messages {
	/// Shows an error, hiding any success message.
	pub fn show_error(&self, message: &str) {
		let mut state = self.state.lock();
		state.error = Some(message.to_string());
		state.success = None;
	}

	/// Shows a success message, hiding any error.
	pub fn show_success(&self, message: &str) {
		let mut state = self.state.lock();
		state.success = Some(message.to_string());
		state.error = None;
	}

	pub fn clear(&self) {
		*self.state.lock() = MessageState::default();
	}

	pub fn error(&self) -> Option<String> {
		self.state.lock().error.clone()
	}

	pub fn success(&self) -> Option<String> {
		self.state.lock().success.clone()
	}

	pub fn render(&self) -> View {
		let state = self.state.lock().clone();
		View::fragment(vec![
			region("error-message", "error-message", state.error),
			region("success-message", "success-message", state.success),
		])
	}
}

fn region(id: &'static str, class: &'static str, text: Option<String>) -> View {
	View::element("div")
		.attr("id", id)
		.attr("class", class)
		.attr("role", "status")
		.attr_if(text.is_none(), "hidden", "hidden")
		.child(text)
		.into()
}

/// Form field with label.
fn field(id: &'static str, label: &'static str, input: View) -> View {
	View::element("div")
		.attr("class", "form-group")
		.child(View::element("label").attr("for", id).child(label))
		.child(input)
		.into()
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_messages_are_exclusive() {
		let messages = Messages::default();
		messages.show_error("boom");
		messages.show_success("done");

		assert_eq!(messages.error(), None);
		assert_eq!(messages.success().as_deref(), Some("done"));
		assert_eq!(messages.render().find_by_id("success-message").unwrap().get_attr("hidden"), None);
		assert_eq!(
			messages.render().find_by_id("error-message").unwrap().get_attr("hidden"),
			Some("hidden")
		);
	}
}
