//! Story list view.

use super::{MessageView, Messages, StoriesViewContract};
use crate::component::View;
use parking_lot::Mutex;
use story_api::Story;

const EXCERPT_LEN: usize = 100;

#[derive(Debug, Default)]
struct ListState {
	stories: Vec<Story>,
	loading: bool,
	loaded: bool,
}

#[derive(Debug, Default)]
pub struct StoriesView {
	state: Mutex<ListState>,
	messages: Messages,
}

impl StoriesView {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn messages(&self) -> &Messages {
		&self.messages
	}

	pub fn stories(&self) -> Vec<Story> {
		self.state.lock().stories.clone()
	}

	pub fn is_loading(&self) -> bool {
		self.state.lock().loading
	}

	pub fn render(&self) -> View {
		let state = self.state.lock();
		let grid = if state.loaded && state.stories.is_empty() {
			View::element("p")
				.attr("class", "no-stories")
				.child("No stories found")
				.into()
		} else {
			View::fragment(state.stories.iter().map(story_card).collect::<Vec<_>>())
		};

		View::element("main")
			.attr("role", "main")
			.attr("aria-label", "Stories list")
			.child(View::element("h1").attr("id", "stories-heading").child("Stories"))
			.child(
				View::element("div")
					.attr("id", "stories-container")
					.attr("class", "stories-grid")
					.attr("role", "list")
					.attr("aria-labelledby", "stories-heading")
					.child(grid),
			)
			.child(self.messages.render())
			.child(
				View::element("div")
					.attr("id", "loading-indicator")
					.attr_if(!state.loading, "hidden", "hidden")
					.child("Loading stories..."),
			)
			.into()
	}
}

fn story_card(story: &Story) -> View {
	View::element("article")
		.attr("class", "story-card")
		.attr("data-story-id", story.id.clone())
		.attr("aria-label", format!("Story by {}", story.name))
		.child(
			View::element("img")
				.attr("src", story.photo_url.clone())
				.attr("alt", format!("Story image by {}", story.name))
				.attr("class", "story-image")
				.attr("loading", "lazy"),
		)
		.child(
			View::element("div")
				.attr("class", "story-content")
				.child(View::element("h3").attr("class", "story-title").child(story.name.clone()))
				.child(
					View::element("p")
						.attr("class", "story-description")
						.child(story.excerpt(EXCERPT_LEN)),
				)
				.child(
					View::element("time")
						.attr("datetime", story.created_at.to_rfc3339())
						.attr("class", "story-date")
						.child(story.created_at.format("%-d %B %Y").to_string()),
				)
				.child(
					View::element("a")
						.attr("href", format!("#/stories/{}", story.id))
						.attr("class", "read-more")
						.attr("aria-label", format!("Read more about {}", story.name))
						.child("Read more"),
				),
		)
		.into()
}

impl MessageView for StoriesView {
	fn show_error(&self, message: &str) {
		self.state.lock().loading = false;
		self.messages.show_error(message);
	}

	fn show_success(&self, message: &str) {
		self.messages.show_success(message);
	}
}

impl StoriesViewContract for StoriesView {
	fn show_loading(&self) {
		self.state.lock().loading = true;
		self.messages.clear();
	}

	fn display_stories(&self, stories: &[Story]) {
		let mut state = self.state.lock();
		state.stories = stories.to_vec();
		state.loading = false;
		state.loaded = true;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::{TimeZone, Utc};
	use rstest::rstest;

	fn story(id: &str) -> Story {
		Story {
			id: id.to_string(),
			name: "Dimas".to_string(),
			description: "A".repeat(120),
			photo_url: format!("https://img.example/{id}.jpg"),
			created_at: Utc.with_ymd_and_hms(2024, 3, 5, 8, 0, 0).unwrap(),
			lat: None,
			lon: None,
		}
	}

	#[rstest]
	fn test_cards_link_to_detail() {
		let view = StoriesView::new();
		view.show_loading();
		assert!(view.is_loading());

		view.display_stories(&[story("story-1"), story("story-2")]);
		let rendered = view.render();

		assert!(!view.is_loading());
		let html = rendered.render_to_string();
		assert!(html.contains(r##"href="#/stories/story-2""##));
		assert!(html.contains("5 March 2024"));
		assert!(html.contains(&format!("{}...", "A".repeat(100))));
	}

	#[rstest]
	fn test_empty_list_placeholder() {
		let view = StoriesView::new();
		assert!(!view.render().render_to_string().contains("No stories found"));

		view.display_stories(&[]);

		assert!(view.render().render_to_string().contains("No stories found"));
	}
}
