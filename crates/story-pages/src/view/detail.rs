//! Story detail view with an optional location map.

use super::{MessageView, Messages, StoryDetailViewContract};
use crate::component::View;
use crate::platform::Position;
use crate::presenter::MapPresenter;
use parking_lot::Mutex;
use std::sync::Arc;
use story_api::Story;

/// Map container id inside the detail view.
pub const DETAIL_MAP_ID: &str = "story-map";

const POPUP_EXCERPT_LEN: usize = 50;

#[derive(Debug, Default)]
struct DetailState {
	story: Option<Story>,
	map_visible: bool,
}

pub struct StoryDetailView {
	map: Arc<MapPresenter>,
	zoom: u8,
	state: Mutex<DetailState>,
	messages: Messages,
}

impl StoryDetailView {
	pub fn new(map: Arc<MapPresenter>, zoom: u8) -> Self {
		Self {
			map,
			zoom,
			state: Mutex::new(DetailState::default()),
			messages: Messages::default(),
		}
	}

	pub fn messages(&self) -> &Messages {
		&self.messages
	}

	pub fn story(&self) -> Option<Story> {
		self.state.lock().story.clone()
	}

	/// Whether the map section is shown.
	pub fn map_visible(&self) -> bool {
		self.state.lock().map_visible
	}

	pub fn render(&self) -> View {
		let state = self.state.lock();
		let body: View = match &state.story {
			Some(story) => View::element("article")
				.attr("class", "detail-story")
				.child(
					View::element("img")
						.attr("id", "story-image")
						.attr("src", story.photo_url.clone())
						.attr("alt", format!("Story by {}", story.name)),
				)
				.child(View::element("h1").attr("id", "story-title").child(story.name.clone()))
				.child(
					View::element("time")
						.attr("id", "story-date")
						.attr("datetime", story.created_at.to_rfc3339())
						.child(story.created_at.format("%A, %-d %B %Y %H:%M").to_string()),
				)
				.child(
					View::element("p")
						.attr("id", "story-description")
						.child(story.description.clone()),
				)
				.into(),
			None => View::element("p").attr("class", "loading").child("Loading story...").into(),
		};

		View::element("main")
			.child(body)
			.child(
				View::element("section")
					.attr("id", "story-map-container")
					.attr("class", "location-section")
					.attr_if(!state.map_visible, "hidden", "hidden")
					.child(View::element("h3").child("Location"))
					.child(View::element("div").attr("id", DETAIL_MAP_ID).attr("class", "detail-map")),
			)
			.child(self.messages.render())
			.into()
	}
}

impl MessageView for StoryDetailView {
	fn show_error(&self, message: &str) {
		self.messages.show_error(message);
	}
}

impl StoryDetailViewContract for StoryDetailView {
	fn prepare_map_container(&self) {
		self.map.remove();
	}

	/// Shows the story; the map is built only when both coordinates are present.
	fn display_story_detail(&self, story: &Story) {
		let location = story.location();
		{
			let mut state = self.state.lock();
			state.story = Some(story.clone());
			state.map_visible = location.is_some();
		}

		let Some((lat, lon)) = location else {
			tracing::debug!(story = %story.id, "story has no location, map hidden");
			return;
		};

		let at = Position::new(lat, lon);
		if self.map.initialize_map(DETAIL_MAP_ID, at, self.zoom) {
			let popup = format!("<b>{}</b><br>{}", story.name, story.excerpt(POPUP_EXCERPT_LEN));
			self.map.add_marker(at, &popup);
		}
	}

	fn cleanup(&self) {
		self.map.remove();
	}
}
