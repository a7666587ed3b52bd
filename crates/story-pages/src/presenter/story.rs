//! Story list, detail and upload presenters.

use super::Presenter;
use crate::navigator::Navigator;
use crate::scheduler::TaskScheduler;
use crate::view::{AddStoryViewContract, Handler, StoriesViewContract, StoryDetailViewContract};
use async_trait::async_trait;
use futures::future::BoxFuture;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use story_api::{ListQuery, StoryDraft, StoryModel};

fn or_default<'a>(message: &'a str, default: &'a str) -> &'a str {
	if message.is_empty() { default } else { message }
}

/// Loads the first page of stories into the list view.
pub struct StoryListPresenter {
	model: Arc<StoryModel>,
	view: Arc<dyn StoriesViewContract>,
	query: ListQuery,
}

impl StoryListPresenter {
	pub fn new(model: Arc<StoryModel>, view: Arc<dyn StoriesViewContract>) -> Arc<Self> {
		Arc::new(Self {
			model,
			view,
			query: ListQuery::default(),
		})
	}

	pub async fn load_stories(&self) {
		self.view.show_loading();
		match self.model.all_stories(self.query.clone()).await {
			Ok(stories) if !stories.is_empty() => self.view.display_stories(&stories),
			Ok(_) => {
				self.view.display_stories(&[]);
				self.view.show_error("No stories found");
			}
			Err(failure) => self
				.view
				.show_error(or_default(&failure.message, "Failed to load stories")),
		}
	}
}

#[async_trait]
impl Presenter for StoryListPresenter {
	async fn after_render(&self) {
		self.load_stories().await;
	}
}

#[derive(Debug, Default)]
struct DetailState {
	current_id: Option<String>,
	loading: bool,
}

/// Loads one story into the detail view.
pub struct StoryDetailPresenter {
	model: Arc<StoryModel>,
	view: Arc<dyn StoryDetailViewContract>,
	navigator: Navigator,
	story_id: String,
	state: Mutex<DetailState>,
}

impl StoryDetailPresenter {
	pub fn new(
		model: Arc<StoryModel>,
		view: Arc<dyn StoryDetailViewContract>,
		navigator: Navigator,
		story_id: impl Into<String>,
	) -> Arc<Self> {
		Arc::new(Self {
			model,
			view,
			navigator,
			story_id: story_id.into(),
			state: Mutex::new(DetailState::default()),
		})
	}

	/// Loads `id` unless a load is in flight or `id` is already shown.
	///
	/// Returns whether a load ran. A failed load shows the message and
	/// returns to the list.
	pub async fn load_story_detail(&self, id: &str) -> bool {
		{
			let mut state = self.state.lock();
			if state.loading || state.current_id.as_deref() == Some(id) {
				tracing::debug!(story = id, "duplicate detail load ignored");
				return false;
			}
			state.loading = true;
			state.current_id = Some(id.to_string());
		}

		self.view.prepare_map_container();
		match self.model.story_detail(id).await {
			Ok(story) => self.view.display_story_detail(&story),
			Err(failure) => {
				self.view
					.show_error(or_default(&failure.message, "Story not found"));
				self.navigator.navigate_to("/stories");
			}
		}

		self.state.lock().loading = false;
		true
	}
}

#[async_trait]
impl Presenter for StoryDetailPresenter {
	async fn after_render(&self) {
		let id = self.story_id.clone();
		self.load_story_detail(&id).await;
	}

	fn cleanup(&self) {
		self.view.cleanup();
		*self.state.lock() = DetailState::default();
	}
}

/// Uploads a new story and returns to the list.
pub struct AddStoryPresenter {
	model: Arc<StoryModel>,
	view: Arc<dyn AddStoryViewContract>,
	navigator: Navigator,
	scheduler: Arc<dyn TaskScheduler>,
	redirect_delay: Duration,
}

impl AddStoryPresenter {
	pub fn new(
		model: Arc<StoryModel>,
		view: Arc<dyn AddStoryViewContract>,
		navigator: Navigator,
		scheduler: Arc<dyn TaskScheduler>,
		redirect_delay: Duration,
	) -> Arc<Self> {
		Arc::new(Self {
			model,
			view,
			navigator,
			scheduler,
			redirect_delay,
		})
	}

	/// On success confirms, releases the camera and map, and schedules the
	/// redirect to the list.
	pub async fn handle_add_story(&self, draft: StoryDraft) -> bool {
		match self.model.add_story(draft).await {
			Ok(_) => {
				self.view.show_success("Story added successfully!");
				self.view.cleanup();
				let navigator = self.navigator.clone();
				self.scheduler.defer(
					self.redirect_delay,
					Box::new(move || navigator.navigate_to("/stories")),
				);
				true
			}
			Err(failure) => {
				self.view
					.show_error(or_default(&failure.message, "Failed to add story"));
				false
			}
		}
	}

	/// Handler for [`AddStoryView::bind_add_story`](crate::view::AddStoryView::bind_add_story).
	pub fn add_story_handler(self: &Arc<Self>) -> Handler<StoryDraft> {
		let presenter = Arc::downgrade(self);
		Arc::new(move |draft: StoryDraft| -> BoxFuture<'static, ()> {
			let presenter = presenter.clone();
			Box::pin(async move {
				if let Some(presenter) = presenter.upgrade() {
					presenter.handle_add_story(draft).await;
				}
			})
		})
	}
}

#[async_trait]
impl Presenter for AddStoryPresenter {
	async fn after_render(&self) {
		self.view.activate().await;
	}

	fn cleanup(&self) {
		self.view.cleanup();
	}
}
