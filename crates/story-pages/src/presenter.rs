//! Presenters: one per mounted view, mediating between view and models.

mod auth;
mod map;
mod story;

pub use auth::AuthPresenter;
pub use map::MapPresenter;
pub use story::{AddStoryPresenter, StoryDetailPresenter, StoryListPresenter};

use async_trait::async_trait;

/// Lifecycle hooks the lifecycle manager invokes on the current presenter.
#[async_trait]
pub trait Presenter: Send + Sync {
	/// Runs once the view is mounted.
	async fn after_render(&self) {}

	/// Releases resources and resets transient state. Runs before the next
	/// view is constructed.
	fn cleanup(&self) {}
}
