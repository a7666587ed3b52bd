//! Story Pages - hash router, view lifecycle and presenters of the story client
//!
//! Pages are plain [`View`] trees rendered into a [`MountTarget`]; the host
//! platform supplies the location, the root container and the devices
//! ([`platform`]), so the whole navigation flow runs natively and in tests.
//!
//! ## Architecture
//!
//! - [`router`]: ordered route table with `:name` placeholders and a catch-all
//! - [`lifecycle`]: [`LifecycleManager`], one navigation at a time from
//!   fragment change to mounted, focused view
//! - [`navigator`]: fragment writes and the navigation generation counter
//! - [`handle`]: [`ViewHandle`], what a route factory hands back
//! - [`presenter`]: per-route presenters driving views through contracts
//! - [`view`]: login, register, story list, detail and add-story views
//! - [`chrome`]: skip link, header, footer and the not-found view
//! - [`app`]: [`StoryApp`], the assembled client with guarded routes
//! - `testing` (feature `testing`): in-memory map, camera, geolocation and API fakes
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use story_conf::StorySettings;
//! use story_pages::app::{Platform, StoryApp};
//! use story_pages::platform::Position;
//! use story_pages::testing::{FakeCamera, FakeGeolocation, RecordingMap, StubStoryApi};
//!
//! # async fn run() -> Result<(), story_pages::error::AppError> {
//! let platform = Platform {
//! 	map: Arc::new(RecordingMap::default()),
//! 	camera: Arc::new(FakeCamera::new([("cam-0", "Front")])),
//! 	geolocation: Arc::new(FakeGeolocation::at(Position::new(-6.2, 106.8))),
//! 	push: None,
//! };
//! let app = StoryApp::builder(StorySettings::default(), platform)
//! 	.api(Arc::new(StubStoryApi::new()))
//! 	.build()?;
//!
//! app.navigate("/login").await;
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod chrome;
pub mod component;
pub mod dom;
pub mod error;
pub mod form;
pub mod handle;
pub mod history;
pub mod lifecycle;
pub mod navigator;
pub mod platform;
pub mod presenter;
pub mod router;
pub mod scheduler;
pub mod state;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod transition;
pub mod view;

pub use app::{Platform, StoryApp, StoryAppBuilder};
pub use component::{ElementView, IntoView, View};
pub use dom::{MemoryRoot, MountTarget};
pub use error::{AppError, NavigationError, PathError, RouterError};
pub use handle::ViewHandle;
pub use history::{Location, MemoryLocation};
pub use lifecycle::{LifecycleManager, NavigationOutcome, NavigationPhase};
pub use navigator::Navigator;
pub use router::{Params, Route, RouteMatch, Router};
pub use state::{AppEvent, AppState};
