//! Hash-fragment routing.
//!
//! A [`Router`] is an ordered table of [`Route`]s plus one mandatory catch-all.
//! Matching is first-declared-wins with no specificity ranking:
//!
//! ```
//! use story_pages::router::Router;
//! use story_pages::{NavigationError, ViewHandle, View};
//!
//! async fn page(_params: story_pages::router::Params) -> Result<ViewHandle, NavigationError> {
//!     Ok(ViewHandle::new(View::text("page")))
//! }
//!
//! let router = Router::builder()
//!     .route("/stories/:id", page)
//!     .route("*", page)
//!     .build()
//!     .unwrap();
//!
//! let matched = router.match_path("/stories/42");
//! assert_eq!(matched.params.get("id"), Some("42"));
//! assert!(router.match_path("/nowhere").is_catch_all());
//! ```

mod core;
mod params;
mod pattern;

pub use self::core::{Route, RouteMatch, Router, RouterBuilder, ViewFactory};
pub use params::Params;
pub use pattern::PathPattern;
