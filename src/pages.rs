//! Client-side pages
//!
//! Hash routing, the view lifecycle manager and the presenters of every
//! route, rendered into a platform-provided mount target.
//!
//! ## Example
//!
//! ```rust,no_run
//! use story::pages::router::{Params, Router};
//! use story::pages::{NavigationError, View, ViewHandle};
//!
//! async fn home(_params: Params) -> Result<ViewHandle, NavigationError> {
//!     Ok(ViewHandle::new(View::element("main").child("Home")))
//! }
//!
//! let router = Router::builder().route("/", home).route("*", home).build();
//! assert!(router.is_ok());
//! ```

pub use story_pages::*;
