//! # Story Web
//!
//! An offline-capable photo and location story sharing client.
//!
//! The client is split into focused crates, re-exported here behind feature
//! flags:
//!
//! - [`conf`]: layered settings (defaults, TOML file, `STORY_` environment)
//! - [`api`]: REST client, auth and story models, local stores, push helpers
//! - [`pages`]: hash router, view lifecycle manager, presenters and views
//! - [`sw`]: service-worker cache strategy engine
//!
//! ## Feature Flags
//!
//! - `pages` (default) - router, lifecycle and presenters
//! - `sw` (default) - cache strategy engine
//!
//! ## Example
//!
//! ```rust,no_run
//! use story::conf::{EnvSource, SettingsBuilder, TomlFileSource};
//!
//! # fn main() -> Result<(), story::conf::SettingsError> {
//! let settings = SettingsBuilder::new()
//!     .add_source(TomlFileSource::new("story.toml"))
//!     .add_source(EnvSource::new().with_prefix("STORY_"))
//!     .build()?;
//! assert_eq!(settings.router.content_id, "main-content");
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod conf;
#[cfg(feature = "pages")]
pub mod pages;
#[cfg(feature = "sw")]
pub mod sw;
