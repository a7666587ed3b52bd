//! Layered settings
//!
//! Sources are merged in priority order: built-in defaults, an optional
//! TOML file, then `STORY_`-prefixed environment variables.

pub use story_conf::*;
