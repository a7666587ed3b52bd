//! Story Conf - layered settings for the story client
//!
//! Settings are assembled from several [`ConfigSource`]s merged in priority
//! order (environment variables > TOML file > defaults), then deserialized
//! into [`StorySettings`] and validated.
//!
//! ## Example
//!
//! ```no_run
//! use story_conf::{SettingsBuilder, sources::{EnvSource, TomlFileSource}};
//!
//! let settings = SettingsBuilder::new()
//!     .add_source(TomlFileSource::new("story.toml"))
//!     .add_source(EnvSource::new().with_prefix("STORY_"))
//!     .build()
//!     .expect("invalid settings");
//!
//! assert_eq!(settings.cache.version, "story-app-cache-v1");
//! ```

pub mod settings;
pub mod sources;

pub use settings::{
	ApiSettings, CacheSettings, MapSettings, PushSettings, RouterSettings, SettingsBuilder,
	SettingsError, StorySettings,
};
pub use sources::{ConfigSource, DefaultSource, EnvSource, SourceError, TomlFileSource};
