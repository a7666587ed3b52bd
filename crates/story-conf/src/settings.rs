//! Typed settings and the builder that assembles them from sources.

use crate::sources::{ConfigSource, SourceError, merge_value};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

/// Error raised while assembling settings
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	#[error("configuration source '{source_name}' failed: {error}")]
	Source {
		source_name: String,
		#[source]
		error: SourceError,
	},

	#[error("invalid settings: {0}")]
	Deserialize(#[from] serde_json::Error),

	#[error("validation failed: {0}")]
	Validation(String),
}

/// Remote story API settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
	/// Base URL every endpoint is joined onto.
	pub base_url: String,
}

impl Default for ApiSettings {
	fn default() -> Self {
		Self {
			base_url: "https://story-api.dicoding.dev/v1".to_string(),
		}
	}
}

impl ApiSettings {
	/// Returns the serialized origin (`scheme://host[:port]`) of the API.
	///
	/// # Examples
	///
	/// ```
	/// use story_conf::ApiSettings;
	///
	/// let api = ApiSettings::default();
	/// assert_eq!(api.origin().unwrap(), "https://story-api.dicoding.dev");
	/// ```
	pub fn origin(&self) -> Result<String, SettingsError> {
		let url = Url::parse(&self.base_url)
			.map_err(|e| SettingsError::Validation(format!("api.base_url: {}", e)))?;
		Ok(url.origin().ascii_serialization())
	}
}

/// Service-worker cache settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
	/// Versioned name of the single cache store.
	pub version: String,
	/// Page served when a navigation cannot reach the network.
	pub offline_url: String,
	/// Shell assets fetched during install.
	pub precache: Vec<String>,
}

impl Default for CacheSettings {
	fn default() -> Self {
		Self {
			version: "story-app-cache-v1".to_string(),
			offline_url: "/offline.html".to_string(),
			precache: vec![
				"/offline.html".to_string(),
				"/".to_string(),
				"/index.html".to_string(),
				"/assets/styles/main.css".to_string(),
				"/assets/images/logo.png".to_string(),
			],
		}
	}
}

/// Router and view lifecycle settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterSettings {
	/// Paths rendered without header chrome.
	pub bare_paths: Vec<String>,
	/// Paths whose presenter holds device resources and is cleaned up eagerly on programmatic navigation.
	pub stateful_paths: Vec<String>,
	/// Delay before focusing the first focusable element after a mount.
	pub focus_delay_ms: u64,
	/// Id given to the content region for skip-link targeting.
	pub content_id: String,
	/// Delay between a successful story upload and the redirect to the list.
	pub redirect_delay_ms: u64,
}

impl Default for RouterSettings {
	fn default() -> Self {
		Self {
			bare_paths: vec!["/login".to_string(), "/register".to_string()],
			stateful_paths: vec!["/add-story".to_string()],
			focus_delay_ms: 100,
			content_id: "main-content".to_string(),
			redirect_delay_ms: 1500,
		}
	}
}

/// Map widget and geolocation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSettings {
	pub default_lat: f64,
	pub default_lng: f64,
	pub default_zoom: u8,
	pub detail_zoom: u8,
	pub location_zoom: u8,
	pub geolocation_timeout_ms: u64,
}

impl Default for MapSettings {
	fn default() -> Self {
		Self {
			default_lat: -6.2088,
			default_lng: 106.8456,
			default_zoom: 12,
			detail_zoom: 13,
			location_zoom: 15,
			geolocation_timeout_ms: 10_000,
		}
	}
}

/// Push notification settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PushSettings {
	/// URL-safe base64 VAPID public key. Push subscription is skipped when empty.
	pub vapid_public_key: String,
}

/// Complete client settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorySettings {
	pub api: ApiSettings,
	pub cache: CacheSettings,
	pub router: RouterSettings,
	pub map: MapSettings,
	pub push: PushSettings,
}

impl StorySettings {
	/// Checks values that depend on each other.
	pub fn validate(&self) -> Result<(), SettingsError> {
		self.api.origin()?;

		if self.cache.version.trim().is_empty() {
			return Err(SettingsError::Validation(
				"cache.version must not be empty".to_string(),
			));
		}
		if !self.cache.precache.contains(&self.cache.offline_url) {
			return Err(SettingsError::Validation(format!(
				"cache.precache must contain the offline page '{}'",
				self.cache.offline_url
			)));
		}
		if self.router.content_id.trim().is_empty() {
			return Err(SettingsError::Validation(
				"router.content_id must not be empty".to_string(),
			));
		}

		Ok(())
	}
}

/// Builder merging configuration sources into [`StorySettings`]
///
/// Built-in defaults always apply; added sources override them according to
/// their [`ConfigSource::priority`].
#[derive(Default)]
pub struct SettingsBuilder {
	sources: Vec<Box<dyn ConfigSource>>,
}

impl SettingsBuilder {
	/// Create a builder with no sources beyond the built-in defaults
	pub fn new() -> Self {
		Self::default()
	}

	/// Add a configuration source
	pub fn add_source(mut self, source: impl ConfigSource + 'static) -> Self {
		self.sources.push(Box::new(source));
		self
	}

	/// Merge all sources, deserialize and validate.
	pub fn build(mut self) -> Result<StorySettings, SettingsError> {
		let mut merged = serde_json::to_value(StorySettings::default())?;

		self.sources.sort_by_key(|source| source.priority());

		for source in &self.sources {
			let values = source.load().map_err(|error| SettingsError::Source {
				source_name: source.description(),
				error,
			})?;
			tracing::debug!(source = %source.description(), keys = values.len(), "loaded settings source");

			let overlay: Map<String, Value> = values.into_iter().collect();
			merge_value(&mut merged, Value::Object(overlay));
		}

		let settings: StorySettings = serde_json::from_value(merged)?;
		settings.validate()?;
		Ok(settings)
	}
}
