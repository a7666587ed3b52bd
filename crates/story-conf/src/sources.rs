//! Configuration sources for layered settings
//!
//! Each source produces a map of top-level sections (`api`, `cache`, ...) to
//! JSON values. Sources are merged in priority order, higher priority wins
//! key by key inside each section.

use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::fs;
use std::path::PathBuf;

/// Trait for configuration sources
pub trait ConfigSource: Send + Sync {
	/// Load configuration from this source
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError>;

	/// Get the priority of this source (higher = more important)
	fn priority(&self) -> u8;

	/// Get a description of this source
	fn description(&self) -> String;
}

/// Error type for configuration sources
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("Parse error: {0}")]
	Parse(String),

	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),

	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	#[error("Missing required source: {0}")]
	Missing(String),
}

/// Environment variable configuration source
///
/// `STORY_API_BASE_URL=...` becomes `api.base_url` once the `STORY_` prefix is
/// stripped: the first underscore separates the section from the key.
/// Values are loaded as strings; [`SettingsBuilder`](crate::SettingsBuilder)
/// converts them to the type of the setting they override.
pub struct EnvSource {
	prefix: Option<String>,
	vars: Option<Vec<(String, String)>>,
}

impl EnvSource {
	/// Create a source reading the process environment
	///
	/// # Examples
	///
	/// ```
	/// use story_conf::sources::EnvSource;
	///
	/// let source = EnvSource::new().with_prefix("STORY_");
	/// ```
	pub fn new() -> Self {
		Self {
			prefix: None,
			vars: None,
		}
	}

	/// Create a source over an explicit set of variables instead of the process environment
	///
	/// # Examples
	///
	/// ```
	/// use story_conf::sources::{ConfigSource, EnvSource};
	///
	/// let source = EnvSource::from_vars([("STORY_CACHE_VERSION", "v2")]).with_prefix("STORY_");
	/// let map = source.load().unwrap();
	/// assert_eq!(map["cache"]["version"], "v2");
	/// ```
	pub fn from_vars<K, V>(vars: impl IntoIterator<Item = (K, V)>) -> Self
	where
		K: Into<String>,
		V: Into<String>,
	{
		Self {
			prefix: None,
			vars: Some(
				vars.into_iter()
					.map(|(k, v)| (k.into(), v.into()))
					.collect(),
			),
		}
	}

	/// Only consider variables starting with `prefix`
	pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.prefix = Some(prefix.into());
		self
	}
}

impl Default for EnvSource {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigSource for EnvSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		let vars: Vec<(String, String)> = match &self.vars {
			Some(vars) => vars.clone(),
			None => std::env::vars().collect(),
		};

		let mut config: IndexMap<String, Value> = IndexMap::new();

		for (key, value) in vars {
			let clean_key = match &self.prefix {
				Some(prefix) => match key.strip_prefix(prefix.as_str()) {
					Some(rest) => rest.to_lowercase(),
					None => continue,
				},
				None => key.to_lowercase(),
			};

			let parsed = Value::String(value);

			match clean_key.split_once('_') {
				Some((section, field)) if !section.is_empty() && !field.is_empty() => {
					let entry = config
						.entry(section.to_string())
						.or_insert_with(|| Value::Object(Map::new()));
					if let Value::Object(map) = entry {
						map.insert(field.to_string(), parsed);
					}
				}
				_ => {
					config.insert(clean_key, parsed);
				}
			}
		}

		Ok(config)
	}

	fn priority(&self) -> u8 {
		100
	}

	fn description(&self) -> String {
		match &self.prefix {
			Some(prefix) => format!("Environment variables (prefix: {})", prefix),
			None => "Environment variables".to_string(),
		}
	}
}

/// TOML file configuration source
pub struct TomlFileSource {
	path: PathBuf,
	required: bool,
}

impl TomlFileSource {
	/// Create an optional TOML file source; a missing file yields no values
	///
	/// # Examples
	///
	/// ```
	/// use story_conf::sources::TomlFileSource;
	///
	/// let source = TomlFileSource::new("story.toml");
	/// ```
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self {
			path: path.into(),
			required: false,
		}
	}

	/// Fail the load when the file does not exist
	pub fn required(mut self) -> Self {
		self.required = true;
		self
	}
}

impl ConfigSource for TomlFileSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		if !self.path.exists() {
			if self.required {
				return Err(SourceError::Missing(self.path.display().to_string()));
			}
			return Ok(IndexMap::new());
		}

		let content = fs::read_to_string(&self.path)?;
		let toml_value: toml::Value = toml::from_str(&content)?;

		let json_value = serde_json::to_value(&toml_value)?;

		let map = json_value
			.as_object()
			.ok_or_else(|| SourceError::Parse("Expected table at root".to_string()))?;

		Ok(map.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
	}

	fn priority(&self) -> u8 {
		50
	}

	fn description(&self) -> String {
		format!("TOML file: {}", self.path.display())
	}
}

/// Default values configuration source
pub struct DefaultSource {
	values: IndexMap<String, Value>,
}

impl DefaultSource {
	/// Create an empty default source
	pub fn new() -> Self {
		Self {
			values: IndexMap::new(),
		}
	}

	/// Add a top-level value
	///
	/// # Examples
	///
	/// ```
	/// use story_conf::sources::DefaultSource;
	/// use serde_json::json;
	///
	/// let source = DefaultSource::new().with_value("cache", json!({ "version": "v9" }));
	/// ```
	pub fn with_value(mut self, key: impl Into<String>, value: Value) -> Self {
		self.values.insert(key.into(), value);
		self
	}
}

impl Default for DefaultSource {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigSource for DefaultSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		Ok(self.values.clone())
	}

	fn priority(&self) -> u8 {
		0
	}

	fn description(&self) -> String {
		"Default values".to_string()
	}
}

/// Deep-merge `overlay` into `base`; objects merge key by key, everything else is replaced.
pub(crate) fn merge_value(base: &mut Value, overlay: Value) {
	match (base, overlay) {
		(Value::Object(base_map), Value::Object(overlay_map)) => {
			for (key, value) in overlay_map {
				match base_map.get_mut(&key) {
					Some(existing) => merge_value(existing, value),
					None => {
						base_map.insert(key, value);
					}
				}
			}
		}
		(slot, Value::String(raw)) => *slot = coerce_string(slot, raw),
		(slot, value) => *slot = value,
	}
}

/// Converts a string overriding `target` to the target's type. Strings that
/// do not convert are kept so deserialization reports the mismatch.
fn coerce_string(target: &Value, raw: String) -> Value {
	let trimmed = raw.trim();
	let coerced = match target {
		Value::Bool(_) => parse_bool(trimmed).map(Value::Bool),
		Value::Number(n) if n.is_f64() => trimmed
			.parse::<f64>()
			.ok()
			.and_then(serde_json::Number::from_f64)
			.map(Value::Number),
		Value::Number(_) => trimmed
			.parse::<u64>()
			.map(Value::from)
			.or_else(|_| trimmed.parse::<i64>().map(Value::from))
			.ok(),
		Value::Array(_) => Some(parse_list(trimmed)),
		_ => None,
	};
	coerced.unwrap_or(Value::String(raw))
}

fn parse_bool(raw: &str) -> Option<bool> {
	match raw.to_ascii_lowercase().as_str() {
		"true" | "1" | "yes" | "on" => Some(true),
		"false" | "0" | "no" | "off" => Some(false),
		_ => None,
	}
}

/// A JSON array, or a comma-separated list with blank items dropped.
fn parse_list(raw: &str) -> Value {
	if raw.starts_with('[') {
		if let Ok(list @ Value::Array(_)) = serde_json::from_str::<Value>(raw) {
			return list;
		}
	}
	Value::Array(
		raw.split(',')
			.map(str::trim)
			.filter(|item| !item.is_empty())
			.map(|item| Value::String(item.to_string()))
			.collect(),
	)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_env_source_splits_section_and_key() {
		let source = EnvSource::from_vars([
			("STORY_API_BASE_URL", "http://localhost:9000/v1"),
			("STORY_ROUTER_FOCUS_DELAY_MS", "250"),
			("OTHER_VALUE", "ignored"),
		])
		.with_prefix("STORY_");

		let map = source.load().unwrap();

		assert_eq!(map["api"]["base_url"], "http://localhost:9000/v1");
		assert_eq!(map["router"]["focus_delay_ms"], "250");
		assert!(!map.contains_key("other"));
	}

	#[rstest]
	#[case(json!("v1"), "2", json!("2"))]
	#[case(json!(100), "250", json!(250))]
	#[case(json!(100), "soon", json!("soon"))]
	#[case(json!(-6.2), "-7.5", json!(-7.5))]
	#[case(json!(false), "Yes", json!(true))]
	#[case(json!(true), "off", json!(false))]
	#[case(json!(["/login"]), "/a, /b,", json!(["/a", "/b"]))]
	#[case(json!(["/login"]), "[\"/a\",\"/b\"]", json!(["/a", "/b"]))]
	fn test_string_override_takes_target_type(
		#[case] base: Value,
		#[case] raw: &str,
		#[case] expected: Value,
	) {
		let mut base = json!({ "section": { "key": base } });
		merge_value(&mut base, json!({ "section": { "key": raw } }));

		assert_eq!(base["section"]["key"], expected);
	}

	#[rstest]
	fn test_missing_optional_toml_is_empty() {
		let source = TomlFileSource::new("/definitely/not/here/story.toml");
		assert!(source.load().unwrap().is_empty());
	}

	#[rstest]
	fn test_missing_required_toml_fails() {
		let source = TomlFileSource::new("/definitely/not/here/story.toml").required();
		assert!(matches!(source.load(), Err(SourceError::Missing(_))));
	}

	#[rstest]
	fn test_merge_value_is_deep() {
		let mut base = json!({ "cache": { "version": "v1", "offline_url": "/offline.html" } });
		merge_value(&mut base, json!({ "cache": { "version": "v2" } }));

		assert_eq!(base["cache"]["version"], "v2");
		assert_eq!(base["cache"]["offline_url"], "/offline.html");
	}

	#[rstest]
	fn test_source_priorities() {
		assert!(EnvSource::new().priority() > TomlFileSource::new("x.toml").priority());
		assert!(TomlFileSource::new("x.toml").priority() > DefaultSource::new().priority());
	}
}
