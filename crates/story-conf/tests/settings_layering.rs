//! Layering tests: defaults < TOML file < environment.

use rstest::rstest;
use std::io::Write;
use story_conf::{EnvSource, SettingsBuilder, SettingsError, TomlFileSource};
use tempfile::NamedTempFile;

fn toml_file(content: &str) -> NamedTempFile {
	let mut file = NamedTempFile::new().unwrap();
	file.write_all(content.as_bytes()).unwrap();
	file
}

#[rstest]
fn test_toml_file_overrides_defaults() {
	let file = toml_file(
		r#"
[api]
base_url = "http://localhost:9000/v1"

[router]
focus_delay_ms = 0
"#,
	);

	let settings = SettingsBuilder::new()
		.add_source(TomlFileSource::new(file.path()))
		.build()
		.unwrap();

	assert_eq!(settings.api.base_url, "http://localhost:9000/v1");
	assert_eq!(settings.api.origin().unwrap(), "http://localhost:9000");
	assert_eq!(settings.router.focus_delay_ms, 0);
	// Untouched keys keep their defaults
	assert_eq!(settings.router.content_id, "main-content");
}

#[rstest]
fn test_env_wins_over_toml() {
	let file = toml_file(
		r#"
[cache]
version = "from-file"
"#,
	);

	let settings = SettingsBuilder::new()
		.add_source(EnvSource::from_vars([("STORY_CACHE_VERSION", "from-env")]).with_prefix("STORY_"))
		.add_source(TomlFileSource::new(file.path()))
		.build()
		.unwrap();

	assert_eq!(settings.cache.version, "from-env");
}

#[rstest]
fn test_malformed_toml_reports_source() {
	let file = toml_file("[cache\nversion = ");

	let result = SettingsBuilder::new()
		.add_source(TomlFileSource::new(file.path()))
		.build();

	match result {
		Err(SettingsError::Source { source_name, .. }) => {
			assert!(source_name.starts_with("TOML file"));
		}
		other => panic!("expected source error, got {:?}", other),
	}
}

#[rstest]
fn test_env_values_take_the_setting_type() {
	let settings = SettingsBuilder::new()
		.add_source(
			EnvSource::from_vars([
				("STORY_CACHE_VERSION", "2"),
				("STORY_ROUTER_FOCUS_DELAY_MS", "250"),
				("STORY_ROUTER_BARE_PATHS", "/login, /register, /welcome"),
				("STORY_PUSH_VAPID_PUBLIC_KEY", "1234"),
			])
			.with_prefix("STORY_"),
		)
		.build()
		.unwrap();

	assert_eq!(settings.cache.version, "2");
	assert_eq!(settings.router.focus_delay_ms, 250);
	assert_eq!(settings.router.bare_paths, vec!["/login", "/register", "/welcome"]);
	assert_eq!(settings.push.vapid_public_key, "1234");
}

#[rstest]
fn test_unconvertible_env_value_is_rejected() {
	let result = SettingsBuilder::new()
		.add_source(EnvSource::from_vars([("STORY_ROUTER_FOCUS_DELAY_MS", "soon")]).with_prefix("STORY_"))
		.build();

	assert!(matches!(result, Err(SettingsError::Deserialize(_))));
}
