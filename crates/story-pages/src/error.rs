//! Error types for routing and navigation.

use thiserror::Error;

/// Error type for path parameter extraction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
	/// The route declares no parameter with this name.
	#[error("Missing path parameter '{name}'")]
	Missing {
		/// Placeholder name.
		name: String,
	},
	/// Failed to parse a parameter value.
	#[error("Failed to parse parameter '{name}' value '{raw_value}' as {param_type}: {reason}")]
	ParseError {
		/// Placeholder name.
		name: String,
		/// Expected type name.
		param_type: &'static str,
		/// Raw string value that failed to parse.
		raw_value: String,
		/// Error message from parsing.
		reason: String,
	},
}

/// Error type for route table construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
	/// No `*` route was declared.
	#[error("Route table has no catch-all '*' route")]
	MissingCatchAll,
	/// A pattern could not be parsed.
	#[error("Invalid route pattern '{pattern}': {reason}")]
	InvalidPattern {
		/// The offending pattern.
		pattern: String,
		/// Why it was rejected.
		reason: &'static str,
	},
}

/// Failure while producing the view for a navigation.
///
/// Never escapes the lifecycle manager: every variant ends in the fallback
/// view.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
	/// The view factory failed.
	#[error("View factory failed: {0}")]
	Factory(String),
	/// The factory produced nothing that can be mounted.
	#[error("View for '{path}' is not attachable")]
	NotAttachable {
		/// Navigated path.
		path: String,
	},
	/// Path parameters did not fit the view.
	#[error(transparent)]
	Params(#[from] PathError),
}

/// Failure assembling the application.
#[derive(Debug, Error)]
pub enum AppError {
	#[error(transparent)]
	Settings(#[from] story_conf::SettingsError),
	#[error(transparent)]
	Api(#[from] story_api::ApiError),
	#[error(transparent)]
	Router(#[from] RouterError),
}
