//! Error types for the data access layer.

/// Transport or protocol failure talking to the remote API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
	/// The request never produced a response.
	#[error("network error: {0}")]
	Network(String),

	/// Non-success status without a decodable body.
	#[error("unexpected status {status}")]
	Status { status: u16 },

	/// The body was not the expected JSON.
	#[error("invalid response body: {0}")]
	Decode(String),
}

impl From<reqwest::Error> for ApiError {
	fn from(err: reqwest::Error) -> Self {
		if err.is_decode() {
			Self::Decode(err.to_string())
		} else {
			Self::Network(err.to_string())
		}
	}
}

/// Failure of a local store (key-value or structured).
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
	#[error("storage unavailable: {0}")]
	Unavailable(String),

	#[error("serialization failed: {0}")]
	Serialization(#[from] serde_json::Error),
}

/// Uniform failure result of a model operation.
///
/// Carries only the message shown in the view's error region.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ModelFailure {
	pub message: String,
}

impl ModelFailure {
	pub fn new(message: impl Into<String>) -> Self {
		Self {
			message: message.into(),
		}
	}
}

/// Result of a model operation.
pub type ModelResult<T> = Result<T, ModelFailure>;
