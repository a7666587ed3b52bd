//! Error types for the cache engine.

/// Failure reaching the network.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetworkError {
	/// No connectivity at all.
	#[error("network is offline")]
	Offline,

	#[error("request failed: {0}")]
	Failed(String),
}

/// Engine configuration or lifecycle failure.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
	#[error("invalid engine configuration: {0}")]
	Config(String),

	/// A precache manifest entry could not be fetched; nothing was stored.
	#[error("install failed while precaching {url}: {reason}")]
	Install { url: String, reason: String },
}

/// Failure answering an intercepted request.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
	#[error(transparent)]
	Network(#[from] NetworkError),

	/// The network failed and the offline page is not in any cache.
	#[error("no offline page cached for {url}")]
	OfflineUnavailable { url: String },
}
