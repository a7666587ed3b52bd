//! Install/activate lifecycle and request interception.

use crate::error::{CacheError, FetchError};
use crate::network::Network;
use crate::push::PushNotification;
use crate::request::{FetchRequest, FetchResponse, ResponseSource};
use crate::storage::{CacheStorage, CachedResponse};
use async_trait::async_trait;
use futures::future::try_join_all;
use parking_lot::Mutex;
use std::sync::Arc;
use story_conf::StorySettings;
use url::{Origin, Url};

/// Policy applied to one intercepted request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
	/// Always the network, never stored.
	NetworkOnly,
	/// Network, storing a copy; offline page when unreachable.
	NetworkFirst,
	/// Cache, then network storing `200` responses.
	CacheFirst,
}

/// Worker lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
	Parsed,
	Installing,
	Installed,
	Activating,
	Activated,
	/// Install failed; the worker will never activate.
	Redundant,
}

/// Clients controlled by the worker.
#[async_trait]
pub trait Clients: Send + Sync {
	/// Take control of every open client without a reload.
	async fn claim(&self);
}

/// [`Clients`] for environments without client pages.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopClients;

#[async_trait]
impl Clients for NoopClients {
	async fn claim(&self) {}
}

/// Resolved engine configuration: absolute URLs and the API origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
	pub cache_name: String,
	pub offline_url: Url,
	pub precache: Vec<Url>,
	pub api_origin: Origin,
}

impl EngineConfig {
	/// Resolve the cache settings against the worker's scope URL.
	pub fn from_settings(settings: &StorySettings, scope: &Url) -> Result<Self, CacheError> {
		let resolve = |path: &str| {
			scope
				.join(path)
				.map_err(|e| CacheError::Config(format!("cannot resolve '{}': {}", path, e)))
		};

		let api_url = Url::parse(&settings.api.base_url)
			.map_err(|e| CacheError::Config(format!("api.base_url: {}", e)))?;

		Ok(Self {
			cache_name: settings.cache.version.clone(),
			offline_url: resolve(settings.cache.offline_url.as_str())?,
			precache: settings
				.cache
				.precache
				.iter()
				.map(|path| resolve(path.as_str()))
				.collect::<Result<_, _>>()?,
			api_origin: api_url.origin(),
		})
	}
}

/// The service-worker cache strategy engine.
pub struct CacheStrategyEngine {
	config: EngineConfig,
	storage: CacheStorage,
	network: Arc<dyn Network>,
	clients: Arc<dyn Clients>,
	state: Mutex<WorkerState>,
}

impl CacheStrategyEngine {
	pub fn new(
		config: EngineConfig,
		storage: CacheStorage,
		network: Arc<dyn Network>,
		clients: Arc<dyn Clients>,
	) -> Self {
		Self {
			config,
			storage,
			network,
			clients,
			state: Mutex::new(WorkerState::Parsed),
		}
	}

	pub fn config(&self) -> &EngineConfig {
		&self.config
	}

	pub fn storage(&self) -> &CacheStorage {
		&self.storage
	}

	pub fn state(&self) -> WorkerState {
		*self.state.lock()
	}

	/// Precache the manifest.
	///
	/// Every entry is fetched before anything is written: one failed fetch
	/// or non-`2xx` status fails the install and leaves the current store
	/// untouched.
	pub async fn install(&self) -> Result<(), CacheError> {
		*self.state.lock() = WorkerState::Installing;
		tracing::info!(cache = %self.config.cache_name, entries = self.config.precache.len(), "installing");

		let fetches = self.config.precache.iter().map(|url| async move {
			let request = FetchRequest::get(url.clone());
			match self.network.fetch(&request).await {
				Ok(response) if response.is_ok() => {
					Ok((request.cache_key(), CachedResponse::snapshot(&response)))
				}
				Ok(response) => Err(CacheError::Install {
					url: url.to_string(),
					reason: format!("status {}", response.status),
				}),
				Err(e) => Err(CacheError::Install {
					url: url.to_string(),
					reason: e.to_string(),
				}),
			}
		});

		match try_join_all(fetches).await {
			Ok(entries) => {
				self.storage.put_all(&self.config.cache_name, entries).await;
				// Skip waiting: installed workers activate immediately.
				*self.state.lock() = WorkerState::Installed;
				Ok(())
			}
			Err(e) => {
				tracing::error!(error = %e, "install failed");
				*self.state.lock() = WorkerState::Redundant;
				Err(e)
			}
		}
	}

	/// Purge every store but the current version, then claim clients.
	///
	/// Returns the deleted store names.
	pub async fn activate(&self) -> Vec<String> {
		*self.state.lock() = WorkerState::Activating;

		let mut deleted = Vec::new();
		for name in self.storage.keys().await {
			if name != self.config.cache_name && self.storage.delete(&name).await {
				tracing::info!(cache = %name, "deleted stale cache");
				deleted.push(name);
			}
		}

		self.clients.claim().await;
		*self.state.lock() = WorkerState::Activated;
		deleted
	}

	/// Policy for a request, highest precedence first. Non-`GET` requests
	/// are never answered from or written to the cache.
	pub fn strategy_for(&self, request: &FetchRequest) -> Strategy {
		if request.url.origin() == self.config.api_origin || !request.is_get() {
			Strategy::NetworkOnly
		} else if request.is_navigation() {
			Strategy::NetworkFirst
		} else {
			Strategy::CacheFirst
		}
	}

	/// Answer an intercepted request.
	pub async fn handle_fetch(&self, request: &FetchRequest) -> Result<FetchResponse, FetchError> {
		let strategy = self.strategy_for(request);
		tracing::debug!(url = %request.url, ?strategy, "fetch");

		match strategy {
			Strategy::NetworkOnly => Ok(self.network.fetch(request).await?),
			Strategy::NetworkFirst => self.network_first(request).await,
			Strategy::CacheFirst => self.cache_first(request).await,
		}
	}

	async fn network_first(&self, request: &FetchRequest) -> Result<FetchResponse, FetchError> {
		match self.network.fetch(request).await {
			Ok(response) => {
				self.storage
					.put(
						&self.config.cache_name,
						&request.cache_key(),
						CachedResponse::snapshot(&response),
					)
					.await;
				Ok(response)
			}
			Err(e) => {
				tracing::warn!(url = %request.url, error = %e, "navigation offline, serving fallback page");
				self.offline_page(request).await
			}
		}
	}

	async fn cache_first(&self, request: &FetchRequest) -> Result<FetchResponse, FetchError> {
		let key = request.cache_key();
		if let Some(cached) = self.storage.match_any(&key).await {
			return Ok(cached.into_response(ResponseSource::Cache));
		}

		match self.network.fetch(request).await {
			Ok(response) => {
				if response.status == 200 {
					self.storage
						.put(&self.config.cache_name, &key, CachedResponse::snapshot(&response))
						.await;
				}
				Ok(response)
			}
			Err(e) if request.accepts_html() => {
				tracing::warn!(url = %request.url, error = %e, "html request offline, serving fallback page");
				self.offline_page(request).await
			}
			Err(e) => Err(e.into()),
		}
	}

	async fn offline_page(&self, request: &FetchRequest) -> Result<FetchResponse, FetchError> {
		self.storage
			.match_any(self.config.offline_url.as_str())
			.await
			.map(|cached| cached.into_response(ResponseSource::OfflineFallback))
			.ok_or_else(|| FetchError::OfflineUnavailable {
				url: request.url.to_string(),
			})
	}

	/// Turn a push payload into the notification to display.
	pub fn handle_push(&self, data: Option<&[u8]>) -> PushNotification {
		let notification = PushNotification::from_payload(data);
		tracing::info!(title = %notification.title, "push received");
		notification
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::NetworkError;
	use rstest::{fixture, rstest};

	struct Unreachable;

	#[async_trait]
	impl Network for Unreachable {
		async fn fetch(&self, _request: &FetchRequest) -> Result<FetchResponse, NetworkError> {
			Err(NetworkError::Offline)
		}
	}

	#[fixture]
	fn engine() -> CacheStrategyEngine {
		let scope = Url::parse("https://stories.example.com/").unwrap();
		let config = EngineConfig::from_settings(&StorySettings::default(), &scope).unwrap();
		CacheStrategyEngine::new(config, CacheStorage::new(), Arc::new(Unreachable), Arc::new(NoopClients))
	}

	fn url(s: &str) -> Url {
		Url::parse(s).unwrap()
	}

	#[rstest]
	fn test_config_resolves_against_scope(engine: CacheStrategyEngine) {
		let config = engine.config();

		assert_eq!(config.cache_name, "story-app-cache-v1");
		assert_eq!(config.offline_url.as_str(), "https://stories.example.com/offline.html");
		assert_eq!(config.precache.len(), 5);
		assert_eq!(config.precache[1].as_str(), "https://stories.example.com/");
		assert_eq!(config.api_origin.ascii_serialization(), "https://story-api.dicoding.dev");
	}

	#[rstest]
	#[case(FetchRequest::get(url("https://story-api.dicoding.dev/v1/stories")), Strategy::NetworkOnly)]
	#[case(FetchRequest::navigate(url("https://story-api.dicoding.dev/v1/")), Strategy::NetworkOnly)]
	#[case(FetchRequest::navigate(url("https://stories.example.com/")), Strategy::NetworkFirst)]
	#[case(FetchRequest::get(url("https://stories.example.com/app.js")), Strategy::CacheFirst)]
	#[case(FetchRequest::get(url("https://tile.openstreetmap.org/1/1/1.png")), Strategy::CacheFirst)]
	#[case(FetchRequest::get(url("https://stories.example.com/app.js")).with_method("POST"), Strategy::NetworkOnly)]
	#[case(FetchRequest::navigate(url("https://stories.example.com/")).with_method("POST"), Strategy::NetworkOnly)]
	fn test_strategy_precedence(
		engine: CacheStrategyEngine,
		#[case] request: FetchRequest,
		#[case] expected: Strategy,
	) {
		assert_eq!(engine.strategy_for(&request), expected);
	}

	#[rstest]
	fn test_push_defaults(engine: CacheStrategyEngine) {
		assert_eq!(engine.handle_push(None).title, "Story App");
	}

	#[rstest]
	#[tokio::test]
	async fn test_failed_install_marks_worker_redundant(engine: CacheStrategyEngine) {
		assert_eq!(engine.state(), WorkerState::Parsed);

		let result = engine.install().await;

		assert!(matches!(result, Err(CacheError::Install { .. })));
		assert_eq!(engine.state(), WorkerState::Redundant);
		assert!(!engine.storage().has("story-app-cache-v1").await);
	}
}
