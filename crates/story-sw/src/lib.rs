//! Service-worker cache strategy engine
//!
//! Every request the page issues passes through [`CacheStrategyEngine::handle_fetch`],
//! which picks one of three policies:
//!
//! | Request                          | Policy          |
//! |----------------------------------|-----------------|
//! | origin equals the API origin     | network only    |
//! | navigation (`mode: navigate`)    | network first   |
//! | anything else                    | cache first     |
//!
//! Navigations that cannot reach the network are answered with the precached
//! offline page; so are HTML requests when both cache and network miss.
//!
//! ## Lifecycle
//!
//! - [`CacheStrategyEngine::install`] fetches the whole precache manifest and
//!   stores it only when every entry succeeded.
//! - [`CacheStrategyEngine::activate`] deletes every cache store whose name is
//!   not the current version, then claims clients.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use story_conf::StorySettings;
//! use story_sw::{CacheStorage, CacheStrategyEngine, EngineConfig, FetchRequest, HttpNetwork, NoopClients};
//! use url::Url;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let scope = Url::parse("https://stories.example.com/")?;
//! let config = EngineConfig::from_settings(&StorySettings::default(), &scope)?;
//! let engine = CacheStrategyEngine::new(
//! 	config,
//! 	CacheStorage::new(),
//! 	Arc::new(HttpNetwork::new()?),
//! 	Arc::new(NoopClients),
//! );
//!
//! engine.install().await?;
//! engine.activate().await;
//!
//! let page = engine
//! 	.handle_fetch(&FetchRequest::navigate(scope.join("/#/stories")?))
//! 	.await?;
//! assert!(page.is_ok());
//! # Ok(())
//! # }
//! ```

pub mod engine;
pub mod error;
pub mod network;
pub mod push;
pub mod request;
pub mod storage;

pub use engine::{CacheStrategyEngine, Clients, EngineConfig, NoopClients, Strategy, WorkerState};
pub use error::{CacheError, FetchError, NetworkError};
pub use network::{HttpNetwork, Network};
pub use push::PushNotification;
pub use request::{FetchRequest, FetchResponse, RequestMode, ResponseSource};
pub use storage::{CacheStorage, CachedResponse};
