//! Named cache stores.

use crate::request::{FetchResponse, ResponseSource};
use bytes::Bytes;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Response snapshot held in a cache store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedResponse {
	pub status: u16,
	pub headers: Vec<(String, String)>,
	pub body: Bytes,
}

impl CachedResponse {
	/// Snapshot of a response. `Bytes` clones share the buffer.
	pub fn snapshot(response: &FetchResponse) -> Self {
		Self {
			status: response.status,
			headers: response.headers.clone(),
			body: response.body.clone(),
		}
	}

	pub fn into_response(self, source: ResponseSource) -> FetchResponse {
		FetchResponse {
			status: self.status,
			headers: self.headers,
			body: self.body,
			source,
		}
	}
}

/// All cache stores of one origin, keyed by name in creation order.
#[derive(Debug, Clone, Default)]
pub struct CacheStorage {
	stores: Arc<RwLock<IndexMap<String, HashMap<String, CachedResponse>>>>,
}

impl CacheStorage {
	pub fn new() -> Self {
		Self::default()
	}

	/// Create the named store if it does not exist yet.
	pub async fn open(&self, name: &str) {
		self.stores
			.write()
			.await
			.entry(name.to_string())
			.or_default();
	}

	pub async fn has(&self, name: &str) -> bool {
		self.stores.read().await.contains_key(name)
	}

	/// Store names in creation order.
	pub async fn keys(&self) -> Vec<String> {
		self.stores.read().await.keys().cloned().collect()
	}

	/// Delete a whole store; `false` when it did not exist.
	pub async fn delete(&self, name: &str) -> bool {
		self.stores.write().await.shift_remove(name).is_some()
	}

	/// Put one entry, creating the store as needed.
	pub async fn put(&self, name: &str, key: &str, response: CachedResponse) {
		self.stores
			.write()
			.await
			.entry(name.to_string())
			.or_default()
			.insert(key.to_string(), response);
	}

	/// Put several entries under a single write lock.
	pub async fn put_all(&self, name: &str, entries: Vec<(String, CachedResponse)>) {
		let mut stores = self.stores.write().await;
		let store = stores.entry(name.to_string()).or_default();
		store.extend(entries);
	}

	pub async fn match_in(&self, name: &str, key: &str) -> Option<CachedResponse> {
		self.stores.read().await.get(name)?.get(key).cloned()
	}

	/// First match across all stores, oldest store first.
	pub async fn match_any(&self, key: &str) -> Option<CachedResponse> {
		self.stores
			.read()
			.await
			.values()
			.find_map(|store| store.get(key).cloned())
	}

	/// Number of entries in a store; `0` when it does not exist.
	pub async fn len(&self, name: &str) -> usize {
		self.stores.read().await.get(name).map_or(0, HashMap::len)
	}

	/// Entry keys of one store, sorted.
	pub async fn entry_keys(&self, name: &str) -> Vec<String> {
		let mut keys: Vec<String> = self
			.stores
			.read()
			.await
			.get(name)
			.map(|store| store.keys().cloned().collect())
			.unwrap_or_default();
		keys.sort();
		keys
	}
}
