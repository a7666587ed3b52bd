//! Session model backed by a key-value store.

use crate::client::StoryApi;
use crate::database::StoryDatabase;
use crate::error::{ModelFailure, ModelResult, StorageError};
use crate::models::User;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;

const TOKEN_KEY: &str = "token";
const USER_KEY: &str = "user";

/// Synchronous string key-value storage, the shape of browser local storage.
pub trait KeyValueStore: Send + Sync {
	fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
	fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
	fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-memory [`KeyValueStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
	entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// A store pre-populated with entries.
	pub fn with_entries<I, K, V>(entries: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		Self {
			entries: RwLock::new(
				entries
					.into_iter()
					.map(|(k, v)| (k.into(), v.into()))
					.collect(),
			),
		}
	}
}

impl KeyValueStore for MemoryStore {
	fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
		Ok(self.entries.read().get(key).cloned())
	}

	fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
		self.entries.write().insert(key.to_string(), value.to_string());
		Ok(())
	}

	fn remove(&self, key: &str) -> Result<(), StorageError> {
		self.entries.write().remove(key);
		Ok(())
	}
}

/// Bearer token plus the identity it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
	pub token: String,
	pub user: Option<User>,
}

/// Authentication state and operations.
///
/// The session is restored from the key-value store on construction and
/// written back on login/logout. Storage failures are logged and otherwise
/// ignored; the in-memory session stays authoritative.
pub struct AuthModel {
	api: Arc<dyn StoryApi>,
	store: Arc<dyn KeyValueStore>,
	database: Option<Arc<dyn StoryDatabase>>,
	session: Mutex<Option<Session>>,
}

impl AuthModel {
	pub fn new(api: Arc<dyn StoryApi>, store: Arc<dyn KeyValueStore>) -> Self {
		let session = Self::restore(store.as_ref());
		if session.is_some() {
			tracing::debug!("restored persisted session");
		}

		Self {
			api,
			store,
			database: None,
			session: Mutex::new(session),
		}
	}

	/// Also mirror the logged-in user into the structured store.
	pub fn with_database(mut self, database: Arc<dyn StoryDatabase>) -> Self {
		self.database = Some(database);
		self
	}

	fn restore(store: &dyn KeyValueStore) -> Option<Session> {
		let token = match store.get(TOKEN_KEY) {
			Ok(token) => token?,
			Err(e) => {
				tracing::warn!(error = %e, "failed to read persisted token");
				return None;
			}
		};

		let user = match store.get(USER_KEY) {
			Ok(Some(raw)) => serde_json::from_str::<User>(&raw)
				.map_err(|e| tracing::warn!(error = %e, "discarding malformed persisted user"))
				.ok(),
			Ok(None) => None,
			Err(e) => {
				tracing::warn!(error = %e, "failed to read persisted user");
				None
			}
		};

		Some(Session { token, user })
	}

	fn persist(&self, session: &Session) -> Result<(), StorageError> {
		self.store.set(TOKEN_KEY, &session.token)?;
		if let Some(user) = &session.user {
			self.store.set(USER_KEY, &serde_json::to_string(user)?)?;
		}
		Ok(())
	}

	/// Log in and persist the resulting session.
	pub async fn login(&self, email: &str, password: &str) -> ModelResult<User> {
		let response = match self.api.login(email, password).await {
			Ok(response) => response,
			Err(e) => {
				tracing::error!(error = %e, "login request failed");
				return Err(ModelFailure::new("Login failed. Please try again."));
			}
		};

		if response.error {
			return Err(ModelFailure::new(response.message));
		}
		let Some(result) = response.login_result else {
			tracing::error!("login succeeded without a loginResult payload");
			return Err(ModelFailure::new("Login failed. Please try again."));
		};

		let user = User {
			user_id: result.user_id,
			name: result.name,
		};
		let session = Session {
			token: result.token,
			user: Some(user.clone()),
		};

		if let Err(e) = self.persist(&session) {
			tracing::warn!(error = %e, "failed to persist session");
		}
		if let Some(database) = &self.database {
			if !database.save_user(&user).await {
				tracing::warn!("failed to mirror user into local database");
			}
		}

		*self.session.lock() = Some(session);
		tracing::info!(user_id = %user.user_id, "logged in");
		Ok(user)
	}

	/// Register a new account. Does not log in.
	pub async fn register(&self, name: &str, email: &str, password: &str) -> ModelResult<()> {
		match self.api.register(name, email, password).await {
			Ok(response) if !response.error => Ok(()),
			Ok(response) => Err(ModelFailure::new(response.message)),
			Err(e) => {
				tracing::error!(error = %e, "registration request failed");
				Err(ModelFailure::new("Registration failed. Please try again."))
			}
		}
	}

	/// Forget the session in memory and in storage.
	pub fn logout(&self) {
		*self.session.lock() = None;
		for key in [TOKEN_KEY, USER_KEY] {
			if let Err(e) = self.store.remove(key) {
				tracing::warn!(key, error = %e, "failed to clear persisted session key");
			}
		}
		tracing::info!("logged out");
	}

	pub fn is_authenticated(&self) -> bool {
		self.session.lock().is_some()
	}

	pub fn token(&self) -> Option<String> {
		self.session.lock().as_ref().map(|s| s.token.clone())
	}

	pub fn user(&self) -> Option<User> {
		self.session.lock().as_ref().and_then(|s| s.user.clone())
	}
}
