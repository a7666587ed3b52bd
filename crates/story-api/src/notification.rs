//! Push notification permission and subscription helpers.

use crate::client::StoryApi;
use crate::models::PushSubscription;
use async_trait::async_trait;
use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use std::sync::Arc;

/// Notification permission state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
	Granted,
	Denied,
	/// Not yet asked.
	Default,
	/// The platform has no notification support.
	Unsupported,
}

#[derive(Debug, thiserror::Error)]
pub enum PushError {
	#[error("push messaging is not supported")]
	Unsupported,

	#[error("invalid VAPID public key: {0}")]
	InvalidKey(String),

	#[error("push subscription rejected: {0}")]
	Rejected(String),
}

/// Platform push manager, the shape of a service-worker registration's
/// `pushManager`.
#[async_trait]
pub trait PushManager: Send + Sync {
	async fn permission(&self) -> Permission;

	/// Prompt the user; resolves to the resulting permission.
	async fn request_permission(&self) -> Permission;

	async fn subscription(&self) -> Option<PushSubscription>;

	/// Create a user-visible subscription for the given application server key.
	async fn subscribe(&self, application_server_key: &[u8]) -> Result<PushSubscription, PushError>;

	/// Drop the current subscription; `false` if there was none.
	async fn unsubscribe(&self) -> bool;
}

/// Decode a URL-safe base64 VAPID key, with or without padding.
///
/// # Examples
///
/// ```
/// use story_api::notification::decode_vapid_key;
///
/// assert_eq!(decode_vapid_key("AQID").unwrap(), vec![1, 2, 3]);
/// assert_eq!(decode_vapid_key("-_8").unwrap(), vec![0xFB, 0xFF]);
/// ```
pub fn decode_vapid_key(key: &str) -> Result<Vec<u8>, PushError> {
	let engine = GeneralPurpose::new(
		&alphabet::URL_SAFE,
		GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
	);
	engine
		.decode(key.trim())
		.map_err(|e| PushError::InvalidKey(e.to_string()))
}

/// Requests permission and keeps the API's subscription registry in sync.
pub struct NotificationService {
	manager: Arc<dyn PushManager>,
	api: Arc<dyn StoryApi>,
	vapid_public_key: String,
}

impl NotificationService {
	pub fn new(manager: Arc<dyn PushManager>, api: Arc<dyn StoryApi>, vapid_public_key: impl Into<String>) -> Self {
		Self {
			manager,
			api,
			vapid_public_key: vapid_public_key.into(),
		}
	}

	/// `true` when notifications may be shown, prompting if not yet decided.
	pub async fn request_permission(&self) -> bool {
		match self.manager.permission().await {
			Permission::Granted => true,
			Permission::Unsupported => {
				tracing::info!("notifications are not supported on this platform");
				false
			}
			Permission::Denied | Permission::Default => {
				self.manager.request_permission().await == Permission::Granted
			}
		}
	}

	/// Subscribe this client and register the subscription with the API.
	///
	/// An existing subscription is returned as-is. With no VAPID key configured
	/// nothing is subscribed and `Ok(None)` is returned. A registration the API
	/// rejects is logged; the local subscription is still returned.
	pub async fn subscribe_user(&self, token: &str) -> Result<Option<PushSubscription>, PushError> {
		if let Some(existing) = self.manager.subscription().await {
			return Ok(Some(existing));
		}
		if self.vapid_public_key.is_empty() {
			tracing::debug!("no VAPID key configured, skipping push subscription");
			return Ok(None);
		}

		let key = decode_vapid_key(&self.vapid_public_key)?;
		let subscription = self.manager.subscribe(&key).await?;

		match self.api.subscribe(&subscription, token).await {
			Ok(response) if !response.error => tracing::info!("user is subscribed"),
			Ok(response) => tracing::warn!(message = %response.message, "push registration rejected"),
			Err(e) => tracing::warn!(error = %e, "push registration failed"),
		}

		Ok(Some(subscription))
	}

	/// Unregister from the API and drop the local subscription.
	///
	/// The local subscription is only dropped once the API confirmed.
	pub async fn unsubscribe_user(&self, token: &str) -> bool {
		let Some(subscription) = self.manager.subscription().await else {
			return false;
		};

		match self.api.unsubscribe(&subscription.endpoint, token).await {
			Ok(response) if !response.error => {
				let dropped = self.manager.unsubscribe().await;
				tracing::info!("user is unsubscribed");
				dropped
			}
			Ok(response) => {
				tracing::warn!(message = %response.message, "push unregistration rejected");
				false
			}
			Err(e) => {
				tracing::warn!(error = %e, "push unregistration failed");
				false
			}
		}
	}
}
