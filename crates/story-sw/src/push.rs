//! Push payload to displayable notification.

use serde::Deserialize;

const DEFAULT_TITLE: &str = "Story App";

/// A notification ready to be shown by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushNotification {
	pub title: String,
	pub body: Option<String>,
}

#[derive(Deserialize)]
struct Payload {
	title: Option<String>,
	#[serde(default)]
	options: PayloadOptions,
}

#[derive(Default, Deserialize)]
struct PayloadOptions {
	body: Option<String>,
}

impl PushNotification {
	/// Decode a push payload.
	///
	/// JSON payloads of the shape `{ "title": ..., "options": { "body": ... } }`
	/// are used as-is; anything else becomes the body under a generic title.
	///
	/// # Examples
	///
	/// ```
	/// use story_sw::PushNotification;
	///
	/// let n = PushNotification::from_payload(Some(br#"{"title":"Story created","options":{"body":"New story"}}"#.as_slice()));
	/// assert_eq!(n.title, "Story created");
	/// assert_eq!(n.body.as_deref(), Some("New story"));
	///
	/// let n = PushNotification::from_payload(Some(b"plain text".as_slice()));
	/// assert_eq!(n.title, "Story App");
	/// assert_eq!(n.body.as_deref(), Some("plain text"));
	/// ```
	pub fn from_payload(data: Option<&[u8]>) -> Self {
		let Some(data) = data.filter(|d| !d.is_empty()) else {
			return Self {
				title: DEFAULT_TITLE.to_string(),
				body: None,
			};
		};

		match serde_json::from_slice::<Payload>(data) {
			Ok(payload) => Self {
				title: payload.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
				body: payload.options.body,
			},
			Err(_) => Self {
				title: DEFAULT_TITLE.to_string(),
				body: Some(String::from_utf8_lossy(data).into_owned()),
			},
		}
	}
}
