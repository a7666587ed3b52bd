//! Wire types exchanged with the remote story API.
//!
//! Field names follow the API's camelCase JSON. Every response carries an
//! `error` flag and a `message`; payload fields are optional so that error
//! bodies decode into the same types.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A shared story.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
	pub id: String,
	pub name: String,
	pub description: String,
	pub photo_url: String,
	pub created_at: DateTime<Utc>,
	#[serde(default)]
	pub lat: Option<f64>,
	#[serde(default)]
	pub lon: Option<f64>,
}

impl Story {
	/// Returns `(lat, lon)` only when both coordinates are present.
	///
	/// Presence, not truthiness: a story at latitude `0.0` still has a location.
	///
	/// # Examples
	///
	/// ```
	/// use chrono::Utc;
	/// use story_api::Story;
	///
	/// let mut story = Story {
	/// 	id: "story-1".into(),
	/// 	name: "Dimas".into(),
	/// 	description: "Sunrise".into(),
	/// 	photo_url: "https://example.com/p.jpg".into(),
	/// 	created_at: Utc::now(),
	/// 	lat: Some(-6.2),
	/// 	lon: None,
	/// };
	/// assert_eq!(story.location(), None);
	///
	/// story.lon = Some(106.8);
	/// assert_eq!(story.location(), Some((-6.2, 106.8)));
	/// ```
	pub fn location(&self) -> Option<(f64, f64)> {
		match (self.lat, self.lon) {
			(Some(lat), Some(lon)) => Some((lat, lon)),
			_ => None,
		}
	}

	/// Description shortened to `max` characters with a trailing ellipsis.
	pub fn excerpt(&self, max: usize) -> String {
		if self.description.chars().count() <= max {
			return self.description.clone();
		}
		let head: String = self.description.chars().take(max).collect();
		format!("{}...", head)
	}
}

/// Authenticated user identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
	pub user_id: String,
	pub name: String,
}

/// `loginResult` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResult {
	pub user_id: String,
	pub name: String,
	pub token: String,
}

/// Bare `{ error, message }` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiMessage {
	#[serde(default)]
	pub error: bool,
	#[serde(default)]
	pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
	#[serde(default)]
	pub error: bool,
	#[serde(default)]
	pub message: String,
	#[serde(default)]
	pub login_result: Option<LoginResult>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoriesResponse {
	#[serde(default)]
	pub error: bool,
	#[serde(default)]
	pub message: String,
	#[serde(default)]
	pub list_story: Vec<Story>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoryResponse {
	#[serde(default)]
	pub error: bool,
	#[serde(default)]
	pub message: String,
	#[serde(default)]
	pub story: Option<Story>,
}

/// Paging parameters of `GET /stories`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListQuery {
	pub page: u32,
	pub size: u32,
	pub with_location: bool,
}

impl Default for ListQuery {
	fn default() -> Self {
		Self {
			page: 1,
			size: 10,
			with_location: false,
		}
	}
}

impl ListQuery {
	/// Query pairs in the order the API documents them.
	pub fn to_pairs(&self) -> [(&'static str, String); 3] {
		[
			("page", self.page.to_string()),
			("size", self.size.to_string()),
			("location", if self.with_location { "1" } else { "0" }.to_string()),
		]
	}
}

/// Captured photo ready for multipart upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
	pub file_name: String,
	pub mime: String,
	pub bytes: Bytes,
}

impl Photo {
	/// A JPEG capture under the conventional file name.
	pub fn jpeg(bytes: impl Into<Bytes>) -> Self {
		Self {
			file_name: "story-photo.jpg".to_string(),
			mime: "image/jpeg".to_string(),
			bytes: bytes.into(),
		}
	}
}

/// Validated upload payload.
#[derive(Debug, Clone, PartialEq)]
pub struct NewStory {
	pub description: String,
	pub photo: Photo,
	pub lat: Option<f64>,
	pub lon: Option<f64>,
}

impl NewStory {
	/// Coordinates are sent only as a pair.
	pub fn location(&self) -> Option<(f64, f64)> {
		match (self.lat, self.lon) {
			(Some(lat), Some(lon)) => Some((lat, lon)),
			_ => None,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushKeys {
	pub p256dh: String,
	pub auth: String,
}

/// Web push subscription as registered with the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushSubscription {
	pub endpoint: String,
	pub keys: PushKeys,
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_story_decodes_camel_case() {
		let story: Story = serde_json::from_value(json!({
			"id": "story-FvU4u0Vp2S3PMsFg",
			"name": "Dimas",
			"description": "Lorem Ipsum",
			"photoUrl": "https://story-api.dicoding.dev/images/stories/photos.jpg",
			"createdAt": "2022-01-08T06:34:18.598Z",
			"lat": -10.212,
			"lon": -16.002
		}))
		.unwrap();

		assert_eq!(story.id, "story-FvU4u0Vp2S3PMsFg");
		assert_eq!(story.location(), Some((-10.212, -16.002)));
	}

	#[rstest]
	fn test_story_without_coordinates() {
		let story: Story = serde_json::from_value(json!({
			"id": "s",
			"name": "n",
			"description": "d",
			"photoUrl": "u",
			"createdAt": "2022-01-08T06:34:18.598Z",
			"lat": null
		}))
		.unwrap();

		assert_eq!(story.lat, None);
		assert_eq!(story.location(), None);
	}

	#[rstest]
	#[case(Some(0.0), Some(0.0), Some((0.0, 0.0)))]
	#[case(Some(1.0), None, None)]
	#[case(None, Some(1.0), None)]
	fn test_location_requires_both(
		#[case] lat: Option<f64>,
		#[case] lon: Option<f64>,
		#[case] expected: Option<(f64, f64)>,
	) {
		let story = Story {
			id: "1".into(),
			name: "n".into(),
			description: "d".into(),
			photo_url: "u".into(),
			created_at: Utc::now(),
			lat,
			lon,
		};
		assert_eq!(story.location(), expected);
	}

	#[rstest]
	fn test_error_body_decodes_into_login_response() {
		let response: LoginResponse =
			serde_json::from_value(json!({ "error": true, "message": "Invalid password" })).unwrap();

		assert!(response.error);
		assert_eq!(response.message, "Invalid password");
		assert!(response.login_result.is_none());
	}

	#[rstest]
	fn test_list_query_pairs() {
		let query = ListQuery {
			page: 2,
			size: 5,
			with_location: true,
		};
		let pairs = query.to_pairs();
		assert_eq!(pairs[0], ("page", "2".to_string()));
		assert_eq!(pairs[2], ("location", "1".to_string()));
	}

	#[rstest]
	fn test_excerpt_truncates_on_char_boundary() {
		let mut story = Story {
			id: "1".into(),
			name: "n".into(),
			description: "ééééé".into(),
			photo_url: "u".into(),
			created_at: Utc::now(),
			lat: None,
			lon: None,
		};
		assert_eq!(story.excerpt(3), "ééé...");
		story.description = "short".into();
		assert_eq!(story.excerpt(50), "short");
	}
}
