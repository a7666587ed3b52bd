//! Intercepted requests and the responses the engine hands back.

use bytes::Bytes;
use url::Url;

/// Fetch mode of an intercepted request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMode {
	/// Top-level document navigation.
	Navigate,
	SameOrigin,
	NoCors,
	Cors,
}

/// An outgoing request as seen by the worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
	pub url: Url,
	pub method: String,
	pub mode: RequestMode,
	pub headers: Vec<(String, String)>,
}

impl FetchRequest {
	/// A plain `GET` subresource request.
	pub fn get(url: Url) -> Self {
		Self {
			url,
			method: "GET".to_string(),
			mode: RequestMode::NoCors,
			headers: Vec::new(),
		}
	}

	/// A document navigation, accepting HTML the way browsers send it.
	pub fn navigate(url: Url) -> Self {
		Self {
			mode: RequestMode::Navigate,
			..Self::get(url)
		}
		.with_header("Accept", "text/html,application/xhtml+xml,*/*;q=0.8")
	}

	pub fn with_method(mut self, method: impl Into<String>) -> Self {
		self.method = method.into();
		self
	}

	pub fn with_mode(mut self, mode: RequestMode) -> Self {
		self.mode = mode;
		self
	}

	pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));
		self
	}

	/// Case-insensitive header lookup.
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers
			.iter()
			.find(|(key, _)| key.eq_ignore_ascii_case(name))
			.map(|(_, value)| value.as_str())
	}

	/// Only `GET` requests can be matched against or stored in a cache.
	pub fn is_get(&self) -> bool {
		self.method.eq_ignore_ascii_case("GET")
	}

	pub fn is_navigation(&self) -> bool {
		self.mode == RequestMode::Navigate
	}

	/// `true` when the `Accept` header lists `text/html`. A missing header
	/// does not accept HTML.
	pub fn accepts_html(&self) -> bool {
		self.header("accept")
			.is_some_and(|accept| accept.contains("text/html"))
	}

	/// Cache key: the full request URL, query and fragment included.
	pub fn cache_key(&self) -> String {
		self.url.as_str().to_string()
	}
}

/// Where a response handed back by the engine came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseSource {
	Network,
	Cache,
	/// The precached offline page standing in for an unreachable resource.
	OfflineFallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
	pub status: u16,
	pub headers: Vec<(String, String)>,
	pub body: Bytes,
	pub source: ResponseSource,
}

impl FetchResponse {
	/// A network response.
	pub fn network(status: u16, body: impl Into<Bytes>) -> Self {
		Self {
			status,
			headers: Vec::new(),
			body: body.into(),
			source: ResponseSource::Network,
		}
	}

	pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));
		self
	}

	/// Status in the `2xx` range.
	pub fn is_ok(&self) -> bool {
		(200..300).contains(&self.status)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn url(s: &str) -> Url {
		Url::parse(s).unwrap()
	}

	#[rstest]
	fn test_navigate_accepts_html() {
		let request = FetchRequest::navigate(url("https://app.test/"));

		assert!(request.is_navigation());
		assert!(request.accepts_html());
	}

	#[rstest]
	#[case(None, false)]
	#[case(Some("image/avif,image/webp,*/*"), false)]
	#[case(Some("text/html"), true)]
	fn test_accepts_html(#[case] accept: Option<&str>, #[case] expected: bool) {
		let mut request = FetchRequest::get(url("https://app.test/logo.png"));
		if let Some(accept) = accept {
			request = request.with_header("ACCEPT", accept);
		}
		assert_eq!(request.accepts_html(), expected);
	}

	#[rstest]
	#[case("GET", true)]
	#[case("get", true)]
	#[case("POST", false)]
	#[case("DELETE", false)]
	fn test_is_get(#[case] method: &str, #[case] expected: bool) {
		let request = FetchRequest::get(url("https://app.test/")).with_method(method);
		assert_eq!(request.is_get(), expected);
	}

	#[rstest]
	fn test_cache_key_is_full_url() {
		let request = FetchRequest::get(url("https://app.test/assets/app.js?v=3"));
		assert_eq!(request.cache_key(), "https://app.test/assets/app.js?v=3");
	}

	#[rstest]
	#[case(200, true)]
	#[case(204, true)]
	#[case(304, false)]
	#[case(404, false)]
	fn test_response_is_ok(#[case] status: u16, #[case] expected: bool) {
		assert_eq!(FetchResponse::network(status, "").is_ok(), expected);
	}
}
