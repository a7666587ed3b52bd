//! Network access seam.

use crate::error::NetworkError;
use crate::request::{FetchRequest, FetchResponse};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Performs a request against the real network.
///
/// Resolves with any HTTP response, error statuses included; only transport
/// failures are errors.
#[async_trait]
pub trait Network: Send + Sync {
	async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, NetworkError>;
}

/// `reqwest`-backed [`Network`].
#[derive(Debug, Clone)]
pub struct HttpNetwork {
	client: Client,
}

impl HttpNetwork {
	pub fn new() -> Result<Self, NetworkError> {
		let client = Client::builder()
			.timeout(Duration::from_secs(30))
			.build()
			.map_err(|e| NetworkError::Failed(e.to_string()))?;
		Ok(Self { client })
	}

	pub fn with_client(client: Client) -> Self {
		Self { client }
	}
}

#[async_trait]
impl Network for HttpNetwork {
	async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, NetworkError> {
		let method = reqwest::Method::from_bytes(request.method.as_bytes())
			.map_err(|e| NetworkError::Failed(e.to_string()))?;

		let mut builder = self.client.request(method, request.url.clone());
		for (name, value) in &request.headers {
			builder = builder.header(name.as_str(), value.as_str());
		}

		let response = builder.send().await.map_err(|e| {
			if e.is_connect() {
				NetworkError::Offline
			} else {
				NetworkError::Failed(e.to_string())
			}
		})?;

		let status = response.status().as_u16();
		let headers = response
			.headers()
			.iter()
			.filter_map(|(name, value)| {
				value
					.to_str()
					.ok()
					.map(|v| (name.as_str().to_string(), v.to_string()))
			})
			.collect();
		let body = response
			.bytes()
			.await
			.map_err(|e| NetworkError::Failed(e.to_string()))?;

		Ok(FetchResponse {
			status,
			headers,
			body,
			source: crate::request::ResponseSource::Network,
		})
	}
}
