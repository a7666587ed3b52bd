//! `HttpStoryApi` against a one-shot local HTTP responder.

use rstest::rstest;
use std::sync::Arc;
use story_api::{ApiError, AuthModel, HttpStoryApi, ListQuery, MemoryStore, StoryApi, StoryModel};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Serves a single request with the given status line and body, and hands
/// back the raw request head.
async fn serve_once(status: &'static str, body: &'static str) -> (String, oneshot::Receiver<String>) {
	let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
	let base_url = format!("http://{}/v1", listener.local_addr().unwrap());
	let (tx, rx) = oneshot::channel();

	tokio::spawn(async move {
		let (mut socket, _) = listener.accept().await.unwrap();
		let mut raw = Vec::new();
		let mut chunk = [0u8; 4096];

		let head_end = loop {
			let n = socket.read(&mut chunk).await.unwrap();
			raw.extend_from_slice(&chunk[..n]);
			if let Some(pos) = raw.windows(4).position(|w| w == b"\r\n\r\n") {
				break pos + 4;
			}
			if n == 0 {
				break raw.len();
			}
		};

		let head = String::from_utf8_lossy(&raw[..head_end]).to_string();
		let content_length = head
			.lines()
			.find_map(|line| {
				let (name, value) = line.split_once(':')?;
				name.eq_ignore_ascii_case("content-length")
					.then(|| value.trim().parse::<usize>().ok())
					.flatten()
			})
			.unwrap_or(0);
		while raw.len() < head_end + content_length {
			let n = socket.read(&mut chunk).await.unwrap();
			if n == 0 {
				break;
			}
			raw.extend_from_slice(&chunk[..n]);
		}

		let response = format!(
			"HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
			status,
			body.len(),
			body
		);
		socket.write_all(response.as_bytes()).await.unwrap();
		socket.shutdown().await.ok();
		let _ = tx.send(head);
	});

	(base_url, rx)
}

#[rstest]
#[tokio::test]
async fn test_error_body_is_decoded_despite_status() {
	let (base_url, head) = serve_once(
		"401 Unauthorized",
		r#"{"error":true,"message":"Invalid password"}"#,
	)
	.await;
	let api = HttpStoryApi::with_client(&base_url, reqwest::Client::new());

	let response = api.login("dimas@example.com", "wrong-pass").await.unwrap();

	assert!(response.error);
	assert_eq!(response.message, "Invalid password");
	let head = head.await.unwrap();
	assert!(head.starts_with("POST /v1/login HTTP/1.1"));
}

#[rstest]
#[tokio::test]
async fn test_non_json_failure_maps_to_status() {
	let (base_url, _head) = serve_once("502 Bad Gateway", "upstream down").await;
	let api = HttpStoryApi::with_client(&base_url, reqwest::Client::new());

	let result = api.story_detail("7", "tok").await;

	assert!(matches!(result, Err(ApiError::Status { status: 502 })));
}

#[rstest]
#[tokio::test]
async fn test_list_query_and_bearer_token_reach_server() {
	let (base_url, head) = serve_once(
		"200 OK",
		r#"{"error":false,"message":"Stories fetched successfully","listStory":[{"id":"story-1","name":"Dimas","description":"Lorem","photoUrl":"https://example.com/1.jpg","createdAt":"2022-01-08T06:34:18.598Z","lat":-6.2,"lon":106.8}]}"#,
	)
	.await;
	let api: Arc<dyn StoryApi> = Arc::new(HttpStoryApi::with_client(&base_url, reqwest::Client::new()));
	let auth = Arc::new(AuthModel::new(
		api.clone(),
		Arc::new(MemoryStore::with_entries([("token", "secret-token")])),
	));
	let model = StoryModel::new(api, auth);

	let stories = model.all_stories(ListQuery::default()).await.unwrap();

	assert_eq!(stories.len(), 1);
	assert_eq!(stories[0].location(), Some((-6.2, 106.8)));
	let head = head.await.unwrap();
	assert!(head.starts_with("GET /v1/stories?page=1&size=10&location=0 HTTP/1.1"));
	assert!(head.to_ascii_lowercase().contains("authorization: bearer secret-token"));
}
