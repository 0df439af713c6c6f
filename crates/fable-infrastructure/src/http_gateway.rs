//! HttpStoryGateway - JSON-over-HTTP implementation of the story service contract.
//!
//! All four operations are `POST /api/<name>` with a JSON body. No retries,
//! no timeouts and no caching: each call is a single request.

use async_trait::async_trait;
use fable_core::story::{
    AcquireLineRequest, LineAssignment, ReleaseStoryRequest, StoryGateway, SubmitLineRequest,
};
use fable_core::user::User;
use fable_core::{FableError, Result};
use reqwest::Client;
use serde::Serialize;
use serde_json::{Value, json};

use crate::dto::{GetLineReply, SubmitLineReply, VerifyUsernameReply, decode_reply};

const VERIFY_USERNAME: &str = "verify_username";
const GET_LINE: &str = "get_line";
const SUBMIT_LINE: &str = "submit_line";
const RELEASE_STORY: &str = "release_story";

/// Talks to the story service over HTTP.
#[derive(Clone)]
pub struct HttpStoryGateway {
    client: Client,
    base_url: String,
}

impl HttpStoryGateway {
    /// Creates a gateway for the service at `base_url` (scheme + host, no `/api`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, operation: &str) -> String {
        format!("{}/api/{}", self.base_url, operation)
    }

    /// Posts `body` and returns the parsed JSON reply.
    ///
    /// A body carrying `error` is handed back as-is whatever the status, so
    /// [`decode_reply`] reports the server's own message. A non-JSON or
    /// non-2xx reply without one is a transport failure.
    async fn post<B: Serialize + ?Sized>(&self, operation: &str, body: &B) -> Result<Value> {
        let url = self.endpoint(operation);
        tracing::debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| FableError::transport(format!("Failed to reach {operation}: {e}")))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| FableError::transport(format!("Failed to read {operation} reply: {e}")))?;

        let parsed = if text.trim().is_empty() {
            Ok(json!({}))
        } else {
            serde_json::from_str::<Value>(&text)
        };

        match parsed {
            Ok(value) => {
                let carries_error = value.get("error").is_some_and(|error| !error.is_null());
                if carries_error || status.is_success() {
                    Ok(value)
                } else {
                    Err(FableError::transport(format!(
                        "{operation} returned {status}: {text}"
                    )))
                }
            }
            Err(e) if status.is_success() => Err(FableError::protocol(format!(
                "{operation} returned invalid JSON: {e}"
            ))),
            Err(_) => Err(FableError::transport(format!(
                "{operation} returned {status}: {text}"
            ))),
        }
    }
}

#[async_trait]
impl StoryGateway for HttpStoryGateway {
    async fn verify_username(&self, username: &str) -> Result<User> {
        let body = self
            .post(VERIFY_USERNAME, &json!({ "username": username }))
            .await?;
        let reply: VerifyUsernameReply = decode_reply(body)?;
        Ok(reply.user)
    }

    async fn acquire_line(&self, request: &AcquireLineRequest) -> Result<LineAssignment> {
        let body = self.post(GET_LINE, request).await?;
        let reply: GetLineReply = decode_reply(body)?;
        LineAssignment::try_from(reply)
    }

    async fn submit_line(&self, request: &SubmitLineRequest) -> Result<()> {
        let body = self.post(SUBMIT_LINE, request).await?;
        let _: SubmitLineReply = decode_reply(body)?;
        Ok(())
    }

    async fn release_story(&self, request: &ReleaseStoryRequest) {
        if let Err(e) = self.post(RELEASE_STORY, request).await {
            tracing::warn!(
                "Release of story {:?} for @{} was not delivered: {}",
                request.story_id,
                request.username,
                e
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fable_core::story::StoryId;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_acquire_line_posts_history() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/get_line")
                    .json_body(json!({ "username": "bob", "storyIdHistory": [] }));
                then.status(200).json_body(json!({
                    "storyId": 7,
                    "prevLine": "The fox ran.",
                    "prevAuthor": { "username": "alice", "first_name": "Alice", "last_name": "L" },
                    "currIndex": 2,
                    "maxLines": 5
                }));
            })
            .await;

        let gateway = HttpStoryGateway::new(server.base_url());
        let assignment = gateway
            .acquire_line(&AcquireLineRequest {
                username: "bob".to_string(),
                story_id: None,
                story_id_history: Vec::new(),
            })
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(assignment.story_id, Some(StoryId(7)));
        assert_eq!(assignment.curr_index, Some(2));
    }

    #[tokio::test]
    async fn test_error_body_becomes_remote_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/get_line");
                then.status(200)
                    .json_body(json!({ "error": "no story available" }));
            })
            .await;

        let gateway = HttpStoryGateway::new(server.base_url());
        let err = gateway
            .acquire_line(&AcquireLineRequest {
                username: "bob".to_string(),
                story_id: Some(StoryId(7)),
                story_id_history: vec![StoryId(7)],
            })
            .await
            .unwrap_err();

        assert_eq!(err, FableError::remote("no story available"));
    }

    #[tokio::test]
    async fn test_submit_line_accepts_empty_object() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/submit_line").json_body(json!({
                    "username": "bob",
                    "storyId": 7,
                    "line": "It jumped."
                }));
                then.status(200).json_body(json!({}));
            })
            .await;

        let gateway = HttpStoryGateway::new(format!("{}/", server.base_url()));
        gateway
            .submit_line(&SubmitLineRequest {
                username: "bob".to_string(),
                story_id: Some(StoryId(7)),
                line: "It jumped.".to_string(),
            })
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_server_failure_without_error_body_is_transport_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/verify_username");
                then.status(500).body("Internal Server Error");
            })
            .await;

        let gateway = HttpStoryGateway::new(server.base_url());
        let err = gateway.verify_username("Parth").await.unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_verify_username_returns_user() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/verify_username")
                    .json_body(json!({ "username": "Parth" }));
                then.status(200).json_body(json!({
                    "user": { "username": "Parth", "first_name": "Parth", "last_name": "S" }
                }));
            })
            .await;

        let gateway = HttpStoryGateway::new(server.base_url());
        let user = gateway.verify_username("Parth").await.unwrap();
        assert_eq!(user.username, "Parth");
    }

    #[tokio::test]
    async fn test_release_swallows_failures() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/release_story")
                    .json_body(json!({ "username": "bob", "storyId": 7 }));
                then.status(503);
            })
            .await;

        let gateway = HttpStoryGateway::new(server.base_url());
        gateway
            .release_story(&ReleaseStoryRequest {
                username: "bob".to_string(),
                story_id: Some(StoryId(7)),
            })
            .await;

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        let gateway = HttpStoryGateway::new("http://127.0.0.1:1");
        let err = gateway.verify_username("Parth").await.unwrap_err();
        assert!(err.is_transport());
    }
}
