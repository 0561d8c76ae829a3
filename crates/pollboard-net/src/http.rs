// HTTP client for the polling backend.
//
// Every call maps onto one REST endpoint under `/api`. Non-success answers
// are turned into `ApiError::Backend`, carrying the `{"message": ...}` text
// from the body when the backend sent one.

use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use pollboard_core::api::{ApiError, PollApi};
use pollboard_core::config::Config;
use pollboard_core::model::{OptionId, Poll, PollDraft, PollId, User};

// ---------------------------------------------------------------------------
// Wire bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct NewOption<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct NewPoll<'a> {
    question: &'a str,
    options: Vec<NewOption<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoteBody<'a> {
    option_id: &'a OptionId,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginBody<'a> {
    id_token: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    user: User,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

// ---------------------------------------------------------------------------
// HttpPollApi
// ---------------------------------------------------------------------------

/// `PollApi` over the backend's REST endpoints.
pub struct HttpPollApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpPollApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.backend_url())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn poll_url(&self, id: &PollId) -> String {
        self.url(&format!("/api/polls/{}", id.as_str()))
    }

    /// Send `request` and decode a JSON body on success.
    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let text = self.send(request).await?;
        serde_json::from_str(&text).map_err(|e| {
            warn!("Failed to decode backend response: {}", e);
            ApiError::Decode(e.to_string())
        })
    }

    /// Send `request`, returning the raw body on success.
    async fn send(&self, request: RequestBuilder) -> Result<String, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        debug!(status = status.as_u16(), bytes = text.len(), "backend response");

        if status.is_success() {
            Ok(text)
        } else {
            Err(error_from_body(status, &text))
        }
    }
}

/// Build the error for a non-success response.
pub(crate) fn error_from_body(status: StatusCode, body: &str) -> ApiError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty());
    ApiError::Backend {
        status: status.as_u16(),
        message,
    }
}

#[async_trait]
impl PollApi for HttpPollApi {
    async fn list_polls(&self) -> Result<Vec<Poll>, ApiError> {
        self.fetch(self.http.get(self.url("/api/polls"))).await
    }

    async fn get_poll(&self, id: &PollId) -> Result<Poll, ApiError> {
        self.fetch(self.http.get(self.poll_url(id))).await
    }

    async fn create_poll(&self, credential: &str, draft: &PollDraft) -> Result<Poll, ApiError> {
        let body = NewPoll {
            question: &draft.question,
            options: draft
                .options
                .iter()
                .map(|text| NewOption { text })
                .collect(),
        };
        let request = self
            .http
            .post(self.url("/api/polls"))
            .bearer_auth(credential)
            .json(&body);
        self.fetch(request).await
    }

    async fn vote(
        &self,
        credential: &str,
        poll: &PollId,
        option: &OptionId,
    ) -> Result<Poll, ApiError> {
        let request = self
            .http
            .put(format!("{}/vote", self.poll_url(poll)))
            .bearer_auth(credential)
            .json(&VoteBody { option_id: option });
        self.fetch(request).await
    }

    async fn delete_poll(&self, credential: &str, id: &PollId) -> Result<(), ApiError> {
        // Any success body is accepted.
        self.send(self.http.delete(self.poll_url(id)).bearer_auth(credential))
            .await
            .map(|_| ())
    }

    async fn exchange_credential(&self, credential: &str) -> Result<User, ApiError> {
        let request = self
            .http
            .post(self.url("/api/auth/google-login"))
            .json(&LoginBody {
                id_token: credential,
            });
        let response: LoginResponse = self.fetch(request).await?;
        Ok(response.user)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_join_without_double_slash() {
        let api = HttpPollApi::new("http://localhost:5000/");
        assert_eq!(api.url("/api/polls"), "http://localhost:5000/api/polls");
        assert_eq!(
            api.poll_url(&PollId::new("abc")),
            "http://localhost:5000/api/polls/abc"
        );
    }

    #[test]
    fn from_config_uses_backend_url() {
        let api = HttpPollApi::from_config(&Config::default());
        assert_eq!(api.url("/api/polls"), "http://localhost:5000/api/polls");
    }

    #[test]
    fn error_body_message_is_kept() {
        let err = error_from_body(
            StatusCode::BAD_REQUEST,
            r#"{"message":"You have already voted on this poll."}"#,
        );
        assert_eq!(
            err,
            ApiError::Backend {
                status: 400,
                message: Some("You have already voted on this poll.".into()),
            }
        );
    }

    #[test]
    fn non_json_error_body_has_no_message() {
        let err = error_from_body(StatusCode::BAD_GATEWAY, "<html>Bad Gateway</html>");
        assert_eq!(
            err,
            ApiError::Backend {
                status: 502,
                message: None,
            }
        );
    }

    #[test]
    fn blank_error_message_is_dropped() {
        let err = error_from_body(StatusCode::FORBIDDEN, r#"{"message":"  "}"#);
        assert_eq!(err.user_message("fallback"), "fallback");
    }

    #[test]
    fn request_bodies_use_backend_field_names() {
        let vote = serde_json::to_value(VoteBody {
            option_id: &OptionId::new("o1"),
        })
        .unwrap();
        assert_eq!(vote, serde_json::json!({ "optionId": "o1" }));

        let login = serde_json::to_value(LoginBody { id_token: "tok" }).unwrap();
        assert_eq!(login, serde_json::json!({ "idToken": "tok" }));

        let poll = serde_json::to_value(NewPoll {
            question: "Best color?",
            options: vec![NewOption { text: "Red" }, NewOption { text: "Blue" }],
        })
        .unwrap();
        assert_eq!(
            poll,
            serde_json::json!({
                "question": "Best color?",
                "options": [{ "text": "Red" }, { "text": "Blue" }]
            })
        );
    }

    #[test]
    fn login_response_unwraps_user() {
        let body = r#"{"user":{"_id":"u1","displayName":"Ada","votedPolls":[]}}"#;
        let parsed: LoginResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.user.display_name, "Ada");
    }
}
