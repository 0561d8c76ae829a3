// Backend seam: the calls the client makes, and the request/outcome pair the
// event loop uses to run them off-loop.

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{OptionId, Poll, PollDraft, PollId, User};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The backend answered with a non-success status.
    #[error("backend returned status {status}{}", detail_suffix(.message))]
    Backend { status: u16, message: Option<String> },

    #[error("network error: {0}")]
    Transport(String),

    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// Text for a user-facing notice: the backend's own message when it sent
    /// one, otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Backend {
                message: Some(m), ..
            } if !m.trim().is_empty() => m.clone(),
            _ => fallback.to_string(),
        }
    }
}

fn detail_suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {m}"))
        .unwrap_or_default()
}

/// Operations offered by the polling backend.
///
/// Calls that take a `credential` are authenticated with it as a bearer
/// token.
#[async_trait]
pub trait PollApi: Send + Sync {
    async fn list_polls(&self) -> Result<Vec<Poll>, ApiError>;

    async fn get_poll(&self, id: &PollId) -> Result<Poll, ApiError>;

    async fn create_poll(&self, credential: &str, draft: &PollDraft) -> Result<Poll, ApiError>;

    async fn vote(
        &self,
        credential: &str,
        poll: &PollId,
        option: &OptionId,
    ) -> Result<Poll, ApiError>;

    async fn delete_poll(&self, credential: &str, id: &PollId) -> Result<(), ApiError>;

    /// Trade an identity-provider credential for the application user.
    async fn exchange_credential(&self, credential: &str) -> Result<User, ApiError>;
}

// ---------------------------------------------------------------------------
// Requests and outcomes
// ---------------------------------------------------------------------------

/// A backend call the application state wants made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiRequest {
    LoadPolls,
    LoadPoll(PollId),
    Vote {
        credential: String,
        poll_id: PollId,
        option_id: OptionId,
    },
    CreatePoll {
        credential: String,
        draft: PollDraft,
    },
    DeletePoll {
        credential: String,
        poll_id: PollId,
    },
    /// Exchange a credential for a session. `restoring` marks the boot-time
    /// re-authentication with a stored credential.
    SignIn { credential: String, restoring: bool },
}

impl ApiRequest {
    /// Short name for logs. Never includes the credential.
    pub fn label(&self) -> &'static str {
        match self {
            ApiRequest::LoadPolls => "load-polls",
            ApiRequest::LoadPoll(_) => "load-poll",
            ApiRequest::Vote { .. } => "vote",
            ApiRequest::CreatePoll { .. } => "create-poll",
            ApiRequest::DeletePoll { .. } => "delete-poll",
            ApiRequest::SignIn { .. } => "sign-in",
        }
    }
}

/// The completed counterpart of an [`ApiRequest`].
#[derive(Debug, Clone, PartialEq)]
pub enum ApiOutcome {
    PollsLoaded(Result<Vec<Poll>, ApiError>),
    PollLoaded {
        poll_id: PollId,
        result: Result<Poll, ApiError>,
    },
    Voted {
        poll_id: PollId,
        option_id: OptionId,
        result: Result<Poll, ApiError>,
    },
    Created(Result<Poll, ApiError>),
    Deleted {
        poll_id: PollId,
        result: Result<(), ApiError>,
    },
    SignedIn {
        credential: String,
        restoring: bool,
        result: Result<User, ApiError>,
    },
}

/// Run one request against `api`.
pub async fn execute(api: &dyn PollApi, request: ApiRequest) -> ApiOutcome {
    match request {
        ApiRequest::LoadPolls => ApiOutcome::PollsLoaded(api.list_polls().await),
        ApiRequest::LoadPoll(poll_id) => {
            let result = api.get_poll(&poll_id).await;
            ApiOutcome::PollLoaded { poll_id, result }
        }
        ApiRequest::Vote {
            credential,
            poll_id,
            option_id,
        } => {
            let result = api.vote(&credential, &poll_id, &option_id).await;
            ApiOutcome::Voted {
                poll_id,
                option_id,
                result,
            }
        }
        ApiRequest::CreatePoll { credential, draft } => {
            ApiOutcome::Created(api.create_poll(&credential, &draft).await)
        }
        ApiRequest::DeletePoll {
            credential,
            poll_id,
        } => {
            let result = api.delete_poll(&credential, &poll_id).await;
            ApiOutcome::Deleted { poll_id, result }
        }
        ApiRequest::SignIn {
            credential,
            restoring,
        } => {
            let result = api.exchange_credential(&credential).await;
            ApiOutcome::SignedIn {
                credential,
                restoring,
                result,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_prefers_backend_text() {
        let err = ApiError::Backend {
            status: 400,
            message: Some("You have already voted on this poll.".into()),
        };
        assert_eq!(
            err.user_message("An error occurred while voting."),
            "You have already voted on this poll."
        );
    }

    #[test]
    fn user_message_falls_back() {
        let fallback = "An error occurred while voting.";
        assert_eq!(
            ApiError::Transport("connection refused".into()).user_message(fallback),
            fallback
        );
        assert_eq!(
            ApiError::Backend {
                status: 500,
                message: None
            }
            .user_message(fallback),
            fallback
        );
        assert_eq!(
            ApiError::Backend {
                status: 500,
                message: Some("  ".into())
            }
            .user_message(fallback),
            fallback
        );
    }

    #[test]
    fn display_includes_status_and_message() {
        let err = ApiError::Backend {
            status: 403,
            message: Some("Not the owner".into()),
        };
        assert_eq!(err.to_string(), "backend returned status 403: Not the owner");
        let bare = ApiError::Backend {
            status: 502,
            message: None,
        };
        assert_eq!(bare.to_string(), "backend returned status 502");
    }
}
