// Voting, poll creation, poll deletion, and session workflows.
//
// Each workflow is split in two: the request half checks local preconditions
// and returns the backend call to make (or raises an alert instead), and the
// completion half merges the backend's answer into the stores. Stores only
// change on success.

use tracing::{debug, info, warn};

use crate::alert::AlertConfig;
use crate::api::{ApiError, ApiRequest};
use crate::app::AppState;
use crate::model::{OptionId, Poll, PollId, User};

pub const VOTE_FAILED_FALLBACK: &str = "An error occurred while voting.";
pub const CREATE_FAILED_FALLBACK: &str = "An error occurred while creating the poll.";
pub const DELETE_FAILED_FALLBACK: &str = "An error occurred while deleting the poll.";
pub const SIGN_IN_FAILED_FALLBACK: &str = "Sign-in failed.";
pub const NOT_OWNER_MESSAGE: &str = "You can only delete polls you created.";

impl AppState {
    /// Credential to authenticate with, if a session is present.
    fn session_credential(&self) -> Option<String> {
        if self.session.is_authenticated() {
            self.credential.clone()
        } else {
            None
        }
    }

    // -----------------------------------------------------------------------
    // Voting
    // -----------------------------------------------------------------------

    /// Start a vote on `option_id` of `poll_id`.
    pub fn vote(&mut self, poll_id: PollId, option_id: OptionId) -> Vec<ApiRequest> {
        let Some(credential) = self.session_credential() else {
            info!("Vote on poll {} attempted without a session", poll_id);
            self.alerts.request(AlertConfig::not_logged_in("vote on polls"));
            return Vec::new();
        };

        if self.session.has_voted(&poll_id) {
            debug!("Already voted on poll {}, ignoring", poll_id);
            return Vec::new();
        }

        if !self.session.begin_vote(poll_id.clone()) {
            debug!("Vote on poll {} already in flight", poll_id);
            return Vec::new();
        }

        info!("Voting on poll {} for option {}", poll_id, option_id);
        vec![ApiRequest::Vote {
            credential,
            poll_id,
            option_id,
        }]
    }

    pub(crate) fn vote_completed(
        &mut self,
        poll_id: PollId,
        option_id: OptionId,
        result: Result<Poll, ApiError>,
    ) {
        match result {
            Ok(poll) => {
                if poll.id != poll_id {
                    warn!("Vote on poll {} answered with poll {}", poll_id, poll.id);
                }
                self.router.patch_detail(&poll);
                self.polls.upsert(poll);
                self.session.record_vote(poll_id, option_id);
            }
            Err(e) => {
                warn!("Vote on poll {} failed: {}", poll_id, e);
                self.session.abandon_vote(&poll_id);
                self.alerts.request(AlertConfig::request_failed(
                    "Voting Error",
                    &e,
                    VOTE_FAILED_FALLBACK,
                ));
            }
        }
    }

    // -----------------------------------------------------------------------
    // Creation
    // -----------------------------------------------------------------------

    /// Validate the creation form and submit it.
    pub fn submit_poll(&mut self) -> Vec<ApiRequest> {
        let Some(credential) = self.session_credential() else {
            self.alerts.request(AlertConfig::not_logged_in("create polls"));
            return Vec::new();
        };

        if self.form.is_submitting() {
            debug!("Poll submission already in flight");
            return Vec::new();
        }

        let draft = match self.form.validate() {
            Ok(draft) => draft,
            Err(message) => {
                self.alerts.request(AlertConfig::validation(message));
                return Vec::new();
            }
        };

        info!(
            "Creating poll {:?} with {} options",
            draft.question,
            draft.options.len()
        );
        self.form.set_submitting(true);
        vec![ApiRequest::CreatePoll { credential, draft }]
    }

    pub(crate) fn create_completed(&mut self, result: Result<Poll, ApiError>) {
        match result {
            Ok(poll) => {
                info!("Created poll {}", poll.id);
                self.polls.prepend(poll);
                self.form.reset();
            }
            Err(e) => {
                warn!("Poll creation failed: {}", e);
                self.form.set_submitting(false);
                self.alerts.request(AlertConfig::request_failed(
                    "Creation Error",
                    &e,
                    CREATE_FAILED_FALLBACK,
                ));
            }
        }
    }

    // -----------------------------------------------------------------------
    // Deletion
    // -----------------------------------------------------------------------

    /// Ask the user to confirm deleting `poll_id`.
    pub fn request_delete(&mut self, poll_id: PollId) {
        if !self.session.is_authenticated() {
            self.alerts.request(AlertConfig::not_logged_in("delete polls"));
            return;
        }

        let known = self
            .polls
            .get(&poll_id)
            .or_else(|| self.router.detail_poll().filter(|p| p.id == poll_id));
        if let Some(poll) = known {
            if !self.session.owns(poll) {
                self.alerts.request(AlertConfig::not_allowed(NOT_OWNER_MESSAGE));
                return;
            }
        }

        self.alerts.request(AlertConfig::confirm_delete(poll_id));
    }

    /// The user confirmed; the dialog is already closed.
    pub(crate) fn delete_confirmed(&mut self, poll_id: PollId) -> Vec<ApiRequest> {
        let Some(credential) = self.session_credential() else {
            self.alerts.request(AlertConfig::not_logged_in("delete polls"));
            return Vec::new();
        };
        info!("Deleting poll {}", poll_id);
        vec![ApiRequest::DeletePoll {
            credential,
            poll_id,
        }]
    }

    pub(crate) fn delete_completed(
        &mut self,
        poll_id: PollId,
        result: Result<(), ApiError>,
    ) -> Vec<ApiRequest> {
        match result {
            Ok(()) => {
                info!("Deleted poll {}", poll_id);
                self.polls.remove(&poll_id);
                if self.router.is_selected(&poll_id) {
                    self.router.back();
                    return self.load_polls();
                }
                Vec::new()
            }
            Err(e) => {
                warn!("Deleting poll {} failed: {}", poll_id, e);
                self.alerts.request(AlertConfig::request_failed(
                    "Deletion Error",
                    &e,
                    DELETE_FAILED_FALLBACK,
                ));
                Vec::new()
            }
        }
    }

    // -----------------------------------------------------------------------
    // Session
    // -----------------------------------------------------------------------

    /// Exchange an identity-provider credential for a session.
    pub fn sign_in(&mut self, credential: String) -> Vec<ApiRequest> {
        let credential = credential.trim().to_string();
        if credential.is_empty() {
            self.alerts
                .request(AlertConfig::validation("Please paste a sign-in credential."));
            return Vec::new();
        }
        vec![ApiRequest::SignIn {
            credential,
            restoring: false,
        }]
    }

    pub(crate) fn sign_in_completed(
        &mut self,
        credential: String,
        restoring: bool,
        result: Result<User, ApiError>,
    ) -> Vec<ApiRequest> {
        match result {
            Ok(user) => {
                info!("Signed in as {}", user.display_name);
                self.session.sign_in(user);
                if let Err(e) = self.credentials.save(&credential) {
                    warn!("Failed to persist credential: {}", e);
                }
                self.credential = Some(credential);
                self.load_polls()
            }
            Err(e) => {
                warn!("Credential exchange failed: {}", e);
                self.forget_session();
                if restoring {
                    self.load_polls()
                } else {
                    self.alerts.request(AlertConfig::request_failed(
                        "Sign-in Error",
                        &e,
                        SIGN_IN_FAILED_FALLBACK,
                    ));
                    Vec::new()
                }
            }
        }
    }

    /// Drop the session and stored credential, then refetch publicly.
    pub fn sign_out(&mut self) -> Vec<ApiRequest> {
        info!("Signing out");
        self.forget_session();
        self.form.reset();
        self.load_polls()
    }

    fn forget_session(&mut self) {
        self.session.sign_out();
        self.credential = None;
        if let Err(e) = self.credentials.clear() {
            warn!("Failed to clear stored credential: {}", e);
        }
    }
}
