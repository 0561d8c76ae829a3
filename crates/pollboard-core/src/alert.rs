// Modal alert / confirmation state.
//
// At most one alert is live at a time. Workflows request a modal by handing a
// fresh `AlertConfig` to the controller, which replaces whatever was showing.
// The view resolves it with `confirm` or `cancel`, which close the modal and
// return the action the workflow attached to that button.

use crate::api::ApiError;
use crate::model::PollId;

/// What happens when a modal button is pressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertAction {
    /// Close the modal, nothing else.
    Dismiss,
    /// Issue the delete request for this poll.
    DeletePoll(PollId),
}

/// Everything needed to render one modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertConfig {
    pub title: String,
    pub description: String,
    pub confirm_label: String,
    pub on_confirm: AlertAction,
    /// `None` hides the cancel button.
    pub cancel: Option<(String, AlertAction)>,
}

impl AlertConfig {
    /// Single-button informational notice.
    pub fn notice(title: impl Into<String>, description: impl Into<String>) -> Self {
        AlertConfig {
            title: title.into(),
            description: description.into(),
            confirm_label: "OK".into(),
            on_confirm: AlertAction::Dismiss,
            cancel: None,
        }
    }

    /// "Not Logged In" notice; `action` completes "Please sign in to ...".
    pub fn not_logged_in(action: &str) -> Self {
        Self::notice("Not Logged In", format!("Please sign in to {action}."))
    }

    pub fn not_allowed(description: impl Into<String>) -> Self {
        Self::notice("Not Allowed", description)
    }

    pub fn validation(description: impl Into<String>) -> Self {
        Self::notice("Validation Error", description)
    }

    /// Notice for a failed backend call: the backend's message when it sent
    /// one, otherwise `fallback`.
    pub fn request_failed(title: &str, err: &ApiError, fallback: &str) -> Self {
        Self::notice(title, err.user_message(fallback))
    }

    /// Destructive confirmation for deleting `poll_id`.
    pub fn confirm_delete(poll_id: PollId) -> Self {
        AlertConfig {
            title: "Confirm Deletion".into(),
            description: "Are you sure you want to delete this poll? This action cannot be undone."
                .into(),
            confirm_label: "Delete".into(),
            on_confirm: AlertAction::DeletePoll(poll_id),
            cancel: Some(("Cancel".into(), AlertAction::Dismiss)),
        }
    }

    pub fn cancel_label(&self) -> Option<&str> {
        self.cancel.as_ref().map(|(label, _)| label.as_str())
    }
}

/// Holds the single live modal, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlertController {
    current: Option<AlertConfig>,
}

impl AlertController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `config`, replacing any modal that was open.
    pub fn request(&mut self, config: AlertConfig) {
        self.current = Some(config);
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    pub fn current(&self) -> Option<&AlertConfig> {
        self.current.as_ref()
    }

    /// Close the modal via its confirm button.
    pub fn confirm(&mut self) -> Option<AlertAction> {
        self.current.take().map(|c| c.on_confirm)
    }

    /// Close the modal via its cancel button (or by dismissing it). Returns
    /// the cancel action when the modal had one.
    pub fn cancel(&mut self) -> Option<AlertAction> {
        self.current
            .take()
            .and_then(|c| c.cancel.map(|(_, action)| action))
    }
}
