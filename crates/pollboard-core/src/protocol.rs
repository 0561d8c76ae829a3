// Messages exchanged between the front end, the app event loop, and the
// live-update listener.

use crate::alert::AlertConfig;
use crate::form::{CreatePollForm, FormEdit};
use crate::model::{OptionId, Poll, PollId};
use crate::router::View;
use crate::store::SessionStore;

/// Push-channel connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    Connected,
    #[default]
    Disconnected,
}

/// Events emitted by the live-update listener.
#[derive(Debug, Clone, PartialEq)]
pub enum LiveEvent {
    Connected,
    Disconnected,
    /// A `poll-updated` event carrying the full record.
    PollUpdated(Poll),
}

/// Commands sent from the front end to the app event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    /// Reload whichever view is active.
    Refresh,
    SelectPoll(PollId),
    BackToCollection,
    Vote { poll_id: PollId, option_id: OptionId },
    ToggleCreateForm,
    EditForm(FormEdit),
    SubmitPoll,
    DeletePoll(PollId),
    ConfirmAlert,
    CancelAlert,
    /// Sign in with a credential obtained from the identity provider.
    SignIn { credential: String },
    SignOut,
    Quit,
}

/// Everything the front end needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct AppSnapshot {
    pub polls: Vec<Poll>,
    pub polls_loading: bool,
    pub polls_error: Option<String>,
    pub session: SessionStore,
    pub view: View,
    pub alert: Option<AlertConfig>,
    pub form: CreatePollForm,
    pub connection: ConnectionStatus,
    /// Identity-provider client id, shown on the sign-in prompt.
    pub identity_client_id: String,
}

impl Default for AppSnapshot {
    /// What the front end shows before the first snapshot arrives.
    fn default() -> Self {
        AppSnapshot {
            polls: Vec::new(),
            polls_loading: true,
            polls_error: None,
            session: SessionStore::new(),
            view: View::Collection,
            alert: None,
            form: CreatePollForm::new(),
            connection: ConnectionStatus::Disconnected,
            identity_client_id: String::new(),
        }
    }
}

/// Updates pushed from the app event loop to the front end.
#[derive(Debug, Clone, PartialEq)]
pub enum UiUpdate {
    StateSnapshot(Box<AppSnapshot>),
}
