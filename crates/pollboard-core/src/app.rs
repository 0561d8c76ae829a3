// Application state and orchestration logic.
//
// The central event loop owns all client state and coordinates user commands
// from the front end, completions of backend calls, and live-update events.
// Backend calls run as spawned tasks and report back over a channel, so every
// state mutation happens here, one at a time. After each event a fresh
// snapshot is pushed to the front end.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::alert::{AlertAction, AlertConfig, AlertController};
use crate::api::{execute, ApiOutcome, ApiRequest, PollApi};
use crate::config::Config;
use crate::credentials::CredentialStore;
use crate::form::CreatePollForm;
use crate::protocol::{AppSnapshot, ConnectionStatus, LiveEvent, UiUpdate, UserCommand};
use crate::router::{ViewRouter, DETAIL_FAILED_MESSAGE};
use crate::store::polls::LOAD_FAILED_MESSAGE;
use crate::store::{PollStore, SessionStore};

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// The complete client state.
pub struct AppState {
    pub config: Config,
    pub polls: PollStore,
    pub session: SessionStore,
    pub alerts: AlertController,
    pub router: ViewRouter,
    pub form: CreatePollForm,
    pub connection_status: ConnectionStatus,
    /// Credential backing the current session; `None` when anonymous.
    pub(crate) credential: Option<String>,
    pub(crate) credentials: Box<dyn CredentialStore>,
}

impl AppState {
    pub fn new(config: Config, credentials: Box<dyn CredentialStore>) -> Self {
        AppState {
            config,
            polls: PollStore::new(),
            session: SessionStore::new(),
            alerts: AlertController::new(),
            router: ViewRouter::new(),
            form: CreatePollForm::new(),
            connection_status: ConnectionStatus::Disconnected,
            credential: None,
            credentials,
        }
    }

    /// Requests to issue at startup: re-authenticate with a stored credential
    /// (polls are fetched once that settles), or fetch polls anonymously.
    pub fn boot(&mut self) -> Vec<ApiRequest> {
        match self.credentials.load() {
            Some(credential) => {
                info!("Stored credential found, restoring session");
                vec![ApiRequest::SignIn {
                    credential,
                    restoring: true,
                }]
            }
            None => {
                info!("No stored credential, starting in read-only mode");
                self.load_polls()
            }
        }
    }

    /// Apply a user command. Returns the backend calls it requires.
    pub fn handle_command(&mut self, cmd: UserCommand) -> Vec<ApiRequest> {
        match cmd {
            UserCommand::Refresh => match self.router.reload_detail() {
                Some(poll_id) => vec![ApiRequest::LoadPoll(poll_id)],
                None => self.load_polls(),
            },
            UserCommand::SelectPoll(poll_id) => {
                info!("Opening poll {}", poll_id);
                self.router.select(poll_id.clone());
                vec![ApiRequest::LoadPoll(poll_id)]
            }
            UserCommand::BackToCollection => {
                self.router.back();
                self.load_polls()
            }
            UserCommand::Vote { poll_id, option_id } => self.vote(poll_id, option_id),
            UserCommand::ToggleCreateForm => {
                self.toggle_create_form();
                Vec::new()
            }
            UserCommand::EditForm(edit) => {
                if self.form.is_open() {
                    self.form.apply(edit);
                }
                Vec::new()
            }
            UserCommand::SubmitPoll => self.submit_poll(),
            UserCommand::DeletePoll(poll_id) => {
                self.request_delete(poll_id);
                Vec::new()
            }
            UserCommand::ConfirmAlert => match self.alerts.confirm() {
                Some(AlertAction::DeletePoll(poll_id)) => self.delete_confirmed(poll_id),
                Some(AlertAction::Dismiss) | None => Vec::new(),
            },
            UserCommand::CancelAlert => {
                self.alerts.cancel();
                Vec::new()
            }
            UserCommand::SignIn { credential } => self.sign_in(credential),
            UserCommand::SignOut => self.sign_out(),
            UserCommand::Quit => {
                // Handled in the main loop
                Vec::new()
            }
        }
    }

    /// Apply a completed backend call. Returns any follow-up calls.
    pub fn apply_outcome(&mut self, outcome: ApiOutcome) -> Vec<ApiRequest> {
        match outcome {
            ApiOutcome::PollsLoaded(Ok(polls)) => {
                info!("Loaded {} polls", polls.len());
                self.polls.load(polls);
                Vec::new()
            }
            ApiOutcome::PollsLoaded(Err(e)) => {
                warn!("Failed to fetch polls: {}", e);
                self.polls.fail_load(LOAD_FAILED_MESSAGE);
                Vec::new()
            }
            ApiOutcome::PollLoaded { poll_id, result } => {
                let result = result.map_err(|e| {
                    warn!("Failed to fetch poll {}: {}", poll_id, e);
                    DETAIL_FAILED_MESSAGE.to_string()
                });
                if !self.router.resolve_detail(&poll_id, result) {
                    debug!("Discarding detail result for poll {} (no longer selected)", poll_id);
                }
                Vec::new()
            }
            ApiOutcome::Voted {
                poll_id,
                option_id,
                result,
            } => {
                self.vote_completed(poll_id, option_id, result);
                Vec::new()
            }
            ApiOutcome::Created(result) => {
                self.create_completed(result);
                Vec::new()
            }
            ApiOutcome::Deleted { poll_id, result } => self.delete_completed(poll_id, result),
            ApiOutcome::SignedIn {
                credential,
                restoring,
                result,
            } => self.sign_in_completed(credential, restoring, result),
        }
    }

    /// Apply an event from the live-update listener.
    pub fn apply_live_event(&mut self, event: LiveEvent) {
        match event {
            LiveEvent::Connected => {
                info!("Live updates connected");
                self.connection_status = ConnectionStatus::Connected;
            }
            LiveEvent::Disconnected => {
                info!("Live updates disconnected");
                self.connection_status = ConnectionStatus::Disconnected;
            }
            LiveEvent::PollUpdated(poll) => {
                let in_detail = self.router.patch_detail(&poll);
                let id = poll.id.clone();
                let in_store = self.polls.apply_live_update(poll);
                if !in_store && !in_detail {
                    debug!("Ignoring live update for unknown poll {}", id);
                }
            }
        }
    }

    /// Capture everything the front end renders.
    pub fn build_snapshot(&self) -> AppSnapshot {
        AppSnapshot {
            polls: self.polls.polls().to_vec(),
            polls_loading: self.polls.is_loading(),
            polls_error: self.polls.error().map(str::to_string),
            session: self.session.clone(),
            view: self.router.view().clone(),
            alert: self.alerts.current().cloned(),
            form: self.form.clone(),
            connection: self.connection_status,
            identity_client_id: self.config.identity.client_id.clone(),
        }
    }

    pub(crate) fn load_polls(&mut self) -> Vec<ApiRequest> {
        self.polls.begin_load();
        vec![ApiRequest::LoadPolls]
    }

    fn toggle_create_form(&mut self) {
        if !self.form.is_open() && !self.session.is_authenticated() {
            self.alerts.request(AlertConfig::not_logged_in("create polls"));
            return;
        }
        self.form.toggle();
    }
}

// ---------------------------------------------------------------------------
// Event loop
// ---------------------------------------------------------------------------

/// Run the application event loop.
///
/// Listens on three sources using `tokio::select!`:
/// 1. User commands from the front end
/// 2. Completions of spawned backend calls
/// 3. Live-update events
///
/// Pushes a snapshot through `ui_tx` after every handled event.
pub async fn run(
    api: Arc<dyn PollApi>,
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    mut live_rx: mpsc::Receiver<LiveEvent>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");

    let (outcome_tx, mut outcome_rx) = mpsc::channel::<ApiOutcome>(64);

    // When the live channel closes we stop polling it so select! never spins.
    let mut live_open = true;

    let requests = state.boot();
    dispatch(&api, &outcome_tx, requests);
    push_snapshot(&state, &ui_tx).await;

    loop {
        tokio::select! {
            // --- User commands ---
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Quit) => {
                        info!("Quit command received, shutting down");
                        break;
                    }
                    Some(cmd) => {
                        let requests = state.handle_command(cmd);
                        dispatch(&api, &outcome_tx, requests);
                    }
                    None => {
                        info!("Command channel closed, shutting down");
                        break;
                    }
                }
            }

            // --- Backend completions (we hold a sender, so this never ends) ---
            Some(outcome) = outcome_rx.recv() => {
                let requests = state.apply_outcome(outcome);
                dispatch(&api, &outcome_tx, requests);
            }

            // --- Live updates ---
            event = live_rx.recv(), if live_open => {
                match event {
                    Some(event) => state.apply_live_event(event),
                    None => {
                        info!("Live update channel closed");
                        live_open = false;
                        state.connection_status = ConnectionStatus::Disconnected;
                    }
                }
            }
        }

        push_snapshot(&state, &ui_tx).await;
    }

    info!("Application event loop exiting");
    Ok(())
}

/// Spawn each request; its outcome comes back through `outcome_tx`.
fn dispatch(
    api: &Arc<dyn PollApi>,
    outcome_tx: &mpsc::Sender<ApiOutcome>,
    requests: Vec<ApiRequest>,
) {
    for request in requests {
        debug!("Dispatching {} request", request.label());
        let api = Arc::clone(api);
        let tx = outcome_tx.clone();
        tokio::spawn(async move {
            let outcome = execute(api.as_ref(), request).await;
            let _ = tx.send(outcome).await;
        });
    }
}

async fn push_snapshot(state: &AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    let _ = ui_tx
        .send(UiUpdate::StateSnapshot(Box::new(state.build_snapshot())))
        .await;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
