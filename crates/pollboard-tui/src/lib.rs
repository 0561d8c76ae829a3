// Terminal front end: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` holding the latest `AppSnapshot` plus purely
// local state (cursors, the sign-in prompt, quit confirmation). The app event
// loop pushes snapshots over an mpsc channel; the TUI re-renders at ~30 fps
// and sends `UserCommand`s back.

pub mod input;
pub mod layout;
pub mod widgets;

use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use tokio::sync::mpsc;
use tracing::{info, warn};

use pollboard_core::model::{Poll, PollOption};
use pollboard_core::protocol::{AppSnapshot, UiUpdate, UserCommand};
use pollboard_core::router::{DetailState, View};

use layout::{build_layout, AppLayout};

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// Front-end state: the last snapshot from the app loop plus local UI state.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub app: AppSnapshot,
    /// Highlighted poll in the collection view.
    pub poll_cursor: usize,
    /// Highlighted option of the current poll.
    pub option_cursor: usize,
    /// The sign-in prompt is capturing input.
    pub sign_in_mode: bool,
    pub sign_in_buffer: String,
    /// Quit confirmation dialog is showing.
    pub confirm_quit: bool,
}

impl ViewState {
    /// Replace the snapshot, keeping cursors in range.
    pub fn apply_snapshot(&mut self, snapshot: AppSnapshot) {
        self.app = snapshot;
        self.clamp_cursors();
    }

    /// Polls the active view shows: the collection, or the loaded detail
    /// record.
    pub fn visible_polls(&self) -> &[Poll] {
        match &self.app.view {
            View::Collection => &self.app.polls,
            View::Detail {
                state: DetailState::Loaded(poll),
                ..
            } => std::slice::from_ref(poll),
            View::Detail { .. } => &[],
        }
    }

    pub fn current_poll(&self) -> Option<&Poll> {
        let polls = self.visible_polls();
        match self.app.view {
            View::Collection => polls.get(self.poll_cursor),
            View::Detail { .. } => polls.first(),
        }
    }

    pub fn current_option(&self) -> Option<&PollOption> {
        self.current_poll()
            .and_then(|p| p.options.get(self.option_cursor))
    }

    pub fn is_detail(&self) -> bool {
        matches!(self.app.view, View::Detail { .. })
    }

    pub fn move_poll(&mut self, delta: isize) {
        if self.is_detail() {
            return;
        }
        self.poll_cursor = step(self.poll_cursor, delta, self.app.polls.len());
        self.option_cursor = 0;
    }

    pub fn move_option(&mut self, delta: isize) {
        let len = self.current_poll().map_or(0, |p| p.options.len());
        self.option_cursor = step(self.option_cursor, delta, len);
    }

    fn clamp_cursors(&mut self) {
        let polls = self.app.polls.len();
        if self.poll_cursor >= polls {
            self.poll_cursor = polls.saturating_sub(1);
        }
        let options = self.current_poll().map_or(0, |p| p.options.len());
        if self.option_cursor >= options {
            self.option_cursor = options.saturating_sub(1);
        }
    }
}

/// Move `index` by `delta` within `0..len`, stopping at the ends.
fn step(index: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    index.saturating_add_signed(delta).min(len - 1)
}

fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::StateSnapshot(snapshot) => state.apply_snapshot(*snapshot),
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete frame.
pub fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area(), state.app.form.is_open());

    widgets::status_bar::render(frame, layout.status_bar, state);
    render_main_panel(frame, &layout, state);
    if let Some(side) = layout.side_panel {
        widgets::create_form::render(frame, side, &state.app.form);
    }
    render_help_bar(frame, &layout, state);

    // Overlays, most urgent last.
    if state.sign_in_mode {
        widgets::sign_in::render(frame, frame.area(), state);
    }
    if let Some(alert) = &state.app.alert {
        widgets::alert_dialog::render(frame, frame.area(), alert);
    }
    if state.confirm_quit {
        widgets::alert_dialog::render_quit(frame, frame.area());
    }
}

fn render_main_panel(frame: &mut Frame, layout: &AppLayout, state: &ViewState) {
    match &state.app.view {
        View::Collection => widgets::poll_list::render(frame, layout.main_panel, state),
        View::Detail { .. } => widgets::poll_detail::render(frame, layout.main_panel, state),
    }
}

fn render_help_bar(frame: &mut Frame, layout: &AppLayout, state: &ViewState) {
    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        help_text(state),
        Style::default().fg(Color::White).add_modifier(Modifier::DIM),
    )]))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, layout.help_bar);
}

/// Key hints for whatever currently has input focus.
pub fn help_text(state: &ViewState) -> &'static str {
    if state.confirm_quit {
        " y:Quit | n:Stay"
    } else if state.app.alert.is_some() {
        " Enter:Confirm | Esc:Cancel"
    } else if state.sign_in_mode {
        " Enter:Sign in | Esc:Cancel"
    } else if state.app.form.is_open() {
        " Tab/S-Tab:Field | Ctrl+N:Add option | Ctrl+D:Remove option | Enter:Submit | Esc:Close"
    } else if state.is_detail() {
        " h/l:Option | v:Vote | d:Delete | r:Refresh | Esc:Back | q:Quit"
    } else {
        " j/k:Poll | h/l:Option | v:Vote | o:Open | c:Create | d:Delete | r:Refresh | s:Sign in | x:Sign out | q:Quit"
    }
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// 1. Initializes the terminal (raw mode, alternate screen).
/// 2. Installs a panic hook that restores the terminal.
/// 3. Selects over snapshots, keyboard input, and render ticks.
/// 4. Restores the terminal on exit.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = ratatui::restore();
        original_hook(panic_info);
    }));

    let mut view_state = ViewState::default();
    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            update = ui_rx.recv() => {
                match update {
                    Some(update) => apply_ui_update(&mut view_state, update),
                    None => {
                        info!("UI channel closed");
                        break;
                    }
                }
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            let quit = cmd == UserCommand::Quit;
                            if cmd_tx.send(cmd).await.is_err() || quit {
                                break;
                            }
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!("Terminal input error: {}", e);
                        break;
                    }
                    None => break,
                }
            }

            _ = render_tick.tick() => {
                terminal.draw(|frame| render_frame(frame, &view_state))?;
            }
        }
    }

    ratatui::restore();
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------


#[cfg(test)]
mod tests {
    use super::test_support::poll;
    use super::*;
    use pollboard_core::alert::AlertConfig;
    use pollboard_core::model::PollId;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn loaded(polls: Vec<Poll>) -> ViewState {
        let mut state = ViewState::default();
        state.apply_snapshot(AppSnapshot {
            polls,
            polls_loading: false,
            ..AppSnapshot::default()
        });
        state
    }

    #[test]
    fn default_view_state_is_loading_collection() {
        let state = ViewState::default();
        assert!(state.app.polls_loading);
        assert!(!state.is_detail());
        assert!(!state.sign_in_mode);
        assert!(!state.confirm_quit);
        assert!(state.current_poll().is_none());
    }

    #[test]
    fn cursor_moves_stop_at_ends() {
        let mut state = loaded(vec![poll("a", &[1, 2]), poll("b", &[0, 0, 0])]);
        state.move_poll(-1);
        assert_eq!(state.poll_cursor, 0);
        state.move_poll(1);
        state.move_poll(1);
        assert_eq!(state.poll_cursor, 1);

        state.move_option(5);
        assert_eq!(state.option_cursor, 2);
        state.move_poll(-1);
        assert_eq!(state.option_cursor, 0);
    }

    #[test]
    fn snapshot_with_fewer_polls_clamps_cursor() {
        let mut state = loaded(vec![poll("a", &[1]), poll("b", &[1]), poll("c", &[1])]);
        state.poll_cursor = 2;
        state.apply_snapshot(AppSnapshot {
            polls: vec![poll("a", &[1])],
            polls_loading: false,
            ..AppSnapshot::default()
        });
        assert_eq!(state.poll_cursor, 0);
        assert_eq!(state.current_poll().unwrap().id, PollId::new("a"));
    }

    #[test]
    fn detail_view_shows_only_loaded_poll() {
        let mut state = loaded(vec![poll("a", &[1]), poll("b", &[1])]);
        state.app.view = View::Detail {
            poll_id: PollId::new("b"),
            state: DetailState::Loading,
        };
        assert!(state.visible_polls().is_empty());

        state.app.view = View::Detail {
            poll_id: PollId::new("b"),
            state: DetailState::Loaded(poll("b", &[4])),
        };
        assert_eq!(state.current_poll().unwrap().options[0].votes, 4);
    }

    #[test]
    fn help_text_follows_focus() {
        let mut state = loaded(vec![]);
        assert!(help_text(&state).contains("c:Create"));
        state.sign_in_mode = true;
        assert!(help_text(&state).contains("Sign in"));
        state.app.alert = Some(AlertConfig::notice("T", "D"));
        assert!(help_text(&state).contains("Confirm"));
        state.confirm_quit = true;
        assert!(help_text(&state).contains("y:Quit"));
    }

    #[test]
    fn render_frame_does_not_panic_in_any_mode() {
        let mut state = loaded(vec![poll("a", &[3, 1]), poll("b", &[0, 0])]);
        let backend = TestBackend::new(120, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| render_frame(f, &state)).unwrap();

        state.app.form.toggle();
        terminal.draw(|f| render_frame(f, &state)).unwrap();

        state.sign_in_mode = true;
        state.app.alert = Some(AlertConfig::confirm_delete(PollId::new("a")));
        state.confirm_quit = true;
        terminal.draw(|f| render_frame(f, &state)).unwrap();
    }

    #[test]
    fn render_frame_survives_tiny_terminal() {
        let state = loaded(vec![poll("a", &[3, 1])]);
        let backend = TestBackend::new(20, 5);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| render_frame(f, &state)).unwrap();
    }
}
