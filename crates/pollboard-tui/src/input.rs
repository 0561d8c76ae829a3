// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into `UserCommand`s for the app event loop,
// or into local `ViewState` changes (cursor movement, the sign-in prompt,
// quit confirmation). Input goes to the topmost layer: quit confirmation,
// then the alert dialog, then the sign-in prompt, then the creation form.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use pollboard_core::form::FormEdit;
use pollboard_core::protocol::UserCommand;
use pollboard_core::router::View;

use super::ViewState;

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to the
/// app event loop, `None` when it was handled locally.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Windows reports both press and release.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);

    if ctrl && key_event.code == KeyCode::Char('c') {
        return Some(UserCommand::Quit);
    }

    if view_state.confirm_quit {
        return handle_confirm_quit(key_event, view_state);
    }

    if view_state.app.alert.is_some() {
        return handle_alert(key_event);
    }

    if view_state.sign_in_mode {
        return handle_sign_in(key_event, view_state);
    }

    if view_state.app.form.is_open() {
        return handle_form(key_event, ctrl);
    }

    handle_browse(key_event, view_state)
}

/// `y`/`q` quit, `n`/Esc go back, everything else is swallowed.
fn handle_confirm_quit(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Char('q') | KeyCode::Char('Q') => {
            Some(UserCommand::Quit)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            view_state.confirm_quit = false;
            None
        }
        _ => None,
    }
}

fn handle_alert(key_event: KeyEvent) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => Some(UserCommand::ConfirmAlert),
        KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => Some(UserCommand::CancelAlert),
        _ => None,
    }
}

fn handle_sign_in(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Esc => {
            view_state.sign_in_mode = false;
            view_state.sign_in_buffer.clear();
            None
        }
        KeyCode::Enter => {
            view_state.sign_in_mode = false;
            let credential = std::mem::take(&mut view_state.sign_in_buffer);
            Some(UserCommand::SignIn { credential })
        }
        KeyCode::Backspace => {
            view_state.sign_in_buffer.pop();
            None
        }
        KeyCode::Char(c) => {
            view_state.sign_in_buffer.push(c);
            None
        }
        _ => None,
    }
}

fn handle_form(key_event: KeyEvent, ctrl: bool) -> Option<UserCommand> {
    let edit = match key_event.code {
        KeyCode::Char('n') if ctrl => FormEdit::AddOption,
        KeyCode::Char('d') if ctrl => FormEdit::RemoveOption,
        KeyCode::Tab | KeyCode::Down => FormEdit::NextField,
        KeyCode::BackTab | KeyCode::Up => FormEdit::PrevField,
        KeyCode::Backspace => FormEdit::Backspace,
        KeyCode::Char(c) if !ctrl => FormEdit::Insert(c),
        KeyCode::Enter => return Some(UserCommand::SubmitPoll),
        KeyCode::Esc => return Some(UserCommand::ToggleCreateForm),
        _ => return None,
    };
    Some(UserCommand::EditForm(edit))
}

fn handle_browse(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Down | KeyCode::Char('j') => {
            view_state.move_poll(1);
            None
        }
        KeyCode::Up | KeyCode::Char('k') => {
            view_state.move_poll(-1);
            None
        }
        KeyCode::Right | KeyCode::Char('l') => {
            view_state.move_option(1);
            None
        }
        KeyCode::Left | KeyCode::Char('h') => {
            view_state.move_option(-1);
            None
        }

        KeyCode::Enter | KeyCode::Char('v') => {
            let poll = view_state.current_poll()?;
            let option = view_state.current_option()?;
            Some(UserCommand::Vote {
                poll_id: poll.id.clone(),
                option_id: option.id.clone(),
            })
        }

        KeyCode::Char('o') if !view_state.is_detail() => {
            let id = view_state.current_poll()?.id.clone();
            view_state.option_cursor = 0;
            Some(UserCommand::SelectPoll(id))
        }
        KeyCode::Esc | KeyCode::Char('b') if view_state.is_detail() => {
            view_state.option_cursor = 0;
            Some(UserCommand::BackToCollection)
        }

        KeyCode::Char('c') => Some(UserCommand::ToggleCreateForm),
        KeyCode::Char('d') => {
            let id = match &view_state.app.view {
                View::Detail { poll_id, .. } => poll_id.clone(),
                View::Collection => view_state.current_poll()?.id.clone(),
            };
            Some(UserCommand::DeletePoll(id))
        }
        KeyCode::Char('r') => Some(UserCommand::Refresh),

        KeyCode::Char('s') if !view_state.app.session.is_authenticated() => {
            view_state.sign_in_mode = true;
            view_state.sign_in_buffer.clear();
            None
        }
        KeyCode::Char('x') if view_state.app.session.is_authenticated() => {
            Some(UserCommand::SignOut)
        }

        KeyCode::Char('q') => {
            view_state.confirm_quit = true;
            None
        }

        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
