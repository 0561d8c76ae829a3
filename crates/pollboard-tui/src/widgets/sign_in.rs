// Sign-in prompt: the user pastes a credential issued by the identity
// provider for this client. The input is masked.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use super::alert_dialog::centered_rect;
use crate::ViewState;

const DIALOG_WIDTH: u16 = 64;
const DIALOG_HEIGHT: u16 = 8;
const MASK_LIMIT: usize = 40;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let dialog_area = centered_rect(DIALOG_WIDTH, DIALOG_HEIGHT, area);
    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            " Sign In ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));

    let client = if state.app.identity_client_id.is_empty() {
        "this client".to_string()
    } else {
        format!("client \"{}\"", state.app.identity_client_id)
    };

    let lines = vec![
        Line::raw(format!("Paste the identity credential issued for {client}:")),
        Line::raw(""),
        Line::from(vec![
            Span::styled(
                masked(&state.sign_in_buffer),
                Style::default().fg(Color::Black).bg(Color::White),
            ),
            Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
        ]),
        Line::raw(""),
        Line::styled(
            "Enter signs in, Esc cancels.",
            Style::default().fg(Color::Gray),
        ),
    ];

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, dialog_area);
}

/// Asterisks for the first characters, then a count for long input.
pub fn masked(input: &str) -> String {
    let len = input.chars().count();
    if len <= MASK_LIMIT {
        "*".repeat(len)
    } else {
        format!("{} (+{} chars)", "*".repeat(MASK_LIMIT), len - MASK_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_input_is_fully_masked() {
        assert_eq!(masked(""), "");
        assert_eq!(masked("abc"), "***");
    }

    #[test]
    fn long_input_is_truncated_with_count() {
        let input = "x".repeat(MASK_LIMIT + 5);
        assert_eq!(masked(&input), format!("{} (+5 chars)", "*".repeat(MASK_LIMIT)));
    }

    #[test]
    fn render_never_shows_the_credential() {
        let mut state = ViewState::default();
        state.sign_in_mode = true;
        state.sign_in_buffer = "secret-token".into();
        state.app.identity_client_id = "pollboard".into();

        let mut terminal =
            ratatui::Terminal::new(ratatui::backend::TestBackend::new(80, 20)).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(!text.contains("secret-token"));
        assert!(text.contains("pollboard"));
    }
}
