// Modal overlays: the application alert dialog and quit confirmation.
//
// Both render as centered boxes on top of the main layout.

use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use pollboard_core::alert::{AlertAction, AlertConfig};

const ALERT_WIDTH: u16 = 56;
const QUIT_WIDTH: u16 = 28;
const QUIT_HEIGHT: u16 = 5;

pub fn render(frame: &mut Frame, area: Rect, alert: &AlertConfig) {
    let inner_width = ALERT_WIDTH.saturating_sub(4) as usize;
    let height = wrapped_rows(&alert.description, inner_width) + 5;
    let dialog_area = centered_rect(ALERT_WIDTH, height, area);

    frame.render_widget(Clear, dialog_area);

    let accent = match alert.on_confirm {
        AlertAction::DeletePoll(_) => Color::Red,
        AlertAction::Dismiss => Color::Yellow,
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent))
        .title(Span::styled(
            format!(" {} ", alert.title),
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        ));

    let lines = vec![
        Line::raw(alert.description.clone()),
        Line::raw(""),
        button_line(alert),
    ];

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true })
        .style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, dialog_area);
}

pub fn render_quit(frame: &mut Frame, area: Rect) {
    let dialog_area = centered_rect(QUIT_WIDTH, QUIT_HEIGHT, area);
    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(Span::styled(
            " Quit? ",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));

    let text = Line::from(vec![
        Span::raw("  Really quit? ("),
        Span::styled("y", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
        Span::raw("/"),
        Span::styled("n", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
        Span::raw(")"),
    ]);

    let paragraph = Paragraph::new(text)
        .block(block)
        .style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, dialog_area);
}

/// "[Enter] Confirm   [Esc] Cancel", cancel only when the alert has one.
fn button_line(alert: &AlertConfig) -> Line<'static> {
    let key_style = Style::default().add_modifier(Modifier::BOLD);
    let mut spans = vec![
        Span::styled("[Enter] ", key_style),
        Span::styled(alert.confirm_label.clone(), Style::default().fg(Color::Green)),
    ];
    if let Some(label) = alert.cancel_label() {
        spans.push(Span::raw("   "));
        spans.push(Span::styled("[Esc] ", key_style));
        spans.push(Span::styled(label.to_string(), Style::default().fg(Color::Gray)));
    }
    Line::from(spans)
}

/// Rows `text` needs when wrapped at `width` columns (rough, by characters).
fn wrapped_rows(text: &str, width: usize) -> u16 {
    if width == 0 {
        return 1;
    }
    let chars = text.chars().count().max(1);
    chars.div_ceil(width).min(u16::MAX as usize) as u16
}

/// Centered rectangle of the given size within `area`, clamped to fit.
pub(crate) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .split(area);

    let horizontal = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .split(vertical[0]);

    horizontal[0]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pollboard_core::model::PollId;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn centered_rect_is_centered() {
        let area = Rect::new(0, 0, 80, 24);
        let result = centered_rect(QUIT_WIDTH, QUIT_HEIGHT, area);
        assert_eq!(result.width, QUIT_WIDTH);
        assert_eq!(result.height, QUIT_HEIGHT);
        let dx = (result.x + result.width / 2) as i32 - (area.width / 2) as i32;
        let dy = (result.y + result.height / 2) as i32 - (area.height / 2) as i32;
        assert!(dx.unsigned_abs() <= 1);
        assert!(dy.unsigned_abs() <= 1);
    }

    #[test]
    fn centered_rect_clamps_to_small_area() {
        let area = Rect::new(0, 0, 10, 3);
        let result = centered_rect(ALERT_WIDTH, 9, area);
        assert!(result.width <= area.width);
        assert!(result.height <= area.height);
    }

    #[test]
    fn notice_has_single_button() {
        let text = line_text(&button_line(&AlertConfig::notice("T", "D")));
        assert_eq!(text, "[Enter] OK");
    }

    #[test]
    fn delete_confirmation_offers_cancel() {
        let text = line_text(&button_line(&AlertConfig::confirm_delete(PollId::new("p"))));
        assert_eq!(text, "[Enter] Delete   [Esc] Cancel");
    }

    #[test]
    fn wrapped_rows_rounds_up() {
        assert_eq!(wrapped_rows("", 10), 1);
        assert_eq!(wrapped_rows("abcdefghij", 10), 1);
        assert_eq!(wrapped_rows("abcdefghijk", 10), 2);
    }

    #[test]
    fn render_shows_title_and_description() {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        let alert = AlertConfig::not_logged_in("vote on polls");
        terminal
            .draw(|frame| render(frame, frame.area(), &alert))
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("Not Logged In"));
        assert!(text.contains("Please sign in to vote on polls."));
    }

    #[test]
    fn render_quit_does_not_panic() {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal
            .draw(|frame| render_quit(frame, frame.area()))
            .unwrap();
    }
}
