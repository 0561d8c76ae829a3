// Status bar widget: live-update connection, current view, signed-in user.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use pollboard_core::protocol::ConnectionStatus;
use pollboard_core::store::SessionStore;

use crate::ViewState;

/// Layout: [connection indicator] [app name] | [view] | [user]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let (dot, dot_color) = connection_indicator(state.app.connection);
    let separator = || Span::styled(" | ", Style::default().fg(Color::Gray));

    let view = if state.is_detail() { "Poll" } else { "All polls" };

    let spans = vec![
        Span::styled(format!(" {} ", dot), Style::default().fg(dot_color)),
        Span::styled(
            "Pollboard",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        separator(),
        Span::styled(view, Style::default().fg(Color::White)),
        separator(),
        user_span(&state.app.session),
    ];

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

pub fn connection_indicator(status: ConnectionStatus) -> (&'static str, Color) {
    match status {
        ConnectionStatus::Connected => ("●", Color::Green),
        ConnectionStatus::Disconnected => ("●", Color::Red),
    }
}

pub fn user_span(session: &SessionStore) -> Span<'static> {
    match session.user() {
        Some(user) => Span::styled(
            format!("Signed in as {}", user.display_name),
            Style::default().fg(Color::Green),
        ),
        None => Span::styled("Read-only", Style::default().fg(Color::Yellow)),
    }
}
