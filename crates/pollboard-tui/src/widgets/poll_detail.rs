// Poll detail widget: a single poll with a gauge per option.

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph, Wrap};
use ratatui::Frame;

use pollboard_core::model::Poll;
use pollboard_core::router::{DetailState, View};

use super::poll_list::{byline, format_votes, vote_mark, VoteMark};
use crate::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let View::Detail { state: detail, .. } = &state.app.view else {
        return;
    };

    match detail {
        DetailState::Loading => {
            let paragraph = Paragraph::new(Line::styled(
                "Loading poll...",
                Style::default().fg(Color::Yellow),
            ))
            .block(Block::default().borders(Borders::ALL).title(" Poll "));
            frame.render_widget(paragraph, area);
        }
        DetailState::Failed(message) => {
            let paragraph = Paragraph::new(vec![
                Line::styled(message.clone(), Style::default().fg(Color::Red)),
                Line::raw(""),
                Line::raw("Press Esc to go back."),
            ])
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title(" Poll "));
            frame.render_widget(paragraph, area);
        }
        DetailState::Loaded(poll) => render_poll(frame, area, state, poll),
    }
}

fn render_poll(frame: &mut Frame, area: Rect, state: &ViewState, poll: &Poll) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            format!(" {} ", poll.question),
            Style::default().add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut constraints = vec![Constraint::Length(2)];
    constraints.extend(poll.options.iter().map(|_| Constraint::Length(2)));
    constraints.push(Constraint::Min(0));
    let rows = Layout::vertical(constraints).split(inner);

    let header = Paragraph::new(vec![
        Line::styled(byline(poll), Style::default().fg(Color::Gray)),
        Line::raw(format!("{} votes in total", poll.total_votes())),
    ]);
    frame.render_widget(header, rows[0]);

    for (i, option) in poll.options.iter().enumerate() {
        let row = rows[i + 1];
        let highlighted = i == state.option_cursor;
        let mark = vote_mark(&state.app.session, poll, option);

        let marker = match (mark, highlighted) {
            (VoteMark::Voted, _) => Span::styled("[Voted] ", Style::default().fg(Color::Green)),
            (VoteMark::Open, true) => Span::styled(
                "[Vote]  ",
                Style::default().fg(Color::Black).bg(Color::Cyan),
            ),
            (VoteMark::Disabled, true) => {
                Span::styled("[Vote]  ", Style::default().fg(Color::DarkGray))
            }
            (_, false) => Span::raw("        "),
        };
        let text_style = if highlighted {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };

        let [label_area, gauge_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(row);
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                marker,
                Span::styled(option.text.clone(), text_style),
            ])),
            label_area,
        );

        let ratio = (poll.percentage(option) / 100.0).clamp(0.0, 1.0);
        let color = if mark == VoteMark::Voted {
            Color::Green
        } else {
            Color::Blue
        };
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(color).bg(Color::Black))
            .ratio(ratio)
            .label(format_votes(poll, option));
        frame.render_widget(gauge, gauge_area);
    }
}
