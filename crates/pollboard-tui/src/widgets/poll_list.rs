// Poll collection widget: one card per poll with per-option results.
//
// Each card shows the question, creator and creation time, then one row per
// option with a vote marker, a text gauge, and "N votes (P%)". The card under
// the cursor is highlighted and its highlighted option carries the vote
// marker. Cards scroll so the cursor stays visible.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use pollboard_core::model::{Poll, PollOption};
use pollboard_core::store::SessionStore;

use crate::ViewState;

pub const EMPTY_MESSAGE: &str = "No polls available. Create one!";
const BAR_WIDTH: usize = 20;

/// How an option row presents voting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteMark {
    /// The user's own vote.
    Voted,
    /// The user may vote here.
    Open,
    /// Anonymous, or already voted on another option.
    Disabled,
}

pub fn vote_mark(session: &SessionStore, poll: &Poll, option: &PollOption) -> VoteMark {
    if session.voted_option(&poll.id) == Some(&option.id) {
        VoteMark::Voted
    } else if session.can_vote(&poll.id) {
        VoteMark::Open
    } else {
        VoteMark::Disabled
    }
}

/// "N votes (P%)", with P at one decimal.
pub fn format_votes(poll: &Poll, option: &PollOption) -> String {
    format!("{} votes ({:.1}%)", option.votes, poll.percentage(option))
}

/// Text gauge `width` cells wide for `percentage` in 0..=100.
pub fn text_gauge(percentage: f64, width: usize) -> String {
    let filled = ((percentage.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// "by NAME" plus the local creation time when known.
pub fn byline(poll: &Poll) -> String {
    match poll.created_at {
        Some(at) => format!(
            "by {} · {}",
            poll.creator_name(),
            at.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M")
        ),
        None => format!("by {}", poll.creator_name()),
    }
}

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let polls = &state.app.polls;
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Polls ({}) ", polls.len()));

    let error_line = state
        .app
        .polls_error
        .as_ref()
        .map(|err| Line::styled(err.clone(), Style::default().fg(Color::Red)));

    let status = if polls.is_empty() && error_line.is_some() {
        error_line.clone()
    } else if state.app.polls_loading && polls.is_empty() {
        Some(Line::styled(
            "Loading polls...",
            Style::default().fg(Color::Yellow),
        ))
    } else if polls.is_empty() {
        Some(Line::raw(EMPTY_MESSAGE))
    } else {
        None
    };

    if let Some(line) = status {
        frame.render_widget(
            Paragraph::new(line).block(block).wrap(Wrap { trim: true }),
            area,
        );
        return;
    }

    let cards: Vec<Vec<Line>> = polls
        .iter()
        .enumerate()
        .map(|(i, poll)| card_lines(state, poll, i == state.poll_cursor))
        .collect();

    // Records kept from the last good load stay visible under the error.
    let banner_rows = usize::from(error_line.is_some());
    let inner_height = (area.height.saturating_sub(2) as usize).saturating_sub(banner_rows);
    let heights: Vec<usize> = cards.iter().map(Vec::len).collect();
    let first = first_visible(&heights, state.poll_cursor, inner_height);

    let lines: Vec<Line> = error_line
        .into_iter()
        .chain(cards.into_iter().skip(first).flatten())
        .collect();
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Index of the first card to draw so that card `cursor` fits in `height`
/// rows.
pub fn first_visible(heights: &[usize], cursor: usize, height: usize) -> usize {
    let Some(cursor_height) = heights.get(cursor) else {
        return 0;
    };
    let mut used = *cursor_height;
    let mut first = cursor;
    while first > 0 && used + heights[first - 1] <= height {
        first -= 1;
        used += heights[first];
    }
    first
}

fn card_lines(state: &ViewState, poll: &Poll, selected: bool) -> Vec<Line<'static>> {
    let question_style = if selected {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };

    let mut lines = vec![
        Line::from(vec![
            Span::raw(if selected { "▶ " } else { "  " }),
            Span::styled(poll.question.clone(), question_style),
        ]),
        Line::styled(
            format!("  {}", byline(poll)),
            Style::default().fg(Color::Gray).add_modifier(Modifier::DIM),
        ),
    ];

    for (i, option) in poll.options.iter().enumerate() {
        let highlighted = selected && i == state.option_cursor;
        lines.push(option_line(&state.app.session, poll, option, highlighted));
    }
    lines.push(Line::raw(""));
    lines
}

fn option_line(
    session: &SessionStore,
    poll: &Poll,
    option: &PollOption,
    highlighted: bool,
) -> Line<'static> {
    let mark = vote_mark(session, poll, option);
    let marker = match (mark, highlighted) {
        (VoteMark::Voted, _) => Span::styled(
            " Voted ",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        (VoteMark::Open, true) => Span::styled(
            " Vote  ",
            Style::default().fg(Color::Black).bg(Color::Cyan),
        ),
        (VoteMark::Disabled, true) => {
            Span::styled(" Vote  ", Style::default().fg(Color::DarkGray))
        }
        (_, false) => Span::raw("       "),
    };

    let text_style = if highlighted {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
    };

    Line::from(vec![
        Span::raw("  "),
        marker,
        Span::styled(format!("{:<24}", option.text), text_style),
        Span::styled(
            text_gauge(poll.percentage(option), BAR_WIDTH),
            Style::default().fg(Color::Blue),
        ),
        Span::raw(format!(" {}", format_votes(poll, option))),
    ])
}
