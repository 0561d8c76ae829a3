// Poll creation panel: question field plus a growable list of option fields.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use pollboard_core::form::{CreatePollForm, FormField};

pub fn render(frame: &mut Frame, area: Rect, form: &CreatePollForm) {
    let title = if form.is_submitting() {
        " Create Poll (submitting...) "
    } else {
        " Create Poll "
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(title);

    frame.render_widget(Paragraph::new(form_lines(form)).block(block), area);
}

pub fn form_lines(form: &CreatePollForm) -> Vec<Line<'static>> {
    let focus = form.focus();
    let mut lines = vec![
        Line::styled("Question", Style::default().add_modifier(Modifier::BOLD)),
        field_line(form.question(), focus == FormField::Question),
        Line::raw(""),
        Line::styled("Options", Style::default().add_modifier(Modifier::BOLD)),
    ];

    for (i, text) in form.options().iter().enumerate() {
        let mut line = field_line(text, focus == FormField::Option(i));
        line.spans.insert(0, Span::raw(format!("{:>2}. ", i + 1)));
        lines.push(line);
    }

    lines.push(Line::raw(""));
    lines.push(Line::styled(
        "Ctrl+N adds an option, Ctrl+D removes the focused one.",
        Style::default().fg(Color::Gray).add_modifier(Modifier::DIM),
    ));
    lines
}

fn field_line(text: &str, focused: bool) -> Line<'static> {
    if focused {
        Line::from(vec![
            Span::styled(
                text.to_string(),
                Style::default().fg(Color::Black).bg(Color::White),
            ),
            Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
        ])
    } else {
        Line::raw(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pollboard_core::form::FormEdit;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn fresh_form_has_question_and_two_options() {
        let lines = form_lines(&CreatePollForm::new());
        let texts: Vec<String> = lines.iter().map(line_text).collect();
        assert_eq!(texts[0], "Question");
        assert_eq!(texts[1], "_");
        assert_eq!(texts[4], " 1. ");
        assert_eq!(texts[5], " 2. ");
    }

    #[test]
    fn focus_cursor_follows_field() {
        let mut form = CreatePollForm::new();
        form.set_question("Best color?");
        form.apply(FormEdit::NextField);
        form.apply(FormEdit::Insert('R'));
        let texts: Vec<String> = form_lines(&form).iter().map(line_text).collect();
        assert_eq!(texts[1], "Best color?");
        assert_eq!(texts[4], " 1. R_");
    }

    #[test]
    fn render_does_not_panic() {
        let backend = ratatui::backend::TestBackend::new(40, 12);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut form = CreatePollForm::new();
        form.set_submitting(true);
        terminal
            .draw(|frame| render(frame, frame.area(), &form))
            .unwrap();
    }
}
