use crate::session::QuizScreen;
use crate::ui::layout::calculate_quiz_chunks;
use crate::ui::{help_line, key_span};
use ratatui::{
    Frame,
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};

fn option_marker(multiple: bool, selected: bool) -> &'static str {
    match (multiple, selected) {
        (true, true) => "[x]",
        (true, false) => "[ ]",
        (false, true) => "(•)",
        (false, false) => "( )",
    }
}

pub fn draw_quiz(f: &mut Frame, screen: &QuizScreen) {
    let layout = calculate_quiz_chunks(f.area());

    let (Some(index), Some(question)) = (
        screen.session.current_index(),
        screen.session.current_question(),
    ) else {
        return;
    };
    let multiple = question.is_multiple_choice();

    let progress = if screen.title.is_empty() {
        format!("Question {} of {}", index + 1, screen.session.len())
    } else {
        format!(
            "Question {} of {} - {}",
            index + 1,
            screen.session.len(),
            screen.title
        )
    };
    let header = Paragraph::new(progress)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, layout.header_area);

    let question_widget = Paragraph::new(Text::from(question.question.as_str()))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Question"));
    f.render_widget(question_widget, layout.question_area);

    let mut lines = Vec::new();
    for (i, (label, text)) in question.options.iter().enumerate() {
        let selected = screen.selected.contains(label);
        let style = if i == screen.cursor {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(
            format!("{} {}. {}", option_marker(multiple, selected), label, text),
            style,
        )));
    }

    let options_title = if multiple {
        "Select ALL that apply"
    } else {
        "Select one"
    };
    let options = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(options_title));
    f.render_widget(options, layout.options_area);

    let help = help_line(vec![
        key_span("↑/↓"),
        Span::from(" Move  "),
        key_span("Space"),
        Span::from(if multiple { " Toggle  " } else { " Select  " }),
        key_span("A-Z"),
        Span::from(" Pick by label  "),
        key_span("Enter"),
        Span::from(" Submit Answer  "),
        key_span("Esc"),
        Span::from(" Quit"),
    ]);
    f.render_widget(help, layout.help_area);
}
