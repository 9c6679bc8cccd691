use crate::session::QuizScreen;
use crate::ui::layout::calculate_summary_chunks;
use crate::ui::{help_line, key_span};
use ratatui::{
    Frame,
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};

pub fn draw_summary(f: &mut Frame, screen: &QuizScreen) {
    let layout = calculate_summary_chunks(f.area());

    let title = Paragraph::new("Quiz Results")
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, layout.header_area);

    let score = Paragraph::new(screen.session.score().to_string())
        .style(Style::default().add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(score, layout.score_area);

    let mut text = Text::default();
    for result in screen.session.results() {
        let (status, color) = if result.is_correct {
            ("[+] CORRECT", Color::Green)
        } else {
            ("[-] INCORRECT", Color::Red)
        };

        text.push_line(Line::from(Span::styled(
            format!("Question {}: {}", result.index + 1, status),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )));
        text.push_line(Line::from(result.question.clone()));
        text.push_line(Line::from(Span::styled(
            format!("Your answer: {}", result.user_answers.join(", ")),
            Style::default().fg(color),
        )));
        text.push_line(Line::from(Span::styled(
            "Correct answer(s):",
            Style::default().fg(Color::Green),
        )));
        for (label, option) in &result.correct_answers {
            text.push_line(Line::from(Span::styled(
                format!("  {}. {}", label, option),
                Style::default().fg(Color::Green),
            )));
        }
        text.push_line(Line::from(""));
    }

    let results = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .scroll((screen.summary_scroll, 0))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(results, layout.results_area);

    let help = help_line(vec![
        key_span("↑/↓"),
        Span::from(" Scroll  "),
        key_span("n"),
        Span::from(" Take Another Quiz  "),
        key_span("Esc"),
        Span::from(" Quit"),
    ]);
    f.render_widget(help, layout.help_area);
}
