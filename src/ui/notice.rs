use crate::app::Notice;
use crate::ui::layout::centered_rect;
use crate::ui::key_span;
use ratatui::{
    Frame,
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

pub fn draw_notice(f: &mut Frame, notice: &Notice) {
    let area = centered_rect(70, 50, f.area());
    f.render_widget(Clear, area);

    let color = if notice.is_error {
        Color::Red
    } else {
        Color::Cyan
    };

    let mut text = Text::default();
    for line in notice.message.lines() {
        text.push_line(Line::from(line.to_string()));
    }
    text.push_line(Line::from(""));
    text.push_line(Line::from(vec![key_span("Enter"), Span::from(" Dismiss")]));

    let popup = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .alignment(Alignment::Left)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title(Span::styled(
                    notice.title.clone(),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                )),
        );
    f.render_widget(popup, area);
}
