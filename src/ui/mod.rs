pub mod layout;
mod notice;
mod quiz;
mod setup;
mod summary;

use crate::app::App;
use crate::models::AppState;
use ratatui::{
    Frame,
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

pub use layout::{calculate_quiz_chunks, calculate_setup_chunks, calculate_summary_chunks};
pub use notice::draw_notice;
pub use quiz::draw_quiz;
pub use setup::draw_setup;
pub use summary::draw_summary;

pub(crate) fn key_span(key: &str) -> Span<'static> {
    Span::styled(
        key.to_string(),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )
}

pub(crate) fn help_line(spans: Vec<Span<'static>>) -> Paragraph<'static> {
    Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL))
}

/// Draw whichever screen is active, with any notice on top.
pub fn draw(f: &mut Frame, app: &App) {
    match app.state {
        AppState::Setup => draw_setup(f, app),
        AppState::Quiz => {
            if let Some(screen) = &app.quiz {
                draw_quiz(f, screen);
            }
        }
        AppState::Summary => {
            if let Some(screen) = &app.quiz {
                draw_summary(f, screen);
            }
        }
    }

    if let Some(notice) = &app.notice {
        draw_notice(f, notice);
    }
}
