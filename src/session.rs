use crate::error::QuizError;
use crate::models::{AppState, Question, QuizSession, QuizState};
use crossterm::event::{KeyCode, KeyEvent};
use std::collections::BTreeSet;

/// A running quiz plus the cursor and selection of the question on screen.
#[derive(Debug, Clone)]
pub struct QuizScreen {
    pub session: QuizSession,
    pub title: String,
    pub cursor: usize,
    pub selected: BTreeSet<String>,
    pub summary_scroll: u16,
}

/// What the caller should do after a key press on the quiz screen.
#[derive(Debug, PartialEq, Eq)]
pub enum QuizInput {
    None,
    /// Submission rejected; show this to the user.
    Notice(String),
}

impl QuizScreen {
    pub fn new(questions: Vec<Question>, title: String) -> Result<Self, QuizError> {
        Ok(Self {
            session: QuizSession::new(questions)?,
            title,
            cursor: 0,
            selected: BTreeSet::new(),
            summary_scroll: 0,
        })
    }

    pub fn current_labels(&self) -> Vec<String> {
        self.session
            .current_question()
            .map(|q| q.options.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Space on an option: radio semantics for single-answer questions, checkbox otherwise.
    pub fn toggle_current(&mut self) {
        let Some(question) = self.session.current_question() else {
            return;
        };
        let multiple = question.is_multiple_choice();
        let Some(label) = self.current_labels().get(self.cursor).cloned() else {
            return;
        };

        if multiple {
            if !self.selected.remove(&label) {
                self.selected.insert(label);
            }
        } else {
            self.selected.clear();
            self.selected.insert(label);
        }
    }

    pub fn submit(&mut self) -> Result<QuizState, QuizError> {
        let answers = std::mem::take(&mut self.selected);
        match self.session.submit(answers.clone()) {
            Ok(state) => {
                self.cursor = 0;
                Ok(state)
            }
            Err(e) => {
                self.selected = answers;
                Err(e)
            }
        }
    }
}

pub fn handle_quiz_input(screen: &mut QuizScreen, key: KeyEvent, app_state: &mut AppState) -> QuizInput {
    let option_count = screen.current_labels().len();

    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            screen.cursor = screen.cursor.saturating_sub(1);
            QuizInput::None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if screen.cursor + 1 < option_count {
                screen.cursor += 1;
            }
            QuizInput::None
        }
        KeyCode::Char(' ') => {
            screen.toggle_current();
            QuizInput::None
        }
        KeyCode::Char(c) if c.is_ascii_alphabetic() => {
            // Jump straight to an option by its label.
            let label = c.to_ascii_uppercase().to_string();
            if let Some(pos) = screen.current_labels().iter().position(|l| *l == label) {
                screen.cursor = pos;
                screen.toggle_current();
            }
            QuizInput::None
        }
        KeyCode::Enter => match screen.submit() {
            Ok(QuizState::Finished) => {
                *app_state = AppState::Summary;
                QuizInput::None
            }
            Ok(QuizState::AwaitingAnswer(_)) => QuizInput::None,
            Err(e) => QuizInput::Notice(e.to_string()),
        },
        _ => QuizInput::None,
    }
}

pub fn handle_summary_input(screen: &mut QuizScreen, key: KeyEvent) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            screen.summary_scroll = screen.summary_scroll.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            screen.summary_scroll = screen.summary_scroll.saturating_add(1);
        }
        KeyCode::PageUp => {
            screen.summary_scroll = screen.summary_scroll.saturating_sub(10);
        }
        KeyCode::PageDown => {
            screen.summary_scroll = screen.summary_scroll.saturating_add(10);
        }
        _ => {}
    }
}
