use crate::catalog::TopicCatalog;
use crate::config::{AppPaths, GenerationConfig};
use crate::cost::CostEstimate;
use crate::error::QuizError;
use crate::form::{FormField, SetupForm};
use crate::generation_worker::{GenerationHandle, GenerationOutcome, GenerationRequest, spawn_generation};
use crate::logger;
use crate::models::AppState;
use crate::session::{QuizInput, QuizScreen, handle_quiz_input, handle_summary_input};
use crate::settings::Settings;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub const MODE_INFO: &str = "Single Mode:\n\
• Generates each question one by one.\n\
• Cost: 1 API request PER question.\n\
• Quality: Tends to produce higher quality, more complex questions.\n\n\
Batch Mode:\n\
• Generates all questions in a single request.\n\
• Cost: 1 API request for the ENTIRE quiz.\n\
• Quality: Faster, but may result in simpler questions, especially on free models.";

/// A dismissible popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
    pub is_error: bool,
}

impl Notice {
    pub fn error(title: &str, message: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            message: message.into(),
            is_error: true,
        }
    }

    pub fn info(title: &str, message: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            message: message.into(),
            is_error: false,
        }
    }
}

/// A run in flight, with the title its quiz will carry.
pub struct PendingRun {
    pub handle: GenerationHandle,
    pub title: String,
}

/// Starts a generation run; swapped out in tests.
pub type Spawner = Box<dyn Fn(GenerationRequest, GenerationConfig) -> GenerationHandle>;

pub struct App {
    pub paths: AppPaths,
    pub config: GenerationConfig,
    pub catalog: TopicCatalog,
    pub state: AppState,
    pub form: SetupForm,
    pub quiz: Option<QuizScreen>,
    pub pending: Option<PendingRun>,
    pub notice: Option<Notice>,
    pub cost: CostEstimate,
    pub should_quit: bool,
    spawner: Spawner,
}

impl App {
    pub fn new(paths: AppPaths, config: GenerationConfig, catalog: TopicCatalog) -> Self {
        let settings = Settings::load(&paths.settings_file);
        let form = SetupForm::from_settings(&settings, &catalog);
        let mut app = Self {
            paths,
            config,
            catalog,
            state: AppState::Setup,
            form,
            quiz: None,
            pending: None,
            notice: None,
            cost: CostEstimate::NotApplicable,
            should_quit: false,
            spawner: Box::new(spawn_generation),
        };
        app.refresh_cost();
        app
    }

    pub fn with_spawner(mut self, spawner: Spawner) -> Self {
        self.spawner = spawner;
        self
    }

    pub fn is_generating(&self) -> bool {
        self.pending.is_some()
    }

    pub fn refresh_cost(&mut self) {
        self.cost = if self.form.manual_pricing {
            self.form.cost_estimate(&self.catalog)
        } else {
            CostEstimate::NotApplicable
        };
    }

    pub fn save_settings(&self) {
        let settings = self.form.to_settings(&self.catalog);
        if let Err(e) = settings.save(&self.paths.settings_file) {
            logger::log(&format!("Could not save settings: {}", e));
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        if self.notice.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                self.notice = None;
            }
            return;
        }

        match self.state {
            AppState::Setup => self.handle_setup_key(key),
            AppState::Quiz => {
                if key.code == KeyCode::Esc {
                    self.should_quit = true;
                    return;
                }
                if let Some(screen) = self.quiz.as_mut()
                    && let QuizInput::Notice(message) = handle_quiz_input(screen, key, &mut self.state)
                {
                    self.notice = Some(Notice::error("No Answer", message));
                }
            }
            AppState::Summary => match key.code {
                KeyCode::Char('n') | KeyCode::Char('N') => self.new_quiz(),
                KeyCode::Esc | KeyCode::Char('q') => self.should_quit = true,
                _ => {
                    if let Some(screen) = self.quiz.as_mut() {
                        handle_summary_input(screen, key);
                    }
                }
            },
        }
    }

    fn handle_setup_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Up => self.form.focus_step(false),
            KeyCode::Down | KeyCode::Tab => self.form.focus_step(true),
            KeyCode::Left => {
                self.form.cycle(&self.catalog, false);
                self.refresh_cost();
            }
            KeyCode::Right => {
                self.form.cycle(&self.catalog, true);
                self.refresh_cost();
            }
            KeyCode::Char(' ') if self.form.focus == FormField::ManualPricing => {
                self.form.toggle_manual_pricing();
                self.refresh_cost();
            }
            KeyCode::Char('?') => {
                self.notice = Some(Notice::info("Generation Mode Explained", MODE_INFO));
            }
            KeyCode::Char(c) => {
                self.form.input_char(c);
                self.refresh_cost();
            }
            KeyCode::Backspace => {
                self.form.backspace();
                self.refresh_cost();
            }
            KeyCode::Enter => self.start_generation(),
            _ => {}
        }
    }

    pub fn start_generation(&mut self) {
        if self.is_generating() {
            return;
        }

        match self.form.validate(&self.catalog) {
            Ok(request) => {
                logger::log(&format!(
                    "Starting generation: {} question(s), {}, {}",
                    request.count, request.mode, request.question_type
                ));
                let title = format!("{} / {}", request.section, request.topic);
                self.pending = Some(PendingRun {
                    handle: (self.spawner)(request, self.config.clone()),
                    title,
                });
            }
            Err(e) => self.notice = Some(Notice::error("Input Error", e.to_string())),
        }
    }

    /// Called every tick. Picks up a finished run without blocking.
    pub fn poll_generation(&mut self) {
        let Some(outcome) = self
            .pending
            .as_ref()
            .and_then(|run| run.handle.try_take())
        else {
            return;
        };
        let Some(run) = self.pending.take() else {
            return;
        };

        match outcome {
            GenerationOutcome::Ready(questions) => {
                match QuizScreen::new(questions, run.title) {
                    Ok(screen) => {
                        self.quiz = Some(screen);
                        self.state = AppState::Quiz;
                    }
                    Err(e) => self.notice = Some(Notice::error("Generation Error", e.to_string())),
                }
            }
            GenerationOutcome::Empty => {
                self.notice = Some(Notice::error(
                    "Generation Error",
                    QuizError::EmptyResult.to_string(),
                ));
            }
            GenerationOutcome::Failed(e) => {
                self.notice = Some(Notice::error(
                    "API Error",
                    format!(
                        "An error occurred:\n{}\n\nThis might be due to reaching your daily API limit.",
                        e
                    ),
                ));
            }
        }
    }

    /// Throw the finished session away and go back to the setup form.
    pub fn new_quiz(&mut self) {
        self.quiz = None;
        self.state = AppState::Setup;
        self.refresh_cost();
    }
}
