pub mod ai;
pub mod app;
pub mod catalog;
pub mod config;
pub mod cost;
pub mod error;
pub mod form;
pub mod generation_worker;
pub mod logger;
pub mod models;
pub mod session;
pub mod settings;
pub mod ui;
pub mod utils;


// Re-exports for convenience
pub use ai::{QuestionClient, QuestionSource, build_instruction, extract_json_object};
pub use app::{App, Notice};
pub use catalog::{Section, Topic, TopicCatalog};
pub use config::{AppPaths, GenerationConfig};
pub use cost::{CostEstimate, estimate};
pub use error::QuizError;
pub use generation_worker::{
    GenerationHandle, GenerationOutcome, GenerationRequest, run_generation, spawn_generation,
};
pub use models::{AppState, GenerationMode, Question, QuestionType, QuizSession, QuizState, Score};
pub use settings::Settings;
pub use ui::draw;
