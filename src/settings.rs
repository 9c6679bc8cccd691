use crate::error::QuizError;
use crate::logger;
use crate::models::{GenerationMode, QuestionType};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Last-used form values, persisted between runs as a flat JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub section: String,
    pub topic: String,
    pub q_type: String,
    pub mode: String,
    pub num_questions: String,
    pub manual_pricing: bool,
    pub manual_input: String,
    pub manual_output: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            section: String::new(),
            topic: String::new(),
            q_type: QuestionType::default().label().to_string(),
            mode: GenerationMode::default().label().to_string(),
            num_questions: "5".to_string(),
            manual_pricing: false,
            manual_input: "0.0".to_string(),
            manual_output: "0.0".to_string(),
        }
    }
}

impl Settings {
    /// Missing or unreadable files fall back to defaults.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match fs::read_to_string(path)
            .map_err(QuizError::from)
            .and_then(|raw| serde_json::from_str(&raw).map_err(QuizError::from))
        {
            Ok(settings) => settings,
            Err(e) => {
                logger::log(&format!("Could not load settings: {}", e));
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), QuizError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn question_type(&self) -> QuestionType {
        self.q_type.parse().unwrap_or_default()
    }

    pub fn mode(&self) -> GenerationMode {
        self.mode.parse().unwrap_or_default()
    }
}
