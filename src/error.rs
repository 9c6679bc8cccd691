use std::io;

/// Errors produced anywhere between loading configuration and grading a quiz.
#[derive(Debug, thiserror::Error)]
pub enum QuizError {
    /// Missing or malformed `config.json`. Fatal at startup.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Missing content root. Fatal at startup.
    #[error("Content error: {0}")]
    Content(String),

    /// Network failure, timeout or a non-success HTTP status.
    #[error("Request failed: {0}")]
    Transport(String),

    /// The model response could not be recovered as question JSON.
    #[error("Could not parse model response: {0}")]
    Parse(String),

    #[error("Failed to generate any questions.")]
    EmptyResult,

    #[error("{0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl From<reqwest::Error> for QuizError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            QuizError::Transport(format!("request timed out: {}", err))
        } else {
            QuizError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for QuizError {
    fn from(err: serde_json::Error) -> Self {
        QuizError::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_error_maps_to_parse() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let quiz_err: QuizError = err.into();
        assert!(matches!(quiz_err, QuizError::Parse(_)));
    }

    #[test]
    fn test_io_error_maps_to_io() {
        let err = io::Error::new(io::ErrorKind::NotFound, "gone");
        let quiz_err: QuizError = err.into();
        assert!(matches!(quiz_err, QuizError::Io(_)));
        assert!(quiz_err.to_string().contains("gone"));
    }

    #[test]
    fn test_empty_result_message() {
        assert_eq!(
            QuizError::EmptyResult.to_string(),
            "Failed to generate any questions."
        );
    }
}
