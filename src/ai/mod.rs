pub mod client;
pub mod extract;
pub mod prompt;

// Public API exports
pub use client::{
    BATCH_REQUEST_TIMEOUT, QuestionClient, QuestionSource, SINGLE_REQUEST_TIMEOUT,
};
pub use extract::{extract_json_object, parse_question_list, parse_single_question};
pub use prompt::build_instruction;
