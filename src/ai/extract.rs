use crate::error::QuizError;
use crate::models::Question;
use serde_json::Value;

/// Slice from the first `{` to the last `}` inclusive.
///
/// Models wrap JSON in prose or code fences often enough that this permissive scan
/// is the contract. Swap this function out to tighten parsing.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

pub fn parse_json_object(text: &str) -> Result<Value, QuizError> {
    let json_text = extract_json_object(text).ok_or_else(|| {
        QuizError::Parse(format!(
            "no JSON object found in response: {}",
            crate::utils::truncate_string(text, 120)
        ))
    })?;
    crate::logger::log(&format!("Extracted JSON: {}", json_text));
    Ok(serde_json::from_str(json_text)?)
}

/// The `questions` list of a batch response; a missing key yields an empty list.
pub fn parse_question_list(text: &str) -> Result<Vec<Question>, QuizError> {
    let value = parse_json_object(text)?;
    match value.get("questions") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items.iter().cloned().map(Question::from_value).collect(),
        Some(other) => Err(QuizError::Parse(format!(
            "\"questions\" is not a list: {}",
            other
        ))),
    }
}

/// A single-question response. An empty object (or `null`) means the model gave nothing.
pub fn parse_single_question(text: &str) -> Result<Option<Question>, QuizError> {
    let value = parse_json_object(text)?;
    if is_empty_value(&value) {
        return Ok(None);
    }
    Question::from_value(value).map(Some)
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_from_prose() {
        let raw = r#"Sure! Here you go: {"question":"Q","options":{"A":"x"},"answers":["A"]} Hope that helps!"#;
        let q = parse_single_question(raw).unwrap().unwrap();
        assert_eq!(q.question, "Q");
        assert_eq!(q.options.get("A").map(String::as_str), Some("x"));
        assert!(q.answers.contains("A"));
    }

    #[test]
    fn test_extract_from_code_fence() {
        let raw = "```json\n{\"questions\": []}\n```";
        assert_eq!(extract_json_object(raw), Some("{\"questions\": []}"));
    }

    #[test]
    fn test_no_braces_is_parse_error() {
        assert!(matches!(
            parse_json_object("I cannot help with that."),
            Err(QuizError::Parse(_))
        ));
    }

    #[test]
    fn test_reversed_braces_is_none() {
        assert_eq!(extract_json_object("} oops {"), None);
    }

    #[test]
    fn test_invalid_json_between_braces() {
        assert!(matches!(
            parse_json_object("{ not: json }"),
            Err(QuizError::Parse(_))
        ));
    }

    #[test]
    fn test_question_list_in_order() {
        let raw = r#"{"questions": [
            {"question": "q1", "options": {"A": "a", "B": "b"}, "answers": ["A"]},
            {"question": "q2", "options": {"A": "a", "B": "b"}, "answers": ["B", "A"]},
            {"question": "q3", "options": {"A": "a", "B": "b"}, "answers": ["B"]}
        ]}"#;
        let questions = parse_question_list(raw).unwrap();
        let texts: Vec<&str> = questions.iter().map(|q| q.question.as_str()).collect();
        assert_eq!(texts, vec!["q1", "q2", "q3"]);
        assert!(questions[1].is_multiple_choice());
    }

    #[test]
    fn test_missing_questions_key_is_empty() {
        assert!(parse_question_list(r#"{"result": "nothing"}"#)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_batch_of_one_gets_single_shape_and_parses_empty() {
        // A batch of one is prompted for the bare question object, which has no
        // "questions" key, so the batch parser finds nothing.
        let prompt = crate::ai::prompt::build_instruction(1, "single correct answer");
        assert!(!prompt.contains(r#""questions""#));

        let reply = r#"{"question": "Q?", "options": {"A": "a", "B": "b"}, "answers": ["A"]}"#;
        assert!(parse_question_list(reply).unwrap().is_empty());
        assert!(parse_single_question(reply).unwrap().is_some());
    }

    #[test]
    fn test_questions_not_a_list() {
        assert!(parse_question_list(r#"{"questions": "nope"}"#).is_err());
    }

    #[test]
    fn test_empty_single_question_is_none() {
        assert_eq!(parse_single_question("here: {}").unwrap(), None);
    }

    #[test]
    fn test_invalid_single_question_is_error() {
        let raw = r#"{"question": "Q", "options": {"A": "x"}, "answers": ["B"]}"#;
        assert!(parse_single_question(raw).is_err());
    }
}
