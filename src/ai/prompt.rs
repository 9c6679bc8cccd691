/// Exam whose style the generated questions imitate.
pub const EXAM_NAME: &str = "CompTIA Security+ 701";

const SINGLE_SHAPE_EXAMPLE: &str = r#"{
  "question": "...",
  "options": {"A": "...", "B": "...", "C": "...", "D": "..."},
  "answers": ["..."]
}"#;

const BATCH_SHAPE_EXAMPLE: &str = r#"{
  "questions": [
    {
      "question": "...",
      "options": {"A": "...", "B": "...", "C": "...", "D": "..."},
      "answers": ["..."]
    }
  ]
}"#;

/// Instruction text for the system message.
///
/// `question_type` is interpolated verbatim so callers can pass free-form phrases
/// such as "mixed single and multiple choice".
pub fn build_instruction(question_count: usize, question_type: &str) -> String {
    let count_phrase = if question_count > 1 {
        format!("exactly {}", question_count)
    } else {
        "exactly one".to_string()
    };

    let (structure, example) = if question_count > 1 {
        (
            r#"The JSON object must have a single key "questions" which contains a list of question objects."#,
            BATCH_SHAPE_EXAMPLE,
        )
    } else {
        (
            "The JSON object must have the structure shown below.",
            SINGLE_SHAPE_EXAMPLE,
        )
    };

    format!(
        r#"Act as an expert {EXAM_NAME} exam question author. Create {count_phrase} {question_type} question(s) that mirror the style and complexity of the {EXAM_NAME} exam.
Your entire response, including the question, options, and answer, must be derived SOLELY from the provided context.
**Question Style Guidelines:**
1. **Scenario-Based:** Present a realistic problem a practitioner might face.
2. **Application of Knowledge:** Test the application of concepts, not just definition recall.
3. **Plausible Options:** All answer choices should be plausible and relevant to the scenario.
4. **Use Acronyms Realistically:** If a term has a common acronym defined in the context, use it where appropriate, just as a real exam would. Do not force acronyms unnaturally.
**Output Format:**
Your response MUST be a single, valid JSON object without any extra text or markdown. {structure} Every entry in "answers" must be a key of "options". The structure must be exactly as follows: {example}"#
    )
}

/// User message wrapping the topic text.
pub fn context_message(context: &str) -> String {
    format!("Context:\n---\n{}\n---", context)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_question_prompt() {
        let prompt = build_instruction(1, "single correct answer");
        assert!(prompt.contains("Create exactly one single correct answer question(s)"));
        assert!(prompt.contains(r#""question": "...""#));
        assert!(!prompt.contains(r#""questions""#));
    }

    #[test]
    fn test_prompt_names_exam() {
        let prompt = build_instruction(2, "single correct answer");
        assert!(prompt.starts_with("Act as an expert CompTIA Security+ 701 exam question author."));
        assert!(prompt.contains("complexity of the CompTIA Security+ 701 exam."));
    }

    #[test]
    fn test_batch_prompt() {
        let prompt = build_instruction(5, "multiple correct answers");
        assert!(prompt.contains("Create exactly 5 multiple correct answers question(s)"));
        assert!(prompt.contains(r#"single key "questions""#));
        assert!(prompt.contains(r#""questions": ["#));
    }

    #[test]
    fn test_free_form_type_is_verbatim() {
        let prompt = build_instruction(3, "mixed single and multiple choice");
        assert!(prompt.contains("exactly 3 mixed single and multiple choice question(s)"));
    }

    #[test]
    fn test_zero_count_reads_as_one() {
        assert_eq!(build_instruction(0, "x"), build_instruction(1, "x"));
    }

    #[test]
    fn test_context_message() {
        assert_eq!(context_message("abc"), "Context:\n---\nabc\n---");
    }
}
