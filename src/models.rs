use crate::error::QuizError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

pub const SINGLE_ANSWER_LABEL: &str = "single correct answer";
pub const MULTIPLE_ANSWER_LABEL: &str = "multiple correct answers";
pub const MIXED_LABEL: &str = "Mixed";
pub const MIXED_BATCH_LABEL: &str = "mixed single and multiple choice";

/// A generated multiple-choice question.
///
/// Option labels are kept in a `BTreeMap` so they render A, B, C... regardless of
/// the order the model emitted them. `answers` is a set; its size decides whether
/// the question is rendered with checkboxes or radio buttons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    pub options: BTreeMap<String, String>,
    pub answers: BTreeSet<String>,
}

impl Question {
    /// Deserialize one question object and check that its answers point at real options.
    pub fn from_value(value: serde_json::Value) -> Result<Self, QuizError> {
        let question: Question = serde_json::from_value(value)?;
        question.validate()?;
        Ok(question)
    }

    pub fn validate(&self) -> Result<(), QuizError> {
        if self.answers.is_empty() {
            return Err(QuizError::Parse(format!(
                "question '{}' has no correct answers",
                self.question
            )));
        }
        if let Some(unknown) = self.answers.iter().find(|a| !self.options.contains_key(*a)) {
            return Err(QuizError::Parse(format!(
                "question '{}' marks '{}' as correct but has no such option",
                self.question, unknown
            )));
        }
        Ok(())
    }

    pub fn is_multiple_choice(&self) -> bool {
        self.answers.len() > 1
    }

    pub fn labels(&self) -> Vec<&str> {
        self.options.keys().map(String::as_str).collect()
    }
}

/// The question type offered by the setup form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuestionType {
    #[default]
    Single,
    Multiple,
    Mixed,
}

impl QuestionType {
    pub const ALL: [QuestionType; 3] =
        [QuestionType::Single, QuestionType::Multiple, QuestionType::Mixed];

    pub fn label(&self) -> &'static str {
        match self {
            QuestionType::Single => SINGLE_ANSWER_LABEL,
            QuestionType::Multiple => MULTIPLE_ANSWER_LABEL,
            QuestionType::Mixed => MIXED_LABEL,
        }
    }

    /// Phrase used in a batch prompt.
    pub fn batch_label(&self) -> &'static str {
        match self {
            QuestionType::Mixed => MIXED_BATCH_LABEL,
            other => other.label(),
        }
    }

    /// Phrase used for one single-mode request; `Mixed` flips a coin per call.
    pub fn single_label<R: Rng + ?Sized>(&self, rng: &mut R) -> &'static str {
        match self {
            QuestionType::Mixed => {
                if rng.gen_bool(0.5) {
                    SINGLE_ANSWER_LABEL
                } else {
                    MULTIPLE_ANSWER_LABEL
                }
            }
            other => other.label(),
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for QuestionType {
    type Err = QuizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QuestionType::ALL
            .into_iter()
            .find(|t| t.label() == s)
            .ok_or_else(|| QuizError::InvalidInput(format!("Unknown question type '{}'", s)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenerationMode {
    /// One request per question.
    #[default]
    Single,
    /// One request for the whole quiz.
    Batch,
}

impl GenerationMode {
    pub const ALL: [GenerationMode; 2] = [GenerationMode::Single, GenerationMode::Batch];

    pub fn label(&self) -> &'static str {
        match self {
            GenerationMode::Single => "Single Mode",
            GenerationMode::Batch => "Batch Mode",
        }
    }
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for GenerationMode {
    type Err = QuizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GenerationMode::ALL
            .into_iter()
            .find(|m| m.label() == s)
            .ok_or_else(|| QuizError::InvalidInput(format!("Unknown generation mode '{}'", s)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizState {
    AwaitingAnswer(usize),
    Finished,
}

/// Grading row for one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionResult {
    pub index: usize,
    pub question: String,
    pub user_answers: Vec<String>,
    /// `(label, option text)` for every correct label, sorted by label.
    pub correct_answers: Vec<(String, String)>,
    pub is_correct: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    pub correct: usize,
    pub total: usize,
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Final Score: {} out of {}", self.correct, self.total)
    }
}

/// Linear ask/answer state machine over one generated question list.
#[derive(Debug, Clone)]
pub struct QuizSession {
    questions: Vec<Question>,
    user_answers: Vec<BTreeSet<String>>,
    state: QuizState,
}

impl QuizSession {
    pub fn new(questions: Vec<Question>) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::EmptyResult);
        }
        Ok(Self {
            questions,
            user_answers: Vec::new(),
            state: QuizState::AwaitingAnswer(0),
        })
    }

    pub fn state(&self) -> QuizState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state == QuizState::Finished
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn user_answers(&self) -> &[BTreeSet<String>] {
        &self.user_answers
    }

    pub fn current_index(&self) -> Option<usize> {
        match self.state {
            QuizState::AwaitingAnswer(i) => Some(i),
            QuizState::Finished => None,
        }
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.current_index().map(|i| &self.questions[i])
    }

    /// Record an answer for the current question and advance.
    pub fn submit(&mut self, answers: BTreeSet<String>) -> Result<QuizState, QuizError> {
        let index = self
            .current_index()
            .ok_or_else(|| QuizError::InvalidInput("The quiz is already finished.".into()))?;

        let question = &self.questions[index];
        if answers.is_empty() {
            let msg = if question.is_multiple_choice() {
                "Please select at least one option."
            } else {
                "Please select an option."
            };
            return Err(QuizError::InvalidInput(msg.into()));
        }
        if let Some(unknown) = answers.iter().find(|a| !question.options.contains_key(*a)) {
            return Err(QuizError::InvalidInput(format!(
                "'{}' is not an option for this question.",
                unknown
            )));
        }

        self.user_answers.push(answers);
        self.state = if index + 1 == self.questions.len() {
            QuizState::Finished
        } else {
            QuizState::AwaitingAnswer(index + 1)
        };
        Ok(self.state)
    }

    pub fn is_correct(&self, index: usize) -> Option<bool> {
        let answer = self.user_answers.get(index)?;
        let question = self.questions.get(index)?;
        Some(grade(answer, &question.answers))
    }

    pub fn score(&self) -> Score {
        Score {
            correct: (0..self.user_answers.len())
                .filter(|i| self.is_correct(*i) == Some(true))
                .count(),
            total: self.questions.len(),
        }
    }

    pub fn results(&self) -> Vec<QuestionResult> {
        self.questions
            .iter()
            .zip(&self.user_answers)
            .enumerate()
            .map(|(index, (question, answer))| QuestionResult {
                index,
                question: question.question.clone(),
                user_answers: answer.iter().cloned().collect(),
                correct_answers: question
                    .answers
                    .iter()
                    .map(|label| {
                        let text = question
                            .options
                            .get(label)
                            .cloned()
                            .unwrap_or_else(|| "N/A".to_string());
                        (label.clone(), text)
                    })
                    .collect(),
                is_correct: grade(answer, &question.answers),
            })
            .collect()
    }
}

/// Both sides are compared as sorted label sequences.
pub fn grade<'a>(
    user: impl IntoIterator<Item = &'a String>,
    correct: impl IntoIterator<Item = &'a String>,
) -> bool {
    let mut user: Vec<&String> = user.into_iter().collect();
    let mut correct: Vec<&String> = correct.into_iter().collect();
    user.sort();
    user.dedup();
    correct.sort();
    correct.dedup();
    user == correct
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Setup,
    Quiz,
    Summary,
}

#[cfg(test)]
pub(crate) fn sample_question(text: &str, answers: &[&str]) -> Question {
    Question {
        question: text.to_string(),
        options: [("A", "first"), ("B", "second"), ("C", "third"), ("D", "fourth")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        answers: answers.iter().map(|a| a.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn set(labels: &[&str]) -> BTreeSet<String> {
        labels.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_question_from_value_valid() {
        let value = serde_json::json!({
            "question": "Which control is preventive?",
            "options": {"A": "Firewall", "B": "Audit log", "C": "CCTV"},
            "answers": ["A"]
        });
        let q = Question::from_value(value).unwrap();
        assert!(!q.is_multiple_choice());
        assert_eq!(q.labels(), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_question_rejects_empty_answers() {
        let value = serde_json::json!({
            "question": "Q",
            "options": {"A": "x"},
            "answers": []
        });
        assert!(matches!(
            Question::from_value(value),
            Err(QuizError::Parse(_))
        ));
    }

    #[test]
    fn test_question_rejects_answer_outside_options() {
        let value = serde_json::json!({
            "question": "Q",
            "options": {"A": "x", "B": "y"},
            "answers": ["A", "E"]
        });
        let err = Question::from_value(value).unwrap_err();
        assert!(err.to_string().contains("'E'"));
    }

    #[test]
    fn test_question_missing_fields_is_parse_error() {
        let value = serde_json::json!({"question": "Q"});
        assert!(matches!(
            Question::from_value(value),
            Err(QuizError::Parse(_))
        ));
    }

    #[test]
    fn test_multiple_choice_classification() {
        assert!(sample_question("Q", &["A", "C"]).is_multiple_choice());
        assert!(!sample_question("Q", &["B"]).is_multiple_choice());
    }

    #[test]
    fn test_grading_is_order_independent() {
        let user = vec!["B".to_string(), "A".to_string()];
        let correct = vec!["A".to_string(), "B".to_string()];
        assert!(grade(&user, &correct));
        assert!(!grade(&user[..1], &correct));
    }

    #[test]
    fn test_session_rejects_empty_question_list() {
        assert!(matches!(
            QuizSession::new(vec![]),
            Err(QuizError::EmptyResult)
        ));
    }

    #[test]
    fn test_session_walks_to_finished() {
        let mut session = QuizSession::new(vec![
            sample_question("one", &["A"]),
            sample_question("two", &["A", "B"]),
            sample_question("three", &["D"]),
        ])
        .unwrap();

        assert_eq!(session.state(), QuizState::AwaitingAnswer(0));
        assert_eq!(session.submit(set(&["A"])).unwrap(), QuizState::AwaitingAnswer(1));
        assert_eq!(
            session.submit(set(&["B", "A"])).unwrap(),
            QuizState::AwaitingAnswer(2)
        );
        assert_eq!(session.submit(set(&["C"])).unwrap(), QuizState::Finished);
        assert!(session.is_finished());
        assert!(session.current_question().is_none());

        let score = session.score();
        assert_eq!(score.correct, 2);
        assert_eq!(score.total, 3);
        assert_eq!(score.to_string(), "Final Score: 2 out of 3");
    }

    #[test]
    fn test_submit_empty_answer_does_not_advance() {
        let mut session = QuizSession::new(vec![sample_question("one", &["A", "B"])]).unwrap();
        let err = session.submit(BTreeSet::new()).unwrap_err();
        assert_eq!(err.to_string(), "Please select at least one option.");
        assert_eq!(session.state(), QuizState::AwaitingAnswer(0));
        assert!(session.user_answers().is_empty());
    }

    #[test]
    fn test_submit_unknown_label_rejected() {
        let mut session = QuizSession::new(vec![sample_question("one", &["A"])]).unwrap();
        assert!(session.submit(set(&["Z"])).is_err());
        assert_eq!(session.state(), QuizState::AwaitingAnswer(0));
    }

    #[test]
    fn test_submit_after_finished_is_error() {
        let mut session = QuizSession::new(vec![sample_question("one", &["A"])]).unwrap();
        session.submit(set(&["A"])).unwrap();
        assert!(session.submit(set(&["A"])).is_err());
        assert_eq!(session.user_answers().len(), 1);
    }

    #[test]
    fn test_results_rows() {
        let mut session = QuizSession::new(vec![
            sample_question("one", &["B", "A"]),
            sample_question("two", &["C"]),
        ])
        .unwrap();
        session.submit(set(&["A", "B"])).unwrap();
        session.submit(set(&["D"])).unwrap();

        let results = session.results();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_correct);
        assert_eq!(
            results[0].correct_answers,
            vec![
                ("A".to_string(), "first".to_string()),
                ("B".to_string(), "second".to_string())
            ]
        );
        assert!(!results[1].is_correct);
        assert_eq!(results[1].user_answers, vec!["D".to_string()]);
    }

    #[test]
    fn test_question_type_labels() {
        assert_eq!(QuestionType::Mixed.batch_label(), MIXED_BATCH_LABEL);
        assert_eq!(QuestionType::Single.batch_label(), SINGLE_ANSWER_LABEL);
        assert_eq!(
            "multiple correct answers".parse::<QuestionType>().unwrap(),
            QuestionType::Multiple
        );
        assert!("other".parse::<QuestionType>().is_err());
    }

    #[test]
    fn test_mixed_single_label_picks_both_types() {
        let mut rng = StdRng::seed_from_u64(7);
        let labels: BTreeSet<&str> = (0..64)
            .map(|_| QuestionType::Mixed.single_label(&mut rng))
            .collect();
        assert_eq!(
            labels,
            [SINGLE_ANSWER_LABEL, MULTIPLE_ANSWER_LABEL].into_iter().collect()
        );
        assert_eq!(
            QuestionType::Multiple.single_label(&mut rng),
            MULTIPLE_ANSWER_LABEL
        );
    }

    #[test]
    fn test_generation_mode_round_trip_labels() {
        for mode in GenerationMode::ALL {
            assert_eq!(mode.label().parse::<GenerationMode>().unwrap(), mode);
        }
    }
}
