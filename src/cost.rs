use crate::ai::build_instruction;
use crate::models::{GenerationMode, SINGLE_ANSWER_LABEL};
use std::fmt;

pub const CHARS_PER_TOKEN: usize = 4;
pub const OUTPUT_TOKENS_PER_QUESTION: usize = 400;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CostEstimate {
    /// Topic or question count not chosen yet.
    NotApplicable,
    /// Count or a price field is not a number.
    Invalid,
    /// Both prices are zero.
    Free,
    Cost(f64),
}

impl fmt::Display for CostEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CostEstimate::NotApplicable => write!(f, "Estimated Cost: N/A"),
            CostEstimate::Invalid => write!(f, "Estimated Cost: Invalid Price"),
            CostEstimate::Free => write!(f, "Estimated Cost: $0.00 (Free Model)"),
            CostEstimate::Cost(cost) => write!(f, "Estimated Cost: ${:.6}", cost),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenEstimate {
    pub input_tokens: usize,
    pub output_tokens: usize,
}

/// Heuristic token counts: four characters per token, 400 output tokens per question.
///
/// `None` when the counts do not fit in a `usize`.
pub fn estimate_tokens(
    topic_text: &str,
    question_count: usize,
    mode: GenerationMode,
) -> Option<TokenEstimate> {
    let context_tokens = topic_text.chars().count() / CHARS_PER_TOKEN;
    let prompt_tokens = base_prompt_tokens();
    let per_request = context_tokens.checked_add(prompt_tokens)?;

    let input_tokens = match mode {
        GenerationMode::Batch => per_request,
        GenerationMode::Single => question_count.checked_mul(per_request)?,
    };

    Some(TokenEstimate {
        input_tokens,
        output_tokens: question_count.checked_mul(OUTPUT_TOKENS_PER_QUESTION)?,
    })
}

pub fn base_prompt_tokens() -> usize {
    build_instruction(1, SINGLE_ANSWER_LABEL).chars().count() / CHARS_PER_TOKEN
}

/// Estimate the dollar cost of a run from raw form values. Never fails.
pub fn estimate(
    topic_text: Option<&str>,
    question_count: &str,
    mode: GenerationMode,
    input_price_per_million: &str,
    output_price_per_million: &str,
) -> CostEstimate {
    let Some(topic_text) = topic_text else {
        return CostEstimate::NotApplicable;
    };
    let question_count = question_count.trim();
    if question_count.is_empty() {
        return CostEstimate::NotApplicable;
    }

    let (Ok(count), Ok(input_price), Ok(output_price)) = (
        question_count.parse::<usize>(),
        input_price_per_million.trim().parse::<f64>(),
        output_price_per_million.trim().parse::<f64>(),
    ) else {
        return CostEstimate::Invalid;
    };
    if !input_price.is_finite() || !output_price.is_finite() {
        return CostEstimate::Invalid;
    }

    if input_price == 0.0 && output_price == 0.0 {
        return CostEstimate::Free;
    }

    let Some(tokens) = estimate_tokens(topic_text, count, mode) else {
        return CostEstimate::Invalid;
    };
    let input_cost = (tokens.input_tokens as f64 / 1_000_000.0) * input_price;
    let output_cost = (tokens.output_tokens as f64 / 1_000_000.0) * output_price;
    CostEstimate::Cost(input_cost + output_cost)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_estimate() {
        let topic = "x".repeat(4000);
        let prompt_tokens = base_prompt_tokens();

        let tokens = estimate_tokens(&topic, 5, GenerationMode::Batch).unwrap();
        assert_eq!(tokens.input_tokens, 1000 + prompt_tokens);
        assert_eq!(tokens.output_tokens, 2000);

        let expected = ((1000 + prompt_tokens) as f64 / 1e6) * 2.0 + (2000.0 / 1e6) * 6.0;
        match estimate(Some(&topic), "5", GenerationMode::Batch, "2", "6") {
            CostEstimate::Cost(cost) => assert!((cost - expected).abs() < 1e-12),
            other => panic!("unexpected estimate: {:?}", other),
        }
        // Same inputs, same answer.
        assert_eq!(
            estimate(Some(&topic), "5", GenerationMode::Batch, "2", "6"),
            estimate(Some(&topic), "5", GenerationMode::Batch, "2", "6")
        );
    }

    #[test]
    fn test_single_mode_charges_input_per_question() {
        let topic = "x".repeat(4000);
        let prompt_tokens = base_prompt_tokens();
        let tokens = estimate_tokens(&topic, 5, GenerationMode::Single).unwrap();
        assert_eq!(tokens.input_tokens, 5 * (1000 + prompt_tokens));
        assert_eq!(tokens.output_tokens, 2000);
    }

    #[test]
    fn test_no_topic_is_not_applicable() {
        assert_eq!(
            estimate(None, "5", GenerationMode::Batch, "2", "6"),
            CostEstimate::NotApplicable
        );
        assert_eq!(
            estimate(None, "abc", GenerationMode::Single, "bad", "bad"),
            CostEstimate::NotApplicable
        );
    }

    #[test]
    fn test_missing_count_is_not_applicable() {
        assert_eq!(
            estimate(Some("text"), "  ", GenerationMode::Batch, "2", "6"),
            CostEstimate::NotApplicable
        );
    }

    #[test]
    fn test_unparseable_prices_are_invalid() {
        assert_eq!(
            estimate(Some("text"), "5", GenerationMode::Batch, "two", "6"),
            CostEstimate::Invalid
        );
        assert_eq!(
            estimate(Some("text"), "five", GenerationMode::Batch, "2", "6"),
            CostEstimate::Invalid
        );
    }

    #[test]
    fn test_overflowing_count_is_invalid() {
        let topic = "x".repeat(4000);
        for mode in GenerationMode::ALL {
            assert_eq!(
                estimate(Some(&topic), "99999999999999999", mode, "2", "6"),
                CostEstimate::Invalid
            );
        }
        assert!(estimate_tokens(&topic, usize::MAX, GenerationMode::Batch).is_none());
    }

    #[test]
    fn test_large_count_still_estimates() {
        let topic = "x".repeat(4000);
        assert!(matches!(
            estimate(Some(&topic), "1000000000", GenerationMode::Single, "2", "6"),
            CostEstimate::Cost(c) if c.is_finite() && c > 0.0
        ));
    }

    #[test]
    fn test_zero_prices_are_free() {
        assert_eq!(
            estimate(Some("text"), "5", GenerationMode::Single, "0", "0.0"),
            CostEstimate::Free
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(CostEstimate::Cost(0.0123).to_string(), "Estimated Cost: $0.012300");
        assert_eq!(CostEstimate::NotApplicable.to_string(), "Estimated Cost: N/A");
    }
}
