use crate::ai::extract::{parse_question_list, parse_single_question};
use crate::ai::prompt::{build_instruction, context_message};
use crate::config::GenerationConfig;
use crate::error::QuizError;
use crate::logger;
use crate::models::Question;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const SINGLE_REQUEST_TIMEOUT: Duration = Duration::from_secs(90);
pub const BATCH_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Anything that can turn topic text into questions. The worker only talks to this.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    async fn generate_batch(
        &self,
        context: &str,
        count: usize,
        question_type: &str,
    ) -> Result<Vec<Question>, QuizError>;

    /// `Ok(None)` when the model answered with an empty object.
    async fn generate_one(
        &self,
        context: &str,
        question_type: &str,
    ) -> Result<Option<Question>, QuizError>;
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Chat-completion client for an OpenAI-compatible endpoint.
#[derive(Debug, Clone)]
pub struct QuestionClient {
    http: reqwest::Client,
    config: GenerationConfig,
}

impl QuestionClient {
    pub fn new(config: GenerationConfig) -> Result<Self, QuizError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| QuizError::Transport(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn build_request(&self, instruction: String, context: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.config.model_name.clone(),
            messages: vec![
                ChatMessage::new("system", instruction),
                ChatMessage::new("user", context_message(context)),
            ],
        }
    }

    /// Send one completion request and return `choices[0].message.content`.
    pub async fn complete(
        &self,
        request: &ChatCompletionRequest,
        timeout: Duration,
    ) -> Result<String, QuizError> {
        logger::log(&format!(
            "POST {} (model {}, timeout {}s)",
            self.config.api_url,
            request.model,
            timeout.as_secs()
        ));

        let response = self
            .http
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(request)
            .timeout(timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            logger::log(&format!("Endpoint returned {}: {}", status, body));
            return Err(QuizError::Transport(format!(
                "HTTP {}: {}",
                status,
                crate::utils::truncate_string(body.trim(), 200)
            )));
        }

        let body: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| QuizError::Parse(format!("unexpected completion body: {}", e)))?;

        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| QuizError::Parse("No response choices received".into()))?;

        logger::log(&format!("Raw model response: {}", content));
        Ok(content)
    }
}

#[async_trait]
impl QuestionSource for QuestionClient {
    async fn generate_batch(
        &self,
        context: &str,
        count: usize,
        question_type: &str,
    ) -> Result<Vec<Question>, QuizError> {
        let request = self.build_request(build_instruction(count, question_type), context);
        let content = self.complete(&request, BATCH_REQUEST_TIMEOUT).await?;
        parse_question_list(&content)
    }

    async fn generate_one(
        &self,
        context: &str,
        question_type: &str,
    ) -> Result<Option<Question>, QuizError> {
        let request = self.build_request(build_instruction(1, question_type), context);
        let content = self.complete(&request, SINGLE_REQUEST_TIMEOUT).await?;
        parse_single_question(&content)
    }
}
