use std::sync::Arc;
use std::time::Duration;

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
        CreateEmbeddingRequestArgs, ResponseFormat,
    },
    Client,
};

use crate::utils::error::AppError;

/// Chat model used for interpretation.
const CHAT_MODEL: &str = "gpt-4o";

/// Embedding model used for similarity retrieval.
const EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// Per-call OpenAI timeout (seconds).
const OPENAI_TIMEOUT_SECS: u64 = 25;

/// Maps an OpenAI error onto the upstream error taxonomy.
fn classify_openai_error(error: OpenAIError) -> AppError {
    match &error {
        OpenAIError::ApiError(api_err) => {
            let err_type = api_err.r#type.as_deref().unwrap_or("");
            let message = &api_err.message;

            // The error code may be a JSON value, so normalize to a string
            let err_code = api_err
                .code
                .as_ref()
                .map(|v| v.as_str())
                .unwrap_or("");

            if err_type == "invalid_request_error"
                && (err_code == "invalid_api_key" || message.contains("API key"))
            {
                AppError::UpstreamAuth
            } else if err_type == "rate_limit_error"
                || err_code == "rate_limit_exceeded"
                || message.contains("rate limit")
            {
                AppError::UpstreamRateLimited
            } else if err_type == "server_error"
                || err_code.contains("server")
                || message.contains("server")
            {
                AppError::UpstreamTemporary
            } else {
                AppError::Upstream(message.clone())
            }
        }
        OpenAIError::Reqwest(req_err) => {
            if req_err.is_timeout() || req_err.is_connect() {
                AppError::UpstreamTemporary
            } else if req_err.status().map(|s| s.as_u16()) == Some(401) {
                AppError::UpstreamAuth
            } else if req_err.status().map(|s| s.as_u16()) == Some(429) {
                AppError::UpstreamRateLimited
            } else if req_err
                .status()
                .map(|s| s.is_server_error())
                .unwrap_or(false)
            {
                AppError::UpstreamTemporary
            } else {
                AppError::Upstream(req_err.to_string())
            }
        }
        _ => AppError::Upstream(error.to_string()),
    }
}

/// AI client interface.
///
/// Abstracts the two LLM calls the pipeline makes so tests can substitute
/// mock objects and assert call counts.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait AiClientTrait: Send + Sync {
    /// Maps free text to a fixed-length embedding vector.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, AppError>;

    /// Chat completion in JSON-only mode; returns the raw JSON string.
    async fn complete_json(&self, system_prompt: &str, user_text: &str)
        -> Result<String, AppError>;

    /// API reachability check (model listing), used by the health probe.
    async fn check_connectivity(&self) -> Result<(), AppError>;
}

/// Arc-wrapped AI client (Clone support).
pub type AiClient = Arc<dyn AiClientTrait>;

/// OpenAI-backed implementation.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client<OpenAIConfig>,
}

impl OpenAiClient {
    pub fn new(api_key: &str) -> Self {
        let config = OpenAIConfig::new().with_api_key(api_key);
        Self {
            client: Client::with_config(config),
        }
    }
}

#[async_trait::async_trait]
impl AiClientTrait for OpenAiClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, AppError> {
        let request = CreateEmbeddingRequestArgs::default()
            .model(EMBEDDING_MODEL)
            .input(text)
            .build()
            .map_err(|e| AppError::Internal(e.to_string()))?;

        let response = tokio::time::timeout(
            Duration::from_secs(OPENAI_TIMEOUT_SECS),
            self.client.embeddings().create(request),
        )
        .await
        .map_err(|_| AppError::UpstreamTemporary)?
        .map_err(classify_openai_error)?;

        response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| AppError::Upstream("Empty embedding response".to_string()))
    }

    async fn complete_json(
        &self,
        system_prompt: &str,
        user_text: &str,
    ) -> Result<String, AppError> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(CHAT_MODEL)
            .messages(vec![
                build_system_message(system_prompt)?,
                build_user_message(user_text)?,
            ])
            .response_format(ResponseFormat::JsonObject)
            .temperature(0.7)
            .build()
            .map_err(|e| AppError::Internal(e.to_string()))?;

        let response = tokio::time::timeout(
            Duration::from_secs(OPENAI_TIMEOUT_SECS),
            self.client.chat().create(request),
        )
        .await
        .map_err(|_| AppError::UpstreamTemporary)?
        .map_err(classify_openai_error)?;

        response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .ok_or_else(|| AppError::Upstream("No completion choices returned".to_string()))
    }

    async fn check_connectivity(&self) -> Result<(), AppError> {
        self.client
            .models()
            .list()
            .await
            .map_err(classify_openai_error)?;
        Ok(())
    }
}

fn build_system_message(content: &str) -> Result<ChatCompletionRequestMessage, AppError> {
    Ok(ChatCompletionRequestMessage::System(
        ChatCompletionRequestSystemMessageArgs::default()
            .content(content)
            .build()
            .map_err(|e| AppError::Internal(e.to_string()))?,
    ))
}

fn build_user_message(content: &str) -> Result<ChatCompletionRequestMessage, AppError> {
    Ok(ChatCompletionRequestMessage::User(
        ChatCompletionRequestUserMessageArgs::default()
            .content(content)
            .build()
            .map_err(|e| AppError::Internal(e.to_string()))?,
    ))
}
