//! Suggestion composition.
//!
//! Builds a deterministic prompt from the request body, drives one round
//! trip against the text-generation provider, and splits the free-form
//! result into the two sections the frontend renders.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::config::Config;

/// Literal delimiter the prompt asks the model to emit between the plan
/// and the step-by-step section.
pub const SECTION_MARKER: &str = "Implementation Instructions:";

const SYSTEM_PROMPT: &str = "You are an SEO assistant providing business plans.";

const FALLBACK_PLAN: &str = "No business plan generated.";
const FALLBACK_IMPLEMENTATION: &str = "No implementation instructions generated.";

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Text generation failed: {0}")]
    ProviderFailure(String),

    #[error("The provider returned an empty response")]
    EmptyResponse,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestions {
    pub business_plan: String,
    pub implementation: String,
}

/// Opaque text-generation capability. One call, one result, no retries;
/// failures surface to the caller untouched.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        max_tokens: u32,
    ) -> Result<String, GenerationError>;
}

pub async fn generate(
    generator: &dyn TextGenerator,
    body: &Map<String, Value>,
    max_tokens: u32,
) -> Result<Suggestions, GenerationError> {
    let prompt = build_prompt(body);
    let text = generator
        .complete(SYSTEM_PROMPT, &prompt, max_tokens)
        .await?;

    Ok(split_sections(&text))
}

/// A non-empty `prompt` field wins; otherwise the body is treated as
/// profile fields and rendered into the fixed template. Absent or
/// non-string fields render as "N/A" so the same profile always produces
/// the same prompt.
pub fn build_prompt(body: &Map<String, Value>) -> String {
    if let Some(prompt) = body
        .get("prompt")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|prompt| !prompt.is_empty())
    {
        return prompt.to_string();
    }

    format!(
        "Business name: {}\n\
         Website: {}\n\
         Services: {}\n\
         Location: {}\n\n\
         Write an SEO-focused business plan for this business. After the \
         plan, add a section starting with \"{SECTION_MARKER}\" listing \
         concrete next steps.",
        field_or_na(body, "businessName"),
        field_or_na(body, "website"),
        field_or_na(body, "services"),
        field_or_na(body, "location"),
    )
}

fn field_or_na<'a>(body: &'a Map<String, Value>, key: &str) -> &'a str {
    body.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or("N/A")
}

/// Splits generated text on the section marker. Either side, when empty
/// after trimming, is replaced by its fixed fallback string so the
/// response shape never degrades.
pub fn split_sections(text: &str) -> Suggestions {
    let (plan, implementation) = match text.split_once(SECTION_MARKER) {
        Some((before, after)) => (before.trim(), after.trim()),
        None => (text.trim(), ""),
    };

    Suggestions {
        business_plan: if plan.is_empty() {
            FALLBACK_PLAN.to_string()
        } else {
            plan.to_string()
        },
        implementation: if implementation.is_empty() {
            FALLBACK_IMPLEMENTATION.to_string()
        } else {
            implementation.to_string()
        },
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}

/// Chat-completions client for OpenAI-compatible endpoints.
pub struct OpenAiGenerator {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl OpenAiGenerator {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: config.openai_api_url.clone(),
            api_key: config.openai_api_key.clone(),
            model: config.model.clone(),
        }
    }
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        max_tokens: u32,
    ) -> Result<String, GenerationError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
            max_tokens,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| GenerationError::ProviderFailure(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(GenerationError::ProviderFailure(format!(
                "{status}: {detail}"
            )));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::ProviderFailure(e.to_string()))?;

        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(GenerationError::EmptyResponse)
    }
}
