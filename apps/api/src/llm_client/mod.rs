//! LLM Client: the single point of entry for all Gemini API calls in OmniCreate.
//!
//! ARCHITECTURAL RULE: No other module may call the Gemini API directly.
//! All generative interactions MUST go through this module.
//!
//! One invocation means exactly one outbound `generateContent` call. There is
//! no retry, no caching, and no request deduplication: every call is
//! independent.

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::models::generation::{
    AspectRatio, FormFillResult, GenerationRequest, GenerationResult, PosterResult, ResumeResult,
};

pub mod prompts;
pub mod schemas;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
/// Model for structured-text generation (resume, form fill).
pub const TEXT_MODEL: &str = "gemini-2.5-flash";
/// Model for poster image generation.
pub const IMAGE_MODEL: &str = "gemini-3-pro-image-preview";
const IMAGE_SIZE: &str = "1K";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Model returned empty content")]
    EmptyContent,

    #[error("Model reply contained no inline image data")]
    NoImage,
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types (Gemini `generateContent` request/response)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_config: Option<ImageConfig>,
}

impl GenerationConfig {
    /// Schema-constrained JSON response mode.
    fn json_with_schema(schema: Value) -> Self {
        Self {
            response_mime_type: Some("application/json"),
            response_schema: Some(schema),
            image_config: None,
        }
    }

    fn image(aspect_ratio: AspectRatio) -> Self {
        Self {
            response_mime_type: None,
            response_schema: None,
            image_config: Some(ImageConfig {
                aspect_ratio: aspect_ratio.as_str(),
                image_size: IMAGE_SIZE,
            }),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageConfig {
    aspect_ratio: &'static str,
    image_size: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsePart {
    pub text: Option<String>,
    pub inline_data: Option<InlineData>,
}

/// Inline image bytes, base64-encoded by the API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    #[serde(default = "default_image_mime")]
    pub mime_type: String,
    pub data: String,
}

fn default_image_mime() -> String {
    "image/png".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    pub prompt_token_count: Option<u32>,
    pub candidates_token_count: Option<u32>,
}

impl GenerateContentResponse {
    /// Extracts the text of the first text part of the first candidate.
    pub fn text(&self) -> Option<&str> {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| content.parts.iter())
            .and_then(|mut parts| parts.find_map(|p| p.text.as_deref()))
    }

    /// Extracts the first inline-image part of the first candidate.
    pub fn inline_image(&self) -> Option<&InlineData> {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| content.parts.iter())
            .and_then(|mut parts| parts.find_map(|p| p.inline_data.as_ref()))
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// The seam controllers depend on. `GeminiClient` is the production backend;
/// tests swap in a mock.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResult, ClientError>;
}

/// The single Gemini client used by all features in OmniCreate.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
}

impl GeminiClient {
    /// Uses the transport's default timeout behavior; no extra deadline is
    /// layered on top.
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
        }
    }

    /// Generates a structured resume from a free-text profile description.
    pub async fn generate_resume(&self, profile_text: &str) -> Result<ResumeResult, ClientError> {
        require_text("profileText", profile_text)?;
        let prompt = prompts::RESUME_PROMPT_TEMPLATE.replace("{profile_text}", profile_text);
        self.call_json(
            TEXT_MODEL,
            &prompt,
            GenerationConfig::json_with_schema(schemas::resume_response_schema()),
        )
        .await
    }

    /// Generates a poster image for a text prompt at the given aspect ratio.
    /// The reply must carry inline image bytes; a reply without them fails
    /// with `NoImage`.
    pub async fn generate_poster(
        &self,
        prompt_text: &str,
        aspect_ratio: AspectRatio,
    ) -> Result<PosterResult, ClientError> {
        require_text("prompt", prompt_text)?;
        let prompt = prompts::POSTER_PROMPT_TEMPLATE.replace("{prompt}", prompt_text);
        let response = self
            .call(IMAGE_MODEL, &prompt, Some(GenerationConfig::image(aspect_ratio)))
            .await?;

        let image = response.inline_image().ok_or(ClientError::NoImage)?;
        Ok(PosterResult {
            image_data: image.data.clone(),
            mime_type: image.mime_type.clone(),
        })
    }

    /// Fills a form using the user's data context, returning the filled text
    /// and the identified field mapping.
    pub async fn fill_form(
        &self,
        form_text: &str,
        user_data_text: &str,
    ) -> Result<FormFillResult, ClientError> {
        require_text("formText", form_text)?;
        require_text("userDataText", user_data_text)?;
        let prompt = prompts::FORM_FILL_PROMPT_TEMPLATE
            .replace("{user_data_text}", user_data_text)
            .replace("{form_text}", form_text);
        self.call_json(
            TEXT_MODEL,
            &prompt,
            GenerationConfig::json_with_schema(schemas::form_fill_response_schema()),
        )
        .await
    }

    /// Makes the single outbound `generateContent` call for one invocation.
    async fn call(
        &self,
        model: &str,
        prompt: &str,
        config: Option<GenerationConfig>,
    ) -> Result<GenerateContentResponse, ClientError> {
        let url = format!("{GEMINI_API_BASE}/{model}:generateContent");
        let request_body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: config,
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Try to parse the structured error message
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let parsed: GenerateContentResponse =
            serde_json::from_str(&body).map_err(ClientError::Parse)?;

        if let Some(usage) = &parsed.usage_metadata {
            debug!(
                "Gemini call succeeded: model={}, prompt_tokens={:?}, candidate_tokens={:?}",
                model, usage.prompt_token_count, usage.candidates_token_count
            );
        }

        Ok(parsed)
    }

    /// Convenience method that calls the model in schema-constrained JSON mode
    /// and deserializes the reply text into `T`.
    async fn call_json<T: DeserializeOwned>(
        &self,
        model: &str,
        prompt: &str,
        config: GenerationConfig,
    ) -> Result<T, ClientError> {
        let response = self.call(model, prompt, Some(config)).await?;

        let text = response.text().ok_or(ClientError::EmptyContent)?;

        // Strip markdown code fences if the model wraps JSON in them
        let text = strip_json_fences(text);

        serde_json::from_str(text).map_err(ClientError::Parse)
    }
}

#[async_trait]
impl GenerationClient for GeminiClient {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResult, ClientError> {
        match request {
            GenerationRequest::Resume { profile_text } => Ok(GenerationResult::Resume(
                self.generate_resume(&profile_text).await?,
            )),
            GenerationRequest::Poster {
                prompt,
                aspect_ratio,
            } => Ok(GenerationResult::Poster(
                self.generate_poster(&prompt, aspect_ratio).await?,
            )),
            GenerationRequest::FormFill {
                form_text,
                user_data_text,
            } => Ok(GenerationResult::FormFill(
                self.fill_form(&form_text, &user_data_text).await?,
            )),
        }
    }
}

fn require_text(field: &str, value: &str) -> Result<(), ClientError> {
    if value.trim().is_empty() {
        return Err(ClientError::InvalidInput(format!(
            "{field} cannot be empty"
        )));
    }
    Ok(())
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_require_text_rejects_whitespace_only() {
        assert!(require_text("prompt", "  \n ").is_err());
        assert!(require_text("prompt", "a poster").is_ok());
    }

    #[test]
    fn test_response_text_reads_first_text_part() {
        let json = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "{\"filledText\": \"x\"}"}]}}
            ]
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.text(), Some("{\"filledText\": \"x\"}"));
        assert!(response.inline_image().is_none());
    }

    #[test]
    fn test_response_inline_image_skips_leading_text_parts() {
        let json = r#"{
            "candidates": [
                {"content": {"parts": [
                    {"text": "Here is your poster."},
                    {"inlineData": {"mimeType": "image/png", "data": "aGVsbG8="}}
                ]}}
            ]
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        let image = response.inline_image().expect("inline image part");
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.data, "aGVsbG8=");
    }

    #[test]
    fn test_response_without_candidates_has_no_content() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(response.text().is_none());
        assert!(response.inline_image().is_none());
    }

    #[test]
    fn test_inline_data_mime_type_defaults_to_png() {
        let json = r#"{"data": "aGVsbG8="}"#;
        let inline: InlineData = serde_json::from_str(json).unwrap();
        assert_eq!(inline.mime_type, "image/png");
    }

    #[test]
    fn test_image_config_serializes_camel_case() {
        let config = GenerationConfig::image(AspectRatio::Portrait);
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["imageConfig"]["aspectRatio"], "9:16");
        assert_eq!(json["imageConfig"]["imageSize"], "1K");
        assert!(json.get("responseMimeType").is_none());
    }

    #[test]
    fn test_json_config_carries_schema_and_mime_type() {
        let config = GenerationConfig::json_with_schema(schemas::resume_response_schema());
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["responseMimeType"], "application/json");
        assert_eq!(json["responseSchema"]["type"], "OBJECT");
    }
}
