use crate::error::{AiError, Result};
use crate::generator::TextGenerator;
use crate::models::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part};
use async_trait::async_trait;
use reqwest::Client;

const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Google Gemini provider, pinned to one model.
#[derive(Clone)]
pub struct GeminiProvider {
    api_key: String,
    model: String,
    base_url: String,
    client: Client,
    max_output_tokens: Option<u32>,
}

impl GeminiProvider {
    pub fn new(
        api_key: String,
        model: Option<String>,
        base_url: Option<String>,
        timeout_secs: Option<u64>,
        max_output_tokens: Option<u32>,
    ) -> Result<Self> {
        let timeout = timeout_secs.unwrap_or(120);
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(timeout))
            .build()?;

        Ok(Self {
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            client,
            max_output_tokens,
        })
    }

    /// A key is unusable when it is absent or still the sample value from the
    /// config template.
    fn is_placeholder_key(key: &str) -> bool {
        key.trim().is_empty() || key.starts_with("your_")
    }
}

#[async_trait]
impl TextGenerator for GeminiProvider {
    fn provider(&self) -> &str {
        "gemini"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        // fail fast, before any network call
        if Self::is_placeholder_key(&self.api_key) {
            return Err(AiError::Configuration(
                "Gemini API key is missing or a placeholder; set [ai].api_key in the server config"
                    .to_string(),
            ));
        }

        let req = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
                role: Some("user".to_string()),
            }],
            generation_config: self.max_output_tokens.map(|max| GenerationConfig {
                max_output_tokens: Some(max),
                temperature: None,
            }),
        };

        tracing::debug!(
            model = %self.model,
            prompt_length = prompt.len(),
            "Calling Gemini API"
        );

        let resp = self
            .client
            .post(format!(
                "{}/models/{}:generateContent",
                self.base_url, self.model
            ))
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&req)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            tracing::error!(
                status = %status,
                body = %body,
                "Gemini API request failed"
            );
            return Err(AiError::Api {
                service: "gemini".to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let completion: GenerateContentResponse = resp.json().await?;

        completion.first_text().ok_or(AiError::EmptyCompletion)
    }
}
