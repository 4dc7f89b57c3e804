use crate::config::AiConfig;
use crate::error::{BudgetError, Result};
use crate::llm::types::*;
use log::{debug, warn};
use reqwest::Client;

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        let defaults = AiConfig::default();
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: defaults.base_url,
            model: defaults.model,
        }
    }

    /// `None` when no API key is configured; AI features stay off for the whole process.
    pub fn from_config(config: &AiConfig) -> Option<Self> {
        match &config.api_key {
            Some(api_key) => Some(Self {
                client: Client::new(),
                api_key: api_key.clone(),
                base_url: config.base_url.trim_end_matches('/').to_string(),
                model: config.model.clone(),
            }),
            None => {
                warn!("No Gemini API key configured; AI features are disabled");
                None
            }
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// One `generateContent` call constrained to JSON output.
    ///
    /// `Ok(None)` means the model answered without any text (no candidates, or a blocked one).
    /// The key travels in a header so it never shows up in a URL.
    pub(crate) async fn generate_content(
        &self,
        system_prompt: Option<&str>,
        prompt: &str,
        response_schema: serde_json::Value,
    ) -> Result<Option<String>> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        let payload = GenerateContentRequest {
            contents: vec![Content::user(prompt)],
            system_instruction: system_prompt.map(Content::system),
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: Some(response_schema),
            },
        };

        debug!("Calling Gemini model {}", self.model);
        let res = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&payload)
            .send()
            .await?;
        let status = res.status();

        if !status.is_success() {
            let err_text = res.text().await?;
            return Err(BudgetError::AiRequestFailed(format!(
                "Gemini API Error (status {}): {}",
                status, err_text
            )));
        }

        let body: GenerateContentResponse = res.json().await?;
        Ok(body.text())
    }
}
