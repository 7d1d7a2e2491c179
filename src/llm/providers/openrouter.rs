use crate::config::{
    BACKEND_MAX_TOKENS, EXPLANATION_SYSTEM_PROMPT, EXPLANATION_TEMPERATURE, OPENROUTER_CHAT_URL,
    TRANSLATION_SYSTEM_PROMPT, TRANSLATION_TEMPERATURE,
};
use crate::llm::http_utils::{create_http_client, extract_message_content, send_json_request};
use crate::llm::{LlmError, TranslationBackend};
use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde_json::{json, Value};
use tracing::debug;

/// Translation backend implementation for `OpenRouter`
pub struct OpenRouterProvider {
    http_client: HttpClient,
    api_key: String,
    model_id: String,
    site_url: String,
    site_name: String,
}

impl OpenRouterProvider {
    /// Create a new `OpenRouter` provider instance
    #[must_use]
    pub fn new(api_key: String, model_id: String, site_url: String, site_name: String) -> Self {
        Self {
            http_client: create_http_client(),
            api_key,
            model_id,
            site_url,
            site_name,
        }
    }

    /// Build a provider from settings.
    ///
    /// # Errors
    ///
    /// Returns `LlmError::MissingConfig` when no API key is configured.
    pub fn from_settings(settings: &crate::config::Settings) -> Result<Self, LlmError> {
        let api_key = settings
            .openrouter_api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| LlmError::MissingConfig("openrouter".to_string()))?;

        Ok(Self::new(
            api_key,
            settings.openrouter_model.clone(),
            settings.openrouter_site_url.clone(),
            settings.openrouter_site_name.clone(),
        ))
    }

    fn build_body(&self, system_prompt: &str, user_message: &str, temperature: f32) -> Value {
        json!({
            "model": self.model_id,
            "messages": [
                {"role": "system", "content": system_prompt},
                {"role": "user", "content": user_message}
            ],
            "max_tokens": BACKEND_MAX_TOKENS,
            "temperature": temperature
        })
    }

    async fn complete(
        &self,
        system_prompt: &str,
        user_message: &str,
        temperature: f32,
    ) -> Result<String, LlmError> {
        let body = self.build_body(system_prompt, user_message, temperature);

        let mut extra_headers = Vec::new();
        if !self.site_url.is_empty() {
            extra_headers.push(("HTTP-Referer", self.site_url.as_str()));
        }
        if !self.site_name.is_empty() {
            extra_headers.push(("X-Title", self.site_name.as_str()));
        }

        debug!(model = %self.model_id, chars = user_message.chars().count(), "OpenRouter request");

        let auth = format!("Bearer {}", self.api_key);
        let res_json = send_json_request(
            &self.http_client,
            OPENROUTER_CHAT_URL,
            &body,
            Some(&auth),
            &extra_headers,
        )
        .await?;

        extract_message_content(&res_json)
    }
}

#[async_trait]
impl TranslationBackend for OpenRouterProvider {
    async fn translate(&self, text: &str) -> Result<String, LlmError> {
        self.complete(TRANSLATION_SYSTEM_PROMPT, text, TRANSLATION_TEMPERATURE)
            .await
    }

    async fn explain(&self, text: &str) -> Result<String, LlmError> {
        self.complete(EXPLANATION_SYSTEM_PROMPT, text, EXPLANATION_TEMPERATURE)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_carries_model_and_prompts() {
        let provider = OpenRouterProvider::new(
            "key".to_string(),
            "test/model".to_string(),
            String::new(),
            String::new(),
        );
        let body = provider.build_body(TRANSLATION_SYSTEM_PROMPT, "hello", 0.3);

        assert_eq!(body["model"], "test/model");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "hello");
        assert_eq!(body["max_tokens"], BACKEND_MAX_TOKENS);
    }
}
