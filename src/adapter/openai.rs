//! OpenAI-backed transcript adapter.

use super::TranscriptAdapter;
use crate::config::{AdapterSettings, Prompts};
use crate::error::{RagPrepError, Result};
use crate::transcript::{current_date_string, TranscriptMeta};
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use async_openai::Client;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

/// Transcript adapter backed by the OpenAI chat completions API.
pub struct OpenAiAdapter {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
    max_retries: u32,
    prompts: Prompts,
}

impl OpenAiAdapter {
    /// Create an adapter from settings. The HTTP client carries the per-call
    /// timeout so a hung API call fails the job instead of stalling a worker.
    pub fn new(settings: &AdapterSettings, prompts: Prompts) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        let client = Client::with_config(OpenAIConfig::default()).with_http_client(http_client);

        Ok(Self {
            client,
            model: settings.model.clone(),
            temperature: settings.temperature,
            max_retries: settings.max_retries.max(1),
            prompts,
        })
    }

    fn build_user_prompt(&self, raw_text: &str, filename: &str, meta: &TranscriptMeta) -> String {
        let mut vars = HashMap::new();
        vars.insert("title".to_string(), meta.title.clone());
        vars.insert("event_date".to_string(), meta.event_date.clone());
        vars.insert("current_date".to_string(), current_date_string());
        vars.insert("filename".to_string(), filename.to_string());
        vars.insert("transcript".to_string(), raw_text.to_string());

        self.prompts
            .render_with_custom(&self.prompts.structure.user, &vars)
    }

    async fn complete(&self, user_prompt: String) -> Result<String> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(self.prompts.structure.system.clone())
                .build()
                .map_err(|e| RagPrepError::Adapter(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user_prompt)
                .build()
                .map_err(|e| RagPrepError::Adapter(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(self.temperature)
            .build()
            .map_err(|e| RagPrepError::Adapter(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| RagPrepError::Adapter(e.to_string()))?;

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| RagPrepError::Adapter("Empty response from LLM".to_string()))?
            .clone();

        if content.trim().is_empty() {
            return Err(RagPrepError::Adapter(
                "LLM returned a blank document".to_string(),
            ));
        }

        Ok(content)
    }
}

fn is_rate_limit(err: &RagPrepError) -> bool {
    let msg = err.to_string().to_lowercase();
    msg.contains("429") || msg.contains("quota") || msg.contains("rate limit")
}

#[async_trait]
impl TranscriptAdapter for OpenAiAdapter {
    async fn adapt(
        &self,
        raw_text: &str,
        filename: &str,
        meta: &TranscriptMeta,
    ) -> Result<String> {
        let user_prompt = self.build_user_prompt(raw_text, filename, meta);

        let mut last_err = None;
        for attempt in 1..=self.max_retries {
            match self.complete(user_prompt.clone()).await {
                Ok(document) => {
                    debug!("Adapter produced {} bytes for {}", document.len(), filename);
                    return Ok(document);
                }
                Err(e) if is_rate_limit(&e) && attempt < self.max_retries => {
                    let wait = Duration::from_secs(attempt as u64 * 5);
                    warn!(
                        "Rate limited on {} (attempt {}/{}), waiting {:?}",
                        filename, attempt, self.max_retries, wait
                    );
                    tokio::time::sleep(wait).await;
                    last_err = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_err
            .unwrap_or_else(|| RagPrepError::Adapter("exhausted retry budget".to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_detection_matches_api_phrasing() {
        assert!(is_rate_limit(&RagPrepError::Adapter(
            "status 429 Too Many Requests".to_string()
        )));
        assert!(is_rate_limit(&RagPrepError::Adapter(
            "You exceeded your current quota".to_string()
        )));
        assert!(!is_rate_limit(&RagPrepError::Adapter(
            "invalid api key".to_string()
        )));
    }

    #[test]
    fn user_prompt_interpolates_metadata() {
        let adapter = OpenAiAdapter::new(&AdapterSettings::default(), Prompts::default()).unwrap();
        let meta = TranscriptMeta {
            title: "MasterMind Janeiro 2026".to_string(),
            event_date: "Janeiro de 2026".to_string(),
        };
        let prompt = adapter.build_user_prompt("the transcript body", "live.txt", &meta);
        assert!(prompt.contains("MasterMind Janeiro 2026"));
        assert!(prompt.contains("live.txt"));
        assert!(prompt.contains("the transcript body"));
        assert!(!prompt.contains("{{"));
    }
}
