//! One-sentence species descriptions.

use std::sync::Arc;

use crate::backend::{LlmBackend, LlmError, LlmRequest, Message};

/// Prompt asking for a description of `species`. The name is embedded verbatim.
pub fn description_prompt(species: &str) -> String {
    format!("Give me a short and friendly one-sentence description of the bird species \"{species}\".")
}

/// Sampling parameters sent with every description request.
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptionSettings {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for DescriptionSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4".to_string(),
            max_tokens: 60,
            temperature: 0.7,
        }
    }
}

/// Turns a species name into a short description via a chat-completion backend.
#[derive(Clone)]
pub struct DescriptionService {
    backend: Arc<dyn LlmBackend>,
    settings: DescriptionSettings,
}

impl DescriptionService {
    pub fn new(backend: Arc<dyn LlmBackend>, settings: DescriptionSettings) -> Self {
        Self { backend, settings }
    }

    pub fn settings(&self) -> &DescriptionSettings {
        &self.settings
    }

    /// Single upstream call, no retry. Missing completion text is an empty
    /// description, not an error.
    pub async fn describe(&self, species: &str) -> Result<String, LlmError> {
        let req = LlmRequest {
            messages: vec![Message::user(description_prompt(species))],
            model: Some(self.settings.model.clone()),
            max_tokens: Some(self.settings.max_tokens),
            temperature: Some(self.settings.temperature),
        };
        let resp = self.backend.complete(req).await?;

        tracing::info!(
            model = %resp.model,
            prompt_tokens = resp.prompt_tokens,
            completion_tokens = resp.completion_tokens,
            has_content = resp.content.is_some(),
            "description generated"
        );

        Ok(resp.content.map(|c| c.trim().to_string()).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::LlmResponse;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    struct CannedBackend {
        content: Option<String>,
        seen: Mutex<Vec<LlmRequest>>,
    }

    impl CannedBackend {
        fn new(content: Option<&str>) -> Arc<Self> {
            Arc::new(Self { content: content.map(str::to_string), seen: Mutex::new(Vec::new()) })
        }
    }

    #[async_trait]
    impl LlmBackend for CannedBackend {
        async fn complete(&self, req: LlmRequest) -> Result<LlmResponse, LlmError> {
            self.seen.lock().unwrap().push(req);
            Ok(LlmResponse {
                content: self.content.clone(),
                model: "canned".to_string(),
                prompt_tokens: 0,
                completion_tokens: 0,
            })
        }
        fn model_id(&self) -> &str { "canned" }
    }

    struct FailingBackend;

    #[async_trait]
    impl LlmBackend for FailingBackend {
        async fn complete(&self, _req: LlmRequest) -> Result<LlmResponse, LlmError> {
            Err(LlmError::ApiError { status: 401, message: "Incorrect API key provided".into() })
        }
        fn model_id(&self) -> &str { "failing" }
    }

    #[test]
    fn test_prompt_embeds_species_verbatim() {
        assert_eq!(
            description_prompt("Blue Jay"),
            "Give me a short and friendly one-sentence description of the bird species \"Blue Jay\"."
        );
        let odd = "017.Blue_Jay \"quoted\" ü";
        assert!(description_prompt(odd).contains(odd));
    }

    #[tokio::test]
    async fn test_describe_sends_fixed_parameters() {
        let backend = CannedBackend::new(Some("  A bold, noisy corvid.\n"));
        let service = DescriptionService::new(backend.clone(), DescriptionSettings::default());

        let text = service.describe("Blue Jay").await.unwrap();
        assert_eq!(text, "A bold, noisy corvid.");

        let seen = backend.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let req = &seen[0];
        assert_eq!(req.model.as_deref(), Some("gpt-4"));
        assert_eq!(req.max_tokens, Some(60));
        assert_eq!(req.temperature, Some(0.7));
        assert_eq!(req.messages, vec![Message::user(description_prompt("Blue Jay"))]);
    }

    #[tokio::test]
    async fn test_missing_content_is_empty_description() {
        let service = DescriptionService::new(CannedBackend::new(None), DescriptionSettings::default());
        assert_eq!(service.describe("Blue Jay").await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_backend_error_propagates() {
        let service = DescriptionService::new(Arc::new(FailingBackend), DescriptionSettings::default());
        let err = service.describe("Blue Jay").await.unwrap_err();
        assert!(matches!(err, LlmError::ApiError { status: 401, .. }));
    }
}
