//! Shared application state for the web server.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use scout_classifier::{Classifier, HttpClassifier, Upstream};
use scout_config::Config;
use scout_llm::{DescriptionService, DescriptionSettings, OpenAiBackend};
use secrecy::{ExposeSecret, SecretString};

/// Shared state injected into every Axum handler.
#[derive(Clone)]
pub struct AppState {
    pub describer: DescriptionService,
    pub classifier: Arc<dyn Classifier>,
    /// Largest accepted image, in bytes.
    pub max_upload_bytes: usize,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(
        describer: DescriptionService,
        classifier: Arc<dyn Classifier>,
        max_upload_bytes: usize,
    ) -> Self {
        Self { describer, classifier, max_upload_bytes, started_at: Utc::now() }
    }

    /// Wire the upstream clients from validated configuration.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let api_key = SecretString::from(config.api_key()?.expose_secret().to_owned());
        let mut backend = OpenAiBackend::new(api_key, config.llm.model.clone())
            .with_base_url(config.llm.base_url.clone());
        if let Some(secs) = config.llm.timeout_secs {
            backend = backend.with_timeout(Duration::from_secs(secs))?;
        }

        let describer = DescriptionService::new(
            Arc::new(backend),
            DescriptionSettings {
                model: config.llm.model.clone(),
                max_tokens: config.llm.max_tokens,
                temperature: config.llm.temperature,
            },
        );

        let upstream: Upstream = config.classifier.upstream.parse()?;
        let classifier = Arc::new(HttpClassifier::new(&upstream));

        tracing::info!(
            llm_base_url = %config.llm.base_url,
            llm_model = %config.llm.model,
            classifier = %upstream.url(),
            "upstreams configured"
        );

        Ok(Self::new(describer, classifier, config.server.max_upload_bytes))
    }
}

pub type SharedState = Arc<AppState>;
