//! scout-classifier — client for the external bird classification service.
//!
//! The service takes a `multipart/form-data` upload with a single `file`
//! part and answers `{species, confidence}`. Which deployment is used is a
//! configuration choice ([`Upstream`]); callers only see [`Classifier`].

use std::str::FromStr;
use std::time::Instant;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use scout_common::{ClassificationResult, ImageUpload};
use thiserror::Error;

pub const LOCAL_DEV_URL: &str = "http://127.0.0.1:8000/predict";
pub const HOSTED_URL: &str = "https://bird-identifier-iqjp.onrender.com";

#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Classification service returned {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("Invalid classifier upstream {0:?}: expected `local`, `hosted` or an http(s) URL")]
    InvalidUpstream(String),
}

/// Where classification requests are sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Upstream {
    /// Model server running next to the service during development.
    LocalDev,
    /// The public hosted deployment.
    Hosted,
    Custom(String),
}

impl Upstream {
    pub fn url(&self) -> &str {
        match self {
            Upstream::LocalDev => LOCAL_DEV_URL,
            Upstream::Hosted => HOSTED_URL,
            Upstream::Custom(url) => url.as_str(),
        }
    }
}

impl FromStr for Upstream {
    type Err = ClassifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "local" | "local-dev" | "dev" => return Ok(Upstream::LocalDev),
            "hosted" => return Ok(Upstream::Hosted),
            _ => {}
        }
        match reqwest::Url::parse(s) {
            Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {
                Ok(Upstream::Custom(s.to_string()))
            }
            _ => Err(ClassifyError::InvalidUpstream(s.to_string())),
        }
    }
}

#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, upload: ImageUpload) -> Result<ClassificationResult, ClassifyError>;
    fn endpoint(&self) -> &str;
}

/// Posts uploads to the classification service over HTTP.
pub struct HttpClassifier {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpClassifier {
    pub fn new(upstream: &Upstream) -> Self {
        Self { endpoint: upstream.url().to_string(), client: reqwest::Client::new() }
    }
}

#[async_trait]
impl Classifier for HttpClassifier {
    async fn classify(&self, upload: ImageUpload) -> Result<ClassificationResult, ClassifyError> {
        let started = Instant::now();
        let (file_name, content_type, bytes) = upload.into_parts();
        let size = bytes.len();

        let part = Part::bytes(bytes).file_name(file_name).mime_str(&content_type)?;
        let form = Form::new().part("file", part);

        let resp = self.client.post(&self.endpoint).multipart(form).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClassifyError::Upstream { status: status.as_u16(), body });
        }
        let result: ClassificationResult = resp.json().await?;

        tracing::info!(
            endpoint = %self.endpoint,
            bytes = size,
            species = %result.species,
            latency_ms = started.elapsed().as_millis() as u64,
            "image classified"
        );
        Ok(result)
    }

    fn endpoint(&self) -> &str { &self.endpoint }
}
