use axum::{extract::State, Json};
use chrono::Utc;
use serde::Serialize;
use crate::state::SharedState;

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub uptime_secs: i64,
    pub describe_model: String,
    pub classifier_endpoint: String,
}

/// GET /health
pub async fn health(State(state): State<SharedState>) -> Json<Health> {
    Json(Health {
        status: "ok",
        service: "scout",
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: (Utc::now() - state.started_at).num_seconds(),
        describe_model: state.describer.settings().model.clone(),
        classifier_endpoint: state.classifier.endpoint().to_string(),
    })
}
