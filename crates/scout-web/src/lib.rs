//! scout-web — HTTP front for bird identification.
//! Provides:
//!   - POST /api/classify  image upload, proxied to the classification service
//!   - POST /api/describe  one-sentence species description via a chat-completion API
//!   - GET  /health        liveness and upstream summary
//!   - optional static front-end served at `/`

pub mod error;
pub mod router;
pub mod handlers;
pub mod state;
