//! scout-common — Shared domain types used across all Scout crates.

pub mod species;
pub mod upload;

// Re-export commonly used types
pub use species::{ClassificationResult, Confidence, ConfidenceLabel, Identification};
pub use upload::{ImageUpload, UploadError};
