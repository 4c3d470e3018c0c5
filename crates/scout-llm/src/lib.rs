//! scout-llm — chat-completion backend abstraction and the species
//! description service built on it.

pub mod backend;
pub mod describe;

pub use backend::{LlmBackend, LlmError, LlmRequest, LlmResponse, Message, OpenAiBackend};
pub use describe::{description_prompt, DescriptionService, DescriptionSettings};
