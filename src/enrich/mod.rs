//! AI enrichment: phonetic spelling, IPA, Chinese transliteration and a hardware-safe caps name
//! for every player name that does not have them yet.
//!
//! Flow per run: collect names missing enrichment across leagues, answer what the global cache
//! already knows, send the rest to the model in small batches, then write each answer to the cache
//! and to every league table carrying that name.

pub mod gemini;
pub mod pipeline;
pub mod prompt;
pub mod response;

use async_trait::async_trait;

use crate::error::AiError;

pub use gemini::GeminiClient;
pub use pipeline::{EnrichReport, EnrichmentPipeline};

/// A text model that answers a prompt with a JSON document (as text).
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn generate_json(&self, prompt: &str) -> Result<String, AiError>;
}
