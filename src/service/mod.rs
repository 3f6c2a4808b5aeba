//! Structured extraction through a text-generation service.

use thiserror::Error;

pub mod cache;
pub mod extractor;
pub mod ollama;
pub mod prompt;
pub mod recover;

pub use cache::ExtractionCache;
pub use extractor::Extractor;
pub use ollama::OllamaClient;

/// Failures that halt extraction. A malformed answer is not one of them; it
/// is recovered as a fallback record instead.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("extraction service returned status {status}")]
    Status { status: u16 },

    #[error("request to extraction service at {endpoint} failed")]
    Transport {
        endpoint: String,
        #[source]
        source: ureq::Error,
    },

    #[error("failed to read extraction service stream")]
    Read(#[from] std::io::Error),

    #[error("malformed stream chunk: {line}")]
    Chunk {
        line: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A text-generation backend that streams its answer as fragments.
///
/// Fragments are handed to `on_fragment` in arrival order as they come in;
/// the return value is their concatenation.
pub trait Generator {
    fn generate(
        &self,
        prompt: &str,
        on_fragment: &mut dyn FnMut(&str),
    ) -> Result<String, ServiceError>;
}

impl<G: Generator + ?Sized> Generator for &G {
    fn generate(
        &self,
        prompt: &str,
        on_fragment: &mut dyn FnMut(&str),
    ) -> Result<String, ServiceError> {
        (**self).generate(prompt, on_fragment)
    }
}
