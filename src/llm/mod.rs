//! Text-generation backend seam.
//!
//! The report agent asks a generation backend for its narrative summary. Real
//! backends (hosted LLM endpoints) are external collaborators that may time out
//! or hit quota; the agent always keeps a fixed-text fallback ready. The
//! in-repo `TemplateBackend` is the deterministic stub used in development and
//! tests.

use anyhow::Result;
use async_trait::async_trait;

/// Unified trait for text-generation backends.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate text for `prompt`. May fail (timeout, quota); callers must
    /// have a fixed-text fallback ready.
    async fn generate(&self, prompt: &str, max_tokens: usize, temperature: f64)
        -> Result<String>;

    /// Backend name for logging.
    fn backend_name(&self) -> &'static str;
}

/// Deterministic canned-text backend.
///
/// Produces the same summary for the same prompt, which keeps pipeline runs
/// reproducible in tests and demos.
pub struct TemplateBackend;

#[async_trait]
impl TextGenerator for TemplateBackend {
    async fn generate(
        &self,
        prompt: &str,
        _max_tokens: usize,
        _temperature: f64,
    ) -> Result<String> {
        // The prompt's first line carries the subject (equipment @ plant);
        // echo it so the summary reads like a grounded sentence.
        let subject = prompt.lines().next().unwrap_or_default().trim();
        Ok(format!(
            "Automated diagnostic review of {subject}: visual findings were \
             cross-checked against retrieved maintenance documentation and \
             condensed into the recommended actions below."
        ))
    }

    fn backend_name(&self) -> &'static str {
        "Template"
    }
}
