use crate::error::Result;
use async_trait::async_trait;

/// Single-method capability over a text-generation provider.
///
/// The report synthesizer only ever depends on this trait, never on a
/// concrete client, so tests can substitute deterministic canned output.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Provider name, e.g. `gemini`.
    fn provider(&self) -> &str;

    /// Model identifier the provider is pinned to.
    fn model_name(&self) -> &str;

    /// Run one completion for `prompt` and return its plain text.
    ///
    /// One call, one answer: no retries, no streaming, no partial output.
    async fn complete(&self, prompt: &str) -> Result<String>;
}
