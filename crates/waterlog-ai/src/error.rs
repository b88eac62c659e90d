/// Errors from the text-generation boundary.
///
/// `Configuration` is raised before any network I/O happens, so an operator
/// can tell a missing credential apart from a provider outage.
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    /// Provider credential is absent or still a placeholder value.
    #[error("AI: provider is not configured: {0}")]
    Configuration(String),

    /// The HTTP request to the provider failed.
    #[error("AI: HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider returned a non-success response.
    #[error("AI: API error from {service}: status={status}, body={body}")]
    Api {
        service: String,
        status: u16,
        body: String,
    },

    /// Serializing the request or parsing the response failed.
    #[error("AI: JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The provider answered but produced no usable text.
    #[error("AI: empty completion from provider")]
    EmptyCompletion,
}

/// Convenience `Result` alias for text-generation operations.
pub type Result<T> = std::result::Result<T, AiError>;
