/// Errors from the AI provider layer.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("Provider API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// A 2xx response that did not contain the expected payload.
    #[error("Provider returned no {0}")]
    EmptyResponse(&'static str),
}

impl ProviderError {
    /// Whether another attempt might succeed: transport failures, rate
    /// limiting and server-side errors. Client errors such as a rejected
    /// prompt are final.
    pub fn is_retryable(&self) -> bool {
        match self {
            ProviderError::Request(_) => true,
            ProviderError::Api { status, .. } => *status == 429 || *status >= 500,
            ProviderError::EmptyResponse(_) => false,
        }
    }
}
