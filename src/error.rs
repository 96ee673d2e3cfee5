use thiserror::Error;

/// Failure of a single request to the statistics service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Transport failure or non-success HTTP status.
    #[error("network error for {url}: {message}")]
    Network { url: String, message: String },
    /// The body did not have the `[meta, records]` shape.
    #[error("unexpected response from {url}: {message}")]
    Decode { url: String, message: String },
    /// The service answered with an error payload instead of data.
    #[error("world bank api error: {0}")]
    Service(String),
}

impl ApiError {
    pub(crate) fn network(url: &str, message: impl std::fmt::Display) -> Self {
        ApiError::Network {
            url: url.to_string(),
            message: message.to_string(),
        }
    }

    pub(crate) fn decode(url: &str, message: impl std::fmt::Display) -> Self {
        ApiError::Decode {
            url: url.to_string(),
            message: message.to_string(),
        }
    }
}
