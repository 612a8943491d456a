use reqwest::StatusCode;

/// Failures at the boundary with a remote vacancy service. All of them are
/// fatal to the operation that hit them; nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("failed to get data from {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with status {status}")]
    Status { url: String, status: StatusCode },

    #[error("failed to decode data from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected response from {url}: missing key \"{key}\"")]
    MissingKey { url: String, key: &'static str },

    #[error("invalid url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("{0} requires an API key")]
    MissingCredentials(&'static str),
}
