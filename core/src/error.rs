use thiserror::Error;

/// Errors that abort a scan before any module runs.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("invalid target URL '{url}': {reason}")]
    InvalidTarget { url: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Errors from a single probe. Modules log and skip these.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("invalid request URL '{0}'")]
    InvalidUrl(String),

    #[error("stopped after {0} redirects")]
    TooManyRedirects(usize),

    #[error("request timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),
}
