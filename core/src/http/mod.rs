pub mod client;

pub use client::{AllowInsecureTls, DenyInsecureTls, InsecureTlsApproval, Prober};

use reqwest::header::HeaderMap;

/// A fully read HTTP response.
#[derive(Debug, Clone)]
pub struct ProbeResponse {
    /// Final URL after redirects.
    pub url: String,
    pub status: u16,
    pub headers: HeaderMap,
    pub body: String,
}

impl ProbeResponse {
    /// Header value as text; `None` when absent or not valid visible ASCII.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn has_header(&self, name: &str) -> bool {
        self.headers.contains_key(name)
    }
}

/// Resolves a probe path against the target URL.
///
/// Absolute `http(s)://` URLs pass through untouched, an empty path yields the
/// target itself, and anything else is appended with exactly one `/` between.
pub fn resolve_url(base: &str, path: &str) -> String {
    if path.is_empty() {
        return base.to_string();
    }

    let lower = path.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return path.to_string();
    }

    match (base.ends_with('/'), path.starts_with('/')) {
        (true, true) => format!("{}{}", base, &path[1..]),
        (false, false) => format!("{}/{}", base, path),
        _ => format!("{}{}", base, path),
    }
}
