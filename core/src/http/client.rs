use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use log::{debug, warn};
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONNECTION, COOKIE, USER_AGENT,
};
use reqwest::redirect::Policy;
use reqwest::{Client, ClientBuilder, Method};
use std::time::Duration;
use url::Url;

use super::{resolve_url, ProbeResponse};
use crate::error::ProbeError;
use crate::{ScanConfig, Target};

pub const DEFAULT_USER_AGENT: &str = "vulnprobe/0.3 (web vulnerability scanner)";

/// Decides whether certificate verification may be switched off.
///
/// Consulted once, when the prober is built, and only if the configuration
/// asks for it.
pub trait InsecureTlsApproval: Send + Sync {
    fn approve_insecure_tls(&self) -> bool;
}

impl<F> InsecureTlsApproval for F
where
    F: Fn() -> bool + Send + Sync,
{
    fn approve_insecure_tls(&self) -> bool {
        self()
    }
}

pub struct DenyInsecureTls;

impl InsecureTlsApproval for DenyInsecureTls {
    fn approve_insecure_tls(&self) -> bool {
        false
    }
}

pub struct AllowInsecureTls;

impl InsecureTlsApproval for AllowInsecureTls {
    fn approve_insecure_tls(&self) -> bool {
        true
    }
}

/// Issues single requests against a target, one response at a time.
pub struct Prober {
    inner: Client,
    /// Same settings as `inner` but hands 3xx responses back unfollowed.
    no_follow: Client,
    max_redirects: usize,
    accepts_invalid_certs: bool,
}

impl Prober {
    pub fn new(config: &ScanConfig, approval: &dyn InsecureTlsApproval) -> Result<Self, reqwest::Error> {
        let accepts_invalid_certs = config.ignore_tls_errors && approval.approve_insecure_tls();
        if config.ignore_tls_errors && !accepts_invalid_certs {
            warn!("Insecure TLS was not approved, keeping certificate verification enabled");
        }

        let max_redirects = config.max_redirects;
        let redirect_policy = Policy::custom(move |attempt| {
            if attempt.previous().len() > max_redirects {
                attempt.error(format!("stopped after {} redirects", max_redirects))
            } else {
                attempt.follow()
            }
        });

        let inner = client_builder(config, accepts_invalid_certs)
            .redirect(redirect_policy)
            .build()?;
        let no_follow = client_builder(config, accepts_invalid_certs)
            .redirect(Policy::none())
            .build()?;

        Ok(Self {
            inner,
            no_follow,
            max_redirects,
            accepts_invalid_certs,
        })
    }

    pub fn accepts_invalid_certs(&self) -> bool {
        self.accepts_invalid_certs
    }

    /// Sends one request and reads the whole body.
    ///
    /// `path` may be empty (the target URL), an absolute `http(s)` URL, or a
    /// path joined onto the target URL.
    pub async fn send(
        &self,
        target: &Target,
        method: Method,
        path: &str,
        extra_headers: &[(&str, &str)],
        body: Option<String>,
    ) -> Result<ProbeResponse, ProbeError> {
        self.dispatch(&self.inner, target, method, path, extra_headers, body)
            .await
    }

    /// Like [`Prober::send`], but a redirect is returned as the response
    /// itself, with its status and `Location` header intact.
    pub async fn send_without_redirects(
        &self,
        target: &Target,
        method: Method,
        path: &str,
        extra_headers: &[(&str, &str)],
        body: Option<String>,
    ) -> Result<ProbeResponse, ProbeError> {
        self.dispatch(&self.no_follow, target, method, path, extra_headers, body)
            .await
    }

    async fn dispatch(
        &self,
        client: &Client,
        target: &Target,
        method: Method,
        path: &str,
        extra_headers: &[(&str, &str)],
        body: Option<String>,
    ) -> Result<ProbeResponse, ProbeError> {
        let resolved = resolve_url(&target.url, path);
        let url = Url::parse(&resolved).map_err(|_| ProbeError::InvalidUrl(resolved.clone()))?;

        let headers = build_headers(target, extra_headers);

        debug!("{} {}", method, url);

        let mut builder = client.request(method, url).headers(headers);
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| self.classify(e))?;
        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let headers = response.headers().clone();
        let body = response.text().await.map_err(|e| self.classify(e))?;

        Ok(ProbeResponse {
            url: final_url,
            status,
            headers,
            body,
        })
    }

    fn classify(&self, err: reqwest::Error) -> ProbeError {
        if err.is_redirect() {
            ProbeError::TooManyRedirects(self.max_redirects)
        } else if err.is_timeout() {
            ProbeError::Timeout
        } else {
            ProbeError::Transport(err)
        }
    }
}

/// Settings shared by both clients. A timeout of 0 means none.
fn client_builder(config: &ScanConfig, accepts_invalid_certs: bool) -> ClientBuilder {
    let mut builder = ClientBuilder::new()
        .min_tls_version(reqwest::tls::Version::TLS_1_2)
        .danger_accept_invalid_certs(accepts_invalid_certs)
        .pool_max_idle_per_host(30)
        .pool_idle_timeout(Duration::from_secs(30));
    if config.timeout > 0 {
        builder = builder.timeout(Duration::from_secs(config.timeout));
    }
    builder
}

/// Merges defaults < target headers < per-call overrides, then cookies and basic auth.
fn build_headers(target: &Target, extra_headers: &[(&str, &str)]) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(CONNECTION, HeaderValue::from_static("close"));

    for (key, val) in &target.headers {
        insert_header(&mut headers, key, val);
    }
    for (key, val) in extra_headers {
        insert_header(&mut headers, key, val);
    }

    let cookies: Vec<&str> = target
        .cookies
        .iter()
        .map(|c| c.as_str())
        .filter(|c| c.contains('='))
        .collect();
    if !cookies.is_empty() {
        let mut cookie_line = cookies.join("; ");
        if let Some(existing) = headers.get(COOKIE).and_then(|v| v.to_str().ok()) {
            cookie_line = format!("{}; {}", existing, cookie_line);
        }
        insert_header(&mut headers, COOKIE.as_str(), &cookie_line);
    }

    if let Some(auth) = target.basic_auth.as_ref().filter(|a| !a.username.is_empty()) {
        let token = STANDARD.encode(format!("{}:{}", auth.username, auth.password));
        if let Ok(mut value) = HeaderValue::from_str(&format!("Basic {}", token)) {
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
    }

    headers
}

fn insert_header(headers: &mut HeaderMap, key: &str, val: &str) {
    match (
        HeaderName::from_bytes(key.as_bytes()),
        HeaderValue::from_str(val),
    ) {
        (Ok(name), Ok(value)) => {
            headers.insert(name, value);
        }
        _ => warn!("Skipping invalid header '{}'", key),
    }
}
