pub mod core;
pub mod error;
pub mod http;
pub mod modules;
pub mod payloads;
pub mod utils;

use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

pub use crate::core::engine::ScanEngine;
pub use crate::core::result_aggregator::{Finding, Report, ResultAggregator, ScanResult};
pub use crate::core::{Severity, VulnerabilityType};
pub use crate::error::{ProbeError, ScanError};
pub use crate::http::{AllowInsecureTls, DenyInsecureTls, InsecureTlsApproval, ProbeResponse, Prober};
pub use crate::payloads::{EncodingScheme, Payload, PayloadCatalog};

pub const DEFAULT_PAYLOAD_LEVEL: u8 = 3;
pub const MAX_PAYLOAD_LEVEL: u8 = 5;

/// HTTP method used for plain (unmutated) requests against the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TargetMethod {
    #[default]
    Get,
    Post,
}

impl TargetMethod {
    pub fn as_method(&self) -> reqwest::Method {
        match self {
            TargetMethod::Get => reqwest::Method::GET,
            TargetMethod::Post => reqwest::Method::POST,
        }
    }
}

impl std::str::FromStr for TargetMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(TargetMethod::Get),
            "POST" => Ok(TargetMethod::Post),
            other => Err(format!("unsupported method '{}', expected GET or POST", other)),
        }
    }
}

impl std::fmt::Display for TargetMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_method().as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

/// The endpoint under test. Immutable for the duration of a scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Target {
    pub url: String,
    pub method: TargetMethod,
    pub headers: BTreeMap<String, String>,
    /// Raw `name=value` cookie strings.
    pub cookies: Vec<String>,
    pub basic_auth: Option<BasicAuth>,
}

impl Default for Target {
    fn default() -> Self {
        Self {
            url: String::new(),
            method: TargetMethod::Get,
            headers: BTreeMap::new(),
            cookies: Vec::new(),
            basic_auth: None,
        }
    }
}

impl Target {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_cookie(mut self, raw: impl Into<String>) -> Self {
        self.cookies.push(raw.into());
        self
    }

    pub fn with_basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.basic_auth = Some(BasicAuth {
            username: username.into(),
            password: password.into(),
        });
        self
    }
}

/// Scan configuration shared by the engine and its frontends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScanConfig {
    pub payload_level: u8,
    /// Per-request timeout in seconds, 0 for none.
    pub timeout: u64,
    pub max_redirects: usize,
    pub ignore_tls_errors: bool,
    pub generate_html: bool,
    pub test_all_params: bool,
    pub scan_forms: bool,

    pub enable_xss: bool,
    pub enable_sql_injection: bool,
    pub enable_csrf: bool,
    pub enable_file_inclusion: bool,
    pub enable_misconfiguration: bool,
    pub enable_auth_testing: bool,

    pub login_path: Option<String>,
    pub username_field: String,
    pub password_field: String,
    pub brute_force_test: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            payload_level: DEFAULT_PAYLOAD_LEVEL,
            timeout: 10,
            max_redirects: 5,
            ignore_tls_errors: false,
            generate_html: true,
            test_all_params: true,
            scan_forms: true,

            enable_xss: true,
            enable_sql_injection: true,
            enable_csrf: true,
            enable_file_inclusion: true,
            enable_misconfiguration: true,
            enable_auth_testing: false,

            login_path: None,
            username_field: "username".to_string(),
            password_field: "password".to_string(),
            brute_force_test: false,
        }
    }
}

impl ScanConfig {
    /// Configuration with every class switched off.
    pub fn none_enabled() -> Self {
        let mut config = Self::default();
        for class in VulnerabilityType::ALL {
            config.set_enabled(class, false);
        }
        config
    }

    pub fn is_enabled(&self, class: VulnerabilityType) -> bool {
        match class {
            VulnerabilityType::Xss => self.enable_xss,
            VulnerabilityType::SqlInjection => self.enable_sql_injection,
            VulnerabilityType::FileInclusion => self.enable_file_inclusion,
            VulnerabilityType::Csrf => self.enable_csrf,
            VulnerabilityType::Misconfiguration => self.enable_misconfiguration,
            VulnerabilityType::AuthWeakness => self.enable_auth_testing,
        }
    }

    pub fn set_enabled(&mut self, class: VulnerabilityType, enabled: bool) {
        let flag = match class {
            VulnerabilityType::Xss => &mut self.enable_xss,
            VulnerabilityType::SqlInjection => &mut self.enable_sql_injection,
            VulnerabilityType::FileInclusion => &mut self.enable_file_inclusion,
            VulnerabilityType::Csrf => &mut self.enable_csrf,
            VulnerabilityType::Misconfiguration => &mut self.enable_misconfiguration,
            VulnerabilityType::AuthWeakness => &mut self.enable_auth_testing,
        };
        *flag = enabled;
    }

    pub fn enabled_classes(&self) -> Vec<VulnerabilityType> {
        VulnerabilityType::ALL
            .into_iter()
            .filter(|class| self.is_enabled(*class))
            .collect()
    }

    /// Payload ceiling actually used; out-of-range values fall back to the default level.
    pub fn effective_payload_level(&self) -> u8 {
        if (1..=MAX_PAYLOAD_LEVEL).contains(&self.payload_level) {
            self.payload_level
        } else {
            warn!(
                "Payload level {} outside 1-{}, using {}",
                self.payload_level, MAX_PAYLOAD_LEVEL, DEFAULT_PAYLOAD_LEVEL
            );
            DEFAULT_PAYLOAD_LEVEL
        }
    }

    pub fn login_path_ref(&self) -> Option<&str> {
        self.login_path.as_deref().filter(|p| !p.trim().is_empty())
    }
}

/// Progress notifications emitted by the engine.
/// The CLI renders these on the terminal; the core never does.
pub trait ScanEventSink: Send + Sync {
    fn on_module_started(&self, class: VulnerabilityType);
    fn on_module_finished(&self, class: VulnerabilityType, findings: usize);
}

pub type SinkRef = Arc<dyn ScanEventSink>;

/// Sink that discards every event.
pub struct NullSink;

impl NullSink {
    pub fn new_ref() -> SinkRef {
        Arc::new(Self)
    }
}

impl ScanEventSink for NullSink {
    fn on_module_started(&self, _class: VulnerabilityType) {}
    fn on_module_finished(&self, _class: VulnerabilityType, _findings: usize) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ScanConfig::default();
        assert_eq!(config.payload_level, 3);
        assert_eq!(config.timeout, 10);
        assert_eq!(config.max_redirects, 5);
        assert!(!config.ignore_tls_errors);
        assert!(config.generate_html);
        assert!(config.scan_forms);
        assert!(config.test_all_params);
        assert_eq!(
            config.enabled_classes(),
            vec![
                VulnerabilityType::Xss,
                VulnerabilityType::SqlInjection,
                VulnerabilityType::FileInclusion,
                VulnerabilityType::Csrf,
                VulnerabilityType::Misconfiguration,
            ]
        );
    }

    #[test]
    fn test_partial_json_config_keeps_defaults() {
        let config: ScanConfig =
            serde_json::from_str(r#"{"payloadLevel":5,"enableAuthTesting":true,"loginPath":"/login"}"#)
                .unwrap();
        assert_eq!(config.payload_level, 5);
        assert!(config.enable_auth_testing);
        assert_eq!(config.login_path_ref(), Some("/login"));
        assert_eq!(config.timeout, 10);
        assert_eq!(config.username_field, "username");
    }

    #[test]
    fn test_effective_payload_level_clamps() {
        let mut config = ScanConfig::default();
        config.payload_level = 0;
        assert_eq!(config.effective_payload_level(), DEFAULT_PAYLOAD_LEVEL);
        config.payload_level = 9;
        assert_eq!(config.effective_payload_level(), DEFAULT_PAYLOAD_LEVEL);
        config.payload_level = 5;
        assert_eq!(config.effective_payload_level(), 5);
    }

    #[test]
    fn test_none_enabled() {
        let mut config = ScanConfig::none_enabled();
        assert!(config.enabled_classes().is_empty());
        config.set_enabled(VulnerabilityType::Csrf, true);
        assert_eq!(config.enabled_classes(), vec![VulnerabilityType::Csrf]);
    }

    #[test]
    fn test_blank_login_path_is_ignored() {
        let mut config = ScanConfig::default();
        config.login_path = Some("  ".to_string());
        assert_eq!(config.login_path_ref(), None);
    }

    #[test]
    fn test_target_method_parse() {
        assert_eq!("get".parse::<TargetMethod>().unwrap(), TargetMethod::Get);
        assert_eq!("POST".parse::<TargetMethod>().unwrap(), TargetMethod::Post);
        assert!("PUT".parse::<TargetMethod>().is_err());
    }
}
