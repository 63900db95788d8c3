pub mod engine;
pub mod mutator;
pub mod result_aggregator;

use serde::{Deserialize, Serialize};

/// Vulnerability class probed by one detection module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VulnerabilityType {
    #[serde(rename = "XSS")]
    Xss,
    #[serde(rename = "SQL_INJECTION")]
    SqlInjection,
    #[serde(rename = "FILE_INCLUSION")]
    FileInclusion,
    #[serde(rename = "CSRF")]
    Csrf,
    #[serde(rename = "MISCONFIGURATION")]
    Misconfiguration,
    #[serde(rename = "AUTH_WEAK")]
    AuthWeakness,
}

impl VulnerabilityType {
    /// Every class, in module launch order.
    pub const ALL: [VulnerabilityType; 6] = [
        VulnerabilityType::Xss,
        VulnerabilityType::SqlInjection,
        VulnerabilityType::FileInclusion,
        VulnerabilityType::Csrf,
        VulnerabilityType::Misconfiguration,
        VulnerabilityType::AuthWeakness,
    ];
}

impl std::fmt::Display for VulnerabilityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VulnerabilityType::Xss => write!(f, "XSS"),
            VulnerabilityType::SqlInjection => write!(f, "SQL Injection"),
            VulnerabilityType::FileInclusion => write!(f, "File Inclusion"),
            VulnerabilityType::Csrf => write!(f, "CSRF"),
            VulnerabilityType::Misconfiguration => write!(f, "Misconfiguration"),
            VulnerabilityType::AuthWeakness => write!(f, "Weak Authentication"),
        }
    }
}

/// Finding severity. Variant order gives `Critical > High > Medium > Low > Info`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Highest first.
    pub const DESCENDING: [Severity; 5] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
        Severity::Info,
    ];
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Critical => write!(f, "Critical"),
            Severity::High => write!(f, "High"),
            Severity::Medium => write!(f, "Medium"),
            Severity::Low => write!(f, "Low"),
            Severity::Info => write!(f, "Info"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_total_order() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
        assert!(Severity::Low > Severity::Info);

        let mut sorted = Severity::DESCENDING.to_vec();
        sorted.sort();
        sorted.reverse();
        assert_eq!(sorted, Severity::DESCENDING.to_vec());
    }

    #[test]
    fn test_vulnerability_type_wire_names() {
        assert_eq!(serde_json::to_string(&VulnerabilityType::Xss).unwrap(), "\"XSS\"");
        assert_eq!(
            serde_json::to_string(&VulnerabilityType::AuthWeakness).unwrap(),
            "\"AUTH_WEAK\""
        );
        let parsed: VulnerabilityType = serde_json::from_str("\"SQL_INJECTION\"").unwrap();
        assert_eq!(parsed, VulnerabilityType::SqlInjection);
    }
}
