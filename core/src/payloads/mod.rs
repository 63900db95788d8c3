pub mod corpus;
pub mod encoding;

pub use encoding::{encode, EncodingScheme};

use serde::{Deserialize, Serialize};

use crate::core::VulnerabilityType;
use corpus::PayloadSpec;

/// A crafted input for one vulnerability class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    pub value: String,
    #[serde(rename = "type")]
    pub class: VulnerabilityType,
    pub description: String,
    /// Complexity level, 1 (basic) to 5 (exotic).
    pub level: u8,
}

/// Per-class payload lists in corpus definition order.
#[derive(Debug, Clone)]
pub struct PayloadCatalog {
    xss: Vec<Payload>,
    sql_injection: Vec<Payload>,
    file_inclusion: Vec<Payload>,
    csrf: Vec<Payload>,
    misconfiguration: Vec<Payload>,
    auth_weakness: Vec<Payload>,
}

impl PayloadCatalog {
    /// Catalog backed by the built-in corpus.
    pub fn builtin() -> Self {
        Self {
            xss: build(VulnerabilityType::Xss, corpus::XSS),
            sql_injection: build(VulnerabilityType::SqlInjection, corpus::SQL_INJECTION),
            file_inclusion: build(VulnerabilityType::FileInclusion, corpus::FILE_INCLUSION),
            csrf: build(VulnerabilityType::Csrf, corpus::CSRF),
            misconfiguration: build(VulnerabilityType::Misconfiguration, corpus::MISCONFIGURATION),
            auth_weakness: build(VulnerabilityType::AuthWeakness, corpus::AUTH_WEAKNESS),
        }
    }

    /// Every payload of a class, regardless of level.
    pub fn all(&self, class: VulnerabilityType) -> &[Payload] {
        match class {
            VulnerabilityType::Xss => &self.xss,
            VulnerabilityType::SqlInjection => &self.sql_injection,
            VulnerabilityType::FileInclusion => &self.file_inclusion,
            VulnerabilityType::Csrf => &self.csrf,
            VulnerabilityType::Misconfiguration => &self.misconfiguration,
            VulnerabilityType::AuthWeakness => &self.auth_weakness,
        }
    }

    /// Payloads of `class` with `level <= max_level`, in corpus order.
    pub fn filter(&self, class: VulnerabilityType, max_level: u8) -> Vec<&Payload> {
        self.all(class)
            .iter()
            .filter(|p| p.level <= max_level)
            .collect()
    }

    /// See [`encoding::encode`].
    pub fn encode(&self, raw: &str, scheme: &str) -> String {
        encode(raw, scheme)
    }

    pub fn len(&self) -> usize {
        VulnerabilityType::ALL.iter().map(|c| self.all(*c).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for PayloadCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn build(class: VulnerabilityType, specs: &[PayloadSpec]) -> Vec<Payload> {
    specs
        .iter()
        .map(|spec| Payload {
            value: spec.value.to_string(),
            class,
            description: spec.description.to_string(),
            level: spec.level,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_are_monotonic_and_order_stable() {
        let catalog = PayloadCatalog::builtin();
        for class in VulnerabilityType::ALL {
            for low in 1..=5u8 {
                for high in low..=5u8 {
                    let small = catalog.filter(class, low);
                    let large = catalog.filter(class, high);
                    assert!(small.len() <= large.len());

                    // `small` must appear in `large` as an ordered subsequence.
                    let mut cursor = large.iter();
                    for payload in &small {
                        assert!(
                            cursor.any(|candidate| candidate == payload),
                            "{:?} level {} not a subsequence of level {}",
                            class,
                            low,
                            high
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_counts_per_level() {
        let catalog = PayloadCatalog::builtin();
        for class in VulnerabilityType::ALL {
            assert_eq!(catalog.filter(class, 1).len(), 3, "{:?}", class);
        }
        assert_eq!(catalog.filter(VulnerabilityType::Xss, 3).len(), 9);
        assert_eq!(catalog.filter(VulnerabilityType::Xss, 5).len(), 15);
        // CSRF has nothing above level 3.
        assert_eq!(catalog.filter(VulnerabilityType::Csrf, 5).len(), 9);
        assert_eq!(catalog.len(), 15 * 5 + 9);
    }

    #[test]
    fn test_filter_below_one_is_empty() {
        let catalog = PayloadCatalog::builtin();
        assert!(catalog.filter(VulnerabilityType::SqlInjection, 0).is_empty());
    }

    #[test]
    fn test_payloads_carry_their_class() {
        let catalog = PayloadCatalog::builtin();
        for class in VulnerabilityType::ALL {
            assert!(catalog.all(class).iter().all(|p| p.class == class));
            assert!(catalog.all(class).iter().all(|p| (1..=5).contains(&p.level)));
        }
    }

    #[test]
    fn test_first_payloads_are_stable() {
        let catalog = PayloadCatalog::builtin();
        assert_eq!(
            catalog.filter(VulnerabilityType::Xss, 1)[0].value,
            "<script>alert('XSS')</script>"
        );
        assert_eq!(catalog.filter(VulnerabilityType::AuthWeakness, 1)[0].value, "admin:admin");
        assert_eq!(
            catalog.filter(VulnerabilityType::Misconfiguration, 3)[6].value,
            "/.git/config"
        );
    }
}
