pub mod auth;
pub mod csrf;
pub mod file_inclusion;
pub mod misconfig;
pub mod sqli;
pub mod xss;

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use url::Url;

use crate::core::result_aggregator::Finding;
use crate::core::VulnerabilityType;
use crate::error::ProbeError;
use crate::http::{ProbeResponse, Prober};
use crate::payloads::{Payload, PayloadCatalog};
use crate::{ScanConfig, Target};

/// Everything a module needs for one scan. Shared read-only between modules.
pub struct ModuleContext {
    pub target: Target,
    /// `target.url`, already validated.
    pub base_url: Url,
    pub config: ScanConfig,
    pub catalog: Arc<PayloadCatalog>,
    pub prober: Arc<Prober>,
    level: u8,
}

impl ModuleContext {
    pub fn new(
        target: Target,
        base_url: Url,
        config: ScanConfig,
        catalog: Arc<PayloadCatalog>,
        prober: Arc<Prober>,
    ) -> Self {
        let level = config.effective_payload_level();
        Self {
            target,
            base_url,
            config,
            catalog,
            prober,
            level,
        }
    }

    /// Payloads of `class` up to the configured level.
    pub fn payloads(&self, class: VulnerabilityType) -> Vec<&Payload> {
        self.catalog.filter(class, self.level)
    }

    /// Plain request against the target with its own method.
    pub async fn fetch_target(&self, extra_headers: &[(&str, &str)]) -> Result<ProbeResponse, ProbeError> {
        self.prober
            .send(&self.target, self.target.method.as_method(), "", extra_headers, None)
            .await
    }

    pub async fn get(&self, path_or_url: &str) -> Result<ProbeResponse, ProbeError> {
        self.prober
            .send(&self.target, Method::GET, path_or_url, &[], None)
            .await
    }

    /// Method name recorded on findings from [`ModuleContext::fetch_target`].
    pub fn target_method(&self) -> String {
        self.target.method.to_string()
    }
}

/// One vulnerability class check. Implementations never fail: a probe that
/// errors is logged and skipped.
#[async_trait]
pub trait DetectionModule: Send + Sync {
    fn class(&self) -> VulnerabilityType;

    async fn run(&self, ctx: &ModuleContext) -> Vec<Finding>;
}

pub fn module_for(class: VulnerabilityType) -> Box<dyn DetectionModule> {
    match class {
        VulnerabilityType::Xss => Box::new(xss::XssModule),
        VulnerabilityType::SqlInjection => Box::new(sqli::SqlInjectionModule),
        VulnerabilityType::FileInclusion => Box::new(file_inclusion::FileInclusionModule),
        VulnerabilityType::Csrf => Box::new(csrf::CsrfModule),
        VulnerabilityType::Misconfiguration => Box::new(misconfig::MisconfigurationModule),
        VulnerabilityType::AuthWeakness => Box::new(auth::AuthWeaknessModule),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::DenyInsecureTls;

    pub fn context(url: &str, config: ScanConfig) -> ModuleContext {
        let target = Target::new(url);
        let base_url = Url::parse(url).unwrap();
        let prober = Prober::new(&config, &DenyInsecureTls).unwrap();
        ModuleContext::new(
            target,
            base_url,
            config,
            Arc::new(PayloadCatalog::builtin()),
            Arc::new(prober),
        )
    }
}
