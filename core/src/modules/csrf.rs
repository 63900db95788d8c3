use async_trait::async_trait;
use log::debug;

use super::{DetectionModule, ModuleContext};
use crate::core::result_aggregator::Finding;
use crate::core::{Severity, VulnerabilityType};
use crate::utils::detector::{form_without_csrf_token, CSRF_HEADERS};

/// Off-site origin used to test whether cross-origin requests are refused.
pub const SPOOFED_ORIGIN: &str = "https://attacker.example.com";

/// Missing cross-site request forgery protections.
pub struct CsrfModule;

#[async_trait]
impl DetectionModule for CsrfModule {
    fn class(&self) -> VulnerabilityType {
        VulnerabilityType::Csrf
    }

    async fn run(&self, ctx: &ModuleContext) -> Vec<Finding> {
        let response = match ctx.fetch_target(&[]).await {
            Ok(r) => r,
            Err(e) => {
                debug!("CSRF check skipped, target unreachable: {}", e);
                return Vec::new();
            }
        };

        let mut findings = Vec::new();

        if form_without_csrf_token(&response.body) {
            findings.push(Finding::new(
                ctx.target.url.as_str(),
                ctx.target_method(),
                "Potential CSRF vulnerability: Form found without CSRF token",
                Severity::Medium,
            ));
        }

        if !findings.is_empty() {
            return findings;
        }

        if CSRF_HEADERS.iter().any(|h| response.has_header(h)) {
            return findings;
        }

        let spoofed = [("Origin", SPOOFED_ORIGIN), ("Referer", SPOOFED_ORIGIN)];
        match ctx.fetch_target(&spoofed).await {
            Ok(r) if r.status == 200 => findings.push(Finding::new(
                ctx.target.url.as_str(),
                ctx.target_method(),
                "Potential CSRF vulnerability: Server accepts requests with modified Origin/Referer headers",
                Severity::Medium,
            )),
            Ok(r) => debug!("Spoofed origin refused with status {}", r.status),
            Err(e) => debug!("Spoofed origin request failed: {}", e),
        }

        findings
    }
}
