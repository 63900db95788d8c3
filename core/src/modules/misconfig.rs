use async_trait::async_trait;
use log::debug;

use super::{DetectionModule, ModuleContext};
use crate::core::result_aggregator::Finding;
use crate::core::{Severity, VulnerabilityType};
use crate::http::{resolve_url, ProbeResponse};
use crate::utils::detector::{is_path_probe, SECURITY_HEADERS};

/// Missing security headers and exposed sensitive paths.
pub struct MisconfigurationModule;

#[async_trait]
impl DetectionModule for MisconfigurationModule {
    fn class(&self) -> VulnerabilityType {
        VulnerabilityType::Misconfiguration
    }

    async fn run(&self, ctx: &ModuleContext) -> Vec<Finding> {
        let response = match ctx.fetch_target(&[]).await {
            Ok(r) => r,
            Err(e) => {
                debug!("Misconfiguration check skipped, target unreachable: {}", e);
                return Vec::new();
            }
        };

        let mut findings = check_security_headers(ctx, &response);

        for payload in ctx.payloads(self.class()) {
            if !is_path_probe(&payload.value) {
                continue;
            }

            let response = match ctx.get(&payload.value).await {
                Ok(r) => r,
                Err(e) => {
                    debug!("Path probe '{}' skipped: {}", payload.value, e);
                    continue;
                }
            };

            if response.status == 200 && !response.body.is_empty() {
                findings.push(
                    Finding::new(
                        resolve_url(&ctx.target.url, &payload.value),
                        "GET",
                        format!("Potential security misconfiguration: {}", payload.description),
                        Severity::High,
                    )
                    .with_payload(payload),
                );
            }
        }

        findings
    }
}

fn check_security_headers(ctx: &ModuleContext, response: &ProbeResponse) -> Vec<Finding> {
    let mut findings = Vec::new();

    for (name, recommended) in SECURITY_HEADERS {
        let value = response
            .headers
            .get(name)
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .unwrap_or_default();

        if value.is_empty() {
            findings.push(Finding::new(
                ctx.target.url.as_str(),
                ctx.target_method(),
                format!("Missing security header: {}", name),
                Severity::Medium,
            ));
            continue;
        }

        if let Some(recommended) = recommended {
            if !value.contains(recommended) {
                findings.push(Finding::new(
                    ctx.target.url.as_str(),
                    ctx.target_method(),
                    format!(
                        "Misconfigured security header: {} (Value: {}, Recommended: {})",
                        name, value, recommended
                    ),
                    Severity::Low,
                ));
            }
        }
    }

    findings
}
