use async_trait::async_trait;
use log::debug;

use super::{DetectionModule, ModuleContext};
use crate::core::mutator::QueryParams;
use crate::core::result_aggregator::Finding;
use crate::core::{Severity, VulnerabilityType};
use crate::utils::truncate;

/// Reflected script injection: a payload echoed back verbatim.
pub struct XssModule;

#[async_trait]
impl DetectionModule for XssModule {
    fn class(&self) -> VulnerabilityType {
        VulnerabilityType::Xss
    }

    async fn run(&self, ctx: &ModuleContext) -> Vec<Finding> {
        let payloads = ctx.payloads(self.class());
        let params = QueryParams::from_url_or(&ctx.base_url, "test", "value");
        let mut findings = Vec::new();

        for name in params.names() {
            for payload in &payloads {
                let url = params.mutate(&ctx.base_url, &name, &payload.value);

                let response = match ctx.get(url.as_str()).await {
                    Ok(r) => r,
                    Err(e) => {
                        debug!("XSS probe on '{}' skipped: {}", name, e);
                        continue;
                    }
                };

                if response.body.contains(&payload.value) {
                    debug!("'{}' reflected via '{}'", truncate(&payload.value, 40), name);
                    findings.push(
                        Finding::new(
                            url.as_str(),
                            "GET",
                            format!(
                                "Potential XSS: Payload reflected in response for parameter '{}'",
                                name
                            ),
                            Severity::High,
                        )
                        .with_payload(payload)
                        .with_parameter(name.as_str()),
                    );
                }
            }
        }

        findings
    }
}
