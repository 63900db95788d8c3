use async_trait::async_trait;
use log::debug;

use super::{DetectionModule, ModuleContext};
use crate::core::mutator::QueryParams;
use crate::core::result_aggregator::Finding;
use crate::core::{Severity, VulnerabilityType};
use crate::utils::detector::{file_fingerprint, is_suspect_param};

/// Local and remote file inclusion through path-like parameters.
pub struct FileInclusionModule;

#[async_trait]
impl DetectionModule for FileInclusionModule {
    fn class(&self) -> VulnerabilityType {
        VulnerabilityType::FileInclusion
    }

    async fn run(&self, ctx: &ModuleContext) -> Vec<Finding> {
        let payloads = ctx.payloads(self.class());
        let params = QueryParams::from_url_or(&ctx.base_url, "page", "index");
        let mut findings = Vec::new();

        for name in params.names() {
            if !is_suspect_param(&name) && !ctx.config.test_all_params {
                debug!("Skipping non-suspect parameter '{}'", name);
                continue;
            }

            for payload in &payloads {
                let url = params.mutate(&ctx.base_url, &name, &payload.value);

                let response = match ctx.get(url.as_str()).await {
                    Ok(r) => r,
                    Err(e) => {
                        debug!("File inclusion probe on '{}' skipped: {}", name, e);
                        continue;
                    }
                };

                // Payloads without a fingerprint are sent but cannot be confirmed.
                if let Some(pattern) = file_fingerprint(&payload.value, &response.body) {
                    findings.push(
                        Finding::new(
                            url.as_str(),
                            "GET",
                            format!("File Inclusion Vulnerability: Found pattern '{}' in response", pattern),
                            Severity::Critical,
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
