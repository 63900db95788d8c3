use async_trait::async_trait;
use log::debug;

use super::{DetectionModule, ModuleContext};
use crate::core::mutator::QueryParams;
use crate::core::result_aggregator::Finding;
use crate::core::{Severity, VulnerabilityType};
use crate::utils::detector::{is_blind_deviation, sql_error_pattern};

/// Error-based and blind SQL injection against query parameters.
pub struct SqlInjectionModule;

#[async_trait]
impl DetectionModule for SqlInjectionModule {
    fn class(&self) -> VulnerabilityType {
        VulnerabilityType::SqlInjection
    }

    async fn run(&self, ctx: &ModuleContext) -> Vec<Finding> {
        let baseline = match ctx.fetch_target(&[]).await {
            Ok(r) => r,
            Err(e) => {
                debug!("SQL injection baseline failed, skipping module: {}", e);
                return Vec::new();
            }
        };
        let baseline_len = baseline.body.len();

        let payloads = ctx.payloads(self.class());
        let params = QueryParams::from_url_or(&ctx.base_url, "id", "1");
        let mut findings = Vec::new();

        for name in params.names() {
            for payload in &payloads {
                let url = params.mutate(&ctx.base_url, &name, &payload.value);

                let response = match ctx.get(url.as_str()).await {
                    Ok(r) => r,
                    Err(e) => {
                        debug!("SQL injection probe on '{}' skipped: {}", name, e);
                        continue;
                    }
                };

                if let Some(pattern) = sql_error_pattern(&response.body) {
                    findings.push(
                        Finding::new(
                            url.as_str(),
                            "GET",
                            format!("Potential SQL Injection: Error pattern '{}' detected", pattern),
                            Severity::Critical,
                        )
                        .with_payload(payload)
                        .with_parameter(name.as_str()),
                    );
                }

                if is_blind_deviation(
                    baseline.status,
                    baseline_len,
                    response.status,
                    response.body.len(),
                ) {
                    findings.push(
                        Finding::new(
                            url.as_str(),
                            "GET",
                            "Potential Blind SQL Injection: Response significantly different from baseline",
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
