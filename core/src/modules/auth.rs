use async_trait::async_trait;
use log::{debug, info};
use reqwest::Method;

use super::{DetectionModule, ModuleContext};
use crate::core::mutator::encode_pairs;
use crate::core::result_aggregator::Finding;
use crate::core::{Severity, VulnerabilityType};
use crate::error::ProbeError;
use crate::http::{resolve_url, ProbeResponse};
use crate::payloads::corpus::BRUTEFORCE_MARKER;
use crate::payloads::Payload;
use crate::utils::detector::{is_lockout_response, login_succeeded};

/// Failed logins sent when probing for brute-force protection.
pub const BRUTE_FORCE_ATTEMPTS: usize = 10;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Default credentials and missing brute-force protection on a login form.
pub struct AuthWeaknessModule;

#[async_trait]
impl DetectionModule for AuthWeaknessModule {
    fn class(&self) -> VulnerabilityType {
        VulnerabilityType::AuthWeakness
    }

    async fn run(&self, ctx: &ModuleContext) -> Vec<Finding> {
        let login_path = match ctx.config.login_path_ref() {
            Some(path) if ctx.config.enable_auth_testing => path,
            _ => {
                debug!("Auth testing disabled or no login path, nothing to do");
                return Vec::new();
            }
        };

        let payloads = ctx.payloads(self.class());
        let login_url = resolve_url(&ctx.target.url, login_path);
        let mut findings = Vec::new();

        if !ctx.config.username_field.is_empty() && !ctx.config.password_field.is_empty() {
            for payload in &payloads {
                let Some((username, password)) = payload.value.split_once(':') else {
                    continue;
                };

                let response = match submit_login(ctx, login_path, username, password).await {
                    Ok(r) => r,
                    Err(e) => {
                        debug!("Login attempt for '{}' skipped: {}", username, e);
                        continue;
                    }
                };

                if login_succeeded(response.status, response.header("Location"), &response.body) {
                    findings.push(
                        Finding::new(
                            login_url.as_str(),
                            "POST",
                            format!(
                                "Weak credentials vulnerability: Successful login with {}:{}",
                                username, password
                            ),
                            Severity::Critical,
                        )
                        .with_payload(payload),
                    );
                }
            }
        }

        if ctx.config.brute_force_test {
            if let Some(marker) = payloads.iter().find(|p| p.value == BRUTEFORCE_MARKER) {
                if let Some(finding) = probe_brute_force(ctx, login_path, &login_url, marker, &payloads).await {
                    findings.push(finding);
                }
            } else {
                debug!("Brute-force probe needs payload level 2 or higher");
            }
        }

        findings
    }
}

async fn submit_login(
    ctx: &ModuleContext,
    login_path: &str,
    username: &str,
    password: &str,
) -> Result<ProbeResponse, ProbeError> {
    let body = encode_pairs(&[
        (ctx.config.username_field.as_str(), username),
        (ctx.config.password_field.as_str(), password),
    ]);

    ctx.prober
        .send_without_redirects(
            &ctx.target,
            Method::POST,
            login_path,
            &[("Content-Type", FORM_CONTENT_TYPE)],
            Some(body),
        )
        .await
}

/// Sends a burst of failing logins and reports when none of them is throttled.
async fn probe_brute_force(
    ctx: &ModuleContext,
    login_path: &str,
    login_url: &str,
    marker: &Payload,
    payloads: &[&Payload],
) -> Option<Finding> {
    let username = payloads
        .iter()
        .find_map(|p| p.value.split_once(':').map(|(user, _)| user))
        .unwrap_or("admin");

    info!("Sending {} failed logins for '{}'", BRUTE_FORCE_ATTEMPTS, username);

    for attempt in 1..=BRUTE_FORCE_ATTEMPTS {
        let password = format!("vulnprobe-invalid-{}", attempt);
        let response = match submit_login(ctx, login_path, username, &password).await {
            Ok(r) => r,
            Err(e) => {
                debug!("Brute-force probe aborted on attempt {}: {}", attempt, e);
                return None;
            }
        };

        if is_lockout_response(response.status, &response.body) {
            debug!("Login throttled after {} attempt(s)", attempt);
            return None;
        }
    }

    Some(
        Finding::new(
            login_url,
            "POST",
            format!(
                "Missing brute-force protection: {} failed logins for '{}' were accepted without lockout or rate limiting",
                BRUTE_FORCE_ATTEMPTS, username
            ),
            Severity::Medium,
        )
        .with_payload(marker),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::test_support::context;
    use crate::ScanConfig;

    #[tokio::test]
    async fn test_noop_without_login_path() {
        let mut config = ScanConfig::default();
        config.enable_auth_testing = true;
        let ctx = context("http://127.0.0.1:9", config);
        assert!(AuthWeaknessModule.run(&ctx).await.is_empty());
    }

    #[tokio::test]
    async fn test_noop_when_disabled() {
        let mut config = ScanConfig::default();
        config.login_path = Some("/login".to_string());
        let ctx = context("http://127.0.0.1:9", config);
        assert!(AuthWeaknessModule.run(&ctx).await.is_empty());
    }
}
