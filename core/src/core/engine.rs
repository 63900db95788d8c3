use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use log::{info, warn};
use tokio::sync::mpsc;
use url::Url;

use crate::core::result_aggregator::{Report, ResultAggregator, ScanResult};
use crate::error::ScanError;
use crate::http::{InsecureTlsApproval, Prober};
use crate::modules::{module_for, ModuleContext};
use crate::payloads::PayloadCatalog;
use crate::{NullSink, ScanConfig, SinkRef, Target};

/// Runs every enabled detection module against one target concurrently.
///
/// The engine:
/// 1. Validates the target URL
/// 2. Spawns one task per enabled vulnerability class
/// 3. Each task sends its completed result over a channel
/// 4. The aggregator drains the channel while the tasks run
/// 5. Once every task has finished the results become a [`Report`]
pub struct ScanEngine {
    config: ScanConfig,
    catalog: Arc<PayloadCatalog>,
    prober: Arc<Prober>,
    sink: SinkRef,
}

impl ScanEngine {
    /// Builds the engine and its HTTP client. `approval` is consulted only when
    /// the configuration asks to ignore TLS errors.
    pub fn new(config: ScanConfig, approval: &dyn InsecureTlsApproval) -> Result<Self, ScanError> {
        let prober = Prober::new(&config, approval)?;
        Ok(Self {
            config,
            catalog: Arc::new(PayloadCatalog::builtin()),
            prober: Arc::new(prober),
            sink: NullSink::new_ref(),
        })
    }

    pub fn with_sink(mut self, sink: SinkRef) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn catalog(&self) -> &PayloadCatalog {
        &self.catalog
    }

    /// Scans `target` and waits for every module.
    ///
    /// Fails only when the target URL is unusable; probe failures inside a
    /// module are skipped.
    pub async fn scan(&self, target: Target) -> Result<Report, ScanError> {
        let base_url = validate_target(&target.url)?;
        let started_at = Utc::now();
        let classes = self.config.enabled_classes();

        info!("Scanning {} with {} module(s)", target.url, classes.len());

        let ctx = Arc::new(ModuleContext::new(
            target.clone(),
            base_url,
            self.config.clone(),
            Arc::clone(&self.catalog),
            Arc::clone(&self.prober),
        ));

        let (tx, rx) = mpsc::channel::<ScanResult>(classes.len().max(1));
        let mut tasks = Vec::with_capacity(classes.len());

        for class in &classes {
            let class = *class;
            let ctx = Arc::clone(&ctx);
            let sink = Arc::clone(&self.sink);
            let tx = tx.clone();

            tasks.push(tokio::spawn(async move {
                sink.on_module_started(class);
                info!("{} module started", class);

                let findings = module_for(class).run(&ctx).await;

                info!("{} module finished with {} finding(s)", class, findings.len());
                sink.on_module_finished(class, findings.len());

                if !findings.is_empty() {
                    let _ = tx
                        .send(ScanResult {
                            vulnerability_type: class,
                            findings,
                        })
                        .await;
                }
            }));
        }

        drop(tx);

        let (joined, results) = tokio::join!(join_all(tasks), ResultAggregator::collect(rx));

        for (class, outcome) in classes.iter().zip(joined) {
            if let Err(e) = outcome {
                warn!("{} module task failed: {}", class, e);
            }
        }

        let finished_at = Utc::now();
        info!(
            "Scan of {} finished in {} ms",
            target.url,
            (finished_at - started_at).num_milliseconds()
        );

        Ok(Report {
            target,
            config: self.config.clone(),
            results,
            started_at,
            finished_at,
        })
    }
}

/// Parses the target URL and rejects anything that is not HTTP(S).
fn validate_target(raw: &str) -> Result<Url, ScanError> {
    let url = Url::parse(raw).map_err(|e| ScanError::InvalidTarget {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ScanError::InvalidTarget {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DenyInsecureTls;

    #[test]
    fn test_engine_creation() {
        let engine = ScanEngine::new(ScanConfig::default(), &DenyInsecureTls).unwrap();
        assert_eq!(engine.config().payload_level, 3);
        assert!(!engine.catalog().is_empty());
    }

    #[test]
    fn test_validate_target() {
        assert!(validate_target("https://example.com/api?id=123").is_ok());
        assert!(matches!(
            validate_target("not a url"),
            Err(ScanError::InvalidTarget { .. })
        ));
        assert!(matches!(
            validate_target("ftp://example.com/"),
            Err(ScanError::InvalidTarget { reason, .. }) if reason.contains("ftp")
        ));
    }

    #[tokio::test]
    async fn test_no_modules_yields_empty_report() {
        let engine = ScanEngine::new(ScanConfig::none_enabled(), &DenyInsecureTls).unwrap();
        let report = engine.scan(Target::new("http://127.0.0.1:9/")).await.unwrap();
        assert!(report.results.is_empty());
        assert!(report.finished_at >= report.started_at);
    }

    #[tokio::test]
    async fn test_invalid_target_aborts_before_modules() {
        let engine = ScanEngine::new(ScanConfig::default(), &DenyInsecureTls).unwrap();
        let err = engine.scan(Target::new("javascript:alert(1)")).await.unwrap_err();
        assert!(matches!(err, ScanError::InvalidTarget { .. }));
    }
}
