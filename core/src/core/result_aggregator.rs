use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::core::{Severity, VulnerabilityType};
use crate::payloads::Payload;
use crate::{ScanConfig, Target};

/// One reported indicator of a possible vulnerability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Payload>,
    pub url: String,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,
    pub description: String,
    pub severity: Severity,
}

impl Finding {
    pub fn new(
        url: impl Into<String>,
        method: impl Into<String>,
        description: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            payload: None,
            url: url.into(),
            method: method.into(),
            parameter: None,
            description: description.into(),
            severity,
        }
    }

    pub fn with_payload(mut self, payload: &Payload) -> Self {
        self.payload = Some(payload.clone());
        self
    }

    pub fn with_parameter(mut self, name: impl Into<String>) -> Self {
        self.parameter = Some(name.into());
        self
    }
}

/// Findings of one detection module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    pub vulnerability_type: VulnerabilityType,
    pub findings: Vec<Finding>,
}

/// Outcome of one scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub target: Target,
    pub config: ScanConfig,
    /// In the order modules completed.
    pub results: Vec<ScanResult>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl Report {
    pub fn total_findings(&self) -> usize {
        self.results.iter().map(|r| r.findings.len()).sum()
    }

    /// Finding count per severity, highest first, zero counts included.
    pub fn severity_counts(&self) -> Vec<(Severity, usize)> {
        Severity::DESCENDING
            .into_iter()
            .map(|severity| {
                let count = self
                    .results
                    .iter()
                    .flat_map(|r| r.findings.iter())
                    .filter(|f| f.severity == severity)
                    .count();
                (severity, count)
            })
            .collect()
    }

    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }

    /// Every finding with its class, most severe first. Ties keep report order.
    pub fn findings_by_severity(&self) -> Vec<(VulnerabilityType, &Finding)> {
        let mut all: Vec<(VulnerabilityType, &Finding)> = self
            .results
            .iter()
            .flat_map(|r| r.findings.iter().map(move |f| (r.vulnerability_type, f)))
            .collect();
        all.sort_by(|a, b| b.1.severity.cmp(&a.1.severity));
        all
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Drains module results into an ordered list.
pub struct ResultAggregator;

impl ResultAggregator {
    /// Runs until every sender is dropped. Empty results are discarded.
    pub async fn collect(mut receiver: mpsc::Receiver<ScanResult>) -> Vec<ScanResult> {
        let mut results = Vec::new();

        while let Some(result) = receiver.recv().await {
            if result.findings.is_empty() {
                continue;
            }
            info!(
                "{} produced {} finding(s)",
                result.vulnerability_type,
                result.findings.len()
            );
            results.push(result);
        }
        results
    }
}
