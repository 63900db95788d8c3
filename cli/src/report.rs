//! Console summary and on-disk persistence of a finished scan.
//!
//! The JSON file is the full [`Report`]; the HTML sibling is a self-contained
//! page with embedded CSS, no external assets.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use colored::*;
use url::Url;
use vulnprobe_core::utils::truncate;
use vulnprobe_core::{Report, Severity};

use crate::console::out;

pub fn print_summary(report: &Report) {
    out(format!("\r\n{}", "━━━ Scan summary ━━━".bright_white().bold()));
    out(format!("[+] Target:   {}", report.target.url));
    out(format!(
        "[+] Duration: {:.2}s",
        report.duration().num_milliseconds() as f64 / 1000.0
    ));

    let total = report.total_findings();
    if total == 0 {
        out("[+] No vulnerabilities found.".green().bold());
        return;
    }

    out(format!("[+] {} finding(s) discovered:", total).yellow().bold());
    for (severity, count) in report.severity_counts() {
        if count > 0 {
            out(format!("    {:<9} {}", paint(severity, &severity.to_string()), count));
        }
    }

    for (i, (class, finding)) in report.findings_by_severity().iter().enumerate() {
        out(format!(
            "\r\n  #{} [{}] {}",
            i + 1,
            paint(finding.severity, &finding.severity.to_string()),
            class.to_string().bold()
        ));
        out(format!("     {}", finding.description));
        out(format!("     {} {}", finding.method, finding.url.white()));
        if let Some(ref param) = finding.parameter {
            out(format!("     Parameter: {}", param.bright_yellow()));
        }
        if let Some(ref payload) = finding.payload {
            out(format!("     Payload:   {}", truncate(&payload.value, 80).bright_yellow()));
        }
    }
}

fn paint(severity: Severity, text: &str) -> ColoredString {
    match severity {
        Severity::Critical => text.red().bold(),
        Severity::High => text.red(),
        Severity::Medium => text.yellow(),
        Severity::Low => text.blue(),
        Severity::Info => text.dimmed(),
    }
}

/// `scan_<host>_<timestamp>`, safe to use as a file stem.
pub fn report_stem(report: &Report) -> String {
    let host = Url::parse(&report.target.url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_string()))
        .unwrap_or_else(|| "target".to_string());
    let host: String = host
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();

    format!("scan_{}_{}", host, report.started_at.format("%Y%m%d_%H%M%S"))
}

/// Writes the JSON report, and the HTML one when the config asks for it.
pub fn save(report: &Report, dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory '{}'", dir.display()))?;

    let stem = report_stem(report);
    let mut written = Vec::new();

    let json_path = dir.join(format!("{}.json", stem));
    let json = report.to_json().context("failed to serialize report")?;
    fs::write(&json_path, json)
        .with_context(|| format!("failed to write '{}'", json_path.display()))?;
    written.push(json_path);

    if report.config.generate_html {
        let html_path = dir.join(format!("{}.html", stem));
        fs::write(&html_path, generate_html_report(report))
            .with_context(|| format!("failed to write '{}'", html_path.display()))?;
        written.push(html_path);
    }

    Ok(written)
}

pub fn generate_html_report(report: &Report) -> String {
    let mut rows = String::new();
    for (i, (class, f)) in report.findings_by_severity().iter().enumerate() {
        let payload = f.payload.as_ref().map(|p| p.value.as_str()).unwrap_or("");
        rows.push_str(&format!(
            r#"<tr>
                <td>{}</td>
                <td><span class="sev sev-{}">{}</span></td>
                <td>{}</td>
                <td>{}</td>
                <td class="mono">{} {}</td>
                <td class="mono">{}</td>
                <td class="mono">{}</td>
            </tr>"#,
            i + 1,
            f.severity.to_string().to_lowercase(),
            f.severity,
            html_escape(&class.to_string()),
            html_escape(&f.description),
            html_escape(&f.method),
            html_escape(&f.url),
            html_escape(f.parameter.as_deref().unwrap_or("")),
            html_escape(payload),
        ));
    }

    let mut cards = String::new();
    for (severity, count) in report.severity_counts() {
        cards.push_str(&format!(
            r#"<div class="meta-card"><div class="label">{}</div><div class="value sev-{}">{}</div></div>"#,
            severity,
            severity.to_string().to_lowercase(),
            count
        ));
    }

    let total = report.total_findings();
    let table = if total == 0 {
        r#"<div class="empty">No vulnerabilities found.</div>"#.to_string()
    } else {
        format!(
            r#"<table><thead><tr><th>#</th><th>Severity</th><th>Type</th><th>Description</th><th>Request</th><th>Parameter</th><th>Payload</th></tr></thead><tbody>{}</tbody></table>"#,
            rows
        )
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>vulnprobe report: {target}</title>
<style>
* {{ margin: 0; padding: 0; box-sizing: border-box; }}
body {{ background: #0a0a0c; color: #e1e1e6; font-family: system-ui, sans-serif; padding: 2rem; }}
h1 {{ font-size: 1.5rem; margin-bottom: 0.5rem; }}
.sub {{ color: #64647a; font-size: 0.85rem; margin-bottom: 2rem; }}
.meta {{ display: grid; grid-template-columns: repeat(auto-fill, minmax(160px, 1fr)); gap: 1rem; margin-bottom: 2rem; }}
.meta-card {{ background: rgba(255,255,255,0.035); border: 1px solid rgba(255,255,255,0.08); border-radius: 12px; padding: 1.25rem; }}
.meta-card .label {{ font-size: 0.7rem; text-transform: uppercase; letter-spacing: 0.08em; color: #64647a; margin-bottom: 0.5rem; }}
.meta-card .value {{ font-size: 1.75rem; font-weight: 700; }}
table {{ width: 100%; border-collapse: collapse; font-size: 0.85rem; }}
thead th {{ text-align: left; padding: 0.75rem 1rem; border-bottom: 1px solid rgba(255,255,255,0.08); color: #64647a; font-size: 0.7rem; text-transform: uppercase; }}
tbody td {{ padding: 0.75rem 1rem; border-bottom: 1px solid rgba(255,255,255,0.04); vertical-align: top; }}
.mono {{ font-family: monospace; font-size: 0.8rem; word-break: break-all; }}
.sev {{ padding: 0.15rem 0.5rem; border-radius: 9999px; font-size: 0.7rem; font-weight: 700; text-transform: uppercase; }}
.sev-critical {{ color: #f43f5e; }}
.sev-high {{ color: #f97316; }}
.sev-medium {{ color: #eab308; }}
.sev-low {{ color: #3b82f6; }}
.sev-info {{ color: #94949e; }}
.panel {{ border: 1px solid rgba(255,255,255,0.08); border-radius: 12px; overflow: hidden; }}
.empty {{ padding: 3rem; text-align: center; color: #10b981; }}
</style>
</head>
<body>
<h1>vulnprobe scan report</h1>
<div class="sub">{target} &middot; started {started} &middot; finished {finished}</div>
<div class="meta">
    <div class="meta-card"><div class="label">Total</div><div class="value">{total}</div></div>
    {cards}
</div>
<div class="panel">{table}</div>
</body>
</html>"#,
        target = html_escape(&report.target.url),
        started = report.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
        finished = report.finished_at.format("%Y-%m-%d %H:%M:%S UTC"),
        total = total,
        cards = cards,
        table = table,
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use vulnprobe_core::{Finding, ScanConfig, ScanResult, Target, VulnerabilityType};

    fn sample_report() -> Report {
        let started = Utc.with_ymd_and_hms(2026, 3, 1, 12, 30, 5).unwrap();
        let xss = vulnprobe_core::PayloadCatalog::builtin()
            .filter(VulnerabilityType::Xss, 1)[0]
            .clone();
        Report {
            target: Target::new("https://shop.example.com:8443/search?q=1"),
            config: ScanConfig::default(),
            results: vec![ScanResult {
                vulnerability_type: VulnerabilityType::Xss,
                findings: vec![Finding::new(
                    "https://shop.example.com:8443/search?q=%3Cscript%3E",
                    "GET",
                    "Potential XSS: Payload reflected in response for parameter 'q'",
                    Severity::High,
                )
                .with_payload(&xss)
                .with_parameter("q")],
            }],
            started_at: started,
            finished_at: started + chrono::Duration::seconds(2),
        }
    }

    #[test]
    fn test_report_stem() {
        assert_eq!(report_stem(&sample_report()), "scan_shop_example_com_20260301_123005");
    }

    #[test]
    fn test_html_escapes_payloads() {
        let html = generate_html_report(&sample_report());
        assert!(html.contains("&lt;script&gt;alert(&#39;XSS&#39;)&lt;/script&gt;"));
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("sev-high"));
    }

    #[test]
    fn test_html_for_clean_scan() {
        let mut report = sample_report();
        report.results.clear();
        assert!(generate_html_report(&report).contains("No vulnerabilities found."));
    }

    #[test]
    fn test_save_writes_json_and_html() {
        let dir = tempfile::tempdir().unwrap();
        let report = sample_report();

        let written = save(&report, dir.path()).unwrap();
        assert_eq!(written.len(), 2);
        assert!(written[0].extension().unwrap() == "json");
        assert!(written[1].extension().unwrap() == "html");

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&written[0]).unwrap()).unwrap();
        assert_eq!(json["results"][0]["vulnerabilityType"], "XSS");
    }

    #[test]
    fn test_save_without_html() {
        let dir = tempfile::tempdir().unwrap();
        let mut report = sample_report();
        report.config.generate_html = false;

        let written = save(&report, &dir.path().join("nested")).unwrap();
        assert_eq!(written.len(), 1);
    }
}
