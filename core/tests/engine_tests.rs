use std::sync::{Arc, Mutex};

use vulnprobe_core::{
    DenyInsecureTls, ScanConfig, ScanEngine, ScanError, ScanEventSink, Target, VulnerabilityType,
};
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

#[derive(Default)]
struct RecordingSink {
    events: Mutex<Vec<String>>,
}

impl ScanEventSink for RecordingSink {
    fn on_module_started(&self, class: VulnerabilityType) {
        self.events.lock().unwrap().push(format!("start {}", class));
    }

    fn on_module_finished(&self, class: VulnerabilityType, findings: usize) {
        self.events
            .lock()
            .unwrap()
            .push(format!("finish {} {}", class, findings));
    }
}

fn hardened_page() -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("X-Content-Type-Options", "nosniff")
        .insert_header("X-Frame-Options", "DENY")
        .insert_header("Content-Security-Policy", "default-src 'self'")
        .insert_header("X-XSS-Protection", "1; mode=block")
        .insert_header("Strict-Transport-Security", "max-age=31536000")
        .insert_header("X-CSRF-Token", "c5f1e2")
        .set_body_string("<html><body>Nothing to see</body></html>")
}

#[tokio::test]
async fn test_clean_target_yields_no_results() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(hardened_page())
        .mount(&mock_server)
        .await;

    let engine = ScanEngine::new(ScanConfig::default(), &DenyInsecureTls).unwrap();
    let target = Target::new(format!("{}/", mock_server.uri()));
    let report = engine.scan(target.clone()).await.unwrap();

    assert!(report.results.is_empty(), "unexpected results: {:?}", report.results);
    assert_eq!(report.total_findings(), 0);
    assert_eq!(report.target, target);
    assert!(report.finished_at >= report.started_at);
}

#[tokio::test]
async fn test_every_enabled_module_reports_to_the_sink() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<form action=\"/buy\"></form>"))
        .mount(&mock_server)
        .await;

    let sink = Arc::new(RecordingSink::default());
    let mut config = ScanConfig::default();
    config.payload_level = 1;

    let engine = ScanEngine::new(config, &DenyInsecureTls)
        .unwrap()
        .with_sink(sink.clone());
    let report = engine
        .scan(Target::new(format!("{}/", mock_server.uri())))
        .await
        .unwrap();

    let mut classes: Vec<VulnerabilityType> =
        report.results.iter().map(|r| r.vulnerability_type).collect();
    classes.sort_by_key(|c| c.to_string());
    assert_eq!(
        classes,
        vec![VulnerabilityType::Csrf, VulnerabilityType::Misconfiguration]
    );
    assert_eq!(report.total_findings(), 1 + 5);

    let events = sink.events.lock().unwrap();
    assert_eq!(events.len(), 10);
    for class in ScanConfig::default().enabled_classes() {
        assert!(events.contains(&format!("start {}", class)));
    }
    assert!(events.contains(&"finish CSRF 1".to_string()));
    assert!(events.contains(&"finish Misconfiguration 5".to_string()));
    assert!(events.contains(&"finish XSS 0".to_string()));
}

#[tokio::test]
async fn test_percent_encoded_echo_is_not_reflection() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/echo"))
        .respond_with(|req: &wiremock::Request| {
            ResponseTemplate::new(200).set_body_string(req.url.query().unwrap_or("").to_string())
        })
        .mount(&mock_server)
        .await;

    let mut config = ScanConfig::none_enabled();
    config.enable_xss = true;
    config.payload_level = 1;
    let engine = ScanEngine::new(config, &DenyInsecureTls).unwrap();
    let report = engine
        .scan(Target::new(format!("{}/echo?a=1&b=2", mock_server.uri())))
        .await
        .unwrap();

    // The echo is percent-encoded, so nothing is reflected verbatim.
    assert!(report.results.is_empty());
}

#[tokio::test]
async fn test_non_http_target_is_rejected() {
    let engine = ScanEngine::new(ScanConfig::default(), &DenyInsecureTls).unwrap();
    let err = engine
        .scan(Target::new("file:///etc/passwd"))
        .await
        .unwrap_err();
    assert!(matches!(err, ScanError::InvalidTarget { .. }));
    assert!(err.to_string().contains("file:///etc/passwd"));
}
