use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use vulnprobe_core::{ScanEventSink, SinkRef, VulnerabilityType};

/// Renders module progress on the terminal behind a spinner.
pub struct ConsoleSink {
    spinner: ProgressBar,
}

impl ConsoleSink {
    pub fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        spinner.set_style(style);
        spinner.set_message("Starting modules...");
        spinner.enable_steady_tick(Duration::from_millis(120));
        Self { spinner }
    }

    pub fn new_ref() -> (Arc<Self>, SinkRef) {
        let sink = Arc::new(Self::new());
        let as_ref: SinkRef = sink.clone();
        (sink, as_ref)
    }

    pub fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

impl ScanEventSink for ConsoleSink {
    fn on_module_started(&self, class: VulnerabilityType) {
        self.spinner.set_message(format!("Running {} checks...", class));
        self.spinner
            .println(format!("{} {} module started", "[*]".bright_cyan(), class));
    }

    fn on_module_finished(&self, class: VulnerabilityType, findings: usize) {
        let line = if findings == 0 {
            format!("{} {} module finished: no findings", "[+]".green(), class)
        } else {
            format!(
                "{} {} module finished: {}",
                "[!]".yellow().bold(),
                class,
                format!("{} finding(s)", findings).yellow()
            )
        };
        self.spinner.println(line);
    }
}

/// Prints one line and flushes stdout.
pub fn out(text: impl std::fmt::Display) {
    print!("{}\r\n", text);
    std::io::stdout().flush().ok();
}
