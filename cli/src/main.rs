mod console;
mod report;

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use colored::*;
use vulnprobe_core::{
    InsecureTlsApproval, ScanConfig, ScanEngine, SinkRef, Target, TargetMethod, VulnerabilityType,
    MAX_PAYLOAD_LEVEL,
};

use crate::console::{out, ConsoleSink};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModuleArg {
    Xss,
    Sqli,
    #[value(alias = "lfi")]
    FileInclusion,
    Csrf,
    Misconfig,
    Auth,
}

impl ModuleArg {
    fn class(self) -> VulnerabilityType {
        match self {
            ModuleArg::Xss => VulnerabilityType::Xss,
            ModuleArg::Sqli => VulnerabilityType::SqlInjection,
            ModuleArg::FileInclusion => VulnerabilityType::FileInclusion,
            ModuleArg::Csrf => VulnerabilityType::Csrf,
            ModuleArg::Misconfig => VulnerabilityType::Misconfiguration,
            ModuleArg::Auth => VulnerabilityType::AuthWeakness,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "vulnprobe",
    version,
    about = "Concurrent web vulnerability probe",
    override_usage = "vulnprobe <url> <options>",
    after_help = "\x1b[1;36mEXAMPLES:\x1b[0m
  Quick scan:                     vulnprobe http://target.com/search?q=shoes
  Deeper payloads:                vulnprobe http://target.com/item?id=1 --level 5
  Only some modules:              vulnprobe http://target.com --modules xss,sqli
  Authenticated target:           vulnprobe http://target.com -H \"Authorization: Bearer TOKEN\" -b session=abc
  Login testing:                  vulnprobe http://target.com --auth --login-path /login --brute-force
  From a config file:             vulnprobe http://target.com --config scan.json
  Dry-run test:                   vulnprobe http://target.com --dry-run"
)]
pub struct Args {
    /// Target URL (http or https)
    pub target: String,

    #[arg(short = 'X', long, default_value = "GET", help = "Method for plain target requests (GET or POST)")]
    pub method: TargetMethod,

    #[arg(short = 'H', long = "header", help = "Custom header (e.g. \"Authorization: Bearer TOKEN\")")]
    pub headers: Vec<String>,

    #[arg(short = 'b', long = "cookie", help = "Cookie as name=value, repeatable")]
    pub cookies: Vec<String>,

    #[arg(long, help = "Basic auth credentials as user:password")]
    pub user: Option<String>,

    #[arg(long, help = "JSON scan configuration; flags override its values")]
    pub config: Option<PathBuf>,

    #[arg(short = 'l', long, help = "Payload complexity level (1-5)")]
    pub level: Option<u8>,

    #[arg(long, help = "Request timeout in seconds")]
    pub timeout: Option<u64>,

    #[arg(long, help = "Maximum redirects followed per request")]
    pub max_redirects: Option<usize>,

    #[arg(long, value_delimiter = ',', help = "Run only these modules (comma separated)")]
    pub modules: Vec<ModuleArg>,

    #[arg(long, help = "Only test parameters whose names suggest files or paths")]
    pub suspect_only: bool,

    #[arg(long, help = "Enable authentication weakness testing")]
    pub auth: bool,

    #[arg(long, help = "Login path for authentication testing (e.g. /login)")]
    pub login_path: Option<String>,

    #[arg(long, help = "Login form username field")]
    pub username_field: Option<String>,

    #[arg(long, help = "Login form password field")]
    pub password_field: Option<String>,

    #[arg(long, help = "Probe the login form for brute-force protection")]
    pub brute_force: bool,

    #[arg(short = 'k', long, help = "Skip TLS certificate verification (asks for confirmation)")]
    pub insecure: bool,

    #[arg(short = 'y', long, help = "Answer yes to the insecure TLS confirmation")]
    pub yes: bool,

    #[arg(short = 'o', long, default_value = "reports", help = "Directory for JSON/HTML reports")]
    pub output: PathBuf,

    #[arg(long, help = "Do not write the HTML report")]
    pub no_html: bool,

    #[arg(short = 'v', long, help = "Show debug logs (Verbose Mode)")]
    pub verbose: bool,

    #[arg(long, help = "Print the resolved target and config without sending requests")]
    pub dry_run: bool,
}

#[tokio::main]
async fn main() {
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let args = Args::parse();
    init_logging(args.verbose);
    print_banner();

    if let Err(e) = run(args).await {
        eprint!("{}\r\n", format!("[!] {:#}", e).red());
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "warn,vulnprobe_core=debug,vulnprobe=debug"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn print_banner() {
    let banner = r#"
   _   ____  ____    _____  _________  ___  ____
  | | / / / / / /   / / _ \/ ___/ __ \/ _ )/ __/
  | |/ / /_/ / /__ / / ___/ /  / /_/ / _  / _/
  |___/\____/____//_/_/  /_/   \____/____/___/
    "#;
    out(banner.bright_cyan().bold());
    out("──────────────────────────────────────────────────".dimmed());
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = resolve_config(&args)?;
    let target = build_target(&args)?;

    if args.dry_run {
        println!("[DRY RUN] Would scan target: {}", target.url);
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    print_scan_config(&target, &config, &args.output);

    let assume_yes = args.yes;
    let approval = move || assume_yes || confirm_insecure_tls();
    let (engine, console) = start_engine(config, &approval, ConsoleSink::new_ref)?;

    let scanned = engine.scan(target).await;
    console.finish();
    let report = scanned?;

    report::print_summary(&report);

    for path in report::save(&report, &args.output)? {
        out(format!("[+] Report written to {}", path.display()).green());
    }
    Ok(())
}

/// Builds the engine, then the progress sink, so the TLS prompt is not drawn
/// over by a running spinner.
fn start_engine<S>(
    config: ScanConfig,
    approval: &dyn InsecureTlsApproval,
    make_sink: impl FnOnce() -> (S, SinkRef),
) -> anyhow::Result<(ScanEngine, S)> {
    let engine = ScanEngine::new(config, approval)?;
    let (handle, sink) = make_sink();
    Ok((engine.with_sink(sink), handle))
}

/// Defaults, then the optional config file, then command-line flags.
fn resolve_config(args: &Args) -> anyhow::Result<ScanConfig> {
    let mut config = match args.config {
        Some(ref path) => load_config_file(path)?,
        None => ScanConfig::default(),
    };

    if let Some(level) = args.level {
        if !(1..=MAX_PAYLOAD_LEVEL).contains(&level) {
            bail!("--level must be between 1 and {}", MAX_PAYLOAD_LEVEL);
        }
        config.payload_level = level;
    }
    if let Some(timeout) = args.timeout {
        config.timeout = timeout;
    }
    if let Some(max) = args.max_redirects {
        config.max_redirects = max;
    }

    if !args.modules.is_empty() {
        for class in VulnerabilityType::ALL {
            config.set_enabled(class, false);
        }
        for module in &args.modules {
            config.set_enabled(module.class(), true);
        }
    }
    if args.auth {
        config.enable_auth_testing = true;
    }
    if let Some(ref path) = args.login_path {
        config.login_path = Some(path.clone());
    }
    if let Some(ref field) = args.username_field {
        config.username_field = field.clone();
    }
    if let Some(ref field) = args.password_field {
        config.password_field = field.clone();
    }
    if args.brute_force {
        config.brute_force_test = true;
    }
    if args.suspect_only {
        config.test_all_params = false;
    }
    if args.insecure {
        config.ignore_tls_errors = true;
    }
    if args.no_html {
        config.generate_html = false;
    }

    if config.enable_auth_testing && config.login_path_ref().is_none() {
        log::warn!("Auth testing is enabled but no login path is set; the module will do nothing");
    }

    Ok(config)
}

fn load_config_file(path: &Path) -> anyhow::Result<ScanConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file '{}'", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("invalid config file '{}'", path.display()))
}

fn build_target(args: &Args) -> anyhow::Result<Target> {
    let mut target = Target::new(args.target.trim());
    target.method = args.method;

    for raw in &args.headers {
        let (name, value) = parse_header(raw)?;
        target = target.with_header(name, value);
    }
    for cookie in &args.cookies {
        target = target.with_cookie(cookie.trim());
    }
    if let Some(ref creds) = args.user {
        let (user, pass) = creds.split_once(':').unwrap_or((creds.as_str(), ""));
        target = target.with_basic_auth(user, pass);
    }
    Ok(target)
}

/// Parses `"Name: value"`.
fn parse_header(raw: &str) -> anyhow::Result<(String, String)> {
    match raw.split_once(':') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.trim().to_string()))
        }
        _ => bail!("invalid header '{}', expected \"Name: value\"", raw),
    }
}

/// Asks on stdin; anything but y/yes keeps verification on.
fn confirm_insecure_tls() -> bool {
    print!(
        "{} ",
        "[?] Disable TLS certificate verification for this scan? [y/N]".yellow().bold()
    );
    io::stdout().flush().ok();

    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn print_scan_config(target: &Target, config: &ScanConfig, output: &Path) {
    let modules: Vec<String> = config
        .enabled_classes()
        .iter()
        .map(|c| c.to_string())
        .collect();

    out(format!("[+] Target:        {} ({})", target.url, target.method).green().bold());
    out(format!("[+] Payload level: {}", config.payload_level).blue());
    out(format!("[+] Timeout:       {}s", config.timeout).blue());
    out(format!("[+] Max redirects: {}", config.max_redirects).blue());
    out(format!("[+] Modules:       {}", modules.join(", ")).magenta().bold());
    out(format!("[+] Output:        {}", output.display()).blue());
    if !target.headers.is_empty() {
        out(format!("[+] Headers:       {} custom", target.headers.len()).yellow());
    }
    if !target.cookies.is_empty() {
        out(format!("[+] Cookies:       {}", target.cookies.len()).yellow());
    }
    if let Some(path) = config.login_path_ref() {
        out(format!("[+] Login path:    {}", path).yellow());
    }
    if !config.test_all_params {
        out("[+] Parameters:    suspect names only".yellow());
    }
    if config.ignore_tls_errors {
        out("[+] TLS:           verification off requested".red());
    }
    out("──────────────────────────────────────────────────".dimmed());
}
