//! Response heuristics shared by the detection modules.
//!
//! Everything here is a pure function of response data, so each rule can be
//! tested without a server.

/// Database error fragments that betray an unescaped query.
pub const SQL_ERROR_PATTERNS: [&str; 11] = [
    "SQL syntax",
    "mysql_fetch_array",
    "ORA-",
    "Oracle Error",
    "Microsoft SQL Server",
    "PostgreSQL",
    "SQLite3::",
    "SQLITE_ERROR",
    "Warning: mysql",
    "ODBC SQL Server Driver",
    "syntax error",
];

/// Parameter name fragments that hint at a file or path argument.
pub const SUSPECT_PARAMS: [&str; 9] = [
    "page", "file", "path", "include", "require", "doc", "document", "img", "src",
];

/// Response headers that carry an anti-CSRF token.
pub const CSRF_HEADERS: [&str; 4] = ["X-CSRF-Token", "X-CSRFToken", "X-XSRF-TOKEN", "CSRF-Token"];

/// Security headers checked on every target, with the value they should contain.
pub const SECURITY_HEADERS: [(&str, Option<&str>); 5] = [
    ("X-Content-Type-Options", Some("nosniff")),
    ("X-Frame-Options", None),
    ("Content-Security-Policy", None),
    ("X-XSS-Protection", None),
    ("Strict-Transport-Security", None),
];

const LOGIN_REDIRECT_HINTS: [&str; 3] = ["dashboard", "admin", "account"];

const LOGIN_SUCCESS_WORDS: [&str; 6] = [
    "welcome",
    "dashboard",
    "logged in",
    "success",
    "account",
    "profile",
];

const LOGIN_REJECTION_WORDS: [&str; 4] = ["login", "password", "error", "invalid"];

const LOCKOUT_STATUSES: [u16; 3] = [429, 423, 403];

const LOCKOUT_WORDS: [&str; 5] = ["locked", "too many", "captcha", "try again later", "rate limit"];

/// First database error pattern found in `body`, in list order.
pub fn sql_error_pattern(body: &str) -> Option<&'static str> {
    SQL_ERROR_PATTERNS
        .into_iter()
        .find(|pattern| body.contains(pattern))
}

/// Blind injection signal: status changed and the body length moved by more
/// than 20% from the baseline.
pub fn is_blind_deviation(
    baseline_status: u16,
    baseline_len: usize,
    status: u16,
    len: usize,
) -> bool {
    if status == baseline_status {
        return false;
    }
    let base = baseline_len as f64;
    let len = len as f64;
    len < base * 0.8 || len > base * 1.2
}

/// Content fragments proving that `payload` pulled in the expected file.
/// Empty for payloads that cannot be verified from the response.
pub fn file_fingerprints(payload: &str) -> &'static [&'static str] {
    match payload {
        "../../../../../etc/passwd" | "/etc/passwd" => &["root:", "nobody:", "/bin/", "/home/"],
        r"..\..\..\..\..\windows\win.ini" => &["[extensions]", "[fonts]", "[mci extensions]"],
        _ => &[],
    }
}

/// First fingerprint of `payload` present in `body`.
pub fn file_fingerprint(payload: &str, body: &str) -> Option<&'static str> {
    file_fingerprints(payload)
        .iter()
        .copied()
        .find(|fingerprint| body.contains(fingerprint))
}

pub fn is_suspect_param(name: &str) -> bool {
    let name = name.to_lowercase();
    SUSPECT_PARAMS.iter().any(|suspect| name.contains(suspect))
}

/// A `<form` with no mention of a CSRF token anywhere in the page.
pub fn form_without_csrf_token(body: &str) -> bool {
    let lower = body.to_lowercase();
    lower.contains("<form") && !lower.contains("csrf") && !lower.contains("token")
}

/// Misconfiguration payloads that name a path (or URL) rather than a header.
pub fn is_path_probe(value: &str) -> bool {
    value.starts_with('/') || value.contains(':')
}

/// Login outcome judged from the response alone.
///
/// Any one of these counts as success: a 302 towards a dashboard-like
/// location, a success word in the body, or a body with no rejection word.
///
/// Any other 3xx is a failure and its body is ignored.
pub fn login_succeeded(status: u16, location: Option<&str>, body: &str) -> bool {
    let towards_account = location
        .map(|loc| LOGIN_REDIRECT_HINTS.iter().any(|hint| loc.contains(hint)))
        .unwrap_or(false);
    if status == 302 && towards_account {
        return true;
    }
    if (300..400).contains(&status) {
        return false;
    }

    let lower = body.to_lowercase();
    if LOGIN_SUCCESS_WORDS.iter().any(|word| lower.contains(word)) {
        return true;
    }

    !LOGIN_REJECTION_WORDS.iter().any(|word| lower.contains(word))
}

/// The server throttled or locked out a login attempt.
pub fn is_lockout_response(status: u16, body: &str) -> bool {
    if LOCKOUT_STATUSES.contains(&status) {
        return true;
    }
    let lower = body.to_lowercase();
    LOCKOUT_WORDS.iter().any(|word| lower.contains(word))
}
