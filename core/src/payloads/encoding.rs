use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::fmt::Write as _;

/// Characters left untouched by query escaping.
const QUERY_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Filter-evasion transforms applied to raw payload text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingScheme {
    Url,
    DoubleUrl,
    Html,
    Base64,
    Hex,
}

impl EncodingScheme {
    pub const ALL: [EncodingScheme; 5] = [
        EncodingScheme::Url,
        EncodingScheme::DoubleUrl,
        EncodingScheme::Html,
        EncodingScheme::Base64,
        EncodingScheme::Hex,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            EncodingScheme::Url => "url",
            EncodingScheme::DoubleUrl => "double-url",
            EncodingScheme::Html => "html",
            EncodingScheme::Base64 => "base64",
            EncodingScheme::Hex => "hex",
        }
    }

    /// Case-insensitive lookup; `None` for unknown names.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|scheme| scheme.name().eq_ignore_ascii_case(name.trim()))
    }

    pub fn apply(&self, raw: &str) -> String {
        match self {
            EncodingScheme::Url => query_escape(raw),
            EncodingScheme::DoubleUrl => query_escape(&query_escape(raw)),
            EncodingScheme::Html => html_escape(raw),
            EncodingScheme::Base64 => STANDARD.encode(raw.as_bytes()),
            EncodingScheme::Hex => hex_escape(raw),
        }
    }
}

/// Applies the named scheme. Unknown schemes return the input unchanged.
pub fn encode(raw: &str, scheme: &str) -> String {
    match EncodingScheme::from_name(scheme) {
        Some(scheme) => scheme.apply(raw),
        None => raw.to_string(),
    }
}

/// Query-component escaping: unreserved bytes kept, space as `+`, the rest `%XX`.
fn query_escape(raw: &str) -> String {
    utf8_percent_encode(raw, QUERY_ESCAPE)
        .to_string()
        .replace("%20", "+")
}

fn html_escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&#39;"),
            '"' => out.push_str("&#34;"),
            _ => out.push(ch),
        }
    }
    out
}

fn hex_escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() * 3);
    for byte in raw.bytes() {
        let _ = write!(out, "%{:02x}", byte);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "<script>alert('XSS')</script>";

    #[test]
    fn test_url_encoding() {
        assert_eq!(encode("a b&c=d", "url"), "a+b%26c%3Dd");
        assert_eq!(encode("safe-_.~", "url"), "safe-_.~");
        assert_ne!(encode(SAMPLE, "url"), SAMPLE);
    }

    #[test]
    fn test_double_url_encoding() {
        assert_eq!(encode("'", "double-url"), "%2527");
        assert_eq!(encode("a b", "double-url"), "a%2Bb");
    }

    #[test]
    fn test_html_encoding() {
        assert_eq!(
            encode(SAMPLE, "html"),
            "&lt;script&gt;alert(&#39;XSS&#39;)&lt;/script&gt;"
        );
        assert_eq!(encode(r#"a&"b""#, "html"), "a&amp;&#34;b&#34;");
    }

    #[test]
    fn test_base64_encoding() {
        assert_eq!(encode("XSS", "base64"), "WFNT");
        assert_eq!(encode("ab", "base64"), "YWI=");
        assert_ne!(encode(SAMPLE, "base64"), SAMPLE);
    }

    #[test]
    fn test_hex_encoding() {
        assert_eq!(encode("A", "hex"), "%41");
        assert_eq!(encode("<a>", "hex"), "%3c%61%3e");
        assert_eq!(encode("é", "hex"), "%c3%a9");
    }

    #[test]
    fn test_unknown_scheme_is_identity() {
        assert_eq!(encode(SAMPLE, "rot13"), SAMPLE);
        assert_eq!(encode(SAMPLE, ""), SAMPLE);
    }

    #[test]
    fn test_scheme_names_case_insensitive() {
        assert_eq!(EncodingScheme::from_name("BASE64"), Some(EncodingScheme::Base64));
        assert_eq!(EncodingScheme::from_name("Double-URL"), Some(EncodingScheme::DoubleUrl));
        assert_eq!(encode("A", "HEX"), "%41");
    }

    #[test]
    fn test_schemes_disagree_on_reserved_input() {
        let outputs: Vec<String> = EncodingScheme::ALL.iter().map(|s| s.apply(SAMPLE)).collect();
        for (i, a) in outputs.iter().enumerate() {
            for b in outputs.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
