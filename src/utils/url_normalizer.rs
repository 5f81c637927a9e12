//! URL checks applied to submitted targets.
//!
//! All three helpers are pure functions over strings:
//!
//! - [`is_valid_url`] - syntactic check of a submitted target
//! - [`is_outside_domain`] - guard against links that point back at this service
//! - [`enforce_http`] - make sure a scheme is present before storing

use url::{Host, Url};

const HTTP_PREFIX: &str = "http://";

/// Prepends `http://` unless the input already starts with `http`.
///
/// Only the first four bytes are compared, so `https://...` passes through
/// unchanged and so does anything else starting with `http` (for instance
/// `httpfoo.com`). The result is guaranteed to carry *some* scheme, not
/// specifically a secure one.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(enforce_http("example.com"), "http://example.com");
/// assert_eq!(enforce_http("https://example.com"), "https://example.com");
/// ```
pub fn enforce_http(url: &str) -> String {
    if url.as_bytes().starts_with(b"http") {
        url.to_string()
    } else {
        format!("{}{}", HTTP_PREFIX, url)
    }
}

/// Returns `false` when `url` points at `domain` itself.
///
/// The check is textual: `url` matches when it equals `domain` exactly, or
/// when stripping one leading `http://`, then one `https://`, then one
/// `www.`, and cutting everything from the first `/`, leaves exactly
/// `domain`. Any other URL (subdomains and ports included) is outside.
///
/// # Examples
///
/// ```ignore
/// assert!(!is_outside_domain("https://www.example.com/path", "example.com"));
/// assert!(is_outside_domain("https://other.com", "example.com"));
/// ```
pub fn is_outside_domain(url: &str, domain: &str) -> bool {
    if url == domain {
        return false;
    }

    let host = url.strip_prefix("http://").unwrap_or(url);
    let host = host.strip_prefix("https://").unwrap_or(host);
    let host = host.strip_prefix("www.").unwrap_or(host);
    let host = host.split('/').next().unwrap_or(host);

    host != domain
}

/// Checks that `input` is a usable absolute URL.
///
/// Accepts URLs with a scheme and a host (`https://example.com/a`), and bare
/// targets that become one once `http://` is prepended, provided their host
/// looks like a real one: an IP literal, `localhost`, or a dotted name
/// (`example.com/a`, `10.0.0.1:8080`).
///
/// Whitespace and control characters are rejected outright: the input is
/// stored as submitted and later sent back in a `Location` header.
pub fn is_valid_url(input: &str) -> bool {
    if input.is_empty()
        || input
            .chars()
            .any(|c| c.is_whitespace() || c.is_control())
    {
        return false;
    }

    match Url::parse(input) {
        Ok(url) if url.host_str().is_some_and(|h| !h.is_empty()) => true,
        // `localhost:3000` parses as scheme `localhost`; retry as a bare host.
        Ok(_) | Err(url::ParseError::RelativeUrlWithoutBase) => {
            Url::parse(&format!("{}{}", HTTP_PREFIX, input))
                .ok()
                .is_some_and(|url| has_plausible_host(&url))
        }
        Err(_) => false,
    }
}

fn has_plausible_host(url: &Url) -> bool {
    match url.host() {
        Some(Host::Domain(name)) => {
            name == "localhost"
                || (name.contains('.') && !name.starts_with('.') && !name.ends_with('.'))
        }
        Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => true,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enforce_http_adds_scheme() {
        assert_eq!(enforce_http("example.com"), "http://example.com");
        assert_eq!(enforce_http("www.example.com/a"), "http://www.example.com/a");
    }

    #[test]
    fn test_enforce_http_keeps_existing_scheme() {
        assert_eq!(enforce_http("http://example.com"), "http://example.com");
        assert_eq!(enforce_http("https://example.com/x"), "https://example.com/x");
    }

    #[test]
    fn test_enforce_http_short_inputs() {
        assert_eq!(enforce_http(""), "http://");
        assert_eq!(enforce_http("htt"), "http://htt");
        assert_eq!(enforce_http("a.b"), "http://a.b");
    }

    #[test]
    fn test_enforce_http_loose_prefix() {
        assert_eq!(enforce_http("httpxyz.com"), "httpxyz.com");
        assert_eq!(enforce_http("HTTP://example.com"), "http://HTTP://example.com");
    }

    #[test]
    fn test_enforce_http_ftp_gains_prefix() {
        assert_eq!(enforce_http("ftp://example.com"), "http://ftp://example.com");
    }

    #[test]
    fn test_outside_domain_exact_match() {
        assert!(!is_outside_domain("example.com", "example.com"));
    }

    #[test]
    fn test_outside_domain_with_scheme_www_and_path() {
        assert!(!is_outside_domain("https://www.example.com/path", "example.com"));
        assert!(!is_outside_domain("http://example.com/", "example.com"));
        assert!(!is_outside_domain("www.example.com", "example.com"));
    }

    #[test]
    fn test_outside_domain_other_hosts() {
        assert!(is_outside_domain("https://other.com", "example.com"));
        assert!(is_outside_domain("https://api.example.com", "example.com"));
        assert!(is_outside_domain("https://example.com.evil.io", "example.com"));
    }

    #[test]
    fn test_outside_domain_with_port() {
        assert!(!is_outside_domain("http://localhost:3000/abc", "localhost:3000"));
        assert!(is_outside_domain("http://localhost:3001/abc", "localhost:3000"));
    }

    #[test]
    fn test_outside_domain_strips_only_once() {
        assert!(!is_outside_domain("http://https://example.com", "example.com"));
        assert!(is_outside_domain("www.www.example.com", "example.com"));
    }

    #[test]
    fn test_valid_url_with_scheme() {
        assert!(is_valid_url("https://example.com"));
        assert!(is_valid_url("http://example.com/path?q=1#top"));
        assert!(is_valid_url("ftp://files.example.com/a.txt"));
        assert!(is_valid_url("http://localhost:3000/x"));
    }

    #[test]
    fn test_valid_url_without_scheme() {
        assert!(is_valid_url("example.com"));
        assert!(is_valid_url("www.example.com/path"));
        assert!(is_valid_url("localhost:3000"));
        assert!(is_valid_url("192.168.0.1:8080/admin"));
    }

    #[test]
    fn test_invalid_urls() {
        assert!(!is_valid_url(""));
        assert!(!is_valid_url("not a url"));
        assert!(!is_valid_url("justtext"));
        assert!(!is_valid_url("javascript:alert(1)"));
        assert!(!is_valid_url("http://"));
        assert!(!is_valid_url(".example.com"));
    }

    #[test]
    fn test_control_characters_are_invalid() {
        assert!(!is_valid_url("https://example.com/a\u{1}b"));
        assert!(!is_valid_url("https://example.com/\u{7f}"));
        assert!(!is_valid_url("example.com/\u{0}"));
        assert!(!is_valid_url("https://example.com/a\u{85}b"));
    }
}
