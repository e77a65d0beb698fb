//! Minimal line-based HTTP request parser for the trigger listener
//!
//! Deliberately not a general HTTP parser: it reads at most one small
//! buffer, decodes permissively (undecodable bytes are replaced, never
//! fatal), and extracts only the request-line path plus a handful of
//! headers looked up case-insensitively.

use std::net::IpAddr;

/// Upper bound on request bytes considered by the parser
///
/// A trigger request is a bare GET with a few headers; anything past
/// this is ignored.
pub const MAX_REQUEST_BYTES: usize = 1024;

/// A permissively parsed inbound trigger request
#[derive(Debug, Clone, Default)]
pub struct TriggerRequest {
    path: String,
    headers: Vec<(String, String)>,
}

impl TriggerRequest {
    /// Parse a raw request buffer
    ///
    /// Never fails: malformed input yields an empty path and no
    /// headers, which can never match a configured trigger.
    pub fn parse(raw: &[u8]) -> Self {
        let raw = &raw[..raw.len().min(MAX_REQUEST_BYTES)];
        let text = String::from_utf8_lossy(raw);
        let mut lines = text.split("\r\n");

        // Request line: "GET /path HTTP/1.1"
        let path = lines
            .next()
            .and_then(|line| line.split_whitespace().nth(1))
            .unwrap_or_default()
            .to_string();

        let mut headers = Vec::new();
        for line in lines {
            if line.is_empty() {
                // End of the header block; ignore any body bytes
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                headers.push((name.trim().to_string(), value.trim().to_string()));
            }
        }

        Self { path, headers }
    }

    /// Request path token from the request line
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Host header with any `:port` suffix stripped
    pub fn host(&self) -> Option<&str> {
        self.header("host")
            .map(|h| h.split(':').next().unwrap_or(h))
    }

    /// Case-insensitive header lookup (first occurrence wins)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Candidate IP of the caller
    ///
    /// Precedence: the CDN connecting-IP header wins over the generic
    /// forwarded-for header; the literal TCP peer address is the
    /// fallback when neither is present.
    pub fn client_ip(&self, peer: IpAddr) -> String {
        self.header("cf-connecting-ip")
            .or_else(|| self.header("x-forwarded-for"))
            .map(|v| v.to_string())
            .unwrap_or_else(|| peer.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    fn peer() -> IpAddr {
        IpAddr::V4(Ipv4Addr::new(9, 9, 9, 9))
    }

    fn request(lines: &[&str]) -> TriggerRequest {
        TriggerRequest::parse(lines.join("\r\n").as_bytes())
    }

    #[test]
    fn parses_path_from_request_line() {
        let req = request(&["GET /update HTTP/1.1", "Host: trigger.my.dyn.dns.com", ""]);
        assert_eq!(req.path(), "/update");
    }

    #[test]
    fn host_lookup_is_case_insensitive_and_strips_port() {
        let req = request(&["GET / HTTP/1.1", "hOsT: trigger.my.dyn.dns.com:8080", ""]);
        assert_eq!(req.host(), Some("trigger.my.dyn.dns.com"));
    }

    #[test]
    fn missing_host_is_none() {
        let req = request(&["GET / HTTP/1.1", ""]);
        assert_eq!(req.host(), None);
    }

    #[test]
    fn connecting_ip_header_beats_forwarded_for() {
        let req = request(&[
            "GET /update HTTP/1.1",
            "X-Forwarded-For: 1.2.3.4",
            "CF-Connecting-IP: 5.6.6.7",
            "",
        ]);
        assert_eq!(req.client_ip(peer()), "5.6.6.7");
    }

    #[test]
    fn forwarded_for_used_when_connecting_ip_absent() {
        let req = request(&["GET /update HTTP/1.1", "x-forwarded-for: 1.2.3.4", ""]);
        assert_eq!(req.client_ip(peer()), "1.2.3.4");
    }

    #[test]
    fn peer_address_is_the_fallback() {
        let req = request(&["GET /update HTTP/1.1", "Host: example.com", ""]);
        assert_eq!(req.client_ip(peer()), "9.9.9.9");
    }

    #[test]
    fn undecodable_bytes_do_not_fail_the_parse() {
        let mut raw = b"GET /update HTTP/1.1\r\nHost: a.example\r\n".to_vec();
        raw.extend_from_slice(&[0xff, 0xfe, 0xfd]);
        let req = TriggerRequest::parse(&raw);
        assert_eq!(req.path(), "/update");
        assert_eq!(req.host(), Some("a.example"));
    }

    #[test]
    fn oversized_input_is_truncated() {
        let mut raw = b"GET /update HTTP/1.1\r\n".to_vec();
        raw.extend(std::iter::repeat(b'a').take(4096));
        let req = TriggerRequest::parse(&raw);
        assert_eq!(req.path(), "/update");
    }

    #[test]
    fn empty_and_garbage_input_yield_no_match() {
        assert_eq!(TriggerRequest::parse(b"").path(), "");
        let req = TriggerRequest::parse(b"\r\n\r\n");
        assert_eq!(req.path(), "");
        assert_eq!(req.host(), None);
    }

    #[test]
    fn headers_after_blank_line_are_ignored() {
        let req = request(&[
            "GET / HTTP/1.1",
            "Host: a.example",
            "",
            "CF-Connecting-IP: 8.8.8.8",
        ]);
        assert_eq!(req.client_ip(peer()), "9.9.9.9");
    }
}
