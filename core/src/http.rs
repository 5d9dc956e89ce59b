//! HTTP request and response types exchanged with a `Transport`.
//!
//! # Design
//! Requests and responses are plain data. The API is read-only, so every
//! request is a bodyless GET and carries only a URL and headers.
//! `QiitaClient` builds an `HttpRequest`, hands it to a transport, and
//! classifies the returned `HttpResponse`. Callers that want to run the round-trip themselves can use
//! `build_*` / `parse_*` directly and never touch the transport.
//!
//! Header names are stored lowercase. Bodies are owned buffers, so a response
//! is released as soon as it goes out of scope on any path.

use url::Url;

/// A GET request described as plain data.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: Url,
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    /// Value of the first header named `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Insert a header, replacing any existing header with the same name.
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        let name = name.to_ascii_lowercase();
        self.headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Body as text, replacing invalid UTF-8. Used for diagnostics only.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> HttpRequest {
        HttpRequest {
            url: Url::parse("http://localhost:3000/").unwrap(),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
        }
    }

    #[test]
    fn set_header_replaces_case_insensitively() {
        let mut req = request();
        req.set_header("Content-Type", "text/plain");
        assert_eq!(req.headers, vec![("content-type".to_string(), "text/plain".to_string())]);
    }

    #[test]
    fn set_header_appends_new_names() {
        let mut req = request();
        req.set_header("X-Trace", "abc");
        assert_eq!(req.headers.len(), 2);
        assert_eq!(req.header("x-trace"), Some("abc"));
    }

    #[test]
    fn body_text_is_lossy() {
        let resp = HttpResponse::new(500, vec![b'o', b'k', 0xff]);
        assert_eq!(resp.body_text(), "ok\u{fffd}");
    }
}
