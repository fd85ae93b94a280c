//! Request descriptors
//!
//! A [`RequestDescriptor`] is the fully assembled outbound call: method, URL,
//! headers and optional JSON body. Templates build one per invocation and the
//! transport sends it unchanged.

use crate::evolution::credentials::Credentials;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Header carrying the API key
pub const API_KEY_HEADER: &str = "apikey";

/// HTTP method of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single outbound request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestDescriptor {
    pub method: HttpMethod,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl RequestDescriptor {
    /// Bodiless request with the standard headers
    pub fn new(method: HttpMethod, url: String, credentials: &Credentials) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Accept".to_string(), "application/json".to_string());
        headers.insert(API_KEY_HEADER.to_string(), credentials.api_key.clone());

        Self {
            method,
            url,
            headers,
            body: None,
        }
    }

    /// GET `url`
    pub fn get(url: String, credentials: &Credentials) -> Self {
        Self::new(HttpMethod::Get, url, credentials)
    }

    /// DELETE `url`
    pub fn delete(url: String, credentials: &Credentials) -> Self {
        Self::new(HttpMethod::Delete, url, credentials)
    }

    /// POST `url` with a JSON body
    pub fn post_json(url: String, body: Value, credentials: &Credentials) -> Self {
        Self::new(HttpMethod::Post, url, credentials).with_json(body)
    }

    /// Attach a JSON body and its content type
    pub fn with_json(mut self, body: Value) -> Self {
        self.headers
            .insert("Content-Type".to_string(), "application/json".to_string());
        self.body = Some(body);
        self
    }

    /// Header value by exact name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(|s| s.as_str())
    }

    /// Copy with the API key replaced, for display
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if let Some(key) = copy.headers.get_mut(API_KEY_HEADER) {
            *key = "***".to_string();
        }
        copy
    }
}

/// Build `{server}/{path}/{segment...}`, percent-encoding each segment
pub fn api_url(credentials: &Credentials, path: &str, segments: &[&str]) -> String {
    let mut url = format!("{}/{}", credentials.base_url(), path.trim_matches('/'));
    for segment in segments {
        url.push('/');
        url.push_str(&urlencoding::encode(segment));
    }
    url
}

/// Append `?key=value` pairs, encoding keys and values; no-op when empty
pub fn with_query(url: String, pairs: &[(&str, &str)]) -> String {
    if pairs.is_empty() {
        return url;
    }

    let query: Vec<String> = pairs
        .iter()
        .map(|(key, value)| format!("{}={}", urlencoding::encode(key), urlencoding::encode(value)))
        .collect();

    format!("{}?{}", url, query.join("&"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn creds() -> Credentials {
        Credentials::new("https://evo.example.com/", "secret")
    }

    #[test]
    fn test_api_url_strips_trailing_slash() {
        let url = api_url(&creds(), "instance/connect", &["bot1"]);
        assert_eq!(url, "https://evo.example.com/instance/connect/bot1");
    }

    #[test]
    fn test_api_url_encodes_segments() {
        let url = api_url(&creds(), "/message/sendText/", &["my bot"]);
        assert_eq!(url, "https://evo.example.com/message/sendText/my%20bot");
    }

    #[test]
    fn test_with_query() {
        let url = with_query("https://x/a".to_string(), &[("instanceName", "a b")]);
        assert_eq!(url, "https://x/a?instanceName=a%20b");
        assert_eq!(with_query("https://x/a".to_string(), &[]), "https://x/a");
    }

    #[test]
    fn test_with_query_encodes_keys() {
        let url = with_query("https://x/a".to_string(), &[("a&b", "1"), ("number", "+55 11")]);
        assert_eq!(url, "https://x/a?a%26b=1&number=%2B55%2011");
    }

    #[test]
    fn test_content_type_only_with_body() {
        let get = RequestDescriptor::get("https://x/a".to_string(), &creds());
        assert_eq!(get.header("Content-Type"), None);
        assert_eq!(get.header(API_KEY_HEADER), Some("secret"));

        let post = RequestDescriptor::post_json("https://x/a".to_string(), json!({}), &creds());
        assert_eq!(post.header("Content-Type"), Some("application/json"));
    }

    #[test]
    fn test_redacted_masks_api_key() {
        let req = RequestDescriptor::get("https://x/a".to_string(), &creds());
        let redacted = req.redacted();
        assert_eq!(redacted.header(API_KEY_HEADER), Some("***"));
        assert_eq!(req.header(API_KEY_HEADER), Some("secret"));
    }

    #[test]
    fn test_serializes_method_uppercase() {
        let req = RequestDescriptor::delete("https://x/a".to_string(), &creds());
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["method"], "DELETE");
        assert!(value.get("body").is_none());
    }
}
