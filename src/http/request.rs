use reqwest::header::{HeaderMap as Headers, HeaderName, HeaderValue};

use crate::http::types::{Method, parse_url};
use crate::{CollrunError, Result};

/// A fully resolved request, ready for a [`Transport`](crate::http::Transport)
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub url: url::Url,
    pub headers: Headers,
    /// Empty when the template had no body
    pub body: String,
}

impl Request {
    /// Parse `method` and `url`; headers and body start empty
    pub fn new(method: &str, url: &str) -> Result<Self> {
        Ok(Self {
            method: method.parse()?,
            url: parse_url(url)?,
            headers: Headers::new(),
            body: String::new(),
        })
    }

    /// Set a header, replacing any existing value for the same name
    pub fn set_header(&mut self, key: &str, value: &str) -> Result<()> {
        let header_name: HeaderName = key.parse().map_err(|e| CollrunError::InvalidHeader {
            name: key.to_string(),
            message: format!("{}", e),
        })?;
        let header_value = HeaderValue::from_str(value).map_err(|e| CollrunError::InvalidHeader {
            name: key.to_string(),
            message: format!("{}", e),
        })?;
        self.headers.insert(header_name, header_value);
        Ok(())
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Result<Self> {
        self.set_header(key, value)?;
        Ok(self)
    }

    /// Header value as text, if present and visible ASCII
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key).and_then(|v| v.to_str().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_request() {
        let request = Request::new("post", "http://example.com/users").unwrap();
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.url.path(), "/users");
        assert!(request.headers.is_empty());
        assert!(request.body.is_empty());
    }

    #[test]
    fn test_header_override() {
        let request = Request::new("GET", "http://example.com")
            .unwrap()
            .with_header("X-Id", "first")
            .unwrap()
            .with_header("x-id", "second")
            .unwrap();

        assert_eq!(request.headers.len(), 1);
        assert_eq!(request.header("X-Id"), Some("second"));
    }

    #[test]
    fn test_invalid_header() {
        let mut request = Request::new("GET", "http://example.com").unwrap();
        assert!(matches!(
            request.set_header("bad header", "v"),
            Err(CollrunError::InvalidHeader { .. })
        ));
        assert!(request.set_header("X-Line", "a\nb").is_err());
    }
}
