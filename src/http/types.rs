use std::fmt;
use std::str::FromStr;

use crate::{CollrunError, Result};

/// Request method. Anything outside the common set is carried as an
/// extension method, e.g. `PURGE` or `PROPFIND`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
    Extension(reqwest::Method),
}

impl FromStr for Method {
    type Err = CollrunError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        match upper.as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            "PATCH" => Ok(Method::Patch),
            "HEAD" => Ok(Method::Head),
            "OPTIONS" => Ok(Method::Options),
            // must still be a valid token
            _ => reqwest::Method::from_bytes(upper.as_bytes())
                .map(Method::Extension)
                .map_err(|_| CollrunError::InvalidMethod(s.to_string())),
        }
    }
}

impl Method {
    pub fn as_str(&self) -> &str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
            Method::Extension(method) => method.as_str(),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
            Method::Patch => reqwest::Method::PATCH,
            Method::Head => reqwest::Method::HEAD,
            Method::Options => reqwest::Method::OPTIONS,
            Method::Extension(method) => method,
        }
    }
}

/// Parse a resolved URL. A missing scheme defaults to `http://`.
pub fn parse_url(s: &str) -> Result<url::Url> {
    let input = s.trim();
    if input.is_empty() {
        return Err(CollrunError::InvalidUrl("empty URL".to_string()));
    }

    match url::Url::parse(input) {
        Ok(url) if url.has_host() => Ok(url),
        Ok(_) | Err(url::ParseError::RelativeUrlWithoutBase) if !input.contains("://") => {
            url::Url::parse(&format!("http://{}", input))
                .map_err(|e| CollrunError::InvalidUrl(format!("{}: {}", input, e)))
        }
        Ok(_) => Err(CollrunError::InvalidUrl(format!("{}: missing host", input))),
        Err(e) => Err(CollrunError::InvalidUrl(format!("{}: {}", input, e))),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status(u16);

impl Status {
    pub fn new(code: u16) -> Result<Self> {
        if (100..600).contains(&code) {
            Ok(Self(code))
        } else {
            Err(CollrunError::ParseError(format!(
                "Invalid HTTP status code: {}",
                code
            )))
        }
    }

    pub fn code(&self) -> u16 {
        self.0
    }

    /// 2xx
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parse() {
        assert_eq!("get".parse::<Method>().unwrap(), Method::Get);
        assert_eq!("PATCH".parse::<Method>().unwrap(), Method::Patch);
        assert!(matches!(
            "NOT VALID".parse::<Method>(),
            Err(CollrunError::InvalidMethod(_))
        ));
        assert!(matches!("".parse::<Method>(), Err(CollrunError::InvalidMethod(_))));
    }

    #[test]
    fn test_method_parse_extension() {
        let method = "purge".parse::<Method>().unwrap();
        assert_eq!(method.as_str(), "PURGE");
        assert_eq!(reqwest::Method::from(method), reqwest::Method::from_bytes(b"PURGE").unwrap());

        assert_eq!("PROPFIND".parse::<Method>().unwrap().to_string(), "PROPFIND");
    }

    #[test]
    fn test_parse_full_url() {
        let url = parse_url("https://api.example.com:8443/v1/users?id=1").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_str(), Some("api.example.com"));
        assert_eq!(url.port(), Some(8443));
        assert_eq!(url.path(), "/v1/users");
        assert_eq!(url.query(), Some("id=1"));
    }

    #[test]
    fn test_parse_url_without_scheme() {
        let url = parse_url("localhost:3000/api").unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api");

        let url = parse_url("example.com/users").unwrap();
        assert_eq!(url.as_str(), "http://example.com/users");
    }

    #[test]
    fn test_parse_url_invalid() {
        assert!(parse_url("").is_err());
        assert!(parse_url("http://").is_err());
        assert!(parse_url("http://exa mple.com").is_err());
        assert!(parse_url("http://[::1/users").is_err());
    }

    #[test]
    fn test_status() {
        assert!(Status::new(204).unwrap().is_success());
        assert!(!Status::new(404).unwrap().is_success());
        assert!(Status::new(42).is_err());
    }
}
