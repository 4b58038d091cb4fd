use reqwest::header::{HeaderMap as Headers, HeaderName, HeaderValue};

use crate::collection::Method;
use crate::http::body::EncodedBody;
use crate::{Result, RuloadError};

/// 发送前翻译为协议层效果的凭据
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Credentials {
    #[default]
    None,
    Basic { username: String, password: String },
    Bearer { token: String },
}

/// 构建完成、可直接发送的请求
#[derive(Debug)]
pub struct Request {
    pub method: Method,
    pub url: url::Url,
    pub headers: Headers,
    pub query: Vec<(String, String)>,
    pub body: Option<EncodedBody>,
    pub credentials: Credentials,
}

impl Request {
    pub fn new(method: Method, url: &str) -> Result<Self> {
        let url = url::Url::parse(url).map_err(|_| RuloadError::InvalidUrl(url.to_string()))?;
        Ok(Self {
            method,
            url,
            headers: Headers::new(),
            query: Vec::new(),
            body: None,
            credentials: Credentials::None,
        })
    }

    fn insert_header(&mut self, key: &str, value: &str) -> Result<()> {
        let name: HeaderName = key
            .parse()
            .map_err(|_| RuloadError::InvalidHeader(key.to_string()))?;
        let value: HeaderValue = value
            .parse()
            .map_err(|_| RuloadError::InvalidHeader(key.to_string()))?;
        self.headers.append(name, value);
        Ok(())
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Result<Self> {
        self.insert_header(key, value)?;
        Ok(self)
    }

    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_body(mut self, body: EncodedBody) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_basic_auth(mut self, username: &str, password: &str) -> Self {
        self.credentials = Credentials::Basic {
            username: username.to_string(),
            password: password.to_string(),
        };
        self
    }

    pub fn with_bearer_auth(mut self, token: &str) -> Self {
        self.credentials = Credentials::Bearer {
            token: token.to_string(),
        };
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_url_rejected() {
        let err = Request::new(Method::Get, "not a url").unwrap_err();
        assert!(matches!(err, RuloadError::InvalidUrl(_)));
    }

    #[test]
    fn test_invalid_header_rejected() {
        let request = Request::new(Method::Get, "http://example.test").unwrap();
        let err = request.with_header("bad header\n", "v").unwrap_err();
        assert!(matches!(err, RuloadError::InvalidHeader(_)));
    }

    #[test]
    fn test_headers_preserve_repeats() {
        let request = Request::new(Method::Get, "http://example.test")
            .unwrap()
            .with_header("X-Tag", "a")
            .unwrap()
            .with_header("X-Tag", "b")
            .unwrap();
        let values: Vec<_> = request.headers.get_all("X-Tag").iter().collect();
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn test_credentials_builders() {
        let request = Request::new(Method::Post, "http://example.test")
            .unwrap()
            .with_basic_auth("u", "p");
        assert_eq!(
            request.credentials,
            Credentials::Basic {
                username: "u".to_string(),
                password: "p".to_string()
            }
        );
    }
}
