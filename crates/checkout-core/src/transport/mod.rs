//! HTTP Transport Strategy
//!
//! Defines the one capability the SDK needs from an HTTP stack: send a request,
//! get back a status and a body. The orchestrator works exclusively through
//! this interface, so a reqwest client, a platform networking layer, or a test
//! double can sit behind it without code changes.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use checkout_core::transport::{HttpRequest, Transport};
//!
//! let response = transport.send(HttpRequest::get(url)).await?;
//! if response.is_success() {
//!     let body: MyShape = response.json()?;
//! }
//! ```

mod mock;

pub use mock::MockTransport;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use std::collections::BTreeMap;
use url::Url;

use crate::error::{GatewayError, Result};

/// HTTP verbs used by the checkout API
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An outgoing request
#[derive(Clone, Debug)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: BTreeMap<String, String>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: BTreeMap::new(),
            body: None,
        }
    }

    pub fn get(url: Url) -> Self {
        Self::new(Method::Get, url)
    }

    pub fn post(url: Url) -> Self {
        Self::new(Method::Post, url)
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// `Authorization: Bearer <token>`
    pub fn bearer(self, token: &str) -> Self {
        self.header("Authorization", format!("Bearer {token}"))
    }

    /// Serialize `body` as JSON and set the content type
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        let bytes = serde_json::to_vec(body)
            .map_err(|e| GatewayError::InvalidConfiguration(format!("unserializable body: {e}")))?;
        self.body = Some(bytes);
        Ok(self.header("Content-Type", "application/json"))
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A raw response: status code plus body bytes
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    /// Decode the body; the error string describes the mismatch
    pub fn json<T: DeserializeOwned>(&self) -> std::result::Result<T, String> {
        serde_json::from_slice(&self.body).map_err(|e| e.to_string())
    }

    /// `HTTP <status>: <body prefix>` for error details
    pub fn describe(&self) -> String {
        let text = String::from_utf8_lossy(&self.body);
        let preview: String = text.chars().take(200).collect();
        if preview.is_empty() {
            format!("HTTP {}", self.status)
        } else {
            format!("HTTP {}: {}", self.status, preview)
        }
    }
}

/// Strategy trait for HTTP stacks
///
/// Implementations return `Ok` for any HTTP status, including errors; only a
/// failure to get a response at all (DNS, TLS, reset, timeout, cancellation)
/// is `Err(GatewayError::Transport)`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;

    /// Short name for logs
    fn name(&self) -> &str {
        "transport"
    }
}
