//! API Endpoints
//!
//! Builds the checkout API URLs from the gateway base URL.

use url::Url;

use crate::error::{GatewayError, Result};

/// API version segment
pub const API_VERSION: &str = "v1";

/// Resolves checkout API resources under `{base}/checkout/v1/api`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiEndpoints {
    root: Url,
}

impl ApiEndpoints {
    /// `base` may carry a path prefix but no query or fragment
    pub fn new(base: &Url) -> Result<Self> {
        if base.query().is_some() || base.fragment().is_some() {
            return Err(GatewayError::InvalidConfiguration(format!(
                "gateway base URL '{base}' must not have a query or fragment"
            )));
        }

        let mut root = base.clone();
        root.path_segments_mut()
            .map_err(|()| {
                GatewayError::InvalidConfiguration(format!(
                    "gateway base URL '{base}' cannot carry a path"
                ))
            })?
            .pop_if_empty()
            .extend(["checkout", API_VERSION, "api"]);

        Ok(Self { root })
    }

    pub fn parse(base: &str) -> Result<Self> {
        let url = Url::parse(base).map_err(|e| {
            GatewayError::InvalidConfiguration(format!("gateway base URL '{base}': {e}"))
        })?;
        Self::new(&url)
    }

    /// `{root}`
    pub fn root(&self) -> &Url {
        &self.root
    }

    /// `POST {root}/authenticate`
    pub fn authenticate(&self) -> Url {
        self.resource(&["authenticate"])
    }

    /// `POST {root}/session`
    pub fn session(&self) -> Url {
        self.resource(&["session"])
    }

    /// `GET {root}/session/{sessionId}/payment-methods`
    pub fn payment_methods(&self, session_id: &str) -> Result<Url> {
        if session_id.is_empty() {
            return Err(GatewayError::MissingSessionId);
        }
        Ok(self.resource(&["session", session_id, "payment-methods"]))
    }

    /// `POST {root}/payment`
    pub fn payment(&self) -> Url {
        self.resource(&["payment"])
    }

    fn resource(&self, segments: &[&str]) -> Url {
        let mut url = self.root.clone();
        // `new` rejects cannot-be-a-base URLs, so the segments are always writable
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}
