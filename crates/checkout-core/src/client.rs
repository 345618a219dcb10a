//! Payment Flow
//!
//! Drives the hosted-checkout happy path:
//!
//! ```text
//! ensure_token ─▶ start_checkout ─▶ list_payment_methods ─▶ initiate_payment ─▶ redirect URL
//! ```
//!
//! Every step can be called (and retried) on its own. Nothing here retries
//! internally; each failure goes straight back to the caller.

use serde::de::DeserializeOwned;
use std::sync::Arc;
use url::Url;

use crate::credentials::CredentialProvider;
use crate::endpoint::ApiEndpoints;
use crate::error::{GatewayError, Result};
use crate::model::{
    Callbacks, CheckoutRequest, CheckoutSession, Order, PaymentConfiguration, PaymentInitiation,
    PaymentInitiationRequest, PaymentMethod, PaymentMethodsResponse,
};
use crate::session::{SessionManager, Token};
use crate::transport::{HttpRequest, HttpResponse, Transport};

/// Client for one gateway account
pub struct PaymentClient {
    transport: Arc<dyn Transport>,
    endpoints: ApiEndpoints,
    sessions: SessionManager,
}

impl PaymentClient {
    /// Create a new client
    pub fn new(
        transport: Arc<dyn Transport>,
        credentials: Arc<dyn CredentialProvider>,
        endpoints: ApiEndpoints,
    ) -> Self {
        let sessions = SessionManager::new(Arc::clone(&transport), credentials, endpoints.clone());
        Self {
            transport,
            endpoints,
            sessions,
        }
    }

    /// Token lifecycle for this client
    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    pub fn endpoints(&self) -> &ApiEndpoints {
        &self.endpoints
    }

    /// Create a checkout session for `order`
    pub async fn start_checkout(
        &self,
        order: &Order,
        configuration: &PaymentConfiguration,
    ) -> Result<CheckoutSession> {
        self.create_session(order, configuration, None).await
    }

    /// Create a checkout session that also registers merchant callbacks
    pub async fn start_checkout_with_callbacks(
        &self,
        order: &Order,
        configuration: &PaymentConfiguration,
        callbacks: &Callbacks,
    ) -> Result<CheckoutSession> {
        self.create_session(order, configuration, Some(callbacks)).await
    }

    async fn create_session(
        &self,
        order: &Order,
        configuration: &PaymentConfiguration,
        callbacks: Option<&Callbacks>,
    ) -> Result<CheckoutSession> {
        order.validate()?;
        let token = self.sessions.ensure_token().await?;

        let body = CheckoutRequest {
            order,
            configuration,
            callbacks,
        };
        let request = HttpRequest::post(self.endpoints.session())
            .bearer(token.as_str())
            .json(&body)?;

        let response = self.send(request, &token).await?;
        let session: CheckoutSession = decode(
            &response,
            GatewayError::SessionCreationFailed,
            GatewayError::SessionCreationFailed,
        )?;

        tracing::info!(
            session_id = %session.session_id,
            order_id = %order.order_id,
            "Checkout session created"
        );
        Ok(session)
    }

    /// Payment methods offered for a session; an empty list is not an error
    pub async fn list_payment_methods(&self, session_id: &str) -> Result<Vec<PaymentMethod>> {
        let url = self.endpoints.payment_methods(session_id)?;
        let token = self.sessions.ensure_token().await?;

        let request = HttpRequest::get(url).bearer(token.as_str());
        let response = self.send(request, &token).await?;
        let body: PaymentMethodsResponse = decode(
            &response,
            GatewayError::PaymentMethodsFetchFailed,
            GatewayError::PaymentMethodsFetchFailed,
        )?;

        tracing::info!(
            session_id = %session_id,
            count = body.methods.len(),
            "Fetched payment methods"
        );
        Ok(body.methods)
    }

    /// Start a payment and return the hosted page to redirect to
    pub async fn initiate_payment(&self, method_id: &str, session_id: &str) -> Result<Url> {
        let initiation = self.initiate_payment_details(method_id, session_id).await?;
        parse_redirect(&initiation.url)
    }

    /// Start a payment and return the full gateway response
    pub async fn initiate_payment_details(
        &self,
        method_id: &str,
        session_id: &str,
    ) -> Result<PaymentInitiation> {
        if session_id.is_empty() {
            return Err(GatewayError::MissingSessionId);
        }
        let token = self.sessions.ensure_token().await?;

        let body = PaymentInitiationRequest {
            payment_method_id: method_id,
            session_id,
        };
        let request = HttpRequest::post(self.endpoints.payment())
            .bearer(token.as_str())
            .json(&body)?;

        let response = self.send(request, &token).await?;
        let initiation: PaymentInitiation = decode(
            &response,
            GatewayError::PaymentInitiationFailed,
            GatewayError::InvalidResponse,
        )?;

        tracing::info!(
            session_id = %session_id,
            method_id = %method_id,
            payment_id = %initiation.payment_id,
            status = %initiation.status,
            "Payment initiated"
        );
        Ok(initiation)
    }

    /// Send a request authorized with `token`
    async fn send(&self, request: HttpRequest, token: &Token) -> Result<HttpResponse> {
        let method = request.method;
        let path = request.url.path().to_string();
        tracing::debug!(%method, %path, "Gateway request");

        let response = self.transport.send(request).await.map_err(|e| match e {
            GatewayError::Transport(_) => e,
            other => GatewayError::Transport(other.to_string()),
        })?;

        if response.is_unauthorized() {
            // only this request's token is known to be bad; a newer one may already be cached
            self.sessions.invalidate_rejected(token).await;
        }
        if !response.is_success() {
            tracing::warn!(%method, %path, status = response.status, "Gateway rejected request");
        }
        Ok(response)
    }
}

/// Map a response to `T`: non-2xx → `on_status`, shape mismatch → `on_body`
fn decode<T: DeserializeOwned>(
    response: &HttpResponse,
    on_status: fn(String) -> GatewayError,
    on_body: fn(String) -> GatewayError,
) -> Result<T> {
    if !response.is_success() {
        return Err(on_status(response.describe()));
    }
    response.json().map_err(on_body)
}

/// Redirect targets must be absolute URLs
fn parse_redirect(raw: &str) -> Result<Url> {
    Url::parse(raw.trim()).map_err(|_| GatewayError::InvalidUrl(raw.to_string()))
}
