//! # checkout-runtime
//!
//! Runtime wiring for the checkout SDK: a reqwest-backed `Transport` and
//! environment-driven configuration.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use checkout_runtime::{connect, GatewayConfig};
//!
//! let client = connect(&GatewayConfig::from_env()?)?;
//! let session = client.start_checkout(&order, &configuration).await?;
//! let methods = client.list_payment_methods(&session.session_id).await?;
//! let redirect = client.initiate_payment(&methods[0].id, &session.session_id).await?;
//! ```

pub mod config;
pub mod reqwest_transport;

use std::sync::Arc;

pub use config::GatewayConfig;
pub use reqwest_transport::ReqwestTransport;

// Re-export core types for convenience
pub use checkout_core::{
    GatewayError, NavigationPolicy, PaymentClient, RedirectClassifier, RedirectOutcome, Result,
};

/// Build a `PaymentClient` that talks to the configured gateway over reqwest
pub fn connect(config: &GatewayConfig) -> Result<PaymentClient> {
    let transport = ReqwestTransport::new(config.timeout)?;
    tracing::debug!(
        base_url = %config.base_url,
        timeout = ?config.timeout,
        "Gateway client configured"
    );

    Ok(PaymentClient::new(
        Arc::new(transport),
        Arc::new(config.credentials.clone()),
        config.endpoints()?,
    ))
}

/// `connect` with configuration from the environment
pub fn connect_from_env() -> Result<PaymentClient> {
    connect(&GatewayConfig::from_env()?)
}
