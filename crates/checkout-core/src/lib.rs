//! # checkout-core
//!
//! Client core for a hosted payment gateway: token lifecycle, the checkout
//! flow, and redirect-outcome classification.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       PaymentClient                          │
//! │  ┌────────────────┐  ┌───────────────┐  ┌─────────────────┐  │
//! │  │ SessionManager │──│ ApiEndpoints  │──│   Transport     │  │
//! │  │ (token cache)  │  │               │  │   (Strategy)    │  │
//! │  └────────────────┘  └───────────────┘  └─────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//!                 │ redirect URL
//!                 ▼
//!       ┌────────────────────┐   each navigation   ┌─────────┐
//!       │ RedirectClassifier │ ◀────────────────── │ browser │
//!       └────────────────────┘                     └─────────┘
//! ```
//!
//! The `Transport` trait keeps the core free of any HTTP stack; see
//! `checkout-runtime` for the reqwest implementation.

pub mod client;
pub mod credentials;
pub mod endpoint;
pub mod error;
pub mod model;
pub mod redirect;
pub mod session;
pub mod transport;

pub use client::PaymentClient;
pub use credentials::{CredentialProvider, Credentials};
pub use endpoint::ApiEndpoints;
pub use error::{GatewayError, Result};
pub use model::{
    Action, Address, Amount, Callback, Callbacks, CheckoutSession, ConfigurationEcho, Customer,
    Order, OrderLine, PaymentConfiguration, PaymentInitiation, PaymentMethod,
};
pub use redirect::{
    FailureReason, NavigationDecision, NavigationPolicy, RedirectClassifier, RedirectOutcome,
};
pub use session::{SessionManager, Token};
pub use transport::{HttpRequest, HttpResponse, Method, Transport};

// Re-exported so callers need no direct `url` / `rust_decimal` dependency
pub use rust_decimal::Decimal;
pub use url::Url;
