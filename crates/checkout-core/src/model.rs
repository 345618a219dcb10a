//! Domain Models
//!
//! Request and response types exchanged with the checkout API.
//! Field names follow the gateway's camelCase JSON keys exactly.
//! Money uses `rust_decimal` and goes over the wire as a JSON number.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{GatewayError, Result};

/// Monetary amount with its ISO-4217 currency code
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amount {
    #[serde(with = "rust_decimal::serde::float")]
    pub value: Decimal,
    pub currency: String,
}

impl Amount {
    pub fn new(value: Decimal, currency: impl Into<String>) -> Self {
        Self {
            value,
            currency: currency.into().to_uppercase(),
        }
    }
}

/// A single line on an order
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub item_id: String,
    pub description: String,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
}

impl OrderLine {
    pub fn new(
        item_id: impl Into<String>,
        description: impl Into<String>,
        quantity: u32,
        unit_price: Decimal,
    ) -> Self {
        Self {
            item_id: item_id.into(),
            description: description.into(),
            quantity,
            unit_price,
        }
    }

    /// quantity * unit price
    pub fn total(&self) -> Decimal {
        Decimal::from(self.quantity) * self.unit_price
    }
}

/// Postal address (country is ISO-3166 alpha-2)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: String,
    pub city: String,
    pub country: String,
    pub zip_code: String,
}

impl Address {
    pub fn new(
        street: impl Into<String>,
        city: impl Into<String>,
        country: impl Into<String>,
        zip_code: impl Into<String>,
    ) -> Self {
        Self {
            street: street.into(),
            city: city.into(),
            country: country.into().to_uppercase(),
            zip_code: zip_code.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub billing_address: Address,
    pub shipping_address: Address,
}

/// An order to be paid through the hosted checkout
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Caller-unique order reference
    pub order_id: String,

    pub amount: Amount,

    pub order_lines: Vec<OrderLine>,

    pub customer: Customer,

    /// Free-form merchant metadata passed through to the gateway
    #[serde(default)]
    pub transaction_info: HashMap<String, String>,
}

impl Order {
    pub fn new(
        order_id: impl Into<String>,
        amount: Amount,
        order_lines: Vec<OrderLine>,
        customer: Customer,
    ) -> Self {
        Self {
            order_id: order_id.into(),
            amount,
            order_lines,
            customer,
            transaction_info: HashMap::new(),
        }
    }

    pub fn with_transaction_info(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.transaction_info.insert(key.into(), value.into());
        self
    }

    /// Sum of all line totals
    pub fn lines_total(&self) -> Decimal {
        self.order_lines.iter().map(OrderLine::total).sum()
    }

    /// Check the order before it is sent anywhere
    pub fn validate(&self) -> Result<()> {
        if self.order_id.trim().is_empty() {
            return Err(GatewayError::InvalidConfiguration("order id is empty".into()));
        }

        if self.amount.value.is_sign_negative() {
            return Err(GatewayError::InvalidConfiguration(format!(
                "order {} has a negative amount",
                self.order_id
            )));
        }

        if self.amount.currency.len() != 3 {
            return Err(GatewayError::InvalidConfiguration(format!(
                "currency '{}' is not an ISO-4217 code",
                self.amount.currency
            )));
        }

        if let Some(line) = self.order_lines.iter().find(|l| l.quantity == 0) {
            return Err(GatewayError::InvalidConfiguration(format!(
                "order line {} has quantity 0",
                line.item_id
            )));
        }

        for address in [&self.customer.billing_address, &self.customer.shipping_address] {
            if address.country.len() != 2 {
                return Err(GatewayError::InvalidConfiguration(format!(
                    "country '{}' is not an ISO-3166 code",
                    address.country
                )));
            }
        }

        Ok(())
    }
}

/// How the gateway should run the payment
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentConfiguration {
    pub payment_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_display_type: Option<String>,
    pub body_format: String,
    pub auto_capture: bool,
    pub country: String,
    pub language: String,
}

impl Default for PaymentConfiguration {
    fn default() -> Self {
        Self {
            payment_type: "PAYMENT".into(),
            payment_display_type: Some("REDIRECT".into()),
            body_format: "JSON".into(),
            auto_capture: false,
            country: "DK".into(),
            language: "da".into(),
        }
    }
}

/// Configuration as echoed back on a created session
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationEcho {
    pub payment_type: String,
    #[serde(default)]
    pub payment_display_type: Option<String>,
    pub auto_capture: bool,
    pub country: String,
    pub language: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Callback {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

/// Merchant callbacks the gateway notifies when the payment concludes
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Callbacks {
    pub success: Callback,
    pub failure: Callback,
    pub redirect: String,
    pub notification: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_format: Option<String>,
}

/// Body of the session-creation request
#[derive(Clone, Debug, Serialize)]
pub struct CheckoutRequest<'a> {
    pub order: &'a Order,
    pub configuration: &'a PaymentConfiguration,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callbacks: Option<&'a Callbacks>,
}

/// Server-side checkout session
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSession {
    /// Opaque, server-assigned
    pub session_id: String,

    /// Browser context; shape is not interpreted
    #[serde(default)]
    pub context: serde_json::Value,

    pub order: Order,

    pub configuration: ConfigurationEcho,
}

/// Action attached to a payment method
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub value: Option<String>,
}

/// A selectable way to pay within a session
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethod {
    pub id: String,

    #[serde(rename = "type")]
    pub kind: String,

    pub name: String,

    pub description: String,

    #[serde(default)]
    pub logo_url: Option<String>,

    pub display: String,

    #[serde(rename = "onInitiatePayment")]
    pub initiate_action: Action,

    #[serde(rename = "onRenderCheck", default)]
    pub render_check_action: Option<Action>,

    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct PaymentMethodsResponse {
    pub methods: Vec<PaymentMethod>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PaymentInitiationRequest<'a> {
    pub payment_method_id: &'a str,
    pub session_id: &'a str,
}

/// Gateway response to a payment initiation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInitiation {
    pub payment_id: String,
    pub shop_order_id: String,
    pub status: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// Redirect target for the hosted payment page
    pub url: String,
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct AuthResponse {
    pub token: String,
}
