//! Sample order used by the demo

use checkout_core::{Address, Amount, Customer, Decimal, Order, OrderLine, PaymentConfiguration};

/// Two-line DKK order with a fresh, caller-unique id
pub fn order() -> Order {
    let address = Address::new("Nygaardsvej 42", "Copenhagen", "DK", "1040");
    let lines = vec![
        OrderLine::new("123981239", "Chaos Emerald", 1, Decimal::ONE),
        OrderLine::new("123981240", "Delivery", 1, Decimal::ONE),
    ];
    let total: Decimal = lines.iter().map(OrderLine::total).sum();

    Order::new(
        format!("DemoApp-{}", uuid::Uuid::new_v4()),
        Amount::new(total, "DKK"),
        lines,
        Customer {
            first_name: "John".into(),
            last_name: "Doe".into(),
            email: "test@example.com".into(),
            billing_address: address.clone(),
            shipping_address: address,
        },
    )
    .with_transaction_info("source", "checkout-demo")
}

/// Redirect-style payment, manual capture, Danish locale
pub fn configuration() -> PaymentConfiguration {
    PaymentConfiguration::default()
}
