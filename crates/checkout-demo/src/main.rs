//! checkout-demo
//!
//! Walks through a hosted checkout against the configured gateway:
//! authenticate, create a session, list methods, initiate a payment, then
//! classify the URLs a browser would visit.
//!
//! There is no embedded browser here. Paste each URL the hosted page
//! navigates to (one per line) on stdin; the demo stops at the first URL
//! that concludes the payment.

mod sample;

use anyhow::{Context, bail};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use checkout_core::{NavigationPolicy, RedirectClassifier, RedirectOutcome, Url};
use checkout_runtime::{GatewayConfig, connect};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    let config = match GatewayConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("⚠ Gateway not configured: {}", e);
            tracing::warn!("  Set GATEWAY_USERNAME and GATEWAY_PASSWORD in .env");
            return Err(e.into());
        }
    };
    tracing::info!(base_url = %config.base_url, "Using gateway");

    let client = connect(&config)?;

    let order = sample::order();
    let session = client
        .start_checkout(&order, &sample::configuration())
        .await
        .inspect_err(|e| tracing::error!("✗ {}", e.user_message()))?;
    tracing::info!("✓ Checkout session {}", session.session_id);

    let methods = client
        .list_payment_methods(&session.session_id)
        .await
        .context("listing payment methods")?;
    if methods.is_empty() {
        bail!(
            "gateway offered no payment methods for session {}",
            session.session_id
        );
    }

    tracing::info!("Payment methods:");
    for method in &methods {
        tracing::info!("  • {} ({}) - {}", method.id, method.kind, method.name);
    }

    let chosen = match std::env::var("GATEWAY_METHOD_ID") {
        Ok(id) => methods
            .iter()
            .find(|m| m.id == id)
            .with_context(|| format!("GATEWAY_METHOD_ID '{id}' is not offered"))?,
        Err(_) => &methods[0],
    };

    let redirect = client
        .initiate_payment(&chosen.id, &session.session_id)
        .await
        .context("initiating payment")?;

    println!("Open the hosted payment page:\n  {redirect}\n");
    println!("Paste each URL the browser navigates to (Ctrl-D to stop):");

    match follow_redirects(&redirect, BufReader::new(tokio::io::stdin())).await? {
        Some(outcome) => report(&outcome),
        None => tracing::warn!("Input ended before the payment concluded"),
    }
    Ok(())
}

/// Classify the hosted page URL, then each navigation read from `input`,
/// until one of them concludes the payment
async fn follow_redirects<R>(redirect: &Url, input: R) -> anyhow::Result<Option<RedirectOutcome>>
where
    R: AsyncBufRead + Unpin,
{
    let mut classifier = RedirectClassifier::new();

    // the hosted page URL itself may already carry the result
    if let Some(outcome) = classifier.observe(redirect).outcome {
        return Ok(Some(outcome));
    }

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let decision = classifier.observe_str(&line);
        match (decision.outcome, decision.policy) {
            (Some(outcome), _) => return Ok(Some(outcome)),
            (None, NavigationPolicy::Cancel) => println!("  ✗ not a URL, navigation blocked"),
            (None, NavigationPolicy::Allow) => println!("  → continue"),
        }
    }

    Ok(None)
}

fn report(outcome: &RedirectOutcome) {
    match outcome {
        RedirectOutcome::Success(url) => println!("✓ Payment successful: {url}"),
        RedirectOutcome::Failure(reason) => println!("✗ Payment failed: {reason}"),
        RedirectOutcome::Cancelled => println!("∅ Payment cancelled"),
    }
}
