//! Redirect Classification
//!
//! While the hosted payment page is open, the embedding browser reports every
//! URL it is about to load. The classifier decides, exactly once per payment
//! attempt, whether one of those navigations means the payment concluded.
//!
//! Rules are checked in order against the lowercased full URL, path, and
//! query; the first match wins:
//!
//! | Outcome   | full URL contains                 | path        | query                                 |
//! |-----------|-----------------------------------|-------------|---------------------------------------|
//! | Success   | `success`, `approved`             | `success`   | `status=success`, `result=approved`   |
//! | Failure   | `failure`, `declined`, `error`    |             | `status=failure`, `error`             |
//! | Cancelled | `cancel`                          | `cancel`    | `cancelled=true`                      |
//!
//! Success is checked first, so a URL carrying both success and error markers
//! (e.g. `/error-success`) is a success.

use url::Url;

/// Why a payment attempt failed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureReason {
    PaymentDeclined,
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureReason::PaymentDeclined => f.write_str("Payment was declined or failed"),
        }
    }
}

/// Terminal result of a redirect flow
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RedirectOutcome {
    Success(Url),
    Failure(FailureReason),
    Cancelled,
}

/// What the browser should do with the navigation it asked about
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NavigationPolicy {
    #[default]
    Allow,
    Cancel,
}

/// Answer for one observed navigation
#[derive(Clone, Debug, PartialEq, Eq)]
#[must_use = "the navigation may have concluded the payment"]
pub struct NavigationDecision {
    pub policy: NavigationPolicy,
    /// Set only on the navigation that concluded the attempt
    pub outcome: Option<RedirectOutcome>,
}

impl NavigationDecision {
    fn proceed() -> Self {
        Self {
            policy: NavigationPolicy::Allow,
            outcome: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }
}

const SUCCESS_MARKERS: &[&str] = &["success", "approved"];
const SUCCESS_QUERY: &[&str] = &["status=success", "result=approved"];
const FAILURE_MARKERS: &[&str] = &["failure", "declined", "error"];
const FAILURE_QUERY: &[&str] = &["status=failure", "error"];
const CANCEL_MARKERS: &[&str] = &["cancel"];
const CANCEL_QUERY: &[&str] = &["cancelled=true"];

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// Classify a single URL; `None` means keep observing
pub fn classify(url: &Url) -> Option<RedirectOutcome> {
    let full = url.as_str().to_lowercase();
    let path = url.path().to_lowercase();
    let query = url.query().unwrap_or_default().to_lowercase();

    if contains_any(&full, SUCCESS_MARKERS)
        || path.contains("success")
        || contains_any(&query, SUCCESS_QUERY)
    {
        return Some(RedirectOutcome::Success(url.clone()));
    }

    if contains_any(&full, FAILURE_MARKERS) || contains_any(&query, FAILURE_QUERY) {
        return Some(RedirectOutcome::Failure(FailureReason::PaymentDeclined));
    }

    if contains_any(&full, CANCEL_MARKERS)
        || contains_any(&query, CANCEL_QUERY)
        || path.contains("cancel")
    {
        return Some(RedirectOutcome::Cancelled);
    }

    None
}

/// Per-attempt navigation observer
///
/// Feed it every navigation in order. After the first terminal outcome it is
/// spent and stops evaluating until `reset`.
#[derive(Debug, Default)]
pub struct RedirectClassifier {
    terminal_policy: NavigationPolicy,
    outcome: Option<RedirectOutcome>,
}

impl RedirectClassifier {
    /// Terminal navigations are allowed so the hosted result page can render
    pub fn new() -> Self {
        Self::default()
    }

    /// Choose whether the concluding navigation itself is loaded or stopped
    pub fn with_terminal_policy(policy: NavigationPolicy) -> Self {
        Self {
            terminal_policy: policy,
            outcome: None,
        }
    }

    /// Decide on the next navigation
    pub fn observe(&mut self, url: &Url) -> NavigationDecision {
        if self.outcome.is_some() {
            tracing::debug!(url = %url, "Redirect classifier already concluded; ignoring");
            return NavigationDecision {
                policy: self.terminal_policy,
                outcome: None,
            };
        }

        match classify(url) {
            Some(outcome) => {
                tracing::info!(url = %url, outcome = ?outcome, "Payment redirect concluded");
                self.outcome = Some(outcome.clone());
                NavigationDecision {
                    policy: self.terminal_policy,
                    outcome: Some(outcome),
                }
            }
            None => {
                tracing::trace!(url = %url, "Navigation continues");
                NavigationDecision::proceed()
            }
        }
    }

    /// Decide on a navigation reported as a raw string
    ///
    /// A target that does not parse as a URL is cancelled without concluding.
    pub fn observe_str(&mut self, raw: &str) -> NavigationDecision {
        match Url::parse(raw.trim()) {
            Ok(url) => self.observe(&url),
            Err(e) => {
                tracing::warn!(raw = %raw, error = %e, "Navigation target is not a URL");
                NavigationDecision {
                    policy: NavigationPolicy::Cancel,
                    outcome: None,
                }
            }
        }
    }

    /// The outcome recorded for this attempt, if any
    pub fn outcome(&self) -> Option<&RedirectOutcome> {
        self.outcome.as_ref()
    }

    pub fn is_spent(&self) -> bool {
        self.outcome.is_some()
    }

    /// Re-arm for a new payment attempt
    pub fn reset(&mut self) {
        self.outcome = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_status_markers() {
        assert_eq!(
            classify(&url("https://gw.example/callback?status=success")),
            Some(RedirectOutcome::Success(url("https://gw.example/callback?status=success")))
        );
        assert_eq!(
            classify(&url("https://gw.example/callback?status=failure")),
            Some(RedirectOutcome::Failure(FailureReason::PaymentDeclined))
        );
        assert_eq!(
            classify(&url("https://gw.example/callback?cancelled=true")),
            Some(RedirectOutcome::Cancelled)
        );
        assert_eq!(classify(&url("https://gw.example/callback?foo=bar")), None);
    }

    #[test]
    fn test_success_wins_over_error() {
        // regression: success is checked before failure
        assert!(matches!(
            classify(&url("https://gw.example/error-success")),
            Some(RedirectOutcome::Success(_))
        ));
    }

    #[test]
    fn test_failure_wins_over_cancel() {
        assert_eq!(
            classify(&url("https://gw.example/cancel?reason=declined")),
            Some(RedirectOutcome::Failure(FailureReason::PaymentDeclined))
        );
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        assert!(matches!(
            classify(&url("https://gw.example/Payment/APPROVED")),
            Some(RedirectOutcome::Success(_))
        ));
        assert_eq!(
            classify(&url("https://gw.example/result?Result=Declined")),
            Some(RedirectOutcome::Failure(FailureReason::PaymentDeclined))
        );
        assert_eq!(
            classify(&url("https://gw.example/Checkout/CANCEL")),
            Some(RedirectOutcome::Cancelled)
        );
    }

    #[test]
    fn test_classifier_concludes_once() {
        let mut classifier = RedirectClassifier::new();

        let first = classifier.observe(&url("https://gw.example/pay/step-2"));
        assert_eq!(first.policy, NavigationPolicy::Allow);
        assert!(!first.is_terminal());
        assert!(!classifier.is_spent());

        let done = classifier.observe(&url("https://gw.example/done?status=failure"));
        assert_eq!(done.policy, NavigationPolicy::Allow);
        assert_eq!(
            done.outcome,
            Some(RedirectOutcome::Failure(FailureReason::PaymentDeclined))
        );

        // spent: later navigations are not evaluated
        let later = classifier.observe(&url("https://gw.example/done?status=success"));
        assert!(!later.is_terminal());
        assert_eq!(
            classifier.outcome(),
            Some(&RedirectOutcome::Failure(FailureReason::PaymentDeclined))
        );

        classifier.reset();
        assert!(classifier.outcome().is_none());
        let again = classifier.observe(&url("https://gw.example/done?status=success"));
        assert!(matches!(again.outcome, Some(RedirectOutcome::Success(_))));
    }

    #[test]
    fn test_first_navigation_can_conclude() {
        let mut classifier = RedirectClassifier::new();
        let start = url("https://gw.example/pay/xyz?return=https://shop.example/cancel");

        let decision = classifier.observe(&start);
        assert_eq!(decision.outcome, Some(RedirectOutcome::Cancelled));
        assert!(classifier.is_spent());
    }

    #[test]
    fn test_terminal_policy_cancel() {
        let mut classifier = RedirectClassifier::with_terminal_policy(NavigationPolicy::Cancel);

        let pending = classifier.observe(&url("https://gw.example/pay"));
        assert_eq!(pending.policy, NavigationPolicy::Allow);

        let done = classifier.observe(&url("https://gw.example/checkout/cancel"));
        assert_eq!(done.policy, NavigationPolicy::Cancel);
        assert_eq!(done.outcome, Some(RedirectOutcome::Cancelled));
    }

    #[test]
    fn test_observe_str_rejects_garbage() {
        let mut classifier = RedirectClassifier::new();
        let decision = classifier.observe_str("not a url");
        assert_eq!(decision.policy, NavigationPolicy::Cancel);
        assert!(!decision.is_terminal());
        assert!(!classifier.is_spent());

        let decision = classifier.observe_str(" https://gw.example/ok?result=approved\n");
        assert!(matches!(decision.outcome, Some(RedirectOutcome::Success(_))));
    }
}
