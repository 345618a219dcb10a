//! Session Management
//!
//! Owns the bearer-token lifecycle. A token is fetched with Basic Auth the
//! first time one is needed, cached in memory, and reused until invalidated.
//!
//! ```text
//!            ensure_token()
//!   ┌───────┐ ──────────────▶ ┌─────────┐   Ok(token)   ┌───────┐
//!   │ Empty │                 │ Pending │ ────────────▶ │ Ready │
//!   └───────┘ ◀────────────── └─────────┘               └───────┘
//!       ▲          Err(_)                                   │
//!       └──────────── invalidate() / invalidate_rejected() ─┘
//! ```
//!
//! Callers arriving while an attempt is `Pending` join that attempt instead of
//! starting another; they all resolve with the same token or the same error.

use futures::future::{BoxFuture, FutureExt, Shared};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::credentials::CredentialProvider;
use crate::endpoint::ApiEndpoints;
use crate::error::{GatewayError, Result};
use crate::model::AuthResponse;
use crate::transport::{HttpRequest, Transport};

/// Opaque bearer token
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Token(<redacted>)")
    }
}

type AuthAttempt = Shared<BoxFuture<'static, Result<Token>>>;

enum TokenState {
    Empty,
    Pending {
        generation: u64,
        attempt: AuthAttempt,
    },
    Ready(Token),
}

struct TokenCell {
    state: TokenState,
    /// Bumped on every new attempt and on invalidation
    generation: u64,
}

/// Produces a valid bearer token on demand with as few authentication calls
/// as possible
pub struct SessionManager {
    transport: Arc<dyn Transport>,
    credentials: Arc<dyn CredentialProvider>,
    endpoints: ApiEndpoints,
    cell: Mutex<TokenCell>,
}

impl SessionManager {
    pub fn new(
        transport: Arc<dyn Transport>,
        credentials: Arc<dyn CredentialProvider>,
        endpoints: ApiEndpoints,
    ) -> Self {
        Self {
            transport,
            credentials,
            endpoints,
            cell: Mutex::new(TokenCell {
                state: TokenState::Empty,
                generation: 0,
            }),
        }
    }

    /// Return the cached token, or authenticate once and cache the result
    pub async fn ensure_token(&self) -> Result<Token> {
        let (generation, attempt) = {
            let mut cell = self.cell.lock().await;
            let joined = match &cell.state {
                TokenState::Ready(token) => {
                    tracing::debug!("Using cached gateway token");
                    return Ok(token.clone());
                }
                TokenState::Pending { generation, attempt } => {
                    tracing::debug!("Joining in-flight authentication");
                    Some((*generation, attempt.clone()))
                }
                TokenState::Empty => None,
            };

            match joined {
                Some(joined) => joined,
                None => {
                    cell.generation += 1;
                    let generation = cell.generation;
                    let attempt = self.authenticate().shared();
                    cell.state = TokenState::Pending {
                        generation,
                        attempt: attempt.clone(),
                    };
                    (generation, attempt)
                }
            }
        };

        let result = attempt.await;

        let mut cell = self.cell.lock().await;
        let current = matches!(
            &cell.state,
            TokenState::Pending { generation: g, .. } if *g == generation
        );
        if current {
            cell.state = match &result {
                Ok(token) => TokenState::Ready(token.clone()),
                Err(_) => TokenState::Empty,
            };
        }

        result
    }

    /// Drop the cached token; the next `ensure_token` re-authenticates
    pub async fn invalidate(&self) {
        let mut cell = self.cell.lock().await;
        if !matches!(cell.state, TokenState::Empty) {
            tracing::info!("Invalidating cached gateway token");
        }
        cell.generation += 1;
        cell.state = TokenState::Empty;
    }

    /// Drop the cached token only if it is the one the gateway rejected
    ///
    /// A rejection of an older token leaves a newer token, cached or still
    /// being fetched, in place.
    pub async fn invalidate_rejected(&self, rejected: &Token) {
        let mut cell = self.cell.lock().await;
        let current = match &cell.state {
            TokenState::Ready(token) => token == rejected,
            // the attempt may have resolved before its first waiter cached it
            TokenState::Pending { attempt, .. } => {
                matches!(attempt.peek(), Some(Ok(token)) if token == rejected)
            }
            TokenState::Empty => false,
        };

        if current {
            tracing::info!("Gateway rejected the cached token; invalidating");
            cell.generation += 1;
            cell.state = TokenState::Empty;
        } else {
            tracing::debug!("Gateway rejected a superseded token; keeping the current one");
        }
    }

    /// Whether a token is cached right now
    pub async fn has_token(&self) -> bool {
        matches!(self.cell.lock().await.state, TokenState::Ready(_))
    }

    /// Build the authentication future; owns everything it touches
    fn authenticate(&self) -> BoxFuture<'static, Result<Token>> {
        let transport = Arc::clone(&self.transport);
        let url = self.endpoints.authenticate();
        let authorization = self.credentials.basic_authorization();
        let username = self.credentials.username().to_string();

        async move {
            tracing::debug!(
                username = %username,
                transport = transport.name(),
                "Authenticating with gateway"
            );

            let request = HttpRequest::post(url).header("Authorization", authorization);
            let result = match transport.send(request).await {
                Ok(response) if response.is_success() => response
                    .json::<AuthResponse>()
                    .map_err(|e| {
                        GatewayError::AuthenticationFailed(format!("malformed response: {e}"))
                    })
                    .and_then(|body| {
                        if body.token.is_empty() {
                            Err(GatewayError::AuthenticationFailed("empty token".into()))
                        } else {
                            Ok(Token(body.token))
                        }
                    }),
                Ok(response) => Err(GatewayError::AuthenticationFailed(response.describe())),
                Err(e) => Err(GatewayError::AuthenticationFailed(e.to_string())),
            };

            match &result {
                Ok(_) => tracing::info!(username = %username, "Authenticated with gateway"),
                Err(e) => {
                    tracing::warn!(
                        username = %username,
                        error = %e,
                        "Gateway authentication failed"
                    );
                }
            }

            result
        }
        .boxed()
    }
}
