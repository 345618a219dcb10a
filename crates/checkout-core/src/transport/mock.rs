//! Mock Transport
//!
//! For testing and demo purposes. Replies are scripted per method + path and
//! every request is recorded so tests can assert on what went over the wire.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use super::{HttpRequest, HttpResponse, Method, Transport};
use crate::error::{GatewayError, Result};

#[derive(Clone, Debug)]
enum Reply {
    Respond(HttpResponse),
    Fail(String),
}

/// Scripted in-memory transport
///
/// Replies queued for a route are consumed in order; the last one is sticky
/// and keeps being returned. Unscripted routes answer `404`.
#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<(Method, String), VecDeque<Reply>>>,
    requests: Mutex<Vec<HttpRequest>>,
    latency: Option<Duration>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every reply (lets concurrent callers overlap in tests)
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Queue a response for `method path`
    pub fn respond(
        &self,
        method: Method,
        path: &str,
        status: u16,
        body: impl Into<String>,
    ) -> &Self {
        self.push(method, path, Reply::Respond(HttpResponse::new(status, body.into())))
    }

    /// Queue a connectivity failure for `method path`
    pub fn fail(&self, method: Method, path: &str, message: impl Into<String>) -> &Self {
        self.push(method, path, Reply::Fail(message.into()))
    }

    fn push(&self, method: Method, path: &str, reply: Reply) -> &Self {
        lock(&self.routes)
            .entry((method, path.to_string()))
            .or_default()
            .push_back(reply);
        self
    }

    /// All requests seen so far, in arrival order
    pub fn requests(&self) -> Vec<HttpRequest> {
        lock(&self.requests).clone()
    }

    /// Number of requests that hit `method path`
    pub fn count(&self, method: Method, path: &str) -> usize {
        lock(&self.requests)
            .iter()
            .filter(|r| r.method == method && r.url.path() == path)
            .count()
    }

    fn next_reply(&self, method: Method, path: &str) -> Option<Reply> {
        let mut routes = lock(&self.routes);
        let queue = routes.get_mut(&(method, path.to_string()))?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let method = request.method;
        let path = request.url.path().to_string();
        lock(&self.requests).push(request);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        match self.next_reply(method, &path) {
            Some(Reply::Respond(response)) => Ok(response),
            Some(Reply::Fail(message)) => Err(GatewayError::Transport(message)),
            None => Ok(HttpResponse::new(404, format!("no mock route for {method} {path}"))),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
