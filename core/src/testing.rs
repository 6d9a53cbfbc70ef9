//! In-memory collaborators for exercising facades without a network.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::{AuthError, NetworkError};
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::{Authenticator, Credential, Transport};

type Scripted = Result<HttpResponse, NetworkError>;

/// Transport that replays scripted outcomes in order and records every
/// request it receives. When the script runs out it answers `200 {}`.
///
/// Clones share the script and the recordings.
#[derive(Debug, Clone, Default)]
pub struct FakeTransport {
    script: Arc<Mutex<VecDeque<Scripted>>>,
    sent: Arc<Mutex<Vec<HttpRequest>>>,
    calls: Arc<AtomicUsize>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, status: u16, body: &str) -> Self {
        self.push(Ok(HttpResponse::new(status, body)));
        self
    }

    pub fn fail(self, message: &str) -> Self {
        self.push(Err(NetworkError(message.to_string())));
        self
    }

    fn push(&self, outcome: Scripted) {
        self.script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(outcome);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).last().cloned()
    }
}

impl Transport for FakeTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, NetworkError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.sent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request.clone());
        self.script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or_else(|| Ok(HttpResponse::new(200, "{}")))
    }
}

/// Authenticator with a fixed outcome that counts how often it was asked.
#[derive(Debug, Clone)]
pub struct FakeAuthenticator {
    outcome: Result<Credential, AuthError>,
    calls: Arc<AtomicUsize>,
}

impl FakeAuthenticator {
    pub fn token(token: &str) -> Self {
        Self {
            outcome: Ok(Credential::new(token)),
            calls: Arc::default(),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            outcome: Err(AuthError::Unavailable(reason.to_string())),
            calls: Arc::default(),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Authenticator for FakeAuthenticator {
    fn current_credential(&self) -> Result<Credential, AuthError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}
