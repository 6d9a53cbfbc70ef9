//! Authenticated execution of bound requests.
//!
//! # Design
//! Two collaborators sit behind traits: an `Authenticator` that yields a
//! valid credential on demand (refreshing is its business), and a `Transport`
//! that performs the HTTP round-trip. `execute` glues them together and
//! classifies the outcome. Neither retries; retry policy belongs to the
//! transport implementation.

use std::fmt;

use serde::Deserialize;

use crate::error::{AuthError, NetworkError, TransportError};
use crate::http::{HttpRequest, HttpResponse};

pub const ENV_ACCESS_TOKEN: &str = "ZOHO_ACCESS_TOKEN";

/// Scheme Zoho expects in the `Authorization` header.
const AUTH_SCHEME: &str = "Zoho-oauthtoken";

/// An OAuth access token. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    fn authorization(&self) -> String {
        format!("{AUTH_SCHEME} {}", self.0)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Yields a currently valid credential. Must be safe to call concurrently;
/// implementations that refresh lazily keep at most one refresh in flight.
pub trait Authenticator: Send + Sync {
    fn current_credential(&self) -> Result<Credential, AuthError>;
}

/// Performs one HTTP round-trip. Non-2xx statuses are data, not errors.
pub trait Transport: Send + Sync {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, NetworkError>;
}

/// Authenticator over a fixed, externally managed access token.
#[derive(Debug, Clone)]
pub struct StaticToken(Credential);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Credential::new(token))
    }

    /// Read the token from `ZOHO_ACCESS_TOKEN`.
    pub fn from_env() -> Result<Self, AuthError> {
        match std::env::var(ENV_ACCESS_TOKEN) {
            Ok(token) if !token.is_empty() => Ok(Self::new(token)),
            _ => Err(AuthError::MissingToken(ENV_ACCESS_TOKEN)),
        }
    }
}

impl Authenticator for StaticToken {
    fn current_credential(&self) -> Result<Credential, AuthError> {
        Ok(self.0.clone())
    }
}

/// Attach the current credential, send, and classify the response.
///
/// Returns the response only for 2xx statuses. A non-2xx response with a
/// body becomes `TransportError::Status` (body kept for inspection), one
/// without a body `TransportError::EmptyResponse`.
pub fn execute(
    request: &HttpRequest,
    authenticator: &dyn Authenticator,
    transport: &dyn Transport,
) -> Result<HttpResponse, TransportError> {
    let credential = authenticator.current_credential()?;

    let mut request = request.clone();
    request.set_header("Authorization", credential.authorization());

    let response = transport.send(&request)?;
    if response.is_success() {
        return Ok(response);
    }

    if response.body.trim().is_empty() {
        return Err(TransportError::EmptyResponse {
            status: response.status,
        });
    }

    Err(TransportError::Status {
        status: response.status,
        message: error_message(&response.body),
        body: response.body,
    })
}

/// Zoho error bodies look like `{"code": 57, "message": "..."}`; CRM nests
/// them as `{"data": [{"code": "...", "message": "..."}]}`.
fn error_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        message: Option<String>,
        #[serde(default)]
        data: Vec<ErrorBody>,
    }

    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|e| e.message.or_else(|| e.data.into_iter().find_map(|d| d.message)))
        .unwrap_or_else(|| body.trim().to_string())
}

/// Blocking transport backed by `ureq`.
#[cfg(feature = "ureq")]
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

#[cfg(feature = "ureq")]
impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

#[cfg(feature = "ureq")]
impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "ureq")]
impl Transport for UreqTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, NetworkError> {
        use crate::http::HttpMethod;

        fn with_headers<B>(
            mut builder: ureq::RequestBuilder<B>,
            headers: &[(String, String)],
        ) -> ureq::RequestBuilder<B> {
            for (name, value) in headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            builder
        }

        let url = request.full_url();
        let headers = &request.headers;
        let body = request.body.as_deref();

        let result = match (request.method, body) {
            (HttpMethod::Get, _) => with_headers(self.agent.get(&url), headers).call(),
            (HttpMethod::Delete, _) => with_headers(self.agent.delete(&url), headers).call(),
            (HttpMethod::Post, Some(body)) => {
                with_headers(self.agent.post(&url), headers).send(body.as_bytes())
            }
            (HttpMethod::Post, None) => with_headers(self.agent.post(&url), headers).send_empty(),
            (HttpMethod::Put, Some(body)) => {
                with_headers(self.agent.put(&url), headers).send(body.as_bytes())
            }
            (HttpMethod::Put, None) => with_headers(self.agent.put(&url), headers).send_empty(),
        };

        let mut response = result.map_err(|e| NetworkError(e.to_string()))?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| NetworkError(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
