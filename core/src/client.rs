//! The generic executor shared by every facade.
//!
//! # Design
//! `ZohoClient` owns the two collaborators (authenticator and transport) and
//! the random generator used for correlation ids. It is a cheap `Arc`
//! handle, so one client can back many facades and be used from many
//! threads. `invoke` runs bind → build → execute → decode for any
//! `Endpoint<T>`; it keeps no state between calls.

use std::fmt;
use std::sync::{Arc, Mutex};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::binder::bind;
use crate::config::{TenantConfig, TenantScope};
use crate::decode::decode;
use crate::endpoint::Endpoint;
use crate::error::{ApiError, RequestError};
use crate::param::{Param, Params};
use crate::request::RequestBuilder;
use crate::transport::{execute, Authenticator, Transport};

/// Characters correlation ids are drawn from.
pub const CORRELATION_KEYSPACE: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
pub const CORRELATION_ID_LEN: usize = 25;

/// A random diagnostic id. Not suitable for anything security related.
pub fn correlation_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..CORRELATION_ID_LEN)
        .map(|_| CORRELATION_KEYSPACE[rng.gen_range(0..CORRELATION_KEYSPACE.len())] as char)
        .collect()
}

/// Caller input for one invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Call {
    pub params: Params,
    pub body: Option<Value>,
    /// Win over descriptor and tenant headers.
    pub headers: Vec<(String, String)>,
}

impl Call {
    pub fn new(params: Params) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<Param>) -> Self {
        self.params.set(name, value);
        self
    }

    pub fn body<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, RequestError> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

impl From<Params> for Call {
    fn from(params: Params) -> Self {
        Self::new(params)
    }
}

struct Shared {
    authenticator: Box<dyn Authenticator>,
    transport: Box<dyn Transport>,
    rng: Mutex<SmallRng>,
}

/// Shared authenticator + transport context.
#[derive(Clone)]
pub struct ZohoClient {
    shared: Arc<Shared>,
}

impl ZohoClient {
    pub fn new(
        authenticator: impl Authenticator + 'static,
        transport: impl Transport + 'static,
    ) -> Self {
        Self::with_rng(authenticator, transport, SmallRng::from_entropy())
    }

    /// Deterministic correlation ids, for tests.
    pub fn with_seed(
        authenticator: impl Authenticator + 'static,
        transport: impl Transport + 'static,
        seed: u64,
    ) -> Self {
        Self::with_rng(authenticator, transport, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(
        authenticator: impl Authenticator + 'static,
        transport: impl Transport + 'static,
        rng: SmallRng,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                authenticator: Box::new(authenticator),
                transport: Box::new(transport),
                rng: Mutex::new(rng),
            }),
        }
    }

    /// Client over `ZOHO_ACCESS_TOKEN` and the blocking `ureq` transport.
    #[cfg(feature = "ureq")]
    pub fn from_env() -> Result<Self, crate::error::AuthError> {
        Ok(Self::new(
            crate::transport::StaticToken::from_env()?,
            crate::transport::UreqTransport::new(),
        ))
    }

    pub fn next_correlation_id(&self) -> String {
        let mut rng = self.shared.rng.lock().unwrap_or_else(|e| e.into_inner());
        correlation_id(&mut *rng)
    }

    /// Run one operation for `tenant`.
    ///
    /// Parameter errors surface before the authenticator or transport are
    /// touched.
    pub fn invoke<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint<T>,
        tenant: &TenantConfig,
        scope: &TenantScope,
        call: &Call,
    ) -> Result<T, ApiError> {
        let params = bind(endpoint, &call.params)?;
        let request = RequestBuilder::new(tenant, scope).build(
            endpoint,
            &params,
            call.body.as_ref(),
            &call.headers,
        )?;

        tracing::debug!(
            operation = endpoint.name,
            method = %request.method,
            url = %request.url,
            "dispatching request"
        );
        let response = execute(
            &request,
            self.shared.authenticator.as_ref(),
            self.shared.transport.as_ref(),
        )?;
        tracing::debug!(operation = endpoint.name, status = response.status, "response received");

        Ok(decode(&response)?)
    }
}

impl fmt::Debug for ZohoClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZohoClient").finish_non_exhaustive()
    }
}
