//! Endpoint execution core shared by the Zoho API clients.
//!
//! # Overview
//! Every Zoho operation is a static [`Endpoint`] descriptor: method, path
//! template, a table of [`ParamSpec`]s and the response type it decodes
//! into. Executing one runs the same pipeline for every module:
//!
//! 1. [`binder::bind`] merges endpoint defaults with caller params and
//!    checks required and one-of constraints.
//! 2. [`request::RequestBuilder`] renders the URL, query, body and tenant
//!    scoping into a plain [`HttpRequest`].
//! 3. [`transport::execute`] attaches the `Zoho-oauthtoken` credential,
//!    sends the request through a [`Transport`] and maps non-2xx statuses.
//! 4. [`decode::decode`] turns the body into the endpoint's response type.
//!
//! # Design
//! - Building a request touches no network, so steps 1 and 2 are fully
//!   deterministic. The I/O boundary is the [`Transport`] trait; the
//!   default `ureq` feature provides [`UreqTransport`].
//! - The module facades in [`api`] (Bookings, Books, CRM, Expense,
//!   Subscriptions) are thin typed wrappers around shared descriptors.
//! - Failures surface as [`ZohoError`], which names the action that failed
//!   and keeps the underlying cause reachable via `source()`.

pub mod api;
pub mod binder;
pub mod client;
pub mod config;
pub mod decode;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod param;
pub mod request;
pub mod testing;
pub mod transport;

pub use api::bookings::BookingsApi;
pub use api::books::BooksApi;
pub use api::crm::CrmApi;
pub use api::expense::ExpenseApi;
pub use api::subscriptions::SubscriptionsApi;
pub use api::{ModuleContext, PageContext};
pub use client::{Call, ZohoClient};
pub use config::{TenantConfig, TenantScope};
pub use endpoint::{BodyFormat, Endpoint};
pub use error::{
    ApiError, AuthError, DecodeError, NetworkError, ParameterError, RequestError, TransportError,
    ZohoError,
};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use param::{Param, ParamLocation, ParamSpec, Params};
pub use transport::{Authenticator, Credential, StaticToken, Transport};

#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
