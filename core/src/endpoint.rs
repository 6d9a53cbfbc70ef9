//! Endpoint descriptors.
//!
//! # Design
//! An `Endpoint<T>` is plain data describing one API operation: method, path
//! template, parameter table, header overrides and body encoding. It is
//! generic over the response type `T`, so the type a call decodes into is
//! fixed where the descriptor is declared and a mismatched target cannot be
//! wired in at runtime.
//!
//! Facades build descriptors fresh for every call from `static` parameter
//! tables; nothing is cached across calls.

use std::fmt;
use std::marker::PhantomData;

use crate::http::HttpMethod;
use crate::param::{Param, ParamSpec, Params};

/// How body-located parameters and explicit request bodies are encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyFormat {
    #[default]
    Json,
    /// `application/x-www-form-urlencoded`.
    Form,
}

impl BodyFormat {
    pub fn content_type(self) -> &'static str {
        match self {
            BodyFormat::Json => "application/json",
            BodyFormat::Form => "application/x-www-form-urlencoded",
        }
    }
}

/// Declarative description of one operation returning `T`.
pub struct Endpoint<T> {
    pub name: &'static str,
    /// Verb phrase used in error context, e.g. "retrieve availability".
    pub action: &'static str,
    pub method: HttpMethod,
    /// Path template relative to the tenant's API host, with `{name}` slots.
    pub path: &'static str,
    pub params: &'static [ParamSpec],
    /// Groups of caller names of which at least one must be present.
    pub any_of: &'static [&'static [&'static str]],
    pub headers: Vec<(String, String)>,
    /// Defaults layered over the table defaults (module-wide values).
    pub defaults: Params,
    pub body_format: BodyFormat,
    response: PhantomData<fn() -> T>,
}

impl<T> Endpoint<T> {
    pub fn new(name: &'static str, method: HttpMethod, path: &'static str) -> Self {
        Self {
            name,
            action: name,
            method,
            path,
            params: &[],
            any_of: &[],
            headers: Vec::new(),
            defaults: Params::new(),
            body_format: BodyFormat::Json,
            response: PhantomData,
        }
    }

    pub fn get(name: &'static str, path: &'static str) -> Self {
        Self::new(name, HttpMethod::Get, path)
    }

    pub fn post(name: &'static str, path: &'static str) -> Self {
        Self::new(name, HttpMethod::Post, path)
    }

    pub fn put(name: &'static str, path: &'static str) -> Self {
        Self::new(name, HttpMethod::Put, path)
    }

    pub fn delete(name: &'static str, path: &'static str) -> Self {
        Self::new(name, HttpMethod::Delete, path)
    }

    pub fn action(mut self, action: &'static str) -> Self {
        self.action = action;
        self
    }

    pub fn params(mut self, params: &'static [ParamSpec]) -> Self {
        self.params = params;
        self
    }

    pub fn any_of(mut self, groups: &'static [&'static [&'static str]]) -> Self {
        self.any_of = groups;
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn default_param(mut self, name: impl Into<String>, value: impl Into<Param>) -> Self {
        self.defaults.set(name, value);
        self
    }

    pub fn form(mut self) -> Self {
        self.body_format = BodyFormat::Form;
        self
    }

    /// Table row for caller name `name`.
    pub fn spec(&self, name: &str) -> Option<&ParamSpec> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Table defaults overlaid with the endpoint-level defaults.
    pub fn default_params(&self) -> Params {
        let mut params: Params = self.params.iter().map(|p| (p.name, p.default)).collect();
        params.overlay(&self.defaults);
        params
    }
}

impl<T> Clone for Endpoint<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            action: self.action,
            method: self.method.clone(),
            path: self.path,
            params: self.params,
            any_of: self.any_of,
            headers: self.headers.clone(),
            defaults: self.defaults.clone(),
            body_format: self.body_format,
            response: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Endpoint<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("name", &self.name)
            .field("method", &self.method)
            .field("path", &self.path)
            .field("response", &std::any::type_name::<T>())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static PARAMS: &[ParamSpec] = &[
        ParamSpec::query("filterBy", "filter_by"),
        ParamSpec::query("page", "page").default_value("1"),
    ];

    #[test]
    fn default_params_merge_table_and_endpoint_defaults() {
        let endpoint: Endpoint<()> = Endpoint::get("plans", "/plans")
            .params(PARAMS)
            .default_param("page", "2")
            .default_param("sort", "name");
        let defaults = endpoint.default_params();
        assert_eq!(defaults.get("filterBy").map(Param::as_str), Some(""));
        assert_eq!(defaults.get("page").map(Param::as_str), Some("2"));
        assert_eq!(defaults.get("sort").map(Param::as_str), Some("name"));
    }

    #[test]
    fn action_defaults_to_name() {
        let endpoint: Endpoint<()> = Endpoint::delete("records", "/records");
        assert_eq!(endpoint.action, "records");
        assert_eq!(endpoint.method, HttpMethod::Delete);
        assert_eq!(endpoint.body_format, BodyFormat::Json);
        assert_eq!(endpoint.form().body_format, BodyFormat::Form);
    }

    #[test]
    fn spec_lookup_by_caller_name() {
        let endpoint: Endpoint<()> = Endpoint::get("plans", "/plans").params(PARAMS);
        assert_eq!(endpoint.spec("filterBy").map(|s| s.wire_name), Some("filter_by"));
        assert!(endpoint.spec("filter_by").is_none());
    }
}
