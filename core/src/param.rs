//! Parameter values and the declarative parameter table.
//!
//! # Design
//! A `Param` is a plain string. The empty string is the only "absent"
//! marker: binding, building and the facades all test presence with
//! `is_present()` rather than wrapping values in `Option`.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A string-like parameter value. Empty means absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Param(String);

impl Param {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_present(&self) -> bool {
        !self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Param {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Param {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&String> for Param {
    fn from(value: &String) -> Self {
        Self(value.clone())
    }
}

impl From<bool> for Param {
    fn from(value: bool) -> Self {
        Self(value.to_string())
    }
}

macro_rules! param_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for Param {
            fn from(value: $t) -> Self {
                Self(value.to_string())
            }
        })*
    };
}

param_from_int!(i32, i64, u32, u64, usize);

/// Parameter set keyed by name. Iterates in name order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params(BTreeMap<String, Param>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Param>) -> Self {
        self.set(name, value);
        self
    }

    /// Insert or replace `name`.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Param>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Param> {
        self.0.get(name)
    }

    /// True when `name` is set to a non-empty value.
    pub fn is_present(&self, name: &str) -> bool {
        self.0.get(name).is_some_and(Param::is_present)
    }

    /// Overlay `other` on top of `self`; `other` wins on collisions.
    pub fn overlay(&mut self, other: &Params) {
        for (name, value) in &other.0 {
            self.0.insert(name.clone(), value.clone());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Param)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<Param>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Params
where
    K: Into<String>,
    V: Into<Param>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// Where a bound parameter ends up in the HTTP request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamLocation {
    /// Substituted into a `{name}` slot of the path template.
    Path,
    Query,
    /// Only meaningful on write operations.
    Body,
}

/// One row of an endpoint's parameter table.
///
/// `name` is what callers use (`serviceID`); `wire_name` is what the API
/// expects (`service_id`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub wire_name: &'static str,
    pub location: ParamLocation,
    pub required: bool,
    pub default: &'static str,
}

impl ParamSpec {
    /// A path slot. Path slots are always required.
    pub const fn path(name: &'static str) -> Self {
        Self {
            name,
            wire_name: name,
            location: ParamLocation::Path,
            required: true,
            default: "",
        }
    }

    pub const fn query(name: &'static str, wire_name: &'static str) -> Self {
        Self {
            name,
            wire_name,
            location: ParamLocation::Query,
            required: false,
            default: "",
        }
    }

    pub const fn body(name: &'static str, wire_name: &'static str) -> Self {
        Self {
            name,
            wire_name,
            location: ParamLocation::Body,
            required: false,
            default: "",
        }
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn default_value(mut self, value: &'static str) -> Self {
        self.default = value;
        self
    }
}
