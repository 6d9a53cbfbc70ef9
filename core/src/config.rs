//! Tenant configuration.
//!
//! A tenant is one Zoho account context: the data-center TLD its API host
//! lives under (`com`, `eu`, `in`, `com.au`, ...) and, for the finance
//! products, the organization the calls are scoped to.

use serde::{Deserialize, Serialize};

pub const ENV_TLD: &str = "ZOHO_TLD";
pub const ENV_ORGANIZATION_ID: &str = "ZOHO_ORGANIZATION_ID";
pub const ENV_API_BASE_URL: &str = "ZOHO_API_BASE_URL";

const DEFAULT_TLD: &str = "com";

/// Read-only per-tenant settings shared by every call of a facade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantConfig {
    #[serde(default = "default_tld")]
    pub tld: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    /// Overrides `https://www.zohoapis.{tld}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

fn default_tld() -> String {
    DEFAULT_TLD.to_string()
}

impl Default for TenantConfig {
    fn default() -> Self {
        Self {
            tld: default_tld(),
            organization_id: None,
            base_url: None,
        }
    }
}

impl TenantConfig {
    pub fn new(tld: impl Into<String>) -> Self {
        Self {
            tld: tld.into(),
            ..Self::default()
        }
    }

    pub fn with_organization(mut self, organization_id: impl Into<String>) -> Self {
        self.organization_id = Some(organization_id.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Build from `ZOHO_TLD`, `ZOHO_ORGANIZATION_ID` and `ZOHO_API_BASE_URL`.
    /// Unset or empty variables fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        Self {
            tld: get(ENV_TLD).unwrap_or_else(default_tld),
            organization_id: get(ENV_ORGANIZATION_ID),
            base_url: get(ENV_API_BASE_URL),
        }
    }

    /// API host for this tenant, without a trailing slash.
    pub fn api_base(&self) -> String {
        match &self.base_url {
            Some(base) => base.trim_end_matches('/').to_string(),
            None => format!("https://www.zohoapis.{}", self.tld),
        }
    }

    /// Organization id, empty when unset.
    pub fn organization(&self) -> &str {
        self.organization_id.as_deref().unwrap_or("")
    }
}

/// How a facade scopes requests to the tenant's organization.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TenantScope {
    #[default]
    None,
    /// Send the organization id in this header.
    Header(&'static str),
    /// Send the organization id as this query parameter.
    QueryParam(&'static str),
}
