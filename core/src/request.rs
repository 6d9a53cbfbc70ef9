//! Request building: bound parameters → `HttpRequest`.
//!
//! # Design
//! Building is a pure transformation of (descriptor, tenant, bound
//! parameters, call options). Path slots are filled from the bound set,
//! query and body parameters are routed by the descriptor's table, and the
//! tenant scope decides whether the organization id travels as a header or a
//! query parameter. No retries, no caching, no I/O.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use url::Url;

use crate::config::{TenantConfig, TenantScope};
use crate::endpoint::{BodyFormat, Endpoint};
use crate::error::RequestError;
use crate::http::{set_header, HttpRequest};
use crate::param::{ParamLocation, Params};

/// Slot name that always resolves to the tenant TLD.
pub const TLD_SLOT: &str = "tld";

/// Renders bound endpoints for one tenant.
#[derive(Debug, Clone, Copy)]
pub struct RequestBuilder<'a> {
    tenant: &'a TenantConfig,
    scope: &'a TenantScope,
}

impl<'a> RequestBuilder<'a> {
    pub fn new(tenant: &'a TenantConfig, scope: &'a TenantScope) -> Self {
        Self { tenant, scope }
    }

    /// Build the request for `endpoint` from already-bound `params`.
    ///
    /// `body` is an explicit request payload; body-located parameters are
    /// merged into it. `overrides` replace any header of the same name.
    pub fn build<T>(
        &self,
        endpoint: &Endpoint<T>,
        params: &Params,
        body: Option<&Value>,
        overrides: &[(String, String)],
    ) -> Result<HttpRequest, RequestError> {
        let url = self.render_url(endpoint, params)?;

        let mut query = BTreeMap::new();
        if let TenantScope::QueryParam(name) = self.scope {
            let organization = self.tenant.organization();
            if !organization.is_empty() {
                query.insert(name.to_string(), organization.to_string());
            }
        }

        let mut fields = BTreeMap::new();
        for (name, value) in params.iter().filter(|(_, v)| v.is_present()) {
            match endpoint.spec(name) {
                Some(spec) => match spec.location {
                    ParamLocation::Path => {}
                    ParamLocation::Query => {
                        query.insert(spec.wire_name.to_string(), value.to_string());
                    }
                    ParamLocation::Body => {
                        fields.insert(spec.wire_name.to_string(), value.to_string());
                    }
                },
                None => {
                    query.insert(name.to_string(), value.to_string());
                }
            }
        }

        let body = render_body(endpoint.body_format, body, fields)?;

        let mut headers = endpoint.headers.clone();
        if let TenantScope::Header(name) = self.scope {
            let organization = self.tenant.organization();
            if !organization.is_empty() {
                set_header(&mut headers, name.to_string(), organization.to_string());
            }
        }
        if body.is_some() {
            set_header(
                &mut headers,
                "Content-Type".to_string(),
                endpoint.body_format.content_type().to_string(),
            );
        }
        for (name, value) in overrides {
            set_header(&mut headers, name.clone(), value.clone());
        }

        Ok(HttpRequest {
            method: endpoint.method,
            url,
            query: query.into_iter().collect(),
            headers,
            body,
        })
    }

    fn render_url<T>(&self, endpoint: &Endpoint<T>, params: &Params) -> Result<String, RequestError> {
        let base = self.tenant.api_base();
        let invalid_base = |reason: String| RequestError::InvalidUrl {
            url: base.clone(),
            reason,
        };
        let mut url = Url::parse(&base).map_err(|e| invalid_base(e.to_string()))?;

        let segments = endpoint
            .path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|segment| self.render_segment(endpoint.path, segment, params))
            .collect::<Result<Vec<_>, _>>()?;

        url.path_segments_mut()
            .map_err(|_| invalid_base("cannot be a base url".to_string()))?
            .pop_if_empty()
            .extend(segments);

        Ok(url.into())
    }

    /// Substitute `{slot}`s in one path segment. The url crate percent-encodes
    /// the result when it is appended.
    fn render_segment(&self, template: &str, segment: &str, params: &Params) -> Result<String, RequestError> {
        let invalid = |reason: String| RequestError::InvalidTemplate {
            template: template.to_string(),
            reason,
        };

        let mut out = String::with_capacity(segment.len());
        let mut rest = segment;
        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let close = after
                .find('}')
                .ok_or_else(|| invalid(format!("unterminated slot in `{segment}`")))?;
            let slot = &after[..close];
            let value = if slot == TLD_SLOT {
                self.tenant.tld.as_str()
            } else {
                params.get(slot).map(|p| p.as_str()).unwrap_or("")
            };
            if value.is_empty() {
                return Err(invalid(format!("no value for slot `{slot}`")));
            }
            out.push_str(value);
            rest = &after[close + 1..];
        }
        if rest.contains('}') {
            return Err(invalid(format!("unbalanced `}}` in `{segment}`")));
        }
        out.push_str(rest);
        // The url crate drops dot segments when appending, which would
        // silently address a different resource.
        if out == "." || out == ".." {
            return Err(invalid(format!("segment `{segment}` renders to `{out}`")));
        }
        Ok(out)
    }
}

fn render_body(
    format: BodyFormat,
    explicit: Option<&Value>,
    fields: BTreeMap<String, String>,
) -> Result<Option<String>, RequestError> {
    if explicit.is_none() && fields.is_empty() {
        return Ok(None);
    }

    match format {
        BodyFormat::Json => {
            let value = match explicit {
                Some(Value::Object(map)) => {
                    let mut map = map.clone();
                    map.extend(fields.into_iter().map(|(k, v)| (k, Value::String(v))));
                    Value::Object(map)
                }
                Some(other) if fields.is_empty() => other.clone(),
                Some(_) => {
                    return Err(RequestError::InvalidBody(
                        "body parameters need a JSON object payload".to_string(),
                    ))
                }
                None => Value::Object(fields.into_iter().map(|(k, v)| (k, Value::String(v))).collect::<Map<_, _>>()),
            };
            Ok(Some(serde_json::to_string(&value)?))
        }
        BodyFormat::Form => {
            let mut pairs: BTreeMap<String, String> = BTreeMap::new();
            match explicit {
                Some(Value::Object(map)) => {
                    for (k, v) in map {
                        let v = match v {
                            Value::Null => continue,
                            Value::String(s) => s.clone(),
                            other => serde_json::to_string(other)?,
                        };
                        pairs.insert(k.clone(), v);
                    }
                }
                Some(_) => {
                    return Err(RequestError::InvalidBody(
                        "form bodies need a JSON object payload".to_string(),
                    ))
                }
                None => {}
            }
            pairs.extend(fields);
            let encoded = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(pairs.iter())
                .finish();
            Ok(Some(encoded))
        }
    }
}
