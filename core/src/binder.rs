//! Parameter binding: defaults, caller overlay, requirement checks.

use crate::endpoint::Endpoint;
use crate::error::ParameterError;
use crate::param::Params;

/// Merge `caller` over the endpoint defaults and validate requirements.
///
/// Required names are checked in table order, then `any_of` groups. The first
/// violation is returned. Pure: no I/O, no state.
pub fn bind<T>(endpoint: &Endpoint<T>, caller: &Params) -> Result<Params, ParameterError> {
    let mut params = endpoint.default_params();
    params.overlay(caller);

    if let Some(spec) = endpoint
        .params
        .iter()
        .find(|spec| spec.required && !params.is_present(spec.name))
    {
        return Err(ParameterError::Missing {
            name: spec.name.to_string(),
        });
    }

    for group in endpoint.any_of {
        if !group.iter().any(|name| params.is_present(name)) {
            return Err(ParameterError::MissingOneOf {
                names: group.iter().map(|n| n.to_string()).collect(),
            });
        }
    }

    Ok(params)
}
