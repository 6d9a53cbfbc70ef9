//! Per-product facades.
//!
//! Each facade owns a `ModuleContext` (tenant identity + scope policy) and
//! exposes one method per endpoint. The endpoint descriptors themselves are
//! public functions in each module, so callers needing per-call header
//! overrides can go through `ModuleContext::invoke` directly.

pub mod bookings;
pub mod books;
pub mod crm;
pub mod expense;
pub mod subscriptions;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::client::{Call, ZohoClient};
use crate::config::{TenantConfig, TenantScope};
use crate::endpoint::Endpoint;
use crate::error::{ApiError, ZohoError};
use crate::param::Params;

/// Tenant-scoped state shared by every call of one facade.
///
/// Read-only after construction, so concurrent calls need no locking.
#[derive(Debug, Clone)]
pub struct ModuleContext {
    module: &'static str,
    client: ZohoClient,
    tenant: TenantConfig,
    scope: TenantScope,
    correlation_id: String,
}

impl ModuleContext {
    pub fn new(
        module: &'static str,
        client: &ZohoClient,
        tenant: TenantConfig,
        scope: TenantScope,
    ) -> Self {
        Self {
            module,
            correlation_id: client.next_correlation_id(),
            client: client.clone(),
            tenant,
            scope,
        }
    }

    pub fn module(&self) -> &'static str {
        self.module
    }

    pub fn tenant(&self) -> &TenantConfig {
        &self.tenant
    }

    pub fn scope(&self) -> &TenantScope {
        &self.scope
    }

    /// Diagnostic id attached to this facade's log events.
    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    /// Run `endpoint`, wrapping any failure as
    /// `"Failed to <action>: <cause>"`.
    pub fn invoke<T: DeserializeOwned>(&self, endpoint: &Endpoint<T>, call: &Call) -> Result<T, ZohoError> {
        let span = tracing::debug_span!(
            "zoho",
            module = self.module,
            correlation_id = %self.correlation_id
        );
        let _guard = span.enter();

        self.client
            .invoke(endpoint, &self.tenant, &self.scope, call)
            .map_err(|e| self.fail(endpoint, e))
    }

    pub(crate) fn run<T: DeserializeOwned>(&self, endpoint: Endpoint<T>, params: Params) -> Result<T, ZohoError> {
        self.invoke(&endpoint, &Call::new(params))
    }

    pub(crate) fn run_with_body<T, B>(&self, endpoint: Endpoint<T>, params: Params, body: &B) -> Result<T, ZohoError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let call = Call::new(params)
            .body(body)
            .map_err(|e| self.fail(&endpoint, ApiError::Request(e)))?;
        self.invoke(&endpoint, &call)
    }

    fn fail<T>(&self, endpoint: &Endpoint<T>, error: ApiError) -> ZohoError {
        tracing::warn!(
            module = self.module,
            operation = endpoint.name,
            correlation_id = %self.correlation_id,
            error = %error,
            "zoho call failed"
        );
        ZohoError::new(
            self.module,
            endpoint.name,
            format!("Failed to {}", endpoint.action),
            error,
        )
    }
}

/// Paging block of the Books, Expense and Subscriptions list responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageContext {
    pub page: u32,
    pub per_page: u32,
    pub has_more_page: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParameterError;
    use crate::testing::{FakeAuthenticator, FakeTransport};

    /// Blank each required parameter (and each one-of group) of an otherwise
    /// complete call and check the call fails before reaching the transport.
    fn assert_required<T: DeserializeOwned + std::fmt::Debug>(endpoint: Endpoint<T>, expected: &[&str]) {
        let transport = FakeTransport::new();
        let client = ZohoClient::new(FakeAuthenticator::token("t"), transport.clone());
        let ctx = ModuleContext::new(
            "test",
            &client,
            TenantConfig::default().with_organization("1"),
            TenantScope::None,
        );
        let full: Params = endpoint.params.iter().map(|spec| (spec.name, "v")).collect();

        let required: Vec<&str> = endpoint
            .params
            .iter()
            .filter(|spec| spec.required)
            .map(|spec| spec.name)
            .collect();
        assert_eq!(required, expected, "required set of {}", endpoint.name);

        for name in &required {
            let err = ctx
                .invoke(&endpoint, &Call::new(full.clone().with(*name, "")))
                .unwrap_err();
            assert!(
                matches!(
                    err.api_error(),
                    ApiError::Parameter(ParameterError::Missing { name: missing }) if missing == name
                ),
                "{} without {name}: {err}",
                endpoint.name
            );
        }

        for group in endpoint.any_of {
            let mut params = full.clone();
            for name in *group {
                params.set(*name, "");
            }
            let err = ctx.invoke(&endpoint, &Call::new(params)).unwrap_err();
            assert!(
                matches!(
                    err.api_error(),
                    ApiError::Parameter(ParameterError::MissingOneOf { names }) if names.len() == group.len()
                ),
                "{} without {group:?}: {err}",
                endpoint.name
            );
        }

        assert_eq!(transport.calls(), 0, "{} reached the transport", endpoint.name);
    }

    #[test]
    fn bookings_required_parameters() {
        assert_required(bookings::availability(), &["serviceID", "date"]);
        assert_required(bookings::workspaces(), &[]);
        assert_required(bookings::services(), &[]);
        assert_required(bookings::staff(), &[]);
        assert_required(bookings::resources(), &[]);
        assert_required(bookings::fetch_appointment(), &["bookingID"]);
        assert_required(bookings::book_appointment(), &["serviceID", "fromTime"]);
        assert_required(bookings::update_appointment(), &["bookingID", "action"]);
        assert_required(bookings::reschedule_appointment(), &["bookingID"]);
    }

    #[test]
    fn books_required_parameters() {
        assert_required(books::list_invoices(), &[]);
        assert_required(books::get_invoice(), &["invoiceID"]);
        assert_required(books::create_invoice(), &[]);
        assert_required(books::list_contacts(), &[]);
        assert_required(books::get_contact(), &["contactID"]);
    }

    #[test]
    fn crm_required_parameters() {
        assert_required(crm::list_records(), &["module"]);
        assert_required(crm::get_record(), &["module", "recordID"]);
        assert_required(crm::insert_records(), &["module"]);
        assert_required(crm::update_records(), &["module"]);
        assert_required(crm::delete_records(), &["module", "ids"]);
        assert_required(crm::search_records(), &["module"]);
    }

    #[test]
    fn expense_required_parameters() {
        assert_required(expense::list_expense_reports(), &[]);
        assert_required(expense::get_expense_report(), &["reportID"]);
        assert_required(expense::list_expenses(), &[]);
        assert_required(expense::create_expense(), &[]);
    }

    #[test]
    fn subscriptions_required_parameters() {
        assert_required(subscriptions::list_plans(), &[]);
        assert_required(subscriptions::get_plan(), &["planCode"]);
        assert_required(subscriptions::list_customers(), &[]);
        assert_required(subscriptions::get_customer(), &["customerID"]);
        assert_required(subscriptions::list_subscriptions(), &[]);
        assert_required(subscriptions::get_subscription(), &["subscriptionID"]);
    }
}
