//! Zoho Subscriptions (`/billing/v1`).

use serde::{Deserialize, Serialize};

use super::{ModuleContext, PageContext};
use crate::client::ZohoClient;
use crate::config::{TenantConfig, TenantScope};
use crate::endpoint::Endpoint;
use crate::error::ZohoError;
use crate::param::{ParamSpec, Params};

pub const MODULE: &str = "subscriptions";
pub const ORGANIZATION_HEADER: &str = "X-com-zoho-subscriptions-organizationid";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub plan_code: String,
    pub name: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub recurring_price: f64,
    #[serde(default)]
    pub interval: u32,
    #[serde(default)]
    pub interval_unit: Option<String>,
    #[serde(default)]
    pub product_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanList {
    pub code: i64,
    pub message: String,
    pub plans: Vec<Plan>,
    #[serde(default)]
    pub page_context: PageContext,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanResponse {
    pub code: i64,
    pub message: String,
    pub plan: Plan,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: String,
    pub display_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerList {
    pub code: i64,
    pub message: String,
    pub customers: Vec<Customer>,
    #[serde(default)]
    pub page_context: PageContext,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerResponse {
    pub code: i64,
    pub message: String,
    pub customer: Customer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub subscription_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub plan_code: Option<String>,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub next_billing_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionList {
    pub code: i64,
    pub message: String,
    pub subscriptions: Vec<Subscription>,
    #[serde(default)]
    pub page_context: PageContext,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionResponse {
    pub code: i64,
    pub message: String,
    pub subscription: Subscription,
}

static LIST_PLANS: &[ParamSpec] = &[
    ParamSpec::query("filterBy", "filter_by"),
    ParamSpec::query("productID", "product_id"),
    ParamSpec::query("page", "page"),
    ParamSpec::query("perPage", "per_page"),
];

static GET_PLAN: &[ParamSpec] = &[ParamSpec::path("planCode")];

static LIST_CUSTOMERS: &[ParamSpec] = &[
    ParamSpec::query("filterBy", "filter_by"),
    ParamSpec::query("searchText", "search_text"),
    ParamSpec::query("page", "page"),
    ParamSpec::query("perPage", "per_page"),
];

static GET_CUSTOMER: &[ParamSpec] = &[ParamSpec::path("customerID")];

static LIST_SUBSCRIPTIONS: &[ParamSpec] = &[
    ParamSpec::query("filterBy", "filter_by"),
    ParamSpec::query("customerID", "customer_id"),
    ParamSpec::query("page", "page"),
    ParamSpec::query("perPage", "per_page"),
];

static GET_SUBSCRIPTION: &[ParamSpec] = &[ParamSpec::path("subscriptionID")];

pub fn list_plans() -> Endpoint<PlanList> {
    Endpoint::get("list_plans", "/billing/v1/plans")
        .action("retrieve plans")
        .params(LIST_PLANS)
}

pub fn get_plan() -> Endpoint<PlanResponse> {
    Endpoint::get("get_plan", "/billing/v1/plans/{planCode}")
        .action("retrieve plan")
        .params(GET_PLAN)
}

pub fn list_customers() -> Endpoint<CustomerList> {
    Endpoint::get("list_customers", "/billing/v1/customers")
        .action("retrieve customers")
        .params(LIST_CUSTOMERS)
}

pub fn get_customer() -> Endpoint<CustomerResponse> {
    Endpoint::get("get_customer", "/billing/v1/customers/{customerID}")
        .action("retrieve customer")
        .params(GET_CUSTOMER)
}

pub fn list_subscriptions() -> Endpoint<SubscriptionList> {
    Endpoint::get("list_subscriptions", "/billing/v1/subscriptions")
        .action("retrieve subscriptions")
        .params(LIST_SUBSCRIPTIONS)
}

pub fn get_subscription() -> Endpoint<SubscriptionResponse> {
    Endpoint::get("get_subscription", "/billing/v1/subscriptions/{subscriptionID}")
        .action("retrieve subscription")
        .params(GET_SUBSCRIPTION)
}

/// Zoho Subscriptions facade. Scopes calls with the organization header.
#[derive(Debug, Clone)]
pub struct SubscriptionsApi {
    ctx: ModuleContext,
}

impl SubscriptionsApi {
    pub fn new(client: &ZohoClient, tenant: TenantConfig) -> Self {
        Self {
            ctx: ModuleContext::new(MODULE, client, tenant, TenantScope::Header(ORGANIZATION_HEADER)),
        }
    }

    pub fn context(&self) -> &ModuleContext {
        &self.ctx
    }

    /// `filterBy` takes values such as `PlanStatus.ACTIVE`.
    pub fn list_plans(&self, params: Params) -> Result<PlanList, ZohoError> {
        self.ctx.run(list_plans(), params)
    }

    pub fn get_plan(&self, plan_code: &str) -> Result<PlanResponse, ZohoError> {
        self.ctx.run(get_plan(), Params::new().with("planCode", plan_code))
    }

    pub fn list_customers(&self, params: Params) -> Result<CustomerList, ZohoError> {
        self.ctx.run(list_customers(), params)
    }

    pub fn get_customer(&self, customer_id: &str) -> Result<CustomerResponse, ZohoError> {
        self.ctx
            .run(get_customer(), Params::new().with("customerID", customer_id))
    }

    pub fn list_subscriptions(&self, params: Params) -> Result<SubscriptionList, ZohoError> {
        self.ctx.run(list_subscriptions(), params)
    }

    pub fn get_subscription(&self, subscription_id: &str) -> Result<SubscriptionResponse, ZohoError> {
        self.ctx
            .run(get_subscription(), Params::new().with("subscriptionID", subscription_id))
    }
}
