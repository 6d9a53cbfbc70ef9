//! Zoho Expense (`/expense/v1`).

use serde::{Deserialize, Serialize};

use super::{ModuleContext, PageContext};
use crate::client::ZohoClient;
use crate::config::{TenantConfig, TenantScope};
use crate::endpoint::Endpoint;
use crate::error::ZohoError;
use crate::param::{ParamSpec, Params};

pub const MODULE: &str = "expense";
pub const ORGANIZATION_HEADER: &str = "X-com-zoho-expense-organizationid";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseReport {
    pub report_id: String,
    pub report_name: String,
    #[serde(default)]
    pub report_number: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub currency_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseReportList {
    pub code: i64,
    pub message: String,
    pub expense_reports: Vec<ExpenseReport>,
    #[serde(default)]
    pub page_context: PageContext,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseReportResponse {
    pub code: i64,
    pub message: String,
    pub expense_report: ExpenseReport,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub expense_id: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub merchant_name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub report_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseList {
    pub code: i64,
    pub message: String,
    pub expenses: Vec<Expense>,
    #[serde(default)]
    pub page_context: PageContext,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseResponse {
    pub code: i64,
    pub message: String,
    pub expense: Expense,
}

/// Payload for `create_expense`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExpense {
    pub date: String,
    pub amount: f64,
    pub category_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_through_account_id: Option<String>,
}

static LIST_REPORTS: &[ParamSpec] = &[
    ParamSpec::query("filterBy", "filter_by"),
    ParamSpec::query("page", "page"),
    ParamSpec::query("perPage", "per_page"),
    ParamSpec::query("sortColumn", "sort_column"),
    ParamSpec::query("status", "status"),
];

static GET_REPORT: &[ParamSpec] = &[ParamSpec::path("reportID")];

static LIST_EXPENSES: &[ParamSpec] = &[
    ParamSpec::query("filterBy", "filter_by"),
    ParamSpec::query("page", "page"),
    ParamSpec::query("perPage", "per_page"),
    ParamSpec::query("reportID", "report_id"),
    ParamSpec::query("status", "status"),
];

pub fn list_expense_reports() -> Endpoint<ExpenseReportList> {
    Endpoint::get("list_expense_reports", "/expense/v1/expensereports")
        .action("retrieve expense reports")
        .params(LIST_REPORTS)
}

pub fn get_expense_report() -> Endpoint<ExpenseReportResponse> {
    Endpoint::get("get_expense_report", "/expense/v1/expensereports/{reportID}")
        .action("retrieve expense report")
        .params(GET_REPORT)
}

pub fn list_expenses() -> Endpoint<ExpenseList> {
    Endpoint::get("list_expenses", "/expense/v1/expenses")
        .action("retrieve expenses")
        .params(LIST_EXPENSES)
}

pub fn create_expense() -> Endpoint<ExpenseResponse> {
    Endpoint::post("create_expense", "/expense/v1/expenses").action("create expense")
}

/// Zoho Expense facade. Scopes calls with the organization header.
#[derive(Debug, Clone)]
pub struct ExpenseApi {
    ctx: ModuleContext,
}

impl ExpenseApi {
    pub fn new(client: &ZohoClient, tenant: TenantConfig) -> Self {
        Self {
            ctx: ModuleContext::new(MODULE, client, tenant, TenantScope::Header(ORGANIZATION_HEADER)),
        }
    }

    pub fn context(&self) -> &ModuleContext {
        &self.ctx
    }

    pub fn list_expense_reports(&self, params: Params) -> Result<ExpenseReportList, ZohoError> {
        self.ctx.run(list_expense_reports(), params)
    }

    pub fn get_expense_report(&self, report_id: &str) -> Result<ExpenseReportResponse, ZohoError> {
        self.ctx
            .run(get_expense_report(), Params::new().with("reportID", report_id))
    }

    pub fn list_expenses(&self, params: Params) -> Result<ExpenseList, ZohoError> {
        self.ctx.run(list_expenses(), params)
    }

    pub fn create_expense(&self, expense: &NewExpense) -> Result<ExpenseResponse, ZohoError> {
        self.ctx.run_with_body(create_expense(), Params::new(), expense)
    }
}
