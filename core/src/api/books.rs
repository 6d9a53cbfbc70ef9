//! Zoho Books (`/books/v3`).
//!
//! Books scopes every request with the `organization_id` query parameter.

use serde::{Deserialize, Serialize};

use super::{ModuleContext, PageContext};
use crate::client::ZohoClient;
use crate::config::{TenantConfig, TenantScope};
use crate::endpoint::Endpoint;
use crate::error::ZohoError;
use crate::param::{ParamSpec, Params};

pub const MODULE: &str = "books";
pub const ORGANIZATION_PARAM: &str = "organization_id";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub invoice_id: String,
    pub invoice_number: String,
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub currency_code: Option<String>,
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceList {
    pub code: i64,
    pub message: String,
    pub invoices: Vec<Invoice>,
    #[serde(default)]
    pub page_context: PageContext,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceResponse {
    pub code: i64,
    pub message: String,
    pub invoice: Invoice,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub rate: f64,
    pub quantity: f64,
}

/// Payload for `create_invoice`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewInvoice {
    pub customer_id: String,
    pub line_items: Vec<LineItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub contact_id: String,
    pub contact_name: String,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub contact_type: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactList {
    pub code: i64,
    pub message: String,
    pub contacts: Vec<Contact>,
    #[serde(default)]
    pub page_context: PageContext,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactResponse {
    pub code: i64,
    pub message: String,
    pub contact: Contact,
}

static LIST_INVOICES: &[ParamSpec] = &[
    ParamSpec::query("filterBy", "filter_by"),
    ParamSpec::query("page", "page"),
    ParamSpec::query("perPage", "per_page"),
    ParamSpec::query("customerID", "customer_id"),
    ParamSpec::query("status", "status"),
    ParamSpec::query("searchText", "search_text"),
    ParamSpec::query("sortColumn", "sort_column"),
];

static GET_INVOICE: &[ParamSpec] = &[ParamSpec::path("invoiceID")];

static CREATE_INVOICE: &[ParamSpec] = &[
    ParamSpec::query("send", "send"),
    ParamSpec::query("ignoreAutoNumberGeneration", "ignore_auto_number_generation"),
];

static LIST_CONTACTS: &[ParamSpec] = &[
    ParamSpec::query("filterBy", "filter_by"),
    ParamSpec::query("page", "page"),
    ParamSpec::query("perPage", "per_page"),
    ParamSpec::query("contactName", "contact_name"),
    ParamSpec::query("email", "email"),
    ParamSpec::query("searchText", "search_text"),
];

static GET_CONTACT: &[ParamSpec] = &[ParamSpec::path("contactID")];

pub fn list_invoices() -> Endpoint<InvoiceList> {
    Endpoint::get("list_invoices", "/books/v3/invoices")
        .action("retrieve invoices")
        .params(LIST_INVOICES)
}

pub fn get_invoice() -> Endpoint<InvoiceResponse> {
    Endpoint::get("get_invoice", "/books/v3/invoices/{invoiceID}")
        .action("retrieve invoice")
        .params(GET_INVOICE)
}

pub fn create_invoice() -> Endpoint<InvoiceResponse> {
    Endpoint::post("create_invoice", "/books/v3/invoices")
        .action("create invoice")
        .params(CREATE_INVOICE)
}

pub fn list_contacts() -> Endpoint<ContactList> {
    Endpoint::get("list_contacts", "/books/v3/contacts")
        .action("retrieve contacts")
        .params(LIST_CONTACTS)
}

pub fn get_contact() -> Endpoint<ContactResponse> {
    Endpoint::get("get_contact", "/books/v3/contacts/{contactID}")
        .action("retrieve contact")
        .params(GET_CONTACT)
}

/// Zoho Books facade.
#[derive(Debug, Clone)]
pub struct BooksApi {
    ctx: ModuleContext,
}

impl BooksApi {
    pub fn new(client: &ZohoClient, tenant: TenantConfig) -> Self {
        Self {
            ctx: ModuleContext::new(
                MODULE,
                client,
                tenant,
                TenantScope::QueryParam(ORGANIZATION_PARAM),
            ),
        }
    }

    pub fn context(&self) -> &ModuleContext {
        &self.ctx
    }

    pub fn list_invoices(&self, params: Params) -> Result<InvoiceList, ZohoError> {
        self.ctx.run(list_invoices(), params)
    }

    pub fn get_invoice(&self, invoice_id: &str) -> Result<InvoiceResponse, ZohoError> {
        self.ctx.run(get_invoice(), Params::new().with("invoiceID", invoice_id))
    }

    pub fn create_invoice(&self, params: Params, invoice: &NewInvoice) -> Result<InvoiceResponse, ZohoError> {
        self.ctx.run_with_body(create_invoice(), params, invoice)
    }

    pub fn list_contacts(&self, params: Params) -> Result<ContactList, ZohoError> {
        self.ctx.run(list_contacts(), params)
    }

    pub fn get_contact(&self, contact_id: &str) -> Result<ContactResponse, ZohoError> {
        self.ctx.run(get_contact(), Params::new().with("contactID", contact_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;
    use crate::testing::{FakeAuthenticator, FakeTransport};

    fn api(transport: &FakeTransport) -> BooksApi {
        let client = ZohoClient::new(FakeAuthenticator::token("t"), transport.clone());
        BooksApi::new(&client, TenantConfig::default().with_organization("10234695"))
    }

    #[test]
    fn list_invoices_scopes_by_organization_query() {
        let body = r#"{"code":0,"message":"success","invoices":[{"invoice_id":"982000000567114","invoice_number":"INV-00003","status":"draft","total":40.6,"balance":40.6}],"page_context":{"page":1,"per_page":200,"has_more_page":false}}"#;
        let transport = FakeTransport::new().respond(200, body);

        let list = api(&transport)
            .list_invoices(Params::from([("status", "draft"), ("filterBy", "")]))
            .unwrap();
        assert_eq!(list.invoices.len(), 1);
        assert_eq!(list.invoices[0].invoice_number, "INV-00003");
        assert_eq!(list.invoices[0].total, 40.6);
        assert_eq!(list.page_context.per_page, 200);

        let sent = transport.last_request().unwrap();
        assert_eq!(sent.url, "https://www.zohoapis.com/books/v3/invoices");
        assert_eq!(sent.query_param("organization_id"), Some("10234695"));
        assert_eq!(sent.query_param("status"), Some("draft"));
        assert_eq!(sent.query_param("filter_by"), None);
        assert!(sent.header("X-com-zoho-books-organizationid").is_none());
    }

    #[test]
    fn get_invoice_renders_path() {
        let body = r#"{"code":0,"message":"success","invoice":{"invoice_id":"982000000567114","invoice_number":"INV-00003"}}"#;
        let transport = FakeTransport::new().respond(200, body);
        let invoice = api(&transport).get_invoice("982000000567114").unwrap().invoice;
        assert_eq!(invoice.invoice_id, "982000000567114");
        assert_eq!(invoice.balance, 0.0);
        assert_eq!(
            transport.last_request().unwrap().url,
            "https://www.zohoapis.com/books/v3/invoices/982000000567114"
        );
    }

    #[test]
    fn create_invoice_sends_json() {
        let body = r#"{"code":0,"message":"The invoice has been created.","invoice":{"invoice_id":"1","invoice_number":"INV-00004"}}"#;
        let transport = FakeTransport::new().respond(201, body);
        let invoice = NewInvoice {
            customer_id: "460000000026049".to_string(),
            line_items: vec![LineItem {
                item_id: Some("460000000027009".to_string()),
                name: None,
                description: None,
                rate: 120.0,
                quantity: 2.0,
            }],
            invoice_number: None,
            date: Some("2024-01-01".to_string()),
            due_date: None,
            reference_number: None,
        };

        let created = api(&transport)
            .create_invoice(Params::from([("send", "false")]), &invoice)
            .unwrap();
        assert_eq!(created.message, "The invoice has been created.");

        let sent = transport.last_request().unwrap();
        assert_eq!(sent.method, HttpMethod::Post);
        assert_eq!(sent.query_param("send"), Some("false"));
        let json: serde_json::Value = serde_json::from_str(sent.body.as_deref().unwrap()).unwrap();
        assert_eq!(json["customer_id"], "460000000026049");
        assert_eq!(json["line_items"][0]["quantity"], 2.0);
        assert!(json.get("due_date").is_none());
    }

    #[test]
    fn empty_contact_id_fails_before_io() {
        let transport = FakeTransport::new();
        let err = api(&transport).get_contact("").unwrap_err();
        assert_eq!(err.to_string(), "Failed to retrieve contact: missing required parameter `contactID`");
        assert_eq!(transport.calls(), 0);
    }
}
