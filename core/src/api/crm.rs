//! Zoho CRM (`/crm/v2`).
//!
//! CRM records are schemaless per module (Leads, Contacts, Deals, custom
//! modules), so a `Record` is a JSON object. Listing and searching answer
//! `204 No Content` when nothing matches; those endpoints decode into an
//! `Option` and the facade turns "no content" into an empty list.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::ModuleContext;
use crate::client::ZohoClient;
use crate::config::{TenantConfig, TenantScope};
use crate::endpoint::Endpoint;
use crate::error::ZohoError;
use crate::param::{ParamSpec, Params};

pub const MODULE: &str = "crm";

pub type Record = Map<String, Value>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageInfo {
    #[serde(default)]
    pub per_page: u32,
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub more_records: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordList {
    pub data: Vec<Record>,
    #[serde(default)]
    pub info: Option<PageInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResult {
    pub code: String,
    pub status: String,
    pub message: String,
    #[serde(default)]
    pub details: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResponse {
    pub data: Vec<ActionResult>,
}

impl ActionResponse {
    /// Ids of the records the action succeeded for.
    pub fn succeeded_ids(&self) -> Vec<&str> {
        self.data
            .iter()
            .filter(|r| r.status == "success")
            .filter_map(|r| r.details.get("id").and_then(Value::as_str))
            .collect()
    }
}

#[derive(Debug, Serialize)]
struct RecordsPayload<'a> {
    data: &'a [Record],
    #[serde(skip_serializing_if = "Option::is_none")]
    trigger: Option<&'a [&'a str]>,
}

impl<'a> RecordsPayload<'a> {
    fn new(data: &'a [Record], trigger: &'a [&'a str]) -> Self {
        Self {
            data,
            trigger: (!trigger.is_empty()).then_some(trigger),
        }
    }
}

static LIST_RECORDS: &[ParamSpec] = &[
    ParamSpec::path("module"),
    ParamSpec::query("fields", "fields"),
    ParamSpec::query("sortOrder", "sort_order"),
    ParamSpec::query("sortBy", "sort_by"),
    ParamSpec::query("converted", "converted"),
    ParamSpec::query("approved", "approved"),
    ParamSpec::query("page", "page"),
    ParamSpec::query("perPage", "per_page"),
    ParamSpec::query("cvid", "cvid"),
];

static GET_RECORD: &[ParamSpec] = &[ParamSpec::path("module"), ParamSpec::path("recordID")];

static WRITE_RECORDS: &[ParamSpec] = &[ParamSpec::path("module")];

static DELETE_RECORDS: &[ParamSpec] = &[
    ParamSpec::path("module"),
    ParamSpec::query("ids", "ids").required(),
    ParamSpec::query("workflowTrigger", "wf_trigger"),
];

static SEARCH_RECORDS: &[ParamSpec] = &[
    ParamSpec::path("module"),
    ParamSpec::query("criteria", "criteria"),
    ParamSpec::query("email", "email"),
    ParamSpec::query("phone", "phone"),
    ParamSpec::query("word", "word"),
    ParamSpec::query("converted", "converted"),
    ParamSpec::query("approved", "approved"),
    ParamSpec::query("page", "page"),
    ParamSpec::query("perPage", "per_page"),
];

static SEARCH_TERMS: &[&[&str]] = &[&["criteria", "email", "phone", "word"]];

pub fn list_records() -> Endpoint<Option<RecordList>> {
    Endpoint::get("list_records", "/crm/v2/{module}")
        .action("retrieve records")
        .params(LIST_RECORDS)
}

pub fn get_record() -> Endpoint<Option<RecordList>> {
    Endpoint::get("get_record", "/crm/v2/{module}/{recordID}")
        .action("retrieve record")
        .params(GET_RECORD)
}

pub fn insert_records() -> Endpoint<ActionResponse> {
    Endpoint::post("insert_records", "/crm/v2/{module}")
        .action("insert records")
        .params(WRITE_RECORDS)
}

pub fn update_records() -> Endpoint<ActionResponse> {
    Endpoint::put("update_records", "/crm/v2/{module}")
        .action("update records")
        .params(WRITE_RECORDS)
}

pub fn delete_records() -> Endpoint<ActionResponse> {
    Endpoint::delete("delete_records", "/crm/v2/{module}")
        .action("delete records")
        .params(DELETE_RECORDS)
}

pub fn search_records() -> Endpoint<Option<RecordList>> {
    Endpoint::get("search_records", "/crm/v2/{module}/search")
        .action("search records")
        .params(SEARCH_RECORDS)
        .any_of(SEARCH_TERMS)
}

/// Zoho CRM facade.
#[derive(Debug, Clone)]
pub struct CrmApi {
    ctx: ModuleContext,
}

impl CrmApi {
    pub fn new(client: &ZohoClient, tenant: TenantConfig) -> Self {
        Self {
            ctx: ModuleContext::new(MODULE, client, tenant, TenantScope::None),
        }
    }

    pub fn context(&self) -> &ModuleContext {
        &self.ctx
    }

    pub fn list_records(&self, module: &str, params: Params) -> Result<RecordList, ZohoError> {
        self.ctx
            .run(list_records(), params.with("module", module))
            .map(Option::unwrap_or_default)
    }

    /// `None` when the record does not exist.
    pub fn get_record(&self, module: &str, record_id: &str) -> Result<Option<Record>, ZohoError> {
        let params = Params::from([("module", module), ("recordID", record_id)]);
        let list = self.ctx.run(get_record(), params)?;
        Ok(list.and_then(|l| l.data.into_iter().next()))
    }

    pub fn insert_records(&self, module: &str, records: &[Record], trigger: &[&str]) -> Result<ActionResponse, ZohoError> {
        let payload = RecordsPayload::new(records, trigger);
        self.ctx
            .run_with_body(insert_records(), Params::new().with("module", module), &payload)
    }

    /// Each record must carry its `id`.
    pub fn update_records(&self, module: &str, records: &[Record], trigger: &[&str]) -> Result<ActionResponse, ZohoError> {
        let payload = RecordsPayload::new(records, trigger);
        self.ctx
            .run_with_body(update_records(), Params::new().with("module", module), &payload)
    }

    pub fn delete_records(&self, module: &str, ids: &[&str]) -> Result<ActionResponse, ZohoError> {
        let params = Params::from([("module", module.to_string()), ("ids", ids.join(","))]);
        self.ctx.run(delete_records(), params)
    }

    /// Needs one of `criteria`, `email`, `phone`, `word`.
    pub fn search_records(&self, module: &str, params: Params) -> Result<RecordList, ZohoError> {
        self.ctx
            .run(search_records(), params.with("module", module))
            .map(Option::unwrap_or_default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ApiError, ParameterError, RequestError};
    use crate::http::HttpMethod;
    use crate::testing::{FakeAuthenticator, FakeTransport};
    use serde_json::json;

    fn api(transport: &FakeTransport) -> CrmApi {
        let client = ZohoClient::new(FakeAuthenticator::token("t"), transport.clone());
        CrmApi::new(&client, TenantConfig::new("in"))
    }

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn list_records_reads_page_info() {
        let body = r#"{"data":[{"id":"410888000000698006","Last_Name":"Boyle"}],"info":{"per_page":200,"count":1,"page":1,"more_records":false}}"#;
        let transport = FakeTransport::new().respond(200, body);
        let list = api(&transport)
            .list_records("Leads", Params::from([("fields", "Last_Name"), ("page", "1")]))
            .unwrap();
        assert_eq!(list.data[0]["Last_Name"], "Boyle");
        assert_eq!(list.info.unwrap().count, 1);

        let sent = transport.last_request().unwrap();
        assert_eq!(sent.url, "https://www.zohoapis.in/crm/v2/Leads");
        assert_eq!(sent.query_param("fields"), Some("Last_Name"));
        assert!(sent.query_param("module").is_none());
        assert!(sent.header("Authorization").is_some());
    }

    #[test]
    fn no_content_is_an_empty_list() {
        let transport = FakeTransport::new().respond(204, "");
        let list = api(&transport).list_records("Deals", Params::new()).unwrap();
        assert!(list.data.is_empty());
    }

    #[test]
    fn get_record_returns_first_row() {
        let transport = FakeTransport::new()
            .respond(200, r#"{"data":[{"id":"1","Email":"a@b.c"}]}"#)
            .respond(204, "");
        let crm = api(&transport);
        let found = crm.get_record("Contacts", "1").unwrap().unwrap();
        assert_eq!(found["Email"], "a@b.c");
        assert!(crm.get_record("Contacts", "2").unwrap().is_none());
    }

    #[test]
    fn dot_record_ids_never_reach_another_endpoint() {
        let transport = FakeTransport::new();
        let crm = api(&transport);
        for id in [".", ".."] {
            let err = crm.get_record("Leads", id).unwrap_err();
            assert!(matches!(
                err.api_error(),
                ApiError::Request(RequestError::InvalidTemplate { .. })
            ));
        }
        assert_eq!(transport.calls(), 0);
    }

    #[test]
    fn insert_records_wraps_data() {
        let body = r#"{"data":[{"code":"SUCCESS","details":{"id":"410888000000701001"},"message":"record added","status":"success"}]}"#;
        let transport = FakeTransport::new().respond(201, body);
        let records = vec![record(json!({"Last_Name": "Lovelace", "Company": "Engines"}))];

        let result = api(&transport)
            .insert_records("Leads", &records, &["workflow"])
            .unwrap();
        assert_eq!(result.succeeded_ids(), ["410888000000701001"]);

        let sent = transport.last_request().unwrap();
        assert_eq!(sent.method, HttpMethod::Post);
        let json: Value = serde_json::from_str(sent.body.as_deref().unwrap()).unwrap();
        assert_eq!(json, json!({"data": [{"Last_Name": "Lovelace", "Company": "Engines"}], "trigger": ["workflow"]}));
    }

    #[test]
    fn update_records_omits_empty_trigger() {
        let transport = FakeTransport::new().respond(200, r#"{"data":[]}"#);
        let records = vec![record(json!({"id": "1", "Company": "New"}))];
        api(&transport).update_records("Leads", &records, &[]).unwrap();

        let sent = transport.last_request().unwrap();
        assert_eq!(sent.method, HttpMethod::Put);
        let json: Value = serde_json::from_str(sent.body.as_deref().unwrap()).unwrap();
        assert!(json.get("trigger").is_none());
    }

    #[test]
    fn delete_records_joins_ids() {
        let transport = FakeTransport::new().respond(200, r#"{"data":[]}"#);
        api(&transport).delete_records("Leads", &["1", "2"]).unwrap();
        let sent = transport.last_request().unwrap();
        assert_eq!(sent.method, HttpMethod::Delete);
        assert_eq!(sent.query_param("ids"), Some("1,2"));
        assert!(sent.body.is_none());

        let err = api(&FakeTransport::new()).delete_records("Leads", &[]).unwrap_err();
        assert!(matches!(
            err.api_error(),
            ApiError::Parameter(ParameterError::Missing { name }) if name == "ids"
        ));
    }

    #[test]
    fn search_needs_a_term() {
        let transport = FakeTransport::new();
        let err = api(&transport).search_records("Leads", Params::new()).unwrap_err();
        assert!(matches!(
            err.api_error(),
            ApiError::Parameter(ParameterError::MissingOneOf { names }) if names.len() == 4
        ));
        assert_eq!(transport.calls(), 0);

        let transport = FakeTransport::new().respond(204, "");
        let found = api(&transport)
            .search_records("Leads", Params::from([("email", "ada@example.com")]))
            .unwrap();
        assert!(found.data.is_empty());
        let sent = transport.last_request().unwrap();
        assert_eq!(sent.url, "https://www.zohoapis.in/crm/v2/Leads/search");
        assert_eq!(sent.query_param("email"), Some("ada@example.com"));
    }
}
