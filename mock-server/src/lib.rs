//! In-memory emulation of the Zoho REST surface the client facades call.
//!
//! Every route sits behind [`require_token`], which answers 401 unless the
//! request carries `Authorization: Zoho-oauthtoken <token>`. Validation
//! failures answer 400 with Zoho's `{"code", "message"}` envelope.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const EXPENSE_ORG_HEADER: &str = "x-com-zoho-expense-organizationid";
pub const SUBSCRIPTIONS_ORG_HEADER: &str = "x-com-zoho-subscriptions-organizationid";

type Record = Map<String, Value>;
type Fields = HashMap<String, String>;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Appointment {
    pub booking_id: String,
    pub status: String,
    pub service_name: String,
    pub staff_name: String,
    pub start_time: String,
    pub customer_name: String,
    pub customer_email: String,
}

#[derive(Deserialize)]
struct CustomerDetails {
    name: String,
    email: String,
}

#[derive(Deserialize)]
struct RecordsInput {
    data: Vec<Record>,
}

#[derive(Default)]
pub struct Store {
    records: RwLock<HashMap<String, Vec<Record>>>,
    appointments: RwLock<HashMap<String, Appointment>>,
}

pub type Db = Arc<Store>;

pub fn app() -> Router {
    let db: Db = Arc::new(Store::default());
    Router::new()
        .route("/bookings/v1/json/availableslots", get(available_slots))
        .route("/bookings/v1/json/services", get(list_services))
        .route("/bookings/v1/json/getappointment", get(get_appointment))
        .route("/bookings/v1/json/appointment", post(book_appointment))
        .route("/books/v3/invoices", get(list_invoices))
        .route("/crm/v2/{module}", get(list_records).post(insert_records))
        .route("/crm/v2/{module}/search", get(search_records))
        .route("/crm/v2/{module}/{id}", get(get_record))
        .route("/expense/v1/expensereports", get(list_expense_reports))
        .route("/billing/v1/plans", get(list_plans))
        .route("/billing/v1/subscriptions", get(failing))
        .layer(middleware::from_fn(require_token))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn zoho_error(status: StatusCode, code: impl Serialize, message: &str) -> Response {
    (status, Json(json!({ "code": code, "message": message }))).into_response()
}

fn bookings_ok(returnvalue: Value) -> Response {
    Json(json!({ "response": { "status": "success", "returnvalue": returnvalue } })).into_response()
}

fn present<'a>(query: &'a Fields, key: &str) -> Option<&'a str> {
    query.get(key).map(String::as_str).filter(|v| !v.is_empty())
}

pub async fn require_token(request: Request, next: Next) -> Response {
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Zoho-oauthtoken "))
        .is_some_and(|token| !token.trim().is_empty());
    if !authorized {
        tracing::debug!(uri = %request.uri(), "rejecting request without oauth token");
        return zoho_error(StatusCode::UNAUTHORIZED, "INVALID_TOKEN", "invalid oauth token");
    }
    next.run(request).await
}

async fn available_slots(Query(query): Query<Fields>) -> Response {
    if present(&query, "service_id").is_none() || present(&query, "selected_date").is_none() {
        return zoho_error(StatusCode::BAD_REQUEST, 2, "service_id and selected_date are required");
    }
    if present(&query, "staff_id").is_none() && present(&query, "resource_id").is_none() {
        return zoho_error(StatusCode::BAD_REQUEST, 2, "staff_id or resource_id is required");
    }
    bookings_ok(json!({
        "response": true,
        "data": ["09:00", "09:30", "10:00"],
        "time_zone": "Europe/London",
    }))
}

async fn list_services(Query(query): Query<Fields>) -> Response {
    let services = [
        json!({ "id": "svc-1", "name": "Consultation", "duration": "30 mins", "service_type": "APPOINTMENT" }),
        json!({ "id": "svc-2", "name": "Follow-up", "duration": "15 mins", "service_type": "APPOINTMENT" }),
    ];
    let data: Vec<Value> = match present(&query, "service_id") {
        Some(id) => services.into_iter().filter(|s| s["id"] == id).collect(),
        None => services.into_iter().collect(),
    };
    bookings_ok(json!({ "data": data }))
}

async fn get_appointment(State(db): State<Db>, Query(query): Query<Fields>) -> Response {
    let Some(id) = present(&query, "booking_id") else {
        return zoho_error(StatusCode::BAD_REQUEST, 2, "booking_id is required");
    };
    match db.appointments.read().await.get(id) {
        Some(appointment) => bookings_ok(json!(appointment)),
        None => zoho_error(StatusCode::NOT_FOUND, 4, "appointment not found"),
    }
}

async fn book_appointment(State(db): State<Db>, Form(form): Form<Fields>) -> Response {
    if present(&form, "service_id").is_none() || present(&form, "from_time").is_none() {
        return zoho_error(StatusCode::BAD_REQUEST, 2, "service_id and from_time are required");
    }
    let Some(staff) = present(&form, "staff_id").or_else(|| present(&form, "resource_id")) else {
        return zoho_error(StatusCode::BAD_REQUEST, 2, "staff_id or resource_id is required");
    };
    let customer: CustomerDetails = match form
        .get("customer_details")
        .map(|raw| serde_json::from_str::<CustomerDetails>(raw))
    {
        Some(Ok(customer)) => customer,
        _ => return zoho_error(StatusCode::BAD_REQUEST, 2, "customer_details is invalid"),
    };

    let appointment = Appointment {
        booking_id: format!("#{}", Uuid::new_v4().simple()),
        status: "upcoming".to_string(),
        service_name: form["service_id"].clone(),
        staff_name: staff.to_string(),
        start_time: form["from_time"].clone(),
        customer_name: customer.name,
        customer_email: customer.email,
    };
    db.appointments
        .write()
        .await
        .insert(appointment.booking_id.clone(), appointment.clone());
    bookings_ok(json!(appointment))
}

async fn list_invoices(Query(query): Query<Fields>) -> Response {
    let Some(org) = present(&query, "organization_id") else {
        return zoho_error(StatusCode::BAD_REQUEST, 6041, "organization_id is required");
    };
    let invoices = [
        json!({ "invoice_id": format!("{org}-1"), "invoice_number": "INV-00001", "status": "paid", "total": 120.0, "balance": 0.0 }),
        json!({ "invoice_id": format!("{org}-2"), "invoice_number": "INV-00002", "status": "draft", "total": 40.6, "balance": 40.6 }),
    ];
    let invoices: Vec<Value> = match present(&query, "status") {
        Some(status) => invoices.into_iter().filter(|i| i["status"] == status).collect(),
        None => invoices.into_iter().collect(),
    };
    Json(json!({
        "code": 0,
        "message": "success",
        "invoices": invoices,
        "page_context": { "page": 1, "per_page": 200, "has_more_page": false },
    }))
    .into_response()
}

fn record_list(data: Vec<Record>) -> Response {
    if data.is_empty() {
        return StatusCode::NO_CONTENT.into_response();
    }
    let count = data.len();
    Json(json!({
        "data": data,
        "info": { "per_page": 200, "count": count, "page": 1, "more_records": false },
    }))
    .into_response()
}

async fn list_records(State(db): State<Db>, Path(module): Path<String>) -> Response {
    let records = db.records.read().await;
    record_list(records.get(&module).cloned().unwrap_or_default())
}

async fn get_record(State(db): State<Db>, Path((module, id)): Path<(String, String)>) -> Response {
    let records = db.records.read().await;
    let found = records
        .get(&module)
        .into_iter()
        .flatten()
        .filter(|r| r.get("id").and_then(Value::as_str) == Some(id.as_str()))
        .cloned()
        .collect();
    record_list(found)
}

async fn insert_records(
    State(db): State<Db>,
    Path(module): Path<String>,
    Json(input): Json<RecordsInput>,
) -> Response {
    if input.data.is_empty() {
        return zoho_error(StatusCode::BAD_REQUEST, "INVALID_DATA", "data must not be empty");
    }
    let mut records = db.records.write().await;
    let stored = records.entry(module).or_default();
    let results: Vec<Value> = input
        .data
        .into_iter()
        .map(|mut record| {
            let id = Uuid::new_v4().to_string();
            record.insert("id".to_string(), Value::String(id.clone()));
            stored.push(record);
            json!({
                "code": "SUCCESS",
                "status": "success",
                "message": "record added",
                "details": { "id": id },
            })
        })
        .collect();
    (StatusCode::CREATED, Json(json!({ "data": results }))).into_response()
}

async fn search_records(
    State(db): State<Db>,
    Path(module): Path<String>,
    Query(query): Query<Fields>,
) -> Response {
    let (field, needle) = match (present(&query, "email"), present(&query, "word")) {
        (Some(email), _) => ("Email", email),
        (None, Some(word)) => ("", word),
        (None, None) => {
            return zoho_error(StatusCode::BAD_REQUEST, "REQUIRED_PARAM_MISSING", "email or word is required")
        }
    };
    let records = db.records.read().await;
    let found = records
        .get(&module)
        .into_iter()
        .flatten()
        .filter(|r| match field {
            "" => r.values().any(|v| v.as_str().is_some_and(|s| s.contains(needle))),
            field => r.get(field).and_then(Value::as_str) == Some(needle),
        })
        .cloned()
        .collect();
    record_list(found)
}

async fn list_expense_reports(headers: HeaderMap) -> Response {
    let org = headers
        .get(EXPENSE_ORG_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty());
    let Some(org) = org else {
        return zoho_error(StatusCode::BAD_REQUEST, 1, "organization header is required");
    };
    Json(json!({
        "code": 0,
        "message": "success",
        "expense_reports": [
            { "report_id": format!("{org}-r1"), "report_name": "Conference trip", "status": "submitted", "total": 412.5 },
        ],
        "page_context": { "page": 1, "per_page": 200, "has_more_page": false },
    }))
    .into_response()
}

async fn list_plans(headers: HeaderMap, Query(query): Query<Fields>) -> Response {
    if headers.get(SUBSCRIPTIONS_ORG_HEADER).is_none() {
        return zoho_error(StatusCode::BAD_REQUEST, 1, "organization header is required");
    }
    let plans = [
        json!({ "plan_code": "basic-monthly", "name": "Basic", "status": "active", "recurring_price": 10.0, "interval": 1, "interval_unit": "months" }),
        json!({ "plan_code": "legacy-yearly", "name": "Legacy", "status": "inactive", "recurring_price": 90.0, "interval": 1, "interval_unit": "years" }),
    ];
    let plans: Vec<Value> = match present(&query, "filter_by") {
        Some("PlanStatus.ACTIVE") => plans.into_iter().filter(|p| p["status"] == "active").collect(),
        Some("PlanStatus.INACTIVE") => plans.into_iter().filter(|p| p["status"] == "inactive").collect(),
        _ => plans.into_iter().collect(),
    };
    Json(json!({ "code": 0, "message": "success", "plans": plans })).into_response()
}

/// Simulated outage.
async fn failing() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "message": "boom" }))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn present_treats_empty_as_absent() {
        let query: Fields = [("a", ""), ("b", "1")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert_eq!(present(&query, "a"), None);
        assert_eq!(present(&query, "b"), Some("1"));
        assert_eq!(present(&query, "c"), None);
    }

    #[test]
    fn appointment_serializes_with_wire_names() {
        let appointment = Appointment {
            booking_id: "#1".to_string(),
            status: "upcoming".to_string(),
            service_name: "svc-1".to_string(),
            staff_name: "staff-1".to_string(),
            start_time: "01-Jan-2025 09:00:00".to_string(),
            customer_name: "Ada".to_string(),
            customer_email: "ada@example.com".to_string(),
        };
        let json = serde_json::to_value(&appointment).unwrap();
        assert_eq!(json["booking_id"], "#1");
        assert_eq!(json["customer_email"], "ada@example.com");
    }

    #[test]
    fn records_input_requires_data() {
        assert!(serde_json::from_str::<RecordsInput>(r#"{"trigger":[]}"#).is_err());
        let input: RecordsInput = serde_json::from_str(r#"{"data":[{"Last_Name":"Boyle"}]}"#).unwrap();
        assert_eq!(input.data[0]["Last_Name"], "Boyle");
    }
}
