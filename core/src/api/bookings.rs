//! Zoho Bookings (`/bookings/v1/json`).
//!
//! Bookings wraps every payload in `{"response": {"status", "returnvalue"}}`
//! and takes form-encoded bodies on its write endpoints. It is not scoped by
//! organization.

use serde::{Deserialize, Serialize};

use super::ModuleContext;
use crate::client::ZohoClient;
use crate::config::{TenantConfig, TenantScope};
use crate::endpoint::Endpoint;
use crate::error::ZohoError;
use crate::param::{ParamSpec, Params};

pub const MODULE: &str = "bookings";

/// `{"response": {"status": "success", "returnvalue": R}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingsResponse<R> {
    pub response: Envelope<R>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<R> {
    pub status: String,
    pub returnvalue: R,
}

impl<R> BookingsResponse<R> {
    pub fn into_inner(self) -> R {
        self.response.returnvalue
    }
}

/// Zoho answers an empty day with a message instead of a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Slots {
    Times(Vec<String>),
    Message(String),
}

impl Slots {
    pub fn times(&self) -> &[String] {
        match self {
            Slots::Times(times) => times,
            Slots::Message(_) => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Availability {
    pub response: bool,
    pub data: Slots,
    #[serde(default)]
    pub time_zone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataList<T> {
    pub data: Vec<T>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub service_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Staff {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub booking_id: String,
    pub status: String,
    #[serde(default)]
    pub service_name: Option<String>,
    #[serde(default)]
    pub staff_name: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub time_zone: Option<String>,
}

/// Sent as the `customer_details` form field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

pub type AvailabilityResponse = BookingsResponse<Availability>;
pub type WorkspacesResponse = BookingsResponse<DataList<Workspace>>;
pub type ServicesResponse = BookingsResponse<DataList<Service>>;
pub type StaffResponse = BookingsResponse<DataList<Staff>>;
pub type ResourcesResponse = BookingsResponse<DataList<Resource>>;
pub type AppointmentResponse = BookingsResponse<Appointment>;

static AVAILABILITY: &[ParamSpec] = &[
    ParamSpec::query("serviceID", "service_id").required(),
    ParamSpec::query("staffID", "staff_id"),
    ParamSpec::query("resourceID", "resource_id"),
    ParamSpec::query("date", "selected_date").required(),
];

static WORKSPACES: &[ParamSpec] = &[ParamSpec::query("workspaceID", "workspace_id")];

static SERVICES: &[ParamSpec] = &[
    ParamSpec::query("workspaceID", "workspace_id"),
    ParamSpec::query("serviceID", "service_id"),
    ParamSpec::query("staffID", "staff_id"),
];

static STAFF: &[ParamSpec] = &[
    ParamSpec::query("serviceID", "service_id"),
    ParamSpec::query("staffID", "staff_id"),
    ParamSpec::query("staffEmail", "staff_email"),
];

static RESOURCES: &[ParamSpec] = &[
    ParamSpec::query("serviceID", "service_id"),
    ParamSpec::query("resourceID", "resource_id"),
];

static FETCH_APPOINTMENT: &[ParamSpec] = &[ParamSpec::query("bookingID", "booking_id").required()];

static BOOK_APPOINTMENT: &[ParamSpec] = &[
    ParamSpec::body("serviceID", "service_id").required(),
    ParamSpec::body("staffID", "staff_id"),
    ParamSpec::body("resourceID", "resource_id"),
    ParamSpec::body("fromTime", "from_time").required(),
    ParamSpec::body("timeZone", "time_zone"),
];

static UPDATE_APPOINTMENT: &[ParamSpec] = &[
    ParamSpec::body("bookingID", "booking_id").required(),
    ParamSpec::body("action", "action").required(),
];

static RESCHEDULE_APPOINTMENT: &[ParamSpec] = &[
    ParamSpec::body("bookingID", "booking_id").required(),
    ParamSpec::body("staffID", "staff_id"),
    ParamSpec::body("startTime", "start_time"),
];

static STAFF_OR_RESOURCE: &[&[&str]] = &[&["staffID", "resourceID"]];
static STAFF_OR_START: &[&[&str]] = &[&["staffID", "startTime"]];

pub fn availability() -> Endpoint<AvailabilityResponse> {
    Endpoint::get("availability", "/bookings/v1/json/availableslots")
        .action("retrieve availability")
        .params(AVAILABILITY)
        .any_of(STAFF_OR_RESOURCE)
}

pub fn workspaces() -> Endpoint<WorkspacesResponse> {
    Endpoint::get("workspaces", "/bookings/v1/json/workspaces")
        .action("retrieve workspaces")
        .params(WORKSPACES)
}

pub fn services() -> Endpoint<ServicesResponse> {
    Endpoint::get("services", "/bookings/v1/json/services")
        .action("retrieve services")
        .params(SERVICES)
}

pub fn staff() -> Endpoint<StaffResponse> {
    Endpoint::get("staff", "/bookings/v1/json/staffs")
        .action("retrieve staff")
        .params(STAFF)
}

pub fn resources() -> Endpoint<ResourcesResponse> {
    Endpoint::get("resources", "/bookings/v1/json/resources")
        .action("retrieve resources")
        .params(RESOURCES)
}

pub fn fetch_appointment() -> Endpoint<AppointmentResponse> {
    Endpoint::get("fetch_appointment", "/bookings/v1/json/getappointment")
        .action("retrieve appointment")
        .params(FETCH_APPOINTMENT)
}

pub fn book_appointment() -> Endpoint<AppointmentResponse> {
    Endpoint::post("book_appointment", "/bookings/v1/json/appointment")
        .action("book appointment")
        .params(BOOK_APPOINTMENT)
        .any_of(STAFF_OR_RESOURCE)
        .form()
}

pub fn update_appointment() -> Endpoint<AppointmentResponse> {
    Endpoint::post("update_appointment", "/bookings/v1/json/updateappointment")
        .action("update appointment")
        .params(UPDATE_APPOINTMENT)
        .form()
}

pub fn reschedule_appointment() -> Endpoint<AppointmentResponse> {
    Endpoint::post("reschedule_appointment", "/bookings/v1/json/rescheduleappointment")
        .action("reschedule appointment")
        .params(RESCHEDULE_APPOINTMENT)
        .any_of(STAFF_OR_START)
        .form()
}

/// Zoho Bookings facade.
#[derive(Debug, Clone)]
pub struct BookingsApi {
    ctx: ModuleContext,
}

impl BookingsApi {
    pub fn new(client: &ZohoClient, tenant: TenantConfig) -> Self {
        Self {
            ctx: ModuleContext::new(MODULE, client, tenant, TenantScope::None),
        }
    }

    pub fn context(&self) -> &ModuleContext {
        &self.ctx
    }

    /// Open slots for a service on a date. Needs `serviceID`, `date` and one
    /// of `staffID` / `resourceID`.
    pub fn fetch_availability(&self, params: Params) -> Result<AvailabilityResponse, ZohoError> {
        self.ctx.run(availability(), params)
    }

    pub fn fetch_workspaces(&self, params: Params) -> Result<WorkspacesResponse, ZohoError> {
        self.ctx.run(workspaces(), params)
    }

    pub fn fetch_services(&self, params: Params) -> Result<ServicesResponse, ZohoError> {
        self.ctx.run(services(), params)
    }

    pub fn fetch_staff(&self, params: Params) -> Result<StaffResponse, ZohoError> {
        self.ctx.run(staff(), params)
    }

    pub fn fetch_resources(&self, params: Params) -> Result<ResourcesResponse, ZohoError> {
        self.ctx.run(resources(), params)
    }

    pub fn fetch_appointment(&self, booking_id: &str) -> Result<AppointmentResponse, ZohoError> {
        self.ctx
            .run(fetch_appointment(), Params::new().with("bookingID", booking_id))
    }

    pub fn book_appointment(
        &self,
        params: Params,
        customer: &CustomerDetails,
    ) -> Result<AppointmentResponse, ZohoError> {
        #[derive(Serialize)]
        struct Payload<'a> {
            customer_details: &'a CustomerDetails,
        }
        self.ctx.run_with_body(
            book_appointment(),
            params,
            &Payload {
                customer_details: customer,
            },
        )
    }

    /// `action` is one of `completed`, `cancel`, `noshow`.
    pub fn update_appointment(&self, booking_id: &str, action: &str) -> Result<AppointmentResponse, ZohoError> {
        let params = Params::from([("bookingID", booking_id), ("action", action)]);
        self.ctx.run(update_appointment(), params)
    }

    pub fn reschedule_appointment(&self, params: Params) -> Result<AppointmentResponse, ZohoError> {
        self.ctx.run(reschedule_appointment(), params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ApiError, ParameterError};
    use crate::http::HttpMethod;
    use crate::testing::{FakeAuthenticator, FakeTransport};

    const AVAILABLE: &str = r#"{"response":{"returnvalue":{"response":true,"data":["09:00","09:30"],"time_zone":"Asia/Kolkata"},"status":"success"}}"#;

    fn api(transport: &FakeTransport) -> BookingsApi {
        let client = ZohoClient::new(FakeAuthenticator::token("t"), transport.clone());
        BookingsApi::new(&client, TenantConfig::new("eu"))
    }

    #[test]
    fn availability_request_and_decode() {
        let transport = FakeTransport::new().respond(200, AVAILABLE);
        let result = api(&transport)
            .fetch_availability(Params::from([
                ("serviceID", "s1"),
                ("staffID", "st1"),
                ("date", "2024-01-01"),
            ]))
            .unwrap();

        assert_eq!(result.response.status, "success");
        let slots = result.into_inner();
        assert_eq!(slots.data.times(), ["09:00", "09:30"]);
        assert_eq!(slots.time_zone.as_deref(), Some("Asia/Kolkata"));

        let sent = transport.last_request().unwrap();
        assert_eq!(sent.url, "https://www.zohoapis.eu/bookings/v1/json/availableslots");
        assert_eq!(sent.query_param("service_id"), Some("s1"));
        assert_eq!(sent.query_param("staff_id"), Some("st1"));
        assert_eq!(sent.query_param("selected_date"), Some("2024-01-01"));
    }

    #[test]
    fn availability_needs_staff_or_resource() {
        let transport = FakeTransport::new();
        let err = api(&transport)
            .fetch_availability(Params::from([("serviceID", "s1"), ("date", "2024-01-01")]))
            .unwrap_err();
        assert!(matches!(
            err.api_error(),
            ApiError::Parameter(ParameterError::MissingOneOf { .. })
        ));
        assert!(err.to_string().starts_with("Failed to retrieve availability: "));
        assert_eq!(transport.calls(), 0);

        let transport = FakeTransport::new().respond(200, AVAILABLE);
        api(&transport)
            .fetch_availability(Params::from([
                ("serviceID", "s1"),
                ("resourceID", "r1"),
                ("date", "2024-01-01"),
            ]))
            .unwrap();
        assert_eq!(transport.calls(), 1);
    }

    #[test]
    fn no_slots_message_decodes() {
        let body = r#"{"response":{"returnvalue":{"response":true,"data":"Slots Not Available"},"status":"success"}}"#;
        let transport = FakeTransport::new().respond(200, body);
        let result = api(&transport)
            .fetch_availability(Params::from([
                ("serviceID", "s1"),
                ("staffID", "st1"),
                ("date", "2024-01-01"),
            ]))
            .unwrap();
        let slots = result.into_inner();
        assert!(slots.data.times().is_empty());
        assert_eq!(slots.data, Slots::Message("Slots Not Available".to_string()));
    }

    #[test]
    fn book_appointment_posts_form() {
        let body = r##"{"response":{"returnvalue":{"booking_id":"#1234","status":"upcoming"},"status":"success"}}"##;
        let transport = FakeTransport::new().respond(200, body);
        let customer = CustomerDetails {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            phone_number: None,
        };
        let booked = api(&transport)
            .book_appointment(
                Params::from([
                    ("serviceID", "s1"),
                    ("staffID", "st1"),
                    ("fromTime", "01-Jan-2024 09:00:00"),
                ]),
                &customer,
            )
            .unwrap();
        assert_eq!(booked.into_inner().booking_id, "#1234");

        let sent = transport.last_request().unwrap();
        assert_eq!(sent.method, HttpMethod::Post);
        assert_eq!(sent.header("content-type"), Some("application/x-www-form-urlencoded"));
        let form: Vec<(String, String)> = url::form_urlencoded::parse(sent.body.as_deref().unwrap().as_bytes())
            .into_owned()
            .collect();
        assert!(form.contains(&(
            "customer_details".to_string(),
            r#"{"email":"ada@example.com","name":"Ada"}"#.to_string()
        )));
        assert!(form.contains(&("from_time".to_string(), "01-Jan-2024 09:00:00".to_string())));
        assert!(form.contains(&("service_id".to_string(), "s1".to_string())));
        assert!(sent.query.is_empty());
    }

    #[test]
    fn fetch_appointment_requires_booking_id() {
        let transport = FakeTransport::new();
        let err = api(&transport).fetch_appointment("").unwrap_err();
        assert!(matches!(
            err.api_error(),
            ApiError::Parameter(ParameterError::Missing { name }) if name == "bookingID"
        ));
        assert_eq!(err.operation(), "fetch_appointment");
        assert_eq!(transport.calls(), 0);
    }

    #[test]
    fn reschedule_needs_staff_or_start_time() {
        let transport = FakeTransport::new();
        let err = api(&transport)
            .reschedule_appointment(Params::from([("bookingID", "#1")]))
            .unwrap_err();
        assert!(matches!(
            err.api_error(),
            ApiError::Parameter(ParameterError::MissingOneOf { names }) if names.len() == 2
        ));
    }
}
