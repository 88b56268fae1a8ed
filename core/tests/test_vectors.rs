//! Verify the helpers against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, the expected request and, for form
//! submission, a simulated response with the expected reaction. Comparing
//! parsed JSON (not raw strings) avoids false negatives from field ordering.

use std::cell::RefCell;

use formfetch_core::{
    parse_cookie, ApiError, Body, Document, FormConfig, FormData, FormInterceptor, HttpMethod, HttpRequest,
    HttpResponse, ResourceClient, SubmitEvent, SubmitOutcome, Transport, Window,
};
use serde_json::Value;

/// Records requests and answers each with the same canned response.
struct Canned {
    response: HttpResponse,
    seen: RefCell<Vec<HttpRequest>>,
}

impl Canned {
    fn new(status: u16, body: &str) -> Self {
        Self {
            response: HttpResponse {
                status,
                headers: Vec::new(),
                body: body.to_string(),
            },
            seen: RefCell::new(Vec::new()),
        }
    }
}

impl Transport for Canned {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.seen.borrow_mut().push(request);
        Ok(self.response.clone())
    }
}

#[derive(Default)]
struct Page {
    alerts: RefCell<Vec<String>>,
    visits: RefCell<Vec<String>>,
}

impl Window for Page {
    fn alert(&self, message: &str) {
        self.alerts.borrow_mut().push(message.to_string());
    }

    fn navigate(&self, url: &str) {
        self.visits.borrow_mut().push(url.to_string());
    }

    fn reload(&self) {}
}

struct OneForm;

impl Document for OneForm {
    fn has_form(&self, form_id: &str) -> bool {
        form_id == "signup"
    }

    fn form_data(&self, _form_id: &str) -> Option<FormData> {
        Some([("username", "ann")].into_iter().collect())
    }
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "PATCH" => HttpMethod::Patch,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

// ---------------------------------------------------------------------------
// Cookies
// ---------------------------------------------------------------------------

#[test]
fn cookie_test_vectors() {
    let raw = include_str!("../../test-vectors/cookie.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let cookies = case["cookies"].as_str().unwrap();
        let lookup = case["lookup"].as_str().unwrap();
        assert_eq!(parse_cookie(cookies, lookup), case["expected"].as_str().unwrap(), "{name}");
    }
}

// ---------------------------------------------------------------------------
// Edit / delete
// ---------------------------------------------------------------------------

#[test]
fn resource_test_vectors() {
    let raw = include_str!("../../test-vectors/resource.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let base_url = case["base_url"].as_str().unwrap();
        let id = case["id"].as_str().unwrap();
        let token = case["token"].as_str();

        let transport = Canned::new(200, "{}");
        let client = ResourceClient::new(&transport);
        let response = match case["operation"].as_str().unwrap() {
            "edit" => client.edit_resource(id, &case["details"], base_url, token),
            "delete" => client.delete_resource(id, base_url, token),
            other => panic!("{name}: unknown operation: {other}"),
        };
        assert_eq!(response.map(|r| r.status), Some(200), "{name}: response");

        let req = transport.seen.borrow().last().cloned().unwrap();
        let expected_req = &case["expected_request"];
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.url, expected_req["url"].as_str().unwrap(), "{name}: url");

        let expected_headers: Vec<(String, String)> = expected_req["headers"]
            .as_array()
            .unwrap()
            .iter()
            .map(|h| {
                let arr = h.as_array().unwrap();
                (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
            })
            .collect();
        assert_eq!(req.headers, expected_headers, "{name}: headers");

        match (&req.body, &expected_req["body"]) {
            (None, Value::Null) => {}
            (Some(Body::Json(text)), expected) => {
                let sent: Value = serde_json::from_str(text).unwrap();
                assert_eq!(&sent, expected, "{name}: body");
            }
            (other, expected) => panic!("{name}: body {other:?} does not match {expected}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Form submission
// ---------------------------------------------------------------------------

#[test]
fn submit_test_vectors() {
    let raw = include_str!("../../test-vectors/submit.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let status = case["status"].as_u64().unwrap() as u16;
        let transport = Canned::new(status, case["body"].as_str().unwrap());
        let page = Page::default();
        let config = FormConfig::new("signup", "http://localhost:3000/register", "Taken");
        let interceptor = FormInterceptor::attach(config, OneForm, &transport, &page).unwrap();

        let mut event = SubmitEvent::new("signup");
        let outcome = interceptor.handle_submit(&mut event).unwrap();
        assert!(event.default_prevented, "{name}: default prevented");

        let kind = match &outcome {
            SubmitOutcome::Conflict => "Conflict",
            SubmitOutcome::Redirected(_) => "Redirected",
            SubmitOutcome::NoRedirect => "NoRedirect",
            SubmitOutcome::Ignored(s) => {
                assert_eq!(*s, status, "{name}: ignored status");
                "Ignored"
            }
            SubmitOutcome::Failed => "Failed",
        };
        assert_eq!(kind, case["expected"].as_str().unwrap(), "{name}: outcome");

        let expected_alerts = if case["alert"].as_bool().unwrap() { 1 } else { 0 };
        assert_eq!(page.alerts.borrow().len(), expected_alerts, "{name}: alerts");

        let expected_visits: Vec<String> = case["navigate"].as_str().map(str::to_string).into_iter().collect();
        assert_eq!(*page.visits.borrow(), expected_visits, "{name}: navigation");
    }
}
