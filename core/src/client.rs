//! Request sender and resource editor/deleter.
//!
//! # Design
//! `build_request` is pure: it turns a URL, method, optional payload and
//! header list into an `HttpRequest`. `ResourceClient` owns only the
//! injected `Transport` and carries no mutable state between calls.
//!
//! Two error policies sit side by side. The lenient surface
//! (`send_request`, `edit_resource`, `delete_resource`) returns the raw
//! response whatever its status, and turns failures into a logged `None`.
//! The strict surface (`fetch_json`) treats a non-2xx status as an error and
//! parses the body.

use std::fmt::Display;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error};

use crate::env::Window;
use crate::error::ApiError;
use crate::form_data::FormData;
use crate::http::{Body, HttpMethod, HttpRequest, HttpResponse};
use crate::transport::Transport;

/// A request body before encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Serialized to JSON text and tagged `application/json`. `null`, `false`,
    /// `0` and `""` count as no body.
    Json(Value),
    /// Sent as-is.
    Multipart(FormData),
}

impl Payload {
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, ApiError> {
        serde_json::to_value(value)
            .map(Payload::Json)
            .map_err(|e| ApiError::SerializationError(e.to_string()))
    }
}

impl From<FormData> for Payload {
    fn from(data: FormData) -> Self {
        Payload::Multipart(data)
    }
}

/// Assemble a request. Caller headers keep their order; a JSON body replaces
/// any caller-supplied content type with `application/json`.
pub fn build_request(
    url: &str,
    method: HttpMethod,
    body: Option<Payload>,
    headers: Vec<(String, String)>,
) -> Result<HttpRequest, ApiError> {
    let mut headers = headers;
    let body = match body {
        None => None,
        Some(Payload::Json(value)) if is_falsy(&value) => None,
        Some(Payload::Multipart(data)) => Some(Body::Multipart(data)),
        Some(Payload::Json(value)) => {
            let text =
                serde_json::to_string(&value).map_err(|e| ApiError::SerializationError(e.to_string()))?;
            headers.retain(|(k, _)| !k.eq_ignore_ascii_case("content-type"));
            headers.push(("content-type".to_string(), "application/json".to_string()));
            Some(Body::Json(text))
        }
    };
    Ok(HttpRequest {
        method,
        url: url.to_string(),
        headers,
        body,
    })
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        _ => false,
    }
}

/// `authorization: Bearer <token>` when a non-empty token is given.
pub fn bearer_headers(token: Option<&str>) -> Vec<(String, String)> {
    match token {
        Some(t) if !t.is_empty() => vec![("authorization".to_string(), format!("Bearer {t}"))],
        _ => Vec::new(),
    }
}

/// `<base>/<id>`, ignoring trailing slashes on `base`.
pub fn resource_url(base_url: &str, id: impl Display) -> String {
    format!("{}/{id}", base_url.trim_end_matches('/'))
}

/// Sends requests through an injected transport.
#[derive(Debug, Clone)]
pub struct ResourceClient<T> {
    transport: T,
}

impl<T: Transport> ResourceClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Build and execute a request, returning the response whatever its status.
    pub fn try_send_request(
        &self,
        url: &str,
        method: HttpMethod,
        body: Option<Payload>,
        headers: Vec<(String, String)>,
    ) -> Result<HttpResponse, ApiError> {
        let request = build_request(url, method, body, headers)?;
        debug!(%method, url, "sending request");
        self.transport.execute(request)
    }

    /// Like `try_send_request`, but failures are logged and become `None`.
    pub fn send_request(
        &self,
        url: &str,
        method: HttpMethod,
        body: Option<Payload>,
        headers: Vec<(String, String)>,
    ) -> Option<HttpResponse> {
        match self.try_send_request(url, method, body, headers) {
            Ok(response) => Some(response),
            Err(e) => {
                error!(%method, url, error = %e, "request failed");
                None
            }
        }
    }

    /// PATCH `details` to `<base_url>/<id>`.
    pub fn edit_resource<D: Serialize + ?Sized>(
        &self,
        id: impl Display,
        details: &D,
        base_url: &str,
        token: Option<&str>,
    ) -> Option<HttpResponse> {
        let url = resource_url(base_url, id);
        let payload = match Payload::json(details) {
            Ok(p) => p,
            Err(e) => {
                error!(url = %url, error = %e, "could not serialize resource details");
                return None;
            }
        };
        self.send_request(&url, HttpMethod::Patch, Some(payload), bearer_headers(token))
    }

    /// DELETE `<base_url>/<id>`.
    pub fn delete_resource(
        &self,
        id: impl Display,
        base_url: &str,
        token: Option<&str>,
    ) -> Option<HttpResponse> {
        let url = resource_url(base_url, id);
        self.send_request(&url, HttpMethod::Delete, None, bearer_headers(token))
    }

    /// Send a request and parse a 2xx body as `R`. Any other status is an error.
    pub fn fetch_json<R: DeserializeOwned>(
        &self,
        url: &str,
        method: HttpMethod,
        body: Option<Payload>,
        headers: Vec<(String, String)>,
    ) -> Result<R, ApiError> {
        let response = self.try_send_request(url, method, body, headers)?;
        check_status(&response)?;
        response.json()
    }

    /// PATCH the resource and reload the page if the server accepted it.
    pub fn edit_and_reload<D: Serialize + ?Sized, W: Window>(
        &self,
        window: &W,
        id: impl Display,
        details: &D,
        base_url: &str,
        token: Option<&str>,
    ) {
        let response = self.edit_resource(id, details, base_url, token);
        reload_on_success(window, response);
    }

    /// DELETE the resource and reload the page if the server accepted it.
    pub fn delete_and_reload<W: Window>(
        &self,
        window: &W,
        id: impl Display,
        base_url: &str,
        token: Option<&str>,
    ) {
        let response = self.delete_resource(id, base_url, token);
        reload_on_success(window, response);
    }
}

fn reload_on_success<W: Window>(window: &W, response: Option<HttpResponse>) {
    match response {
        Some(r) if r.is_success() => window.reload(),
        Some(r) => error!(status = r.status, body = %r.body, "server rejected the change"),
        None => {}
    }
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}
