//! Asynchronous form submission with status-driven reactions.
//!
//! # Design
//! A `FormInterceptor` is bound to one form id. Each submit event for that
//! form has its default navigation suppressed, the form's fields are sent
//! through the request sender, and the response status picks the reaction:
//! the conflict status shows the configured message, the redirect status
//! navigates to the URL named in the JSON body, anything else is ignored.
//! Failures are logged and the form simply goes back to idle.
//!
//! There is no in-flight guard; submitting twice sends twice.

use std::cell::Cell;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error};

use crate::client::{bearer_headers, Payload, ResourceClient};
use crate::env::{Document, Window};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpResponse};
use crate::transport::Transport;

pub const DEFAULT_CONFLICT_STATUS: u16 = 409;
pub const DEFAULT_REDIRECT_STATUS: u16 = 303;
pub const DEFAULT_REDIRECT_FIELD: &str = "redirectUrl";

/// Which statuses trigger a reaction and where the redirect target lives.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SubmitPolicy {
    pub conflict_status: u16,
    pub redirect_status: u16,
    pub redirect_field: String,
}

impl Default for SubmitPolicy {
    fn default() -> Self {
        Self {
            conflict_status: DEFAULT_CONFLICT_STATUS,
            redirect_status: DEFAULT_REDIRECT_STATUS,
            redirect_field: DEFAULT_REDIRECT_FIELD.to_string(),
        }
    }
}

/// How the form's fields are packaged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormEncoding {
    #[default]
    Multipart,
    /// A flat JSON object of the fields.
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FormConfig {
    pub form_id: String,
    pub url: String,
    #[serde(default)]
    pub method: HttpMethod,
    #[serde(default)]
    pub encoding: FormEncoding,
    pub conflict_message: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub policy: SubmitPolicy,
}

impl FormConfig {
    pub fn new(form_id: &str, url: &str, conflict_message: &str) -> Self {
        Self {
            form_id: form_id.to_string(),
            url: url.to_string(),
            method: HttpMethod::Post,
            encoding: FormEncoding::Multipart,
            conflict_message: conflict_message.to_string(),
            token: None,
            policy: SubmitPolicy::default(),
        }
    }

    pub fn from_json(text: &str) -> Result<Self, ApiError> {
        serde_json::from_str(text).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }
}

/// A submit event as dispatched to listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitEvent {
    pub target: String,
    pub default_prevented: bool,
}

impl SubmitEvent {
    pub fn new(target: &str) -> Self {
        Self {
            target: target.to_string(),
            default_prevented: false,
        }
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    InFlight,
}

/// What a submission ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Conflict status; the message was shown.
    Conflict,
    /// Redirect status; the page was sent to this URL.
    Redirected(String),
    /// Redirect status without a usable target.
    NoRedirect,
    /// Any other status.
    Ignored(u16),
    /// The request or the response body failed; logged only.
    Failed,
}

pub struct FormInterceptor<T, D, W> {
    config: FormConfig,
    client: ResourceClient<T>,
    document: D,
    window: W,
    state: Cell<SubmissionState>,
}

impl<T: Transport, D: Document, W: Window> FormInterceptor<T, D, W> {
    /// Bind to the form named in `config`.
    pub fn attach(config: FormConfig, document: D, transport: T, window: W) -> Result<Self, ApiError> {
        if !document.has_form(&config.form_id) {
            return Err(ApiError::FormNotFound(config.form_id));
        }
        debug!(form = %config.form_id, url = %config.url, "form submission intercepted");
        Ok(Self {
            config,
            client: ResourceClient::new(transport),
            document,
            window,
            state: Cell::new(SubmissionState::Idle),
        })
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    pub fn state(&self) -> SubmissionState {
        self.state.get()
    }

    /// Handle a submit event. Events for other forms return `None` untouched.
    pub fn handle_submit(&self, event: &mut SubmitEvent) -> Option<SubmitOutcome> {
        if event.target != self.config.form_id {
            return None;
        }
        event.prevent_default();
        self.state.set(SubmissionState::InFlight);
        let outcome = self.submit();
        self.state.set(SubmissionState::Idle);
        Some(outcome)
    }

    fn submit(&self) -> SubmitOutcome {
        let Some(fields) = self.document.form_data(&self.config.form_id) else {
            error!(form = %self.config.form_id, "form disappeared before submission");
            return SubmitOutcome::Failed;
        };
        let payload = match self.config.encoding {
            FormEncoding::Multipart => Payload::Multipart(fields),
            FormEncoding::Json => Payload::Json(fields.to_json()),
        };
        let headers = bearer_headers(self.config.token.as_deref());
        match self
            .client
            .send_request(&self.config.url, self.config.method, Some(payload), headers)
        {
            Some(response) => self.react(&response),
            None => SubmitOutcome::Failed,
        }
    }

    fn react(&self, response: &HttpResponse) -> SubmitOutcome {
        let policy = &self.config.policy;
        if response.status == policy.conflict_status {
            self.window.alert(&self.config.conflict_message);
            return SubmitOutcome::Conflict;
        }
        if response.status != policy.redirect_status {
            debug!(status = response.status, form = %self.config.form_id, "ignoring response");
            return SubmitOutcome::Ignored(response.status);
        }

        let body: Value = match response.json() {
            Ok(v) => v,
            Err(e) => {
                error!(form = %self.config.form_id, error = %e, "redirect response was not JSON");
                return SubmitOutcome::Failed;
            }
        };
        match body
            .get(&policy.redirect_field)
            .and_then(Value::as_str)
            .filter(|url| !url.is_empty())
        {
            Some(url) => {
                self.window.navigate(url);
                SubmitOutcome::Redirected(url.to_string())
            }
            None => {
                debug!(field = %policy.redirect_field, "redirect response had no target");
                SubmitOutcome::NoRedirect
            }
        }
    }
}
