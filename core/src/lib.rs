//! Fetch helpers for resource editing, form submission and cookies.
//!
//! # Overview
//! Sends PATCH/DELETE requests against `<base>/<id>` resource endpoints,
//! intercepts form submissions to post them in the background and react to
//! a conflict or redirect status, and reads a named cookie.
//!
//! # Design
//! - The browser environment is injected: an HTTP [`Transport`], a
//!   [`Window`] for alerts and navigation, a [`Document`] for form lookup and
//!   a [`CookieStore`]. Nothing reads globals, so everything runs against
//!   fakes in tests.
//! - Requests are plain data (`HttpRequest` / `HttpResponse`); the transport
//!   performs the I/O.
//! - The lenient helpers return the raw response for any status and log
//!   failures instead of propagating them. `fetch_json` is the strict path.

pub mod client;
pub mod cookie;
pub mod env;
pub mod error;
pub mod form;
pub mod form_data;
pub mod http;
pub mod transport;

#[cfg(test)]
mod test_support;

pub use client::{bearer_headers, build_request, resource_url, Payload, ResourceClient};
pub use cookie::{get_cookie, parse_cookie};
pub use env::{CookieStore, Document, Window};
pub use error::ApiError;
pub use form::{
    FormConfig, FormEncoding, FormInterceptor, SubmissionState, SubmitEvent, SubmitOutcome, SubmitPolicy,
};
pub use form_data::{FormData, FormValue};
pub use http::{Body, HttpMethod, HttpRequest, HttpResponse};
pub use transport::Transport;
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
