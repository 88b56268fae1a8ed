//! The injected HTTP client.
//!
//! # Design
//! The helpers never reach for a global `fetch`. They build an `HttpRequest`
//! and hand it to whatever `Transport` the host supplied: `UreqTransport`
//! for real traffic, a recording fake in tests. Any HTTP status is a
//! successful execution; `Err` means the request never completed.

use std::rc::Rc;
use std::sync::Arc;

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};

/// Executes one HTTP round-trip.
pub trait Transport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for Rc<T> {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}

#[cfg(feature = "ureq")]
pub use self::blocking::{UreqTransport, MAX_BODY_BYTES};

#[cfg(feature = "ureq")]
mod blocking {
    use tracing::warn;
    use ureq::typestate::WithBody;
    use ureq::RequestBuilder;

    use super::Transport;
    use crate::error::ApiError;
    use crate::form_data::{new_boundary, FormData};
    use crate::http::{Body, HttpMethod, HttpRequest, HttpResponse};

    /// Upper bound on a buffered response body.
    pub const MAX_BODY_BYTES: u64 = 64 * 1024 * 1024;

    /// Blocking transport backed by a `ureq::Agent`.
    ///
    /// 4xx/5xx come back as data and redirects are not followed, so the
    /// caller sees the 303 the server actually sent.
    #[derive(Debug, Clone)]
    pub struct UreqTransport {
        agent: ureq::Agent,
    }

    impl Default for UreqTransport {
        fn default() -> Self {
            Self::new()
        }
    }

    impl UreqTransport {
        pub fn new() -> Self {
            let agent = ureq::Agent::config_builder()
                .http_status_as_error(false)
                .max_redirects(0)
                .build()
                .new_agent();
            Self { agent }
        }
    }

    impl Transport for UreqTransport {
        fn execute(&self, req: HttpRequest) -> Result<HttpResponse, ApiError> {
            let HttpRequest {
                method,
                url,
                headers,
                body,
            } = req;

            let result = match method {
                HttpMethod::Get | HttpMethod::Delete => {
                    if body.is_some() {
                        warn!(%method, %url, "dropping request body on a method without one");
                    }
                    let mut builder = if method == HttpMethod::Get {
                        self.agent.get(&url)
                    } else {
                        self.agent.delete(&url)
                    };
                    for (name, value) in &headers {
                        builder = builder.header(name.as_str(), value.as_str());
                    }
                    builder.call()
                }
                HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch => {
                    let mut builder = match method {
                        HttpMethod::Post => self.agent.post(&url),
                        HttpMethod::Put => self.agent.put(&url),
                        _ => self.agent.patch(&url),
                    };
                    for (name, value) in &headers {
                        builder = builder.header(name.as_str(), value.as_str());
                    }
                    send_with_body(builder, body)
                }
            };

            let mut response = result.map_err(|e| ApiError::Transport(e.to_string()))?;
            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .map(|(k, v)| (k.as_str().to_string(), String::from_utf8_lossy(v.as_bytes()).into_owned()))
                .collect();
            // The status is authoritative; a body that is not UTF-8 is decoded lossily.
            let bytes = response
                .body_mut()
                .with_config()
                .limit(MAX_BODY_BYTES)
                .read_to_vec()
                .map_err(|e| ApiError::Transport(e.to_string()))?;
            let body = String::from_utf8_lossy(&bytes).into_owned();

            Ok(HttpResponse {
                status,
                headers,
                body,
            })
        }
    }

    fn send_with_body(
        builder: RequestBuilder<WithBody>,
        body: Option<Body>,
    ) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
        match body {
            None => builder.send_empty(),
            Some(Body::Json(text)) => builder.send(text.as_bytes()),
            Some(Body::Multipart(form)) => {
                let boundary = new_boundary();
                let encoded = form.encode(&boundary);
                builder
                    .content_type(FormData::content_type(&boundary))
                    .send(&encoded[..])
            }
        }
    }
}
