//! Fakes shared by the unit tests.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

use crate::env::{Document, Window};
use crate::error::ApiError;
use crate::form_data::FormData;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;

/// Replays canned results in order and records every request it sees.
#[derive(Default)]
pub struct RecordingTransport {
    pub requests: RefCell<Vec<HttpRequest>>,
    replies: RefCell<VecDeque<Result<HttpResponse, ApiError>>>,
}

impl RecordingTransport {
    pub fn replying(status: u16, body: &str) -> Self {
        let t = Self::default();
        t.push(status, body);
        t
    }

    pub fn failing(message: &str) -> Self {
        let t = Self::default();
        t.replies
            .borrow_mut()
            .push_back(Err(ApiError::Transport(message.to_string())));
        t
    }

    pub fn push(&self, status: u16, body: &str) {
        self.replies.borrow_mut().push_back(Ok(HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }));
    }

    pub fn last(&self) -> HttpRequest {
        self.requests.borrow().last().cloned().expect("no request recorded")
    }

    pub fn count(&self) -> usize {
        self.requests.borrow().len()
    }
}

impl Transport for RecordingTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.requests.borrow_mut().push(request);
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Transport("no reply queued".to_string())))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    Alert(String),
    Navigate(String),
    Reload,
}

#[derive(Default)]
pub struct RecordingWindow {
    pub events: RefCell<Vec<PageEvent>>,
}

impl RecordingWindow {
    pub fn events(&self) -> Vec<PageEvent> {
        self.events.borrow().clone()
    }
}

impl Window for RecordingWindow {
    fn alert(&self, message: &str) {
        self.events.borrow_mut().push(PageEvent::Alert(message.to_string()));
    }

    fn navigate(&self, url: &str) {
        self.events.borrow_mut().push(PageEvent::Navigate(url.to_string()));
    }

    fn reload(&self) {
        self.events.borrow_mut().push(PageEvent::Reload);
    }
}

#[derive(Default)]
pub struct FakeDocument {
    pub forms: HashMap<String, FormData>,
}

impl FakeDocument {
    pub fn with_form(id: &str, data: FormData) -> Self {
        let mut doc = Self::default();
        doc.forms.insert(id.to_string(), data);
        doc
    }
}

impl Document for FakeDocument {
    fn has_form(&self, form_id: &str) -> bool {
        self.forms.contains_key(form_id)
    }

    fn form_data(&self, form_id: &str) -> Option<FormData> {
        self.forms.get(form_id).cloned()
    }
}
