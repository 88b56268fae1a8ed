//! Ordered multipart form data, the Rust side of a browser `FormData`.
//!
//! # Design
//! Entries keep insertion order and allow duplicate names, as form fields
//! do. Encoding to `multipart/form-data` happens only at the transport, so
//! the request sender can pass a `FormData` through untouched.

use serde_json::{Map, Value};
use uuid::Uuid;

/// A single form field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    Text(String),
    File {
        filename: String,
        content_type: String,
        bytes: Vec<u8>,
    },
}

/// Ordered (name, value) pairs of a submitted form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    entries: Vec<(String, FormValue)>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), FormValue::Text(value.into())));
    }

    pub fn append_file(
        &mut self,
        name: impl Into<String>,
        filename: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) {
        self.entries.push((
            name.into(),
            FormValue::File {
                filename: filename.into(),
                content_type: content_type.into(),
                bytes,
            },
        ));
    }

    /// The first value stored under `name`.
    pub fn get(&self, name: &str) -> Option<&FormValue> {
        self.entries.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a FormValue> + 'a {
        self.entries.iter().filter(move |(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FormValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `multipart/form-data` content type for the given boundary.
    pub fn content_type(boundary: &str) -> String {
        format!("multipart/form-data; boundary={boundary}")
    }

    /// Encode the entries as a `multipart/form-data` body.
    pub fn encode(&self, boundary: &str) -> Vec<u8> {
        let mut out = Vec::new();
        for (name, value) in &self.entries {
            out.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
            match value {
                FormValue::Text(text) => {
                    out.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                            escape_disposition(name)
                        )
                        .as_bytes(),
                    );
                    out.extend_from_slice(text.as_bytes());
                }
                FormValue::File {
                    filename,
                    content_type,
                    bytes,
                } => {
                    out.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                            escape_disposition(name),
                            escape_disposition(filename),
                            content_type
                        )
                        .as_bytes(),
                    );
                    out.extend_from_slice(bytes);
                }
            }
            out.extend_from_slice(b"\r\n");
        }
        out.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
        out
    }

    /// Flatten into a JSON object the way `Object.fromEntries(formData)`
    /// does: later duplicates overwrite earlier ones, files become their
    /// filename.
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        for (name, value) in &self.entries {
            let v = match value {
                FormValue::Text(text) => Value::String(text.clone()),
                FormValue::File { filename, .. } => Value::String(filename.clone()),
            };
            map.insert(name.clone(), v);
        }
        Value::Object(map)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut data = FormData::new();
        for (k, v) in iter {
            data.append(k, v);
        }
        data
    }
}

/// A fresh boundary that will not collide with field content in practice.
pub fn new_boundary() -> String {
    format!("----formfetch{}", Uuid::new_v4().simple())
}

fn escape_disposition(value: &str) -> String {
    value
        .replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
