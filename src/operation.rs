use bytes::Bytes;
use http::Method;
use serde_json::Map;
use serde_json::Value;

/// Declarative description of one API call before it becomes a request.
///
/// Per-resource call sites construct one `Operation` per invocation and hand
/// it to [`crate::RequestBuilder`]; no state is shared between calls.
///
/// Params, headers and properties keep descriptor insertion order, which is
/// also the order the query string is assembled in.
#[derive(Clone, Debug)]
pub struct Operation {
    /// HTTP verb.
    pub method: Method,
    /// Path template containing zero or more `<name>` placeholders, e.g.
    /// `/<bucket-name>/<object-key>`. May carry a sub-resource query suffix
    /// like `/<bucket-name>?cors`.
    pub uri: String,
    /// Query parameters. Entries with empty values are excluded from the
    /// built request.
    pub params: Vec<(String, String)>,
    /// Request headers, same emptiness rule as params.
    pub headers: Vec<(String, String)>,
    /// Values for template substitution only (`zone`, `bucket-name`,
    /// `object-key`, ...); never sent as headers or params.
    pub properties: Vec<(String, String)>,
    /// Structured body fields. Serialized to a JSON payload when `body` is
    /// absent; kept verbatim, including empty-valued entries.
    pub elements: Map<String, Value>,
    /// Raw body payload. Takes precedence over `elements` when non-empty.
    pub body: Option<Bytes>,
}

impl Operation {
    /// Create an operation for the given verb and path template.
    pub fn new(method: Method, uri: &str) -> Self {
        Self {
            method,
            uri: uri.to_string(),
            params: Vec::new(),
            headers: Vec::new(),
            properties: Vec::new(),
            elements: Map::new(),
            body: None,
        }
    }

    /// Append a query parameter.
    pub fn with_param(mut self, key: &str, value: &str) -> Self {
        self.params.push((key.to_string(), value.to_string()));
        self
    }

    /// Append a header.
    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.push((key.to_string(), value.to_string()));
        self
    }

    /// Append a template substitution property.
    pub fn with_property(mut self, key: &str, value: &str) -> Self {
        self.properties.push((key.to_string(), value.to_string()));
        self
    }

    /// Append a structured body element.
    pub fn with_element(mut self, key: &str, value: Value) -> Self {
        self.elements.insert(key.to_string(), value);
        self
    }

    /// Set the raw body payload.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }
}
