use bytes::Bytes;
use http::header::HeaderName;
use http::header::CONTENT_LENGTH;
use http::header::CONTENT_TYPE;
use http::header::DATE;
use http::header::USER_AGENT;
use http::HeaderMap;
use http::HeaderValue;
use http::Request;

use crate::config::Config;
use crate::constants::DEFAULT_CONTENT_TYPE;
use crate::operation::Operation;
use crate::time::{format_http_date, now, DateTime};
use crate::{Error, Result};

/// RequestBuilder resolves an [`Operation`] into a concrete HTTP request.
///
/// The pipeline is a pure function of the descriptor and the config: filter
/// params, properties and headers by the emptiness rule, pick the body,
/// inject default headers, and substitute `<name>` placeholders into the
/// zone-aware endpoint and path templates. The only ambient input is the
/// clock, used when the descriptor carries no `Date` header.
#[derive(Debug)]
pub struct RequestBuilder<'a> {
    config: &'a Config,
    operation: &'a Operation,
    time: Option<DateTime>,
}

impl<'a> RequestBuilder<'a> {
    /// Create a builder for one operation.
    pub fn new(config: &'a Config, operation: &'a Operation) -> Self {
        Self {
            config,
            operation,
            time: None,
        }
    }

    /// Specify the time used for the injected `Date` header.
    ///
    /// # Note
    ///
    /// We should always take current time to build requests.
    /// Only use this function for testing.
    #[cfg(test)]
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Resolve the operation into a ready-to-sign request.
    ///
    /// The returned request contains no empty-valued headers and its URL
    /// contains no unresolved `<placeholder>` tokens.
    pub fn parse(&self) -> Result<Request<Option<Bytes>>> {
        let params = filter_pairs(&self.operation.params);
        let properties = filter_pairs(&self.operation.properties);

        let url = self.resolve_url(&properties, &params)?;
        let body = build_body(self.operation)?;
        let headers = self.build_headers(&url, body.as_ref())?;

        let mut req = Request::builder()
            .method(self.operation.method.clone())
            .uri(url.as_str())
            .body(body)?;
        *req.headers_mut() = headers;

        Ok(req)
    }

    /// Construct the absolute URL for the operation.
    ///
    /// The zone subdomain comes from the `zone` property; every property
    /// replaces its `<key>` token in both the endpoint and the path
    /// template. Placeholders are disjoint by name, so substitution order
    /// does not matter. Filtered params are appended in descriptor order,
    /// joined with `&` when the path template already carries a query
    /// suffix like `?cors`.
    fn resolve_url(&self, properties: &[(String, String)], params: &[(String, String)]) -> Result<String> {
        let zone = properties
            .iter()
            .find(|(k, _)| k == "zone")
            .map(|(_, v)| v.as_str())
            .unwrap_or("");

        let mut endpoint = if zone.is_empty() {
            format!(
                "{}://{}:{}",
                self.config.protocol, self.config.host, self.config.port
            )
        } else {
            format!(
                "{}://{}.{}:{}",
                self.config.protocol, zone, self.config.host, self.config.port
            )
        };

        let mut uri = self.operation.uri.clone();
        for (key, value) in properties {
            let token = format!("<{key}>");
            endpoint = endpoint.replace(&token, value);
            uri = uri.replace(&token, value);
        }

        // A leftover placeholder is a caller contract violation, not a
        // transport problem; refuse to build a request around it.
        if let (Some(start), Some(_)) = (uri.find('<'), uri.find('>')) {
            return Err(Error::request_invalid(format!(
                "unresolved template placeholder in {}",
                &uri[start..]
            )));
        }

        let mut url = endpoint + &uri;
        if !params.is_empty() {
            url.push(if url.contains('?') { '&' } else { '?' });
            for (i, (k, v)) in params.iter().enumerate() {
                if i > 0 {
                    url.push('&');
                }
                url.push_str(k);
                url.push('=');
                url.push_str(v);
            }
        }

        Ok(url)
    }

    /// Assemble the final header set.
    ///
    /// Non-empty descriptor headers are kept; `Date`, `User-Agent` and
    /// `Content-Type` are injected per the defaulting rules, and
    /// `Content-Length` reflects the chosen body.
    fn build_headers(&self, url: &str, body: Option<&Bytes>) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        for (key, value) in filter_pairs(&self.operation.headers) {
            headers.insert(
                HeaderName::try_from(key.as_str())?,
                HeaderValue::from_str(&value)?,
            );
        }

        if !headers.contains_key(DATE) {
            let date = format_http_date(self.time.unwrap_or_else(now));
            headers.insert(DATE, date.parse()?);
        }

        headers.insert(USER_AGENT, self.config.client.user_agent().parse()?);

        if !headers.contains_key(CONTENT_TYPE) {
            headers.insert(CONTENT_TYPE, content_type_of(url).parse()?);
        }

        if let Some(body) = body {
            headers.insert(CONTENT_LENGTH, HeaderValue::from(body.len()));
        }

        Ok(headers)
    }
}

/// Copy pairs whose value is non-empty.
///
/// Empty string means "not provided"; downstream cannot distinguish the two,
/// so such entries never reach the built request.
fn filter_pairs(pairs: &[(String, String)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .filter(|(_, v)| !v.is_empty())
        .cloned()
        .collect()
}

/// Pick the request body.
///
/// A non-empty raw body wins; otherwise non-empty elements serialize to a
/// JSON payload, kept verbatim including empty-valued entries. With neither,
/// the request has no body and no `Content-Length`.
fn build_body(operation: &Operation) -> Result<Option<Bytes>> {
    if let Some(body) = operation.body.as_ref().filter(|b| !b.is_empty()) {
        return Ok(Some(body.clone()));
    }

    if !operation.elements.is_empty() {
        let payload = serde_json::to_vec(&operation.elements)?;
        return Ok(Some(Bytes::from(payload)));
    }

    Ok(None)
}

/// Infer a content type from the resolved URL's file extension.
fn content_type_of(url: &str) -> &'static str {
    let path = url.split('?').next().unwrap_or(url);

    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or(DEFAULT_CONTENT_TYPE)
}
