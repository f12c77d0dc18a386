use std::mem;

use http::header::HeaderName;
use http::uri::Authority;
use http::uri::PathAndQuery;
use http::uri::Scheme;
use http::HeaderMap;
use http::Method;
use http::Uri;
use std::str::FromStr;

use crate::{Error, Result};

/// Signing context for a built request.
///
/// Takes the pieces of `http::request::Parts` apart so the signer can read
/// and edit path, query and headers without re-parsing the URI, then puts
/// them back with [`SigningRequest::apply`].
///
/// Query pairs are kept in raw form: values stay exactly as they appear in
/// the URI (no percent-decoding), and a bare key is a pair with an empty
/// value. Rebuilding therefore reproduces the original query byte for byte.
#[derive(Debug)]
pub struct SigningRequest {
    /// HTTP method.
    pub method: Method,
    /// HTTP scheme.
    pub scheme: Scheme,
    /// HTTP authority.
    pub authority: Authority,
    /// HTTP path.
    pub path: String,
    /// HTTP query parameters, raw.
    pub query: Vec<(String, String)>,
    /// HTTP headers.
    pub headers: HeaderMap,
}

impl SigningRequest {
    /// Build a signing context from http::request::Parts.
    pub fn build(parts: &mut http::request::Parts) -> Result<Self> {
        let uri = mem::take(&mut parts.uri).into_parts();
        let paq = uri
            .path_and_query
            .unwrap_or_else(|| PathAndQuery::from_static("/"));

        Ok(SigningRequest {
            method: parts.method.clone(),
            scheme: uri.scheme.unwrap_or(Scheme::HTTP),
            authority: uri.authority.ok_or_else(|| {
                Error::request_invalid("request without authority is invalid for signing")
            })?,
            path: paq.path().to_string(),
            query: paq.query().map(parse_raw_query).unwrap_or_default(),

            // Take the headers out of the request to avoid copy.
            // We will return them back when the context is applied.
            headers: mem::take(&mut parts.headers),
        })
    }

    /// Apply the signing context back to http::request::Parts.
    pub fn apply(mut self, parts: &mut http::request::Parts) -> Result<()> {
        let query_size = self.query_size();

        // Return headers back.
        mem::swap(&mut parts.headers, &mut self.headers);
        parts.method = self.method;
        parts.uri = {
            let mut uri_parts = mem::take(&mut parts.uri).into_parts();
            uri_parts.scheme = Some(self.scheme);
            uri_parts.authority = Some(self.authority);
            // Build path and query.
            uri_parts.path_and_query = {
                let paq = if query_size == 0 {
                    self.path
                } else {
                    let mut s = self.path;
                    s.reserve(query_size + 1);

                    s.push('?');
                    for (i, (k, v)) in self.query.iter().enumerate() {
                        if i > 0 {
                            s.push('&');
                        }

                        s.push_str(k);
                        if !v.is_empty() {
                            s.push('=');
                            s.push_str(v);
                        }
                    }

                    s
                };

                Some(PathAndQuery::from_str(&paq)?)
            };
            Uri::from_parts(uri_parts)?
        };

        Ok(())
    }

    /// Get query size.
    #[inline]
    pub fn query_size(&self) -> usize {
        self.query
            .iter()
            .map(|(k, v)| k.len() + v.len())
            .sum::<usize>()
    }

    /// Push a new query pair into query list.
    #[inline]
    pub fn query_push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.query.push((key.into(), value.into()));
    }

    /// Get header value by name.
    ///
    /// Returns empty string if header not found.
    #[inline]
    pub fn header_get_or_default(&self, key: &HeaderName) -> Result<&str> {
        match self.headers.get(key) {
            Some(v) => Ok(v.to_str()?),
            None => Ok(""),
        }
    }

    /// Get headers whose name starts with the given lowercase prefix.
    ///
    /// Header names come back lowercased (`http` stores them that way, which
    /// also makes the prefix match case insensitive); names and values are
    /// trimmed of surrounding whitespace.
    pub fn header_to_vec_with_prefix(&self, prefix: &str) -> Vec<(String, String)> {
        self.headers
            .iter()
            .filter(|(k, _)| k.as_str().starts_with(prefix))
            .map(|(k, v)| {
                (
                    k.as_str().trim().to_string(),
                    v.to_str().unwrap_or_default().trim().to_string(),
                )
            })
            .collect()
    }
}

/// Parse a query string into raw pairs, without percent-decoding.
fn parse_raw_query(query: &str) -> Vec<(String, String)> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => (k.to_string(), v.to_string()),
            None => (pair.to_string(), String::new()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parts_for(uri: &str) -> http::request::Parts {
        http::Request::get(uri).body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_build_keeps_query_raw() {
        let mut parts = parts_for("https://pek3a.qingstor.com/b/o?acl=a%2Fb&uploads");
        let ctx = SigningRequest::build(&mut parts).unwrap();

        assert_eq!(ctx.path, "/b/o");
        assert_eq!(
            ctx.query,
            vec![
                ("acl".to_string(), "a%2Fb".to_string()),
                ("uploads".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn test_apply_round_trips_uri() {
        let uri = "https://pek3a.qingstor.com/b/o?acl=a%2Fb&uploads";
        let mut parts = parts_for(uri);

        let ctx = SigningRequest::build(&mut parts).unwrap();
        ctx.apply(&mut parts).unwrap();

        assert_eq!(parts.uri.to_string(), uri);
    }

    #[test]
    fn test_build_without_authority_is_rejected() {
        let mut parts = parts_for("/b/o?acl");
        let err = SigningRequest::build(&mut parts).unwrap_err();

        assert_eq!(err.kind(), crate::ErrorKind::RequestInvalid);
    }
}
