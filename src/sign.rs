use std::collections::HashSet;
use std::fmt::Write;

use http::header::HeaderName;
use http::header::AUTHORIZATION;
use http::header::CONTENT_TYPE;
use http::header::DATE;
use http::HeaderValue;
use log::debug;
use once_cell::sync::Lazy;
use percent_encoding::utf8_percent_encode;
use percent_encoding::NON_ALPHANUMERIC;

use crate::constants::QS_HEADER_PREFIX;
use crate::credential::Credential;
use crate::hash::base64_hmac_sha256;
use crate::request::SigningRequest;
use crate::Result;

const CONTENT_MD5: HeaderName = HeaderName::from_static("content-md5");

/// Signer that implements QingStor authorization.
///
/// Both signing modes HMAC-SHA256 the same canonical string; they differ
/// only in the date line and in where the signature lands:
///
/// - [`Signer::sign`] dates the string with the request's `Date` header and
///   adds an `Authorization` header for immediate sending.
/// - [`Signer::query_sign`] dates the string with a literal expiry
///   timestamp and appends the signature to the query string, yielding a
///   time-limited shareable URL.
///
/// Signing mutates only the authorization carrier; method, body and every
/// other header stay intact.
#[derive(Debug)]
pub struct Signer {
    credential: Credential,
}

impl Signer {
    /// Create a signer from a key pair.
    pub fn new(credential: Credential) -> Self {
        Self { credential }
    }

    /// Sign the request with an `Authorization` header.
    ///
    /// ```text
    /// Authorization: QS {access_key_id}:{base64(hmac_sha256(string_to_sign))}
    /// ```
    pub fn sign(&self, parts: &mut http::request::Parts) -> Result<()> {
        let mut ctx = SigningRequest::build(parts)?;

        let date = ctx.header_get_or_default(&DATE)?.to_string();
        let string_to_sign = string_to_sign(&ctx, &date)?;
        let signature = base64_hmac_sha256(
            self.credential.secret_access_key.as_bytes(),
            string_to_sign.as_bytes(),
        );

        ctx.headers.insert(AUTHORIZATION, {
            let mut value: HeaderValue =
                format!("QS {}:{}", self.credential.access_key_id, signature).parse()?;
            value.set_sensitive(true);

            value
        });

        ctx.apply(parts)
    }

    /// Sign the request into a presigned URL that expires at the given Unix
    /// timestamp.
    ///
    /// ```text
    /// ?signature={urlencoded_signature}&access_key_id={access_key_id}&expires={expires}
    /// ```
    ///
    /// Query parameters already on the request survive presigning; the
    /// signature triple is appended after them so sub-resource markers like
    /// `uploads` keep working when the URL is dereferenced. The signature
    /// depends only on the expiry's literal value, never on the clock at
    /// verification time.
    pub fn query_sign(&self, parts: &mut http::request::Parts, expires: i64) -> Result<()> {
        let mut ctx = SigningRequest::build(parts)?;

        let string_to_sign = string_to_sign(&ctx, &expires.to_string())?;
        let signature = base64_hmac_sha256(
            self.credential.secret_access_key.as_bytes(),
            string_to_sign.as_bytes(),
        );

        ctx.query_push(
            "signature",
            utf8_percent_encode(&signature, NON_ALPHANUMERIC).to_string(),
        );
        ctx.query_push("access_key_id", &self.credential.access_key_id);
        ctx.query_push("expires", expires.to_string());

        ctx.apply(parts)
    }
}

/// Construct the string to sign.
///
/// ## Format
///
/// ```text
/// VERB + "\n" +
/// Content-MD5 + "\n" +
/// Content-Type + "\n" +
/// Date-or-Expires + "\n" +
/// CanonicalizedHeaders +
/// CanonicalizedResource
/// ```
///
/// Absent `Content-MD5` or `Content-Type` resolve to empty lines; that is
/// part of the canonical form, not an error.
fn string_to_sign(ctx: &SigningRequest, date_or_expires: &str) -> Result<String> {
    let mut s = String::new();
    writeln!(&mut s, "{}", ctx.method.as_str())?;
    writeln!(&mut s, "{}", ctx.header_get_or_default(&CONTENT_MD5)?)?;
    writeln!(&mut s, "{}", ctx.header_get_or_default(&CONTENT_TYPE)?)?;
    writeln!(&mut s, "{date_or_expires}")?;
    s.push_str(&canonicalize_headers(ctx));
    s.push_str(&canonicalize_resource(ctx));

    debug!("string to sign: {}", &s);

    Ok(s)
}

/// Canonicalize the vendor headers.
///
/// Headers whose name matches `x-qs-` case insensitively are lowercased,
/// trimmed, sorted by name, and emitted as `name:value\n` each. A pure
/// function of the header set: any input order produces identical output.
fn canonicalize_headers(ctx: &SigningRequest) -> String {
    let mut headers = ctx.header_to_vec_with_prefix(QS_HEADER_PREFIX);
    headers.sort();

    let mut s = String::new();
    for (name, value) in headers {
        s.push_str(&name);
        s.push(':');
        s.push_str(&value);
        s.push('\n');
    }

    s
}

/// Canonicalize the resource.
///
/// The request path, plus the query pairs whose key is on the sub-resource
/// allow-list: values percent-decoded, pairs sorted by their full `name` or
/// `name=value` string and joined with `&`. Ordinary query parameters never
/// affect the signature.
fn canonicalize_resource(ctx: &SigningRequest) -> String {
    let mut keys: Vec<String> = ctx
        .query
        .iter()
        .filter(|(k, _)| is_sub_resource(k))
        .map(|(k, v)| {
            if v.is_empty() {
                k.clone()
            } else {
                format!(
                    "{}={}",
                    k,
                    percent_encoding::percent_decode_str(v).decode_utf8_lossy()
                )
            }
        })
        .collect();
    keys.sort();

    if keys.is_empty() {
        ctx.path.clone()
    } else {
        format!("{}?{}", ctx.path, keys.join("&"))
    }
}

fn is_sub_resource(key: &str) -> bool {
    SUB_RESOURCES.contains(key)
}

/// Query keys that identify a bucket/object sub-function and therefore
/// participate in signing.
static SUB_RESOURCES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "acl",
        "cors",
        "delete",
        "mirror",
        "part_number",
        "policy",
        "stats",
        "upload_id",
        "uploads",
        "response-expires",
        "response-cache-control",
        "response-content-type",
        "response-content-language",
        "response-content-encoding",
        "response-content-disposition",
    ])
});
