//! Request building and signing for the QingStor object storage API.
//!
//! This crate turns a declarative [`Operation`] descriptor into a concrete,
//! cryptographically signed HTTP request. It is the correctness-critical
//! core a QingStor client is built around: per-resource call sites describe
//! one API call each, then hand the descriptor to [`RequestBuilder`] and the
//! built request to [`Signer`] before giving it to an HTTP transport.
//!
//! ## Overview
//!
//! - [`RequestBuilder`] resolves a descriptor into an addressable request:
//!   empty params and headers are dropped, `Date`, `User-Agent` and
//!   `Content-Type` defaults are injected, and `<name>` placeholders are
//!   substituted into the zone-aware endpoint and path templates.
//! - [`Signer`] canonicalizes the built request and derives either an
//!   `Authorization` header (`QS {key_id}:{signature}`) or a presigned URL
//!   query string, using HMAC-SHA256 over a deterministic string to sign.
//!
//! Every step is a pure, synchronous computation; builders and signers can
//! be used freely from multiple threads as long as each instance serves one
//! logical call.
//!
//! ## Example
//!
//! ```no_run
//! use qingstor_signer::{Config, Credential, Operation, RequestBuilder, Signer};
//! use qingstor_signer::Result;
//!
//! fn main() -> Result<()> {
//!     let config = Config::default();
//!     let credential = Credential::new("ACCESS_KEY_ID", "SECRET_ACCESS_KEY");
//!
//!     let operation = Operation::new(http::Method::GET, "/<bucket-name>/<object-key>")
//!         .with_property("zone", "pek3a")
//!         .with_property("bucket-name", "mybucket")
//!         .with_property("object-key", "photo.jpeg");
//!
//!     let (mut parts, body) = RequestBuilder::new(&config, &operation)
//!         .parse()?
//!         .into_parts();
//!
//!     // Header signing for immediate sending...
//!     Signer::new(credential.clone()).sign(&mut parts)?;
//!
//!     // ...or presigning for a time-limited shareable URL.
//!     // Signer::new(credential).query_sign(&mut parts, 1418268231)?;
//!
//!     let request = http::Request::from_parts(parts, body);
//!     // Hand `request` to the HTTP transport of your choice.
//!     # let _ = request;
//!     Ok(())
//! }
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod constants;
pub mod hash;
pub mod time;
pub mod utils;

mod error;
pub use error::{Error, ErrorKind, Result};
mod config;
pub use config::{ClientInfo, Config};
mod credential;
pub use credential::Credential;
mod operation;
pub use operation::Operation;
mod build;
pub use build::RequestBuilder;
mod request;
pub use request::SigningRequest;
mod sign;
pub use sign::Signer;
