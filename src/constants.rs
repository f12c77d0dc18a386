//! Constants shared across the crate.

/// Env value for the access key id.
pub const QINGSTOR_ACCESS_KEY_ID: &str = "QINGSTOR_ACCESS_KEY_ID";
/// Env value for the secret access key.
pub const QINGSTOR_SECRET_ACCESS_KEY: &str = "QINGSTOR_SECRET_ACCESS_KEY";
/// Env value for the service host.
pub const QINGSTOR_HOST: &str = "QINGSTOR_HOST";
/// Env value for the service port.
pub const QINGSTOR_PORT: &str = "QINGSTOR_PORT";
/// Env value for the URL scheme.
pub const QINGSTOR_PROTOCOL: &str = "QINGSTOR_PROTOCOL";

/// Headers carrying this prefix participate in canonicalized-headers
/// computation, case insensitively.
pub const QS_HEADER_PREFIX: &str = "x-qs-";

/// Fallback content type when inference from the object key fails.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";
