use crate::constants::*;

/// Config carries the endpoint configuration shared by every call site.
///
/// It is read-only for the lifetime of a request; clone it freely.
#[derive(Clone, Debug)]
pub struct Config {
    /// URL scheme used to reach the service, `https` or `http`.
    pub protocol: String,
    /// Service host, without any zone subdomain.
    pub host: String,
    /// Service port.
    pub port: u16,
    /// Retry budget for the transport collaborator.
    ///
    /// The request core never reads this; it is carried here so that one
    /// immutable value configures a whole client.
    pub connection_retries: u32,
    /// Client identity reported in the `User-Agent` header.
    pub client: ClientInfo,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            protocol: "https".to_string(),
            host: "qingstor.com".to_string(),
            port: 443,
            connection_retries: 3,
            client: ClientInfo::default(),
        }
    }
}

impl Config {
    /// Load config from env.
    ///
    /// - `host` from [`QINGSTOR_HOST`]
    /// - `port` from [`QINGSTOR_PORT`]
    /// - `protocol` from [`QINGSTOR_PROTOCOL`]
    ///
    /// Values that are absent or unparsable keep their current setting.
    pub fn from_env(mut self) -> Self {
        if let Ok(v) = std::env::var(QINGSTOR_HOST) {
            self.host = v;
        }
        if let Some(v) = std::env::var(QINGSTOR_PORT)
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.port = v;
        }
        if let Ok(v) = std::env::var(QINGSTOR_PROTOCOL) {
            self.protocol = v;
        }

        self
    }
}

/// Identity strings reported in the default `User-Agent` header.
///
/// This replaces the ambient client name/version globals some SDKs keep:
/// every [`crate::RequestBuilder`] receives the identity explicitly through
/// its [`Config`].
#[derive(Clone, Debug)]
pub struct ClientInfo {
    /// Client name, e.g. `qingstor-sdk-rust`.
    pub name: String,
    /// Client version.
    pub version: String,
    /// Language runtime version the client was built for.
    pub runtime_version: String,
}

impl Default for ClientInfo {
    fn default() -> Self {
        Self {
            name: "qingstor-sdk-rust".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            runtime_version: env!("CARGO_PKG_RUST_VERSION").to_string(),
        }
    }
}

impl ClientInfo {
    /// Format the `User-Agent` value for this client.
    ///
    /// ```text
    /// qingstor-sdk-rust/0.1.0  (Rust v1.75; linux)
    /// ```
    pub fn user_agent(&self) -> String {
        format!(
            "{}/{}  (Rust v{}; {})",
            self.name,
            self.version,
            self.runtime_version,
            std::env::consts::OS
        )
    }
}
