use crate::constants::*;
use crate::utils::Redact;
use std::fmt::{Debug, Formatter};

/// Credential that holds the access key pair.
#[derive(Default, Clone)]
pub struct Credential {
    /// Access key id for QingStor services.
    pub access_key_id: String,
    /// Secret access key for QingStor services.
    pub secret_access_key: String,
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("access_key_id", &Redact::from(&self.access_key_id))
            .field("secret_access_key", &Redact::from(&self.secret_access_key))
            .finish()
    }
}

impl Credential {
    /// Create a credential from a key pair.
    pub fn new(access_key_id: &str, secret_access_key: &str) -> Self {
        Self {
            access_key_id: access_key_id.to_string(),
            secret_access_key: secret_access_key.to_string(),
        }
    }

    /// Load the key pair from env.
    ///
    /// - `access_key_id` from [`QINGSTOR_ACCESS_KEY_ID`]
    /// - `secret_access_key` from [`QINGSTOR_SECRET_ACCESS_KEY`]
    ///
    /// Returns `None` if either variable is absent.
    pub fn from_env() -> Option<Self> {
        let access_key_id = std::env::var(QINGSTOR_ACCESS_KEY_ID).ok()?;
        let secret_access_key = std::env::var(QINGSTOR_SECRET_ACCESS_KEY).ok()?;

        Some(Self {
            access_key_id,
            secret_access_key,
        })
    }

    /// Check if the key pair is usable for signing.
    pub fn is_valid(&self) -> bool {
        !self.access_key_id.is_empty() && !self.secret_access_key.is_empty()
    }
}
