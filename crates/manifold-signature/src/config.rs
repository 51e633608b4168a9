//! Configuration for request verification.
//!
//! Configuration is driven by environment variables so that deployments can
//! pin a different master key (for example a staging signer) without code
//! changes.

use crate::header::MANIFOLD_KEY;

/// Environment variable overriding the master key.
pub const MASTER_KEY_ENV: &str = "MANIFOLD_MASTER_KEY";

/// Settings used to build a [`Verifier`](crate::Verifier).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifierConfig {
    /// URL-safe base64 master key that endorses signing keys.
    pub master_key: String,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            master_key: MANIFOLD_KEY.to_owned(),
        }
    }
}

impl VerifierConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = std::env::var(MASTER_KEY_ENV) {
            if !v.is_empty() {
                config.master_key = v;
            }
        }

        config
    }
}
