//! Verification of HTTP requests signed by Manifold.
//!
//! Manifold signs every request it sends to a provider with a short-lived
//! Ed25519 key. That key is endorsed by Manifold's long-lived master key, and
//! both travel in the `X-Signature` header alongside the request signature.
//! This crate rebuilds the exact bytes that were signed, checks the
//! endorsement chain and the signature, and rejects requests whose `Date`
//! header is more than five minutes away from now.
//!
//! # Usage
//!
//! ```rust
//! use std::collections::BTreeMap;
//!
//! use http::HeaderMap;
//! use manifold_signature::{Verifier, VerifierConfig};
//!
//! // Trust the master key from `MANIFOLD_MASTER_KEY`, or the published key.
//! let verifier = Verifier::from_config(&VerifierConfig::from_env()).unwrap();
//!
//! let query = BTreeMap::new();
//! let headers = HeaderMap::new();
//! let body: &[u8] = b"{}";
//! let accepted = verifier.verify("PUT", "/v1/resources/1", Some(&query), &headers, Some(body));
//! assert!(!accepted);
//! ```
//!
//! # Modules
//!
//! - [`adapter`] - Verification of [`http::request::Parts`] and the 401 response
//! - [`base64url`] - URL-safe base64 decoding with tolerant padding
//! - [`canonical`] - Canonical request construction
//! - [`clock`] - Time sources for the freshness check
//! - [`config`] - Environment-driven configuration
//! - [`error`] - Verification error types
//! - [`header`] - `X-Signature` header parsing and endorsement checks
//! - [`verifier`] - The verification entry point

pub mod adapter;
pub mod base64url;
pub mod canonical;
pub mod clock;
pub mod config;
pub mod error;
pub mod header;
pub mod verifier;

pub use adapter::{unauthorized_response, verify_request};
pub use canonical::canonicalize;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::VerifierConfig;
pub use error::{VerifyError, VerifyResult};
pub use header::{MANIFOLD_KEY, MasterKey, ParsedSignature, parse_signature};
pub use verifier::{MAX_TIME_SKEW_SECS, Verifier};
