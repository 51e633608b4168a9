//! Verification of Manifold-signed requests.
//!
//! A request is accepted only when every step succeeds, in order:
//!
//! 1. The `X-Signature` header parses and its signing key is endorsed by the
//!    master key.
//! 2. The signature verifies over the canonical request.
//! 3. The `Date` header is within five minutes of now, in either direction.
//!
//! The main entry point is [`Verifier::verify`], which reports only a boolean.
//! The reason for a rejection is logged at `debug` level and never returned, so
//! a caller cannot be used as an oracle for which step failed.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDateTime, Utc};
use ed25519_dalek::Verifier as _;
use http::HeaderMap;
use tracing::debug;

use crate::canonical::{canonicalize, header_str};
use crate::clock::{Clock, SystemClock};
use crate::config::VerifierConfig;
use crate::error::{VerifyError, VerifyResult};
use crate::header::{MasterKey, SIGNATURE_HEADER, parse_signature};

/// Maximum distance, in seconds, between the `Date` header and now.
pub const MAX_TIME_SKEW_SECS: i64 = 300;

/// Name of the header carrying the request timestamp.
pub const DATE_HEADER: &str = "date";

/// Verifies that requests were signed by Manifold.
///
/// A verifier holds an immutable master key and clock, so one instance can be
/// shared across threads (for example behind an [`Arc`]) and called
/// concurrently.
///
/// # Examples
///
/// ```
/// use http::HeaderMap;
/// use manifold_signature::Verifier;
///
/// let verifier = Verifier::default();
/// let unsigned = HeaderMap::new();
/// assert!(!verifier.verify("GET", "/", None, &unsigned, None));
/// ```
#[derive(Debug, Clone)]
pub struct Verifier {
    master_key: MasterKey,
    clock: Arc<dyn Clock>,
}

impl Default for Verifier {
    fn default() -> Self {
        Self::from_master_key(MasterKey::default())
    }
}

impl Verifier {
    /// Create a verifier trusting the given URL-safe base64 master key.
    pub fn new(master_key: &str) -> VerifyResult<Self> {
        MasterKey::from_base64(master_key).map(Self::from_master_key)
    }

    /// Create a verifier trusting an already decoded master key.
    #[must_use]
    pub fn from_master_key(master_key: MasterKey) -> Self {
        Self {
            master_key,
            clock: Arc::new(SystemClock),
        }
    }

    /// Create a verifier from configuration.
    pub fn from_config(config: &VerifierConfig) -> VerifyResult<Self> {
        Self::new(&config.master_key)
    }

    /// Replace the time source used for the freshness check.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// The master key this verifier trusts.
    #[must_use]
    pub fn master_key(&self) -> &MasterKey {
        &self.master_key
    }

    /// Verify that a request was signed by Manifold and is fresh.
    ///
    /// `headers` are looked up case-insensitively. `query` must hold the raw,
    /// still percent-encoded values from the request line. Returns `false` on
    /// any failure without saying which step failed.
    #[must_use]
    pub fn verify(
        &self,
        method: &str,
        path: &str,
        query: Option<&BTreeMap<String, String>>,
        headers: &HeaderMap,
        body: Option<&[u8]>,
    ) -> bool {
        match self.check(method, path, query, headers, body) {
            Ok(()) => {
                debug!(method, path, "Request signature verified");
                true
            }
            Err(err) => {
                debug!(method, path, error = %err, "Request signature rejected");
                false
            }
        }
    }

    fn check(
        &self,
        method: &str,
        path: &str,
        query: Option<&BTreeMap<String, String>>,
        headers: &HeaderMap,
        body: Option<&[u8]>,
    ) -> VerifyResult<()> {
        let header = header_str(headers, SIGNATURE_HEADER)?;
        let parsed = parse_signature(header, &self.master_key)?;

        let canonical = canonicalize(method, path, query, Some(headers), body)?;
        parsed
            .signing_key
            .verify(&canonical, &parsed.signature)
            .map_err(|_| VerifyError::SignatureInvalid)?;

        let request_time = parse_timestamp(header_str(headers, DATE_HEADER)?)?;
        check_skew(self.clock.now(), request_time)
    }
}

/// ISO-8601 layouts carrying a numeric offset, with or without its colon.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%z",
    "%Y%m%dT%H%M%S%.f%z",
    "%Y%m%dT%H%M%z",
];

/// ISO-8601 layouts read as UTC, after any trailing `Z` is removed.
const UTC_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y%m%dT%H%M%S%.f",
    "%Y%m%dT%H%M",
];

/// Parse a request timestamp.
///
/// RFC 3339 timestamps are accepted with any offset, as are the other common
/// ISO-8601 shapes: offsets without a colon, the basic (separator-free) format
/// and minute precision. A timestamp without an offset is taken to be UTC.
fn parse_timestamp(value: &str) -> VerifyResult<DateTime<Utc>> {
    let value = value.trim();
    let rfc3339_err = match DateTime::parse_from_rfc3339(value) {
        Ok(dt) => return Ok(dt.with_timezone(&Utc)),
        Err(err) => err,
    };

    if let Some(dt) = OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(value, fmt).ok())
    {
        return Ok(dt.with_timezone(&Utc));
    }

    let naive = value.strip_suffix('Z').unwrap_or(value);
    UTC_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(naive, fmt).ok())
        .map(|dt| dt.and_utc())
        .ok_or_else(|| VerifyError::TimestampInvalid(format!("{value}: {rfc3339_err}")))
}

/// Reject timestamps more than [`MAX_TIME_SKEW_SECS`] away from `now`.
///
/// The bound is inclusive and applies to the past and the future alike.
fn check_skew(now: DateTime<Utc>, request_time: DateTime<Utc>) -> VerifyResult<()> {
    let skew = if now >= request_time {
        now - request_time
    } else {
        request_time - now
    };

    if skew > chrono::Duration::seconds(MAX_TIME_SKEW_SECS) {
        return Err(VerifyError::SkewExceeded {
            skew_ms: skew.num_milliseconds(),
        });
    }

    Ok(())
}
