//! Error types for request signature verification.
//!
//! Every stage of the pipeline reports failures through [`VerifyError`]. The
//! public [`Verifier::verify`](crate::Verifier::verify) entrypoint collapses
//! these into a single `false` so callers cannot learn which step rejected a
//! request.

/// Errors that can occur while verifying a Manifold-signed request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerifyError {
    /// A field was not valid URL-safe base64.
    #[error("invalid base64url encoding: {0}")]
    Decode(#[from] base64::DecodeError),

    /// The `X-Signature` header does not contain exactly three space-separated fields.
    #[error("malformed signature header: expected 3 fields, found {0}")]
    MalformedHeader(usize),

    /// A header required for verification is absent or not valid UTF-8.
    #[error("missing required header: {0}")]
    MissingHeader(String),

    /// Key material does not describe a valid Ed25519 public key.
    #[error("invalid public key: {0}")]
    InvalidKey(String),

    /// A signature field does not have the length of an Ed25519 signature.
    #[error("invalid signature encoding")]
    InvalidSignatureEncoding,

    /// The master key did not endorse the signing key carried in the request.
    #[error("signing key endorsement is invalid")]
    EndorsementInvalid,

    /// The request signature does not match the canonical request.
    #[error("request signature does not match")]
    SignatureInvalid,

    /// The `Date` header could not be parsed as an ISO-8601 timestamp.
    #[error("invalid request timestamp: {0}")]
    TimestampInvalid(String),

    /// The request timestamp is too far from the current time.
    #[error("request timestamp is outside the allowed skew ({skew_ms} ms)")]
    SkewExceeded {
        /// Absolute distance between the request time and now, in milliseconds.
        skew_ms: i64,
    },
}

/// Convenience result type for verification steps.
pub type VerifyResult<T> = Result<T, VerifyError>;
