//! Parsing of the `X-Signature` header.
//!
//! The header carries three space-separated base64url fields:
//!
//! ```text
//! <signature> <signing-key> <endorsement>
//! ```
//!
//! The signing key is a short-lived Ed25519 public key. The endorsement is a
//! signature by the long-lived master key over the signing key's raw bytes,
//! which is what allows the request to be trusted at all.

use ed25519_dalek::{Signature, Verifier as _, VerifyingKey};
use tracing::debug;

use crate::base64url;
use crate::error::{VerifyError, VerifyResult};

/// Name of the header carrying the request signature.
pub const SIGNATURE_HEADER: &str = "x-signature";

/// The published Manifold master key, URL-safe base64 encoded.
pub const MANIFOLD_KEY: &str = "PtISNzqQmQPBxNlUw3CdxsWczXbIwyExxlkRqZ7E690";

/// Long-lived key that endorses every per-request signing key.
///
/// # Examples
///
/// ```
/// use manifold_signature::{MANIFOLD_KEY, MasterKey};
///
/// let key = MasterKey::from_base64(MANIFOLD_KEY).unwrap();
/// assert_eq!(key, MasterKey::default());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MasterKey(VerifyingKey);

impl MasterKey {
    /// Decode a master key from its URL-safe base64 form.
    pub fn from_base64(encoded: &str) -> VerifyResult<Self> {
        let raw = base64url::decode(encoded)?;
        decode_verifying_key(&raw).map(Self)
    }

    /// Wrap an already decoded verifying key.
    #[must_use]
    pub fn from_verifying_key(key: VerifyingKey) -> Self {
        Self(key)
    }

    /// The underlying Ed25519 verifying key.
    #[must_use]
    pub fn verifying_key(&self) -> &VerifyingKey {
        &self.0
    }
}

impl Default for MasterKey {
    fn default() -> Self {
        Self::from_base64(MANIFOLD_KEY).expect("published Manifold key is a valid Ed25519 key")
    }
}

/// The trusted contents of an `X-Signature` header.
#[derive(Debug, Clone)]
pub struct ParsedSignature {
    /// Ephemeral key the request was signed with, endorsed by the master key.
    pub signing_key: VerifyingKey,
    /// Signature over the canonical request.
    pub signature: Signature,
}

/// Parse an `X-Signature` header and check its endorsement.
///
/// The header must split on single spaces into exactly three fields; any other
/// count is rejected before anything is decoded. The returned signing key is
/// only handed out once the master key has verified the endorsement over its
/// raw bytes.
///
/// # Errors
///
/// Returns [`VerifyError::MalformedHeader`] for a wrong field count,
/// [`VerifyError::Decode`] for bad base64, [`VerifyError::InvalidKey`] or
/// [`VerifyError::InvalidSignatureEncoding`] for malformed key material, and
/// [`VerifyError::EndorsementInvalid`] if the master key did not endorse the
/// signing key.
pub fn parse_signature(header: &str, master_key: &MasterKey) -> VerifyResult<ParsedSignature> {
    let fields: Vec<&str> = header.split(' ').collect();
    let [signature, signing_key, endorsement] = fields.as_slice() else {
        return Err(VerifyError::MalformedHeader(fields.len()));
    };

    let signature = base64url::decode(signature)?;
    let raw_signing_key = base64url::decode(signing_key)?;
    let endorsement = base64url::decode(endorsement)?;

    let signing_key = decode_verifying_key(&raw_signing_key)?;
    let endorsement = decode_signature(&endorsement)?;

    master_key
        .0
        .verify(&raw_signing_key, &endorsement)
        .map_err(|err| {
            debug!(%err, "Signing key endorsement rejected by master key");
            VerifyError::EndorsementInvalid
        })?;

    Ok(ParsedSignature {
        signing_key,
        signature: decode_signature(&signature)?,
    })
}

fn decode_verifying_key(raw: &[u8]) -> VerifyResult<VerifyingKey> {
    VerifyingKey::try_from(raw).map_err(|err| VerifyError::InvalidKey(err.to_string()))
}

fn decode_signature(raw: &[u8]) -> VerifyResult<Signature> {
    Signature::from_slice(raw).map_err(|_| VerifyError::InvalidSignatureEncoding)
}
