//! URL-safe base64 with tolerant padding.
//!
//! Manifold strips `=` padding from every base64url field it sends. Decoding
//! restores the padding first, so the same path works for keys, endorsements,
//! and signatures whatever their length.

use base64::Engine;
use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};

use crate::error::VerifyResult;

/// Decode a URL-safe base64 string whose padding may be missing.
///
/// # Examples
///
/// ```
/// use manifold_signature::base64url::decode;
///
/// assert_eq!(decode("aGk").unwrap(), b"hi");
/// assert_eq!(decode("aGk=").unwrap(), b"hi");
/// ```
pub fn decode(input: &str) -> VerifyResult<Vec<u8>> {
    let missing = input.len() % 4;
    if missing == 0 {
        return Ok(URL_SAFE.decode(input)?);
    }

    let mut padded = String::with_capacity(input.len() + 4 - missing);
    padded.push_str(input);
    padded.extend(std::iter::repeat_n('=', 4 - missing));
    Ok(URL_SAFE.decode(padded)?)
}

/// Encode bytes as unpadded URL-safe base64, the form Manifold puts on the wire.
#[must_use]
pub fn encode(input: impl AsRef<[u8]>) -> String {
    URL_SAFE_NO_PAD.encode(input)
}
