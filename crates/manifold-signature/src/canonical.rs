//! Canonical request construction for Manifold request signatures.
//!
//! The canonical form is the exact byte sequence Manifold signed:
//!
//! ```text
//! method path[?query]\n
//! name: value\n          (one line per signed header)
//! x-signed-headers: ...\n
//! body
//! ```
//!
//! The method and header names are lowercased, header values are trimmed, query
//! parameters are sorted by key and the body is appended without a separator.
//! Any deviation from the sender's layout invalidates the signature.

use std::collections::BTreeMap;

use http::HeaderMap;

use crate::error::{VerifyError, VerifyResult};

/// Name of the header listing which headers were signed.
pub const SIGNED_HEADERS: &str = "x-signed-headers";

/// Build the canonical request bytes from the parts of a live request.
///
/// `query` and `headers` distinguish "not supplied" (`None`) from "supplied but
/// empty". An empty query renders the same as no query. When headers are
/// supplied, `x-signed-headers` and every header it names must be present.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
///
/// use manifold_signature::canonical::canonicalize;
///
/// let query = BTreeMap::from([
///     ("foo".to_owned(), "12".to_owned()),
///     ("bar".to_owned(), "9".to_owned()),
/// ]);
/// let canonical = canonicalize("GET", "/foo/bar", Some(&query), None, None).unwrap();
/// assert_eq!(canonical, b"get /foo/bar?bar=9&foo=12\n");
/// ```
pub fn canonicalize(
    method: &str,
    path: &str,
    query: Option<&BTreeMap<String, String>>,
    headers: Option<&HeaderMap>,
    body: Option<&[u8]>,
) -> VerifyResult<Vec<u8>> {
    let mut canonical = format!("{} {path}", method.to_lowercase());

    if let Some(query) = query {
        if !query.is_empty() {
            canonical.push('?');
            canonical.push_str(&build_canonical_query_string(query));
        }
    }

    canonical.push('\n');

    if let Some(headers) = headers {
        canonical.push_str(&build_canonical_headers(headers)?);
    }

    let mut bytes = canonical.into_bytes();
    if let Some(body) = body {
        bytes.extend_from_slice(body);
    }

    Ok(bytes)
}

/// Join query parameters as `key=value` pairs separated by `&`.
///
/// Keys come out in byte-wise ascending order. Values are emitted literally;
/// nothing is percent-encoded or decoded, so they must be passed exactly as
/// they appeared on the wire.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
///
/// use manifold_signature::canonical::build_canonical_query_string;
///
/// let query = BTreeMap::from([
///     ("b".to_owned(), "2".to_owned()),
///     ("a".to_owned(), "1".to_owned()),
/// ]);
/// assert_eq!(build_canonical_query_string(&query), "a=1&b=2");
/// ```
#[must_use]
pub fn build_canonical_query_string(query: &BTreeMap<String, String>) -> String {
    query
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// The header names covered by the signature, in signing order.
///
/// This is the space-separated `x-signed-headers` list followed by
/// `x-signed-headers` itself, which always signs itself so the list cannot be
/// altered in transit.
pub fn signed_header_names(headers: &HeaderMap) -> VerifyResult<Vec<&str>> {
    let mut names: Vec<&str> = header_str(headers, SIGNED_HEADERS)?.split(' ').collect();
    names.push(SIGNED_HEADERS);
    Ok(names)
}

/// Build the signed header block, one `name: value\n` line per signed header.
///
/// Names are looked up case-insensitively and emitted lowercase. Values are
/// trimmed of surrounding whitespace but otherwise left untouched.
pub fn build_canonical_headers(headers: &HeaderMap) -> VerifyResult<String> {
    let mut block = String::new();
    for name in signed_header_names(headers)? {
        let value = header_str(headers, name)?;
        block.push_str(&name.to_lowercase());
        block.push_str(": ");
        block.push_str(value.trim());
        block.push('\n');
    }
    Ok(block)
}

/// Look up a header and view its value as UTF-8.
pub(crate) fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> VerifyResult<&'a str> {
    let value = headers
        .get(name)
        .ok_or_else(|| VerifyError::MissingHeader(name.to_owned()))?;
    std::str::from_utf8(value.as_bytes()).map_err(|_| VerifyError::MissingHeader(name.to_owned()))
}
