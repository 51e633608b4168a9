//! End-to-end verification tests.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Duration;
    use http::HeaderValue;
    use manifold_signature::{Verifier, verify_request};

    use crate::{ManifoldSigner, format_date, test_now};

    const BODY: &[u8] = br#"{"id":"2686c96868emyj61cgt2ma7vdntg4","plan":"low"}"#;
    const URI: &str = "http://provider.example.com/v1/resources/2686c96868emyj61cgt2ma7vdntg4";

    #[test]
    fn test_should_accept_freshly_signed_request() {
        let signer = ManifoldSigner::new(1, 2);
        let parts = signer
            .signed_request("PUT", URI, &format_date(test_now()), BODY)
            .expect("sign request");

        assert!(verify_request(&signer.verifier(), &parts, BODY));
    }

    #[test]
    fn test_should_accept_query_in_any_order() {
        let signer = ManifoldSigner::new(1, 2);
        let mut parts = signer
            .signed_request(
                "GET",
                "http://provider.example.com/v1/sso?state=abc&code=xyz%2F1",
                &format_date(test_now()),
                b"",
            )
            .expect("sign request");
        let reordered = "http://provider.example.com/v1/sso?code=xyz%2F1&state=abc";
        parts.uri = reordered.parse().expect("valid uri");

        assert!(verify_request(&signer.verifier(), &parts, b""));
    }

    #[test]
    fn test_should_reject_request_from_unendorsed_key() {
        let trusted = ManifoldSigner::new(1, 2);
        let impostor = ManifoldSigner::new(9, 2);
        let parts = impostor
            .signed_request("PUT", URI, &format_date(test_now()), BODY)
            .expect("sign request");

        assert!(!verify_request(&trusted.verifier(), &parts, BODY));
    }

    #[test]
    fn test_should_accept_rotated_signing_keys() {
        let signer = ManifoldSigner::new(1, 2);
        let rotated = signer.rotate(3);
        let verifier = signer.verifier();

        for s in [&signer, &rotated, &signer] {
            let parts = s
                .signed_request("PUT", URI, &format_date(test_now()), BODY)
                .expect("sign request");
            assert!(verify_request(&verifier, &parts, BODY));
        }
    }

    #[test]
    fn test_should_reject_tampered_body() {
        let signer = ManifoldSigner::new(1, 2);
        let parts = signer
            .signed_request("PUT", URI, &format_date(test_now()), BODY)
            .expect("sign request");

        assert!(!verify_request(&signer.verifier(), &parts, br#"{"plan":"high"}"#));
    }

    #[test]
    fn test_should_reject_shortened_signed_header_list() {
        let signer = ManifoldSigner::new(1, 2);
        let mut parts = signer
            .signed_request("PUT", URI, &format_date(test_now()), BODY)
            .expect("sign request");
        parts
            .headers
            .insert("x-signed-headers", HeaderValue::from_static("date"));
        parts
            .headers
            .insert("host", HeaderValue::from_static("attacker.example.com"));

        assert!(!verify_request(&signer.verifier(), &parts, BODY));
    }

    #[test]
    fn test_should_ignore_unsigned_headers() {
        let signer = ManifoldSigner::new(1, 2);
        let mut parts = signer
            .signed_request("PUT", URI, &format_date(test_now()), BODY)
            .expect("sign request");
        parts
            .headers
            .insert("user-agent", HeaderValue::from_static("curl/8.0"));

        assert!(verify_request(&signer.verifier(), &parts, BODY));
    }

    #[test]
    fn test_should_enforce_freshness_window() {
        let signer = ManifoldSigner::new(1, 2);
        let verifier = signer.verifier();

        for (offset_ms, expected) in [
            (-300_000, true),
            (300_000, true),
            (-300_001, false),
            (300_001, false),
            (-3_600_000, false),
        ] {
            let date = format_date(test_now() + Duration::milliseconds(offset_ms));
            let parts = signer
                .signed_request("PUT", URI, &date, BODY)
                .expect("sign request");
            assert_eq!(
                verify_request(&verifier, &parts, BODY),
                expected,
                "offset {offset_ms} ms"
            );
        }
    }

    #[test]
    fn test_should_keep_verifiers_with_different_master_keys_independent() {
        let first = ManifoldSigner::new(1, 2);
        let second = ManifoldSigner::new(5, 6);
        let (first_verifier, second_verifier) = (first.verifier(), second.verifier());

        let parts = first
            .signed_request("PUT", URI, &format_date(test_now()), BODY)
            .expect("sign request");

        assert!(verify_request(&first_verifier, &parts, BODY));
        assert!(!verify_request(&second_verifier, &parts, BODY));
    }

    #[test]
    fn test_should_share_verifier_across_threads() {
        let signer = ManifoldSigner::new(1, 2);
        let verifier: Arc<Verifier> = Arc::new(signer.verifier());
        let parts = Arc::new(
            signer
                .signed_request("PUT", URI, &format_date(test_now()), BODY)
                .expect("sign request"),
        );

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| verify_request(&verifier, &parts, BODY)))
                .collect();
            for handle in handles {
                assert!(handle.join().expect("verifier thread panicked"));
            }
        });
    }
}
