use jwt_simple::prelude::*;

use crate::auth::cache::TokenCache;
use crate::auth::key::AuthKey;
use crate::error::ApnsError;

/// Produces the bearer tokens APNs accepts for provider authentication.
///
/// The token is a compact ES256-signed JWT with `iss` set to the team id
/// and `iat` to the signing time, carrying the auth key id in its `kid`
/// header. The signer enforces no lifetime of its own; staleness handling
/// belongs to the injected [`TokenCache`] and, ultimately, to APNs.
pub struct TokenSigner {
    key: AuthKey,
    team_id: String,
    cache: Box<dyn TokenCache>,
}

impl TokenSigner {
    pub fn new<S>(key: AuthKey, team_id: S, key_id: S, cache: Box<dyn TokenCache>) -> TokenSigner
    where
        S: Into<String>,
    {
        TokenSigner {
            key: AuthKey(key.0.with_key_id(&key_id.into())),
            team_id: team_id.into(),
            cache,
        }
    }

    /// Builds and signs a fresh provider token, bypassing the cache.
    pub fn create_token(&self) -> Result<String, ApnsError> {
        let claims = JWTClaims {
            issued_at: Some(Clock::now_since_epoch()),
            expires_at: None,
            invalid_before: None,
            issuer: Some(self.team_id.clone()),
            subject: None,
            audiences: None,
            jwt_id: None,
            nonce: None,
            custom: NoCustomClaims {},
        };

        let token = self.key.0.sign(claims)?;

        Ok(token)
    }

    /// A valid provider token: the cached one when present, otherwise a
    /// freshly signed token written through the cache.
    pub fn token(&self) -> Result<String, ApnsError> {
        if let Some(token) = self.cache.get() {
            trace!("Reusing cached provider token");
            return Ok(token);
        }

        let token = self.create_token()?;
        self.cache.set(&token);

        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use ct_codecs::{Base64UrlSafeNoPadding, Decoder};
    use regex::Regex;

    use super::*;
    use crate::auth::cache::NoCache;

    const TEST_KEY: &str = include_str!("../../resources/test_auth_key.p8");

    fn signer(cache: Box<dyn TokenCache>) -> TokenSigner {
        let key = AuthKey::from_pem(TEST_KEY).unwrap();
        TokenSigner::new(key, "67WPQ2V9W5", "S8KJ3L2M4N", cache)
    }

    fn decode_segment(segment: &str) -> serde_json::Value {
        let bytes = Base64UrlSafeNoPadding::decode_to_vec(segment, None).unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn creates_a_compact_three_segment_token() {
        let token = signer(Box::new(NoCache)).create_token().unwrap();

        let compact = Regex::new(r"^[A-Za-z0-9_-]+\.[A-Za-z0-9_-]+\.[A-Za-z0-9_-]+$").unwrap();
        assert!(compact.is_match(&token), "not a compact JWS: {}", token);
    }

    #[test]
    fn token_header_carries_es256_and_the_key_id() {
        let token = signer(Box::new(NoCache)).create_token().unwrap();
        let header = decode_segment(token.split('.').next().unwrap());

        assert_eq!("ES256", header["alg"]);
        assert_eq!("S8KJ3L2M4N", header["kid"]);
    }

    #[test]
    fn token_claims_are_issuer_and_issue_time_only() {
        let token = signer(Box::new(NoCache)).create_token().unwrap();
        let claims = decode_segment(token.split('.').nth(1).unwrap());

        assert_eq!("67WPQ2V9W5", claims["iss"]);
        assert!(claims["iat"].is_number());
        assert!(claims.get("exp").is_none());
    }

    #[derive(Default)]
    struct RecordingCache {
        stored: Mutex<Option<String>>,
        sets: AtomicUsize,
    }

    impl TokenCache for std::sync::Arc<RecordingCache> {
        fn get(&self) -> Option<String> {
            self.stored.lock().unwrap().clone()
        }

        fn set(&self, token: &str) {
            self.sets.fetch_add(1, Ordering::SeqCst);
            *self.stored.lock().unwrap() = Some(token.to_string());
        }
    }

    #[test]
    fn token_is_signed_once_when_the_cache_holds_it() {
        let cache = std::sync::Arc::new(RecordingCache::default());
        let key = AuthKey::from_pem(TEST_KEY).unwrap();
        let signer = TokenSigner::new(key, "67WPQ2V9W5", "S8KJ3L2M4N", Box::new(cache.clone()));

        let first = signer.token().unwrap();
        let second = signer.token().unwrap();

        // Every signing writes through the cache, so a single write means
        // the second call never reached the signing primitive.
        assert_eq!(1, cache.sets.load(Ordering::SeqCst));
        assert_eq!(first, second);
        assert_eq!(Some(first), cache.stored.lock().unwrap().clone());
    }
}
