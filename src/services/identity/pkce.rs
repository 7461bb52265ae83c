//! PKCE (RFC 7636) material and the in-flight login attempts waiting for their
//! callback.
use std::collections::HashMap;
use std::time::{Duration, Instant};

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use sha2::{Digest, Sha256};
use tokio::sync::Mutex;
use uuid::Uuid;

// A login the operator never finished is forgotten after this long.
const ATTEMPT_TTL: Duration = Duration::from_secs(600);
// `/login` is public; past this many open attempts the oldest is dropped.
const MAX_PENDING: usize = 64;

#[derive(Debug, Clone)]
pub struct PkcePair {
    pub verifier: String,
    pub challenge: String,
}

impl PkcePair {
    pub fn generate() -> Self {
        // 64 hex chars: inside the 43..=128 range and the unreserved charset.
        let verifier = format!(
            "{}{}",
            Uuid::new_v4().simple(),
            Uuid::new_v4().simple()
        );
        let challenge = challenge_for(&verifier);
        Self {
            verifier,
            challenge,
        }
    }
}

/// S256 code challenge: base64url(sha256(verifier)).
pub fn challenge_for(verifier: &str) -> String {
    let mut h = Sha256::new();
    h.update(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(h.finalize())
}

/// Logins started via `/login`, keyed by their `state` parameter.
#[derive(Debug)]
pub struct LoginAttempts {
    pending: Mutex<HashMap<String, (String, Instant)>>,
    capacity: usize,
}

impl Default for LoginAttempts {
    fn default() -> Self {
        Self::with_capacity(MAX_PENDING)
    }
}

impl LoginAttempts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    /// Register a new attempt; returns `(state, pkce)`.
    pub async fn begin(&self) -> (String, PkcePair) {
        let state = Uuid::new_v4().to_string();
        let pkce = PkcePair::generate();

        let mut pending = self.pending.lock().await;
        pending.retain(|_, (_, started)| started.elapsed() < ATTEMPT_TTL);
        while pending.len() >= self.capacity {
            let oldest = pending
                .iter()
                .min_by_key(|(_, (_, started))| *started)
                .map(|(state, _)| state.clone());
            match oldest {
                Some(state) => {
                    pending.remove(&state);
                }
                None => break,
            }
        }
        pending.insert(state.clone(), (pkce.verifier.clone(), Instant::now()));

        (state, pkce)
    }

    /// Consume the attempt for `state`, returning its PKCE verifier. Each state
    /// is usable once.
    pub async fn complete(&self, state: &str) -> Option<String> {
        let mut pending = self.pending.lock().await;
        let (verifier, started) = pending.remove(state)?;
        (started.elapsed() < ATTEMPT_TTL).then_some(verifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn challenge_matches_rfc7636_appendix_b() {
        assert_eq!(
            challenge_for("dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk"),
            "E9Melhoa2OwvFrEMTJguCHaoeK1t3URWbuGJSstw-cM"
        );
    }

    #[test]
    fn generated_verifier_is_long_enough() {
        let pair = PkcePair::generate();
        assert_eq!(pair.verifier.len(), 64);
        assert_eq!(pair.challenge, challenge_for(&pair.verifier));
    }

    #[tokio::test]
    async fn state_is_single_use() {
        let attempts = LoginAttempts::new();
        let (state, pkce) = attempts.begin().await;

        assert_eq!(attempts.complete(&state).await, Some(pkce.verifier));
        assert_eq!(attempts.complete(&state).await, None);
        assert_eq!(attempts.complete("unknown").await, None);
    }

    #[tokio::test]
    async fn oldest_attempt_is_dropped_past_capacity() {
        let attempts = LoginAttempts::with_capacity(2);
        let (first, _) = attempts.begin().await;
        tokio::time::sleep(Duration::from_millis(2)).await;
        let (second, _) = attempts.begin().await;
        tokio::time::sleep(Duration::from_millis(2)).await;
        let (third, _) = attempts.begin().await;

        assert_eq!(attempts.pending.lock().await.len(), 2);
        assert_eq!(attempts.complete(&first).await, None);
        assert!(attempts.complete(&second).await.is_some());
        assert!(attempts.complete(&third).await.is_some());
    }
}
