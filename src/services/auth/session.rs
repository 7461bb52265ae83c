//! Process-wide operator session.
//!
//! The session lives in a `watch` channel: writers go through `SessionContext`,
//! readers take a fresh snapshot (or subscribe) instead of holding on to roles
//! or tokens.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::watch;

use super::claims::AccessTokenClaims;
use super::roles::RoleSet;

/// Tokens held for the operator.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenSet {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub id_token: Option<String>,
    pub expires_at: DateTime<Utc>,
}

impl TokenSet {
    /// True when the access token is expired or expires within `window_seconds`.
    pub fn expires_within(&self, window_seconds: u64, now: DateTime<Utc>) -> bool {
        let window = i64::try_from(window_seconds)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .unwrap_or(TimeDelta::MAX);
        self.expires_at - now <= window
    }
}

impl std::fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print token material
        f.debug_struct("TokenSet")
            .field("has_refresh_token", &self.refresh_token.is_some())
            .field("has_id_token", &self.id_token.is_some())
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    pub initialized: bool,
    pub authenticated: bool,
    pub roles: RoleSet,
    pub username: Option<String>,
    pub token: Option<TokenSet>,
}

impl Session {
    pub fn has_role(&self, role: &str) -> bool {
        self.authenticated && self.roles.contains(role)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.token.as_ref().map(|t| t.expires_at)
    }
}

struct Inner {
    tx: watch::Sender<Session>,
    reauth_requests: AtomicU64,
}

/// Shared handle to the operator session. Cheap to clone.
#[derive(Clone)]
pub struct SessionContext {
    inner: Arc<Inner>,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("session", &*self.inner.tx.borrow())
            .finish()
    }
}

impl SessionContext {
    /// A session that has not been initialized yet.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Session::default());
        Self {
            inner: Arc::new(Inner {
                tx,
                reauth_requests: AtomicU64::new(0),
            }),
        }
    }

    pub fn snapshot(&self) -> Session {
        self.inner.tx.borrow().clone()
    }

    /// Receive every subsequent session change.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.inner.tx.subscribe()
    }

    pub fn current_token(&self) -> Option<TokenSet> {
        self.inner.tx.borrow().token.clone()
    }

    pub fn mark_initialized(&self) {
        self.inner.tx.send_if_modified(|s| {
            let changed = !s.initialized;
            s.initialized = true;
            changed
        });
    }

    /// Start an authenticated session from freshly issued tokens.
    pub fn establish(&self, tokens: TokenSet, claims: &AccessTokenClaims) {
        self.inner.tx.send_modify(|s| {
            s.initialized = true;
            s.authenticated = true;
            s.roles = claims.realm_roles();
            s.username = claims.preferred_username.clone();
            s.token = Some(tokens);
        });
    }

    /// Swap in refreshed tokens. Roles are re-read since they may have changed.
    pub fn replace_tokens(&self, tokens: TokenSet, claims: &AccessTokenClaims) {
        self.inner.tx.send_modify(|s| {
            s.roles = claims.realm_roles();
            if claims.preferred_username.is_some() {
                s.username = claims.preferred_username.clone();
            }
            s.token = Some(tokens);
        });
    }

    /// Operator-initiated logout.
    pub fn sign_out(&self) {
        self.inner.tx.send_modify(clear_identity);
    }

    /// Drop the identity because it can no longer be renewed; the operator has
    /// to log in again.
    pub fn require_reauthentication(&self) {
        self.inner.reauth_requests.fetch_add(1, Ordering::SeqCst);
        self.inner.tx.send_modify(clear_identity);
    }

    /// How many times re-authentication has been forced.
    pub fn reauth_requests(&self) -> u64 {
        self.inner.reauth_requests.load(Ordering::SeqCst)
    }
}

fn clear_identity(s: &mut Session) {
    s.authenticated = false;
    s.roles.clear();
    s.username = None;
    s.token = None;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::auth::claims::RealmAccess;

    fn claims(roles: &[&str]) -> AccessTokenClaims {
        AccessTokenClaims {
            sub: Some("user-1".into()),
            exp: 1_900_000_000,
            iat: None,
            preferred_username: Some("maria".into()),
            realm_access: Some(RealmAccess {
                roles: roles.iter().map(|r| r.to_string()).collect(),
            }),
        }
    }

    fn tokens(access: &str, expires_at: DateTime<Utc>) -> TokenSet {
        TokenSet {
            access_token: access.into(),
            refresh_token: Some("refresh".into()),
            id_token: None,
            expires_at,
        }
    }

    #[test]
    fn starts_uninitialized_and_anonymous() {
        let ctx = SessionContext::new();
        let s = ctx.snapshot();
        assert!(!s.initialized);
        assert!(!s.authenticated);
        assert!(s.token.is_none());
    }

    #[test]
    fn establish_then_reauth_clears_identity_and_counts() {
        let ctx = SessionContext::new();
        ctx.mark_initialized();
        ctx.establish(tokens("a1", Utc::now()), &claims(&["ADMIN"]));

        let s = ctx.snapshot();
        assert!(s.authenticated);
        assert!(s.has_role("ADMIN"));
        assert_eq!(s.username.as_deref(), Some("maria"));

        ctx.require_reauthentication();
        let s = ctx.snapshot();
        assert!(s.initialized);
        assert!(!s.authenticated);
        assert!(s.roles.is_empty());
        assert!(s.token.is_none());
        assert_eq!(ctx.reauth_requests(), 1);
    }

    #[test]
    fn sign_out_does_not_count_as_reauth() {
        let ctx = SessionContext::new();
        ctx.establish(tokens("a1", Utc::now()), &claims(&["USER"]));
        ctx.sign_out();
        assert!(!ctx.snapshot().authenticated);
        assert_eq!(ctx.reauth_requests(), 0);
    }

    #[test]
    fn replace_tokens_picks_up_role_changes() {
        let ctx = SessionContext::new();
        ctx.establish(tokens("a1", Utc::now()), &claims(&["USER"]));
        ctx.replace_tokens(tokens("a2", Utc::now()), &claims(&["ADMIN"]));

        let s = ctx.snapshot();
        assert!(s.has_role("ADMIN"));
        assert!(!s.has_role("USER"));
        assert_eq!(s.token.unwrap().access_token, "a2");
    }

    #[tokio::test]
    async fn subscribers_are_notified_of_changes() {
        let ctx = SessionContext::new();
        let mut rx = ctx.subscribe();

        ctx.mark_initialized();
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().initialized);

        ctx.establish(tokens("a1", Utc::now()), &claims(&["USER"]));
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().authenticated);
    }

    #[test]
    fn expiry_window_is_inclusive() {
        let now = Utc::now();
        let t = tokens("a", now + TimeDelta::seconds(30));
        assert!(t.expires_within(30, now));
        assert!(!t.expires_within(29, now));

        let expired = tokens("a", now - TimeDelta::seconds(5));
        assert!(expired.expires_within(0, now));
    }
}
