//! Authenticated session store: login/logout/resolve over a pluggable
//! credential backend, backed by a pair of concurrent maps.

use dashmap::DashMap;
use std::collections::HashMap;
use uuid::Uuid;

/// An opaque session token, rendered as a hyphenated UUID string.
pub type Token = String;

/// Checks a username/password pair against a backing credential source.
///
/// Kept as a trait so a host can swap in its real user database; this crate
/// ships only the in-memory reference implementation below.
pub trait CredentialStore: Send + Sync {
    /// Whether `username`/`password` is a valid pair.
    fn check(&self, username: &str, password: &str) -> bool;
}

/// Plaintext username/password pairs held in memory. Matches the original
/// system's toy "Very Secure Database" — explicitly not a production
/// authentication mechanism.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    users: HashMap<String, String>,
}

impl InMemoryCredentialStore {
    /// An empty store with no registered users.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or overwrite a username/password pair.
    pub fn add_user(&mut self, username: impl Into<String>, password: impl Into<String>) {
        self.users.insert(username.into(), password.into());
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn check(&self, username: &str, password: &str) -> bool {
        self.users.get(username).is_some_and(|expected| expected == password)
    }
}

/// Login/logout/resolve session table. The session table is a concurrent
/// mapping that is small and read-heavy, so it is backed by `dashmap`
/// instead of sitting behind the same mutex as the book.
pub struct SessionStore<C: CredentialStore> {
    credentials: C,
    token_to_user: DashMap<Token, String>,
    user_to_token: DashMap<String, Token>,
}

impl<C: CredentialStore> SessionStore<C> {
    /// Build a store over the given credential backend, with no live sessions.
    pub fn new(credentials: C) -> Self {
        Self {
            credentials,
            token_to_user: DashMap::new(),
            user_to_token: DashMap::new(),
        }
    }

    /// On credential match, return the existing token for that user if one
    /// is live (idempotent double login), else mint and bind a fresh one.
    /// Returns `None` if the credentials are invalid.
    pub fn login(&self, username: &str, password: &str) -> Option<Token> {
        if !self.credentials.check(username, password) {
            return None;
        }

        if let Some(existing) = self.user_to_token.get(username) {
            return Some(existing.clone());
        }

        let token = Uuid::new_v4().to_string();
        self.token_to_user.insert(token.clone(), username.to_string());
        self.user_to_token.insert(username.to_string(), token.clone());
        Some(token)
    }

    /// Break both bindings for `token`, if it is live. Returns whether a
    /// session was actually terminated.
    pub fn logout(&self, token: &str) -> bool {
        match self.token_to_user.remove(token) {
            Some((_, username)) => {
                self.user_to_token.remove(&username);
                true
            }
            None => false,
        }
    }

    /// The username bound to `token`, if the token is live.
    pub fn resolve(&self, token: &str) -> Option<String> {
        self.token_to_user.get(token).map(|entry| entry.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SessionStore<InMemoryCredentialStore> {
        let mut credentials = InMemoryCredentialStore::new();
        credentials.add_user("alice", "pwdalice");
        SessionStore::new(credentials)
    }

    #[test]
    fn login_with_bad_password_fails() {
        let store = store();
        assert_eq!(store.login("alice", "wrong"), None);
    }

    #[test]
    fn login_then_resolve_returns_username() {
        let store = store();
        let token = store.login("alice", "pwdalice").unwrap();
        assert_eq!(store.resolve(&token), Some("alice".to_string()));
    }

    #[test]
    fn double_login_returns_identical_token() {
        let store = store();
        let first = store.login("alice", "pwdalice").unwrap();
        let second = store.login("alice", "pwdalice").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn logout_invalidates_token() {
        let store = store();
        let token = store.login("alice", "pwdalice").unwrap();
        assert!(store.logout(&token));
        assert_eq!(store.resolve(&token), None);
    }

    #[test]
    fn logout_unknown_token_returns_false() {
        let store = store();
        assert!(!store.logout("nonexistent"));
    }

    #[test]
    fn resolve_unknown_token_is_none() {
        let store = store();
        assert_eq!(store.resolve("nonexistent"), None);
    }
}
