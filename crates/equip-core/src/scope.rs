//! Credential to history scope resolution.
//!
//! Token issuance lives elsewhere; this module only asks a
//! [`CredentialProvider`] who a token belongs to.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use equip_model::{HistoryScope, UserId};

/// Opaque bearer token presented by a caller.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Parse an `Authorization` header value of the form `Token <key>` or
    /// `Bearer <key>`.
    pub fn from_authorization_header(value: &str) -> Option<Self> {
        let (scheme, token) = value.trim().split_once(char::is_whitespace)?;
        let token = token.trim();
        let known = scheme.eq_ignore_ascii_case("token") || scheme.eq_ignore_ascii_case("bearer");
        (known && !token.is_empty()).then(|| Self::new(token))
    }

    pub fn token(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Maps a token to the user it was issued for.
pub trait CredentialProvider: Send + Sync {
    /// `None` for unknown, expired or revoked tokens.
    fn authenticate(&self, token: &str) -> Option<UserId>;
}

/// Fixed token table, typically loaded from configuration.
#[derive(Default, Clone)]
pub struct StaticTokenProvider {
    tokens: HashMap<String, UserId>,
}

impl StaticTokenProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, token: impl Into<String>, user_id: UserId) -> Self {
        self.insert(token, user_id);
        self
    }

    pub fn insert(&mut self, token: impl Into<String>, user_id: UserId) {
        self.tokens.insert(token.into(), user_id);
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl fmt::Debug for StaticTokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticTokenProvider")
            .field("tokens", &self.tokens.len())
            .finish()
    }
}

impl CredentialProvider for StaticTokenProvider {
    fn authenticate(&self, token: &str) -> Option<UserId> {
        self.tokens.get(token).cloned()
    }
}

/// Scope resolution error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScopeError {
    #[error("authentication required")]
    Unauthorized,
}

/// Decides which history partition a request reads and writes.
#[derive(Clone)]
pub struct ScopeResolver {
    provider: Arc<dyn CredentialProvider>,
}

impl fmt::Debug for ScopeResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeResolver").finish_non_exhaustive()
    }
}

impl ScopeResolver {
    pub fn new(provider: impl CredentialProvider + 'static) -> Self {
        Self {
            provider: Arc::new(provider),
        }
    }

    /// Resolver with no known tokens: every request is anonymous.
    pub fn anonymous_only() -> Self {
        Self::new(StaticTokenProvider::new())
    }

    /// Scope for a request; a missing or rejected credential maps to the
    /// shared anonymous scope.
    pub fn resolve(&self, credential: Option<&Credential>) -> HistoryScope {
        match credential {
            None => HistoryScope::Anonymous,
            Some(credential) => match self.provider.authenticate(credential.token()) {
                Some(user_id) => HistoryScope::user(user_id),
                None => {
                    tracing::debug!("credential rejected; using anonymous scope");
                    HistoryScope::Anonymous
                }
            },
        }
    }

    /// Scope for operations that need an authenticated user.
    pub fn require_user(&self, credential: Option<&Credential>) -> Result<UserId, ScopeError> {
        credential
            .and_then(|credential| self.provider.authenticate(credential.token()))
            .ok_or(ScopeError::Unauthorized)
    }
}

impl Default for ScopeResolver {
    fn default() -> Self {
        Self::anonymous_only()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> ScopeResolver {
        ScopeResolver::new(
            StaticTokenProvider::new().with_token("secret-a", UserId::new("alice").unwrap()),
        )
    }

    #[test]
    fn known_token_resolves_to_user() {
        let scope = resolver().resolve(Some(&Credential::new("secret-a")));
        assert_eq!(scope, HistoryScope::user(UserId::new("alice").unwrap()));
    }

    #[test]
    fn missing_and_unknown_tokens_are_anonymous() {
        let resolver = resolver();
        assert_eq!(resolver.resolve(None), HistoryScope::Anonymous);
        assert_eq!(
            resolver.resolve(Some(&Credential::new("stale"))),
            HistoryScope::Anonymous
        );
    }

    #[test]
    fn require_user_rejects_unknown_tokens() {
        let resolver = resolver();
        assert_eq!(resolver.require_user(None), Err(ScopeError::Unauthorized));
        assert_eq!(
            resolver.require_user(Some(&Credential::new("stale"))),
            Err(ScopeError::Unauthorized)
        );
        assert_eq!(
            resolver
                .require_user(Some(&Credential::new("secret-a")))
                .unwrap()
                .as_str(),
            "alice"
        );
    }

    #[test]
    fn authorization_header_schemes() {
        assert_eq!(
            Credential::from_authorization_header("Token abc123").map(|c| c.token().to_string()),
            Some("abc123".to_string())
        );
        assert_eq!(
            Credential::from_authorization_header("  bearer   xyz ").map(|c| c.token().to_string()),
            Some("xyz".to_string())
        );
        assert!(Credential::from_authorization_header("Basic dXNlcg==").is_none());
        assert!(Credential::from_authorization_header("Token ").is_none());
        assert!(Credential::from_authorization_header("abc123").is_none());
    }

    #[test]
    fn debug_output_hides_token() {
        let rendered = format!("{:?}", Credential::new("super-secret"));
        assert!(!rendered.contains("super-secret"));
    }
}
