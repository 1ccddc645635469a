//! Authenticated connection state.

/// Resolved base address plus bearer token for the current connection.
///
/// Created once at successful login, shared read-only with the gateway,
/// and held for the life of the main window; it is never refreshed or
/// invalidated automatically.
#[derive(Debug, Clone)]
pub struct AuthSession {
    base_url: String,
    token: Option<String>,
}

impl AuthSession {
    /// Create a session.
    ///
    /// The base address is normalized to end with exactly one `/` before
    /// first use; an empty token is treated as absent, so such requests
    /// go out without an authorization header.
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        let mut base_url = base_url.into().trim().to_string();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        base_url.push('/');
        Self {
            base_url,
            token: token.filter(|t| !t.is_empty()),
        }
    }

    /// Create a session without a token, used for the login call itself.
    pub fn anonymous(base_url: impl Into<String>) -> Self {
        Self::new(base_url, None)
    }

    /// Normalized base address, ending with `/`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Bearer token, when present.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}
