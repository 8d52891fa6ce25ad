use thiserror::Error;

/// PostgreSQL error code for a unique-constraint violation.
const UNIQUE_VIOLATION: &str = "23505";
/// PostgreSQL error code for a foreign-key violation.
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Top-level error type for the `hotkeys-api` crate.
///
/// Covers every failure mode of the REST surface: transport, TLS,
/// authentication, structured store errors, and payload decoding.
/// `hotkeys-core` maps these into its own domain taxonomy.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The store rejected the API key or access token.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Store ───────────────────────────────────────────────────────
    /// Structured error returned by the REST store.
    #[error("Store error (HTTP {status}): {message}")]
    Rest {
        message: String,
        /// The PostgreSQL / PostgREST error code (e.g. `"23505"`).
        code: Option<String>,
        status: u16,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout { .. } => true,
            Self::Rest { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Rest { status: 404, .. } => true,
            _ => false,
        }
    }

    /// Returns `true` if a unique constraint rejected the write.
    pub fn is_unique_violation(&self) -> bool {
        self.store_code() == Some(UNIQUE_VIOLATION)
    }

    /// Returns `true` if a foreign-key constraint rejected the write.
    pub fn is_foreign_key_violation(&self) -> bool {
        self.store_code() == Some(FOREIGN_KEY_VIOLATION)
    }

    /// Extract the store error code, if available.
    pub fn store_code(&self) -> Option<&str> {
        match self {
            Self::Rest { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// HTTP status attached to the failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rest { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            Self::Authentication { .. } => Some(401),
            _ => None,
        }
    }
}
