// ── Runtime connection configuration ──
//
// Describes how to reach the catalog store. Carries credentials and
// transport tuning but never touches disk; the CLI resolves profiles and
// hands a finished `CatalogConfig` in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-hosted stores with self-signed certs).
    DangerAcceptInvalid,
}

/// Configuration for one catalog store.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Project root URL (e.g. `https://xyz.supabase.co`).
    pub url: Url,
    /// Project API key, sent as `apikey` on every request.
    pub api_key: SecretString,
    /// Signed-in user's access token, when acting as a user.
    pub access_token: Option<SecretString>,
    pub tls: TlsVerification,
    pub timeout: Duration,
    /// Background refresh period in seconds. 0 = never.
    pub refresh_interval_secs: u64,
}

impl CatalogConfig {
    pub fn new(url: Url, api_key: SecretString) -> Self {
        Self {
            url,
            api_key,
            access_token: None,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            refresh_interval_secs: 0,
        }
    }
}
