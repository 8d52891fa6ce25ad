//! CLI configuration: thin wrapper around `hotkeys_config` shared types.
//!
//! Re-exports the shared types and adds CLI-specific resolution that
//! respects `GlobalOpts` flag overrides (--url, --api-key, --seed, ...).

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use hotkeys_core::{CatalogConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use hotkeys_config::{
    Config, KEYRING_SERVICE, Profile, config_path, load_config_or_default, save_config,
};

/// Where the catalog lives for this invocation.
#[derive(Debug)]
pub enum StoreTarget {
    /// Offline JSON file; mutations are written back.
    Seed(PathBuf),
    Remote(Box<CatalogConfig>),
}

/// Everything a catalog command needs beyond its own arguments.
#[derive(Debug)]
pub struct Session {
    pub profile: String,
    pub target: StoreTarget,
    pub user: Option<String>,
}

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.profile_name(global.profile.as_deref())
}

/// Combine config file, profile and global flags into a `Session`.
///
/// Flags win over profile values. `--seed` (or a profile `seed`) selects
/// the offline store and skips credential resolution entirely.
pub fn resolve_session(global: &GlobalOpts) -> Result<Session, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    let profile = match cfg.profiles.get(&profile_name) {
        Some(p) => p.clone(),
        // An explicitly requested profile must exist.
        None if global.profile.is_some() => {
            let mut names: Vec<_> = cfg.profiles.keys().cloned().collect();
            names.sort();
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: if names.is_empty() {
                    "(none)".into()
                } else {
                    names.join(", ")
                },
            });
        }
        None => Profile::default(),
    };

    let user = global.user.clone().or_else(|| profile.user.clone());

    if let Some(seed) = global.seed.clone().or_else(|| profile.seed.clone()) {
        return Ok(Session {
            profile: profile_name,
            target: StoreTarget::Seed(seed),
            user,
        });
    }

    let config = resolve_remote(&profile, &profile_name, global)?;
    Ok(Session {
        profile: profile_name,
        target: StoreTarget::Remote(Box::new(config)),
        user,
    })
}

/// Translate a `Profile` + global flags into a `CatalogConfig`.
fn resolve_remote(
    profile: &Profile,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<CatalogConfig, CliError> {
    // 1. Store URL (flag > env > profile)
    let url_str = global
        .url
        .as_deref()
        .or(profile.url.as_deref())
        .ok_or_else(|| CliError::NoConfig {
            path: config_path().display().to_string(),
        })?;
    let url: url::Url = url_str.parse().map_err(|_| CliError::Validation {
        field: "url".into(),
        reason: format!("invalid URL: {url_str}"),
    })?;

    // 2. API key (flag > profile chain)
    let api_key = match global.api_key {
        Some(ref key) => SecretString::from(key.clone()),
        None => hotkeys_config::resolve_api_key(profile, profile_name)?,
    };

    // 3. TLS verification
    let tls = if global.insecure || profile.insecure.unwrap_or(false) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let mut config = CatalogConfig::new(url, api_key);
    config.access_token = hotkeys_config::resolve_access_token(profile, profile_name);
    config.tls = tls;
    config.timeout = Duration::from_secs(global.timeout);
    Ok(config)
}
