//! Shared configuration for the hotkeys CLI.
//!
//! TOML profiles, credential resolution (keyring + env + plaintext),
//! and translation to `hotkeys_core::CatalogConfig`. The CLI layers its
//! global flags on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use hotkeys_core::{CatalogConfig, TlsVerification};

/// Keyring service name for stored secrets.
pub const KEYRING_SERVICE: &str = "hotkeys";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no API key configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("profile '{profile}' not found")]
    UnknownProfile { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named store profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// The profile to use: `requested`, else `default_profile`, else
    /// "default".
    pub fn profile_name(&self, requested: Option<&str>) -> String {
        requested
            .map(str::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| "default".into())
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named store profile.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Project root URL (e.g., "https://xyz.supabase.co").
    pub url: Option<String>,

    /// API key (plaintext, prefer keyring or env var).
    pub api_key: Option<String>,

    /// Environment variable name containing the API key.
    pub api_key_env: Option<String>,

    /// Access token of the signed-in user.
    pub access_token: Option<String>,

    /// User id for favorites and admin commands.
    pub user: Option<String>,

    /// Offline catalog file used instead of the remote store.
    pub seed: Option<PathBuf>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "hotkeys", "hotkeys").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("hotkeys");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from `path` layered over defaults, then `HOTKEYS_*` variables
/// (`HOTKEYS_PROFILES__WORK__URL` sets `profiles.work.url`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("HOTKEYS_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(&config_path(), cfg)
}

pub fn save_config_to(path: &Path, cfg: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution (without CLI flags) ───────────────────────

/// Resolve an API key from the credential chain (no CLI flag step).
pub fn resolve_api_key(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    // 1. Profile's api_key_env → env var lookup
    if let Some(ref env_name) = profile.api_key_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Some(secret) = keyring_secret(profile_name, "api-key") {
        return Ok(secret);
    }

    // 3. Plaintext in config
    if let Some(ref key) = profile.api_key {
        return Ok(SecretString::from(key.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Resolve the user's access token: keyring, then plaintext. Absent
/// tokens are fine; requests then run with the API key alone.
pub fn resolve_access_token(profile: &Profile, profile_name: &str) -> Option<SecretString> {
    keyring_secret(profile_name, "access-token")
        .or_else(|| profile.access_token.clone().map(SecretString::from))
}

fn keyring_secret(profile_name: &str, kind: &str) -> Option<SecretString> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/{kind}")).ok()?;
    entry.get_password().ok().map(SecretString::from)
}

/// Build a `CatalogConfig` from a profile, no CLI flag overrides.
pub fn profile_to_catalog_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<CatalogConfig, ConfigError> {
    let raw_url = profile
        .url
        .as_deref()
        .ok_or_else(|| ConfigError::Validation {
            field: "url".into(),
            reason: format!("profile '{profile_name}' has no url"),
        })?;
    let url: url::Url = raw_url.parse().map_err(|_| ConfigError::Validation {
        field: "url".into(),
        reason: format!("invalid URL: {raw_url}"),
    })?;

    let api_key = resolve_api_key(profile, profile_name)?;

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let mut config = CatalogConfig::new(url, api_key);
    config.access_token = resolve_access_token(profile, profile_name);
    config.tls = tls;
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert_eq!(cfg.defaults.output, "table");
        assert!(cfg.profiles.is_empty());
    }

    #[test]
    fn profiles_load_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
default_profile = "offline"

[defaults]
output = "json"

[profiles.offline]
seed = "/tmp/catalog.json"
user = "u1"

[profiles.cloud]
url = "https://example.supabase.co"
api_key = "anon"
timeout = 5
"#,
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.profile_name(None), "offline");
        assert_eq!(cfg.profile_name(Some("cloud")), "cloud");
        assert_eq!(cfg.defaults.output, "json");
        assert_eq!(cfg.defaults.timeout, 30);

        let offline = &cfg.profiles["offline"];
        assert_eq!(offline.user.as_deref(), Some("u1"));
        assert_eq!(offline.seed, Some(PathBuf::from("/tmp/catalog.json")));
    }

    #[test]
    fn saved_config_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "work".into(),
            Profile {
                url: Some("https://work.example.com".into()),
                ..Profile::default()
            },
        );

        save_config_to(&path, &cfg).unwrap();
        let loaded = load_config_from(&path).unwrap();
        assert_eq!(
            loaded.profiles["work"].url.as_deref(),
            Some("https://work.example.com")
        );
    }

    #[test]
    fn catalog_config_uses_profile_overrides() {
        let profile = Profile {
            url: Some("https://example.supabase.co".into()),
            api_key: Some("anon".into()),
            ca_cert: Some(PathBuf::from("/etc/ca.pem")),
            timeout: Some(5),
            ..Profile::default()
        };
        let config =
            profile_to_catalog_config(&profile, "hotkeys-test-overrides", &Defaults::default())
                .unwrap();

        assert_eq!(config.url.as_str(), "https://example.supabase.co/");
        assert_eq!(config.api_key.expose_secret(), "anon");
        assert_eq!(config.tls, TlsVerification::CustomCa(PathBuf::from("/etc/ca.pem")));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn profile_without_url_or_key_is_rejected() {
        let err = profile_to_catalog_config(
            &Profile::default(),
            "hotkeys-test-empty",
            &Defaults::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "url"));

        let keyless = Profile {
            url: Some("https://example.supabase.co".into()),
            ..Profile::default()
        };
        let err = resolve_api_key(&keyless, "hotkeys-test-keyless").unwrap_err();
        assert!(matches!(err, ConfigError::NoCredentials { .. }));
    }
}
