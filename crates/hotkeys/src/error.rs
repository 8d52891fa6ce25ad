//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use hotkeys_config::ConfigError;
use hotkeys_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the catalog store")]
    #[diagnostic(
        code(hotkeys::connection_failed),
        help(
            "Check the store URL and your network connection.\n\
             Cause: {reason}\n\
             Self-signed certificate? Try --insecure or set ca_cert in your profile."
        )
    )]
    ConnectionFailed { reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(hotkeys::timeout),
        help("Increase the timeout with --timeout or check the store's responsiveness.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed")]
    #[diagnostic(
        code(hotkeys::auth_failed),
        help(
            "Verify the API key and access token for profile '{profile}'.\n\
             Store a key with: hotkeys config set-key --profile {profile}"
        )
    )]
    AuthFailed { profile: String },

    #[error("No API key configured for profile '{profile}'")]
    #[diagnostic(
        code(hotkeys::no_credentials),
        help(
            "Pass --api-key, set HOTKEYS_API_KEY, or run: hotkeys config set-key\n\
             For offline use, pass --seed <catalog.json>."
        )
    )]
    NoCredentials { profile: String },

    #[error("This command needs a signed-in user")]
    #[diagnostic(
        code(hotkeys::not_signed_in),
        help("Pass --user <id> or set `user` in your profile.")
    )]
    NotSignedIn,

    #[error("Not permitted: {operation}")]
    #[diagnostic(
        code(hotkeys::forbidden),
        help("Admin commands require a user whose profile has is_admin = true.")
    )]
    Forbidden { operation: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(hotkeys::not_found),
        help("Run: hotkeys {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("{resource_type} conflict on {identifier}: {message}")]
    #[diagnostic(
        code(hotkeys::conflict),
        help("Another write got there first, or a dependent row still references it.")
    )]
    Conflict {
        resource_type: String,
        identifier: String,
        message: String,
    },

    // ── Store ────────────────────────────────────────────────────────
    #[error("Store error ({code}): {message}")]
    #[diagnostic(code(hotkeys::store_error))]
    StoreError { code: String, message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(hotkeys::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(hotkeys::profile_not_found),
        help("Available profiles: {available}")
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No catalog store configured")]
    #[diagnostic(
        code(hotkeys::no_config),
        help(
            "Pass --url and --api-key, or --seed <catalog.json> for offline use.\n\
             Profiles are read from: {path}"
        )
    )]
    NoConfig { path: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(hotkeys::config))]
    Config { message: String },

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(hotkeys::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    #[diagnostic(code(hotkeys::json), help("Check the catalog file contents and try again."))]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    #[diagnostic(code(hotkeys::internal))]
    Internal(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } | Self::NotSignedIn => {
                exit_code::AUTH
            }
            Self::Forbidden { .. } => exit_code::PERMISSION,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Name the active profile in authentication failures.
    pub fn for_profile(self, profile: &str) -> Self {
        match self {
            Self::AuthFailed { .. } => Self::AuthFailed {
                profile: profile.into(),
            },
            other => other,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation { field, message } => CliError::Validation {
                field,
                reason: message,
            },

            CoreError::Conflict {
                entity_type,
                identifier,
                message,
                ..
            } => CliError::Conflict {
                resource_type: entity_type,
                identifier,
                message,
            },

            CoreError::NotFound {
                entity_type,
                identifier,
            } => CliError::NotFound {
                list_command: list_command_for(&entity_type),
                resource_type: entity_type,
                identifier,
            },

            CoreError::Repository {
                cause,
                status,
                code,
            } => match (status, code.as_deref()) {
                (_, Some("timeout")) => CliError::Timeout,
                (_, Some("connection")) => CliError::ConnectionFailed { reason: cause },
                (Some(401), _) => CliError::AuthFailed {
                    profile: "current".into(),
                },
                (Some(403), _) => CliError::Forbidden { operation: cause },
                (Some(404), _) => CliError::NotFound {
                    resource_type: "record".into(),
                    identifier: cause,
                    list_command: "programs list".into(),
                },
                (status, code) => CliError::StoreError {
                    code: code
                        .map(str::to_owned)
                        .or_else(|| status.map(|s| s.to_string()))
                        .unwrap_or_else(|| "unknown".into()),
                    message: cause,
                },
            },

            CoreError::NotAuthenticated => CliError::NotSignedIn,

            CoreError::Forbidden { operation } => CliError::Forbidden { operation },

            CoreError::Config { message } => CliError::Config { message },

            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

fn list_command_for(entity_type: &str) -> String {
    match entity_type {
        "category" => "categories list".into(),
        "shortcut" => "shortcuts list --program <id>".into(),
        _ => "programs list".into(),
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::UnknownProfile { profile } => CliError::ProfileNotFound {
                name: profile,
                available: String::new(),
            },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}
