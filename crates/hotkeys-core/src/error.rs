// ── Core error types ──
//
// Domain errors surfaced by hotkeys-core. Consumers never see raw HTTP
// details; `From<hotkeys_api::Error>` folds transport failures into
// `Repository` and constraint violations into `Conflict`.

use thiserror::Error;

/// Which store constraint rejected a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum ConflictKind {
    #[strum(serialize = "unique")]
    Unique,
    #[strum(serialize = "foreign key")]
    ForeignKey,
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Local, pre-write ─────────────────────────────────────────────
    /// Input rejected before any remote call was made.
    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    // ── Integrity ────────────────────────────────────────────────────
    /// The store rejected a write because of a unique or foreign-key
    /// constraint, typically because a concurrent writer got there first.
    #[error("Conflict on {entity_type} {identifier}: {message}")]
    Conflict {
        kind: ConflictKind,
        entity_type: String,
        identifier: String,
        message: String,
    },

    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    // ── Remote ───────────────────────────────────────────────────────
    #[error("Repository error: {cause}")]
    Repository {
        cause: String,
        /// HTTP status, when the failure came from a response.
        status: Option<u16>,
        /// Store error code (`PGRST116`, `timeout`, `connection`, ...).
        code: Option<String>,
    },

    // ── Access ───────────────────────────────────────────────────────
    #[error("Not signed in")]
    NotAuthenticated,

    #[error("Not permitted: {operation}")]
    Forbidden { operation: String },

    // ── Setup ────────────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub(crate) fn not_found(entity_type: impl Into<String>, identifier: impl ToString) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            identifier: identifier.to_string(),
        }
    }

    pub(crate) fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.to_owned(),
            message: message.into(),
        }
    }

    /// `true` for unique/foreign-key rejections.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// `true` only when the row already exists.
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            Self::Conflict {
                kind: ConflictKind::Unique,
                ..
            }
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<hotkeys_api::Error> for CoreError {
    fn from(err: hotkeys_api::Error) -> Self {
        if err.is_unique_violation() || err.is_foreign_key_violation() {
            let kind = if err.is_unique_violation() {
                ConflictKind::Unique
            } else {
                ConflictKind::ForeignKey
            };
            return CoreError::Conflict {
                kind,
                entity_type: "row".into(),
                identifier: kind.to_string(),
                message: err.to_string(),
            };
        }

        let status = err.status();
        let code = match &err {
            hotkeys_api::Error::Transport(e) if e.is_timeout() => Some("timeout".to_owned()),
            hotkeys_api::Error::Transport(e) if e.is_connect() => Some("connection".to_owned()),
            hotkeys_api::Error::Timeout { .. } => Some("timeout".to_owned()),
            hotkeys_api::Error::Tls(_) => Some("connection".to_owned()),
            hotkeys_api::Error::InvalidUrl(_) => {
                return CoreError::Config {
                    message: err.to_string(),
                };
            }
            other => other.store_code().map(str::to_owned),
        };

        CoreError::Repository {
            cause: err.to_string(),
            status,
            code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rest(code: Option<&str>, status: u16) -> hotkeys_api::Error {
        hotkeys_api::Error::Rest {
            message: "boom".into(),
            code: code.map(String::from),
            status,
        }
    }

    #[test]
    fn constraint_violations_become_conflicts() {
        let unique = CoreError::from(rest(Some("23505"), 409));
        assert!(unique.is_conflict());
        assert!(unique.is_unique_violation());

        let foreign_key = CoreError::from(rest(Some("23503"), 409));
        assert!(foreign_key.is_conflict());
        assert!(!foreign_key.is_unique_violation());
    }

    #[test]
    fn other_store_errors_become_repository() {
        let err = CoreError::from(rest(Some("PGRST116"), 406));
        match err {
            CoreError::Repository { status, code, .. } => {
                assert_eq!(status, Some(406));
                assert_eq!(code.as_deref(), Some("PGRST116"));
            }
            other => panic!("expected Repository, got {other:?}"),
        }
    }

    #[test]
    fn auth_failure_keeps_status() {
        let err = CoreError::from(hotkeys_api::Error::Authentication {
            message: "bad key".into(),
        });
        assert!(matches!(err, CoreError::Repository { status: Some(401), .. }));
    }

    #[test]
    fn timeout_is_tagged() {
        let err = CoreError::from(hotkeys_api::Error::Timeout { timeout_secs: 3 });
        assert!(
            matches!(err, CoreError::Repository { code: Some(ref c), .. } if c == "timeout")
        );
    }
}
