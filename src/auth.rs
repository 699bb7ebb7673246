//! Identity resolution and caller context.
//!
//! Authentication itself is external: the hosting application hands us an
//! [`AuthProvider`] and we only ask it who the current session belongs to.
//! Everything downstream receives an explicit [`Caller`] value; there is no
//! ambient "current user" state in this crate.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::WorkforceDb;
use crate::error::CoreError;

/// Error surfaced by the external authentication provider.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("auth provider unavailable: {0}")]
    Provider(String),
}

/// An active authenticated session, as reported by the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_id: String,
    pub email: String,
}

/// The external authentication provider seam.
///
/// Consumed, never implemented here: production wires in a real backend,
/// tests use a stub. Password and signup flows are pass-throughs the
/// presentation layer calls directly; the core only needs `current_session`.
pub trait AuthProvider {
    /// The currently active session, or `None` when signed out.
    fn current_session(&self) -> Result<Option<Session>, AuthError>;

    fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    fn sign_up(&self, email: &str, password: &str) -> Result<Session, AuthError>;
}

/// The authenticated actor behind an operation. Immutable once issued.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: String,
    pub email: String,
}

/// Resolve the caller's identity from the provider's active session.
///
/// A missing session is `Unauthenticated`; a provider transport failure is
/// kept distinguishable so the caller can retry.
pub fn resolve_identity(provider: &dyn AuthProvider) -> Result<Identity, CoreError> {
    match provider.current_session() {
        Ok(Some(session)) => Ok(Identity {
            id: session.user_id,
            email: session.email,
        }),
        Ok(None) => Err(CoreError::Unauthenticated),
        Err(e) => Err(CoreError::Auth(e)),
    }
}

/// Role attached to a profile, gating visibility and mutation rights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Employee,
}

impl Role {
    /// String label for SQL storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Employee => "employee",
        }
    }

    /// Parse from SQL string. Unknown labels fall back to the least
    /// privileged role.
    pub fn from_str_lossy(s: &str) -> Self {
        match s {
            "admin" => Role::Admin,
            "manager" => Role::Manager,
            _ => Role::Employee,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// Row visibility for a caller: admins see the full table, everyone else
/// only rows they own (subject / author / assignee).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    All,
    Owned(String),
}

/// Identity plus resolved role, the context threaded into every service
/// call. Built once per operation via [`Caller::resolve`].
#[derive(Debug, Clone)]
pub struct Caller {
    pub id: String,
    pub role: Role,
}

impl Caller {
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }

    /// Resolve identity and role, creating the profile on first access.
    pub fn resolve(db: &WorkforceDb, provider: &dyn AuthProvider) -> Result<Self, CoreError> {
        let identity = resolve_identity(provider)?;
        let profile = crate::services::profiles::ensure_profile(db, &identity)?;
        Ok(Self {
            id: identity.id,
            role: profile.role,
        })
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// The visibility scope this caller reads under.
    pub fn scope(&self) -> Scope {
        if self.is_admin() {
            Scope::All
        } else {
            Scope::Owned(self.id.clone())
        }
    }

    /// Whether the caller may mutate a row owned by `owner_id`.
    pub fn owns_or_admin(&self, owner_id: &str) -> bool {
        self.is_admin() || self.id == owner_id
    }
}

// =============================================================================
// Tests
// =============================================================================
