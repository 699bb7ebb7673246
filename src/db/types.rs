//! Shared type definitions for the database layer.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::Role;

/// Errors specific to database operations.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Home directory not found")]
    HomeDirNotFound,

    #[error("Failed to create database directory: {0}")]
    CreateDir(std::io::Error),

    #[error("Schema migration failed: {0}")]
    Migration(String),
}

impl DbError {
    /// True when the error is a SQLite constraint violation (unique index,
    /// foreign key). Lost races on guarded inserts surface this way.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            DbError::Sqlite(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation
        )
    }
}

/// A row from the `profiles` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbProfile {
    pub id: String,
    pub full_name: String,
    pub role: Role,
    pub department: Option<String>,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: String,
}

/// A row from the `attendance` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbAttendance {
    pub id: String,
    pub user_id: String,
    /// Day key (`YYYY-MM-DD`) derived from the canonical day window at
    /// check-in time. Partner of the UNIQUE(user_id, day) guard.
    pub day: String,
    pub check_in: String,
    pub check_out: Option<String>,
    pub note: Option<String>,
    /// Subject's display name. Only populated by listing joins.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

/// A row from the `projects` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbProject {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub tech_stack: Option<String>,
    pub status: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub background_url: Option<String>,
    pub manager_id: Option<String>,
    pub created_at: String,
}

/// A row from `project_assignments`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbAssignment {
    pub id: String,
    pub project_id: String,
    pub user_id: String,
    /// Free-text role label on the project, e.g. "Developer".
    pub role: String,
    pub created_at: String,
    /// Project title. Only populated by listing joins.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_title: Option<String>,
    /// Assignee's display name. Only populated by listing joins.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

/// A row from `project_reports`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbReport {
    pub id: String,
    pub project_id: String,
    pub created_by: String,
    pub progress: i64,
    pub summary: String,
    pub blockers: Option<String>,
    pub admin_comments: Option<String>,
    pub report_date: String,
    pub created_at: String,
    /// Project title. Only populated by listing joins.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_title: Option<String>,
    /// Project tech stack. Only populated by listing joins.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tech_stack: Option<String>,
    /// Author's display name. Only populated by listing joins.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}
