//! Report ledger: progress submissions by assigned members, admin-only
//! annotation, and role-scoped listings.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::auth::Caller;
use crate::db::{DbReport, WorkforceDb};
use crate::error::CoreError;
use crate::services::require_admin;

/// Submit a progress report for a project.
///
/// Progress is validated server-side to [0, 100]. Non-admin authors must be
/// assigned to the project. The report is always attributed to the caller.
pub fn submit_report(
    db: &WorkforceDb,
    caller: &Caller,
    project_id: &str,
    progress: i64,
    summary: &str,
    blockers: Option<String>,
) -> Result<DbReport, CoreError> {
    submit_report_at(db, caller, project_id, progress, summary, blockers, Utc::now())
}

pub fn submit_report_at(
    db: &WorkforceDb,
    caller: &Caller,
    project_id: &str,
    progress: i64,
    summary: &str,
    blockers: Option<String>,
    now: DateTime<Utc>,
) -> Result<DbReport, CoreError> {
    if !(0..=100).contains(&progress) {
        return Err(CoreError::InvalidProgress { given: progress });
    }
    if db.get_project(project_id)?.is_none() {
        return Err(CoreError::not_found("project", project_id));
    }
    if !caller.is_admin() && !db.is_assigned(project_id, &caller.id)? {
        return Err(CoreError::Forbidden);
    }

    let report = DbReport {
        id: Uuid::new_v4().to_string(),
        project_id: project_id.to_string(),
        created_by: caller.id.clone(),
        progress,
        summary: summary.to_string(),
        blockers,
        admin_comments: None,
        report_date: now.format("%Y-%m-%d").to_string(),
        created_at: now.to_rfc3339(),
        project_title: None,
        tech_stack: None,
        full_name: None,
    };
    db.insert_report(&report)?;
    Ok(report)
}

/// Set or overwrite the admin annotation on a report. Admin-only; the
/// comment must be non-empty after trimming.
pub fn annotate_report(
    db: &WorkforceDb,
    caller: &Caller,
    report_id: &str,
    comment: &str,
) -> Result<DbReport, CoreError> {
    require_admin(caller)?;

    let trimmed = comment.trim();
    if trimmed.is_empty() {
        return Err(CoreError::InvalidComment);
    }

    let updated = db.set_admin_comment(report_id, trimmed)?;
    if updated == 0 {
        return Err(CoreError::not_found("report", report_id));
    }
    db.get_report(report_id)?
        .ok_or_else(|| CoreError::not_found("report", report_id))
}

/// Reports visible to the caller: all for admins, own authorship otherwise.
pub fn list_reports(db: &WorkforceDb, caller: &Caller) -> Result<Vec<DbReport>, CoreError> {
    Ok(db.list_reports(&caller.scope())?)
}

// =============================================================================
// Tests
// =============================================================================
