//! Project and assignment registry. Project mutations and assignment
//! creation are admin-only; listings are scoped by role.

use chrono::Utc;
use uuid::Uuid;

use crate::auth::Caller;
use crate::db::{DbAssignment, DbProject, WorkforceDb};
use crate::error::CoreError;
use crate::services::require_admin;

/// Fields accepted when creating or editing a project.
#[derive(Debug, Clone, Default)]
pub struct ProjectFields {
    pub title: String,
    pub description: Option<String>,
    pub tech_stack: Option<String>,
    pub status: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub background_url: Option<String>,
    pub manager_id: Option<String>,
}

pub fn create_project(
    db: &WorkforceDb,
    caller: &Caller,
    fields: ProjectFields,
) -> Result<DbProject, CoreError> {
    require_admin(caller)?;

    let project = DbProject {
        id: Uuid::new_v4().to_string(),
        title: fields.title,
        description: fields.description,
        tech_stack: fields.tech_stack,
        status: fields.status.unwrap_or_else(|| "active".to_string()),
        start_date: fields.start_date,
        end_date: fields.end_date,
        background_url: fields.background_url,
        manager_id: fields.manager_id,
        created_at: Utc::now().to_rfc3339(),
    };
    db.insert_project(&project)?;
    log::info!("Created project {} ({})", project.title, project.id);
    Ok(project)
}

pub fn update_project(
    db: &WorkforceDb,
    caller: &Caller,
    project_id: &str,
    fields: ProjectFields,
) -> Result<DbProject, CoreError> {
    require_admin(caller)?;

    let existing = db
        .get_project(project_id)?
        .ok_or_else(|| CoreError::not_found("project", project_id))?;

    let project = DbProject {
        id: existing.id,
        title: fields.title,
        description: fields.description,
        tech_stack: fields.tech_stack,
        status: fields.status.unwrap_or(existing.status),
        start_date: fields.start_date,
        end_date: fields.end_date,
        background_url: fields.background_url,
        manager_id: fields.manager_id,
        created_at: existing.created_at,
    };
    db.update_project(&project)?;
    Ok(project)
}

/// Hard delete. Assignments and reports referencing the project are
/// removed with it.
pub fn delete_project(db: &WorkforceDb, caller: &Caller, project_id: &str) -> Result<(), CoreError> {
    require_admin(caller)?;

    let deleted = db.delete_project(project_id)?;
    if deleted == 0 {
        return Err(CoreError::not_found("project", project_id));
    }
    log::info!("Deleted project {}", project_id);
    Ok(())
}

/// Assign a member to a project with a role label. Duplicate
/// (project, user) pairs are rejected with `AlreadyAssigned`.
pub fn assign_member(
    db: &WorkforceDb,
    caller: &Caller,
    project_id: &str,
    user_id: &str,
    role_label: &str,
) -> Result<DbAssignment, CoreError> {
    require_admin(caller)?;

    if db.get_project(project_id)?.is_none() {
        return Err(CoreError::not_found("project", project_id));
    }
    if db.get_profile(user_id)?.is_none() {
        return Err(CoreError::not_found("profile", user_id));
    }

    let assignment = DbAssignment {
        id: Uuid::new_v4().to_string(),
        project_id: project_id.to_string(),
        user_id: user_id.to_string(),
        role: role_label.to_string(),
        created_at: Utc::now().to_rfc3339(),
        project_title: None,
        full_name: None,
    };

    match db.insert_assignment(&assignment) {
        Ok(()) => Ok(assignment),
        Err(e) if e.is_constraint_violation() => Err(CoreError::AlreadyAssigned),
        Err(e) => Err(e.into()),
    }
}

/// Projects visible to the caller: all for admins, assigned-only otherwise.
pub fn list_projects(db: &WorkforceDb, caller: &Caller) -> Result<Vec<DbProject>, CoreError> {
    Ok(db.list_projects(&caller.scope())?)
}

/// Assignment rows visible to the caller, joined for display.
pub fn list_assignments(db: &WorkforceDb, caller: &Caller) -> Result<Vec<DbAssignment>, CoreError> {
    Ok(db.list_assignments(&caller.scope())?)
}

// =============================================================================
// Tests
// =============================================================================
