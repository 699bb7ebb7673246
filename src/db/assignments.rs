use rusqlite::params;

use super::*;
use crate::auth::Scope;

impl WorkforceDb {
    // =========================================================================
    // Project assignments
    // =========================================================================

    /// Insert an assignment. The UNIQUE(project_id, user_id) index rejects
    /// duplicate membership; the registry maps the constraint violation to
    /// an already-assigned failure.
    pub fn insert_assignment(&self, assignment: &DbAssignment) -> Result<(), DbError> {
        self.conn.execute(
            "INSERT INTO project_assignments (id, project_id, user_id, role, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                assignment.id,
                assignment.project_id,
                assignment.user_id,
                assignment.role,
                assignment.created_at,
            ],
        )?;
        Ok(())
    }

    /// Whether an assignment links the user to the project.
    pub fn is_assigned(&self, project_id: &str, user_id: &str) -> Result<bool, DbError> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM project_assignments
                WHERE project_id = ?1 AND user_id = ?2
             )",
            params![project_id, user_id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    /// Assignment rows, joined with project title and assignee name,
    /// newest first. Scope-filtered in SQL.
    pub fn list_assignments(&self, scope: &Scope) -> Result<Vec<DbAssignment>, DbError> {
        const BASE: &str = "SELECT pa.id, pa.project_id, pa.user_id, pa.role, pa.created_at,
                    pr.title, p.full_name
             FROM project_assignments pa
             JOIN projects pr ON pr.id = pa.project_id
             JOIN profiles p ON p.id = pa.user_id";

        let mut assignments = Vec::new();
        match scope {
            Scope::All => {
                let mut stmt = self
                    .conn
                    .prepare(&format!("{BASE} ORDER BY pa.created_at DESC"))?;
                let rows = stmt.query_map([], Self::map_assignment_row)?;
                for row in rows {
                    assignments.push(row?);
                }
            }
            Scope::Owned(user_id) => {
                let mut stmt = self.conn.prepare(&format!(
                    "{BASE} WHERE pa.user_id = ?1 ORDER BY pa.created_at DESC"
                ))?;
                let rows = stmt.query_map(params![user_id], Self::map_assignment_row)?;
                for row in rows {
                    assignments.push(row?);
                }
            }
        }
        Ok(assignments)
    }

    fn map_assignment_row(row: &rusqlite::Row) -> rusqlite::Result<DbAssignment> {
        Ok(DbAssignment {
            id: row.get(0)?,
            project_id: row.get(1)?,
            user_id: row.get(2)?,
            role: row.get(3)?,
            created_at: row.get(4)?,
            project_title: row.get(5)?,
            full_name: row.get(6)?,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
