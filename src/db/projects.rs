use rusqlite::params;

use super::*;
use crate::auth::Scope;

impl WorkforceDb {
    // =========================================================================
    // Projects
    // =========================================================================

    pub fn insert_project(&self, project: &DbProject) -> Result<(), DbError> {
        self.conn.execute(
            "INSERT INTO projects (
                id, title, description, tech_stack, status, start_date,
                end_date, background_url, manager_id, created_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                project.id,
                project.title,
                project.description,
                project.tech_stack,
                project.status,
                project.start_date,
                project.end_date,
                project.background_url,
                project.manager_id,
                project.created_at,
            ],
        )?;
        Ok(())
    }

    /// Full-row update by id. Returns the number of rows changed (0 when
    /// the project does not exist).
    pub fn update_project(&self, project: &DbProject) -> Result<usize, DbError> {
        let updated = self.conn.execute(
            "UPDATE projects SET
                title = ?2, description = ?3, tech_stack = ?4, status = ?5,
                start_date = ?6, end_date = ?7, background_url = ?8, manager_id = ?9
             WHERE id = ?1",
            params![
                project.id,
                project.title,
                project.description,
                project.tech_stack,
                project.status,
                project.start_date,
                project.end_date,
                project.background_url,
                project.manager_id,
            ],
        )?;
        Ok(updated)
    }

    /// Hard delete. Assignments and reports referencing the project go with
    /// it (ON DELETE CASCADE). Returns rows deleted.
    pub fn delete_project(&self, id: &str) -> Result<usize, DbError> {
        let deleted = self
            .conn
            .execute("DELETE FROM projects WHERE id = ?1", params![id])?;
        Ok(deleted)
    }

    pub fn get_project(&self, id: &str) -> Result<Option<DbProject>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, description, tech_stack, status, start_date,
                    end_date, background_url, manager_id, created_at
             FROM projects WHERE id = ?1",
        )?;
        let mut rows = stmt.query_map(params![id], Self::map_project_row)?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    /// Projects visible under the scope: everything for admins, only
    /// projects with an assignment naming the caller otherwise.
    pub fn list_projects(&self, scope: &Scope) -> Result<Vec<DbProject>, DbError> {
        let mut projects = Vec::new();
        match scope {
            Scope::All => {
                let mut stmt = self.conn.prepare(
                    "SELECT id, title, description, tech_stack, status, start_date,
                            end_date, background_url, manager_id, created_at
                     FROM projects ORDER BY created_at DESC",
                )?;
                let rows = stmt.query_map([], Self::map_project_row)?;
                for row in rows {
                    projects.push(row?);
                }
            }
            Scope::Owned(user_id) => {
                let mut stmt = self.conn.prepare(
                    "SELECT DISTINCT p.id, p.title, p.description, p.tech_stack, p.status,
                            p.start_date, p.end_date, p.background_url, p.manager_id, p.created_at
                     FROM projects p
                     JOIN project_assignments pa ON pa.project_id = p.id
                     WHERE pa.user_id = ?1
                     ORDER BY p.created_at DESC",
                )?;
                let rows = stmt.query_map(params![user_id], Self::map_project_row)?;
                for row in rows {
                    projects.push(row?);
                }
            }
        }
        Ok(projects)
    }

    fn map_project_row(row: &rusqlite::Row) -> rusqlite::Result<DbProject> {
        Ok(DbProject {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            tech_stack: row.get(3)?,
            status: row.get(4)?,
            start_date: row.get(5)?,
            end_date: row.get(6)?,
            background_url: row.get(7)?,
            manager_id: row.get(8)?,
            created_at: row.get(9)?,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::super::test_utils::{seed_profile, test_db};
    use super::*;
    use crate::auth::Role;

    fn sample_project(id: &str, title: &str) -> DbProject {
        DbProject {
            id: id.to_string(),
            title: title.to_string(),
            description: Some("Internal dashboard".to_string()),
            tech_stack: Some("React".to_string()),
            status: "active".to_string(),
            start_date: None,
            end_date: None,
            background_url: None,
            manager_id: None,
            created_at: Utc::now().to_rfc3339(),
        }
    }

    #[test]
    fn test_insert_and_get() {
        let db = test_db();
        db.insert_project(&sample_project("p1", "Dashboard"))
            .expect("insert");

        let project = db.get_project("p1").expect("get").expect("exists");
        assert_eq!(project.title, "Dashboard");
        assert_eq!(project.status, "active");
    }

    #[test]
    fn test_update_returns_rows_changed() {
        let db = test_db();
        db.insert_project(&sample_project("p1", "Dashboard"))
            .expect("insert");

        let mut project = sample_project("p1", "Dashboard v2");
        project.status = "on-hold".to_string();
        assert_eq!(db.update_project(&project).expect("update"), 1);

        let stored = db.get_project("p1").expect("get").expect("exists");
        assert_eq!(stored.title, "Dashboard v2");
        assert_eq!(stored.status, "on-hold");

        let missing = sample_project("ghost", "Nothing");
        assert_eq!(db.update_project(&missing).expect("update"), 0);
    }

    #[test]
    fn test_list_scope_partition() {
        let db = test_db();
        seed_profile(&db, "u1", "Alice", Role::Employee);
        db.insert_project(&sample_project("p1", "Assigned"))
            .expect("insert p1");
        db.insert_project(&sample_project("p2", "Unassigned"))
            .expect("insert p2");

        let assignment = DbAssignment {
            id: "as1".to_string(),
            project_id: "p1".to_string(),
            user_id: "u1".to_string(),
            role: "Developer".to_string(),
            created_at: Utc::now().to_rfc3339(),
            project_title: None,
            full_name: None,
        };
        db.insert_assignment(&assignment).expect("assign");

        let all = db.list_projects(&Scope::All).expect("admin list");
        assert_eq!(all.len(), 2);

        let own = db
            .list_projects(&Scope::Owned("u1".to_string()))
            .expect("own list");
        assert_eq!(own.len(), 1);
        assert_eq!(own[0].id, "p1");
    }

    #[test]
    fn test_delete_cascades_to_assignments_and_reports() {
        let db = test_db();
        seed_profile(&db, "u1", "Alice", Role::Employee);
        db.insert_project(&sample_project("p1", "Doomed"))
            .expect("insert");

        db.insert_assignment(&DbAssignment {
            id: "as1".to_string(),
            project_id: "p1".to_string(),
            user_id: "u1".to_string(),
            role: "Developer".to_string(),
            created_at: Utc::now().to_rfc3339(),
            project_title: None,
            full_name: None,
        })
        .expect("assign");

        db.insert_report(&DbReport {
            id: "r1".to_string(),
            project_id: "p1".to_string(),
            created_by: "u1".to_string(),
            progress: 40,
            summary: "On track".to_string(),
            blockers: None,
            admin_comments: None,
            report_date: "2026-03-02".to_string(),
            created_at: Utc::now().to_rfc3339(),
            project_title: None,
            tech_stack: None,
            full_name: None,
        })
        .expect("report");

        assert_eq!(db.delete_project("p1").expect("delete"), 1);

        let assignments: i32 = db
            .conn_ref()
            .query_row("SELECT COUNT(*) FROM project_assignments", [], |r| r.get(0))
            .expect("count");
        let reports: i32 = db
            .conn_ref()
            .query_row("SELECT COUNT(*) FROM project_reports", [], |r| r.get(0))
            .expect("count");
        assert_eq!(assignments, 0);
        assert_eq!(reports, 0);
    }
}
