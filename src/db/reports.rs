use rusqlite::params;

use super::*;
use crate::auth::Scope;

impl WorkforceDb {
    // =========================================================================
    // Progress reports
    // =========================================================================

    pub fn insert_report(&self, report: &DbReport) -> Result<(), DbError> {
        self.conn.execute(
            "INSERT INTO project_reports (
                id, project_id, created_by, progress, summary, blockers,
                admin_comments, report_date, created_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                report.id,
                report.project_id,
                report.created_by,
                report.progress,
                report.summary,
                report.blockers,
                report.admin_comments,
                report.report_date,
                report.created_at,
            ],
        )?;
        Ok(())
    }

    pub fn get_report(&self, id: &str) -> Result<Option<DbReport>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, project_id, created_by, progress, summary, blockers,
                    admin_comments, report_date, created_at
             FROM project_reports WHERE id = ?1",
        )?;
        let mut rows = stmt.query_map(params![id], Self::map_report_row)?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    /// Set or overwrite the admin annotation on a report. Returns rows
    /// changed (0 when the report does not exist).
    pub fn set_admin_comment(&self, id: &str, comment: &str) -> Result<usize, DbError> {
        let updated = self.conn.execute(
            "UPDATE project_reports SET admin_comments = ?2 WHERE id = ?1",
            params![id, comment],
        )?;
        Ok(updated)
    }

    /// Reports joined with project title/tech stack and author name,
    /// newest first. Scope-filtered in SQL on the author column.
    pub fn list_reports(&self, scope: &Scope) -> Result<Vec<DbReport>, DbError> {
        const BASE: &str = "SELECT r.id, r.project_id, r.created_by, r.progress, r.summary,
                    r.blockers, r.admin_comments, r.report_date, r.created_at,
                    pr.title, pr.tech_stack, p.full_name
             FROM project_reports r
             JOIN projects pr ON pr.id = r.project_id
             JOIN profiles p ON p.id = r.created_by";

        let mut reports = Vec::new();
        match scope {
            Scope::All => {
                let mut stmt = self
                    .conn
                    .prepare(&format!("{BASE} ORDER BY r.created_at DESC"))?;
                let rows = stmt.query_map([], Self::map_report_row_with_joins)?;
                for row in rows {
                    reports.push(row?);
                }
            }
            Scope::Owned(user_id) => {
                let mut stmt = self.conn.prepare(&format!(
                    "{BASE} WHERE r.created_by = ?1 ORDER BY r.created_at DESC"
                ))?;
                let rows = stmt.query_map(params![user_id], Self::map_report_row_with_joins)?;
                for row in rows {
                    reports.push(row?);
                }
            }
        }
        Ok(reports)
    }

    fn map_report_row(row: &rusqlite::Row) -> rusqlite::Result<DbReport> {
        Ok(DbReport {
            id: row.get(0)?,
            project_id: row.get(1)?,
            created_by: row.get(2)?,
            progress: row.get(3)?,
            summary: row.get(4)?,
            blockers: row.get(5)?,
            admin_comments: row.get(6)?,
            report_date: row.get(7)?,
            created_at: row.get(8)?,
            project_title: None,
            tech_stack: None,
            full_name: None,
        })
    }

    fn map_report_row_with_joins(row: &rusqlite::Row) -> rusqlite::Result<DbReport> {
        Ok(DbReport {
            id: row.get(0)?,
            project_id: row.get(1)?,
            created_by: row.get(2)?,
            progress: row.get(3)?,
            summary: row.get(4)?,
            blockers: row.get(5)?,
            admin_comments: row.get(6)?,
            report_date: row.get(7)?,
            created_at: row.get(8)?,
            project_title: row.get(9)?,
            tech_stack: row.get(10)?,
            full_name: row.get(11)?,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
