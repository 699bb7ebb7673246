use rusqlite::params;

use super::*;
use crate::auth::Scope;

impl WorkforceDb {
    // =========================================================================
    // Attendance
    // =========================================================================

    /// Insert a new attendance record. The UNIQUE(user_id, day) index makes
    /// this the real single-check-in-per-day guard: a lost race between the
    /// existence check and this insert surfaces as a constraint violation
    /// (`DbError::is_constraint_violation`), which the engine maps back to
    /// an already-checked-in failure.
    pub fn insert_attendance(&self, record: &DbAttendance) -> Result<(), DbError> {
        self.conn.execute(
            "INSERT INTO attendance (id, user_id, day, check_in, check_out, note)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                record.id,
                record.user_id,
                record.day,
                record.check_in,
                record.check_out,
                record.note,
            ],
        )?;
        Ok(())
    }

    /// Look up an attendance record by id.
    pub fn get_attendance(&self, id: &str) -> Result<Option<DbAttendance>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, day, check_in, check_out, note
             FROM attendance WHERE id = ?1",
        )?;
        let mut rows = stmt.query_map(params![id], Self::map_attendance_row)?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    /// The caller's attendance record for a given day key, if any.
    /// Fast-path existence check before the insert.
    pub fn get_attendance_for_day(
        &self,
        user_id: &str,
        day_key: &str,
    ) -> Result<Option<DbAttendance>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, day, check_in, check_out, note
             FROM attendance WHERE user_id = ?1 AND day = ?2",
        )?;
        let mut rows = stmt.query_map(params![user_id, day_key], Self::map_attendance_row)?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    /// Set `check_out` on a record that hasn't been checked out yet.
    ///
    /// Conditional update: returns the number of rows changed, so a racing
    /// second check-out observes 0 and the first stored value is never
    /// overwritten.
    pub fn set_check_out(&self, id: &str, check_out: &str) -> Result<usize, DbError> {
        let updated = self.conn.execute(
            "UPDATE attendance SET check_out = ?2
             WHERE id = ?1 AND check_out IS NULL",
            params![id, check_out],
        )?;
        Ok(updated)
    }

    /// Attendance records for one day, joined with the subject's display
    /// name, newest check-in first. Scope-filtered in SQL.
    pub fn list_attendance_for_day(
        &self,
        day_key: &str,
        scope: &Scope,
    ) -> Result<Vec<DbAttendance>, DbError> {
        const BASE: &str = "SELECT a.id, a.user_id, a.day, a.check_in, a.check_out, a.note,
                    p.full_name
             FROM attendance a
             JOIN profiles p ON p.id = a.user_id
             WHERE a.day = ?1";

        let mut records = Vec::new();
        match scope {
            Scope::All => {
                let mut stmt = self
                    .conn
                    .prepare(&format!("{BASE} ORDER BY a.check_in DESC"))?;
                let rows = stmt.query_map(params![day_key], Self::map_attendance_row_with_name)?;
                for row in rows {
                    records.push(row?);
                }
            }
            Scope::Owned(user_id) => {
                let mut stmt = self
                    .conn
                    .prepare(&format!("{BASE} AND a.user_id = ?2 ORDER BY a.check_in DESC"))?;
                let rows = stmt.query_map(
                    params![day_key, user_id],
                    Self::map_attendance_row_with_name,
                )?;
                for row in rows {
                    records.push(row?);
                }
            }
        }
        Ok(records)
    }

    fn map_attendance_row(row: &rusqlite::Row) -> rusqlite::Result<DbAttendance> {
        Ok(DbAttendance {
            id: row.get(0)?,
            user_id: row.get(1)?,
            day: row.get(2)?,
            check_in: row.get(3)?,
            check_out: row.get(4)?,
            note: row.get(5)?,
            full_name: None,
        })
    }

    fn map_attendance_row_with_name(row: &rusqlite::Row) -> rusqlite::Result<DbAttendance> {
        Ok(DbAttendance {
            id: row.get(0)?,
            user_id: row.get(1)?,
            day: row.get(2)?,
            check_in: row.get(3)?,
            check_out: row.get(4)?,
            note: row.get(5)?,
            full_name: row.get(6)?,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
