use rusqlite::params;

use super::*;
use crate::auth::Role;

impl WorkforceDb {
    // =========================================================================
    // Profiles
    // =========================================================================

    /// Insert a profile unless one already exists for the identity.
    ///
    /// Returns true when a new row was written. Uses `INSERT OR IGNORE` so a
    /// concurrent duplicate insert is a no-op success rather than an error;
    /// profile auto-creation must be idempotent under racing first requests.
    pub fn insert_profile_if_absent(&self, profile: &DbProfile) -> Result<bool, DbError> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO profiles (
                id, full_name, role, department, phone, avatar_url, created_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                profile.id,
                profile.full_name,
                profile.role.as_str(),
                profile.department,
                profile.phone,
                profile.avatar_url,
                profile.created_at,
            ],
        )?;
        Ok(inserted > 0)
    }

    /// Look up a profile by identity id.
    pub fn get_profile(&self, id: &str) -> Result<Option<DbProfile>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, full_name, role, department, phone, avatar_url, created_at
             FROM profiles WHERE id = ?1",
        )?;
        let mut rows = stmt.query_map(params![id], Self::map_profile_row)?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    /// All profiles, ordered by display name. Directory views and name
    /// resolution need this ecosystem-wide, so it is not scope-filtered.
    pub fn list_profiles(&self) -> Result<Vec<DbProfile>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, full_name, role, department, phone, avatar_url, created_at
             FROM profiles ORDER BY full_name COLLATE NOCASE",
        )?;
        let rows = stmt.query_map([], Self::map_profile_row)?;
        let mut profiles = Vec::new();
        for row in rows {
            profiles.push(row?);
        }
        Ok(profiles)
    }

    /// Update the self-service fields of a profile. Role is deliberately
    /// not touched here.
    pub fn update_profile_fields(
        &self,
        id: &str,
        full_name: &str,
        department: Option<&str>,
        phone: Option<&str>,
        avatar_url: Option<&str>,
    ) -> Result<usize, DbError> {
        let updated = self.conn.execute(
            "UPDATE profiles
             SET full_name = ?2, department = ?3, phone = ?4, avatar_url = ?5
             WHERE id = ?1",
            params![id, full_name, department, phone, avatar_url],
        )?;
        Ok(updated)
    }

    fn map_profile_row(row: &rusqlite::Row) -> rusqlite::Result<DbProfile> {
        Ok(DbProfile {
            id: row.get(0)?,
            full_name: row.get(1)?,
            role: Role::from_str_lossy(&row.get::<_, String>(2)?),
            department: row.get(3)?,
            phone: row.get(4)?,
            avatar_url: row.get(5)?,
            created_at: row.get(6)?,
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

    fn sample_profile(id: &str, name: &str) -> DbProfile {
        DbProfile {
            id: id.to_string(),
            full_name: name.to_string(),
            role: Role::Employee,
            department: None,
            phone: None,
            avatar_url: None,
            created_at: Utc::now().to_rfc3339(),
        }
    }

    #[test]
    fn test_insert_if_absent_is_idempotent() {
        let db = test_db();
        let profile = sample_profile("u1", "alice@example.com");

        assert!(db.insert_profile_if_absent(&profile).expect("first"));
        assert!(!db.insert_profile_if_absent(&profile).expect("second"));

        let count: i32 = db
            .conn_ref()
            .query_row("SELECT COUNT(*) FROM profiles", [], |row| row.get(0))
            .expect("count");
        assert_eq!(count, 1);
    }

    #[test]
    fn test_duplicate_insert_preserves_first_row() {
        let db = test_db();
        db.insert_profile_if_absent(&sample_profile("u1", "first@example.com"))
            .expect("first");
        db.insert_profile_if_absent(&sample_profile("u1", "second@example.com"))
            .expect("second");

        let profile = db.get_profile("u1").expect("get").expect("exists");
        assert_eq!(profile.full_name, "first@example.com");
        assert_eq!(profile.role, Role::Employee);
    }

    #[test]
    fn test_get_profile_not_found() {
        let db = test_db();
        assert!(db.get_profile("nobody").expect("get").is_none());
    }

    #[test]
    fn test_list_profiles_sorted_by_name() {
        let db = test_db();
        seed_profile(&db, "u1", "Zed", Role::Employee);
        seed_profile(&db, "u2", "alice", Role::Admin);
        seed_profile(&db, "u3", "Bob", Role::Manager);

        let names: Vec<String> = db
            .list_profiles()
            .expect("list")
            .into_iter()
            .map(|p| p.full_name)
            .collect();
        assert_eq!(names, vec!["alice", "Bob", "Zed"]);
    }

    #[test]
    fn test_update_profile_fields_leaves_role_alone() {
        let db = test_db();
        seed_profile(&db, "u1", "alice@example.com", Role::Manager);

        let updated = db
            .update_profile_fields("u1", "Alice Ahmed", Some("Engineering"), None, None)
            .expect("update");
        assert_eq!(updated, 1);

        let profile = db.get_profile("u1").expect("get").expect("exists");
        assert_eq!(profile.full_name, "Alice Ahmed");
        assert_eq!(profile.department, Some("Engineering".to_string()));
        assert_eq!(profile.role, Role::Manager);
    }
}
