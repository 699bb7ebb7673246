//! Profile directory: auto-creation on first access, role lookup, and the
//! directory listing every authenticated caller may read.

use chrono::Utc;

use crate::auth::{Caller, Identity, Role};
use crate::db::{DbProfile, WorkforceDb};
use crate::error::CoreError;

/// Ensure a profile exists for the identity, creating one on first access.
///
/// New profiles get `full_name = email` and the least privileged role.
/// Write-on-read, and idempotent under concurrent first requests: the
/// insert is `INSERT OR IGNORE`, so a racing duplicate is a no-op and the
/// winner's row is read back.
pub fn ensure_profile(db: &WorkforceDb, identity: &Identity) -> Result<DbProfile, CoreError> {
    if let Some(profile) = db.get_profile(&identity.id)? {
        return Ok(profile);
    }

    let profile = DbProfile {
        id: identity.id.clone(),
        full_name: identity.email.clone(),
        role: Role::Employee,
        department: None,
        phone: None,
        avatar_url: None,
        created_at: Utc::now().to_rfc3339(),
    };
    if db.insert_profile_if_absent(&profile)? {
        log::info!("Created profile for {}", identity.id);
        return Ok(profile);
    }

    // Lost the creation race; the concurrent winner's row must exist now.
    db.get_profile(&identity.id)?
        .ok_or_else(|| CoreError::not_found("profile", identity.id.clone()))
}

/// The directory listing. Name resolution and role lookups are needed
/// ecosystem-wide, so any authenticated caller sees all profiles.
pub fn list_profiles(db: &WorkforceDb, _caller: &Caller) -> Result<Vec<DbProfile>, CoreError> {
    Ok(db.list_profiles()?)
}

/// The role attached to an identity's profile.
pub fn get_role(db: &WorkforceDb, identity_id: &str) -> Result<Role, CoreError> {
    db.get_profile(identity_id)?
        .map(|p| p.role)
        .ok_or_else(|| CoreError::not_found("profile", identity_id))
}

/// Self-service profile update. Callers may only edit their own profile;
/// admins may edit anyone's. Role changes are out of scope here.
pub fn update_profile(
    db: &WorkforceDb,
    caller: &Caller,
    profile_id: &str,
    full_name: &str,
    department: Option<&str>,
    phone: Option<&str>,
    avatar_url: Option<&str>,
) -> Result<DbProfile, CoreError> {
    if !caller.owns_or_admin(profile_id) {
        return Err(CoreError::Forbidden);
    }
    let updated = db.update_profile_fields(profile_id, full_name, department, phone, avatar_url)?;
    if updated == 0 {
        return Err(CoreError::not_found("profile", profile_id));
    }
    db.get_profile(profile_id)?
        .ok_or_else(|| CoreError::not_found("profile", profile_id))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_utils::{seed_profile, test_db};
    use crate::error::ErrorKind;

    fn identity(id: &str, email: &str) -> Identity {
        Identity {
            id: id.to_string(),
            email: email.to_string(),
        }
    }

    #[test]
    fn test_ensure_profile_creates_with_employee_role() {
        let db = test_db();
        let profile =
            ensure_profile(&db, &identity("u1", "alice@example.com")).expect("ensure");
        assert_eq!(profile.full_name, "alice@example.com");
        assert_eq!(profile.role, Role::Employee);
    }

    #[test]
    fn test_ensure_profile_is_idempotent() {
        let db = test_db();
        let id = identity("u1", "alice@example.com");
        let first = ensure_profile(&db, &id).expect("first");
        let second = ensure_profile(&db, &id).expect("second");
        assert_eq!(first.id, second.id);
        assert_eq!(first.created_at, second.created_at);

        let count: i32 = db
            .conn_ref()
            .query_row("SELECT COUNT(*) FROM profiles", [], |r| r.get(0))
            .expect("count");
        assert_eq!(count, 1);
    }

    #[test]
    fn test_ensure_profile_does_not_downgrade_existing_role() {
        let db = test_db();
        seed_profile(&db, "u1", "Alice", Role::Admin);

        let profile =
            ensure_profile(&db, &identity("u1", "alice@example.com")).expect("ensure");
        assert_eq!(profile.role, Role::Admin);
        assert_eq!(profile.full_name, "Alice");
    }

    #[test]
    fn test_get_role() {
        let db = test_db();
        seed_profile(&db, "u1", "Alice", Role::Manager);
        assert_eq!(get_role(&db, "u1").expect("role"), Role::Manager);

        let err = get_role(&db, "nobody").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_list_profiles_visible_to_any_caller() {
        let db = test_db();
        seed_profile(&db, "u1", "Alice", Role::Employee);
        seed_profile(&db, "u2", "Bob", Role::Admin);

        let employee = Caller::new("u1", Role::Employee);
        let listed = list_profiles(&db, &employee).expect("list");
        assert_eq!(listed.len(), 2);
    }

    #[test]
    fn test_update_profile_ownership() {
        let db = test_db();
        seed_profile(&db, "u1", "Alice", Role::Employee);
        seed_profile(&db, "u2", "Bob", Role::Employee);

        let bob = Caller::new("u2", Role::Employee);
        let err = update_profile(&db, &bob, "u1", "Hacked", None, None, None).unwrap_err();
        assert!(matches!(err, CoreError::Forbidden));

        let admin = Caller::new("a1", Role::Admin);
        let updated =
            update_profile(&db, &admin, "u1", "Alice Ahmed", None, None, None).expect("admin edit");
        assert_eq!(updated.full_name, "Alice Ahmed");
    }
}
