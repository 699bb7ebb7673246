//! Operation layer: role gating, visibility scoping, and state-machine
//! guards wrapping the record store.
//!
//! Every function takes an explicit [`Caller`](crate::auth::Caller), the
//! identity and role resolved once at the start of the request. Read
//! operations apply the caller's scope inside the query; mutations check
//! authorization before any write.

use crate::auth::Caller;
use crate::error::CoreError;

pub mod attendance;
pub mod profiles;
pub mod projects;
pub mod reports;

/// Admin-only gate. Non-admin callers fail with `Forbidden` before any
/// write is attempted.
pub(crate) fn require_admin(caller: &Caller) -> Result<(), CoreError> {
    if caller.is_admin() {
        Ok(())
    } else {
        log::warn!(
            "Denied admin-only operation for caller {} ({})",
            caller.id,
            caller.role.as_str()
        );
        Err(CoreError::Forbidden)
    }
}
