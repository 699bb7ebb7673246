//! Attendance engine: the per-(identity, day) check-in state machine.
//!
//! States: NotCheckedIn → CheckedIn → CheckedOut. Transitions are guarded
//! twice: an application-level existence check as a fast path, and the
//! UNIQUE(user_id, day) index as the actual correctness mechanism. Two
//! near-simultaneous check-ins race past the existence check, but only one
//! insert survives the constraint.
//!
//! "Today" is one [`DayWindow`] value computed at the top of each operation
//! and used for both the guard and the stored day key; no call site derives
//! its own notion of the current day.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use uuid::Uuid;

use crate::auth::Caller;
use crate::day_window::DayWindow;
use crate::db::{DbAttendance, WorkforceDb};
use crate::error::CoreError;

/// Check the caller in for today. Fails with `AlreadyCheckedIn` when a
/// record for (caller, today) already exists.
pub fn check_in(
    db: &WorkforceDb,
    caller: &Caller,
    note: Option<String>,
    tz: Tz,
) -> Result<DbAttendance, CoreError> {
    check_in_at(db, caller, note, Utc::now(), tz)
}

/// Check-in with an explicit reference instant. The public entry point
/// passes `Utc::now()`; tests pin the clock.
pub fn check_in_at(
    db: &WorkforceDb,
    caller: &Caller,
    note: Option<String>,
    now: DateTime<Utc>,
    tz: Tz,
) -> Result<DbAttendance, CoreError> {
    let window = DayWindow::containing(now, tz);
    let day = window.day_key();

    // Fast path; the unique index below is the real guard.
    if db.get_attendance_for_day(&caller.id, &day)?.is_some() {
        return Err(CoreError::AlreadyCheckedIn { day });
    }

    let record = DbAttendance {
        id: Uuid::new_v4().to_string(),
        user_id: caller.id.clone(),
        day: day.clone(),
        check_in: now.to_rfc3339(),
        check_out: None,
        note,
        full_name: None,
    };

    match db.insert_attendance(&record) {
        Ok(()) => {
            log::info!("Checked in {} for {}", caller.id, day);
            Ok(record)
        }
        // Lost the race between the existence check and the insert.
        Err(e) if e.is_constraint_violation() => Err(CoreError::AlreadyCheckedIn { day }),
        Err(e) => Err(e.into()),
    }
}

/// Check out an open attendance record.
///
/// The caller must own the record (admins may close anyone's); a record
/// that is already checked out fails with `AlreadyCheckedOut` and keeps
/// its original check-out time.
pub fn check_out(
    db: &WorkforceDb,
    caller: &Caller,
    record_id: &str,
) -> Result<DbAttendance, CoreError> {
    check_out_at(db, caller, record_id, Utc::now())
}

pub fn check_out_at(
    db: &WorkforceDb,
    caller: &Caller,
    record_id: &str,
    now: DateTime<Utc>,
) -> Result<DbAttendance, CoreError> {
    let record = db
        .get_attendance(record_id)?
        .ok_or_else(|| CoreError::not_found("attendance record", record_id))?;

    if !caller.owns_or_admin(&record.user_id) {
        return Err(CoreError::Forbidden);
    }
    if record.check_out.is_some() {
        return Err(CoreError::AlreadyCheckedOut);
    }

    // Conditional update: a racing second check-out changes zero rows.
    let updated = db.set_check_out(record_id, &now.to_rfc3339())?;
    if updated == 0 {
        return Err(CoreError::AlreadyCheckedOut);
    }

    db.get_attendance(record_id)?
        .ok_or_else(|| CoreError::not_found("attendance record", record_id))
}

/// Today's attendance sheet, scoped by role: admins see every row, others
/// only their own. An empty day is an empty list, never an error.
pub fn list_today(db: &WorkforceDb, caller: &Caller, tz: Tz) -> Result<Vec<DbAttendance>, CoreError> {
    list_for_day(db, caller, Utc::now(), tz)
}

pub fn list_for_day(
    db: &WorkforceDb,
    caller: &Caller,
    now: DateTime<Utc>,
    tz: Tz,
) -> Result<Vec<DbAttendance>, CoreError> {
    let window = DayWindow::containing(now, tz);
    Ok(db.list_attendance_for_day(&window.day_key(), &caller.scope())?)
}

// =============================================================================
// Tests
// =============================================================================
