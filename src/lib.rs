//! Role-gated workforce records: employee directory, project assignment,
//! progress reporting, and daily attendance.
//!
//! The crate is layered: [`db`] is the SQLite record store, [`services`]
//! wraps it with authorization, visibility scoping, and the attendance
//! state machine, and [`auth`] resolves the caller identity and role that
//! every service operation takes as input.

pub mod auth;
pub mod config;
pub mod day_window;
pub mod db;
mod error;
mod migrations;
pub mod services;

pub use error::{CoreError, CoreFailure, ErrorKind};
