//! Common type definitions.
//!
//! Entity identifiers are thin aliases over their storage representation:
//! tracked users, tasks and task templates use serial integer keys, while
//! administrators are keyed by their login account id.

/// Tracked user identifier (serial).
pub type UserId = i32;
/// Task identifier (serial).
pub type TaskId = i32;
/// Task template identifier (serial).
pub type TemplateId = i32;
/// Administrator account identifier.
pub type AdminId = String;

/// Raw status code as stored: 0 pending, 1 completed, 2 rest, 3 not-applicable.
pub type StatusCode = i16;
