//! # Command Layer
//!
//! Business logic for every mutation and query, as free functions over a
//! [`crate::library::Library`]. Each mutation builds the new sequence(s) first
//! and replaces them in one step, so no caller can observe a half-applied
//! change.
//!
//! Failure policy:
//! - creation and deletion return [`crate::error::Result`]; an unknown owner or
//!   target is reported as `DanglingReference` and leaves state untouched;
//! - reorder, reparent and partial updates never fail: a missing id is a no-op
//!   and the return value says whether anything changed.
//!
//! Session concerns (active space, expanded flags, highlights) are not handled
//! here; see [`crate::api`].

pub mod backup;
pub mod collections;
pub mod export;
pub mod links;
pub mod reorder;
pub mod search;
pub mod spaces;
pub mod tabs;
