//! Pipeline stages that turn a user-supplied path into conversion jobs.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ walk ──▶ (convert)
//! (~, canonicalise)  (recursive, filtered, sorted)
//! ```
//!
//! 1. [`input`] — expand `~`, canonicalise, and fail early on a missing path
//! 2. [`walk`]  — enumerate supported documents under a directory root in a
//!    deterministic order
//!
//! Conversion itself lives in [`crate::convert`], which owns timeouts,
//! logging, and progress events.

pub mod input;
pub mod walk;
