//! Shared foundational types used across the ARTICo³ development kit.
//!
//! This crate provides the accelerator core identity used for IP naming and
//! the copy-or-link mode that governs how sources land in an export tree.

#![warn(missing_docs)]

pub mod core_id;
pub mod link;

pub use core_id::CoreId;
pub use link::LinkMode;
