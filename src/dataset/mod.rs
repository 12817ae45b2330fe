//! Dataset Module - in-memory student record tables
//!
//! Collaborators load flat files; the core only sees this snapshot.

pub mod table;

pub use table::{Column, Dataset};
