//! Centralized constants for kcheck.
//!
//! All project-wide default values live here.
//! Change a value in one place and it applies everywhere.

pub mod health;
pub mod network;
pub mod paths;
