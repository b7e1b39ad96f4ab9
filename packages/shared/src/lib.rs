//! Shared utilities for roomrelay.
//!
//! Logger setup and time formatting used by the server binary and library.

pub mod logger;
pub mod time;
