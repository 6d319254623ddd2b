//! Utility functions and helpers
//!
//! This module contains atomic file writes and calendar helpers.

pub mod atomic;
pub mod time;

pub use atomic::{atomic_write_with, cleanup_temp_files, AtomicError, AtomicResult};
pub use time::{format_day, minutes_between, start_of_day};
