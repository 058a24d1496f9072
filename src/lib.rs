//! Per-test temporary files and directories with deterministic names and
//! guaranteed cleanup.
//!
//! See [`test_temp_core`] for the engine and [`temp_test`] for the test macro.

pub use test_temp_core;
pub use test_temp_core::*;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use test_temp_core::prelude::*;
}
