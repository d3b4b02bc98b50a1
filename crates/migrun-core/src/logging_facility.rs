//! Structured logging for migrun
//!
//! `init(profile)` installs the process subscriber once. Operations mark
//! their boundaries with `log_op_start!`, `log_op_end!` and `log_op_error!`,
//! and tests read those events back through `init_test_capture`.
//!
//! # Usage
//!
//! ```rust
//! use migrun_core::logging_facility::{init, Profile};
//!
//! // Initialize once at application startup
//! init(Profile::detect());
//! ```

pub mod init;
pub mod macros;
pub mod schema;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
