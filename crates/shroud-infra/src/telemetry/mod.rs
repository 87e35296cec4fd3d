//! Telemetry initialization
//!
//! Logs go to stderr so command output on stdout stays machine-readable.

mod init_basic;

pub use init_basic::{init_telemetry, shutdown_telemetry, LogFormat};
