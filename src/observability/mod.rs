//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Host-side subsystems (CLI, watcher, stores, extractor):
//!     → logging.rs (structured log events)
//!     → stdout
//! ```

pub mod logging;
