//! Observability module providing structured logging.
//!
//! Logs are written to stderr with configurable format (pretty, compact, JSON) so
//! report output on stdout stays machine-readable.

mod tracing_init;

pub use tracing_init::*;
