//! Prometheus metrics for the demo API.
//!
//! [`MetricsRegistry`] owns a Prometheus recorder that is never installed
//! globally, so every registry is isolated from the others. It carries the
//! default process metrics collected by [`ProcessCollector`] and any custom
//! counters registered with a fixed label schema.

pub mod error;
pub mod process;
pub mod registry;

pub use error::{MetricsError, Result};
pub use process::{ProcessCollector, ProcessSnapshot};
pub use registry::MetricsRegistry;
