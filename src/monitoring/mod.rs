/*!
 * Monitoring Module
 * Structured logging
 */

pub mod tracer;

pub use tracer::{init_tracing, CommandSpan};
