//! Command-line host for the measurements request dispatcher.
//!
//! # Overview
//! Supplies the three ports `measure_core::RequestDispatcher` needs: the
//! parsed command line is the form, `UreqTransport` performs the blocking
//! HTTP round-trip, and `WriterSink` prints the message.

pub mod args;
pub mod sink;
pub mod transport;

pub use args::{Args, MethodArg, DEFAULT_BASE_URL};
pub use sink::WriterSink;
pub use transport::UreqTransport;
