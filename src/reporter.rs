//! Hand-off point to an external error-tracking service.
//!
//! The factory captures every failed call here before returning the error.
//! Implement [`ErrorReporter`] to forward failures to a tracker; the default
//! [`TracingReporter`] records them as `tracing` error events, which any
//! subscriber-side integration can pick up.

use tracing::error;

use crate::error::ProcedureError;
use crate::types::ConnectionMode;

/// What was running when a failure was captured.
#[derive(Debug, Clone, Copy)]
pub struct ReportContext<'a> {
    pub procedure: &'a str,
    pub database: &'a str,
    pub host: &'a str,
    pub mode: ConnectionMode,
}

pub trait ErrorReporter: Send + Sync {
    fn capture(&self, error: &ProcedureError, context: &ReportContext<'_>);
}

/// Emits an `ERROR` level `tracing` event per failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn capture(&self, err: &ProcedureError, context: &ReportContext<'_>) {
        error!(
            procedure = context.procedure,
            database = context.database,
            host = context.host,
            mode = ?context.mode,
            error = %err,
            "stored procedure failed"
        );
    }
}

/// Drops every failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReporter;

impl ErrorReporter for NoopReporter {
    fn capture(&self, _error: &ProcedureError, _context: &ReportContext<'_>) {}
}

impl<R: ErrorReporter + ?Sized> ErrorReporter for std::sync::Arc<R> {
    fn capture(&self, error: &ProcedureError, context: &ReportContext<'_>) {
        (**self).capture(error, context);
    }
}
