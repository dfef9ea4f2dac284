use super::params::ProcedureParams;
use crate::types::{ConnectionMode, RowValues};

/// One procedure invocation and its per-call options.
///
/// ```rust
/// use stored_procedure_factory::prelude::*;
///
/// let request = ProcedureRequest::new("GetOrders")
///     .param("CustomerId", 42)
///     .database("Sales")
///     .mode(ConnectionMode::Call)
///     .debug(true);
/// assert_eq!(request.params.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ProcedureRequest {
    pub procedure: String,
    pub params: ProcedureParams,
    /// Falls back to the configured default database when `None`.
    pub database: Option<String>,
    pub mode: ConnectionMode,
    /// Carry the underlying error text in named-mode failures.
    pub debug: bool,
    /// Connect to this host instead of the configured one.
    pub server_override: Option<String>,
}

impl ProcedureRequest {
    #[must_use]
    pub fn new(procedure: impl Into<String>) -> Self {
        Self {
            procedure: procedure.into(),
            params: ProcedureParams::new(),
            database: None,
            mode: ConnectionMode::default(),
            debug: false,
            server_override: None,
        }
    }

    #[must_use]
    pub fn params(mut self, params: ProcedureParams) -> Self {
        self.params = params;
        self
    }

    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<RowValues>) -> Self {
        self.params.insert(key, value);
        self
    }

    #[must_use]
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    #[must_use]
    pub fn mode(mut self, mode: ConnectionMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    #[must_use]
    pub fn server_override(mut self, server: Option<String>) -> Self {
        self.server_override = server;
        self
    }
}
