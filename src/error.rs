use std::fmt;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProcedureError {
    #[cfg(feature = "mssql")]
    #[error(transparent)]
    MssqlError(#[from] tiberius::error::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Parameter error: {0}")]
    ParameterError(String),

    #[error("SQL execution error: {0}")]
    ExecutionError(String),

    /// A named-mode call failed. `message` is only filled in when the caller
    /// asked for debug detail.
    #[error("{}", failure_text(.procedure, .message.as_deref()))]
    ProcedureFailed {
        procedure: String,
        message: Option<String>,
    },

    /// A call-mode failure with every diagnostic the driver produced.
    #[error(transparent)]
    Driver(#[from] DriverErrors),
}

impl ProcedureError {
    /// Wrap a failure of `procedure`, keeping the underlying text only when `debug` is set.
    #[must_use]
    pub fn procedure_failed(procedure: &str, source: &ProcedureError, debug: bool) -> Self {
        ProcedureError::ProcedureFailed {
            procedure: procedure.to_string(),
            message: debug.then(|| source.to_string()),
        }
    }
}

fn failure_text(procedure: &str, message: Option<&str>) -> String {
    match message {
        Some(message) => format!("Error running {procedure}, message: {message}"),
        None => format!("Error running {procedure}"),
    }
}

/// One error record reported by the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverDiagnostic {
    pub sqlstate: String,
    pub code: i64,
    pub message: String,
}

impl DriverDiagnostic {
    #[must_use]
    pub fn new(sqlstate: impl Into<String>, code: i64, message: impl Into<String>) -> Self {
        Self {
            sqlstate: sqlstate.into(),
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for DriverDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.sqlstate, self.code, self.message)
    }
}

/// SQLSTATE used for transport failures (communication link failure).
pub const SQLSTATE_LINK_FAILURE: &str = "08S01";
/// SQLSTATE used when the driver gives no better classification.
pub const SQLSTATE_GENERAL: &str = "HY000";

#[cfg(feature = "mssql")]
impl From<&tiberius::error::Error> for DriverDiagnostic {
    fn from(err: &tiberius::error::Error) -> Self {
        match err {
            tiberius::error::Error::Server(token) => DriverDiagnostic::new(
                format!("{:02}", token.state()),
                i64::from(token.code()),
                token.message(),
            ),
            tiberius::error::Error::Io { message, .. } => {
                DriverDiagnostic::new(SQLSTATE_LINK_FAILURE, 0, message.clone())
            }
            other => DriverDiagnostic::new(SQLSTATE_GENERAL, 0, other.to_string()),
        }
    }
}

/// Aggregated driver diagnostics for a failed call-mode execution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DriverErrors {
    diagnostics: Vec<DriverDiagnostic>,
}

impl DriverErrors {
    #[must_use]
    pub fn new(diagnostics: Vec<DriverDiagnostic>) -> Self {
        Self { diagnostics }
    }

    pub fn push(&mut self, diagnostic: DriverDiagnostic) {
        self.diagnostics.push(diagnostic);
    }

    #[must_use]
    pub fn diagnostics(&self) -> &[DriverDiagnostic] {
        &self.diagnostics
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

impl fmt::Display for DriverErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SQLSrv operation failed\n")?;
        for (i, diagnostic) in self.diagnostics.iter().enumerate() {
            if i > 0 {
                f.write_str("\n\n")?;
            }
            write!(f, "{diagnostic}")?;
        }
        Ok(())
    }
}

impl std::error::Error for DriverErrors {}

#[cfg(feature = "mssql")]
impl From<tiberius::error::Error> for DriverErrors {
    fn from(err: tiberius::error::Error) -> Self {
        DriverErrors::new(vec![DriverDiagnostic::from(&err)])
    }
}

impl From<ProcedureError> for DriverErrors {
    fn from(err: ProcedureError) -> Self {
        match err {
            ProcedureError::Driver(errors) => errors,
            #[cfg(feature = "mssql")]
            ProcedureError::MssqlError(e) => DriverErrors::from(e),
            ProcedureError::ConnectionError(message) => DriverErrors::new(vec![
                DriverDiagnostic::new(SQLSTATE_LINK_FAILURE, 0, message),
            ]),
            other => DriverErrors::new(vec![DriverDiagnostic::new(
                SQLSTATE_GENERAL,
                0,
                other.to_string(),
            )]),
        }
    }
}
