//! Convenient imports for common functionality.
//!
//! This module re-exports the most commonly used types and functions
//! to make it easier to get started with the library.

pub use crate::config::{FactoryConfig, FactoryConfigBuilder};
pub use crate::connector::{ConnectTarget, ProcedureConnector};
pub use crate::error::{DriverDiagnostic, DriverErrors, ProcedureError};
pub use crate::factory::{ProcedureFactory, ProcedureOutput};
pub use crate::procedure::{
    ProcedureParams, ProcedureRequest, PropertyBinding, format_call_query, format_named_query,
    format_properties,
};
pub use crate::reporter::{ErrorReporter, NoopReporter, ReportContext, TracingReporter};
pub use crate::results::{CustomDbRow, ResultSet};
pub use crate::types::{ConnectionMode, RowValues};
pub use crate::utf8::{Utf8Normalize, encode_utf8};

#[cfg(feature = "mssql")]
pub use crate::mssql::{MssqlClient, TiberiusConnector, create_mssql_client};
