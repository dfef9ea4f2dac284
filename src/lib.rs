//! Format and run SQL Server stored-procedure calls.
//!
//! A [`ProcedureFactory`] is built once from a [`FactoryConfig`] and then
//! runs [`ProcedureRequest`]s in one of two modes:
//!
//! - [`ConnectionMode::Named`]: `EXEC [dbo].[Proc] @Key = :key,...`, rows of
//!   the first result set with lower-cased keys and UTF-8 normalized text.
//! - [`ConnectionMode::Call`]: `{call [dbo].[Proc](?,...)}`, every result set
//!   as fetched, driver diagnostics aggregated on failure.
//!
//! ```rust,no_run
//! use stored_procedure_factory::prelude::*;
//!
//! # async fn demo() -> Result<(), ProcedureError> {
//! let config = FactoryConfig::builder("sql01", "svc", "secret")
//!     .default_database("Sales")
//!     .build()?;
//! let factory = ProcedureFactory::new(config)?;
//! let request = ProcedureRequest::new("GetCustomer").param("CustomerId", 42);
//! if let ProcedureOutput::Rows(rows) = factory.run_procedure(&request).await? {
//!     for row in &rows.results {
//!         println!("{:?}", row.get("customername"));
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod connector;
pub mod error;
pub mod factory;
pub mod prelude;
pub mod procedure;
pub mod reporter;
pub mod results;
pub mod translation;
pub mod types;
pub mod utf8;

#[cfg(feature = "mssql")]
pub mod mssql;

pub use config::{FactoryConfig, FactoryConfigBuilder};
pub use connector::{ConnectTarget, ProcedureConnector};
pub use error::{DriverDiagnostic, DriverErrors, ProcedureError};
pub use factory::{ProcedureFactory, ProcedureOutput};
pub use procedure::{ProcedureParams, ProcedureRequest, PropertyBinding};
pub use reporter::{ErrorReporter, NoopReporter, ReportContext, TracingReporter};
pub use results::{CustomDbRow, ResultSet};
pub use types::{ConnectionMode, RowValues};
