// MSSQL module - SQL Server execution through tiberius
//
// - config: tiberius configuration for a call target
// - client: per-call connection
// - params: binding `RowValues` as `@Pn`
// - query: result set collection and value extraction
// - executor: the `ProcedureConnector` implementation

pub mod client;
pub mod config;
pub mod executor;
pub mod params;
pub mod query;

pub use client::create_mssql_client;
pub use config::MssqlClient;
pub use executor::{TiberiusConnector, execute_procedure};
pub use params::bind_query_params;
pub use query::collect_result_sets;
