use async_trait::async_trait;
use tracing::{debug, warn};

use super::client::create_mssql_client;
use super::config::MssqlClient;
use super::params::bind_query_params;
use super::query::collect_result_sets;
use crate::connector::{ConnectTarget, ProcedureConnector};
use crate::error::{DriverErrors, ProcedureError};
use crate::results::ResultSet;
use crate::types::RowValues;

/// [`ProcedureConnector`] backed by tiberius, one TCP connection per call.
#[derive(Debug, Clone, Copy, Default)]
pub struct TiberiusConnector;

impl TiberiusConnector {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// Run `sql` with `params` and collect every result set.
///
/// # Errors
/// Returns the driver error raised by execution or while reading rows.
pub async fn execute_procedure(
    client: &mut MssqlClient,
    sql: &str,
    params: &[RowValues],
) -> Result<Vec<ResultSet>, tiberius::error::Error> {
    let query = bind_query_params(sql, params);
    let stream = query.query(client).await?;
    collect_result_sets(stream).await
}

async fn close(client: MssqlClient) {
    if let Err(e) = client.close().await {
        warn!(error = %e, "closing SQL Server connection failed");
    }
}

#[async_trait]
impl ProcedureConnector for TiberiusConnector {
    async fn query_first(
        &self,
        target: &ConnectTarget,
        sql: &str,
        params: &[RowValues],
    ) -> Result<ResultSet, ProcedureError> {
        let mut client = create_mssql_client(target).await?;
        let result = execute_procedure(&mut client, sql, params).await;
        close(client).await;

        let result_sets = result.map_err(|e| {
            ProcedureError::ExecutionError(format!("SQL Server query error: {e}"))
        })?;
        debug!(result_sets = result_sets.len(), "procedure returned");
        Ok(result_sets.into_iter().next().unwrap_or_default())
    }

    async fn query_all(
        &self,
        target: &ConnectTarget,
        sql: &str,
        params: &[RowValues],
    ) -> Result<Vec<ResultSet>, DriverErrors> {
        let mut client = create_mssql_client(target).await?;
        let result = execute_procedure(&mut client, sql, params).await;
        close(client).await;

        result.map_err(DriverErrors::from)
    }
}
