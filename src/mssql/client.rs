use tiberius::{Client, SqlBrowser};
use tokio::net::TcpStream;
use tokio_util::compat::TokioAsyncWriteCompatExt;
use tracing::debug;

use super::config::{MssqlClient, build_tiberius_config};
use crate::connector::ConnectTarget;
use crate::error::ProcedureError;

/// Open a new SQL Server connection for one call.
///
/// Named instances are resolved through the SQL Browser service; otherwise the
/// configured host and port are used directly.
///
/// # Errors
/// Returns `ProcedureError::ConnectionError` if the TCP connection or SQL
/// Browser lookup fails, and `ProcedureError::MssqlError` with the server's
/// own error (login failures included) if the TDS handshake fails.
pub async fn create_mssql_client(target: &ConnectTarget) -> Result<MssqlClient, ProcedureError> {
    let config = build_tiberius_config(target);
    debug!(?target, "connecting to SQL Server");

    let tcp = if target.instance_name.is_some() {
        TcpStream::connect_named(&config).await.map_err(|e| {
            ProcedureError::ConnectionError(format!("SQL Browser lookup failed: {e}"))
        })?
    } else {
        TcpStream::connect(config.get_addr()).await.map_err(|e| {
            ProcedureError::ConnectionError(format!("TCP connection error: {e}"))
        })?
    };
    tcp.set_nodelay(true)
        .map_err(|e| ProcedureError::ConnectionError(format!("TCP configuration error: {e}")))?;

    // Make compatible with Tiberius
    let tcp = tcp.compat_write();

    Ok(Client::connect(config, tcp).await?)
}
