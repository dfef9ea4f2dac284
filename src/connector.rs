use std::fmt;

use async_trait::async_trait;

use crate::config::FactoryConfig;
use crate::error::{DriverErrors, ProcedureError};
use crate::results::ResultSet;
use crate::types::RowValues;

/// Where and how a single call connects. Built per call, never reused.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectTarget {
    pub host: String,
    pub port: u16,
    pub instance_name: Option<String>,
    pub database: String,
    pub username: String,
    pub password: String,
    pub trust_server_certificate: bool,
}

impl fmt::Debug for ConnectTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectTarget")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("instance_name", &self.instance_name)
            .field("database", &self.database)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl ConnectTarget {
    /// Target for one call: `server_override` replaces the configured host and
    /// `database` falls back to the configured default.
    #[must_use]
    pub fn for_call(
        config: &FactoryConfig,
        database: Option<&str>,
        server_override: Option<&str>,
    ) -> Self {
        Self {
            host: server_override.unwrap_or(&config.hostname).to_string(),
            port: config.port_or_default(),
            instance_name: config.instance_name.clone(),
            database: database.unwrap_or(&config.default_database).to_string(),
            username: config.username.clone(),
            password: config.password.clone(),
            trust_server_certificate: config.trust_server_certificate,
        }
    }
}

/// Executes already-translated SQL against a fresh connection.
///
/// Implementations open a connection per call and close it before returning.
#[async_trait]
pub trait ProcedureConnector: Send + Sync {
    /// Execute `sql` and return the first result set (empty if none).
    ///
    /// # Errors
    /// Returns `ProcedureError` if connecting, executing or fetching fails.
    async fn query_first(
        &self,
        target: &ConnectTarget,
        sql: &str,
        params: &[RowValues],
    ) -> Result<ResultSet, ProcedureError>;

    /// Execute `sql` and return every result set it produced, in order.
    ///
    /// # Errors
    /// Returns every diagnostic collected while connecting or executing.
    async fn query_all(
        &self,
        target: &ConnectTarget,
        sql: &str,
        params: &[RowValues],
    ) -> Result<Vec<ResultSet>, DriverErrors>;
}
