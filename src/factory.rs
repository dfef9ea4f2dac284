use serde_json::Value as JsonValue;
use tracing::debug;

use crate::config::FactoryConfig;
use crate::connector::{ConnectTarget, ProcedureConnector};
use crate::error::{DriverErrors, ProcedureError};
use crate::procedure::{
    ProcedureRequest, format_call_query, format_named_query, format_properties, validate_params,
};
use crate::reporter::{ErrorReporter, ReportContext, TracingReporter};
use crate::results::ResultSet;
use crate::translation::{translate_call_escape, translate_named_placeholders};
use crate::types::{ConnectionMode, RowValues};
use crate::utf8::Utf8Normalize;

#[cfg(feature = "mssql")]
use crate::mssql::TiberiusConnector;

/// What a procedure run produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcedureOutput {
    /// Named mode: rows of the first result set, keys lower-cased, text UTF-8 normalized.
    Rows(ResultSet),
    /// Call mode: every result set, as fetched.
    ResultSets(Vec<ResultSet>),
}

impl ProcedureOutput {
    /// The result sets, `Rows` counting as one.
    #[must_use]
    pub fn into_result_sets(self) -> Vec<ResultSet> {
        match self {
            ProcedureOutput::Rows(rows) => vec![rows],
            ProcedureOutput::ResultSets(sets) => sets,
        }
    }

    /// JSON rendering: an array of row objects for `Rows`, an array of such
    /// arrays for `ResultSets`.
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        fn rows(set: &ResultSet) -> JsonValue {
            JsonValue::Array(set.results.iter().map(|row| row.to_json()).collect())
        }
        match self {
            ProcedureOutput::Rows(set) => rows(set),
            ProcedureOutput::ResultSets(sets) => JsonValue::Array(sets.iter().map(rows).collect()),
        }
    }
}

/// Formats and runs stored-procedure calls against the configured server.
///
/// Construct once from configuration and share it; every call opens and
/// closes its own connection.
pub struct ProcedureFactory<C, R = TracingReporter> {
    config: FactoryConfig,
    connector: C,
    reporter: R,
}

#[cfg(feature = "mssql")]
impl ProcedureFactory<TiberiusConnector, TracingReporter> {
    /// Factory using tiberius and reporting failures as `tracing` events.
    ///
    /// # Errors
    /// Returns `ProcedureError::ConfigError` if `config` does not validate.
    pub fn new(config: FactoryConfig) -> Result<Self, ProcedureError> {
        Self::with_connector(config, TiberiusConnector::new())
    }
}

impl<C: ProcedureConnector> ProcedureFactory<C, TracingReporter> {
    /// # Errors
    /// Returns `ProcedureError::ConfigError` if `config` does not validate.
    pub fn with_connector(config: FactoryConfig, connector: C) -> Result<Self, ProcedureError> {
        config.validate()?;
        Ok(Self {
            config,
            connector,
            reporter: TracingReporter,
        })
    }
}

impl<C: ProcedureConnector, R: ErrorReporter> ProcedureFactory<C, R> {
    /// Swap the error reporter.
    #[must_use]
    pub fn with_reporter<R2: ErrorReporter>(self, reporter: R2) -> ProcedureFactory<C, R2> {
        ProcedureFactory {
            config: self.config,
            connector: self.connector,
            reporter,
        }
    }

    #[must_use]
    pub fn config(&self) -> &FactoryConfig {
        &self.config
    }

    /// Run `request` in the mode it names.
    ///
    /// # Errors
    /// See [`ProcedureFactory::run_named`] and [`ProcedureFactory::run_call`].
    pub async fn run_procedure(
        &self,
        request: &ProcedureRequest,
    ) -> Result<ProcedureOutput, ProcedureError> {
        match request.mode {
            ConnectionMode::Named => self.run_named(request).await.map(ProcedureOutput::Rows),
            ConnectionMode::Call => self.run_call(request).await.map(ProcedureOutput::ResultSets),
        }
    }

    /// `EXEC [dbo].[Proc] @Key = :key,...` with named bindings.
    ///
    /// Returns the first result set with lower-cased column names and UTF-8
    /// normalized values. No rows is `Ok` with an empty set.
    ///
    /// # Errors
    /// Any failure is captured by the reporter and returned as
    /// `ProcedureError::ProcedureFailed`; the underlying text is included only
    /// when `request.debug` is set.
    pub async fn run_named(&self, request: &ProcedureRequest) -> Result<ResultSet, ProcedureError> {
        let target = self.target(request);
        match self.execute_named(request, &target).await {
            Ok(result_set) => Ok(result_set),
            Err(err) => {
                self.report(&err, request, &target);
                Err(ProcedureError::procedure_failed(
                    &request.procedure,
                    &err,
                    request.debug,
                ))
            }
        }
    }

    /// `{call [dbo].[Proc](?,...)}` with values bound positionally in
    /// parameter-map order.
    ///
    /// Returns every row of every result set the procedure produced, as
    /// fetched; the request's server override and database apply here as in
    /// named mode.
    ///
    /// # Errors
    /// Returns `ProcedureError::Driver` aggregating every diagnostic
    /// collected; the failure is also captured by the reporter.
    pub async fn run_call(
        &self,
        request: &ProcedureRequest,
    ) -> Result<Vec<ResultSet>, ProcedureError> {
        let target = self.target(request);
        match self.execute_call(request, &target).await {
            Ok(result_sets) => Ok(result_sets),
            Err(errors) => {
                let err = ProcedureError::Driver(errors);
                self.report(&err, request, &target);
                Err(err)
            }
        }
    }

    async fn execute_named(
        &self,
        request: &ProcedureRequest,
        target: &ConnectTarget,
    ) -> Result<ResultSet, ProcedureError> {
        validate_params(&request.params)?;
        let bindings = format_properties(&request.params);
        let sql = format_named_query(&request.procedure, &bindings);
        let translated = translate_named_placeholders(&sql, &bindings)?;
        debug!(procedure = %request.procedure, %sql, driver_sql = %translated, "running procedure");

        let values: Vec<RowValues> = bindings.into_iter().map(|b| b.value).collect();
        let mut result_set = self
            .connector
            .query_first(target, &translated, &values)
            .await?;
        result_set.lowercase_columns();
        result_set.normalize_utf8();
        Ok(result_set)
    }

    async fn execute_call(
        &self,
        request: &ProcedureRequest,
        target: &ConnectTarget,
    ) -> Result<Vec<ResultSet>, DriverErrors> {
        let sql = format_call_query(&request.procedure, request.params.len());
        let (translated, placeholders) = translate_call_escape(&sql)?;
        debug!(procedure = %request.procedure, %sql, driver_sql = %translated, "running procedure call");

        let values = request.params.positional_values();
        debug_assert_eq!(placeholders, values.len());
        self.connector.query_all(target, &translated, &values).await
    }

    fn target(&self, request: &ProcedureRequest) -> ConnectTarget {
        ConnectTarget::for_call(
            &self.config,
            request.database.as_deref(),
            request.server_override.as_deref(),
        )
    }

    fn report(&self, err: &ProcedureError, request: &ProcedureRequest, target: &ConnectTarget) {
        self.reporter.capture(
            err,
            &ReportContext {
                procedure: &request.procedure,
                database: &target.database,
                host: &target.host,
                mode: request.mode,
            },
        );
    }
}
