#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use stored_procedure_factory::prelude::*;

/// One call as seen by the connector.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub target: ConnectTarget,
    pub sql: String,
    pub params: Vec<RowValues>,
}

pub enum Scripted {
    Sets(Vec<ResultSet>),
    Fail(ProcedureError),
    Diagnostics(Vec<DriverDiagnostic>),
}

/// Connector that records calls and replays a scripted response.
#[derive(Clone)]
pub struct FakeConnector {
    pub calls: Arc<Mutex<Vec<RecordedCall>>>,
    response: Arc<Mutex<Option<Scripted>>>,
}

impl FakeConnector {
    pub fn returning(sets: Vec<ResultSet>) -> Self {
        Self::scripted(Scripted::Sets(sets))
    }

    pub fn failing(err: ProcedureError) -> Self {
        Self::scripted(Scripted::Fail(err))
    }

    pub fn diagnostics(diagnostics: Vec<DriverDiagnostic>) -> Self {
        Self::scripted(Scripted::Diagnostics(diagnostics))
    }

    fn scripted(response: Scripted) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            response: Arc::new(Mutex::new(Some(response))),
        }
    }

    pub fn recorded(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, target: &ConnectTarget, sql: &str, params: &[RowValues]) -> Scripted {
        self.calls.lock().unwrap().push(RecordedCall {
            target: target.clone(),
            sql: sql.to_string(),
            params: params.to_vec(),
        });
        self.response
            .lock()
            .unwrap()
            .take()
            .unwrap_or(Scripted::Sets(Vec::new()))
    }
}

#[async_trait]
impl ProcedureConnector for FakeConnector {
    async fn query_first(
        &self,
        target: &ConnectTarget,
        sql: &str,
        params: &[RowValues],
    ) -> Result<ResultSet, ProcedureError> {
        match self.record(target, sql, params) {
            Scripted::Sets(sets) => Ok(sets.into_iter().next().unwrap_or_default()),
            Scripted::Fail(err) => Err(err),
            Scripted::Diagnostics(d) => Err(ProcedureError::Driver(DriverErrors::new(d))),
        }
    }

    async fn query_all(
        &self,
        target: &ConnectTarget,
        sql: &str,
        params: &[RowValues],
    ) -> Result<Vec<ResultSet>, DriverErrors> {
        match self.record(target, sql, params) {
            Scripted::Sets(sets) => Ok(sets),
            Scripted::Fail(err) => Err(DriverErrors::from(err)),
            Scripted::Diagnostics(d) => Err(DriverErrors::new(d)),
        }
    }
}

/// Reporter that keeps the rendered errors it was handed.
#[derive(Clone, Default)]
pub struct CapturingReporter {
    pub captured: Arc<Mutex<Vec<(String, String)>>>,
}

impl CapturingReporter {
    pub fn captured(&self) -> Vec<(String, String)> {
        self.captured.lock().unwrap().clone()
    }
}

impl ErrorReporter for CapturingReporter {
    fn capture(&self, error: &ProcedureError, context: &ReportContext<'_>) {
        self.captured
            .lock()
            .unwrap()
            .push((context.procedure.to_string(), error.to_string()));
    }
}

pub fn config() -> FactoryConfig {
    FactoryConfig::new("test-server", "test-user", "test-password")
}

pub fn result_set(columns: &[&str], rows: Vec<Vec<RowValues>>) -> ResultSet {
    let mut rs = ResultSet::with_capacity(rows.len());
    rs.set_column_names(Arc::new(columns.iter().map(|c| (*c).to_string()).collect()));
    for row in rows {
        rs.add_row_values(row);
    }
    rs
}
