use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use stored_procedure_factory::prelude::*;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Run a SQL Server stored procedure and print its rows as JSON")]
struct Args {
    /// Procedure name, without schema (`[dbo]` is implied).
    #[arg(long, short)]
    procedure: String,
    /// `key=value` parameter, repeatable; order is kept.
    #[arg(long = "param", value_parser = parse_param)]
    params: Vec<(String, String)>,
    /// Database; defaults to the configured default.
    #[arg(long, short)]
    database: Option<String>,
    #[arg(long, value_enum, default_value = "named")]
    mode: ConnectionMode,
    /// Include driver detail in named-mode errors.
    #[arg(long)]
    debug: bool,
    /// Connect to this host instead of the configured one.
    #[arg(long)]
    server: Option<String>,
    /// JSON configuration file; `STORED_PROCEDURE_*` variables are used when absent.
    #[arg(long, env = "STORED_PROCEDURE_CONFIG")]
    config: Option<PathBuf>,
    #[arg(long)]
    pretty: bool,
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got {raw:?}"))
}

async fn run(args: Args) -> Result<String, ProcedureError> {
    let config = match &args.config {
        Some(path) => FactoryConfig::from_json_file(path)?,
        None => FactoryConfig::from_env()?,
    };
    let factory = ProcedureFactory::new(config)?;

    let params: ProcedureParams = args
        .params
        .iter()
        .map(|(k, v)| (k.as_str(), RowValues::parse_loose(v)))
        .collect();
    let mut request = ProcedureRequest::new(args.procedure)
        .params(params)
        .mode(args.mode)
        .debug(args.debug)
        .server_override(args.server);
    if let Some(database) = args.database {
        request = request.database(database);
    }

    let output = factory.run_procedure(&request).await?.to_json();
    let rendered = if args.pretty {
        serde_json::to_string_pretty(&output)
    } else {
        serde_json::to_string(&output)
    };
    rendered.map_err(|e| ProcedureError::ExecutionError(format!("cannot render rows: {e}")))
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run(Args::parse()).await {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_keep_order_and_split_on_first_equals() {
        let args = Args::try_parse_from([
            "run-procedure",
            "-p",
            "GetUser",
            "--param",
            "UserId=7",
            "--param",
            "Filter=a=b",
            "--mode",
            "call",
        ])
        .unwrap();
        assert_eq!(
            args.params,
            vec![
                ("UserId".to_string(), "7".to_string()),
                ("Filter".to_string(), "a=b".to_string()),
            ]
        );
        assert_eq!(args.mode, ConnectionMode::Call);
    }

    #[test]
    fn param_without_equals_is_rejected() {
        assert!(Args::try_parse_from(["run-procedure", "-p", "X", "--param", "oops"]).is_err());
    }
}
