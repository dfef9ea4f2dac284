// Procedure call construction
//
// - params: ordered parameter map and named bindings
// - format: the two textual call formats and parameter validation
// - request: per-call options

pub mod format;
pub mod params;
pub mod request;

pub use format::{
    format_call_query, format_named_query, format_properties, quote_procedure, validate_params,
};
pub use params::{ProcedureParams, PropertyBinding};
pub use request::ProcedureRequest;
