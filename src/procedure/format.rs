use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::params::{ProcedureParams, PropertyBinding};
use crate::error::ProcedureError;

static PARAMETER_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("static pattern"));

/// Build the named bindings for `params`, in input order.
///
/// ```rust
/// use stored_procedure_factory::prelude::*;
///
/// let params = ProcedureParams::new().with("userId", 123);
/// let bindings = format_properties(&params);
/// assert_eq!(bindings[0].parameter, "@userId");
/// assert_eq!(bindings[0].placeholder, ":userid");
/// ```
#[must_use]
pub fn format_properties(params: &ProcedureParams) -> Vec<PropertyBinding> {
    params
        .iter()
        .map(|(key, value)| PropertyBinding {
            parameter: format!("@{key}"),
            placeholder: format!(":{}", key.to_lowercase()),
            value: value.clone(),
        })
        .collect()
}

/// Reject keys that are not identifiers, and keys whose placeholders collide.
///
/// # Errors
/// Returns `ProcedureError::ParameterError` naming the offending key.
pub fn validate_params(params: &ProcedureParams) -> Result<(), ProcedureError> {
    let mut seen = HashSet::with_capacity(params.len());
    for (key, _) in params.iter() {
        if !PARAMETER_NAME.is_match(key) {
            return Err(ProcedureError::ParameterError(format!(
                "parameter name {key:?} is not a valid identifier"
            )));
        }
        if !seen.insert(key.to_lowercase()) {
            return Err(ProcedureError::ParameterError(format!(
                "parameter {key:?} collides with another parameter once lower-cased"
            )));
        }
    }
    Ok(())
}

/// `[dbo].[<procedure>]`, with `]` doubled inside the name.
#[must_use]
pub fn quote_procedure(procedure: &str) -> String {
    format!("[dbo].[{}]", procedure.replace(']', "]]"))
}

/// Named call text: `EXEC [dbo].[Proc] @A = :a,@B = :b`.
///
/// The parameter clause is omitted entirely when there are no bindings.
#[must_use]
pub fn format_named_query(procedure: &str, bindings: &[PropertyBinding]) -> String {
    let mut query = format!("EXEC {}", quote_procedure(procedure));
    if !bindings.is_empty() {
        query.push(' ');
        let clauses: Vec<String> = bindings
            .iter()
            .map(|b| format!("{} = {}", b.parameter, b.placeholder))
            .collect();
        query.push_str(&clauses.join(","));
    }
    query
}

/// Call-escape text: `{call [dbo].[Proc](?,?)}`, parentheses omitted when
/// `param_count` is zero.
#[must_use]
pub fn format_call_query(procedure: &str, param_count: usize) -> String {
    let mut query = format!("{{call {}", quote_procedure(procedure));
    if param_count > 0 {
        query.push('(');
        query.push_str(&vec!["?"; param_count].join(","));
        query.push(')');
    }
    query.push('}');
    query
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RowValues;

    #[test]
    fn properties_empty() {
        assert!(format_properties(&ProcedureParams::new()).is_empty());
    }

    #[test]
    fn properties_in_input_order() {
        let params = ProcedureParams::new()
            .with("userId", 123)
            .with("userName", "testuser");
        let result = format_properties(&params);
        assert_eq!(result.len(), 2);

        assert_eq!(result[0].parameter, "@userId");
        assert_eq!(result[0].placeholder, ":userid");
        assert_eq!(result[0].value, RowValues::Int(123));

        assert_eq!(result[1].parameter, "@userName");
        assert_eq!(result[1].placeholder, ":username");
        assert_eq!(result[1].value, RowValues::Text("testuser".into()));
    }

    #[test]
    fn named_query_without_params() {
        assert_eq!(
            format_named_query("TestProcedure", &[]),
            "EXEC [dbo].[TestProcedure]"
        );
    }

    #[test]
    fn named_query_with_params() {
        let params = ProcedureParams::new()
            .with("userId", 123)
            .with("status", "active");
        let bindings = format_properties(&params);
        assert_eq!(
            format_named_query("TestProcedure", &bindings),
            "EXEC [dbo].[TestProcedure] @userId = :userid,@status = :status"
        );
    }

    #[test]
    fn named_query_single_param_has_no_comma() {
        let bindings = format_properties(&ProcedureParams::new().with("Id", 1));
        assert_eq!(
            format_named_query("P", &bindings),
            "EXEC [dbo].[P] @Id = :id"
        );
    }

    #[test]
    fn call_query_without_params() {
        assert_eq!(
            format_call_query("TestProcedure", 0),
            "{call [dbo].[TestProcedure]}"
        );
    }

    #[test]
    fn call_query_with_params() {
        assert_eq!(
            format_call_query("TestProcedure", 2),
            "{call [dbo].[TestProcedure](?,?)}"
        );
    }

    #[test]
    fn closing_bracket_in_name_is_doubled() {
        assert_eq!(quote_procedure("odd]name"), "[dbo].[odd]]name]");
    }

    #[test]
    fn validation_rejects_bad_and_colliding_names() {
        let bad = ProcedureParams::new().with("user id", 1);
        assert!(matches!(
            validate_params(&bad),
            Err(ProcedureError::ParameterError(_))
        ));

        let colliding = ProcedureParams::new().with("UserId", 1).with("userid", 2);
        assert!(matches!(
            validate_params(&colliding),
            Err(ProcedureError::ParameterError(_))
        ));

        let fine = ProcedureParams::new().with("UserId", 1).with("_status2", 2);
        assert!(validate_params(&fine).is_ok());
    }
}
