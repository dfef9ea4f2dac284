//! Rewrite the textual call formats into the `@P1..@Pn` placeholders tiberius binds.
//!
//! tiberius sends every parameterised query through `sp_executesql`, which only
//! knows positional `@Pn` names. Named `:param` placeholders and ODBC
//! `{call ...}` escapes are therefore translated before execution.

use std::borrow::Cow;

mod parsers;
mod scanner;

use parsers::{
    find_open_paren, is_block_comment_end, is_block_comment_start, is_line_comment_start,
    is_scope_operator,
};
use scanner::{State, scan_ident};

use crate::error::ProcedureError;
use crate::procedure::PropertyBinding;

/// Placeholder syntax found in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderStyle {
    /// `:name` placeholders.
    Named,
    /// Bare `?` placeholders.
    Positional,
}

/// Driver-side name for the `position`-th (0-based) bound value.
#[must_use]
pub fn driver_placeholder(position: usize) -> String {
    format!("@P{}", position + 1)
}

/// Scan `sql`, calling `replace` for every placeholder of `style` found outside
/// string literals, quoted or bracketed identifiers and comments.
///
/// `replace` receives the placeholder name (empty for `?`) and returns its
/// replacement. Returns a borrowed `Cow` when nothing was replaced.
///
/// # Errors
/// Propagates the first error returned by `replace`.
pub fn rewrite_placeholders<F>(
    sql: &str,
    style: PlaceholderStyle,
    mut replace: F,
) -> Result<Cow<'_, str>, ProcedureError>
where
    F: FnMut(&str) -> Result<String, ProcedureError>,
{
    let bytes = sql.as_bytes();
    let mut out: Option<String> = None;
    let mut copied_to = 0;
    let mut state = State::Normal;
    let mut idx = 0;

    while idx < bytes.len() {
        let b = bytes[idx];
        match state {
            State::Normal => match b {
                b'\'' => state = State::SingleQuoted,
                b'"' => state = State::DoubleQuoted,
                b'[' => state = State::Bracketed,
                _ if is_line_comment_start(bytes, idx) => state = State::LineComment,
                _ if is_block_comment_start(bytes, idx) => {
                    state = State::BlockComment(1);
                    idx += 1;
                }
                b':' if style == PlaceholderStyle::Named && !is_scope_operator(bytes, idx) => {
                    if let Some((end, name)) = scan_ident(bytes, idx + 1) {
                        let buf = out.get_or_insert_with(|| String::with_capacity(sql.len()));
                        buf.push_str(&sql[copied_to..idx]);
                        buf.push_str(&replace(name)?);
                        copied_to = end;
                        idx = end;
                        continue;
                    }
                }
                b'?' if style == PlaceholderStyle::Positional => {
                    let buf = out.get_or_insert_with(|| String::with_capacity(sql.len()));
                    buf.push_str(&sql[copied_to..idx]);
                    buf.push_str(&replace("")?);
                    copied_to = idx + 1;
                }
                _ => {}
            },
            State::SingleQuoted => {
                if b == b'\'' {
                    if bytes.get(idx + 1) == Some(&b'\'') {
                        idx += 1; // skip escaped quote
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::DoubleQuoted => {
                if b == b'"' {
                    if bytes.get(idx + 1) == Some(&b'"') {
                        idx += 1;
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::Bracketed => {
                if b == b']' {
                    if bytes.get(idx + 1) == Some(&b']') {
                        idx += 1;
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::LineComment => {
                if b == b'\n' {
                    state = State::Normal;
                }
            }
            State::BlockComment(depth) => {
                if is_block_comment_start(bytes, idx) {
                    state = State::BlockComment(depth + 1);
                    idx += 1;
                } else if is_block_comment_end(bytes, idx) {
                    state = if depth == 1 {
                        State::Normal
                    } else {
                        State::BlockComment(depth - 1)
                    };
                    idx += 1;
                }
            }
        }
        idx += 1;
    }

    match out {
        Some(mut buf) => {
            buf.push_str(&sql[copied_to..]);
            Ok(Cow::Owned(buf))
        }
        None => Ok(Cow::Borrowed(sql)),
    }
}

/// Replace `:name` placeholders with `@Pn`, `n` being the position of the
/// binding that owns the placeholder.
///
/// ```rust
/// use stored_procedure_factory::prelude::*;
/// use stored_procedure_factory::translation::translate_named_placeholders;
///
/// let params = ProcedureParams::new().with("UserId", 1).with("Status", "a");
/// let bindings = format_properties(&params);
/// let sql = format_named_query("GetUser", &bindings);
/// let translated = translate_named_placeholders(&sql, &bindings).unwrap();
/// assert_eq!(translated, "EXEC [dbo].[GetUser] @UserId = @P1,@Status = @P2");
/// ```
///
/// # Errors
/// Returns `ProcedureError::ParameterError` for a placeholder no binding owns.
pub fn translate_named_placeholders<'a>(
    sql: &'a str,
    bindings: &[PropertyBinding],
) -> Result<Cow<'a, str>, ProcedureError> {
    rewrite_placeholders(sql, PlaceholderStyle::Named, |name| {
        bindings
            .iter()
            .position(|b| b.placeholder.get(1..) == Some(name))
            .map(driver_placeholder)
            .ok_or_else(|| {
                ProcedureError::ParameterError(format!("no value bound for placeholder :{name}"))
            })
    })
}

/// Rewrite an ODBC call escape into an `EXEC` statement.
///
/// `{call [dbo].[P](?,?)}` becomes `EXEC [dbo].[P] @P1,@P2` and
/// `{call [dbo].[P]}` becomes `EXEC [dbo].[P]`. Returns the statement and the
/// number of `?` placeholders it binds.
///
/// # Errors
/// Returns `ProcedureError::ParameterError` when `sql` is not a call escape.
pub fn translate_call_escape(sql: &str) -> Result<(String, usize), ProcedureError> {
    let not_escape =
        || ProcedureError::ParameterError(format!("not an ODBC call escape: {sql}"));

    let inner = sql
        .trim()
        .strip_prefix('{')
        .and_then(|s| s.strip_suffix('}'))
        .ok_or_else(not_escape)?
        .trim();

    let keyword = inner.get(..4).ok_or_else(not_escape)?;
    let rest = &inner[4..];
    if !keyword.eq_ignore_ascii_case("call") || !rest.starts_with(char::is_whitespace) {
        return Err(not_escape());
    }
    let rest = rest.trim();

    let (name, args) = match find_open_paren(rest.as_bytes()) {
        Some(open) => {
            let args = rest[open + 1..]
                .strip_suffix(')')
                .ok_or_else(not_escape)?;
            (rest[..open].trim_end(), args.trim())
        }
        None => (rest, ""),
    };
    if name.is_empty() {
        return Err(not_escape());
    }

    let mut count = 0;
    let args = rewrite_placeholders(args, PlaceholderStyle::Positional, |_| {
        let placeholder = driver_placeholder(count);
        count += 1;
        Ok(placeholder)
    })?;

    let statement = if args.is_empty() {
        format!("EXEC {name}")
    } else {
        format!("EXEC {name} {args}")
    };
    Ok((statement, count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::procedure::{ProcedureParams, format_named_query, format_properties};

    fn bindings(keys: &[&str]) -> Vec<PropertyBinding> {
        let params: ProcedureParams = keys.iter().map(|k| (*k, 0)).collect();
        format_properties(&params)
    }

    #[test]
    fn named_placeholders_follow_binding_order() {
        let b = bindings(&["userId", "status"]);
        let sql = format_named_query("TestProcedure", &b);
        let res = translate_named_placeholders(&sql, &b).unwrap();
        assert_eq!(res, "EXEC [dbo].[TestProcedure] @userId = @P1,@status = @P2");
    }

    #[test]
    fn named_without_placeholders_is_borrowed() {
        let sql = "EXEC [dbo].[TestProcedure]";
        let res = translate_named_placeholders(sql, &[]).unwrap();
        assert!(matches!(res, Cow::Borrowed(_)));
    }

    #[test]
    fn named_skips_literals_brackets_and_comments() {
        let b = bindings(&["id"]);
        let sql = "EXEC [dbo].[a:id] ':id', \":id\" -- :id\n/* :id /* :id */ */ @Id = :id";
        let res = translate_named_placeholders(sql, &b).unwrap();
        assert_eq!(
            res,
            "EXEC [dbo].[a:id] ':id', \":id\" -- :id\n/* :id /* :id */ */ @Id = @P1"
        );
    }

    #[test]
    fn named_ignores_scope_operator() {
        let res =
            translate_named_placeholders("SELECT geography::Point(1, 2, 4326)", &[]).unwrap();
        assert_eq!(res, "SELECT geography::Point(1, 2, 4326)");
    }

    #[test]
    fn named_keeps_multibyte_text() {
        let b = bindings(&["name"]);
        let res = translate_named_placeholders("EXEC [dbo].[Café] @Name = :name", &b).unwrap();
        assert_eq!(res, "EXEC [dbo].[Café] @Name = @P1");
    }

    #[test]
    fn named_unknown_placeholder_is_an_error() {
        let err = translate_named_placeholders("EXEC x @A = :missing", &[]).unwrap_err();
        assert!(matches!(err, ProcedureError::ParameterError(_)));
    }

    #[test]
    fn call_escape_with_params() {
        let (sql, count) = translate_call_escape("{call [dbo].[TestProcedure](?,?)}").unwrap();
        assert_eq!(sql, "EXEC [dbo].[TestProcedure] @P1,@P2");
        assert_eq!(count, 2);
    }

    #[test]
    fn call_escape_without_params() {
        let (sql, count) = translate_call_escape("{call [dbo].[TestProcedure]}").unwrap();
        assert_eq!(sql, "EXEC [dbo].[TestProcedure]");
        assert_eq!(count, 0);
    }

    #[test]
    fn call_escape_keeps_literals_and_bracketed_parens() {
        let (sql, count) = translate_call_escape("{ CALL [dbo].[odd(name)](?, '?', 3) }").unwrap();
        assert_eq!(sql, "EXEC [dbo].[odd(name)] @P1, '?', 3");
        assert_eq!(count, 1);
    }

    #[test]
    fn rejects_non_escape() {
        for sql in ["EXEC x", "{exec x}", "{call}", "{callx}", "{call x(?}"] {
            assert!(
                matches!(
                    translate_call_escape(sql),
                    Err(ProcedureError::ParameterError(_))
                ),
                "{sql}"
            );
        }
    }
}
