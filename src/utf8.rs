//! UTF-8 normalization of fetched values.
//!
//! Legacy SQL Server databases often hold single-byte (ISO-8859-1) text. Any
//! byte sequence that is not already valid UTF-8 is re-encoded byte-for-byte
//! from Latin-1, so the result is always valid UTF-8 and valid input passes
//! through untouched.

use std::borrow::Cow;

use crate::results::{CustomDbRow, ResultSet};
use crate::types::RowValues;

/// Decode `bytes` as UTF-8, falling back to ISO-8859-1 when they are not valid UTF-8.
///
/// ```rust
/// use stored_procedure_factory::utf8::encode_utf8;
///
/// assert_eq!(encode_utf8(b"Caf\xe9"), "Café");
/// assert_eq!(encode_utf8("Café".as_bytes()), "Café");
/// ```
#[must_use]
pub fn encode_utf8(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => Cow::Owned(bytes.iter().map(|&b| char::from(b)).collect()),
    }
}

/// Values that can be walked and re-encoded to UTF-8 in place.
pub trait Utf8Normalize {
    fn normalize_utf8(&mut self);
}

impl Utf8Normalize for RowValues {
    fn normalize_utf8(&mut self) {
        if let RowValues::RawText(bytes) = self {
            let text = encode_utf8(bytes).into_owned();
            *self = RowValues::Text(text);
        }
    }
}

impl<T: Utf8Normalize> Utf8Normalize for Vec<T> {
    fn normalize_utf8(&mut self) {
        for item in self.iter_mut() {
            item.normalize_utf8();
        }
    }
}

impl<T: Utf8Normalize> Utf8Normalize for Option<T> {
    fn normalize_utf8(&mut self) {
        if let Some(inner) = self {
            inner.normalize_utf8();
        }
    }
}

impl Utf8Normalize for CustomDbRow {
    fn normalize_utf8(&mut self) {
        self.rows.normalize_utf8();
    }
}

impl Utf8Normalize for ResultSet {
    fn normalize_utf8(&mut self) {
        self.results.normalize_utf8();
    }
}
