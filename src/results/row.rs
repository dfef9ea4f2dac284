use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value as JsonValue};

use crate::types::RowValues;

/// A row from a procedure result
///
/// This struct represents a single row from a result set,
/// with access to both the column names and the values.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomDbRow {
    /// The column names for this row (shared across all rows in a result set)
    pub column_names: Arc<Vec<String>>,
    /// The values for this row
    pub rows: Vec<RowValues>,
    #[doc(hidden)]
    pub(crate) column_index_cache: Arc<HashMap<String, usize>>,
}

pub(crate) fn index_columns(column_names: &[String]) -> Arc<HashMap<String, usize>> {
    let mut index = HashMap::with_capacity(column_names.len());
    for (i, name) in column_names.iter().enumerate() {
        // Later duplicates win, as they do in `to_json`.
        index.insert(name.clone(), i);
    }
    Arc::new(index)
}

impl CustomDbRow {
    /// Create a new row
    ///
    /// # Arguments
    ///
    /// * `column_names` - The column names
    /// * `rows` - The values for this row
    #[must_use]
    pub fn new(column_names: Arc<Vec<String>>, rows: Vec<RowValues>) -> Self {
        let column_index_cache = index_columns(&column_names);
        Self {
            column_names,
            rows,
            column_index_cache,
        }
    }

    /// Get the index of a column by name
    #[must_use]
    pub fn get_column_index(&self, column_name: &str) -> Option<usize> {
        self.column_index_cache.get(column_name).copied()
    }

    /// Get a value from the row by column name
    #[must_use]
    pub fn get(&self, column_name: &str) -> Option<&RowValues> {
        self.get_column_index(column_name)
            .and_then(|idx| self.rows.get(idx))
    }

    /// Get a value from the row by column index
    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&RowValues> {
        self.rows.get(index)
    }

    /// Iterate `(column, value)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RowValues)> {
        self.column_names
            .iter()
            .map(String::as_str)
            .zip(self.rows.iter())
    }

    /// Render the row as a JSON object keyed by column name.
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        let mut map = Map::with_capacity(self.rows.len());
        for (name, value) in self.iter() {
            let value = serde_json::to_value(value).unwrap_or(JsonValue::Null);
            map.insert(name.to_string(), value);
        }
        JsonValue::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> CustomDbRow {
        CustomDbRow::new(
            Arc::new(vec!["id".into(), "name".into()]),
            vec![RowValues::Int(7), RowValues::Text("Ada".into())],
        )
    }

    #[test]
    fn looks_up_by_name_and_index() {
        let row = row();
        assert_eq!(row.get("name"), Some(&RowValues::Text("Ada".into())));
        assert_eq!(row.get_by_index(0), Some(&RowValues::Int(7)));
        assert_eq!(row.get("missing"), None);
    }

    #[test]
    fn renders_json_object() {
        assert_eq!(
            row().to_json(),
            serde_json::json!({ "id": 7, "name": "Ada" })
        );
    }
}
