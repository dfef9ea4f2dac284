use std::collections::HashMap;
use std::sync::Arc;

use super::row::{CustomDbRow, index_columns};
use crate::types::RowValues;

/// A result set from a procedure call
///
/// Holds the rows of one result set together with the column names they share.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    /// The rows returned by the procedure
    pub results: Vec<CustomDbRow>,
    /// Column names shared by all rows (to avoid duplicating in each row)
    column_names: Option<Arc<Vec<String>>>,
    column_index_cache: Option<Arc<HashMap<String, usize>>>,
}

impl ResultSet {
    /// Create a new result set with a known capacity
    #[must_use]
    pub fn with_capacity(capacity: usize) -> ResultSet {
        ResultSet {
            results: Vec::with_capacity(capacity),
            column_names: None,
            column_index_cache: None,
        }
    }

    /// Set the column names for this result set (to be shared by all rows)
    pub fn set_column_names(&mut self, column_names: Arc<Vec<String>>) {
        self.column_index_cache = Some(index_columns(&column_names));
        self.column_names = Some(column_names);
    }

    /// Get the column names for this result set
    #[must_use]
    pub fn get_column_names(&self) -> Option<&Arc<Vec<String>>> {
        self.column_names.as_ref()
    }

    /// Add a row to the result set
    ///
    /// Rows added before any column names are set are dropped.
    pub fn add_row_values(&mut self, row_values: Vec<RowValues>) {
        if let (Some(column_names), Some(cache)) = (&self.column_names, &self.column_index_cache)
        {
            self.results.push(CustomDbRow {
                column_names: column_names.clone(),
                rows: row_values,
                column_index_cache: cache.clone(),
            });
        }
    }

    /// Add a fully built row
    pub fn add_row(&mut self, row: CustomDbRow) {
        if self.column_names.is_none() {
            self.column_names = Some(row.column_names.clone());
            self.column_index_cache = Some(row.column_index_cache.clone());
        }
        self.results.push(row);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Lower-case every column name, in place.
    ///
    /// Names that collide once lower-cased (`Id`, `ID`) resolve to the last
    /// such column.
    pub fn lowercase_columns(&mut self) {
        let Some(names) = &self.column_names else {
            return;
        };
        let lowered: Arc<Vec<String>> = Arc::new(names.iter().map(|n| n.to_lowercase()).collect());
        let cache = index_columns(&lowered);
        for row in &mut self.results {
            row.column_names = lowered.clone();
            row.column_index_cache = cache.clone();
        }
        self.column_names = Some(lowered);
        self.column_index_cache = Some(cache);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_share_column_names() {
        let mut rs = ResultSet::with_capacity(2);
        rs.set_column_names(Arc::new(vec!["UserId".into()]));
        rs.add_row_values(vec![RowValues::Int(1)]);
        rs.add_row_values(vec![RowValues::Int(2)]);
        assert_eq!(rs.len(), 2);
        assert!(Arc::ptr_eq(
            &rs.results[0].column_names,
            &rs.results[1].column_names
        ));
    }

    #[test]
    fn rows_without_columns_are_dropped() {
        let mut rs = ResultSet::default();
        rs.add_row_values(vec![RowValues::Int(1)]);
        assert!(rs.is_empty());
    }

    #[test]
    fn lowercase_columns_rewrites_lookup() {
        let mut rs = ResultSet::default();
        rs.set_column_names(Arc::new(vec!["UserId".into(), "UserName".into()]));
        rs.add_row_values(vec![RowValues::Int(1), RowValues::Text("a".into())]);
        rs.lowercase_columns();
        let row = &rs.results[0];
        assert_eq!(row.get("userid"), Some(&RowValues::Int(1)));
        assert_eq!(row.get("UserId"), None);
        assert_eq!(
            rs.get_column_names().map(|c| c.as_slice()),
            Some(&["userid".to_string(), "username".to_string()][..])
        );
    }

    #[test]
    fn colliding_lowercase_columns_keep_the_last() {
        let mut rs = ResultSet::default();
        rs.set_column_names(Arc::new(vec!["Id".into(), "ID".into()]));
        rs.add_row_values(vec![RowValues::Int(1), RowValues::Int(2)]);
        rs.lowercase_columns();
        let row = &rs.results[0];
        assert_eq!(row.get("id"), Some(&RowValues::Int(2)));
        assert_eq!(row.to_json(), serde_json::json!({ "id": 2 }));
    }
}
