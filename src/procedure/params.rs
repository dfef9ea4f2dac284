use crate::types::RowValues;

/// Insertion-ordered parameter map for a procedure call.
///
/// Call mode binds values positionally in this order, so it must match the
/// order of the procedure's declared parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcedureParams {
    entries: Vec<(String, RowValues)>,
}

impl ProcedureParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<RowValues>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace `key`. A replaced key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<RowValues>) {
        let key = key.into();
        let value = value.into();
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&RowValues> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RowValues)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Values in insertion order, names dropped.
    #[must_use]
    pub fn positional_values(&self) -> Vec<RowValues> {
        self.entries.iter().map(|(_, v)| v.clone()).collect()
    }
}

impl<K, V> FromIterator<(K, V)> for ProcedureParams
where
    K: Into<String>,
    V: Into<RowValues>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = ProcedureParams::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

impl<K, V> From<Vec<(K, V)>> for ProcedureParams
where
    K: Into<String>,
    V: Into<RowValues>,
{
    fn from(entries: Vec<(K, V)>) -> Self {
        entries.into_iter().collect()
    }
}

/// One named binding: `@Key`, `:key`, value.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyBinding {
    /// Procedure parameter, `@` followed by the key as given.
    pub parameter: String,
    /// Query placeholder, `:` followed by the lower-cased key.
    pub placeholder: String,
    pub value: RowValues,
}
