use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use futures_util::TryStreamExt;
use tiberius::numeric::Numeric;
use tiberius::{QueryItem, QueryStream, Row, Uuid};

use crate::results::ResultSet;
use crate::types::RowValues;

/// Drain `stream` into one `ResultSet` per result set the server sent.
///
/// # Errors
/// Returns the driver error raised while reading the stream.
pub async fn collect_result_sets(
    mut stream: QueryStream<'_>,
) -> Result<Vec<ResultSet>, tiberius::error::Error> {
    let mut result_sets: Vec<ResultSet> = Vec::new();

    while let Some(item) = stream.try_next().await? {
        match item {
            QueryItem::Metadata(meta) => {
                let column_names: Vec<String> =
                    meta.columns().iter().map(|col| col.name().to_string()).collect();
                let mut result_set = ResultSet::with_capacity(10);
                result_set.set_column_names(Arc::new(column_names));
                result_sets.push(result_set);
            }
            QueryItem::Row(row) => {
                if let Some(result_set) = result_sets.last_mut() {
                    result_set.add_row_values(extract_row(&row));
                }
            }
        }
    }

    Ok(result_sets)
}

fn extract_row(row: &Row) -> Vec<RowValues> {
    (0..row.len())
        .map(|i| extract_value(row, i).unwrap_or(RowValues::Null))
        .collect()
}

/// Extract a value from a row at a specific index
///
/// `None` means SQL NULL or a column type with no `RowValues` counterpart.
fn extract_value(row: &Row, idx: usize) -> Option<RowValues> {
    // tiberius only converts a column to its exact Rust counterpart, so try
    // each candidate type in turn.
    if let Ok(Some(val)) = row.try_get::<i32, _>(idx) {
        return Some(RowValues::Int(i64::from(val)));
    }
    if let Ok(Some(val)) = row.try_get::<i64, _>(idx) {
        return Some(RowValues::Int(val));
    }
    if let Ok(Some(val)) = row.try_get::<i16, _>(idx) {
        return Some(RowValues::Int(i64::from(val)));
    }
    if let Ok(Some(val)) = row.try_get::<u8, _>(idx) {
        return Some(RowValues::Int(i64::from(val)));
    }

    if let Ok(Some(val)) = row.try_get::<f32, _>(idx) {
        return Some(RowValues::Float(f64::from(val)));
    }
    if let Ok(Some(val)) = row.try_get::<f64, _>(idx) {
        return Some(RowValues::Float(val));
    }
    if let Ok(Some(val)) = row.try_get::<Numeric, _>(idx) {
        return Some(RowValues::Float(f64::from(val)));
    }

    if let Ok(Some(val)) = row.try_get::<bool, _>(idx) {
        return Some(RowValues::Bool(val));
    }

    if let Ok(Some(val)) = row.try_get::<DateTime<FixedOffset>, _>(idx) {
        return Some(offset_text(val));
    }
    if let Ok(Some(val)) = row.try_get::<NaiveDateTime, _>(idx) {
        return Some(RowValues::Timestamp(val));
    }
    if let Ok(Some(val)) = row.try_get::<NaiveDate, _>(idx) {
        return Some(date_text(val));
    }
    if let Ok(Some(val)) = row.try_get::<NaiveTime, _>(idx) {
        return Some(time_text(val));
    }

    if let Ok(Some(val)) = row.try_get::<Uuid, _>(idx) {
        return Some(guid_text(val));
    }

    if let Ok(Some(val)) = row.try_get::<&str, _>(idx) {
        return Some(RowValues::Text(val.to_string()));
    }

    if let Ok(Some(val)) = row.try_get::<&[u8], _>(idx) {
        return Some(RowValues::Blob(val.to_vec()));
    }

    None
}

// Column types with no `RowValues` variant of their own come back as the
// text SQL Server renders for them.

fn guid_text(val: Uuid) -> RowValues {
    RowValues::Text(val.to_string().to_uppercase())
}

fn date_text(val: NaiveDate) -> RowValues {
    RowValues::Text(val.format("%Y-%m-%d").to_string())
}

fn time_text(val: NaiveTime) -> RowValues {
    RowValues::Text(val.format("%H:%M:%S%.f").to_string())
}

fn offset_text(val: DateTime<FixedOffset>) -> RowValues {
    RowValues::Text(val.format("%Y-%m-%d %H:%M:%S%.f %:z").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guid_renders_upper_case_hyphenated() {
        let guid = Uuid::from_u128(0x6F96_19FF_8B86_D011_B42D_00C0_4FC9_64FF);
        assert_eq!(
            guid_text(guid),
            RowValues::Text("6F9619FF-8B86-D011-B42D-00C04FC964FF".into())
        );
    }

    #[test]
    fn date_and_time_render_as_text() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(date_text(date), RowValues::Text("2024-02-29".into()));

        let time = NaiveTime::from_hms_milli_opt(13, 5, 9, 250).unwrap();
        assert_eq!(time_text(time), RowValues::Text("13:05:09.250".into()));

        let whole = NaiveTime::from_hms_opt(8, 0, 0).unwrap();
        assert_eq!(time_text(whole), RowValues::Text("08:00:00".into()));
    }

    #[test]
    fn offset_keeps_its_zone() {
        let val = DateTime::parse_from_rfc3339("2024-05-01T10:30:00+02:00").unwrap();
        assert_eq!(
            offset_text(val),
            RowValues::Text("2024-05-01 10:30:00 +02:00".into())
        );
    }
}
