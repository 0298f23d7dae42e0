//! Case-insensitive substring search over a record sequence.
//!
//! Filtering never reorders: the result is the input's subsequence of
//! matching records.

use std::sync::Arc;

use super::record::ListRecord;

/// Shared closure that extracts the searchable text of a record.
///
/// Returns `None` when the record has no value for the searched field; such
/// records are matched as if the value were the empty string.
pub type FieldSelector<T> = Arc<dyn Fn(&T) -> Option<String> + Send + Sync>;

/// Builds a selector that reads the named field of any [`ListRecord`].
pub fn field_selector<T: ListRecord + 'static>(field: impl Into<String>) -> FieldSelector<T> {
    let field = field.into();
    Arc::new(move |record: &T| record.field(&field).map(|value| value.display_text()))
}

/// Returns the records whose selected field contains `search_text`,
/// ignoring case.
///
/// An empty `search_text` returns every record in its original order.
pub fn filter_records<'a, T, F>(records: &'a [T], search_text: &str, selector: F) -> Vec<&'a T>
where
    F: Fn(&T) -> Option<String>,
{
    if search_text.is_empty() {
        return records.iter().collect();
    }

    let needle = search_text.to_lowercase();
    records
        .iter()
        .filter(|record| matches(selector(*record).as_deref().unwrap_or(""), &needle))
        .collect()
}

/// Tests a haystack against an already-lowercased needle.
fn matches(haystack: &str, lowered_needle: &str) -> bool {
    haystack.to_lowercase().contains(lowered_needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::record::Record;

    fn names() -> Vec<Record> {
        vec![
            Record::new("1").with_field("name", "Alpha"),
            Record::new("2").with_field("name", "Beta"),
            Record::new("3").with_field("name", "Gamma"),
            Record::new("4"),
        ]
    }

    fn ids(records: &[&Record]) -> Vec<String> {
        records.iter().map(|r| r.id.to_string()).collect()
    }

    #[test]
    fn test_empty_search_is_identity() {
        let records = names();
        let filtered = filter_records(&records, "", &*field_selector::<Record>("name"));
        assert_eq!(ids(&filtered), vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn test_substring_match_is_case_insensitive() {
        let records = names();
        let selector = field_selector::<Record>("name");

        let lower = filter_records(&records, "a", selector.as_ref());
        let upper = filter_records(&records, "A", selector.as_ref());

        assert_eq!(ids(&lower), vec!["1", "2", "3"]);
        assert_eq!(ids(&lower), ids(&upper));

        let gam = filter_records(&records, "GAM", selector.as_ref());
        assert_eq!(ids(&gam), vec!["3"]);
    }

    #[test]
    fn test_missing_field_matches_only_empty_search() {
        let records = names();
        let selector = field_selector::<Record>("name");

        let filtered = filter_records(&records, "x", selector.as_ref());
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_numeric_fields_are_searchable_as_text() {
        let records = vec![
            Record::new("1").with_field("phone", 13800138000_i64),
            Record::new("2").with_field("phone", 13912345678_i64),
        ];
        let filtered = filter_records(&records, "0013", &*field_selector::<Record>("phone"));
        assert_eq!(ids(&filtered), vec!["1"]);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let records = names();
        let selector = field_selector::<Record>("name");

        let once: Vec<Record> = filter_records(&records, "et", selector.as_ref())
            .into_iter()
            .cloned()
            .collect();
        let twice = filter_records(&once, "et", selector.as_ref());

        assert_eq!(once.len(), twice.len());
        assert_eq!(ids(&twice), vec!["2"]);
    }
}
