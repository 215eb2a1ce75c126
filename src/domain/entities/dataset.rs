use std::cmp::Ordering;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single cell value as delivered by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(flag) => Some(*flag),
            _ => None,
        }
    }

    fn type_rank(&self) -> u8 {
        match self {
            Value::Null => 3,
            Value::Bool(_) => 0,
            Value::Number(_) => 1,
            Value::Text(_) => 2,
        }
    }

    /// Natural ordering between two non-null values. Mixed types order by
    /// type rank (boolean, number, text).
    pub fn natural_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Number(a), Value::Number(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            _ => self.type_rank().cmp(&other.type_rank()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(flag) => write!(f, "{flag}"),
            Value::Number(number) => write!(f, "{}", format_number(*number)),
            Value::Text(text) => f.write_str(text),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(value as f64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// One record keyed by column name, in the order the backend sent the keys.
pub type Row = IndexMap<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Column {
    pub key: String,
    pub label: String,
}

impl Column {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        let label = column_label(&key);
        Self { key, label }
    }
}

/// `first_name` -> `First Name`. Only the first character of each word is
/// touched.
pub fn column_label(key: &str) -> String {
    key.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub rows: Vec<Row>,
    pub total_count: u64,
}

impl Dataset {
    /// A dataset that holds every row, so the total is the row count.
    pub fn from_rows(rows: Vec<Row>) -> Self {
        let total_count = rows.len() as u64;
        Self { rows, total_count }
    }

    /// A single server page whose overall size is reported separately.
    pub fn page(rows: Vec<Row>, total_count: u64) -> Self {
        Self { rows, total_count }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub fn infer_columns(rows: &[Row]) -> Vec<Column> {
    rows.first()
        .map(|row| row.keys().map(|key| Column::new(key.as_str())).collect())
        .unwrap_or_default()
}

/// Request for one server page. `order` is a field name, prefixed with `-`
/// when descending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    pub page: u32,
    pub page_size: u32,
    pub order: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationStats {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
}

pub const VALID_COLUMN: &str = "Valid";

impl ValidationStats {
    pub fn from_rows(rows: &[Row]) -> Self {
        let total = rows.len();
        let valid = rows
            .iter()
            .filter(|row| row.get(VALID_COLUMN).and_then(Value::as_bool) == Some(true))
            .count();
        Self {
            total,
            valid,
            invalid: total - valid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, Value)]) -> Row {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn columns_follow_first_row_key_order() {
        let rows = vec![
            row(&[
                ("zeta", Value::from(1)),
                ("alpha", Value::from("a")),
                ("Street_Name", Value::Null),
            ]),
            row(&[("other", Value::from(2))]),
        ];

        let keys: Vec<String> = infer_columns(&rows).into_iter().map(|c| c.key).collect();

        assert_eq!(keys, vec!["zeta", "alpha", "Street_Name"]);
    }

    #[test]
    fn empty_rows_have_no_columns() {
        assert!(infer_columns(&[]).is_empty());
        assert!(Dataset::default().is_empty());
    }

    #[test]
    fn labels_capitalize_each_word() {
        assert_eq!(column_label("first_name"), "First Name");
        assert_eq!(column_label("Street_Dir_Suffix"), "Street Dir Suffix");
        assert_eq!(column_label("id"), "Id");
        assert_eq!(column_label("mIxed_case"), "MIxed Case");
    }

    #[test]
    fn integral_numbers_display_without_fraction() {
        assert_eq!(Value::from(1).to_string(), "1");
        assert_eq!(Value::from(2.5).to_string(), "2.5");
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::from(true).to_string(), "true");
    }

    #[test]
    fn rows_deserialize_with_key_order_and_scalars() {
        let rows: Vec<Row> =
            serde_json::from_str(r#"[{"id": 7, "Name": "Ann", "Valid": false, "Note": null}]"#)
                .expect("rows should parse");

        let keys: Vec<&String> = rows[0].keys().collect();
        assert_eq!(keys, vec!["id", "Name", "Valid", "Note"]);
        assert_eq!(rows[0]["id"], Value::Number(7.0));
        assert_eq!(rows[0]["Valid"], Value::Bool(false));
        assert_eq!(rows[0]["Note"], Value::Null);
    }

    #[test]
    fn stats_count_only_boolean_true_as_valid() {
        let rows = vec![
            row(&[("Valid", Value::from(true))]),
            row(&[("Valid", Value::from(false))]),
            row(&[("Valid", Value::Null)]),
            row(&[("Valid", Value::from("true"))]),
            row(&[("Name", Value::from("x"))]),
        ];

        let stats = ValidationStats::from_rows(&rows);

        assert_eq!(
            stats,
            ValidationStats {
                total: 5,
                valid: 1,
                invalid: 4
            }
        );
    }
}
