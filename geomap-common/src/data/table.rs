use crate::data::value::ValueHelpers;
use crate::error::{GeoMapError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub type Row = Map<String, Value>;

/// Row-oriented result set, in the order the host delivered it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowTable {
    rows: Vec<Row>,
}

impl RowTable {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn from_json(value: &Value) -> Result<Self> {
        if let Value::Array(values) = value {
            let rows = values
                .iter()
                .enumerate()
                .map(|(i, value)| match value {
                    Value::Object(row) => Ok(row.clone()),
                    _ => Err(GeoMapError::configuration(format!(
                        "Expected row {i} to be a JSON object, not: {value}"
                    ))),
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(Self { rows })
        } else {
            Err(GeoMapError::configuration(format!(
                "Expected JSON array, not: {value}"
            )))
        }
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }

    /// Values of a metric column, with missing and non-numeric cells counted as zero
    pub fn metric_values(&self, column: &str) -> Vec<f64> {
        self.rows
            .iter()
            .map(|row| row.get(column).to_f64_or_zero())
            .collect()
    }

    /// First row whose `column` cell equals `value`
    pub fn find_row(&self, column: &str, value: &Value) -> Option<&Row> {
        self.rows.iter().find(|row| row.get(column) == Some(value))
    }
}

impl From<Vec<Row>> for RowTable {
    fn from(rows: Vec<Row>) -> Self {
        Self::new(rows)
    }
}
