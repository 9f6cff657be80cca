//! Query envelope utilities
//!
//! SWIS wraps query output as `{"results": [...]}`. These helpers unwrap that
//! envelope and pick rows and columns out of the raw result array.

use serde::Deserialize;
use serde_json::value::RawValue;
use serde_json::{Map, Value};

use crate::error::{ErrorKind, SwisError};

/// A single result row.
///
/// Column order is the order the service emitted them in.
pub type Row = Map<String, Value>;

#[derive(Deserialize)]
struct Envelope<'a> {
    #[serde(borrow, default)]
    results: Option<&'a RawValue>,
}

/// Extract the raw `results` array from a query response.
///
/// A missing or `null` `results` field is an empty result set.
///
/// # Errors
/// An internal error if the response is not a JSON object.
pub fn unwrap_results(body: &[u8]) -> Result<Vec<u8>, SwisError> {
    let envelope: Envelope<'_> = serde_json::from_slice(body).map_err(|e| {
        SwisError::wrap(e, ErrorKind::Internal, "query", "failed to parse query response")
    })?;

    Ok(match envelope.results {
        Some(raw) if raw.get() != "null" => raw.get().as_bytes().to_vec(),
        _ => b"[]".to_vec(),
    })
}

/// Strip the outer array brackets to expose a single row.
///
/// Results shorter than two bytes, and the empty array, become `{}`.
pub fn single_row(results: &[u8]) -> Vec<u8> {
    let trimmed = results.trim_ascii();
    if trimmed.len() < 2 {
        return b"{}".to_vec();
    }

    let inner = trimmed[1..trimmed.len() - 1].trim_ascii();
    if inner.is_empty() {
        b"{}".to_vec()
    } else {
        inner.to_vec()
    }
}

/// Decode a result array into rows.
///
/// # Errors
/// An internal error labelled `operation` if the array does not hold objects.
pub fn decode_rows(results: &[u8], operation: &str) -> Result<Vec<Row>, SwisError> {
    serde_json::from_slice(results)
        .map_err(|e| SwisError::wrap(e, ErrorKind::Internal, operation, "failed to unmarshal result"))
}

/// First column of the first row, if there is one
pub fn first_row_value(rows: Vec<Row>) -> Option<Value> {
    rows.into_iter().next()?.into_iter().next().map(|(_, v)| v)
}

/// First column of every row
pub fn first_column(rows: Vec<Row>) -> Vec<Value> {
    rows.into_iter()
        .filter_map(|row| row.into_iter().next().map(|(_, v)| v))
        .collect()
}

/// The `column` of every row; rows without it give `null`
pub fn named_column(rows: Vec<Row>, column: &str) -> Vec<Value> {
    rows.into_iter()
        .map(|mut row| row.remove(column).unwrap_or(Value::Null))
        .collect()
}
