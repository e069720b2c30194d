//! Transaction-rollup CSV ingestion.
//!
//! Data loaders often have monthly income rollups as CSV exports rather
//! than embedded history arrays; this module parses them into
//! `IncomeHistoryPoint`s and splices them into a raw document before
//! scoring.

use crate::domain::IncomeHistoryPoint;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use std::fs::File;
use std::io::Read;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum RollupImportError {
    #[error("failed to open rollup file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse rollup CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("rollup row {row} has an unparseable month '{value}'")]
    Month { row: usize, value: String },
}

#[derive(Debug, Deserialize)]
struct RollupRow {
    #[serde(alias = "date", alias = "period")]
    month: String,
    #[serde(alias = "income", alias = "value", alias = "total")]
    amount: f64,
}

pub fn history_from_path(
    path: impl AsRef<Path>,
) -> Result<Vec<IncomeHistoryPoint>, RollupImportError> {
    let file = File::open(path)?;
    history_from_reader(file)
}

pub fn history_from_reader<R: Read>(
    reader: R,
) -> Result<Vec<IncomeHistoryPoint>, RollupImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut history = Vec::new();
    for (index, record) in csv_reader.deserialize::<RollupRow>().enumerate() {
        let row = record?;
        let month = parse_month(&row.month).ok_or_else(|| RollupImportError::Month {
            row: index + 1,
            value: row.month.clone(),
        })?;
        history.push(IncomeHistoryPoint {
            month,
            amount: row.amount.max(0.0),
        });
    }
    Ok(history)
}

/// Return a copy of the raw document with its income history replaced by
/// the imported rollup. The original document is left untouched.
pub fn splice_history(raw: &Value, history: &[IncomeHistoryPoint]) -> Value {
    let points: Vec<Value> = history
        .iter()
        .map(|point| {
            json!({
                "month": point.month.format("%Y-%m-%d").to_string(),
                "amount": point.amount,
            })
        })
        .collect();

    let mut doc = match raw {
        Value::Object(map) => map.clone(),
        _ => serde_json::Map::new(),
    };
    doc.insert("incomeHistory".to_string(), Value::Array(points));
    Value::Object(doc)
}

fn parse_month(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }
    NaiveDate::parse_from_str(&format!("{trimmed}-01"), "%Y-%m-%d").ok()
}
