use std::collections::HashSet;

use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

use crate::{
    common::{clock::Clock, error::LedgerError},
    domain::transaction::Transaction,
};

/// Wire form of a single transaction in the export payload.
#[derive(Debug, Serialize, Deserialize)]
struct TransactionRow {
    id: u32,
    #[serde(rename = "type")]
    kind: String,
    amount: f64,
    category: String,
    description: String,
    date: String,
}

impl From<&Transaction> for TransactionRow {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: tx.id(),
            kind: tx.kind().to_string(),
            amount: tx.amount().to_f64(),
            category: tx.category().to_string(),
            description: tx.description().to_string(),
            date: tx.date().to_rfc3339_opts(SecondsFormat::AutoSi, true),
        }
    }
}

/// Encodes records as a pretty-printed JSON array, preserving order.
pub fn encode(records: &[Transaction]) -> Result<String, LedgerError> {
    let rows: Vec<TransactionRow> = records.iter().map(TransactionRow::from).collect();
    serde_json::to_string_pretty(&rows).map_err(|e| LedgerError::Export(e.to_string()))
}

/// Decodes and re-validates a JSON array of records.
///
/// Fails if the text is not JSON, is not an array, or if any entry is
/// malformed, has an invalid type or amount, an id of 0 or `u32::MAX`, or
/// repeats an id.
/// Entry errors name the zero-based index of the offending entry.
pub fn decode(text: &str, clock: &dyn Clock) -> Result<Vec<Transaction>, LedgerError> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| LedgerError::Import(format!("invalid json: {e}")))?;
    let serde_json::Value::Array(entries) = value else {
        return Err(LedgerError::Import("expected a json array of transactions".into()));
    };

    let mut seen = HashSet::with_capacity(entries.len());
    let mut records = Vec::with_capacity(entries.len());
    for (idx, entry) in entries.into_iter().enumerate() {
        let row: TransactionRow = serde_json::from_value(entry)
            .map_err(|e| LedgerError::Import(format!("entry {idx}: {e}")))?;

        if row.id == 0 {
            return Err(LedgerError::Import(format!("entry {idx}: id must be positive")));
        }
        if row.id == u32::MAX {
            return Err(LedgerError::Import(format!(
                "entry {idx}: id {} leaves no room for new ids",
                row.id
            )));
        }
        if !seen.insert(row.id) {
            return Err(LedgerError::Import(format!("entry {idx}: duplicate id {}", row.id)));
        }

        let tx = Transaction::new(
            row.id,
            &row.kind,
            row.amount,
            row.category,
            row.description,
            Some(row.date.as_str()),
            clock,
        )
        .map_err(|e| LedgerError::Import(format!("entry {idx}: {e}")))?;
        records.push(tx);
    }
    Ok(records)
}
