use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::error::AppResult;
use crate::models::TransactionLine;

#[derive(Debug, Deserialize)]
struct TransactionLog {
    lines: Vec<Value>,
}

/// Reads the transaction log and returns its well-formed purchase lines.
///
/// The document must be a JSON object with a `lines` array. Individual lines
/// missing required fields are skipped with a warning; the recommendation
/// engine only ever sees well-formed records.
pub fn load_transaction_lines(path: &Path) -> AppResult<Vec<TransactionLine>> {
    let raw = std::fs::read_to_string(path)?;
    let log: TransactionLog = serde_json::from_str(&raw)?;

    let total = log.lines.len();
    let mut lines = Vec::with_capacity(total);
    for (position, value) in log.lines.into_iter().enumerate() {
        match serde_json::from_value::<TransactionLine>(value) {
            Ok(line) => lines.push(line),
            Err(error) => {
                tracing::warn!(position, %error, "skipping malformed transaction line");
            }
        }
    }

    tracing::info!(
        path = %path.display(),
        loaded = lines.len(),
        skipped = total - lines.len(),
        "transaction log loaded"
    );

    Ok(lines)
}
