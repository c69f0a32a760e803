use chrono::{DateTime, Utc};
use csv::ReaderBuilder;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::errors::ImportError;
use crate::structs::{OwnerId, TransactionDraft, TransactionType};

/* One CSV line. Kept separate from the draft so empty cells land as None
instead of failing the whole import. */
#[derive(Debug, Deserialize)]
struct DraftRow {
    date: DateTime<Utc>,
    #[serde(rename = "type")]
    kind: TransactionType,
    instrument_id: String,
    instrument2_id: Option<String>,
    quantity: Decimal,
    quantity2: Option<Decimal>,
    price: Option<Decimal>,
    price_usd: Option<Decimal>,
    order: Option<bool>,
    portfolio_id: Option<OwnerId>,
    portfolio2_id: Option<OwnerId>,
    wallet_id: Option<OwnerId>,
    wallet2_id: Option<OwnerId>,
    comment: Option<String>,
}

impl From<DraftRow> for TransactionDraft {
    fn from(row: DraftRow) -> Self {
        TransactionDraft {
            date: row.date,
            kind: row.kind,
            instrument_id: row.instrument_id,
            instrument2_id: row.instrument2_id,
            quantity: row.quantity,
            quantity2: row.quantity2,
            price: row.price,
            price_usd: row.price_usd,
            order: row.order.unwrap_or(false),
            portfolio_id: row.portfolio_id,
            portfolio2_id: row.portfolio2_id,
            wallet_id: row.wallet_id,
            wallet2_id: row.wallet2_id,
            comment: row.comment,
        }
    }
}

/* Read transaction drafts from a headed CSV file. A malformed row aborts the
import with its line number; nothing is handed to the ledger. */
pub fn import_drafts(path: &str) -> Result<Vec<TransactionDraft>, ImportError> {
    let mut reader = ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| ImportError::Read(e.to_string()))?;

    let mut drafts = Vec::new();
    for (index, row) in reader.deserialize::<DraftRow>().enumerate() {
        // Line 1 is the header
        let line = index as u64 + 2;
        let row = row.map_err(|e| ImportError::Row {
            line,
            error: e.to_string(),
        })?;
        drafts.push(row.into());
    }
    Ok(drafts)
}
