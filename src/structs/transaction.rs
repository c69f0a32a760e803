use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{InstrumentId, OwnerId};

pub type TransactionId = Uuid;

/* The closed set of transaction types the ledger understands. The serialized
form is the exact case-sensitive variant name; anything else is rejected at
deserialization, so every mutator can match exhaustively.

Buy/Sell move a primary instrument against a quote instrument in one portfolio
and one wallet. Earning credits an instrument in both ledgers. TransferIn/
TransferOut move an instrument between two owners of one domain. Input/Output
deposit into or withdraw from a single owner. */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    Buy,
    Sell,
    Earning,
    TransferIn,
    TransferOut,
    Input,
    Output,
}

impl TransactionType {
    /* The +1/-1 sign applied to the transaction's quantities. Cancelling a
    transaction negates the sign, which makes reversal an arithmetic inverse. */
    pub fn direction(self, cancel: bool) -> Decimal {
        let base = match self {
            TransactionType::Buy
            | TransactionType::Input
            | TransactionType::TransferIn
            | TransactionType::Earning => dec!(1),
            TransactionType::Sell | TransactionType::Output | TransactionType::TransferOut => {
                dec!(-1)
            }
        };
        if cancel {
            -base
        } else {
            base
        }
    }

    pub fn is_transfer(self) -> bool {
        matches!(self, TransactionType::TransferIn | TransactionType::TransferOut)
    }
}

/* One ledger row. Owner ids are optional because not every type touches both
domains; the validator enforces the per-type requirements before any mutation.
`order` marks a pending order: it only moves the pending totals until it is
executed. `related_transaction_id` links the two halves of a transfer that has
to show up in both the portfolio ledger and the wallet ledger. */
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub instrument_id: InstrumentId,
    pub instrument2_id: Option<InstrumentId>,
    pub quantity: Decimal,
    pub quantity2: Option<Decimal>,
    pub price: Option<Decimal>,
    pub price_usd: Option<Decimal>,
    pub order: bool,
    pub portfolio_id: Option<OwnerId>,
    pub portfolio2_id: Option<OwnerId>,
    pub wallet_id: Option<OwnerId>,
    pub wallet2_id: Option<OwnerId>,
    pub related_transaction_id: Option<TransactionId>,
    pub comment: Option<String>,
}

/* What the caller hands in: a transaction without identity. The service
assigns the id and, for transfers spanning both domains, splits the draft into
two linked one-domain transactions. */
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionDraft {
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub instrument_id: InstrumentId,
    pub instrument2_id: Option<InstrumentId>,
    pub quantity: Decimal,
    pub quantity2: Option<Decimal>,
    pub price: Option<Decimal>,
    pub price_usd: Option<Decimal>,
    #[serde(default)]
    pub order: bool,
    pub portfolio_id: Option<OwnerId>,
    pub portfolio2_id: Option<OwnerId>,
    pub wallet_id: Option<OwnerId>,
    pub wallet2_id: Option<OwnerId>,
    pub comment: Option<String>,
}

impl Transaction {
    pub fn from_draft(id: TransactionId, draft: TransactionDraft) -> Self {
        Transaction {
            id,
            date: draft.date,
            kind: draft.kind,
            instrument_id: draft.instrument_id,
            instrument2_id: draft.instrument2_id,
            quantity: draft.quantity,
            quantity2: draft.quantity2,
            price: draft.price,
            price_usd: draft.price_usd,
            order: draft.order,
            portfolio_id: draft.portfolio_id,
            portfolio2_id: draft.portfolio2_id,
            wallet_id: draft.wallet_id,
            wallet2_id: draft.wallet2_id,
            related_transaction_id: None,
            comment: draft.comment,
        }
    }

    pub fn has_portfolio_pair(&self) -> bool {
        self.portfolio_id.is_some() && self.portfolio2_id.is_some()
    }

    pub fn has_wallet_pair(&self) -> bool {
        self.wallet_id.is_some() && self.wallet2_id.is_some()
    }
}
