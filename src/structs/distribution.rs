use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{InstrumentId, OwnerId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Domain {
    Portfolio,
    Wallet,
}

/* Per-owner share of one instrument across everything a user owns in one
domain. Amounts are only present for the portfolio domain. */
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionEntry {
    pub owner_id: OwnerId,
    pub owner_name: String,
    pub quantity: Decimal,
    pub amount: Option<Decimal>,
    pub percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    pub instrument_id: InstrumentId,
    pub domain: Domain,
    pub total_quantity: Decimal,
    pub total_amount: Option<Decimal>,
    pub entries: Vec<DistributionEntry>,
}
