use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::structs::{Distribution, DistributionEntry, Domain, InstrumentId, OwnerId};

/* One owner's holding of the instrument, as gathered by the service */
#[derive(Debug, Clone)]
pub struct DistributionRow {
    pub owner_id: OwnerId,
    pub owner_name: String,
    pub quantity: Decimal,
    pub amount: Option<Decimal>,
}

/* Aggregate one instrument's rows across a user's owners. Percentages are
quantity / total * 100 rounded to two decimals; a zero total yields zero
percentages rather than an error. */
pub fn distribute(
    instrument_id: InstrumentId,
    domain: Domain,
    mut rows: Vec<DistributionRow>,
) -> Distribution {
    rows.sort_by_key(|row| row.owner_id);

    let total_quantity: Decimal = rows.iter().map(|row| row.quantity).sum();
    let total_amount = match domain {
        Domain::Portfolio => Some(rows.iter().filter_map(|row| row.amount).sum()),
        Domain::Wallet => None,
    };

    let entries = rows
        .into_iter()
        .map(|row| {
            let percentage = if total_quantity.is_zero() {
                Decimal::ZERO
            } else {
                (row.quantity / total_quantity * dec!(100)).round_dp(2)
            };
            DistributionEntry {
                owner_id: row.owner_id,
                owner_name: row.owner_name,
                quantity: row.quantity,
                amount: row.amount,
                percentage,
            }
        })
        .collect();

    Distribution {
        instrument_id,
        domain,
        total_quantity,
        total_amount,
        entries,
    }
}
