use std::collections::BTreeSet;

use crate::structs::{OwnerId, PositionKey, Transaction};

/* Which (owner, instrument) pairs a batch of transactions touches, per
domain: the Cartesian product of the owner ids present on each transaction
with the instrument ids present on it, unioned across the batch. The result
is sorted and deduplicated so reports and tests are reproducible. */
pub fn affected_portfolio_positions(txs: &[&Transaction]) -> Vec<PositionKey> {
    affected(txs, |tx| [tx.portfolio_id, tx.portfolio2_id])
}

pub fn affected_wallet_positions(txs: &[&Transaction]) -> Vec<PositionKey> {
    affected(txs, |tx| [tx.wallet_id, tx.wallet2_id])
}

fn affected(
    txs: &[&Transaction],
    owners: impl Fn(&Transaction) -> [Option<OwnerId>; 2],
) -> Vec<PositionKey> {
    let mut keys: BTreeSet<PositionKey> = BTreeSet::new();
    for tx in txs {
        for owner in owners(tx).into_iter().flatten() {
            keys.insert((owner, tx.instrument_id.clone()));
            if let Some(instrument2) = &tx.instrument2_id {
                keys.insert((owner, instrument2.clone()));
            }
        }
    }
    keys.into_iter().collect()
}
