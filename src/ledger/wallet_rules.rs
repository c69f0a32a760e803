use crate::structs::{Transaction, TransactionType};

use super::UnitOfWork;

/* Apply one transaction's wallet legs to the unit of work.

Same shape as the portfolio rules minus the cost basis: the wallet ledger
tracks quantities and pending order totals only. */
pub fn apply(tx: &Transaction, cancel: bool, uow: &mut UnitOfWork) {
    let dir = tx.kind.direction(cancel);
    let q = tx.quantity;
    let q2 = tx.quantity2.unwrap_or_default();
    let px = tx.price_usd.unwrap_or_default();

    match tx.kind {
        TransactionType::Buy | TransactionType::Sell => {
            let Some(wallet_id) = tx.wallet_id else {
                return;
            };

            if tx.order {
                let mut primary = uow.wallet_position(wallet_id, &tx.instrument_id);
                match tx.kind {
                    TransactionType::Buy => {
                        primary.buy_orders += q * px * dir;
                        uow.stage_wallet(primary);
                        if let Some(instrument2) = &tx.instrument2_id {
                            let mut secondary = uow.wallet_position(wallet_id, instrument2);
                            secondary.sell_orders -= q2 * dir;
                            uow.stage_wallet(secondary);
                        }
                    }
                    _ => {
                        primary.sell_orders -= q * dir;
                        uow.stage_wallet(primary);
                    }
                }
            } else {
                let mut primary = uow.wallet_position(wallet_id, &tx.instrument_id);
                primary.quantity += q * dir;
                uow.stage_wallet(primary);

                if let Some(instrument2) = &tx.instrument2_id {
                    let mut secondary = uow.wallet_position(wallet_id, instrument2);
                    secondary.quantity -= q2 * dir;
                    uow.stage_wallet(secondary);
                }
            }
        }
        TransactionType::Earning | TransactionType::Input | TransactionType::Output => {
            if let Some(wallet_id) = tx.wallet_id {
                let mut primary = uow.wallet_position(wallet_id, &tx.instrument_id);
                primary.quantity += q * dir;
                uow.stage_wallet(primary);
            }
        }
        TransactionType::TransferIn | TransactionType::TransferOut => {
            let (Some(source_id), Some(destination_id)) = (tx.wallet_id, tx.wallet2_id) else {
                return;
            };

            let mut source = uow.wallet_position(source_id, &tx.instrument_id);
            source.quantity += q * dir;
            uow.stage_wallet(source);

            let mut destination = uow.wallet_position(destination_id, &tx.instrument_id);
            destination.quantity -= q * dir;
            uow.stage_wallet(destination);
        }
    }
}
