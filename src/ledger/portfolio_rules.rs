use rust_decimal::Decimal;

use crate::structs::{Transaction, TransactionType};

use super::UnitOfWork;

/* Apply one transaction's portfolio legs to the unit of work.

Every branch is plain signed arithmetic on the staged copies, with
`dir = kind.direction(cancel)`. Cancelling replays the same formulas with the
sign flipped, so delete and update restore positions exactly. Legs whose owner
id is absent are skipped; the validator has already enforced the per-type
requirements. */
pub fn apply(tx: &Transaction, cancel: bool, uow: &mut UnitOfWork) {
    let dir = tx.kind.direction(cancel);
    let q = tx.quantity;
    let q2 = tx.quantity2.unwrap_or_default();
    let px = tx.price_usd.unwrap_or_default();

    match tx.kind {
        TransactionType::Buy | TransactionType::Sell => {
            let Some(portfolio_id) = tx.portfolio_id else {
                return;
            };

            if tx.order {
                let mut primary = uow.portfolio_position(portfolio_id, &tx.instrument_id);
                match tx.kind {
                    TransactionType::Buy => {
                        primary.buy_orders += q * px * dir;
                        uow.stage_portfolio(primary);
                        if let Some(instrument2) = &tx.instrument2_id {
                            let mut secondary = uow.portfolio_position(portfolio_id, instrument2);
                            secondary.sell_orders -= q2 * dir;
                            uow.stage_portfolio(secondary);
                        }
                    }
                    _ => {
                        primary.sell_orders -= q * dir;
                        uow.stage_portfolio(primary);
                    }
                }
            } else {
                let mut primary = uow.portfolio_position(portfolio_id, &tx.instrument_id);
                primary.quantity += q * dir;
                primary.amount += q * px * dir;
                uow.stage_portfolio(primary);

                if let Some(instrument2) = &tx.instrument2_id {
                    let mut secondary = uow.portfolio_position(portfolio_id, instrument2);
                    secondary.quantity -= q2 * dir;
                    secondary.amount += q2 * dir;
                    uow.stage_portfolio(secondary);
                }
            }
        }
        TransactionType::Earning | TransactionType::Input | TransactionType::Output => {
            if let Some(portfolio_id) = tx.portfolio_id {
                let mut primary = uow.portfolio_position(portfolio_id, &tx.instrument_id);
                primary.quantity += q * dir;
                uow.stage_portfolio(primary);
            }
        }
        TransactionType::TransferIn | TransactionType::TransferOut => {
            let (Some(source_id), Some(destination_id)) = (tx.portfolio_id, tx.portfolio2_id)
            else {
                return;
            };

            let mut source = uow.portfolio_position(source_id, &tx.instrument_id);

            /* The moved cost basis is proportional to the source's pre-mutation
            state; an empty source or a zero quantity moves nothing. */
            let moved = if source.quantity.is_zero() || q.is_zero() {
                Decimal::ZERO
            } else {
                source.amount / source.quantity * q * dir
            };

            source.quantity += q * dir;
            source.amount += moved;
            uow.stage_portfolio(source);

            let mut destination = uow.portfolio_position(destination_id, &tx.instrument_id);
            destination.quantity -= q * dir;
            destination.amount -= moved;
            uow.stage_portfolio(destination);
        }
    }
}
