use crate::errors::LedgerError;
use crate::structs::{Transaction, TransactionType};

/* Per-type required fields, checked before any position is touched.

Quantity and the primary instrument are non-optional in the typed model, so
only the optional fields can actually be missing here. Transfers must target
exactly one domain: a (portfolio, portfolio2) pair or a (wallet, wallet2)
pair, never both. A user action spanning both ledgers is stored as two
linked one-domain transactions. */
pub fn validate(tx: &Transaction) -> Result<(), LedgerError> {
    let mut missing: Vec<&'static str> = Vec::new();

    match tx.kind {
        TransactionType::Buy | TransactionType::Sell => {
            if tx.portfolio_id.is_none() {
                missing.push("portfolio_id");
            }
            if tx.wallet_id.is_none() {
                missing.push("wallet_id");
            }
            if tx.instrument2_id.is_none() {
                missing.push("instrument2_id");
            }
        }
        TransactionType::Earning => {
            if tx.portfolio_id.is_none() {
                missing.push("portfolio_id");
            }
            if tx.wallet_id.is_none() {
                missing.push("wallet_id");
            }
        }
        TransactionType::TransferIn | TransactionType::TransferOut => {
            let portfolio_pair = tx.has_portfolio_pair();
            let wallet_pair = tx.has_wallet_pair();
            if portfolio_pair && wallet_pair {
                return Err(LedgerError::Validation(format!(
                    "{:?} must target exactly one domain: a portfolio pair or a wallet pair",
                    tx.kind
                )));
            }
            if !portfolio_pair && !wallet_pair {
                if tx.portfolio_id.is_some() || tx.portfolio2_id.is_some() {
                    if tx.portfolio_id.is_none() {
                        missing.push("portfolio_id");
                    }
                    if tx.portfolio2_id.is_none() {
                        missing.push("portfolio2_id");
                    }
                } else if tx.wallet_id.is_some() || tx.wallet2_id.is_some() {
                    if tx.wallet_id.is_none() {
                        missing.push("wallet_id");
                    }
                    if tx.wallet2_id.is_none() {
                        missing.push("wallet2_id");
                    }
                } else {
                    missing.push("portfolio_id and portfolio2_id, or wallet_id and wallet2_id");
                }
            }
        }
        TransactionType::Input | TransactionType::Output => {
            if tx.portfolio_id.is_none() && tx.wallet_id.is_none() {
                missing.push("portfolio_id or wallet_id");
            }
        }
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(LedgerError::Validation(format!(
            "{:?} transaction is missing required fields: {}",
            tx.kind,
            missing.join(", ")
        )))
    }
}
