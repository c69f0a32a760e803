use chrono::Utc;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::{IoError, LedgerError};
use crate::functions::{
    affected_portfolio_positions, affected_wallet_positions, distribute, validate, DistributionRow,
};
use crate::structs::{
    Distribution, Domain, InstrumentId, Persistable, PortfolioManager, PortfolioPosition,
    Transaction, TransactionDraft, TransactionId, TransactionManager, UserId, WalletManager,
    WalletPosition,
};

use super::{portfolio_rules, wallet_rules, UnitOfWork};

/* What one write operation did: the stored transaction (plus its mirrored
sibling when a transfer spans both domains) and the post-commit state of every
position it touched. */
#[derive(Debug, Clone, Serialize)]
pub struct TransactionOutcome {
    pub transaction: Transaction,
    pub sibling: Option<Transaction>,
    pub portfolio_positions: Vec<PortfolioPosition>,
    pub wallet_positions: Vec<WalletPosition>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateOutcome {
    pub previous: Transaction,
    pub outcome: TransactionOutcome,
}

/* The only writer of ledger state. Each operation validates and access-checks
first, stages every position mutation in a `UnitOfWork`, and commits manager
writes only once nothing can fail anymore; an error anywhere before the commit
leaves the managers exactly as they were. */
pub struct LedgerService {
    pub portfolios: PortfolioManager,
    pub wallets: WalletManager,
    pub transactions: TransactionManager,
}

impl LedgerService {
    pub fn new(
        portfolios: PortfolioManager,
        wallets: WalletManager,
        transactions: TransactionManager,
    ) -> Self {
        LedgerService {
            portfolios,
            wallets,
            transactions,
        }
    }

    pub fn new_non_persistent() -> Result<Self, IoError> {
        Ok(LedgerService {
            portfolios: PortfolioManager::new_non_persistent()?,
            wallets: WalletManager::new_non_persistent()?,
            transactions: TransactionManager::new_non_persistent()?,
        })
    }

    pub fn create_transaction(
        &mut self,
        user_id: UserId,
        draft: TransactionDraft,
    ) -> Result<TransactionOutcome, LedgerError> {
        let (primary, sibling) = split_draft(draft, Uuid::new_v4(), None);
        self.check_access(user_id, &primary)?;
        validate(&primary)?;
        if let Some(side) = &sibling {
            self.check_access(user_id, side)?;
            validate(side)?;
        }

        let mut uow = UnitOfWork::new(&self.portfolios.positions, &self.wallets.positions);
        apply_both(&primary, false, &mut uow);
        if let Some(side) = &sibling {
            apply_both(side, false, &mut uow);
        }
        let (staged_portfolios, staged_wallets) = uow.into_staged();

        self.portfolios.absorb_positions(staged_portfolios);
        self.wallets.absorb_positions(staged_wallets);
        self.transactions.upsert(primary.clone());
        if let Some(side) = &sibling {
            self.transactions.upsert(side.clone());
        }

        info!(id = %primary.id, kind = ?primary.kind, mirrored = sibling.is_some(), "transaction created");
        Ok(self.outcome(primary, sibling))
    }

    /* Cancel the stored arithmetic and apply the replacement inside one unit
    of work, so a failing replacement leaves the old state untouched. */
    pub fn update_transaction(
        &mut self,
        user_id: UserId,
        id: TransactionId,
        draft: TransactionDraft,
    ) -> Result<UpdateOutcome, LedgerError> {
        let previous = self.fetch(user_id, &id)?;
        let previous_sibling = self.fetch_sibling(&previous);

        let (current, sibling) =
            split_draft(draft, id, previous_sibling.as_ref().map(|side| side.id));
        self.check_access(user_id, &current)?;
        validate(&current)?;
        if let Some(side) = &sibling {
            self.check_access(user_id, side)?;
            validate(side)?;
        }

        let mut uow = UnitOfWork::new(&self.portfolios.positions, &self.wallets.positions);
        apply_both(&previous, true, &mut uow);
        if let Some(side) = &previous_sibling {
            apply_both(side, true, &mut uow);
        }
        apply_both(&current, false, &mut uow);
        if let Some(side) = &sibling {
            apply_both(side, false, &mut uow);
        }
        let (staged_portfolios, staged_wallets) = uow.into_staged();

        self.portfolios.absorb_positions(staged_portfolios);
        self.wallets.absorb_positions(staged_wallets);
        if sibling.is_none() {
            if let Some(side) = &previous_sibling {
                self.transactions.remove(&side.id);
            }
        }
        self.transactions.upsert(current.clone());
        if let Some(side) = &sibling {
            self.transactions.upsert(side.clone());
        }

        info!(id = %id, kind = ?current.kind, "transaction updated");
        Ok(UpdateOutcome {
            previous,
            outcome: self.outcome(current, sibling),
        })
    }

    pub fn delete_transaction(
        &mut self,
        user_id: UserId,
        id: TransactionId,
    ) -> Result<TransactionOutcome, LedgerError> {
        let removed = self.fetch(user_id, &id)?;
        let sibling = self.fetch_sibling(&removed);

        let mut uow = UnitOfWork::new(&self.portfolios.positions, &self.wallets.positions);
        apply_both(&removed, true, &mut uow);
        if let Some(side) = &sibling {
            apply_both(side, true, &mut uow);
        }
        let (staged_portfolios, staged_wallets) = uow.into_staged();

        self.portfolios.absorb_positions(staged_portfolios);
        self.wallets.absorb_positions(staged_wallets);
        self.transactions.remove(&id);
        if let Some(side) = &sibling {
            self.transactions.remove(&side.id);
        }

        info!(id = %id, kind = ?removed.kind, "transaction deleted");
        Ok(self.outcome(removed, sibling))
    }

    /* Turn a pending order into an executed trade: reverse the pending totals
    it booked, then apply the executed arithmetic. */
    pub fn execute_order(
        &mut self,
        user_id: UserId,
        id: TransactionId,
    ) -> Result<TransactionOutcome, LedgerError> {
        let pending = self.fetch(user_id, &id)?;
        if !pending.order {
            return Err(LedgerError::Validation(format!(
                "transaction {id} is not a pending order"
            )));
        }
        let mut executed = pending.clone();
        executed.order = false;
        executed.date = Utc::now();

        let mut uow = UnitOfWork::new(&self.portfolios.positions, &self.wallets.positions);
        apply_both(&pending, true, &mut uow);
        apply_both(&executed, false, &mut uow);
        let (staged_portfolios, staged_wallets) = uow.into_staged();

        self.portfolios.absorb_positions(staged_portfolios);
        self.wallets.absorb_positions(staged_wallets);
        self.transactions.upsert(executed.clone());

        info!(id = %id, kind = ?executed.kind, "order executed");
        Ok(self.outcome(executed, None))
    }

    pub fn get_distribution(
        &self,
        instrument_id: &InstrumentId,
        user_id: UserId,
        domain: Domain,
    ) -> Result<Distribution, LedgerError> {
        let rows: Vec<DistributionRow> = match domain {
            Domain::Portfolio => self
                .portfolios
                .positions_for_instrument(user_id, instrument_id)
                .into_iter()
                .map(|(portfolio, position)| DistributionRow {
                    owner_id: portfolio.id,
                    owner_name: portfolio.name.clone(),
                    quantity: position.quantity,
                    amount: Some(position.amount),
                })
                .collect(),
            Domain::Wallet => self
                .wallets
                .positions_for_instrument(user_id, instrument_id)
                .into_iter()
                .map(|(wallet, position)| DistributionRow {
                    owner_id: wallet.id,
                    owner_name: wallet.name.clone(),
                    quantity: position.quantity,
                    amount: None,
                })
                .collect(),
        };
        if rows.is_empty() {
            return Err(LedgerError::NotFound(format!(
                "no positions in {instrument_id} for this user"
            )));
        }
        Ok(distribute(instrument_id.clone(), domain, rows))
    }

    fn fetch(&self, user_id: UserId, id: &TransactionId) -> Result<Transaction, LedgerError> {
        let tx = self
            .transactions
            .get(id)
            .cloned()
            .ok_or_else(|| LedgerError::NotFound(format!("transaction {id} not found")))?;
        self.check_access(user_id, &tx)?;
        Ok(tx)
    }

    fn fetch_sibling(&self, tx: &Transaction) -> Option<Transaction> {
        tx.related_transaction_id
            .and_then(|id| self.transactions.get(&id).cloned())
    }

    /* Owners referenced by the transaction must belong to the calling user;
    foreign owners surface as NotFound, same as absent ones. */
    fn check_access(&self, user_id: UserId, tx: &Transaction) -> Result<(), LedgerError> {
        for id in [tx.portfolio_id, tx.portfolio2_id].into_iter().flatten() {
            self.portfolios.get_user_portfolio(id, user_id)?;
        }
        for id in [tx.wallet_id, tx.wallet2_id].into_iter().flatten() {
            self.wallets.get_user_wallet(id, user_id)?;
        }
        Ok(())
    }

    fn outcome(&self, transaction: Transaction, sibling: Option<Transaction>) -> TransactionOutcome {
        let mut refs = vec![&transaction];
        if let Some(side) = &sibling {
            refs.push(side);
        }
        let portfolio_positions = affected_portfolio_positions(&refs)
            .iter()
            .filter_map(|key| self.portfolios.position(key).cloned())
            .collect();
        let wallet_positions = affected_wallet_positions(&refs)
            .iter()
            .filter_map(|key| self.wallets.position(key).cloned())
            .collect();
        TransactionOutcome {
            transaction,
            sibling,
            portfolio_positions,
            wallet_positions,
        }
    }
}

fn apply_both(tx: &Transaction, cancel: bool, uow: &mut UnitOfWork) {
    portfolio_rules::apply(tx, cancel, uow);
    wallet_rules::apply(tx, cancel, uow);
}

/* A transfer draft naming a pair in both domains becomes two stored rows: the
primary keeps the portfolio pair, the sibling keeps the wallet pair, linked
both ways. Every other draft maps to a single transaction. On update the
previous sibling's id is reused so the link survives. */
fn split_draft(
    draft: TransactionDraft,
    primary_id: TransactionId,
    sibling_id: Option<TransactionId>,
) -> (Transaction, Option<Transaction>) {
    let cross_domain = draft.kind.is_transfer()
        && draft.portfolio_id.is_some()
        && draft.portfolio2_id.is_some()
        && draft.wallet_id.is_some()
        && draft.wallet2_id.is_some();
    if !cross_domain {
        return (Transaction::from_draft(primary_id, draft), None);
    }

    let mut wallet_draft = draft.clone();
    wallet_draft.portfolio_id = None;
    wallet_draft.portfolio2_id = None;
    let mut portfolio_draft = draft;
    portfolio_draft.wallet_id = None;
    portfolio_draft.wallet2_id = None;

    let mut primary = Transaction::from_draft(primary_id, portfolio_draft);
    let mut sibling = Transaction::from_draft(
        sibling_id.unwrap_or_else(Uuid::new_v4),
        wallet_draft,
    );
    primary.related_transaction_id = Some(sibling.id);
    sibling.related_transaction_id = Some(primary.id);
    (primary, Some(sibling))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal_macros::dec;

    use crate::structs::TransactionType;

    use super::*;

    fn service_with_owners() -> (LedgerService, u64, u64) {
        let mut service = LedgerService::new_non_persistent().unwrap();
        let p = service.portfolios.create(1, "main", "crypto", None).unwrap();
        let w = service.wallets.create(1, "binance", None).unwrap();
        (service, p.id, w.id)
    }

    fn draft(kind: TransactionType) -> TransactionDraft {
        TransactionDraft {
            date: Utc::now(),
            kind,
            instrument_id: "BTC".to_string(),
            instrument2_id: None,
            quantity: dec!(1),
            quantity2: None,
            price: None,
            price_usd: None,
            order: false,
            portfolio_id: None,
            portfolio2_id: None,
            wallet_id: None,
            wallet2_id: None,
            comment: None,
        }
    }

    #[test]
    fn create_buy_touches_all_four_rows() {
        let (mut service, p, w) = service_with_owners();
        let mut d = draft(TransactionType::Buy);
        d.instrument2_id = Some("USDT".to_string());
        d.quantity = dec!(0.1);
        d.quantity2 = Some(dec!(6000));
        d.price_usd = Some(dec!(59500));
        d.portfolio_id = Some(p);
        d.wallet_id = Some(w);

        let outcome = service.create_transaction(1, d).unwrap();
        assert!(outcome.sibling.is_none());
        assert_eq!(outcome.portfolio_positions.len(), 2);
        assert_eq!(outcome.wallet_positions.len(), 2);

        let btc = service.portfolios.position(&(p, "BTC".to_string())).unwrap();
        assert_eq!(btc.quantity, dec!(0.1));
        assert_eq!(btc.amount, dec!(5950.0));
        let usdt = service.wallets.position(&(w, "USDT".to_string())).unwrap();
        assert_eq!(usdt.quantity, dec!(-6000));
        assert_eq!(service.transactions.len(), 1);
    }

    #[test]
    fn foreign_owner_fails_before_any_mutation() {
        let (mut service, p, _w) = service_with_owners();
        let other_wallet = service.wallets.create(2, "kraken", None).unwrap();

        let mut d = draft(TransactionType::Buy);
        d.instrument2_id = Some("USDT".to_string());
        d.portfolio_id = Some(p);
        d.wallet_id = Some(other_wallet.id);

        let err = service.create_transaction(1, d).unwrap_err();
        assert!(matches!(err, LedgerError::NotFound(_)));
        assert!(service.transactions.is_empty());
        assert!(service.portfolios.positions.is_empty());
        assert!(service.wallets.positions.is_empty());
    }

    #[test]
    fn cross_domain_transfer_splits_into_linked_rows() {
        let mut service = LedgerService::new_non_persistent().unwrap();
        let p1 = service.portfolios.create(1, "a", "crypto", None).unwrap();
        let p2 = service.portfolios.create(1, "b", "crypto", None).unwrap();
        let w1 = service.wallets.create(1, "a", None).unwrap();
        let w2 = service.wallets.create(1, "b", None).unwrap();

        let mut d = draft(TransactionType::TransferOut);
        d.quantity = dec!(0.5);
        d.portfolio_id = Some(p1.id);
        d.portfolio2_id = Some(p2.id);
        d.wallet_id = Some(w1.id);
        d.wallet2_id = Some(w2.id);

        let outcome = service.create_transaction(1, d).unwrap();
        let sibling = outcome.sibling.as_ref().unwrap();
        assert_eq!(outcome.transaction.related_transaction_id, Some(sibling.id));
        assert_eq!(sibling.related_transaction_id, Some(outcome.transaction.id));
        assert!(outcome.transaction.wallet_id.is_none());
        assert!(sibling.portfolio_id.is_none());
        assert_eq!(service.transactions.len(), 2);

        // Deleting either row reverses and removes both
        service.delete_transaction(1, sibling.id).unwrap();
        assert!(service.transactions.is_empty());
        let src = service.portfolios.position(&(p1.id, "BTC".to_string())).unwrap();
        assert_eq!(src.quantity, dec!(0));
    }

    #[test]
    fn execute_order_swaps_pending_for_executed() {
        let (mut service, p, w) = service_with_owners();
        let mut d = draft(TransactionType::Buy);
        d.instrument2_id = Some("USDT".to_string());
        d.quantity = dec!(0.1);
        d.quantity2 = Some(dec!(6000));
        d.price_usd = Some(dec!(59500));
        d.order = true;
        d.portfolio_id = Some(p);
        d.wallet_id = Some(w);

        let pending = service.create_transaction(1, d).unwrap();
        let btc = service.portfolios.position(&(p, "BTC".to_string())).unwrap();
        assert_eq!(btc.buy_orders, dec!(5950.0));
        assert_eq!(btc.quantity, dec!(0));

        let executed = service.execute_order(1, pending.transaction.id).unwrap();
        assert!(!executed.transaction.order);
        let btc = service.portfolios.position(&(p, "BTC".to_string())).unwrap();
        assert_eq!(btc.buy_orders, dec!(0));
        assert_eq!(btc.quantity, dec!(0.1));

        // Re-executing is rejected
        let err = service.execute_order(1, pending.transaction.id).unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
    }

    #[test]
    fn distribution_requires_positions() {
        let (service, _p, _w) = service_with_owners();
        let err = service
            .get_distribution(&"BTC".to_string(), 1, Domain::Portfolio)
            .unwrap_err();
        assert!(matches!(err, LedgerError::NotFound(_)));
    }
}
