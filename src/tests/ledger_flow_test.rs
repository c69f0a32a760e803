use chrono::Utc;
use rust_decimal_macros::dec;
use uuid::Uuid;

use crate::errors::LedgerError;
use crate::ledger::LedgerService;
use crate::structs::{Domain, OwnerId, TransactionDraft, TransactionType};

/* End-to-end ledger scenarios through the service: every assertion reads the
committed manager state, not the unit of work. */

fn service() -> (LedgerService, OwnerId, OwnerId) {
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

fn buy(p: OwnerId, w: OwnerId, q: &str, q2: &str, px: &str) -> TransactionDraft {
    let mut d = draft(TransactionType::Buy);
    d.instrument2_id = Some("USDT".to_string());
    d.quantity = q.parse().unwrap();
    d.quantity2 = Some(q2.parse().unwrap());
    d.price_usd = Some(px.parse().unwrap());
    d.portfolio_id = Some(p);
    d.wallet_id = Some(w);
    d
}

#[test]
fn buy_then_sell_keeps_exact_decimal_state() {
    let (mut service, p, w) = service();

    service.create_transaction(1, buy(p, w, "0.1", "6000", "59500")).unwrap();

    let mut sell = draft(TransactionType::Sell);
    sell.instrument2_id = Some("USDT".to_string());
    sell.quantity = dec!(0.05);
    sell.quantity2 = Some(dec!(3200));
    sell.price_usd = Some(dec!(64000));
    sell.portfolio_id = Some(p);
    sell.wallet_id = Some(w);
    service.create_transaction(1, sell).unwrap();

    let btc = service.portfolios.position(&(p, "BTC".to_string())).unwrap();
    assert_eq!(btc.quantity, dec!(0.05));
    assert_eq!(btc.amount, dec!(2750.00));

    let usdt = service.portfolios.position(&(p, "USDT".to_string())).unwrap();
    assert_eq!(usdt.quantity, dec!(-2800));

    let wallet_btc = service.wallets.position(&(w, "BTC".to_string())).unwrap();
    assert_eq!(wallet_btc.quantity, dec!(0.05));
    let wallet_usdt = service.wallets.position(&(w, "USDT".to_string())).unwrap();
    assert_eq!(wallet_usdt.quantity, dec!(-2800));
}

#[test]
fn delete_restores_every_touched_position() {
    let (mut service, p, w) = service();

    service.create_transaction(1, buy(p, w, "0.1", "6000", "59500")).unwrap();
    let before_portfolios = service.portfolios.positions.clone();
    let before_wallets = service.wallets.positions.clone();

    let second = service.create_transaction(1, buy(p, w, "0.4", "24000", "60000")).unwrap();
    service.delete_transaction(1, second.transaction.id).unwrap();

    assert_eq!(service.portfolios.positions, before_portfolios);
    assert_eq!(service.wallets.positions, before_wallets);
    assert_eq!(service.transactions.len(), 1);
}

#[test]
fn update_is_cancel_then_reapply() {
    let (mut service, p, w) = service();

    let created = service.create_transaction(1, buy(p, w, "0.1", "6000", "59500")).unwrap();
    let updated = service
        .update_transaction(1, created.transaction.id, buy(p, w, "0.2", "12000", "59500"))
        .unwrap();

    assert_eq!(updated.previous.quantity, dec!(0.1));
    assert_eq!(updated.outcome.transaction.id, created.transaction.id);

    // Final state matches a fresh apply of the replacement
    let btc = service.portfolios.position(&(p, "BTC".to_string())).unwrap();
    assert_eq!(btc.quantity, dec!(0.2));
    assert_eq!(btc.amount, dec!(11900.0));
    let usdt = service.wallets.position(&(w, "USDT".to_string())).unwrap();
    assert_eq!(usdt.quantity, dec!(-12000));
    assert_eq!(service.transactions.len(), 1);
}

#[test]
fn failing_update_rolls_everything_back() {
    let (mut service, p, w) = service();
    let foreign = service.portfolios.create(2, "other", "crypto", None).unwrap();

    let created = service.create_transaction(1, buy(p, w, "0.1", "6000", "59500")).unwrap();
    let before_portfolios = service.portfolios.positions.clone();
    let before_wallets = service.wallets.positions.clone();

    let err = service
        .update_transaction(1, created.transaction.id, buy(foreign.id, w, "0.2", "12000", "59500"))
        .unwrap_err();
    assert!(matches!(err, LedgerError::NotFound(_)));

    assert_eq!(service.portfolios.positions, before_portfolios);
    assert_eq!(service.wallets.positions, before_wallets);
    let stored = service.transactions.get(&created.transaction.id).unwrap();
    assert_eq!(stored.quantity, dec!(0.1));
}

#[test]
fn portfolio_transfer_splits_cost_basis_proportionally() {
    let (mut service, p1, w) = service();
    let p2 = service.portfolios.create(1, "cold", "crypto", None).unwrap().id;

    service.create_transaction(1, buy(p1, w, "1.5", "60000", "40000")).unwrap();

    let mut transfer = draft(TransactionType::TransferOut);
    transfer.quantity = dec!(0.75);
    transfer.portfolio_id = Some(p1);
    transfer.portfolio2_id = Some(p2);
    service.create_transaction(1, transfer).unwrap();

    let source = service.portfolios.position(&(p1, "BTC".to_string())).unwrap();
    assert_eq!(source.quantity, dec!(0.75));
    assert_eq!(source.amount, dec!(30000));
    let destination = service.portfolios.position(&(p2, "BTC".to_string())).unwrap();
    assert_eq!(destination.quantity, dec!(0.75));
    assert_eq!(destination.amount, dec!(30000));
}

#[test]
fn cross_domain_transfer_lifecycle() {
    let (mut service, p1, w1) = service();
    let p2 = service.portfolios.create(1, "cold", "crypto", None).unwrap().id;
    let w2 = service.wallets.create(1, "ledger", None).unwrap().id;

    service.create_transaction(1, buy(p1, w1, "1.5", "60000", "40000")).unwrap();
    let snapshot_portfolios = service.portfolios.positions.clone();
    let snapshot_wallets = service.wallets.positions.clone();

    let mut transfer = draft(TransactionType::TransferOut);
    transfer.quantity = dec!(0.75);
    transfer.portfolio_id = Some(p1);
    transfer.portfolio2_id = Some(p2);
    transfer.wallet_id = Some(w1);
    transfer.wallet2_id = Some(w2);
    let created = service.create_transaction(1, transfer.clone()).unwrap();

    let sibling = created.sibling.as_ref().unwrap();
    assert_eq!(service.transactions.len(), 3);
    assert_eq!(service.wallets.position(&(w2, "BTC".to_string())).unwrap().quantity, dec!(0.75));
    assert_eq!(service.portfolios.position(&(p2, "BTC".to_string())).unwrap().amount, dec!(30000));

    // Updating through the primary keeps the sibling link and both legs in step
    transfer.quantity = dec!(0.25);
    let updated = service.update_transaction(1, created.transaction.id, transfer).unwrap();
    assert_eq!(updated.outcome.sibling.as_ref().unwrap().id, sibling.id);
    assert_eq!(service.wallets.position(&(w2, "BTC".to_string())).unwrap().quantity, dec!(0.25));
    assert_eq!(service.portfolios.position(&(p1, "BTC".to_string())).unwrap().quantity, dec!(1.25));

    // Deleting the primary removes both rows and restores the pre-transfer state
    service.delete_transaction(1, created.transaction.id).unwrap();
    assert_eq!(service.transactions.len(), 1);
    assert!(service.transactions.get(&sibling.id).is_none());
    assert_eq!(
        service.portfolios.position(&(p1, "BTC".to_string())),
        snapshot_portfolios.get(&(p1, "BTC".to_string()))
    );
    assert_eq!(
        service.wallets.position(&(w2, "BTC".to_string())).unwrap().quantity,
        snapshot_wallets
            .get(&(w2, "BTC".to_string()))
            .map(|pos| pos.quantity)
            .unwrap_or_default()
    );
}

#[test]
fn distribution_across_owners() {
    let (mut service, p1, _w) = service();
    let p2 = service.portfolios.create(1, "cold", "crypto", None).unwrap().id;

    let mut first = draft(TransactionType::Input);
    first.instrument_id = "AAPL".to_string();
    first.quantity = dec!(10);
    first.portfolio_id = Some(p1);
    service.create_transaction(1, first).unwrap();

    let mut second = draft(TransactionType::Input);
    second.instrument_id = "AAPL".to_string();
    second.quantity = dec!(5);
    second.portfolio_id = Some(p2);
    service.create_transaction(1, second).unwrap();

    let distribution = service
        .get_distribution(&"AAPL".to_string(), 1, Domain::Portfolio)
        .unwrap();
    assert_eq!(distribution.total_quantity, dec!(15));
    assert_eq!(distribution.entries.len(), 2);
    assert_eq!(distribution.entries[0].owner_id, p1);
    assert_eq!(distribution.entries[0].percentage, dec!(66.67));
    assert_eq!(distribution.entries[1].percentage, dec!(33.33));

    // Another user sees nothing
    assert!(matches!(
        service.get_distribution(&"AAPL".to_string(), 2, Domain::Portfolio),
        Err(LedgerError::NotFound(_))
    ));
}

#[test]
fn unknown_and_foreign_transactions_are_not_found() {
    let (mut service, p, w) = service();
    let created = service.create_transaction(1, buy(p, w, "0.1", "6000", "59500")).unwrap();

    assert!(matches!(
        service.delete_transaction(1, Uuid::new_v4()),
        Err(LedgerError::NotFound(_))
    ));
    // User 2 does not own the referenced portfolio or wallet
    assert!(matches!(
        service.delete_transaction(2, created.transaction.id),
        Err(LedgerError::NotFound(_))
    ));
    assert_eq!(service.transactions.len(), 1);
}

#[test]
fn pending_order_full_lifecycle() {
    let (mut service, p, w) = service();

    let mut order = buy(p, w, "0.1", "6000", "59500");
    order.order = true;
    let pending = service.create_transaction(1, order).unwrap();

    let btc = service.portfolios.position(&(p, "BTC".to_string())).unwrap();
    assert_eq!(btc.buy_orders, dec!(5950.0));
    assert_eq!(btc.quantity, dec!(0));
    let usdt = service.wallets.position(&(w, "USDT".to_string())).unwrap();
    assert_eq!(usdt.sell_orders, dec!(-6000));

    let executed = service.execute_order(1, pending.transaction.id).unwrap();
    assert!(!executed.transaction.order);

    let btc = service.portfolios.position(&(p, "BTC".to_string())).unwrap();
    assert_eq!(btc.buy_orders, dec!(0));
    assert_eq!(btc.quantity, dec!(0.1));
    assert_eq!(btc.amount, dec!(5950.0));
    let usdt = service.wallets.position(&(w, "USDT".to_string())).unwrap();
    assert_eq!(usdt.sell_orders, dec!(0));
    assert_eq!(usdt.quantity, dec!(-6000));
}
