use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub type OwnerId = u64;
pub type UserId = u64;
pub type InstrumentId = String;

/* A position is keyed by (owner, instrument); the key is unique per ledger */
pub type PositionKey = (OwnerId, InstrumentId);

/* One (portfolio, instrument) ledger row. `quantity` is the signed holding,
`amount` the signed USD cost basis, and the pending totals track orders that
were placed but not executed. Rows are created lazily on first reference and
never removed, so zero and negative (short/pending) states stay visible. */
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioPosition {
    pub portfolio_id: OwnerId,
    pub instrument_id: InstrumentId,
    pub quantity: Decimal,
    pub amount: Decimal,
    pub buy_orders: Decimal,
    pub sell_orders: Decimal,
}

impl PortfolioPosition {
    pub fn opened(portfolio_id: OwnerId, instrument_id: &str) -> Self {
        PortfolioPosition {
            portfolio_id,
            instrument_id: instrument_id.to_string(),
            quantity: Decimal::ZERO,
            amount: Decimal::ZERO,
            buy_orders: Decimal::ZERO,
            sell_orders: Decimal::ZERO,
        }
    }

    pub fn key(&self) -> PositionKey {
        (self.portfolio_id, self.instrument_id.clone())
    }
}

/* The wallet twin. Wallets track holdings and pending orders only; cost basis
lives in the portfolio ledger. */
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletPosition {
    pub wallet_id: OwnerId,
    pub instrument_id: InstrumentId,
    pub quantity: Decimal,
    pub buy_orders: Decimal,
    pub sell_orders: Decimal,
}

impl WalletPosition {
    pub fn opened(wallet_id: OwnerId, instrument_id: &str) -> Self {
        WalletPosition {
            wallet_id,
            instrument_id: instrument_id.to_string(),
            quantity: Decimal::ZERO,
            buy_orders: Decimal::ZERO,
            sell_orders: Decimal::ZERO,
        }
    }

    pub fn key(&self) -> PositionKey {
        (self.wallet_id, self.instrument_id.clone())
    }
}
