use hashbrown::HashMap;

use crate::structs::{OwnerId, PortfolioPosition, PositionKey, WalletPosition};

/* The atomic boundary of one ledger operation.

Position reads resolve against the staged copies first, then the committed
stores; a miss stages a zero-initialized row (get-or-create). The staged maps
double as the identity map for the unit of work: resolving one key twice
always observes the single in-flight row, so two legs colliding on the same
(owner, instrument) can never create duplicates.

Nothing is written back until the service has run every fallible step; the
commit hand-off (`into_staged` + manager absorb) cannot fail, so any error
before it is a full rollback by early return. */
pub struct UnitOfWork<'a> {
    portfolio_store: &'a HashMap<PositionKey, PortfolioPosition>,
    wallet_store: &'a HashMap<PositionKey, WalletPosition>,
    portfolio_staged: HashMap<PositionKey, PortfolioPosition>,
    wallet_staged: HashMap<PositionKey, WalletPosition>,
}

impl<'a> UnitOfWork<'a> {
    pub fn new(
        portfolio_store: &'a HashMap<PositionKey, PortfolioPosition>,
        wallet_store: &'a HashMap<PositionKey, WalletPosition>,
    ) -> Self {
        UnitOfWork {
            portfolio_store,
            wallet_store,
            portfolio_staged: HashMap::new(),
            wallet_staged: HashMap::new(),
        }
    }

    /* Resolve-or-create one portfolio leg. The returned copy is mutated by a
    pure rule function and handed back through `stage_portfolio`. */
    pub fn portfolio_position(&mut self, owner_id: OwnerId, instrument_id: &str) -> PortfolioPosition {
        let key = (owner_id, instrument_id.to_string());
        if let Some(staged) = self.portfolio_staged.get(&key) {
            return staged.clone();
        }
        let position = self
            .portfolio_store
            .get(&key)
            .cloned()
            .unwrap_or_else(|| PortfolioPosition::opened(owner_id, instrument_id));
        self.portfolio_staged.insert(key, position.clone());
        position
    }

    pub fn stage_portfolio(&mut self, position: PortfolioPosition) {
        self.portfolio_staged.insert(position.key(), position);
    }

    pub fn wallet_position(&mut self, owner_id: OwnerId, instrument_id: &str) -> WalletPosition {
        let key = (owner_id, instrument_id.to_string());
        if let Some(staged) = self.wallet_staged.get(&key) {
            return staged.clone();
        }
        let position = self
            .wallet_store
            .get(&key)
            .cloned()
            .unwrap_or_else(|| WalletPosition::opened(owner_id, instrument_id));
        self.wallet_staged.insert(key, position.clone());
        position
    }

    pub fn stage_wallet(&mut self, position: WalletPosition) {
        self.wallet_staged.insert(position.key(), position);
    }

    pub fn into_staged(
        self,
    ) -> (
        HashMap<PositionKey, PortfolioPosition>,
        HashMap<PositionKey, WalletPosition>,
    ) {
        (self.portfolio_staged, self.wallet_staged)
    }
}
