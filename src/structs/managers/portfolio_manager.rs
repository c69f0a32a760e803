use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::errors::LedgerError;
use crate::structs::{InstrumentId, OwnerId, Portfolio, PortfolioPosition, PositionKey, UserId};

use super::Persistable;

/* Owns every portfolio and every (portfolio, instrument) position row. The
position map's key uniqueness is what guarantees one row per (owner,
instrument); writers go through `absorb_positions` so a whole unit of work
lands at once. Saves itself on drop. */
#[derive(Serialize, Deserialize)]
pub struct PortfolioManager {
    pub portfolios: HashMap<OwnerId, Portfolio>,
    pub positions: HashMap<PositionKey, PortfolioPosition>,
    next_id: OwnerId,
    path: String,
    persist: bool,
}

impl Persistable for PortfolioManager {
    const PATH: &'static str = ".data/portfolios";

    fn default_new(path: String, persist: bool) -> Self {
        Self {
            portfolios: HashMap::new(),
            positions: HashMap::new(),
            next_id: 1,
            path,
            persist,
        }
    }

    fn get_path(&self) -> &str {
        &self.path
    }

    fn is_persistent(&self) -> bool {
        self.persist
    }
}

impl PortfolioManager {
    /* Portfolio names are unique per user */
    pub fn create(
        &mut self,
        user_id: UserId,
        name: &str,
        market: &str,
        comment: Option<String>,
    ) -> Result<Portfolio, LedgerError> {
        if self
            .portfolios
            .values()
            .any(|p| p.user_id == user_id && p.name == name)
        {
            return Err(LedgerError::Conflict(format!(
                "portfolio named '{name}' already exists"
            )));
        }
        let portfolio = Portfolio {
            id: self.next_id,
            user_id,
            name: name.to_string(),
            market: market.to_string(),
            comment,
        };
        self.next_id += 1;
        self.portfolios.insert(portfolio.id, portfolio.clone());
        Ok(portfolio)
    }

    pub fn rename(
        &mut self,
        portfolio_id: OwnerId,
        user_id: UserId,
        name: &str,
    ) -> Result<(), LedgerError> {
        self.get_user_portfolio(portfolio_id, user_id)?;
        if self
            .portfolios
            .values()
            .any(|p| p.user_id == user_id && p.name == name && p.id != portfolio_id)
        {
            return Err(LedgerError::Conflict(format!(
                "portfolio named '{name}' already exists"
            )));
        }
        if let Some(portfolio) = self.portfolios.get_mut(&portfolio_id) {
            portfolio.name = name.to_string();
        }
        Ok(())
    }

    /* Fetch with an access check: a portfolio owned by someone else looks
    exactly like a missing one */
    pub fn get_user_portfolio(
        &self,
        portfolio_id: OwnerId,
        user_id: UserId,
    ) -> Result<&Portfolio, LedgerError> {
        self.portfolios
            .get(&portfolio_id)
            .filter(|p| p.user_id == user_id)
            .ok_or_else(|| LedgerError::NotFound(format!("portfolio {portfolio_id} not found")))
    }

    pub fn position(&self, key: &PositionKey) -> Option<&PortfolioPosition> {
        self.positions.get(key)
    }

    /* Commit a unit of work's staged rows in one shot */
    pub fn absorb_positions(&mut self, staged: HashMap<PositionKey, PortfolioPosition>) {
        self.positions.extend(staged);
    }

    /* Every position one user holds in one instrument, sorted by portfolio id
    so reads are reproducible */
    pub fn positions_for_instrument(
        &self,
        user_id: UserId,
        instrument_id: &InstrumentId,
    ) -> Vec<(&Portfolio, &PortfolioPosition)> {
        let mut rows: Vec<(&Portfolio, &PortfolioPosition)> = self
            .portfolios
            .values()
            .filter(|p| p.user_id == user_id)
            .filter_map(|p| {
                self.positions
                    .get(&(p.id, instrument_id.clone()))
                    .map(|pos| (p, pos))
            })
            .collect();
        rows.sort_by_key(|(p, _)| p.id);
        rows
    }
}

impl Drop for PortfolioManager {
    fn drop(&mut self) {
        if self.persist {
            let _save = self.save();
        }
    }
}
