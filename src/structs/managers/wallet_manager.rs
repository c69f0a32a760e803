use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::errors::LedgerError;
use crate::structs::{InstrumentId, OwnerId, PositionKey, UserId, Wallet, WalletPosition};

use super::Persistable;

/* Wallet twin of the portfolio manager: wallets plus their (wallet,
instrument) position rows, saved on drop. */
#[derive(Serialize, Deserialize)]
pub struct WalletManager {
    pub wallets: HashMap<OwnerId, Wallet>,
    pub positions: HashMap<PositionKey, WalletPosition>,
    next_id: OwnerId,
    path: String,
    persist: bool,
}

impl Persistable for WalletManager {
    const PATH: &'static str = ".data/wallets";

    fn default_new(path: String, persist: bool) -> Self {
        Self {
            wallets: HashMap::new(),
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

impl WalletManager {
    /* Wallet names are unique per user */
    pub fn create(
        &mut self,
        user_id: UserId,
        name: &str,
        comment: Option<String>,
    ) -> Result<Wallet, LedgerError> {
        if self
            .wallets
            .values()
            .any(|w| w.user_id == user_id && w.name == name)
        {
            return Err(LedgerError::Conflict(format!(
                "wallet named '{name}' already exists"
            )));
        }
        let wallet = Wallet {
            id: self.next_id,
            user_id,
            name: name.to_string(),
            comment,
        };
        self.next_id += 1;
        self.wallets.insert(wallet.id, wallet.clone());
        Ok(wallet)
    }

    pub fn rename(
        &mut self,
        wallet_id: OwnerId,
        user_id: UserId,
        name: &str,
    ) -> Result<(), LedgerError> {
        self.get_user_wallet(wallet_id, user_id)?;
        if self
            .wallets
            .values()
            .any(|w| w.user_id == user_id && w.name == name && w.id != wallet_id)
        {
            return Err(LedgerError::Conflict(format!(
                "wallet named '{name}' already exists"
            )));
        }
        if let Some(wallet) = self.wallets.get_mut(&wallet_id) {
            wallet.name = name.to_string();
        }
        Ok(())
    }

    pub fn get_user_wallet(
        &self,
        wallet_id: OwnerId,
        user_id: UserId,
    ) -> Result<&Wallet, LedgerError> {
        self.wallets
            .get(&wallet_id)
            .filter(|w| w.user_id == user_id)
            .ok_or_else(|| LedgerError::NotFound(format!("wallet {wallet_id} not found")))
    }

    pub fn position(&self, key: &PositionKey) -> Option<&WalletPosition> {
        self.positions.get(key)
    }

    pub fn absorb_positions(&mut self, staged: HashMap<PositionKey, WalletPosition>) {
        self.positions.extend(staged);
    }

    pub fn positions_for_instrument(
        &self,
        user_id: UserId,
        instrument_id: &InstrumentId,
    ) -> Vec<(&Wallet, &WalletPosition)> {
        let mut rows: Vec<(&Wallet, &WalletPosition)> = self
            .wallets
            .values()
            .filter(|w| w.user_id == user_id)
            .filter_map(|w| {
                self.positions
                    .get(&(w.id, instrument_id.clone()))
                    .map(|pos| (w, pos))
            })
            .collect();
        rows.sort_by_key(|(w, _)| w.id);
        rows
    }
}

impl Drop for WalletManager {
    fn drop(&mut self) {
        if self.persist {
            let _save = self.save();
        }
    }
}
