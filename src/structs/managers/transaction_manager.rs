use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::structs::{Transaction, TransactionId};

use super::Persistable;

/* Transaction rows keyed by id. Inserts and removals happen only from the
ledger service, after every position mutation of the same unit of work has
been staged. Saves itself on drop. */
#[derive(Serialize, Deserialize)]
pub struct TransactionManager {
    transactions: HashMap<TransactionId, Transaction>,
    path: String,
    persist: bool,
}

impl Persistable for TransactionManager {
    const PATH: &'static str = ".data/transactions";

    fn default_new(path: String, persist: bool) -> Self {
        Self {
            transactions: HashMap::new(),
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

impl TransactionManager {
    pub fn get(&self, id: &TransactionId) -> Option<&Transaction> {
        self.transactions.get(id)
    }

    /* Insert or replace (updates keep the id) */
    pub fn upsert(&mut self, tx: Transaction) {
        self.transactions.insert(tx.id, tx);
    }

    pub fn remove(&mut self, id: &TransactionId) -> Option<Transaction> {
        self.transactions.remove(id)
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /* Date-ordered view for reporting */
    pub fn sorted_by_date(&self) -> Vec<&Transaction> {
        let mut txs: Vec<&Transaction> = self.transactions.values().collect();
        txs.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
        txs
    }
}

impl Drop for TransactionManager {
    fn drop(&mut self) {
        if self.persist {
            let _save = self.save();
        }
    }
}
