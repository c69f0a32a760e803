use serde::{Deserialize, Serialize};

use super::{OwnerId, UserId};

/* A portfolio groups positions that carry a cost basis. The name is unique
per user. */
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    pub id: OwnerId,
    pub user_id: UserId,
    pub name: String,
    pub market: String,
    pub comment: Option<String>,
}

/* A wallet groups positions without a cost basis (exchange accounts, cold
storage, fiat accounts). The name is unique per user. */
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wallet {
    pub id: OwnerId,
    pub user_id: UserId,
    pub name: String,
    pub comment: Option<String>,
}
