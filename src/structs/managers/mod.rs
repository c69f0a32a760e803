pub mod persistable;
pub use persistable::*;

pub mod portfolio_manager;
pub use portfolio_manager::*;

pub mod wallet_manager;
pub use wallet_manager::*;

pub mod transaction_manager;
pub use transaction_manager::*;
