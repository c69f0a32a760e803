pub mod unit_of_work;
pub use unit_of_work::*;

pub mod portfolio_rules;
pub mod wallet_rules;

pub mod service;
pub use service::*;
