use std::env;
use std::error::Error;

use dotenv::dotenv;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

pub mod errors;
pub mod functions;
pub mod ledger;
pub mod parsing;
pub mod structs;
pub mod utils;

#[cfg(test)]
mod tests;

use ledger::LedgerService;
use parsing::import_drafts;
use structs::{
    Domain, Persistable, PortfolioManager, TransactionManager, UserId, WalletManager,
};

fn main() {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(e) = run() {
        error!("{e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let data_dir = env::var("LEDGER_DATA_DIR").unwrap_or_else(|_| ".data".to_string());
    let user_id: UserId = match env::var("LEDGER_USER") {
        Ok(value) => value.parse()?,
        Err(_) => 1,
    };

    let portfolios = PortfolioManager::new(Some(format!("{data_dir}/portfolios")))?;
    let wallets = WalletManager::new(Some(format!("{data_dir}/wallets")))?;
    let transactions = TransactionManager::new(Some(format!("{data_dir}/transactions")))?;
    let mut service = LedgerService::new(portfolios, wallets, transactions);

    if let Ok(path) = env::var("LEDGER_IMPORT") {
        let drafts = import_drafts(&path)?;
        info!(count = drafts.len(), path = %path, "importing transaction drafts");
        for draft in drafts {
            match service.create_transaction(user_id, draft) {
                Ok(outcome) => info!(id = %outcome.transaction.id, "imported"),
                Err(e) => warn!("skipped draft: {e}"),
            }
        }
    }

    /* LEDGER_DISTRIBUTION=portfolio:BTC or wallet:BTC */
    if let Ok(query) = env::var("LEDGER_DISTRIBUTION") {
        let (domain, instrument) = parse_distribution_query(&query)?;
        let distribution = service.get_distribution(&instrument, user_id, domain)?;
        println!("{}", serde_json::to_string_pretty(&distribution)?);
    }

    Ok(())
}

fn parse_distribution_query(query: &str) -> Result<(Domain, String), Box<dyn Error>> {
    let (domain, instrument) = query
        .split_once(':')
        .ok_or("expected <domain>:<instrument>, e.g. portfolio:BTC")?;
    let domain = match domain.to_lowercase().as_str() {
        "portfolio" => Domain::Portfolio,
        "wallet" => Domain::Wallet,
        other => return Err(format!("unknown domain '{other}'").into()),
    };
    Ok((domain, instrument.to_string()))
}
