pub mod ledger;
pub use ledger::*;

pub mod io_error;
pub use io_error::*;

pub mod import;
pub use import::*;
