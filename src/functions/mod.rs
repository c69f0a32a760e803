pub mod validate;
pub use validate::*;

pub mod analyzer;
pub use analyzer::*;

pub mod distribution;
pub use distribution::*;
