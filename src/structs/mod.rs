pub mod transaction;
pub use transaction::*;

pub mod position;
pub use position::*;

pub mod owner;
pub use owner::*;

pub mod distribution;
pub use distribution::*;

pub mod managers;
pub use managers::*;
