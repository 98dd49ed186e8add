pub mod conversations;
pub mod error;
pub mod items;
pub mod swaps;

pub use error::{LedgerError, Result};
