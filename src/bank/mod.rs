//! Bank-side entities: imported operations and certified statement balances

pub mod checkpoint;
pub mod operations;
pub mod transaction;

pub use checkpoint::*;
pub use transaction::*;
