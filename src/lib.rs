//! # Reconciliation Core
//!
//! Validates bank operations imported by scraping providers against
//! independently certified statement balances.
//!
//! ## Features
//!
//! - **Value objects**: cent-exact amounts, validated dates, normalized labels
//! - **Period reconciliation**: one verdict per interval between consecutive checkpoints
//! - **Diagnosis**: duplicated imports reported before missing operations
//! - **Request mapping**: JSON request/response shapes for transport layers
//! - **Pluggable clock and duplicate detection** through traits
//!
//! ## Quick Start
//!
//! ```rust
//! use reconciliation_core::{
//!     Amount, CalendarDate, NormalizedLabel, ReconciliationCommand, ReconciliationEngine,
//!     StatementCheckpoint, SystemClock, Transaction,
//! };
//!
//! let clock = SystemClock;
//! let date = |s: &str| CalendarDate::parse_with_clock(s, &clock).unwrap();
//!
//! let command = ReconciliationCommand::new(
//!     vec![Transaction::new(
//!         1,
//!         date("2024-01-15"),
//!         NormalizedLabel::new("Dépôt").unwrap(),
//!         Amount::try_from_f64(500.0).unwrap(),
//!     )],
//!     vec![
//!         StatementCheckpoint::new(date("2024-01-01"), Amount::from_cents(100_000)),
//!         StatementCheckpoint::new(date("2024-01-31"), Amount::from_cents(150_000)),
//!     ],
//! );
//!
//! let verdicts = ReconciliationEngine::new().sync(&command);
//! assert!(verdicts[0].is_accepted());
//! ```

pub mod bank;
pub mod config;
pub mod mapping;
pub mod reconciliation;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use bank::*;
pub use config::*;
pub use mapping::*;
pub use reconciliation::*;
pub use traits::*;
pub use types::*;
