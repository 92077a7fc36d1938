//! Reconciliation of imported bank operations against certified statements
//!
//! The engine splits the timeline at every statement checkpoint and checks
//! that the operations of each period explain the balance variation between
//! its two checkpoints. Mismatches are returned as data, never as errors.

pub mod engine;
pub mod service;
pub mod verdict;

pub use engine::*;
pub use service::*;
pub use verdict::*;
