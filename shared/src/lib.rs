//! Shared types and models for the ChemStock inventory & dispatch platform
//!
//! This crate contains the entity models, ledger arithmetic, and input
//! validation shared between the backend and other components of the system.

pub mod ledger;
pub mod models;
pub mod types;
pub mod validation;

pub use ledger::*;
pub use models::*;
pub use types::*;
pub use validation::*;
