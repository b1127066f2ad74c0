//! Domain repositories
//!
//! Traits for every external capability the core consumes. Implementations
//! live in `infrastructure` or are supplied by the embedding application.

pub mod catalog_repository;
pub mod indexer_repository;
pub mod pool_repository;
pub mod shielded_repository;
pub mod chain_choice;

// Re-export repositories
pub use catalog_repository::*;
pub use indexer_repository::*;
pub use pool_repository::*;
pub use shielded_repository::*;
pub use chain_choice::*;
