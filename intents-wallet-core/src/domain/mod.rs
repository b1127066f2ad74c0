//! Domain layer - entities and collaborator contracts
//!
//! This module contains the domain types and the traits through which the core
//! reaches external systems (catalog API, indexers, the intents pool, the shielded chain).

pub mod entities;
pub mod repositories;

// Re-export domain components
pub use entities::*;
pub use repositories::*;
