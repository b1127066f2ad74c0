//! Domain entities and value objects
//!
//! This module contains the core domain entities and value objects
//! that represent the business concepts of the intents core.

pub mod token;
pub mod balance;
pub mod pipeline;
pub mod identity;

// Re-export entities
pub use token::*;
pub use balance::*;
pub use pipeline::*;
pub use identity::*;
