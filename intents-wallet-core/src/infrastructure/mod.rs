//! Infrastructure layer - external integrations
//!
//! Environment configuration, HTTP collaborators for the catalog API and
//! account indexers, and the terminal chain prompt.

pub mod config;
pub mod http;
pub mod prompt;

// Re-export infrastructure components
pub use config::IntentsConfig;
pub use http::{FastNearIndexer, HttpCatalogSource, NearBlocksIndexer};
pub use prompt::StdinChainPrompt;
