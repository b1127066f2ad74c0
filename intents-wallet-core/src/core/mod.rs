//! Core intents functionality
//!
//! This module contains the token catalog, address classification, route
//! resolution, balance aggregation and transfer orchestration.

pub mod catalog;
pub mod classifier;
pub mod routing;
pub mod balances;
pub mod orchestrator;

pub use catalog::TokenCatalog;
pub use classifier::AddressClassifier;
pub use routing::{DisambiguationRequest, RouteNotFound, RouteResolution, TokenRouteResolver};
pub use balances::BalanceAggregator;
pub use orchestrator::TransferOrchestrator;
