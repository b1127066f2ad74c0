//! Token route resolution
//!
//! Matches a symbol against the chains a destination supports. The resolver
//! keeps no state and does no I/O: an ambiguous match comes back as a
//! [`DisambiguationRequest`] and the caller decides how to obtain a choice.

use serde::{Deserialize, Serialize};

use crate::core::catalog::TokenCatalog;
use crate::domain::entities::TokenMetadata;
use crate::shared::types::{ChainSet, ChainTag};

/// Several catalog entries matched; a chain must be chosen
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisambiguationRequest {
    pub symbol: String,
    pub candidates: Vec<TokenMetadata>,
}

impl DisambiguationRequest {
    /// Candidate chains in catalog order, without repeats
    pub fn chains(&self) -> Vec<ChainTag> {
        let mut chains: Vec<ChainTag> = Vec::with_capacity(self.candidates.len());
        for token in &self.candidates {
            if !chains.contains(&token.blockchain) {
                chains.push(token.blockchain);
            }
        }
        chains
    }
}

/// No entry matched
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouteNotFound {
    pub symbol: String,
    /// Chains that were searched
    pub chains: Vec<ChainTag>,
    /// Set when the miss came from narrowing on an explicit choice
    pub choice: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RouteResolution {
    Resolved(TokenMetadata),
    Ambiguous(DisambiguationRequest),
    NotFound(RouteNotFound),
}

/// Stateless symbol/chain matcher
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenRouteResolver;

impl TokenRouteResolver {
    pub fn new() -> Self {
        Self
    }

    /// Match `symbol` (case-insensitive) against catalog entries on `chains`
    pub fn resolve(&self, symbol: &str, chains: &ChainSet, catalog: &TokenCatalog) -> RouteResolution {
        let candidates: Vec<TokenMetadata> = catalog
            .by_symbol_and_chains(symbol, chains)
            .into_iter()
            .cloned()
            .collect();

        Self::settle(symbol, candidates, || RouteNotFound {
            symbol: symbol.to_uppercase(),
            chains: chains.iter().copied().collect(),
            choice: None,
        })
    }

    /// Keep only the candidates on the chosen chain
    pub fn narrow(&self, request: DisambiguationRequest, choice: &str) -> RouteResolution {
        let wanted = choice.trim().to_ascii_lowercase();
        let searched = request.chains();
        let candidates: Vec<TokenMetadata> = request
            .candidates
            .into_iter()
            .filter(|token| token.blockchain.as_str() == wanted)
            .collect();

        // Entries sharing one chain cannot be told apart by another chain choice
        if candidates.len() > 1 {
            log::warn!(
                "{} entries for {} on {}, using the first catalog entry",
                candidates.len(),
                request.symbol,
                wanted
            );
            return RouteResolution::Resolved(candidates[0].clone());
        }

        let symbol = request.symbol;
        Self::settle(&symbol, candidates, || RouteNotFound {
            symbol: symbol.clone(),
            chains: searched,
            choice: Some(choice.trim().to_string()),
        })
    }

    fn settle(
        symbol: &str,
        mut candidates: Vec<TokenMetadata>,
        not_found: impl FnOnce() -> RouteNotFound,
    ) -> RouteResolution {
        match candidates.len() {
            0 => RouteResolution::NotFound(not_found()),
            1 => RouteResolution::Resolved(candidates.remove(0)),
            _ => RouteResolution::Ambiguous(DisambiguationRequest {
                symbol: symbol.to_uppercase(),
                candidates,
            }),
        }
    }
}
