use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::shared::error::IntentsError;

/// Integer amount in a token's smallest on-chain unit
pub type RawAmount = u128;

/// Set of chains a destination address could belong to; empty means unsupported
pub type ChainSet = BTreeSet<ChainTag>;

// Chain tags - one account-based chain, the EVM family, and three UTXO-style chains
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ChainTag {
    Near,
    Eth,
    Base,
    Arb,
    Gnosis,
    Bera,
    Btc,
    Doge,
    Zec,
}

impl ChainTag {
    pub const ALL: [ChainTag; 9] = [
        ChainTag::Near,
        ChainTag::Eth,
        ChainTag::Base,
        ChainTag::Arb,
        ChainTag::Gnosis,
        ChainTag::Bera,
        ChainTag::Btc,
        ChainTag::Doge,
        ChainTag::Zec,
    ];

    /// Chains sharing the `0x` + 40 hex address form
    pub const EVM: [ChainTag; 5] = [
        ChainTag::Eth,
        ChainTag::Base,
        ChainTag::Arb,
        ChainTag::Gnosis,
        ChainTag::Bera,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChainTag::Near => "near",
            ChainTag::Eth => "eth",
            ChainTag::Base => "base",
            ChainTag::Arb => "arb",
            ChainTag::Gnosis => "gnosis",
            ChainTag::Bera => "bera",
            ChainTag::Btc => "btc",
            ChainTag::Doge => "doge",
            ChainTag::Zec => "zec",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ChainTag::Near => "NEAR Protocol",
            ChainTag::Eth => "Ethereum",
            ChainTag::Base => "Base",
            ChainTag::Arb => "Arbitrum",
            ChainTag::Gnosis => "Gnosis",
            ChainTag::Bera => "Berachain",
            ChainTag::Btc => "Bitcoin",
            ChainTag::Doge => "Dogecoin",
            ChainTag::Zec => "Zcash",
        }
    }

    pub fn is_evm(&self) -> bool {
        Self::EVM.contains(self)
    }
}

impl fmt::Display for ChainTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChainTag {
    type Err = IntentsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_ascii_lowercase();
        ChainTag::ALL
            .iter()
            .copied()
            .find(|chain| chain.as_str() == tag)
            .ok_or_else(|| IntentsError::validation(format!("Unsupported chain: {}", s)))
    }
}
