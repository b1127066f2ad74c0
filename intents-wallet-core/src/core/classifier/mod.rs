//! Destination address classification
//!
//! Maps an address string to every chain it is structurally valid on. The
//! shielded chain has no local rule; its node decides.

use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;

use crate::domain::repositories::ShieldedAddressValidator;
use crate::shared::error::{Dependency, DependencyContext, IntentsError};
use crate::shared::types::{ChainSet, ChainTag};

lazy_static! {
    static ref NEAR_ACCOUNT: Regex =
        Regex::new(r"^(([a-z\d]+[-_])*[a-z\d]+\.)*([a-z\d]+[-_])*[a-z\d]+$").unwrap();
    static ref EVM_ADDRESS: Regex = Regex::new(r"^0x[a-fA-F0-9]{40}$").unwrap();
    static ref BTC_ADDRESSES: Vec<Regex> = vec![
        Regex::new(r"^1[1-9A-HJ-NP-Za-km-z]{25,34}$").unwrap(),
        Regex::new(r"^3[1-9A-HJ-NP-Za-km-z]{25,34}$").unwrap(),
        Regex::new(r"^bc1[02-9ac-hj-np-z]{11,87}$").unwrap(),
        Regex::new(r"^bc1p[02-9ac-hj-np-z]{42,87}$").unwrap(),
    ];
    static ref DOGE_ADDRESS: Regex = Regex::new(r"^[DA][1-9A-HJ-NP-Za-km-z]{25,33}$").unwrap();
}

const NEAR_ACCOUNT_MIN_LEN: usize = 2;
const NEAR_ACCOUNT_MAX_LEN: usize = 64;

/// Dotted lowercase account name; the bare EVM hex form is left to the EVM rule
pub fn is_near_account(address: &str) -> bool {
    (NEAR_ACCOUNT_MIN_LEN..=NEAR_ACCOUNT_MAX_LEN).contains(&address.len())
        && NEAR_ACCOUNT.is_match(address)
        && !EVM_ADDRESS.is_match(address)
}

pub fn is_evm_address(address: &str) -> bool {
    EVM_ADDRESS.is_match(address)
}

pub fn is_btc_address(address: &str) -> bool {
    BTC_ADDRESSES.iter().any(|rule| rule.is_match(address))
}

pub fn is_doge_address(address: &str) -> bool {
    DOGE_ADDRESS.is_match(address)
}

/// Chains matched by the local structural rules alone
pub fn classify_syntactic(address: &str) -> ChainSet {
    let mut chains = ChainSet::new();

    if is_near_account(address) {
        chains.insert(ChainTag::Near);
    }
    if is_evm_address(address) {
        chains.extend(ChainTag::EVM);
    }
    if is_btc_address(address) {
        chains.insert(ChainTag::Btc);
    }
    if is_doge_address(address) {
        chains.insert(ChainTag::Doge);
    }

    chains
}

/// Address classifier backed by an external shielded-address validator
#[derive(Clone)]
pub struct AddressClassifier {
    shielded: Arc<dyn ShieldedAddressValidator>,
}

impl AddressClassifier {
    pub fn new(shielded: Arc<dyn ShieldedAddressValidator>) -> Self {
        Self { shielded }
    }

    /// Every chain `address` could belong to. An empty set is a valid answer;
    /// only a failed shielded validation call is an error.
    pub async fn classify(&self, address: &str) -> Result<ChainSet, IntentsError> {
        let mut chains = classify_syntactic(address);

        if self
            .shielded
            .is_valid_shielded_address(address)
            .await
            .dependency(Dependency::ShieldedValidation)?
        {
            chains.insert(ChainTag::Zec);
        }

        log::debug!("Address {} classified as {:?}", address, chains);
        Ok(chains)
    }
}
