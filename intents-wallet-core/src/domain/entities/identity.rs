use serde::{Deserialize, Serialize};

use crate::shared::constants::SHIELDED_SYMBOL;

/// The operator's own addresses, used when a caller leaves sender or receiver out
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WalletIdentity {
    pub account_id: String,
    pub shielded_address: String,
}

impl WalletIdentity {
    pub fn new(account_id: impl Into<String>, shielded_address: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            shielded_address: shielded_address.into(),
        }
    }

    /// Deposit source: shielded deposits come from the shielded address unless
    /// an explicit third-party sender is given
    pub fn deposit_source(&self, token_symbol: &str, sender: Option<&str>) -> String {
        let sender = non_empty(sender);
        if is_shielded_symbol(token_symbol) {
            match sender {
                Some(sender) if sender != self.account_id => sender.to_string(),
                _ => self.shielded_address.clone(),
            }
        } else {
            sender.unwrap_or(self.account_id.as_str()).to_string()
        }
    }

    /// Withdraw receiver: defaults to the account, which means the shielded
    /// address for shielded withdrawals
    pub fn withdraw_receiver(&self, token_symbol: &str, receiver: Option<&str>) -> String {
        let receiver = non_empty(receiver).unwrap_or(self.account_id.as_str());
        if is_shielded_symbol(token_symbol) && receiver == self.account_id {
            self.shielded_address.clone()
        } else {
            receiver.to_string()
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn is_shielded_symbol(token_symbol: &str) -> bool {
    token_symbol.trim().eq_ignore_ascii_case(SHIELDED_SYMBOL)
}
