//! Pipeline state for one orchestrated deposit / swap / withdraw operation
//!
//! A `PipelineState` is owned by a single orchestrator invocation. Every stage
//! change goes through [`PipelineState::advance`], which only accepts the
//! transitions the operation allows, so a failed state always tells exactly
//! how far the operation got.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::entities::token::TokenMetadata;
use crate::shared::error::IntentsError;
use crate::shared::types::ChainTag;
use crate::shared::utils::generate_id;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStage {
    Idle,
    Depositing,
    Swapping,
    Withdrawing,
    Complete,
    Aborted,
}

impl PipelineStage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineStage::Complete | PipelineStage::Aborted)
    }

    /// Stages that call an external mutating capability
    pub fn is_working(&self) -> bool {
        matches!(
            self,
            PipelineStage::Depositing | PipelineStage::Swapping | PipelineStage::Withdrawing
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Idle => "idle",
            PipelineStage::Depositing => "depositing",
            PipelineStage::Swapping => "swapping",
            PipelineStage::Withdrawing => "withdrawing",
            PipelineStage::Complete => "complete",
            PipelineStage::Aborted => "aborted",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The four caller-facing operations that run through the orchestrator
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PipelineOperation {
    /// Wallet → pool
    Deposit,
    /// Swap inside the pool
    PoolSwap,
    /// Pool → external chain
    Withdraw,
    /// Deposit, swap, then withdraw to the receiver
    CombinedSwap,
}

impl PipelineOperation {
    /// Whether this operation may move from `from` to `to`
    pub fn allows(&self, from: PipelineStage, to: PipelineStage) -> bool {
        use PipelineOperation::*;
        use PipelineStage::*;

        if to == Aborted {
            return !from.is_terminal();
        }

        matches!(
            (self, from, to),
            (Deposit | CombinedSwap, Idle, Depositing)
                | (Deposit, Depositing, Complete)
                | (CombinedSwap, Depositing, Swapping)
                | (PoolSwap, Idle, Swapping)
                | (PoolSwap, Swapping, Complete)
                | (CombinedSwap, Swapping, Withdrawing)
                | (Withdraw, Idle, Withdrawing)
                | (Withdraw | CombinedSwap, Withdrawing, Complete)
        )
    }
}

impl fmt::Display for PipelineOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineOperation::Deposit => "deposit",
            PipelineOperation::PoolSwap => "pool swap",
            PipelineOperation::Withdraw => "withdraw",
            PipelineOperation::CombinedSwap => "swap",
        };
        f.write_str(name)
    }
}

/// Resolved withdraw target
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransferRoute {
    pub token_symbol: String,
    pub token: TokenMetadata,
    pub destination_chain: ChainTag,
    pub receiver: String,
}

impl TransferRoute {
    pub fn new(token_symbol: impl Into<String>, token: TokenMetadata, receiver: impl Into<String>) -> Self {
        Self {
            token_symbol: token_symbol.into(),
            destination_chain: token.blockchain,
            token,
            receiver: receiver.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PipelineState {
    pub id: String,
    pub operation: PipelineOperation,
    pub stage: PipelineStage,
    /// Stage that was running when the pipeline aborted
    pub aborted_at: Option<PipelineStage>,
    /// Working stages that finished successfully, in order
    pub completed: Vec<PipelineStage>,
    pub amount_in: Decimal,
    pub amount_out: Option<Decimal>,
    pub sender: Option<String>,
    pub receiver: Option<String>,
    pub token_in: String,
    pub token_out: Option<String>,
    pub route: Option<TransferRoute>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl PipelineState {
    pub fn new(operation: PipelineOperation, token_in: impl Into<String>, amount_in: Decimal) -> Self {
        Self {
            id: generate_id(),
            operation,
            stage: PipelineStage::Idle,
            aborted_at: None,
            completed: Vec::new(),
            amount_in,
            amount_out: None,
            sender: None,
            receiver: None,
            token_in: token_in.into(),
            token_out: None,
            route: None,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Move to `next`, recording the current working stage as completed
    pub fn advance(&mut self, next: PipelineStage) -> Result<(), IntentsError> {
        if next == PipelineStage::Aborted || !self.operation.allows(self.stage, next) {
            return Err(IntentsError::internal(format!(
                "{} pipeline cannot move from {} to {}",
                self.operation, self.stage, next
            )));
        }

        if self.stage.is_working() {
            self.completed.push(self.stage);
        }
        self.stage = next;
        if next.is_terminal() {
            self.finished_at = Some(Utc::now());
        }
        Ok(())
    }

    /// Terminate at the current stage; no-op once terminal
    pub fn abort(&mut self) {
        if self.stage.is_terminal() {
            return;
        }
        self.aborted_at = Some(self.stage);
        self.stage = PipelineStage::Aborted;
        self.finished_at = Some(Utc::now());
    }

    pub fn is_complete(&self) -> bool {
        self.stage == PipelineStage::Complete
    }

    /// True once a deposit or swap has gone through
    pub fn has_moved_funds(&self) -> bool {
        self.completed
            .iter()
            .any(|stage| matches!(stage, PipelineStage::Depositing | PipelineStage::Swapping))
    }

    pub fn has_completed(&self, stage: PipelineStage) -> bool {
        self.completed.contains(&stage)
    }
}

/// Terminal failure of an orchestrated operation
#[derive(Debug, Clone)]
pub struct PipelineAbort {
    pub state: PipelineState,
    pub error: IntentsError,
}

impl fmt::Display for PipelineAbort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} aborted at {}: {}",
            self.state.operation,
            self.failed_stage(),
            self.error
        )
    }
}

impl std::error::Error for PipelineAbort {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl PipelineAbort {
    /// Funds were moved by earlier stages and nothing rolled them back
    pub fn is_partial_exposure(&self) -> bool {
        matches!(self.error, IntentsError::PartialExposure { .. })
    }

    pub fn failed_stage(&self) -> PipelineStage {
        self.state.aborted_at.unwrap_or(self.state.stage)
    }
}
