//! # Vault Errors
//!
//! Every fallible vault operation returns [`VaultResult`]. An error aborts the
//! operation before anything is committed: staged share balances, staged
//! ledger/venue state and staged events are all discarded.

use near_sdk::AccountId;
use thiserror::Error;

/// Result alias used across the crate.
pub type VaultResult<T> = Result<T, VaultError>;

/// Failure taxonomy for vault accounting and the reinvestment strategy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VaultError {
    // ============================================================
    // Accounting
    // ============================================================
    /// Deposit would mint zero shares (dust deposit).
    #[error("deposit of {assets} assets mints zero shares")]
    ZeroShares { assets: u128 },

    /// Redeem would pay out zero assets.
    #[error("redeem of {shares} shares returns zero assets")]
    ZeroAssets { shares: u128 },

    /// Spender moved more shares than it was allowed to.
    #[error("allowance of {spender} over {owner} is {allowance}, needs {needed}")]
    AllowanceExceeded {
        owner: AccountId,
        spender: AccountId,
        allowance: u128,
        needed: u128,
    },

    /// Share burn or transfer larger than the holder's balance.
    #[error("{account_id} holds {balance} shares, needs {needed}")]
    InsufficientShares {
        account_id: AccountId,
        balance: u128,
        needed: u128,
    },

    /// Withdraw of more assets than the owner's shares are worth.
    #[error("withdraw of {assets} exceeds max withdraw {max} for {owner}")]
    ExceededMaxWithdraw {
        owner: AccountId,
        assets: u128,
        max: u128,
    },

    /// Redeem of more shares than the owner holds.
    #[error("redeem of {shares} exceeds max redeem {max} for {owner}")]
    ExceededMaxRedeem {
        owner: AccountId,
        shares: u128,
        max: u128,
    },

    // ============================================================
    // Arithmetic
    // ============================================================
    /// Shares are outstanding but the vault reports no assets.
    #[error("division by zero in share conversion")]
    DivisionByZero,

    #[error("arithmetic overflow")]
    ArithmeticOverflow,

    // ============================================================
    // Access and lifecycle
    // ============================================================
    /// Owner-gated operation called by someone else.
    #[error("caller {caller} is not the owner")]
    UnauthorizedCaller { caller: AccountId },

    #[error("strategy is paused")]
    Paused,

    #[error("amount must be positive")]
    ZeroAmount,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // ============================================================
    // External collaborators
    // ============================================================
    /// Swap output below the slippage-adjusted minimum.
    #[error("swap output {actual} below minimum {min_out}")]
    SlippageExceeded { min_out: u128, actual: u128 },

    /// Ledger balance too small for a transfer.
    #[error("{account_id} holds {balance} of {token}, needs {needed}")]
    InsufficientBalance {
        token: AccountId,
        account_id: AccountId,
        balance: u128,
        needed: u128,
    },

    /// A staking or exchange venue rejected the call.
    #[error("{venue} call failed: {reason}")]
    VenueCallFailed { venue: AccountId, reason: String },
}

impl VaultError {
    pub fn venue(venue: &AccountId, reason: impl Into<String>) -> Self {
        Self::VenueCallFailed {
            venue: venue.clone(),
            reason: reason.into(),
        }
    }
}
