//! # Reinvest Vault
//!
//! A share-based vault over a pooled liquidity token with an auto-compounding
//! strategy. This crate provides:
//!
//! - **Vault Accounting**: NEP-621 style shares minted against deposited assets,
//!   with conservative rounding and NEP-141 share transfers and allowances
//! - **Staking**: every deposit is staked at a MasterChef-style staking venue
//!   and unstaked on demand when shares are redeemed
//! - **Reinvesting**: harvested rewards are swapped into the two constituent
//!   tokens, paired into new liquidity and staked again
//! - **Owner Controls**: pause, emergency withdraw and stray token recovery
//!
//! ## Architecture
//!
//! - [`vault_standards`]: share accounting, conversion math, staged events
//! - [`strategy`]: the reinvestment engine and its reinvest cycle
//! - [`external`]: interfaces of the ledger, staking and exchange venues
//! - [`share_token`]: share balances, supply and allowances
//! - [`config`]: strategy configuration
//! - [`error`]: the error taxonomy shared by every operation
//!
//! Collaborators are reached through the [`external::StrategyHost`] traits and
//! called synchronously. Every mutating operation runs against staged copies
//! of the vault and the host and commits only when all of its steps succeed.

pub mod config;
pub mod error;
pub mod external;
pub mod share_token;
pub mod strategy;
pub mod vault_standards;

#[cfg(test)]
pub mod test_utils;

pub use config::StrategyConfig;
pub use error::{VaultError, VaultResult};
pub use share_token::Allowance;
pub use strategy::{ReinvestReport, ReinvestStage, ReinvestmentEngine, StrategyPosition};
pub use vault_standards::{VaultAccounting, VaultCore, VaultShares};
