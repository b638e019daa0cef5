//! # Reinvestment Strategy
//!
//! A vault that stakes every deposit at a MasterChef-style staking venue and
//! compounds the venue's reward back into the pooled asset.
//!
//! ## Module Organization
//!
//! - [`engine`]: `ReinvestmentEngine`, the vault hooks and position queries
//! - [`cycle`]: the staged reinvest pipeline and its stage machine
//! - [`admin`]: owner operations (reinvest, emergency withdraw, pause) and token recovery

pub mod admin;
pub mod cycle;
pub mod engine;

pub use cycle::{ReinvestReport, ReinvestStage};
pub use engine::{ReinvestmentEngine, StrategyPosition, StrategyPositionView};
