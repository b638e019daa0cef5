//! # Vault Standards Module
//!
//! NEP-621 style tokenized vault: shares issued against a fungible asset.
//!
//! ## Module Organization
//!
//! - [`core`]: `VaultShares` / `VaultCore` traits with default implementations
//! - [`accounting`]: `VaultAccounting`, the share state every vault composes
//! - [`events`]: staged NEP-297 event logging
//! - [`internal`]: conversion formulas, ordered deposit/withdraw execution, staging
//! - [`mul_div`]: 256-bit multiplication and division with rounding

pub mod accounting;
pub mod core;
pub mod events;
pub mod internal;
pub mod mul_div;

pub use accounting::VaultAccounting;
pub use core::*;
