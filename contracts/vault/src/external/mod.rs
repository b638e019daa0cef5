//! # External Collaborators
//!
//! Interfaces the vault consumes but does not implement:
//!
//! - [`ledger`]: the fungible token ledger holding the asset, reward and
//!   constituent token balances
//! - [`staking`]: the yield-bearing staking venue
//! - [`exchange`]: the swap / liquidity venue
//!
//! Every mutating call is synchronous and either succeeds or returns an
//! error without side effects visible to the vault.

pub mod exchange;
pub mod ledger;
pub mod staking;

pub use exchange::{AddLiquidity, ExchangeVenue, LiquidityAdded};
pub use ledger::FungibleLedger;
pub use staking::{PendingTokens, StakingVenue};

/// Everything the reinvestment strategy talks to.
pub trait StrategyHost: FungibleLedger + StakingVenue + ExchangeVenue {}

impl<T: FungibleLedger + StakingVenue + ExchangeVenue> StrategyHost for T {}
