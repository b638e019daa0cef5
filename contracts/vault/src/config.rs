//! # Strategy Configuration
//!
//! Everything the reinvestment engine needs to know about its environment,
//! fixed at construction. Typically loaded from the JSON init arguments:
//!
//! ```json
//! {
//!   "owner_id": "owner.near",
//!   "asset": "lp.exchange.near",
//!   "token0": "usdc.near",
//!   "token1": "wnear.near",
//!   "reward_token": "reward.near",
//!   "exchange_id": "exchange.near",
//!   "staking_id": "chef.near",
//!   "pool_id": 3,
//!   "metadata": { "spec": "ft-1.0.0", "name": "LP Vault", "symbol": "vLP", "decimals": 18 }
//! }
//! ```

use near_contract_standards::fungible_token::metadata::{FungibleTokenMetadata, FT_METADATA_SPEC};
use near_sdk::borsh::{BorshDeserialize, BorshSerialize};
use near_sdk::serde::{Deserialize, Serialize};
use near_sdk::AccountId;

use crate::error::{VaultError, VaultResult};

/// Default swap slippage tolerance: 5%, i.e. accept 95% of the quote.
pub const DEFAULT_SLIPPAGE_BPS: u16 = 500;

/// Basis-point denominator.
pub const MAX_BPS: u16 = 10_000;

#[derive(BorshSerialize, BorshDeserialize, Serialize, Deserialize, Clone)]
#[serde(crate = "near_sdk::serde")]
#[borsh(crate = "near_sdk::borsh")]
pub struct StrategyConfig {
    /// The only account allowed to run owner-gated operations.
    pub owner_id: AccountId,
    /// The pooled asset (liquidity token of `token0`/`token1`) depositors provide.
    pub asset: AccountId,
    pub token0: AccountId,
    pub token1: AccountId,
    /// Token paid out by the staking venue.
    pub reward_token: AccountId,
    pub exchange_id: AccountId,
    pub staking_id: AccountId,
    /// Pool at the staking venue that accepts `asset`.
    pub pool_id: u64,
    /// Max accepted shortfall of a swap against its quote.
    #[serde(default = "default_slippage_bps")]
    pub slippage_bps: u16,
    /// Added to the current block timestamp to form swap deadlines. 0 means
    /// "current time", which never expires within the executing block.
    #[serde(default)]
    pub swap_deadline_ns: u64,
    /// Restricts `recover_token` to the owner. When false anyone may sweep.
    #[serde(default = "default_restrict_recovery")]
    pub restrict_recovery: bool,
    /// Metadata of the share token.
    pub metadata: FungibleTokenMetadata,
}

fn default_slippage_bps() -> u16 {
    DEFAULT_SLIPPAGE_BPS
}

fn default_restrict_recovery() -> bool {
    true
}

impl StrategyConfig {
    pub fn from_json(json: &str) -> VaultResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|err| VaultError::InvalidConfig(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> VaultResult<()> {
        if self.slippage_bps > MAX_BPS {
            return Err(VaultError::InvalidConfig(format!(
                "slippage_bps {} above {}",
                self.slippage_bps, MAX_BPS
            )));
        }
        if self.token0 == self.token1 {
            return Err(VaultError::InvalidConfig(
                "token0 and token1 must differ".to_string(),
            ));
        }
        if self.asset == self.reward_token {
            return Err(VaultError::InvalidConfig(
                "asset cannot be the reward token".to_string(),
            ));
        }
        if self.metadata.spec != FT_METADATA_SPEC {
            return Err(VaultError::InvalidConfig(format!(
                "unsupported metadata spec {}",
                self.metadata.spec
            )));
        }
        Ok(())
    }

    /// Absolute deadline for venue calls issued at `now` (ns).
    pub fn deadline(&self, now: u64) -> u64 {
        now.saturating_add(self.swap_deadline_ns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // `unwrap_err` needs `Debug`; `FungibleTokenMetadata` has none, so no derive.
    impl std::fmt::Debug for StrategyConfig {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("StrategyConfig").finish_non_exhaustive()
        }
    }

    const CONFIG: &str = r#"{
        "owner_id": "owner.test",
        "asset": "lp.test",
        "token0": "usdc.test",
        "token1": "wnear.test",
        "reward_token": "reward.test",
        "exchange_id": "exchange.test",
        "staking_id": "chef.test",
        "pool_id": 3,
        "metadata": {
            "spec": "ft-1.0.0",
            "name": "LP Vault Shares",
            "symbol": "vLP",
            "icon": null,
            "reference": null,
            "reference_hash": null,
            "decimals": 18
        }
    }"#;

    #[test]
    fn json_defaults_apply() {
        let config = StrategyConfig::from_json(CONFIG).unwrap();
        assert_eq!(config.pool_id, 3);
        assert_eq!(config.slippage_bps, DEFAULT_SLIPPAGE_BPS);
        assert_eq!(config.swap_deadline_ns, 0);
        assert!(config.restrict_recovery);
        assert_eq!(config.deadline(42), 42);
    }

    #[test]
    fn slippage_above_hundred_percent_is_rejected() {
        let json = CONFIG.replace(r#""pool_id": 3,"#, r#""pool_id": 3, "slippage_bps": 10001,"#);
        let err = StrategyConfig::from_json(&json).unwrap_err();
        assert!(matches!(err, VaultError::InvalidConfig(msg) if msg.contains("slippage_bps")));
    }

    #[test]
    fn identical_constituents_are_rejected() {
        let json = CONFIG.replace("wnear.test", "usdc.test");
        assert!(matches!(
            StrategyConfig::from_json(&json),
            Err(VaultError::InvalidConfig(_))
        ));
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        assert!(matches!(
            StrategyConfig::from_json("{"),
            Err(VaultError::InvalidConfig(_))
        ));
    }

    #[test]
    fn deadline_saturates() {
        let mut config = StrategyConfig::from_json(CONFIG).unwrap();
        config.swap_deadline_ns = 60_000_000_000;
        assert_eq!(config.deadline(1_000), 60_000_001_000);
        assert_eq!(config.deadline(u64::MAX), u64::MAX);
    }
}
