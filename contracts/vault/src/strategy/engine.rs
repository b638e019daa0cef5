use near_sdk::serde::Serialize;
use near_sdk::{env, near, AccountId};
use schemars::JsonSchema;

use crate::config::StrategyConfig;
use crate::error::{VaultError, VaultResult};
use crate::external::{FungibleLedger, StakingVenue, StrategyHost};
use crate::vault_standards::{VaultAccounting, VaultCore, VaultShares};

/// Auto-compounding vault: deposits are staked at the staking venue and the
/// rewards are periodically turned back into staked asset by
/// [`reinvest`](ReinvestmentEngine::reinvest).
#[near(serializers = [borsh])]
#[derive(Clone)]
pub struct ReinvestmentEngine {
    pub(crate) vault: VaultAccounting,
    pub(crate) config: StrategyConfig,
    /// Liquidity staked by reinvest cycles since the last emergency withdraw.
    pub(crate) total_deposits: u128,
    /// Blocks deposits and reinvesting; withdrawals stay open.
    pub(crate) is_paused: bool,
}

/// Snapshot of the strategy's position at the staking venue.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StrategyPosition {
    pub total_deposits: u128,
    /// Venue-reported stake of the vault.
    pub staked: u128,
    /// Claimable reward plus reward tokens already held.
    pub pending_reward: u128,
}

#[derive(Serialize, JsonSchema, Clone)]
#[serde(crate = "near_sdk::serde")]
pub struct StrategyPositionView {
    pub total_deposits: String,
    pub staked: String,
    pub pending_reward: String,
}

impl From<StrategyPosition> for StrategyPositionView {
    fn from(value: StrategyPosition) -> Self {
        StrategyPositionView {
            total_deposits: value.total_deposits.to_string(),
            staked: value.staked.to_string(),
            pending_reward: value.pending_reward.to_string(),
        }
    }
}

impl ReinvestmentEngine {
    /// Creates the engine for the current account.
    ///
    /// # Errors
    ///
    /// [`VaultError::InvalidConfig`] if `config` does not validate.
    pub fn new(config: StrategyConfig) -> VaultResult<Self> {
        config.validate()?;
        let vault = VaultAccounting::new(
            env::current_account_id(),
            config.asset.clone(),
            config.metadata.clone(),
        );

        env::log_str(&format!(
            "strategy_init vault={} asset={} staking={} pool_id={} owner={}",
            vault.account_id(),
            config.asset,
            config.staking_id,
            config.pool_id,
            config.owner_id
        ));

        Ok(Self {
            vault,
            config,
            total_deposits: 0,
            is_paused: false,
        })
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    pub fn total_deposits(&self) -> u128 {
        self.total_deposits
    }

    pub fn is_paused(&self) -> bool {
        self.is_paused
    }

    pub(crate) fn vault_id(&self) -> &AccountId {
        self.vault.account_id()
    }

    /// Fails unless the predecessor is the configured owner.
    pub fn require_owner(&self) -> VaultResult<()> {
        let caller = env::predecessor_account_id();
        if caller != self.config.owner_id {
            return Err(VaultError::UnauthorizedCaller { caller });
        }
        Ok(())
    }

    pub fn require_not_paused(&self) -> VaultResult<()> {
        if self.is_paused {
            return Err(VaultError::Paused);
        }
        Ok(())
    }

    /// Amount the venue reports as staked by the vault.
    pub fn staked_amount<H: StakingVenue>(&self, host: &H) -> u128 {
        host.user_info(self.config.pool_id, self.vault_id())
    }

    /// Reward claimable at the venue plus reward tokens the vault already holds.
    pub fn pending_reward_amount<H: StrategyHost>(&self, host: &H) -> VaultResult<u128> {
        let pending = host
            .pending_tokens(self.config.pool_id, self.vault_id())
            .pending_reward;
        let held = host.balance_of(&self.config.reward_token, self.vault_id());
        pending.checked_add(held).ok_or(VaultError::ArithmeticOverflow)
    }

    pub fn position<H: StrategyHost>(&self, host: &H) -> VaultResult<StrategyPosition> {
        Ok(StrategyPosition {
            total_deposits: self.total_deposits,
            staked: self.staked_amount(host),
            pending_reward: self.pending_reward_amount(host)?,
        })
    }

    pub fn position_view<H: StrategyHost>(&self, host: &H) -> VaultResult<StrategyPositionView> {
        self.position(host).map(StrategyPositionView::from)
    }

    /// Approves the staking venue for `amount` and stakes it.
    pub(crate) fn stake<H: StrategyHost>(&self, host: &mut H, amount: u128) -> VaultResult<()> {
        if amount == 0 {
            return Err(VaultError::ZeroAmount);
        }
        host.approve(
            &self.config.asset,
            self.vault_id(),
            &self.config.staking_id,
            amount,
        )?;
        host.deposit(self.vault_id(), self.config.pool_id, amount)
    }
}

impl VaultShares for ReinvestmentEngine {
    fn accounting(&self) -> &VaultAccounting {
        &self.vault
    }

    fn accounting_mut(&mut self) -> &mut VaultAccounting {
        &mut self.vault
    }
}

impl<H: StrategyHost + Clone> VaultCore<H> for ReinvestmentEngine {
    /// Idle asset balance plus the live stake at the venue.
    fn total_assets(&self, host: &H) -> VaultResult<u128> {
        let idle = host.balance_of(&self.config.asset, self.vault_id());
        idle.checked_add(self.staked_amount(host))
            .ok_or(VaultError::ArithmeticOverflow)
    }

    /// Stakes freshly deposited assets.
    fn after_deposit(&mut self, host: &mut H, assets: u128, _shares: u128) -> VaultResult<()> {
        self.require_not_paused()?;
        if assets == 0 {
            return Ok(());
        }
        self.stake(host, assets)
    }

    /// Unstakes whatever part of `assets` is not already idle in the vault.
    fn before_withdraw(&mut self, host: &mut H, assets: u128, _shares: u128) -> VaultResult<()> {
        let idle = host.balance_of(&self.config.asset, self.vault_id());
        let shortfall = assets.saturating_sub(idle);
        if shortfall == 0 {
            return Ok(());
        }
        host.withdraw(self.vault_id(), self.config.pool_id, shortfall)
    }
}
