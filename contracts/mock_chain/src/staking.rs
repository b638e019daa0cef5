use std::collections::BTreeMap;

use near_sdk::AccountId;
use reinvest_vault::error::{VaultError, VaultResult};
use reinvest_vault::external::{PendingTokens, StakingVenue};

use crate::MockChain;

/// One staking pool: stakes of `lp_token`, rewards paid in `reward_token`.
#[derive(Clone, Debug)]
pub struct Pool {
    pub lp_token: AccountId,
    pub reward_token: AccountId,
    pub(crate) stakes: BTreeMap<AccountId, u128>,
    pub(crate) pending: BTreeMap<AccountId, u128>,
}

impl MockChain {
    pub fn add_pool(&mut self, pool_id: u64, lp_token: AccountId, reward_token: AccountId) {
        self.pools.insert(
            pool_id,
            Pool {
                lp_token,
                reward_token,
                stakes: BTreeMap::new(),
                pending: BTreeMap::new(),
            },
        );
    }

    /// Funds the venue with `amount` reward and makes it claimable by `account_id`.
    pub fn accrue_reward(&mut self, pool_id: u64, account_id: &AccountId, amount: u128) -> VaultResult<()> {
        let staking_id = self.staking_id.clone();
        let reward_token = self.pool(pool_id)?.reward_token.clone();
        self.credit(&reward_token, &staking_id, amount)?;
        let pending = self
            .pool_mut(pool_id)?
            .pending
            .entry(account_id.clone())
            .or_default();
        *pending = pending.checked_add(amount).ok_or(VaultError::ArithmeticOverflow)?;
        Ok(())
    }

    fn pool(&self, pool_id: u64) -> VaultResult<&Pool> {
        self.pools
            .get(&pool_id)
            .ok_or_else(|| VaultError::venue(&self.staking_id, format!("unknown pool {}", pool_id)))
    }

    fn pool_mut(&mut self, pool_id: u64) -> VaultResult<&mut Pool> {
        let staking_id = self.staking_id.clone();
        self.pools
            .get_mut(&pool_id)
            .ok_or_else(|| VaultError::venue(&staking_id, format!("unknown pool {}", pool_id)))
    }

    /// Pays out and clears the pending reward of `account_id`.
    fn pay_pending(&mut self, pool_id: u64, account_id: &AccountId) -> VaultResult<u128> {
        let pool = self.pool_mut(pool_id)?;
        let reward = pool.pending.remove(account_id).unwrap_or(0);
        let reward_token = pool.reward_token.clone();
        if reward > 0 {
            let staking_id = self.staking_id.clone();
            self.move_tokens(&reward_token, &staking_id, account_id, reward)?;
        }
        Ok(reward)
    }
}

impl StakingVenue for MockChain {
    fn deposit(&mut self, account_id: &AccountId, pool_id: u64, amount: u128) -> VaultResult<()> {
        if self.failures.stake_deposit {
            return Err(VaultError::venue(&self.staking_id, "deposit rejected"));
        }
        let reward = self.pay_pending(pool_id, account_id)?;
        if amount > 0 {
            let staking_id = self.staking_id.clone();
            let lp_token = self.pool(pool_id)?.lp_token.clone();
            self.pull(&lp_token, &staking_id, account_id, &staking_id, amount)?;
            let stake = self.pool_mut(pool_id)?.stakes.entry(account_id.clone()).or_default();
            *stake = stake.checked_add(amount).ok_or(VaultError::ArithmeticOverflow)?;
        }
        self.record(format!(
            "staking.deposit pool={} amount={} reward={}",
            pool_id, amount, reward
        ));
        Ok(())
    }

    fn withdraw(&mut self, account_id: &AccountId, pool_id: u64, amount: u128) -> VaultResult<()> {
        if self.failures.stake_withdraw {
            return Err(VaultError::venue(&self.staking_id, "withdraw rejected"));
        }
        let staked = self.user_info(pool_id, account_id);
        if amount > staked {
            return Err(VaultError::venue(
                &self.staking_id,
                format!("withdraw {} above stake {}", amount, staked),
            ));
        }
        let reward = self.pay_pending(pool_id, account_id)?;
        let staking_id = self.staking_id.clone();
        let lp_token = self.pool(pool_id)?.lp_token.clone();
        self.move_tokens(&lp_token, &staking_id, account_id, amount)?;
        self.pool_mut(pool_id)?
            .stakes
            .insert(account_id.clone(), staked - amount);
        self.record(format!(
            "staking.withdraw pool={} amount={} reward={}",
            pool_id, amount, reward
        ));
        Ok(())
    }

    fn user_info(&self, pool_id: u64, account_id: &AccountId) -> u128 {
        self.pools
            .get(&pool_id)
            .and_then(|pool| pool.stakes.get(account_id))
            .copied()
            .unwrap_or(0)
    }

    fn pending_tokens(&self, pool_id: u64, account_id: &AccountId) -> PendingTokens {
        let pending_reward = self
            .pools
            .get(&pool_id)
            .and_then(|pool| pool.pending.get(account_id))
            .copied()
            .unwrap_or(0);
        PendingTokens {
            pending_reward,
            bonus_token: None,
            pending_bonus: 0,
        }
    }

    fn emergency_withdraw(&mut self, account_id: &AccountId, pool_id: u64) -> VaultResult<()> {
        if self.failures.stake_withdraw {
            return Err(VaultError::venue(&self.staking_id, "emergency withdraw rejected"));
        }
        let staking_id = self.staking_id.clone();
        let pool = self.pool_mut(pool_id)?;
        let staked = pool.stakes.remove(account_id).unwrap_or(0);
        // pending rewards are forfeited and stay with the venue
        pool.pending.remove(account_id);
        let lp_token = pool.lp_token.clone();
        self.move_tokens(&lp_token, &staking_id, account_id, staked)?;
        self.record(format!("staking.emergency_withdraw pool={} amount={}", pool_id, staked));
        Ok(())
    }
}
