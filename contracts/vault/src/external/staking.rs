use near_sdk::AccountId;

use crate::error::VaultResult;

/// Rewards accrued by an account in a staking pool, not yet claimed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PendingTokens {
    /// Pending amount of the venue's primary reward token.
    pub pending_reward: u128,
    /// Optional secondary reward token of the pool.
    pub bonus_token: Option<AccountId>,
    pub pending_bonus: u128,
}

/// A MasterChef-style staking venue.
///
/// Both `deposit` and `withdraw` pay out the account's pending reward before
/// moving stake, so `deposit(pool_id, 0)` is a pure harvest. Stake is pulled
/// with `transfer_from`, so the account must approve the venue first.
pub trait StakingVenue {
    fn deposit(&mut self, account_id: &AccountId, pool_id: u64, amount: u128) -> VaultResult<()>;

    fn withdraw(&mut self, account_id: &AccountId, pool_id: u64, amount: u128) -> VaultResult<()>;

    /// Amount currently staked by `account_id`.
    fn user_info(&self, pool_id: u64, account_id: &AccountId) -> u128;

    fn pending_tokens(&self, pool_id: u64, account_id: &AccountId) -> PendingTokens;

    /// Returns the full stake to `account_id`, forfeiting pending rewards.
    fn emergency_withdraw(&mut self, account_id: &AccountId, pool_id: u64) -> VaultResult<()>;
}
