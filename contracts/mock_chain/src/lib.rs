//! # Mock Chain
//!
//! In-process stand-ins for everything a reinvest vault talks to:
//!
//! - [`ledger`]: fungible token balances and allowances for any number of tokens
//! - [`staking`]: a MasterChef-style staking venue with manually accrued rewards
//! - [`exchange`]: a constant-product router with a 0.3% fee
//!
//! All three live in one [`MockChain`] value so a vault operation can stage
//! and discard the whole world by cloning it. Venue balances are real ledger
//! balances of the venue accounts, so token conservation can be asserted.
//!
//! ## Failure Injection
//!
//! [`Failures`] switches individual calls into returning
//! [`VaultError::VenueCallFailed`], and `swap_haircut_bps` makes swaps
//! deliver less than their quote, simulating a price move between quote
//! and execution. `execution_delay_ns` does the same for deadlines.

use std::collections::BTreeMap;

use near_sdk::AccountId;
use reinvest_vault::error::{VaultError, VaultResult};

pub mod exchange;
pub mod ledger;
pub mod staking;

pub use exchange::Pair;
pub use staking::Pool;

/// Calls that can be switched into failing.
#[derive(Clone, Debug, Default)]
pub struct Failures {
    /// `FungibleLedger::transfer`. Allowance-based pulls are not affected.
    pub transfer: bool,
    pub stake_deposit: bool,
    pub stake_withdraw: bool,
    pub swap: bool,
    pub add_liquidity: bool,
}

/// Token ledger, staking venue and exchange venue in one cloneable value.
#[derive(Clone, Debug)]
pub struct MockChain {
    pub staking_id: AccountId,
    pub exchange_id: AccountId,
    pub(crate) balances: BTreeMap<(AccountId, AccountId), u128>,
    pub(crate) allowances: BTreeMap<(AccountId, AccountId, AccountId), u128>,
    pub(crate) decimals: BTreeMap<AccountId, u8>,
    pub(crate) pools: BTreeMap<u64, Pool>,
    pub(crate) pairs: Vec<Pair>,
    pub failures: Failures,
    /// Basis points shaved off every swap output after quoting.
    pub swap_haircut_bps: u16,
    /// How long after the calling block venue calls execute. Deadlines are
    /// checked against `block_timestamp + execution_delay_ns`.
    pub execution_delay_ns: u64,
    /// Venue calls in the order they succeeded, e.g. `staking.deposit pool=0 amount=0`.
    pub calls: Vec<String>,
}

impl MockChain {
    pub fn new(staking_id: AccountId, exchange_id: AccountId) -> Self {
        Self {
            staking_id,
            exchange_id,
            balances: BTreeMap::new(),
            allowances: BTreeMap::new(),
            decimals: BTreeMap::new(),
            pools: BTreeMap::new(),
            pairs: Vec::new(),
            failures: Failures::default(),
            swap_haircut_bps: 0,
            execution_delay_ns: 0,
            calls: Vec::new(),
        }
    }

    /// Creates `amount` of `token` out of thin air for `account_id`.
    pub fn mint(&mut self, token: &AccountId, account_id: &AccountId, amount: u128) {
        *self
            .balances
            .entry((token.clone(), account_id.clone()))
            .or_default() += amount;
    }

    pub fn set_decimals(&mut self, token: &AccountId, decimals: u8) {
        self.decimals.insert(token.clone(), decimals);
    }

    /// Sum of every account's balance of `token`.
    pub fn total_supply(&self, token: &AccountId) -> u128 {
        self.balances
            .iter()
            .filter(|((t, _), _)| t == token)
            .map(|(_, amount)| *amount)
            .sum()
    }

    pub(crate) fn debit(&mut self, token: &AccountId, account_id: &AccountId, amount: u128) -> VaultResult<()> {
        let key = (token.clone(), account_id.clone());
        let balance = self.balances.get(&key).copied().unwrap_or(0);
        if balance < amount {
            return Err(VaultError::InsufficientBalance {
                token: token.clone(),
                account_id: account_id.clone(),
                balance,
                needed: amount,
            });
        }
        self.balances.insert(key, balance - amount);
        Ok(())
    }

    pub(crate) fn credit(&mut self, token: &AccountId, account_id: &AccountId, amount: u128) -> VaultResult<()> {
        let entry = self
            .balances
            .entry((token.clone(), account_id.clone()))
            .or_default();
        *entry = entry.checked_add(amount).ok_or(VaultError::ArithmeticOverflow)?;
        Ok(())
    }

    /// Ledger move without failure injection, used by the venues internally.
    pub(crate) fn move_tokens(
        &mut self,
        token: &AccountId,
        from: &AccountId,
        to: &AccountId,
        amount: u128,
    ) -> VaultResult<()> {
        self.debit(token, from, amount)?;
        self.credit(token, to, amount)
    }

    /// Spends `spender_id`'s allowance over `owner_id` and moves the tokens.
    pub(crate) fn pull(
        &mut self,
        token: &AccountId,
        spender_id: &AccountId,
        owner_id: &AccountId,
        receiver_id: &AccountId,
        amount: u128,
    ) -> VaultResult<()> {
        let key = (token.clone(), owner_id.clone(), spender_id.clone());
        let allowance = self.allowances.get(&key).copied().unwrap_or(0);
        if allowance < amount {
            return Err(VaultError::venue(
                token,
                format!("allowance {} of {} below {}", allowance, spender_id, amount),
            ));
        }
        self.move_tokens(token, owner_id, receiver_id, amount)?;
        self.allowances.insert(key, allowance - amount);
        Ok(())
    }

    pub(crate) fn record(&mut self, call: String) {
        self.calls.push(call);
    }
}
