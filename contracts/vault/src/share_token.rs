//! # Share Token
//!
//! Balances, total supply and spending allowances of the vault's share
//! token. Supply changes only through [`ShareToken::mint`] and
//! [`ShareToken::burn`]; transfers move balance between holders.
//!
//! Every method checks before it writes, so an `Err` leaves the token untouched.

use std::collections::BTreeMap;

use near_sdk::{near, AccountId};

use crate::error::{VaultError, VaultResult};

/// Permission for a spender to move an owner's shares.
#[near(serializers = [borsh, json])]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Allowance {
    /// No limit. Never decremented by spending.
    Unlimited,
    /// At most this many shares; decremented by every spend.
    Bounded(u128),
}

impl Default for Allowance {
    fn default() -> Self {
        Allowance::Bounded(0)
    }
}

impl Allowance {
    /// Remaining allowance after spending `shares`.
    pub fn spend(
        self,
        owner: &AccountId,
        spender: &AccountId,
        shares: u128,
    ) -> VaultResult<Allowance> {
        match self {
            Allowance::Unlimited => Ok(Allowance::Unlimited),
            Allowance::Bounded(allowance) => allowance
                .checked_sub(shares)
                .map(Allowance::Bounded)
                .ok_or_else(|| VaultError::AllowanceExceeded {
                    owner: owner.clone(),
                    spender: spender.clone(),
                    allowance,
                    needed: shares,
                }),
        }
    }
}

#[near(serializers = [borsh])]
#[derive(Clone, Debug, Default)]
pub struct ShareToken {
    total_supply: u128,
    balances: BTreeMap<AccountId, u128>,
    allowances: BTreeMap<(AccountId, AccountId), Allowance>,
}

impl ShareToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_supply(&self) -> u128 {
        self.total_supply
    }

    pub fn balance_of(&self, account_id: &AccountId) -> u128 {
        self.balances.get(account_id).copied().unwrap_or(0)
    }

    pub fn allowance(&self, owner: &AccountId, spender: &AccountId) -> Allowance {
        self.allowances
            .get(&(owner.clone(), spender.clone()))
            .copied()
            .unwrap_or_default()
    }

    pub fn approve(&mut self, owner: &AccountId, spender: &AccountId, allowance: Allowance) {
        let key = (owner.clone(), spender.clone());
        if allowance == Allowance::Bounded(0) {
            self.allowances.remove(&key);
        } else {
            self.allowances.insert(key, allowance);
        }
    }

    /// Consumes `shares` of the allowance `owner` granted to `spender`.
    pub fn spend_allowance(
        &mut self,
        owner: &AccountId,
        spender: &AccountId,
        shares: u128,
    ) -> VaultResult<()> {
        let remaining = self.allowance(owner, spender).spend(owner, spender, shares)?;
        self.approve(owner, spender, remaining);
        Ok(())
    }

    pub fn mint(&mut self, account_id: &AccountId, shares: u128) -> VaultResult<()> {
        let total_supply = self
            .total_supply
            .checked_add(shares)
            .ok_or(VaultError::ArithmeticOverflow)?;
        // balance <= total_supply, so it cannot overflow once supply did not
        let balance = self.balance_of(account_id) + shares;

        self.total_supply = total_supply;
        self.set_balance(account_id, balance);
        Ok(())
    }

    pub fn burn(&mut self, account_id: &AccountId, shares: u128) -> VaultResult<()> {
        let balance = self.debit(account_id, shares)?;
        self.total_supply -= shares;
        self.set_balance(account_id, balance);
        Ok(())
    }

    pub fn transfer(
        &mut self,
        sender_id: &AccountId,
        receiver_id: &AccountId,
        shares: u128,
    ) -> VaultResult<()> {
        let sender_balance = self.debit(sender_id, shares)?;
        if sender_id == receiver_id {
            return Ok(());
        }
        let receiver_balance = self
            .balance_of(receiver_id)
            .checked_add(shares)
            .ok_or(VaultError::ArithmeticOverflow)?;

        self.set_balance(sender_id, sender_balance);
        self.set_balance(receiver_id, receiver_balance);
        Ok(())
    }

    fn debit(&self, account_id: &AccountId, shares: u128) -> VaultResult<u128> {
        let balance = self.balance_of(account_id);
        balance
            .checked_sub(shares)
            .ok_or_else(|| VaultError::InsufficientShares {
                account_id: account_id.clone(),
                balance,
                needed: shares,
            })
    }

    fn set_balance(&mut self, account_id: &AccountId, balance: u128) {
        if balance == 0 {
            self.balances.remove(account_id);
        } else {
            self.balances.insert(account_id.clone(), balance);
        }
    }
}
