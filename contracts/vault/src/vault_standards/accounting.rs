use near_contract_standards::fungible_token::metadata::FungibleTokenMetadata;
use near_sdk::{env, near, AccountId};

use super::core::{VaultCore, VaultShares};
use super::events::VaultEvent;
use crate::error::VaultResult;
use crate::external::FungibleLedger;
use crate::share_token::{Allowance, ShareToken};

/// Share state of a vault: who owns how many shares of which asset.
///
/// On its own it is a plain vault that keeps every deposited asset idle in
/// its own ledger account. Strategies compose it and override the
/// [`VaultCore`] hooks.
#[near(serializers = [borsh])]
#[derive(Clone)]
pub struct VaultAccounting {
    /// The vault's own account on the ledger.
    account_id: AccountId,
    /// The underlying asset token.
    asset: AccountId,
    shares: ShareToken,
    metadata: FungibleTokenMetadata,
}

impl VaultAccounting {
    pub fn new(account_id: AccountId, asset: AccountId, metadata: FungibleTokenMetadata) -> Self {
        Self {
            account_id,
            asset,
            shares: ShareToken::new(),
            metadata,
        }
    }

    pub fn account_id(&self) -> &AccountId {
        &self.account_id
    }

    pub fn asset(&self) -> &AccountId {
        &self.asset
    }

    pub fn shares(&self) -> &ShareToken {
        &self.shares
    }

    pub(crate) fn shares_mut(&mut self) -> &mut ShareToken {
        &mut self.shares
    }

    pub fn ft_total_supply(&self) -> u128 {
        self.shares.total_supply()
    }

    pub fn ft_balance_of(&self, account_id: &AccountId) -> u128 {
        self.shares.balance_of(account_id)
    }

    pub fn ft_metadata(&self) -> FungibleTokenMetadata {
        self.metadata.clone()
    }

    pub fn allowance(&self, owner_id: &AccountId, spender_id: &AccountId) -> Allowance {
        self.shares.allowance(owner_id, spender_id)
    }

    /// Sets the allowance of `spender_id` over the caller's shares.
    pub fn approve(&mut self, spender_id: AccountId, allowance: Allowance) {
        let owner_id = env::predecessor_account_id();
        self.shares.approve(&owner_id, &spender_id, allowance);
        env::log_str(&format!(
            "approve owner={} spender={} allowance={:?}",
            owner_id, spender_id, allowance
        ));
    }

    /// Moves `amount` of the caller's shares to `receiver_id`.
    pub fn ft_transfer(&mut self, receiver_id: AccountId, amount: u128) -> VaultResult<()> {
        let sender_id = env::predecessor_account_id();
        self.shares.transfer(&sender_id, &receiver_id, amount)?;
        VaultEvent::SharesTransferred {
            old_owner_id: sender_id,
            new_owner_id: receiver_id,
            amount,
        }
        .emit();
        Ok(())
    }

    /// Moves `amount` of `owner_id`'s shares to `receiver_id`, spending the caller's allowance.
    pub fn ft_transfer_from(
        &mut self,
        owner_id: AccountId,
        receiver_id: AccountId,
        amount: u128,
    ) -> VaultResult<()> {
        let spender_id = env::predecessor_account_id();
        // checked up front so a failed transfer keeps the allowance intact
        let remaining = self
            .shares
            .allowance(&owner_id, &spender_id)
            .spend(&owner_id, &spender_id, amount)?;
        self.shares.transfer(&owner_id, &receiver_id, amount)?;
        self.shares.approve(&owner_id, &spender_id, remaining);
        VaultEvent::SharesTransferred {
            old_owner_id: owner_id,
            new_owner_id: receiver_id,
            amount,
        }
        .emit();
        Ok(())
    }
}

impl VaultShares for VaultAccounting {
    fn accounting(&self) -> &VaultAccounting {
        self
    }

    fn accounting_mut(&mut self) -> &mut VaultAccounting {
        self
    }
}

impl<L: FungibleLedger + Clone> VaultCore<L> for VaultAccounting {}
