use near_sdk::{env, AccountId};

use super::internal;
use super::mul_div::Rounding;
use super::VaultAccounting;
use crate::error::{VaultError, VaultResult};
use crate::external::FungibleLedger;

/// Host-independent part of a vault: its share accounting state.
pub trait VaultShares {
    fn accounting(&self) -> &VaultAccounting;
    fn accounting_mut(&mut self) -> &mut VaultAccounting;

    fn asset(&self) -> AccountId {
        self.accounting().asset().clone()
    }

    fn max_deposit(&self, _receiver_id: &AccountId) -> u128 {
        u128::MAX
    }

    fn max_mint(&self, _receiver_id: &AccountId) -> u128 {
        u128::MAX
    }

    fn max_redeem(&self, owner_id: &AccountId) -> u128 {
        self.accounting().ft_balance_of(owner_id)
    }
}

/// Tokenized vault over a ledger host `H`.
///
/// Implementors choose how assets are counted and may hook into deposits and
/// withdrawals; everything else (conversion math, rounding, ordering of
/// transfers against mint/burn, allowance spending, events) is provided.
///
/// Mutating operations are all-or-nothing: they run against staged copies of
/// the vault and the host and commit only when every step succeeded.
pub trait VaultCore<H: FungibleLedger + Clone>: VaultShares + Clone {
    /// Assets under management. Defaults to the vault's own asset balance.
    fn total_assets(&self, host: &H) -> VaultResult<u128> {
        let accounting = self.accounting();
        Ok(host.balance_of(accounting.asset(), accounting.account_id()))
    }

    /// Runs after shares were minted for freshly received assets.
    fn after_deposit(&mut self, _host: &mut H, _assets: u128, _shares: u128) -> VaultResult<()> {
        Ok(())
    }

    /// Runs before shares are burned and assets leave the vault.
    fn before_withdraw(&mut self, _host: &mut H, _assets: u128, _shares: u128) -> VaultResult<()> {
        Ok(())
    }

    fn decimals(&self, host: &H) -> u8 {
        host.decimals(self.accounting().asset())
    }

    fn convert_to_shares(&self, host: &H, assets: u128) -> VaultResult<u128> {
        internal::assets_to_shares(self, host, assets, Rounding::Down)
    }

    fn convert_to_assets(&self, host: &H, shares: u128) -> VaultResult<u128> {
        internal::shares_to_assets(self, host, shares, Rounding::Down)
    }

    fn preview_deposit(&self, host: &H, assets: u128) -> VaultResult<u128> {
        internal::assets_to_shares(self, host, assets, Rounding::Down)
    }

    fn preview_mint(&self, host: &H, shares: u128) -> VaultResult<u128> {
        internal::shares_to_assets(self, host, shares, Rounding::Up)
    }

    fn preview_withdraw(&self, host: &H, assets: u128) -> VaultResult<u128> {
        internal::assets_to_shares(self, host, assets, Rounding::Up)
    }

    fn preview_redeem(&self, host: &H, shares: u128) -> VaultResult<u128> {
        internal::shares_to_assets(self, host, shares, Rounding::Down)
    }

    fn max_withdraw(&self, host: &H, owner_id: &AccountId) -> VaultResult<u128> {
        self.convert_to_assets(host, self.accounting().ft_balance_of(owner_id))
    }

    /// Pulls `assets` from the caller and mints shares to `receiver_id`.
    ///
    /// # Errors
    ///
    /// [`VaultError::ZeroShares`] if the deposit is too small to be worth a share.
    fn deposit(&mut self, host: &mut H, assets: u128, receiver_id: AccountId) -> VaultResult<u128> {
        let caller = env::predecessor_account_id();
        internal::transact(self, host, |vault, host, log| {
            let shares = vault.preview_deposit(host, assets)?;
            if shares == 0 {
                return Err(VaultError::ZeroShares { assets });
            }
            internal::execute_deposit(vault, host, log, &caller, &receiver_id, assets, shares)?;
            Ok(shares)
        })
    }

    /// Mints exactly `shares` to `receiver_id`, pulling the (rounded up) asset cost from the caller.
    fn mint(&mut self, host: &mut H, shares: u128, receiver_id: AccountId) -> VaultResult<u128> {
        let caller = env::predecessor_account_id();
        internal::transact(self, host, |vault, host, log| {
            let assets = vault.preview_mint(host, shares)?;
            internal::execute_deposit(vault, host, log, &caller, &receiver_id, assets, shares)?;
            Ok(assets)
        })
    }

    /// Pays exactly `assets` to `receiver_id`, burning the (rounded up) share cost from `owner_id`.
    fn withdraw(
        &mut self,
        host: &mut H,
        assets: u128,
        receiver_id: AccountId,
        owner_id: AccountId,
    ) -> VaultResult<u128> {
        let caller = env::predecessor_account_id();
        internal::transact(self, host, |vault, host, log| {
            let max = vault.max_withdraw(host, &owner_id)?;
            if assets > max {
                return Err(VaultError::ExceededMaxWithdraw {
                    owner: owner_id.clone(),
                    assets,
                    max,
                });
            }
            let shares = vault.preview_withdraw(host, assets)?;
            internal::execute_withdrawal(
                vault,
                host,
                log,
                &caller,
                &receiver_id,
                &owner_id,
                assets,
                shares,
            )?;
            Ok(shares)
        })
    }

    /// Burns exactly `shares` from `owner_id` and pays the (rounded down) assets to `receiver_id`.
    ///
    /// # Errors
    ///
    /// [`VaultError::ZeroAssets`] if the shares are worth nothing after rounding.
    fn redeem(
        &mut self,
        host: &mut H,
        shares: u128,
        receiver_id: AccountId,
        owner_id: AccountId,
    ) -> VaultResult<u128> {
        let caller = env::predecessor_account_id();
        internal::transact(self, host, |vault, host, log| {
            let max = vault.max_redeem(&owner_id);
            if shares > max {
                return Err(VaultError::ExceededMaxRedeem {
                    owner: owner_id.clone(),
                    shares,
                    max,
                });
            }
            let assets = vault.preview_redeem(host, shares)?;
            if assets == 0 {
                return Err(VaultError::ZeroAssets { shares });
            }
            internal::execute_withdrawal(
                vault,
                host,
                log,
                &caller,
                &receiver_id,
                &owner_id,
                assets,
                shares,
            )?;
            Ok(assets)
        })
    }
}
