//! # Internal Vault Operations
//!
//! Helpers behind the public [`VaultCore`](super::VaultCore) API:
//!
//! - `transact`: runs an operation against staged state and commits on success
//! - `assets_to_shares` / `shares_to_assets`: the conversion formulas
//! - `execute_deposit` / `execute_withdrawal`: the ordered asset/share moves

use near_sdk::json_types::U128;
use near_sdk::AccountId;

use super::events::{EventLog, VaultDeposit, VaultEvent, VaultWithdraw};
use super::mul_div::{mul_div, Rounding};
use super::VaultCore;
use crate::error::{VaultError, VaultResult};
use crate::external::FungibleLedger;

/// Runs `op` against clones of `state` and `host`.
///
/// On `Ok` the clones replace the originals and the staged log is emitted;
/// on `Err` both clones and the log are dropped, so the caller observes no
/// change at all.
pub fn transact<S, H, T, F>(state: &mut S, host: &mut H, op: F) -> VaultResult<T>
where
    S: Clone,
    H: Clone,
    F: FnOnce(&mut S, &mut H, &mut EventLog) -> VaultResult<T>,
{
    let mut staged_state = state.clone();
    let mut staged_host = host.clone();
    let mut log = EventLog::default();

    let value = op(&mut staged_state, &mut staged_host, &mut log)?;

    *state = staged_state;
    *host = staged_host;
    log.flush();
    Ok(value)
}

/// `supply == 0 ? assets : assets * supply / total_assets`
pub(crate) fn assets_to_shares<V, H>(
    vault: &V,
    host: &H,
    assets: u128,
    rounding: Rounding,
) -> VaultResult<u128>
where
    V: VaultCore<H>,
    H: FungibleLedger + Clone,
{
    let supply = vault.accounting().ft_total_supply();
    if supply == 0 {
        return Ok(assets);
    }
    mul_div(assets, supply, priced_assets(vault, host)?, rounding)
}

/// `supply == 0 ? shares : shares * total_assets / supply`
pub(crate) fn shares_to_assets<V, H>(
    vault: &V,
    host: &H,
    shares: u128,
    rounding: Rounding,
) -> VaultResult<u128>
where
    V: VaultCore<H>,
    H: FungibleLedger + Clone,
{
    let supply = vault.accounting().ft_total_supply();
    if supply == 0 {
        return Ok(shares);
    }
    mul_div(shares, priced_assets(vault, host)?, supply, rounding)
}

/// `total_assets` of a vault with outstanding shares. Zero assets leave the
/// share price undefined in both directions.
fn priced_assets<V, H>(vault: &V, host: &H) -> VaultResult<u128>
where
    V: VaultCore<H>,
    H: FungibleLedger + Clone,
{
    let total_assets = vault.total_assets(host)?;
    if total_assets == 0 {
        return Err(VaultError::DivisionByZero);
    }
    Ok(total_assets)
}

/// Moves `assets` from `caller` into the vault, then mints `shares`.
///
/// The asset transfer completes before any share exists, so nothing running
/// during the transfer can see new supply that is not yet backed.
#[allow(clippy::too_many_arguments)]
pub(crate) fn execute_deposit<V, H>(
    vault: &mut V,
    host: &mut H,
    log: &mut EventLog,
    caller: &AccountId,
    receiver_id: &AccountId,
    assets: u128,
    shares: u128,
) -> VaultResult<()>
where
    V: VaultCore<H>,
    H: FungibleLedger + Clone,
{
    let vault_id = vault.accounting().account_id().clone();
    let asset = vault.accounting().asset().clone();

    // Interactions: pull the assets
    host.transfer_from(&asset, &vault_id, caller, &vault_id, assets)?;

    // Effects: mint only once the assets are in
    vault.accounting_mut().shares_mut().mint(receiver_id, shares)?;

    log.push(VaultEvent::SharesMinted {
        owner_id: receiver_id.clone(),
        amount: shares,
    });
    log.push(VaultEvent::Deposit(VaultDeposit {
        sender_id: caller.clone(),
        owner_id: receiver_id.clone(),
        assets: U128(assets),
        shares: U128(shares),
    }));

    vault.after_deposit(host, assets, shares)
}

/// Burns `shares` of `owner_id`, then pays `assets` to `receiver_id`.
///
/// 1. **Checks**: spend the caller's allowance when acting for someone else
/// 2. **Hook**: `before_withdraw` makes the assets liquid
/// 3. **Effects**: burn the shares
/// 4. **Interactions**: transfer the assets out
#[allow(clippy::too_many_arguments)]
pub(crate) fn execute_withdrawal<V, H>(
    vault: &mut V,
    host: &mut H,
    log: &mut EventLog,
    caller: &AccountId,
    receiver_id: &AccountId,
    owner_id: &AccountId,
    assets: u128,
    shares: u128,
) -> VaultResult<()>
where
    V: VaultCore<H>,
    H: FungibleLedger + Clone,
{
    if caller != owner_id {
        vault
            .accounting_mut()
            .shares_mut()
            .spend_allowance(owner_id, caller, shares)?;
    }

    vault.before_withdraw(host, assets, shares)?;

    vault.accounting_mut().shares_mut().burn(owner_id, shares)?;

    log.push(VaultEvent::SharesBurned {
        owner_id: owner_id.clone(),
        amount: shares,
    });
    log.push(VaultEvent::Withdraw(VaultWithdraw {
        sender_id: caller.clone(),
        receiver_id: receiver_id.clone(),
        owner_id: owner_id.clone(),
        assets: U128(assets),
        shares: U128(shares),
    }));

    let vault_id = vault.accounting().account_id().clone();
    let asset = vault.accounting().asset().clone();
    host.transfer(&asset, &vault_id, receiver_id, assets)
}
