use near_sdk::AccountId;

use crate::error::VaultResult;

/// Balances and allowances of every token the vault touches.
///
/// Token contracts are addressed by account id. `sender_id` / `owner_id`
/// parameters stand in for the implicit caller of a token contract.
pub trait FungibleLedger {
    fn balance_of(&self, token: &AccountId, account_id: &AccountId) -> u128;

    /// Moves `amount` of `token` from `sender_id` to `receiver_id`.
    fn transfer(
        &mut self,
        token: &AccountId,
        sender_id: &AccountId,
        receiver_id: &AccountId,
        amount: u128,
    ) -> VaultResult<()>;

    /// Moves `amount` of `owner_id`'s `token` to `receiver_id`, spending the
    /// allowance `owner_id` granted to `spender_id`.
    fn transfer_from(
        &mut self,
        token: &AccountId,
        spender_id: &AccountId,
        owner_id: &AccountId,
        receiver_id: &AccountId,
        amount: u128,
    ) -> VaultResult<()>;

    /// Sets (not increments) the allowance of `spender_id` over `owner_id`'s `token`.
    fn approve(
        &mut self,
        token: &AccountId,
        owner_id: &AccountId,
        spender_id: &AccountId,
        amount: u128,
    ) -> VaultResult<()>;

    fn decimals(&self, token: &AccountId) -> u8;
}
