use near_sdk::AccountId;

use crate::error::VaultResult;

/// Arguments of [`ExchangeVenue::add_liquidity`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddLiquidity {
    pub token_a: AccountId,
    pub token_b: AccountId,
    pub amount_a_desired: u128,
    pub amount_b_desired: u128,
    pub amount_a_min: u128,
    pub amount_b_min: u128,
    /// Receiver of the minted liquidity token.
    pub to: AccountId,
    /// Block timestamp (ns) after which the call must fail.
    pub deadline: u64,
}

/// Result of [`ExchangeVenue::add_liquidity`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LiquidityAdded {
    pub used_a: u128,
    pub used_b: u128,
    pub liquidity: u128,
}

/// A router-style exchange venue (constant-product pairs).
///
/// Inputs are pulled from `caller` with `transfer_from`, so the caller must
/// approve the venue for each input token.
pub trait ExchangeVenue {
    /// Quoted output of every hop along `path`, starting with `amount_in`.
    fn get_amounts_out(&self, amount_in: u128, path: &[AccountId]) -> VaultResult<Vec<u128>>;

    /// Swaps exactly `amount_in` of `path[0]` for at least `amount_out_min`
    /// of the last token in `path`, delivered to `to`.
    fn swap_exact_tokens_for_tokens(
        &mut self,
        caller: &AccountId,
        amount_in: u128,
        amount_out_min: u128,
        path: &[AccountId],
        to: &AccountId,
        deadline: u64,
    ) -> VaultResult<Vec<u128>>;

    fn add_liquidity(&mut self, caller: &AccountId, request: AddLiquidity) -> VaultResult<LiquidityAdded>;
}
