use near_sdk::AccountId;
use reinvest_vault::error::{VaultError, VaultResult};
use reinvest_vault::external::FungibleLedger;

use crate::MockChain;

const DEFAULT_DECIMALS: u8 = 18;

impl FungibleLedger for MockChain {
    fn balance_of(&self, token: &AccountId, account_id: &AccountId) -> u128 {
        self.balances
            .get(&(token.clone(), account_id.clone()))
            .copied()
            .unwrap_or(0)
    }

    fn transfer(
        &mut self,
        token: &AccountId,
        sender_id: &AccountId,
        receiver_id: &AccountId,
        amount: u128,
    ) -> VaultResult<()> {
        if self.failures.transfer {
            return Err(VaultError::venue(token, "transfer rejected"));
        }
        self.move_tokens(token, sender_id, receiver_id, amount)
    }

    fn transfer_from(
        &mut self,
        token: &AccountId,
        spender_id: &AccountId,
        owner_id: &AccountId,
        receiver_id: &AccountId,
        amount: u128,
    ) -> VaultResult<()> {
        self.pull(token, spender_id, owner_id, receiver_id, amount)
    }

    fn approve(
        &mut self,
        token: &AccountId,
        owner_id: &AccountId,
        spender_id: &AccountId,
        amount: u128,
    ) -> VaultResult<()> {
        self.allowances
            .insert((token.clone(), owner_id.clone(), spender_id.clone()), amount);
        Ok(())
    }

    fn decimals(&self, token: &AccountId) -> u8 {
        self.decimals.get(token).copied().unwrap_or(DEFAULT_DECIMALS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acc(id: &str) -> AccountId {
        id.parse().unwrap()
    }

    fn chain() -> MockChain {
        MockChain::new(acc("chef.test"), acc("exchange.test"))
    }

    #[test]
    fn transfer_moves_balance() {
        let mut chain = chain();
        chain.mint(&acc("a.test"), &acc("alice.test"), 100);
        chain
            .transfer(&acc("a.test"), &acc("alice.test"), &acc("bob.test"), 30)
            .unwrap();
        assert_eq!(chain.balance_of(&acc("a.test"), &acc("alice.test")), 70);
        assert_eq!(chain.balance_of(&acc("a.test"), &acc("bob.test")), 30);
        assert_eq!(chain.total_supply(&acc("a.test")), 100);
    }

    #[test]
    fn overdraft_is_rejected() {
        let mut chain = chain();
        chain.mint(&acc("a.test"), &acc("alice.test"), 10);
        let err = chain
            .transfer(&acc("a.test"), &acc("alice.test"), &acc("bob.test"), 11)
            .unwrap_err();
        assert!(matches!(err, VaultError::InsufficientBalance { balance: 10, needed: 11, .. }));
    }

    #[test]
    fn transfer_from_spends_allowance() {
        let mut chain = chain();
        let token = acc("a.test");
        chain.mint(&token, &acc("alice.test"), 100);
        chain
            .approve(&token, &acc("alice.test"), &acc("vault.test"), 60)
            .unwrap();

        chain
            .transfer_from(&token, &acc("vault.test"), &acc("alice.test"), &acc("vault.test"), 40)
            .unwrap();
        assert_eq!(chain.balance_of(&token, &acc("vault.test")), 40);

        let err = chain
            .transfer_from(&token, &acc("vault.test"), &acc("alice.test"), &acc("vault.test"), 21)
            .unwrap_err();
        assert!(matches!(err, VaultError::VenueCallFailed { .. }));
        assert_eq!(chain.balance_of(&token, &acc("alice.test")), 60);
    }

    #[test]
    fn failing_transfer_leaves_balances() {
        let mut chain = chain();
        chain.mint(&acc("a.test"), &acc("alice.test"), 10);
        chain.failures.transfer = true;
        assert!(chain
            .transfer(&acc("a.test"), &acc("alice.test"), &acc("bob.test"), 5)
            .is_err());
        assert_eq!(chain.balance_of(&acc("a.test"), &acc("alice.test")), 10);
    }
}
