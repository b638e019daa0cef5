//! # Test Utilities
//!
//! Helpers for unit tests: NEAR VM context setup and a minimal in-memory
//! ledger for exercising the plain vault without any venues.
//!
//! ## Modules
//!
//! - [`helpers`]: context initialization and account shorthands
//! - [`builders`]: builder for a funded plain vault, a default strategy config

/// Helper functions for test context initialization.
pub mod helpers {
    use near_sdk::test_utils::VMContextBuilder;
    use near_sdk::{testing_env, AccountId};

    /// Account id of the vault under test.
    pub const VAULT: &str = "vault.test";

    pub fn acc(id: &str) -> AccountId {
        id.parse().unwrap()
    }

    /// Initializes the NEAR VM context so that `predecessor` is the caller.
    ///
    /// ```ignore
    /// init_ctx("alice.test");
    /// vault.deposit(&mut ledger, 100, acc("alice.test"))?;
    /// ```
    pub fn init_ctx(predecessor: &str) {
        init_ctx_at(predecessor, 0);
    }

    /// Same as [`init_ctx`] with an explicit block timestamp in nanoseconds.
    pub fn init_ctx_at(predecessor: &str, block_timestamp: u64) {
        let mut builder = VMContextBuilder::new();
        builder
            .current_account_id(acc(VAULT))
            .predecessor_account_id(acc(predecessor))
            .block_timestamp(block_timestamp);
        testing_env!(builder.build());
    }
}

/// In-memory ledger and vault builder.
pub mod builders {
    use std::collections::BTreeMap;

    use near_contract_standards::fungible_token::metadata::{
        FungibleTokenMetadata, FT_METADATA_SPEC,
    };
    use near_sdk::AccountId;

    use super::helpers::{acc, init_ctx, VAULT};
    use crate::config::{StrategyConfig, DEFAULT_SLIPPAGE_BPS};
    use crate::error::{VaultError, VaultResult};
    use crate::external::FungibleLedger;
    use crate::vault_standards::VaultAccounting;

    pub fn share_metadata() -> FungibleTokenMetadata {
        FungibleTokenMetadata {
            spec: FT_METADATA_SPEC.to_string(),
            name: "LP Vault Shares".to_string(),
            symbol: "vLP".to_string(),
            icon: None,
            reference: None,
            reference_hash: None,
            decimals: 18,
        }
    }

    /// Strategy over the `lp.test` pair of `usdc.test` / `wnear.test`, owned by `owner.test`.
    pub fn strategy_config() -> StrategyConfig {
        StrategyConfig {
            owner_id: acc("owner.test"),
            asset: acc("lp.test"),
            token0: acc("usdc.test"),
            token1: acc("wnear.test"),
            reward_token: acc("reward.test"),
            exchange_id: acc("exchange.test"),
            staking_id: acc("chef.test"),
            pool_id: 0,
            slippage_bps: DEFAULT_SLIPPAGE_BPS,
            swap_deadline_ns: 0,
            restrict_recovery: true,
            metadata: share_metadata(),
        }
    }

    /// Token balances and allowances keyed by token account.
    #[derive(Clone, Debug, Default)]
    pub struct TestLedger {
        pub balances: BTreeMap<(AccountId, AccountId), u128>,
        pub allowances: BTreeMap<(AccountId, AccountId, AccountId), u128>,
        /// When set, every `transfer` fails.
        pub fail_transfers: bool,
    }

    impl TestLedger {
        pub fn mint(&mut self, token: &str, account: &str, amount: u128) {
            *self.balances.entry((acc(token), acc(account))).or_default() += amount;
        }

        fn debit(&mut self, token: &AccountId, account: &AccountId, amount: u128) -> VaultResult<()> {
            let balance = self.balance_of(token, account);
            let rest = balance
                .checked_sub(amount)
                .ok_or_else(|| VaultError::InsufficientBalance {
                    token: token.clone(),
                    account_id: account.clone(),
                    balance,
                    needed: amount,
                })?;
            self.balances.insert((token.clone(), account.clone()), rest);
            Ok(())
        }
    }

    impl FungibleLedger for TestLedger {
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
            if self.fail_transfers {
                return Err(VaultError::venue(token, "transfer disabled"));
            }
            self.debit(token, sender_id, amount)?;
            *self
                .balances
                .entry((token.clone(), receiver_id.clone()))
                .or_default() += amount;
            Ok(())
        }

        fn transfer_from(
            &mut self,
            token: &AccountId,
            spender_id: &AccountId,
            owner_id: &AccountId,
            receiver_id: &AccountId,
            amount: u128,
        ) -> VaultResult<()> {
            let key = (token.clone(), owner_id.clone(), spender_id.clone());
            let allowance = self.allowances.get(&key).copied().unwrap_or(0);
            let rest = allowance
                .checked_sub(amount)
                .ok_or_else(|| VaultError::venue(token, "allowance exceeded"))?;
            self.debit(token, owner_id, amount)?;
            self.allowances.insert(key, rest);
            *self
                .balances
                .entry((token.clone(), receiver_id.clone()))
                .or_default() += amount;
            Ok(())
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

        fn decimals(&self, _token: &AccountId) -> u8 {
            18
        }
    }

    /// Builder for a plain vault over `lp.test` with a funded ledger.
    ///
    /// ```ignore
    /// let (mut vault, mut ledger) = VaultBuilder::new()
    ///     .fund("alice.test", 1_000)
    ///     .predecessor("alice.test")
    ///     .build();
    /// ```
    pub struct VaultBuilder {
        funded: Vec<(String, u128)>,
        predecessor: String,
    }

    impl VaultBuilder {
        pub const ASSET: &'static str = "lp.test";

        pub fn new() -> Self {
            Self {
                funded: Vec::new(),
                predecessor: "owner.test".to_string(),
            }
        }

        /// Gives `account` asset tokens and approves the vault for all of them.
        pub fn fund(mut self, account: &str, amount: u128) -> Self {
            self.funded.push((account.to_string(), amount));
            self
        }

        pub fn predecessor(mut self, id: &str) -> Self {
            self.predecessor = id.to_string();
            self
        }

        pub fn build(self) -> (VaultAccounting, TestLedger) {
            init_ctx(&self.predecessor);
            let mut ledger = TestLedger::default();
            for (account, amount) in &self.funded {
                ledger.mint(Self::ASSET, account, *amount);
                ledger
                    .approve(&acc(Self::ASSET), &acc(account), &acc(VAULT), u128::MAX)
                    .unwrap();
            }
            let vault = VaultAccounting::new(acc(VAULT), acc(Self::ASSET), share_metadata());
            (vault, ledger)
        }
    }
}
