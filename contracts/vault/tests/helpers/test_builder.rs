// Test builder pattern for integration tests
// Builds a funded mock chain plus a reinvestment engine and wraps the calls
// a test makes against them.

use mock_chain::MockChain;
use near_contract_standards::fungible_token::metadata::{FungibleTokenMetadata, FT_METADATA_SPEC};
use reinvest_vault::config::DEFAULT_SLIPPAGE_BPS;
use reinvest_vault::external::{FungibleLedger, StakingVenue};
use reinvest_vault::{
    ReinvestReport, ReinvestmentEngine, StrategyConfig, VaultCore, VaultResult, VaultShares,
};

use super::*;

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

pub struct TestScenarioBuilder {
    config: StrategyConfig,
    accounts: Vec<(String, u128)>,
    deposits: Vec<(String, u128)>,
}

impl TestScenarioBuilder {
    pub fn new() -> Self {
        Self {
            config: StrategyConfig {
                owner_id: acc(OWNER),
                asset: acc(ASSET),
                token0: acc(TOKEN0),
                token1: acc(TOKEN1),
                reward_token: acc(REWARD),
                exchange_id: acc(EXCHANGE),
                staking_id: acc(STAKING),
                pool_id: POOL_ID,
                slippage_bps: DEFAULT_SLIPPAGE_BPS,
                swap_deadline_ns: 0,
                restrict_recovery: true,
                metadata: share_metadata(),
            },
            accounts: Vec::new(),
            deposits: Vec::new(),
        }
    }

    /// Gives `name` `amount` of the pooled asset and approves the vault for it.
    pub fn create_account(mut self, name: &str, amount: u128) -> Self {
        self.accounts.push((name.to_string(), amount));
        self
    }

    /// Deposits `amount` for `name` once the vault is built. The account must exist.
    pub fn deposit(mut self, name: &str, amount: u128) -> Self {
        self.deposits.push((name.to_string(), amount));
        self
    }

    pub fn slippage_bps(mut self, bps: u16) -> Self {
        self.config.slippage_bps = bps;
        self
    }

    pub fn swap_deadline_ns(mut self, ns: u64) -> Self {
        self.config.swap_deadline_ns = ns;
        self
    }

    /// Pays staking rewards in `token` instead of `REWARD`.
    pub fn reward_token(mut self, token: &str) -> Self {
        self.config.reward_token = acc(token);
        self
    }

    pub fn restrict_recovery(mut self, restrict: bool) -> Self {
        self.config.restrict_recovery = restrict;
        self
    }

    pub fn build(self) -> TestScenario {
        let mut chain = MockChain::new(acc(STAKING), acc(EXCHANGE));
        let seeder = acc(SEEDER);
        chain.seed_pair(
            acc(REWARD),
            acc(TOKEN0),
            PAIR_RESERVE,
            PAIR_RESERVE,
            acc("reward-usdc.test"),
            PAIR_RESERVE,
            &seeder,
        );
        chain.seed_pair(
            acc(REWARD),
            acc(TOKEN1),
            PAIR_RESERVE,
            PAIR_RESERVE,
            acc("reward-wnear.test"),
            PAIR_RESERVE,
            &seeder,
        );
        chain.seed_pair(
            acc(TOKEN0),
            acc(TOKEN1),
            PAIR_RESERVE,
            PAIR_RESERVE,
            acc(ASSET),
            ASSET_PAIR_SUPPLY,
            &seeder,
        );
        chain.add_pool(POOL_ID, acc(ASSET), self.config.reward_token.clone());

        for (name, amount) in &self.accounts {
            chain
                .transfer(&acc(ASSET), &seeder, &acc(name), *amount)
                .unwrap();
            chain
                .approve(&acc(ASSET), &acc(name), &acc(VAULT), u128::MAX)
                .unwrap();
        }

        set_caller(OWNER);
        let vault = ReinvestmentEngine::new(self.config).unwrap();
        let mut scenario = TestScenario { chain, vault };

        for (name, amount) in &self.deposits {
            scenario.deposit(name, *amount).unwrap();
        }
        set_caller(OWNER);
        scenario
    }
}

/// A built scenario. Each call sets its caller first, so `get_logs` reflects
/// only the most recent call.
pub struct TestScenario {
    pub chain: MockChain,
    pub vault: ReinvestmentEngine,
}

impl TestScenario {
    pub fn deposit(&mut self, caller: &str, assets: u128) -> VaultResult<u128> {
        set_caller(caller);
        self.vault.deposit(&mut self.chain, assets, acc(caller))
    }

    pub fn mint(&mut self, caller: &str, shares: u128) -> VaultResult<u128> {
        set_caller(caller);
        self.vault.mint(&mut self.chain, shares, acc(caller))
    }

    pub fn withdraw(&mut self, caller: &str, assets: u128) -> VaultResult<u128> {
        set_caller(caller);
        self.vault
            .withdraw(&mut self.chain, assets, acc(caller), acc(caller))
    }

    pub fn redeem(&mut self, caller: &str, shares: u128) -> VaultResult<u128> {
        set_caller(caller);
        self.vault
            .redeem(&mut self.chain, shares, acc(caller), acc(caller))
    }

    pub fn reinvest(&mut self, caller: &str) -> VaultResult<ReinvestReport> {
        set_caller(caller);
        self.vault.reinvest(&mut self.chain)
    }

    pub fn reinvest_at(&mut self, caller: &str, block_timestamp: u64) -> VaultResult<ReinvestReport> {
        set_caller_at(caller, block_timestamp);
        self.vault.reinvest(&mut self.chain)
    }

    pub fn emergency_withdraw(&mut self, caller: &str) -> VaultResult<u128> {
        set_caller(caller);
        self.vault.emergency_withdraw(&mut self.chain)
    }

    /// Makes `amount` reward claimable by the vault at the staking venue.
    pub fn accrue_reward(&mut self, amount: u128) {
        self.chain
            .accrue_reward(POOL_ID, &acc(VAULT), amount)
            .unwrap();
    }

    pub fn total_assets(&self) -> u128 {
        self.vault.total_assets(&self.chain).unwrap()
    }

    pub fn total_supply(&self) -> u128 {
        self.vault.accounting().ft_total_supply()
    }

    pub fn shares_of(&self, name: &str) -> u128 {
        self.vault.accounting().ft_balance_of(&acc(name))
    }

    /// Pooled asset held by `name` on the ledger.
    pub fn assets_of(&self, name: &str) -> u128 {
        balance(&self.chain, ASSET, name)
    }

    pub fn staked(&self) -> u128 {
        self.chain.user_info(POOL_ID, &acc(VAULT))
    }

    pub fn idle(&self) -> u128 {
        balance(&self.chain, ASSET, VAULT)
    }
}
