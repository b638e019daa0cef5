//! # Test Helpers Module
//!
//! Shared infrastructure for the vault integration tests. Every scenario runs
//! the reinvestment engine against an in-process [`MockChain`] that plays the
//! token ledger, the staking venue and the exchange venue.
//!
//! ## Modules
//!
//! - [`test_builder`]: Builder pattern for constructing test scenarios
//!
//! ## Key Functions
//!
//! - [`acc`]: parses a test account id
//! - [`set_caller`]: sets the predecessor (and block timestamp) of the next call
//! - [`vault_events`]: decodes the `EVENT_JSON` logs of the last call

#![allow(dead_code)]

use mock_chain::MockChain;
use near_sdk::test_utils::{get_logs, VMContextBuilder};
use near_sdk::{testing_env, AccountId};
use serde_json::Value;

pub mod test_builder;

// ============================================================================
// Constants
// ============================================================================

pub const VAULT: &str = "vault.test";
pub const OWNER: &str = "owner.test";

/// The pooled asset: liquidity token of the `TOKEN0`/`TOKEN1` pair.
pub const ASSET: &str = "lp.test";
pub const TOKEN0: &str = "usdc.test";
pub const TOKEN1: &str = "wnear.test";
pub const REWARD: &str = "reward.test";

pub const EXCHANGE: &str = "exchange.test";
pub const STAKING: &str = "chef.test";
pub const POOL_ID: u64 = 0;

/// Account that seeds the exchange pairs.
pub const SEEDER: &str = "seed.test";

/// Reserves of every seeded pair, per side.
pub const PAIR_RESERVE: u128 = 1_000_000;

/// Liquidity token supply of the `TOKEN0`/`TOKEN1` pair at seeding.
pub const ASSET_PAIR_SUPPLY: u128 = 2_000_000;

// ============================================================================
// Context
// ============================================================================

pub fn acc(id: &str) -> AccountId {
    id.parse().unwrap()
}

/// Makes `caller` the predecessor of the next vault call at block time 0.
pub fn set_caller(caller: &str) {
    set_caller_at(caller, 0);
}

pub fn set_caller_at(caller: &str, block_timestamp: u64) {
    testing_env!(VMContextBuilder::new()
        .current_account_id(acc(VAULT))
        .predecessor_account_id(acc(caller))
        .block_timestamp(block_timestamp)
        .build());
}

// ============================================================================
// Logs
// ============================================================================

/// `EVENT_JSON` logs emitted since the last [`set_caller`], decoded.
pub fn vault_events() -> Vec<Value> {
    get_logs()
        .iter()
        .filter_map(|log| log.strip_prefix("EVENT_JSON:"))
        .map(|json| serde_json::from_str(json).unwrap())
        .collect()
}

/// Names of the events emitted since the last [`set_caller`], in order.
pub fn event_names() -> Vec<String> {
    vault_events()
        .iter()
        .map(|event| event["event"].as_str().unwrap().to_string())
        .collect()
}

/// Asserts that the last call left neither events nor log lines behind.
pub fn assert_no_logs() {
    assert!(get_logs().is_empty(), "unexpected logs: {:?}", get_logs());
}

/// Ledger balance of `token` held by `account`.
pub fn balance(chain: &MockChain, token: &str, account: &str) -> u128 {
    use reinvest_vault::external::FungibleLedger;
    chain.balance_of(&acc(token), &acc(account))
}
