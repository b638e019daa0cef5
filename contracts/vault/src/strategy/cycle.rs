//! # Reinvest Cycle
//!
//! One harvest → swap → swap → add liquidity → stake pass, run against the
//! staged engine/host pair handed out by `transact`. The cycle itself never
//! commits anything; returning an error from any stage is enough to discard
//! every step before it.
//!
//! ## Stages
//!
//! ```text
//! Idle → Harvesting → SwappingToken0 → SwappingToken1 → AddingLiquidity → Staking → Idle
//! ```

use std::fmt;

use near_sdk::json_types::U128;
use near_sdk::AccountId;

use super::engine::ReinvestmentEngine;
use crate::error::{VaultError, VaultResult};
use crate::external::{AddLiquidity, StrategyHost};
use crate::vault_standards::events::{EventLog, Reinvest, VaultEvent};
use crate::vault_standards::mul_div::apply_bps_haircut;

/// Where a reinvest cycle currently is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReinvestStage {
    #[default]
    Idle,
    Harvesting,
    SwappingToken0,
    SwappingToken1,
    AddingLiquidity,
    Staking,
}

impl ReinvestStage {
    /// The stage that follows `self` in a successful cycle.
    pub fn next(self) -> Self {
        match self {
            ReinvestStage::Idle => ReinvestStage::Harvesting,
            ReinvestStage::Harvesting => ReinvestStage::SwappingToken0,
            ReinvestStage::SwappingToken0 => ReinvestStage::SwappingToken1,
            ReinvestStage::SwappingToken1 => ReinvestStage::AddingLiquidity,
            ReinvestStage::AddingLiquidity => ReinvestStage::Staking,
            ReinvestStage::Staking => ReinvestStage::Idle,
        }
    }
}

impl fmt::Display for ReinvestStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReinvestStage::Idle => "idle",
            ReinvestStage::Harvesting => "harvesting",
            ReinvestStage::SwappingToken0 => "swapping_token0",
            ReinvestStage::SwappingToken1 => "swapping_token1",
            ReinvestStage::AddingLiquidity => "adding_liquidity",
            ReinvestStage::Staking => "staking",
        };
        f.write_str(name)
    }
}

/// What a committed reinvest cycle did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReinvestReport {
    /// Reward amount harvested and split.
    pub harvested: u128,
    pub reward_to_token0: u128,
    pub reward_to_token1: u128,
    pub token0_out: u128,
    pub token1_out: u128,
    /// Liquidity minted and staked.
    pub liquidity: u128,
    /// `total_deposits` after the cycle.
    pub total_deposits: u128,
}

/// Splits a harvested amount into the two swap legs without losing the odd unit.
pub fn split_reward(reward: u128) -> (u128, u128) {
    let half = reward / 2;
    (half, reward - half)
}

pub(crate) struct ReinvestCycle<'a, H> {
    engine: &'a mut ReinvestmentEngine,
    host: &'a mut H,
    log: &'a mut EventLog,
    stage: ReinvestStage,
    deadline: u64,
    report: ReinvestReport,
}

impl<'a, H: StrategyHost> ReinvestCycle<'a, H> {
    pub(crate) fn new(
        engine: &'a mut ReinvestmentEngine,
        host: &'a mut H,
        log: &'a mut EventLog,
        deadline: u64,
    ) -> Self {
        Self {
            engine,
            host,
            log,
            stage: ReinvestStage::Idle,
            deadline,
            report: ReinvestReport::default(),
        }
    }

    pub(crate) fn run(mut self) -> VaultResult<ReinvestReport> {
        self.advance();
        let reward = self.harvest()?;
        let (reward0, reward1) = split_reward(reward);
        self.report.harvested = reward;
        self.report.reward_to_token0 = reward0;
        self.report.reward_to_token1 = reward1;

        self.advance();
        let token0 = self.engine.config.token0.clone();
        self.report.token0_out = self.swap_reward(&token0, reward0)?;

        self.advance();
        let token1 = self.engine.config.token1.clone();
        self.report.token1_out = self.swap_reward(&token1, reward1)?;

        self.advance();
        self.report.liquidity = self.add_liquidity()?;

        self.advance();
        self.stake()?;

        self.advance();
        Ok(self.report)
    }

    fn advance(&mut self) {
        self.stage = self.stage.next();
        self.log.line(format!("reinvest stage={}", self.stage));
    }

    /// Claims the venue reward. Returns the full reward balance to reinvest.
    fn harvest(&mut self) -> VaultResult<u128> {
        let reward = self.engine.pending_reward_amount(&*self.host)?;
        if reward == 0 {
            return Err(VaultError::ZeroAmount);
        }
        let vault_id = self.engine.vault_id().clone();
        // a zero deposit pays out pending rewards without moving stake
        self.host.deposit(&vault_id, self.engine.config.pool_id, 0)?;

        self.log.line(format!("reinvest_harvest reward={}", reward));
        Ok(reward)
    }

    /// Swaps `amount_in` reward for `target`, bounded by the slippage tolerance.
    fn swap_reward(&mut self, target: &AccountId, amount_in: u128) -> VaultResult<u128> {
        let config = &self.engine.config;
        if *target == config.reward_token {
            return Ok(amount_in);
        }
        if amount_in == 0 {
            return Err(VaultError::ZeroAmount);
        }

        let vault_id = self.engine.vault.account_id().clone();
        let path = vec![config.reward_token.clone(), target.clone()];
        let quote = self
            .host
            .get_amounts_out(amount_in, &path)?
            .last()
            .copied()
            .ok_or_else(|| VaultError::venue(&config.exchange_id, "empty quote"))?;
        let min_out = apply_bps_haircut(quote, config.slippage_bps)?;

        self.host
            .approve(&config.reward_token, &vault_id, &config.exchange_id, amount_in)?;
        let before = self.host.balance_of(target, &vault_id);
        self.host.swap_exact_tokens_for_tokens(
            &vault_id,
            amount_in,
            min_out,
            &path,
            &vault_id,
            self.deadline,
        )?;
        let received = self.host.balance_of(target, &vault_id).saturating_sub(before);
        if received < min_out {
            return Err(VaultError::SlippageExceeded {
                min_out,
                actual: received,
            });
        }

        self.log.line(format!(
            "reinvest_swap token={} amount_in={} quote={} min_out={} received={}",
            target, amount_in, quote, min_out, received
        ));
        Ok(received)
    }

    /// Pairs the swapped constituents into the pooled asset.
    fn add_liquidity(&mut self) -> VaultResult<u128> {
        let config = &self.engine.config;
        let vault_id = self.engine.vault.account_id().clone();
        let (amount0, amount1) = (self.report.token0_out, self.report.token1_out);

        self.host
            .approve(&config.token0, &vault_id, &config.exchange_id, amount0)?;
        self.host
            .approve(&config.token1, &vault_id, &config.exchange_id, amount1)?;
        let added = self.host.add_liquidity(
            &vault_id,
            AddLiquidity {
                token_a: config.token0.clone(),
                token_b: config.token1.clone(),
                amount_a_desired: amount0,
                amount_b_desired: amount1,
                amount_a_min: 0,
                amount_b_min: 0,
                to: vault_id.clone(),
                deadline: self.deadline,
            },
        )?;

        self.log.line(format!(
            "reinvest_add_liquidity used0={} used1={} liquidity={}",
            added.used_a, added.used_b, added.liquidity
        ));
        Ok(added.liquidity)
    }

    /// Stakes the new liquidity and books it in `total_deposits`.
    fn stake(&mut self) -> VaultResult<()> {
        let liquidity = self.report.liquidity;
        if liquidity == 0 {
            return Err(VaultError::ZeroAmount);
        }
        self.engine.stake(&mut *self.host, liquidity)?;

        let total_deposits = self
            .engine
            .total_deposits
            .checked_add(liquidity)
            .ok_or(VaultError::ArithmeticOverflow)?;
        self.engine.total_deposits = total_deposits;
        self.report.total_deposits = total_deposits;

        self.log.push(VaultEvent::Reinvest(Reinvest {
            total_deposits: U128(total_deposits),
        }));
        Ok(())
    }
}
