use near_sdk::json_types::U128;
use near_sdk::{env, AccountId};

use super::cycle::{ReinvestCycle, ReinvestReport};
use super::engine::ReinvestmentEngine;
use crate::error::{VaultError, VaultResult};
use crate::external::{FungibleLedger, StrategyHost};
use crate::vault_standards::events::{EmergencyWithdraw, Recovered, VaultEvent};
use crate::vault_standards::internal::transact;

impl ReinvestmentEngine {
    /// Harvests the venue reward and compounds it into staked liquidity.
    ///
    /// # Access Control
    ///
    /// Owner only.
    ///
    /// # Errors
    ///
    /// - [`VaultError::UnauthorizedCaller`] for any caller but the owner
    /// - [`VaultError::Paused`] while the strategy is paused
    /// - [`VaultError::ZeroAmount`] if there is no reward or nothing to stake
    /// - [`VaultError::SlippageExceeded`] if a swap pays less than 95% of its quote
    /// - [`VaultError::VenueCallFailed`] if a venue rejects a call
    ///
    /// On error neither the engine nor the host is modified.
    pub fn reinvest<H: StrategyHost + Clone>(&mut self, host: &mut H) -> VaultResult<ReinvestReport> {
        self.require_owner()?;
        self.require_not_paused()?;

        let deadline = self.config.deadline(env::block_timestamp());
        transact(self, host, |engine, host, log| {
            ReinvestCycle::new(engine, host, log, deadline).run()
        })
    }

    /// Pulls the whole stake out of the venue, forfeiting pending rewards.
    ///
    /// # Access Control
    ///
    /// Owner only.
    ///
    /// # Returns
    ///
    /// The stake returned to the vault's idle balance.
    pub fn emergency_withdraw<H: StrategyHost + Clone>(&mut self, host: &mut H) -> VaultResult<u128> {
        self.require_owner()?;

        transact(self, host, |engine, host, log| {
            let vault_id = engine.vault_id().clone();
            let staked = engine.staked_amount(&*host);

            host.emergency_withdraw(&vault_id, engine.config.pool_id)?;
            engine.total_deposits = 0;

            log.line(format!(
                "emergency_withdraw pool_id={} amount={}",
                engine.config.pool_id, staked
            ));
            log.push(VaultEvent::EmergencyWithdraw(EmergencyWithdraw {
                amount: U128(staked),
            }));
            Ok(staked)
        })
    }

    /// Sends `amount` of `token` held by the vault to the caller.
    ///
    /// # Access Control
    ///
    /// Owner only when `restrict_recovery` is set, otherwise anyone.
    pub fn recover_token<H: FungibleLedger + Clone>(
        &mut self,
        host: &mut H,
        token: AccountId,
        amount: u128,
    ) -> VaultResult<()> {
        if self.config.restrict_recovery {
            self.require_owner()?;
        }
        if amount == 0 {
            return Err(VaultError::ZeroAmount);
        }

        let caller = env::predecessor_account_id();
        transact(self, host, |engine, host, log| {
            host.transfer(&token, engine.vault_id(), &caller, amount)?;
            log.push(VaultEvent::Recovered(Recovered {
                token: token.clone(),
                amount: U128(amount),
            }));
            Ok(())
        })
    }

    /// Blocks deposits and reinvesting. Withdrawals stay open.
    ///
    /// # Access Control
    ///
    /// Owner only.
    pub fn pause(&mut self) -> VaultResult<()> {
        self.require_owner()?;
        self.is_paused = true;
        env::log_str("strategy_paused");
        Ok(())
    }

    /// # Access Control
    ///
    /// Owner only.
    pub fn unpause(&mut self) -> VaultResult<()> {
        self.require_owner()?;
        self.is_paused = false;
        env::log_str("strategy_unpaused");
        Ok(())
    }
}
