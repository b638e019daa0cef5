//! # Vault Events
//!
//! NEP-297 event logging for vault and strategy operations. Events are
//! emitted as JSON logs prefixed with `EVENT_JSON:`.
//!
//! ## Event Types
//!
//! - `VaultDeposit`: assets deposited, shares minted
//! - `VaultWithdraw`: shares burned, assets paid out
//! - `Reinvest`: a reinvest cycle staked new liquidity
//! - `Recovered`: a stray token balance was swept
//! - `EmergencyWithdraw`: the full stake was pulled from the staking venue
//!
//! Share supply changes are additionally logged with the NEP-141
//! `ft_mint` / `ft_burn` / `ft_transfer` events.
//!
//! ## Staging
//!
//! Operations never log directly. They push records into an [`EventLog`],
//! which is only flushed after the operation has committed, so an aborted
//! operation leaves no trace in the log.
//!
//! ## Format
//!
//! ```json
//! {
//!   "standard": "nep621",
//!   "version": "1.0.0",
//!   "event": "vault_deposit",
//!   "data": [{ ... }]
//! }
//! ```

use near_contract_standards::fungible_token::events::{FtBurn, FtMint, FtTransfer};
use near_sdk::json_types::U128;
use near_sdk::serde::Serialize;
use near_sdk::{env, AccountId};

// ============================================================================
// Event Wrapper
// ============================================================================

/// Top-level event wrapper.
#[derive(Serialize, Debug)]
#[serde(crate = "near_sdk::serde")]
#[serde(tag = "standard")]
#[must_use = "don't forget to `.emit()` this event"]
#[serde(rename_all = "snake_case")]
pub(crate) enum NearEvent<'a> {
    /// NEP-621 vault standard event container.
    Nep621(Nep621Event<'a>),
}

impl NearEvent<'_> {
    fn to_json_string(&self) -> String {
        #[allow(clippy::redundant_closure)]
        serde_json::to_string(self)
            .ok()
            .unwrap_or_else(|| env::abort())
    }

    fn to_json_event_string(&self) -> String {
        format!("EVENT_JSON:{}", self.to_json_string())
    }

    pub(crate) fn emit(self) {
        env::log_str(&self.to_json_event_string());
    }
}

// ============================================================================
// Event Data
// ============================================================================

/// Emitted when assets are deposited into the vault and shares are minted.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(crate = "near_sdk::serde")]
pub struct VaultDeposit {
    /// The account that paid the assets.
    pub sender_id: AccountId,
    /// The account that received the shares.
    pub owner_id: AccountId,
    pub assets: U128,
    pub shares: U128,
}

/// Emitted when shares are burned and assets are transferred out.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(crate = "near_sdk::serde")]
pub struct VaultWithdraw {
    /// The account that called withdraw/redeem.
    pub sender_id: AccountId,
    pub receiver_id: AccountId,
    /// The account whose shares were burned.
    pub owner_id: AccountId,
    pub assets: U128,
    pub shares: U128,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(crate = "near_sdk::serde")]
pub struct Reinvest {
    /// Cumulative liquidity staked by reinvest cycles.
    pub total_deposits: U128,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(crate = "near_sdk::serde")]
pub struct Recovered {
    pub token: AccountId,
    pub amount: U128,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(crate = "near_sdk::serde")]
pub struct EmergencyWithdraw {
    /// Stake returned by the venue.
    pub amount: U128,
}

/// Every record an operation can stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VaultEvent {
    SharesMinted { owner_id: AccountId, amount: u128 },
    SharesBurned { owner_id: AccountId, amount: u128 },
    SharesTransferred {
        old_owner_id: AccountId,
        new_owner_id: AccountId,
        amount: u128,
    },
    Deposit(VaultDeposit),
    Withdraw(VaultWithdraw),
    Reinvest(Reinvest),
    Recovered(Recovered),
    EmergencyWithdraw(EmergencyWithdraw),
}

impl VaultEvent {
    /// Logs the event to the NEAR runtime.
    pub fn emit(&self) {
        match self {
            VaultEvent::SharesMinted { owner_id, amount } => FtMint {
                owner_id,
                amount: U128(*amount),
                memo: Some("Deposit"),
            }
            .emit(),
            VaultEvent::SharesBurned { owner_id, amount } => FtBurn {
                owner_id,
                amount: U128(*amount),
                memo: Some("Withdrawal"),
            }
            .emit(),
            VaultEvent::SharesTransferred {
                old_owner_id,
                new_owner_id,
                amount,
            } => FtTransfer {
                old_owner_id,
                new_owner_id,
                amount: U128(*amount),
                memo: None,
            }
            .emit(),
            VaultEvent::Deposit(data) => {
                new_621_v1(Nep621EventKind::VaultDeposit(std::slice::from_ref(data))).emit()
            }
            VaultEvent::Withdraw(data) => {
                new_621_v1(Nep621EventKind::VaultWithdraw(std::slice::from_ref(data))).emit()
            }
            VaultEvent::Reinvest(data) => {
                new_621_v1(Nep621EventKind::Reinvest(std::slice::from_ref(data))).emit()
            }
            VaultEvent::Recovered(data) => {
                new_621_v1(Nep621EventKind::Recovered(std::slice::from_ref(data))).emit()
            }
            VaultEvent::EmergencyWithdraw(data) => {
                new_621_v1(Nep621EventKind::EmergencyWithdraw(std::slice::from_ref(data))).emit()
            }
        }
    }
}

// ============================================================================
// Staged Log
// ============================================================================

/// Ordered, append-only buffer of what one operation wants to log.
#[derive(Debug, Default)]
pub struct EventLog {
    entries: Vec<LogEntry>,
}

#[derive(Debug)]
enum LogEntry {
    Event(VaultEvent),
    Line(String),
}

impl EventLog {
    pub fn push(&mut self, event: VaultEvent) {
        self.entries.push(LogEntry::Event(event));
    }

    /// Stages a plain `key=value` log line.
    pub fn line(&mut self, line: String) {
        self.entries.push(LogEntry::Line(line));
    }

    pub fn events(&self) -> impl Iterator<Item = &VaultEvent> {
        self.entries.iter().filter_map(|entry| match entry {
            LogEntry::Event(event) => Some(event),
            LogEntry::Line(_) => None,
        })
    }

    /// Emits every staged entry in order. Call only after commit.
    pub fn flush(self) {
        for entry in self.entries {
            match entry {
                LogEntry::Event(event) => event.emit(),
                LogEntry::Line(line) => env::log_str(&line),
            }
        }
    }
}

// ============================================================================
// Internal Event Structures
// ============================================================================

#[derive(Serialize, Debug)]
#[serde(crate = "near_sdk::serde")]
pub(crate) struct Nep621Event<'a> {
    version: &'static str,
    #[serde(flatten)]
    event_kind: Nep621EventKind<'a>,
}

#[derive(Serialize, Debug)]
#[serde(crate = "near_sdk::serde")]
#[serde(tag = "event", content = "data")]
#[serde(rename_all = "snake_case")]
#[allow(clippy::enum_variant_names)]
enum Nep621EventKind<'a> {
    VaultDeposit(&'a [VaultDeposit]),
    VaultWithdraw(&'a [VaultWithdraw]),
    Reinvest(&'a [Reinvest]),
    Recovered(&'a [Recovered]),
    EmergencyWithdraw(&'a [EmergencyWithdraw]),
}

fn new_621<'a>(version: &'static str, event_kind: Nep621EventKind<'a>) -> NearEvent<'a> {
    NearEvent::Nep621(Nep621Event {
        version,
        event_kind,
    })
}

fn new_621_v1(event_kind: Nep621EventKind) -> NearEvent {
    new_621("1.0.0", event_kind)
}
