//! Off-chain reconstruction of stake warmup and cooldown.
//!
//! Validators advance every delegation's effective stake once per epoch. A client holding only
//! an account snapshot and the stake history sysvar can reach the same answer by replaying the
//! rate-limited warmup/cooldown formula from the delegation's activation (or deactivation)
//! epoch up to the epoch of interest. [`ActivationCalculator`] performs that replay.

use solana_pubkey::Pubkey;

pub mod calculator;
pub mod classify;
pub mod config;
pub mod cooldown;
pub mod error;
pub mod parsed;
pub mod phase;
pub mod precision;
pub mod source;
pub mod stake_history;
pub mod state;
pub mod warmup;
pub mod warmup_cooldown_allowance;

pub use {
    calculator::ActivationCalculator,
    classify::{StakeActivation, StakeActivationState},
    config::WarmupCooldownConfig,
    error::StakeActivationError,
    phase::{StakeActivationStatus, StakePhase},
    stake_history::{StakeHistory, StakeHistoryEntry, StakeHistoryGetEntry},
    state::{Delegation, StakeAccount},
};

/// Address of the stake history sysvar account.
pub const STAKE_HISTORY_ID: Pubkey =
    Pubkey::from_str_const("SysvarStakeHistory1111111111111111111111111");
