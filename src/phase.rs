//! Lifecycle phases of a single delegation.
//!
//! Replay moves a delegation through
//! `NotStarted -> Activating -> Active -> Deactivating -> Inactive`, skipping phases when a
//! boundary rule resolves it early. Every phase maps to exactly one shape of
//! [`StakeActivationStatus`], so a status can never be activating and deactivating at once.

use {crate::stake_history::StakeHistoryEntry, serde_derive::Serialize};

/// `effective`/`activating`/`deactivating` amounts for one delegation, in the same shape as
/// a cluster-wide [`StakeHistoryEntry`].
pub type StakeActivationStatus = StakeHistoryEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "phase")]
pub enum StakePhase {
    /// Target epoch precedes the activation epoch.
    NotStarted,
    /// Part of the stake is still warming up.
    Activating { effective: u64 },
    /// All of the stake is effective.
    Active,
    /// Deactivation requested; `effective` is still counted while it cools down.
    Deactivating { effective: u64 },
    /// Nothing is effective anymore, or never was.
    Inactive,
}

impl StakePhase {
    /// Effective stake of a delegation of `stake` lamports in this phase.
    pub fn effective(&self, stake: u64) -> u64 {
        match *self {
            StakePhase::NotStarted | StakePhase::Inactive => 0,
            StakePhase::Activating { effective } | StakePhase::Deactivating { effective } => {
                effective
            }
            StakePhase::Active => stake,
        }
    }

    pub fn status(&self, stake: u64) -> StakeActivationStatus {
        match *self {
            StakePhase::NotStarted | StakePhase::Inactive => StakeActivationStatus::default(),
            StakePhase::Activating { effective } => {
                StakeActivationStatus::with_effective_and_activating(
                    effective,
                    stake.saturating_sub(effective),
                )
            }
            StakePhase::Active => StakeActivationStatus::with_effective(stake),
            StakePhase::Deactivating { effective } => {
                StakeActivationStatus::with_deactivating(effective)
            }
        }
    }

    pub(crate) fn deactivating(effective: u64) -> Self {
        if effective == 0 {
            StakePhase::Inactive
        } else {
            StakePhase::Deactivating { effective }
        }
    }

    pub(crate) fn activating(effective: u64, stake: u64) -> Self {
        if effective >= stake {
            StakePhase::Active
        } else {
            StakePhase::Activating { effective }
        }
    }

    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            StakePhase::Activating { .. } | StakePhase::Deactivating { .. }
        )
    }
}
