//! Replay of a delegation's cooldown, from its deactivation epoch toward a target epoch.

use {
    crate::{
        config::WarmupCooldownConfig, error::StakeActivationError, phase::StakePhase,
        stake_history::StakeHistoryGetEntry,
        warmup_cooldown_allowance::calculate_deactivation_allowance,
    },
    log::{debug, trace},
    solana_clock::Epoch,
};

pub struct CooldownSimulator<'a, T: ?Sized> {
    config: &'a WarmupCooldownConfig,
    history: &'a T,
}

impl<'a, T: StakeHistoryGetEntry + ?Sized> CooldownSimulator<'a, T> {
    pub fn new(config: &'a WarmupCooldownConfig, history: &'a T) -> Self {
        Self { config, history }
    }

    /// Phase at `target_epoch` of stake that was `effective_stake` when deactivated at
    /// `deactivation_epoch`. Targets before the deactivation epoch belong to warmup and are
    /// answered as if deactivation had just been registered.
    pub fn simulate(
        &self,
        deactivation_epoch: Epoch,
        effective_stake: u64,
        target_epoch: Epoch,
    ) -> Result<StakePhase, StakeActivationError> {
        if target_epoch <= deactivation_epoch {
            // can only deactivate what's activated
            return Ok(StakePhase::deactivating(effective_stake));
        }
        if effective_stake == 0 {
            return Ok(StakePhase::Inactive);
        }

        // target_epoch > deactivation_epoch
        let Some(mut prev_cluster_stake) = self.history.get_entry(deactivation_epoch) else {
            debug!(
                "no stake history at deactivation epoch {}, assuming fully deactivated",
                deactivation_epoch
            );
            return Ok(StakePhase::Inactive);
        };

        // loop from the deactivation epoch until the target epoch
        // current effective stake is updated using its previous epoch's cluster stake
        let mut prev_epoch = deactivation_epoch;
        let mut current_effective_stake = effective_stake;
        loop {
            let current_epoch = prev_epoch + 1;
            // no deactivating stake at the previous epoch; the validator stops here
            if prev_cluster_stake.deactivating == 0 {
                break;
            }

            let newly_not_effective_stake = calculate_deactivation_allowance(
                self.config,
                current_epoch,
                current_effective_stake,
                &prev_cluster_stake,
            )?
            .max(1);

            current_effective_stake =
                current_effective_stake.saturating_sub(newly_not_effective_stake);
            trace!(
                "cooldown epoch {}: cluster {:?}, -{} -> {}",
                current_epoch,
                prev_cluster_stake,
                newly_not_effective_stake,
                current_effective_stake
            );
            if current_effective_stake == 0 {
                return Ok(StakePhase::Inactive);
            }

            if current_epoch >= target_epoch {
                break;
            }

            match self.history.get_entry(current_epoch) {
                Some(current_cluster_stake) => {
                    prev_epoch = current_epoch;
                    prev_cluster_stake = current_cluster_stake;
                }
                None => {
                    debug!(
                        "stake history ends before epoch {}, assuming fully deactivated",
                        current_epoch
                    );
                    return Ok(StakePhase::Inactive);
                }
            }
        }

        // deactivating stake equals all of the remaining effective stake
        Ok(StakePhase::Deactivating {
            effective: current_effective_stake,
        })
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            config::StepRounding,
            stake_history::{StakeHistory, StakeHistoryEntry},
        },
    };

    fn simulate(
        deactivation_epoch: Epoch,
        effective_stake: u64,
        target_epoch: Epoch,
        history: &StakeHistory,
    ) -> StakePhase {
        let config = WarmupCooldownConfig::default().with_rounding(StepRounding::Floor);
        CooldownSimulator::new(&config, history)
            .simulate(deactivation_epoch, effective_stake, target_epoch)
            .unwrap()
    }

    fn deactivating_history(epochs: std::ops::Range<Epoch>) -> StakeHistory {
        epochs
            .map(|epoch| {
                (
                    epoch,
                    StakeHistoryEntry {
                        effective: 10_000,
                        activating: 0,
                        deactivating: 2_000,
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_at_deactivation_epoch_all_effective_is_deactivating() {
        let history = StakeHistory::default();
        assert_eq!(
            simulate(5, 1_000, 5, &history),
            StakePhase::Deactivating { effective: 1_000 }
        );
        assert_eq!(simulate(5, 0, 5, &history), StakePhase::Inactive);
    }

    #[test]
    fn test_no_history_is_fully_deactivated() {
        let history = StakeHistory::default();
        assert_eq!(simulate(5, 1_000, 6, &history), StakePhase::Inactive);
    }

    #[test]
    fn test_partial_cooldown() {
        let history = deactivating_history(5..10);

        // 1_000 * 900 / 2_000 = 450
        assert_eq!(
            simulate(5, 1_000, 6, &history),
            StakePhase::Deactivating { effective: 550 }
        );
        // 550 * 900 / 2_000 = 247
        assert_eq!(
            simulate(5, 1_000, 7, &history),
            StakePhase::Deactivating { effective: 303 }
        );
    }

    #[test]
    fn test_missing_history_mid_replay_is_fully_deactivated() {
        let history = deactivating_history(5..6);
        assert_eq!(
            simulate(5, 1_000, 6, &history),
            StakePhase::Deactivating { effective: 550 }
        );
        assert_eq!(simulate(5, 1_000, 7, &history), StakePhase::Inactive);
    }

    #[test]
    fn test_no_cluster_deactivating_stalls() {
        // entry for the deactivation epoch doesn't carry this stake's deactivating amount
        let history: StakeHistory = [(5, StakeHistoryEntry::with_effective(1_000))]
            .into_iter()
            .collect();
        assert_eq!(
            simulate(5, 1_000, 7, &history),
            StakePhase::Deactivating { effective: 1_000 }
        );
    }

    #[test]
    fn test_sub_lamport_progress_is_one() {
        let history: StakeHistory = (0..10)
            .map(|epoch| {
                (
                    epoch,
                    StakeHistoryEntry {
                        effective: 1,
                        activating: 0,
                        deactivating: 1_000,
                    },
                )
            })
            .collect();

        assert_eq!(
            simulate(0, 2, 1, &history),
            StakePhase::Deactivating { effective: 1 }
        );
        assert_eq!(simulate(0, 2, 2, &history), StakePhase::Inactive);
        assert_eq!(simulate(0, 2, 9, &history), StakePhase::Inactive);
    }
}
