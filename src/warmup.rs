//! Replay of a delegation's warmup, from its activation epoch toward a target epoch.

use {
    crate::{
        config::WarmupCooldownConfig, error::StakeActivationError, phase::StakePhase,
        stake_history::StakeHistoryGetEntry, state::Delegation,
        warmup_cooldown_allowance::calculate_activation_allowance,
    },
    log::{debug, trace},
    solana_clock::Epoch,
};

pub struct WarmupSimulator<'a, T: ?Sized> {
    config: &'a WarmupCooldownConfig,
    history: &'a T,
}

impl<'a, T: StakeHistoryGetEntry + ?Sized> WarmupSimulator<'a, T> {
    pub fn new(config: &'a WarmupCooldownConfig, history: &'a T) -> Self {
        Self { config, history }
    }

    /// Phase of `delegation` at `target_epoch`, ignoring any deactivation that happened
    /// before it. Warmup never advances past the deactivation epoch.
    pub fn simulate(
        &self,
        delegation: &Delegation,
        target_epoch: Epoch,
    ) -> Result<StakePhase, StakeActivationError> {
        let delegated_stake = delegation.stake;

        if delegation.is_never_active() {
            // activated but instantly deactivated; no stake at all regardless of target_epoch
            // this must be before the all-is-activating check
            return Ok(StakePhase::Inactive);
        }
        if target_epoch == delegation.activation_epoch {
            // all is activating
            return Ok(StakePhase::Activating { effective: 0 });
        }
        if target_epoch < delegation.activation_epoch {
            return Ok(StakePhase::NotStarted);
        }

        // target_epoch > activation_epoch
        let Some(mut prev_cluster_stake) = self.history.get_entry(delegation.activation_epoch)
        else {
            debug!(
                "no stake history at activation epoch {}, assuming fully effective",
                delegation.activation_epoch
            );
            return Ok(StakePhase::Active);
        };

        // loop from the activation epoch until the target epoch summing up the entitlement;
        // effective stake entering each epoch is limited by the previous epoch's cluster stake
        let mut prev_epoch = delegation.activation_epoch;
        let mut current_effective_stake = 0;
        loop {
            let current_epoch = prev_epoch + 1;
            // no activating stake at the previous epoch; the validator stops here
            if prev_cluster_stake.activating == 0 {
                break;
            }

            let remaining_activating_stake = delegated_stake - current_effective_stake;
            let newly_effective_stake = calculate_activation_allowance(
                self.config,
                current_epoch,
                remaining_activating_stake,
                &prev_cluster_stake,
            )?
            .max(1);

            current_effective_stake += newly_effective_stake;
            trace!(
                "warmup epoch {}: cluster {:?}, +{} -> {}/{}",
                current_epoch,
                prev_cluster_stake,
                newly_effective_stake,
                current_effective_stake,
                delegated_stake
            );
            if current_effective_stake >= delegated_stake {
                return Ok(StakePhase::Active);
            }

            if current_epoch >= target_epoch
                || delegation
                    .deactivation_epoch
                    .is_some_and(|deactivation_epoch| current_epoch >= deactivation_epoch)
            {
                break;
            }

            match self.history.get_entry(current_epoch) {
                Some(current_cluster_stake) => {
                    prev_epoch = current_epoch;
                    prev_cluster_stake = current_cluster_stake;
                }
                None => {
                    debug!(
                        "stake history ends before epoch {}, assuming fully effective",
                        current_epoch
                    );
                    return Ok(StakePhase::Active);
                }
            }
        }

        Ok(StakePhase::activating(current_effective_stake, delegated_stake))
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
        assert_matches::assert_matches,
    };

    fn simulate(
        delegation: &Delegation,
        target_epoch: Epoch,
        history: &StakeHistory,
    ) -> StakePhase {
        let config = WarmupCooldownConfig::default().with_rounding(StepRounding::Floor);
        WarmupSimulator::new(&config, history)
            .simulate(delegation, target_epoch)
            .unwrap()
    }

    #[test]
    fn test_boundaries() {
        let delegation = Delegation {
            stake: 1_000,
            activation_epoch: 10,
            ..Delegation::default()
        };
        let history = StakeHistory::default();

        assert_eq!(simulate(&delegation, 9, &history), StakePhase::NotStarted);
        assert_eq!(
            simulate(&delegation, 10, &history),
            StakePhase::Activating { effective: 0 }
        );
        // no history at all; no congestion
        assert_eq!(simulate(&delegation, 11, &history), StakePhase::Active);

        let never_active = delegation.deactivated_at(10);
        for epoch in [0, 9, 10, 11, 1_000] {
            assert_eq!(simulate(&never_active, epoch, &history), StakePhase::Inactive);
        }

        // never activated; every real epoch precedes the sentinel
        let never_activated = Delegation {
            activation_epoch: u64::MAX,
            ..delegation
        };
        for epoch in [0, 11, 1_000] {
            assert_eq!(
                simulate(&never_activated, epoch, &history),
                StakePhase::NotStarted
            );
        }
    }

    #[test]
    fn test_partial_warmup() {
        // 9% of 10_000 effective = 900 per epoch, shared by 2_000 activating
        let delegation = Delegation {
            stake: 1_000,
            activation_epoch: 0,
            ..Delegation::default()
        };
        let history: StakeHistory = (0..5)
            .map(|epoch| {
                (
                    epoch,
                    StakeHistoryEntry {
                        effective: 10_000,
                        activating: 2_000,
                        deactivating: 0,
                    },
                )
            })
            .collect();

        // 1_000 * 900 / 2_000 = 450
        assert_eq!(
            simulate(&delegation, 1, &history),
            StakePhase::Activating { effective: 450 }
        );
        // 550 * 900 / 2_000 = 247
        assert_eq!(
            simulate(&delegation, 2, &history),
            StakePhase::Activating { effective: 697 }
        );
        // 303 * 900 / 2_000 = 136
        assert_eq!(
            simulate(&delegation, 3, &history),
            StakePhase::Activating { effective: 833 }
        );
    }

    #[test]
    fn test_stops_at_deactivation_epoch() {
        let delegation = Delegation {
            stake: 1_000,
            activation_epoch: 0,
            deactivation_epoch: Some(2),
            ..Delegation::default()
        };
        let history: StakeHistory = (0..10)
            .map(|epoch| {
                (
                    epoch,
                    StakeHistoryEntry::with_effective_and_activating(10_000, 2_000),
                )
            })
            .collect();

        let at_deactivation = simulate(&delegation, 2, &history);
        assert_eq!(at_deactivation, StakePhase::Activating { effective: 697 });
        assert_eq!(simulate(&delegation, 9, &history), at_deactivation);
    }

    #[test]
    fn test_missing_history_mid_replay_is_fully_effective() {
        let delegation = Delegation {
            stake: 1_000,
            activation_epoch: 0,
            ..Delegation::default()
        };
        // entry for 0 only; advancing past epoch 1 has no data
        let history: StakeHistory = [(
            0,
            StakeHistoryEntry::with_effective_and_activating(10_000, 2_000),
        )]
        .into_iter()
        .collect();

        assert_eq!(
            simulate(&delegation, 1, &history),
            StakePhase::Activating { effective: 450 }
        );
        assert_eq!(simulate(&delegation, 2, &history), StakePhase::Active);
    }

    #[test]
    fn test_no_cluster_activating_stalls() {
        // entry for the activation epoch doesn't carry this stake's activating amount
        let delegation = Delegation {
            stake: 1_000,
            activation_epoch: 0,
            ..Delegation::default()
        };
        let history: StakeHistory = [(0, StakeHistoryEntry::with_effective(1_000))]
            .into_iter()
            .collect();
        assert_eq!(
            simulate(&delegation, 5, &history),
            StakePhase::Activating { effective: 0 }
        );
    }

    #[test]
    fn test_sub_lamport_progress_is_one() {
        // allowance rounds to zero every epoch, minimum progress is one lamport
        let delegation = Delegation {
            stake: 3,
            activation_epoch: 0,
            ..Delegation::default()
        };
        let history: StakeHistory = (0..10)
            .map(|epoch| (epoch, StakeHistoryEntry::with_effective_and_activating(1, 1_000)))
            .collect();

        assert_eq!(
            simulate(&delegation, 1, &history),
            StakePhase::Activating { effective: 1 }
        );
        assert_eq!(
            simulate(&delegation, 2, &history),
            StakePhase::Activating { effective: 2 }
        );
        assert_eq!(simulate(&delegation, 3, &history), StakePhase::Active);
    }

    #[test]
    fn test_precision_loss_is_fatal() {
        let stake = (1u64 << 53) + 1;
        let delegation = Delegation {
            stake,
            activation_epoch: 0,
            ..Delegation::default()
        };
        let history: StakeHistory = [(
            0,
            StakeHistoryEntry::with_effective_and_activating(u64::MAX, stake),
        )]
        .into_iter()
        .collect();
        let config = WarmupCooldownConfig::default();

        assert_matches!(
            WarmupSimulator::new(&config, &history).simulate(&delegation, 1),
            Err(StakeActivationError::PrecisionLoss { epoch: 1, .. })
        );
    }
}
