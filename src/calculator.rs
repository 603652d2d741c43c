//! Two-phase composition of warmup and cooldown replay.

use {
    crate::{
        classify::StakeActivation, config::WarmupCooldownConfig, cooldown::CooldownSimulator,
        error::StakeActivationError, phase::{StakeActivationStatus, StakePhase},
        stake_history::StakeHistoryGetEntry, state::{Delegation, StakeAccount},
        warmup::WarmupSimulator,
    },
    log::debug,
    solana_clock::Epoch,
    solana_pubkey::Pubkey,
};

/// Computes a delegation's effective, activating and deactivating stake at any epoch
/// covered by a stake history snapshot.
///
/// The calculator holds no state between calls; the same inputs always produce the same
/// answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActivationCalculator {
    config: WarmupCooldownConfig,
}

impl ActivationCalculator {
    pub fn new(config: WarmupCooldownConfig) -> Result<Self, StakeActivationError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &WarmupCooldownConfig {
        &self.config
    }

    /// Phase of `delegation` at `target_epoch`.
    ///
    /// Warmup is replayed up to `min(target_epoch, deactivation_epoch)`; when the target is
    /// at or past deactivation, the stake effective at that point is handed to cooldown.
    pub fn phase<T: StakeHistoryGetEntry + ?Sized>(
        &self,
        delegation: &Delegation,
        target_epoch: Epoch,
        history: &T,
    ) -> Result<StakePhase, StakeActivationError> {
        let warmup_target = delegation
            .deactivation_epoch
            .map_or(target_epoch, |deactivation_epoch| {
                target_epoch.min(deactivation_epoch)
            });
        let warmup =
            WarmupSimulator::new(&self.config, history).simulate(delegation, warmup_target)?;

        match delegation.deactivation_epoch {
            Some(deactivation_epoch) if target_epoch >= deactivation_epoch => {
                CooldownSimulator::new(&self.config, history).simulate(
                    deactivation_epoch,
                    warmup.effective(delegation.stake),
                    target_epoch,
                )
            }
            _ => Ok(warmup),
        }
    }

    pub fn calculate<T: StakeHistoryGetEntry + ?Sized>(
        &self,
        delegation: &Delegation,
        target_epoch: Epoch,
        history: &T,
    ) -> Result<StakeActivationStatus, StakeActivationError> {
        let phase = self.phase(delegation, target_epoch, history)?;
        let status = phase.status(delegation.stake);
        debug!(
            "delegation of {} (activation {}, deactivation {:?}) at epoch {}: {:?} {:?}",
            delegation.stake,
            delegation.activation_epoch,
            delegation.deactivation_epoch,
            target_epoch,
            phase,
            status
        );
        Ok(status)
    }

    /// Status of a whole stake account. An account without a delegation has nothing
    /// effective, activating or deactivating.
    pub fn account_status<T: StakeHistoryGetEntry + ?Sized>(
        &self,
        account: &StakeAccount,
        target_epoch: Epoch,
        history: &T,
    ) -> Result<StakeActivationStatus, StakeActivationError> {
        match account.delegation() {
            Some(delegation) => self.calculate(delegation, target_epoch, history),
            None => Ok(StakeActivationStatus::default()),
        }
    }

    /// Caller-facing activation of the stake account at `address`. Errors carry the address
    /// and target epoch.
    pub fn stake_activation<T: StakeHistoryGetEntry + ?Sized>(
        &self,
        address: &Pubkey,
        account: &StakeAccount,
        target_epoch: Epoch,
        history: &T,
    ) -> Result<StakeActivation, StakeActivationError> {
        let status = self
            .account_status(account, target_epoch, history)
            .map_err(|err| err.for_account(*address, target_epoch))?;
        Ok(StakeActivation::new(
            &status,
            account.lamports,
            account.rent_exempt_reserve,
        ))
    }
}
