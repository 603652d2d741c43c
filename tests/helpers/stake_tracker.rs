use {
    solana_clock::Epoch,
    solana_pubkey::Pubkey,
    solana_stake_activation::{ActivationCalculator, Delegation, StakeHistory, StakeHistoryEntry},
    std::collections::HashMap,
};

// This replicates the validator's behavior where stake history is updated at epoch
// boundaries by aggregating all stake delegations.

/// Tracks stake delegations for automatic stake history management
#[derive(Default, Clone)]
pub struct StakeTracker {
    /// Map of stake account pubkey to its delegation
    pub(crate) delegations: HashMap<Pubkey, Delegation>,
    /// Cluster stake that is effective in every epoch and never moves
    background_stake: u64,
    calculator: ActivationCalculator,
}

impl StakeTracker {
    pub fn new(calculator: ActivationCalculator) -> Self {
        Self {
            delegations: HashMap::new(),
            background_stake: 0,
            calculator,
        }
    }

    /// Create a tracker whose history carries `background_stake` as effective stake from
    /// the first epoch on, so warmup and cooldown have a base to be limited by.
    pub fn with_background_stake(
        calculator: ActivationCalculator,
        background_stake: u64,
    ) -> Self {
        Self {
            background_stake,
            ..Self::new(calculator)
        }
    }

    pub fn background_stake(&self) -> u64 {
        self.background_stake
    }

    /// Track a new stake delegation
    pub fn track_delegation(&mut self, stake_pubkey: &Pubkey, delegation: Delegation) {
        self.delegations.insert(*stake_pubkey, delegation);
    }

    /// Mark a stake as deactivating
    pub fn track_deactivation(&mut self, stake_pubkey: &Pubkey, deactivation_epoch: Epoch) {
        if let Some(delegation) = self.delegations.get_mut(stake_pubkey) {
            delegation.deactivation_epoch = Some(deactivation_epoch);
        }
    }

    pub fn delegation(&self, stake_pubkey: &Pubkey) -> Option<&Delegation> {
        self.delegations.get(stake_pubkey)
    }

    /// Effective stake of every tracked delegation at `epoch`, background included
    pub fn total_effective_stake(&self, epoch: Epoch, stake_history: &StakeHistory) -> u64 {
        self.calculate_epoch_entry(epoch, stake_history).effective
    }

    /// Aggregate every tracked delegation's status at `epoch`
    pub fn calculate_epoch_entry(
        &self,
        epoch: Epoch,
        stake_history: &StakeHistory,
    ) -> StakeHistoryEntry {
        self.delegations
            .values()
            .map(|delegation| {
                self.calculator
                    .calculate(delegation, epoch, stake_history)
                    .unwrap()
            })
            .fold(
                StakeHistoryEntry::with_effective(self.background_stake),
                |acc, status| acc + status,
            )
    }

    /// Contiguous cluster history for `epochs`, each entry computed from the ones before it
    pub fn build_history(&self, epochs: std::ops::Range<Epoch>) -> StakeHistory {
        let mut stake_history = StakeHistory::default();
        for epoch in epochs {
            let entry = self.calculate_epoch_entry(epoch, &stake_history);
            stake_history.add(epoch, entry);
        }
        stake_history
    }
}
