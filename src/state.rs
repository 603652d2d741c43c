use {solana_clock::Epoch, solana_pubkey::Pubkey};

/// Wire value for "never activated" and for "not deactivated".
pub const EPOCH_SENTINEL: Epoch = u64::MAX;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Delegation {
    /// to whom the stake is delegated
    pub voter_pubkey: Pubkey,
    /// activated stake amount, set at delegate() time
    pub stake: u64,
    /// epoch at which this stake was activated, `u64::MAX` if it never was
    pub activation_epoch: Epoch,
    /// epoch the stake was deactivated, `None` if not deactivated
    pub deactivation_epoch: Option<Epoch>,
}

impl Default for Delegation {
    fn default() -> Self {
        Self {
            voter_pubkey: Pubkey::default(),
            stake: 0,
            activation_epoch: 0,
            deactivation_epoch: None,
        }
    }
}

impl Delegation {
    pub fn new(voter_pubkey: &Pubkey, stake: u64, activation_epoch: Epoch) -> Self {
        Self {
            voter_pubkey: *voter_pubkey,
            stake,
            activation_epoch,
            ..Delegation::default()
        }
    }

    /// Build from the account encoding, where `u64::MAX` means "never activated" or "never
    /// deactivated". Equal epochs are kept as they are, so a delegation whose epochs are both
    /// the sentinel still reads as never active.
    pub fn from_raw_epochs(
        voter_pubkey: &Pubkey,
        stake: u64,
        activation_epoch: Epoch,
        deactivation_epoch: Epoch,
    ) -> Self {
        Self {
            voter_pubkey: *voter_pubkey,
            stake,
            activation_epoch,
            deactivation_epoch: (deactivation_epoch != EPOCH_SENTINEL
                || deactivation_epoch == activation_epoch)
                .then_some(deactivation_epoch),
        }
    }

    pub fn deactivated_at(self, deactivation_epoch: Epoch) -> Self {
        Self {
            deactivation_epoch: Some(deactivation_epoch),
            ..self
        }
    }

    /// Activated and deactivated in the same epoch; never counts toward effective stake.
    pub fn is_never_active(&self) -> bool {
        self.deactivation_epoch == Some(self.activation_epoch)
    }

    /// Deactivation epoch in the account encoding.
    pub fn raw_deactivation_epoch(&self) -> Epoch {
        self.deactivation_epoch.unwrap_or(EPOCH_SENTINEL)
    }
}

/// The parts of a stake account that feed the activation calculation.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct StakeAccount {
    /// total balance
    pub lamports: u64,
    /// minimum balance kept for rent exemption, never delegated
    pub rent_exempt_reserve: u64,
    /// `None` when the account is initialized but not delegated
    pub delegation: Option<Delegation>,
}

impl StakeAccount {
    pub fn delegation(&self) -> Option<&Delegation> {
        self.delegation.as_ref()
    }
}
