//! Caller-facing summary of a stake account's activation.

use {
    crate::phase::StakeActivationStatus,
    serde_derive::{Deserialize, Serialize},
    std::fmt,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StakeActivationState {
    Activating,
    Active,
    Deactivating,
    Inactive,
}

impl From<&StakeActivationStatus> for StakeActivationState {
    fn from(status: &StakeActivationStatus) -> Self {
        if status.deactivating > 0 {
            StakeActivationState::Deactivating
        } else if status.activating > 0 {
            StakeActivationState::Activating
        } else if status.effective > 0 {
            StakeActivationState::Active
        } else {
            StakeActivationState::Inactive
        }
    }
}

impl fmt::Display for StakeActivationState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StakeActivationState::Activating => write!(f, "activating"),
            StakeActivationState::Active => write!(f, "active"),
            StakeActivationState::Deactivating => write!(f, "deactivating"),
            StakeActivationState::Inactive => write!(f, "inactive"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeActivation {
    /// lamports currently counted as effective stake
    pub active: u64,
    /// lamports neither effective nor held for rent exemption
    pub inactive: u64,
    pub state: StakeActivationState,
}

impl StakeActivation {
    /// Classify `status` for an account holding `lamports`, of which `rent_exempt_reserve`
    /// is never delegated.
    pub fn new(status: &StakeActivationStatus, lamports: u64, rent_exempt_reserve: u64) -> Self {
        Self {
            active: status.effective,
            inactive: lamports
                .saturating_sub(status.effective)
                .saturating_sub(rent_exempt_reserve),
            state: status.into(),
        }
    }
}
