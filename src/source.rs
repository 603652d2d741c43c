//! Seams for the external collaborators that supply account snapshots, stake history and
//! the current epoch. Transport is left to the implementor.

use {
    crate::{
        calculator::ActivationCalculator, classify::StakeActivation,
        error::StakeActivationError, stake_history::StakeHistory, state::StakeAccount,
    },
    log::debug,
    serde_derive::{Deserialize, Serialize},
    solana_clock::Epoch,
    solana_pubkey::Pubkey,
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Commitment {
    Processed,
    Confirmed,
    #[default]
    Finalized,
}

/// Supplier of decoded account snapshots.
pub trait StakeDataSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// The stake account at `address`.
    fn stake_account(
        &self,
        address: &Pubkey,
        commitment: Commitment,
    ) -> Result<StakeAccount, Self::Error>;

    /// The current stake history sysvar.
    fn stake_history(&self, commitment: Commitment) -> Result<StakeHistory, Self::Error>;

    /// The current epoch.
    fn epoch(&self, commitment: Commitment) -> Result<Epoch, Self::Error>;
}

fn source_error<E: std::error::Error + Send + Sync + 'static>(err: E) -> StakeActivationError {
    StakeActivationError::Source(Box::new(err))
}

/// Fetches the inputs for a stake account from a [`StakeDataSource`] and runs the
/// calculation. Nothing is cached; every call reads fresh snapshots.
pub struct StakeActivationClient<S> {
    source: S,
    calculator: ActivationCalculator,
}

impl<S: StakeDataSource> StakeActivationClient<S> {
    pub fn new(source: S) -> Self {
        Self::with_calculator(source, ActivationCalculator::default())
    }

    pub fn with_calculator(source: S, calculator: ActivationCalculator) -> Self {
        Self { source, calculator }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Activation of the stake account at `address` as of the source's current epoch.
    pub fn get_stake_activation(
        &self,
        address: &Pubkey,
        commitment: Commitment,
    ) -> Result<StakeActivation, StakeActivationError> {
        let epoch = self.source.epoch(commitment).map_err(source_error)?;
        self.get_stake_activation_at(address, epoch, commitment)
    }

    /// Activation of the stake account at `address` as of `epoch`.
    pub fn get_stake_activation_at(
        &self,
        address: &Pubkey,
        epoch: Epoch,
        commitment: Commitment,
    ) -> Result<StakeActivation, StakeActivationError> {
        let stake_history = self
            .source
            .stake_history(commitment)
            .map_err(source_error)?;
        let account = self
            .source
            .stake_account(address, commitment)
            .map_err(|err| source_error(err).for_account(*address, epoch))?;
        debug!(
            "stake account {} at epoch {}: {} history entries",
            address,
            epoch,
            stake_history.len()
        );
        self.calculator
            .stake_activation(address, &account, epoch, &stake_history)
    }
}
