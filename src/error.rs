use {solana_clock::Epoch, solana_pubkey::Pubkey, thiserror::Error};

/// Reasons a stake activation calculation might fail
#[derive(Debug, Error)]
pub enum StakeActivationError {
    /// A required numeric or address field is absent from the account payload.
    #[error("required field `{0}` is missing")]
    MissingField(&'static str),

    /// A required field is present but does not decode.
    #[error("field `{field}` could not be parsed from {value:?}")]
    UnparsableField { field: &'static str, value: String },

    /// A weighted per-epoch amount cannot be represented exactly as an `f64`.
    #[error("stake change of {amount} at epoch {epoch} is not exactly representable as f64")]
    PrecisionLoss { epoch: Epoch, amount: u64 },

    /// The injected warmup/cooldown configuration is unusable.
    #[error("invalid warmup/cooldown configuration: {0}")]
    InvalidConfig(String),

    /// Any failure while computing a specific stake account.
    #[error("stake account {address} at epoch {epoch}: {source}")]
    Account {
        address: Pubkey,
        epoch: Epoch,
        #[source]
        source: Box<StakeActivationError>,
    },

    #[error("failed to decode json payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to decode account data: {0}")]
    Bincode(#[from] bincode::Error),

    /// Failure reported by an external account or epoch source.
    #[error("data source error: {0}")]
    Source(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl StakeActivationError {
    /// Attach the stake account address and target epoch to an error.
    pub fn for_account(self, address: Pubkey, epoch: Epoch) -> Self {
        match self {
            // already carries context
            err @ StakeActivationError::Account { .. } => err,
            err => StakeActivationError::Account {
                address,
                epoch,
                source: Box::new(err),
            },
        }
    }

    /// Strip the account context, if any, and return the underlying error.
    pub fn root_cause(&self) -> &StakeActivationError {
        match self {
            StakeActivationError::Account { source, .. } => source.root_cause(),
            err => err,
        }
    }
}
