use {
    crate::{
        config::{StepRounding, WarmupCooldownConfig, BASIS_POINTS_PER_UNIT},
        error::StakeActivationError,
        precision::is_exact_f64,
        stake_history::StakeHistoryEntry,
    },
    log::warn,
    solana_clock::Epoch,
};

/// Calculates the rate-limited stake warmup for a single account entering `current_epoch`.
///
/// This function allocates a share of the cluster's per-epoch activation allowance
/// proportional to the account's share of the previous epoch's total activating stake.
pub fn calculate_activation_allowance(
    config: &WarmupCooldownConfig,
    current_epoch: Epoch,
    account_activating_stake: u64,
    prev_epoch_cluster_state: &StakeHistoryEntry,
) -> Result<u64, StakeActivationError> {
    rate_limited_stake_change(
        config,
        current_epoch,
        account_activating_stake,
        prev_epoch_cluster_state.activating,
        prev_epoch_cluster_state.effective,
    )
}

/// Calculates the rate-limited stake cooldown for a single account entering `current_epoch`.
///
/// This function allocates a share of the cluster's per-epoch deactivation allowance
/// proportional to the account's share of the previous epoch's total deactivating stake.
pub fn calculate_deactivation_allowance(
    config: &WarmupCooldownConfig,
    current_epoch: Epoch,
    account_deactivating_stake: u64,
    prev_epoch_cluster_state: &StakeHistoryEntry,
) -> Result<u64, StakeActivationError> {
    rate_limited_stake_change(
        config,
        current_epoch,
        account_deactivating_stake,
        prev_epoch_cluster_state.deactivating,
        prev_epoch_cluster_state.effective,
    )
}

fn rate_limited_stake_change(
    config: &WarmupCooldownConfig,
    epoch: Epoch,
    account_portion: u64,
    cluster_portion: u64,
    cluster_effective: u64,
) -> Result<u64, StakeActivationError> {
    // Nothing to change, and guards the division below
    if account_portion == 0 || cluster_portion == 0 || cluster_effective == 0 {
        return Ok(0);
    }

    let rate_bps = config.rate_bps(epoch) as u128;

    // `change = (account_portion / cluster_portion) * (cluster_effective * rate)`, evaluated
    // exactly as `(account_portion * cluster_effective * rate_bps) / (cluster_portion * 10_000)`.
    //
    // `account_portion * cluster_effective` always fits in u128, but the extra `rate_bps`
    // factor may not. Splitting the first product into quotient and remainder over the
    // denominator keeps every intermediate in range:
    //   n * r / d == (n / d) * r + ((n % d) * r) / d
    let numerator = account_portion as u128 * cluster_effective as u128;
    let denominator = cluster_portion as u128 * BASIS_POINTS_PER_UNIT as u128;

    let whole = numerator / denominator;
    let scaled_remainder = (numerator % denominator) * rate_bps;
    let fraction = scaled_remainder % denominator;
    let delta = whole
        .checked_mul(rate_bps)
        .and_then(|delta| delta.checked_add(scaled_remainder / denominator))
        .map(|delta| match config.rounding {
            // `fraction < denominator < 2^78`, doubling cannot overflow
            StepRounding::Nearest if fraction * 2 >= denominator => delta.saturating_add(1),
            StepRounding::Nearest | StepRounding::Floor => delta,
        })
        // an overflowing change is larger than anything the account can move
        .unwrap_or(u128::MAX);

    // The network allowance can exceed what is waiting to change; then all of it changes.
    let delta = delta.min(account_portion as u128) as u64;

    if !is_exact_f64(delta) {
        warn!(
            "stake change of {} at epoch {} ({} of {} cluster, {} effective) loses f64 precision",
            delta, epoch, account_portion, cluster_portion, cluster_effective
        );
        return Err(StakeActivationError::PrecisionLoss {
            epoch,
            amount: delta,
        });
    }

    Ok(delta)
}
