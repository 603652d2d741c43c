#![allow(clippy::arithmetic_side_effects)]
#![allow(dead_code)]

pub mod stake_tracker;

pub use stake_tracker::StakeTracker;

use {
    solana_pubkey::Pubkey,
    solana_stake_activation::{Delegation, StakeHistory, StakeHistoryEntry},
};

pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Cluster effective stake on mainnet is in the hundreds of millions of SOL.
pub const MAINNET_EFFECTIVE: u64 = 400_000_000 * LAMPORTS_PER_SOL;

pub fn voter(seed: u8) -> Pubkey {
    Pubkey::new_from_array([seed; 32])
}

pub fn one_sol_delegation(activation_epoch: u64) -> Delegation {
    Delegation::new(&voter(1), LAMPORTS_PER_SOL, activation_epoch)
}

/// Uncongested mainnet-like history covering `epochs`.
pub fn mainnet_history(epochs: std::ops::RangeInclusive<u64>) -> StakeHistory {
    epochs
        .map(|epoch| {
            (
                epoch,
                StakeHistoryEntry {
                    effective: MAINNET_EFFECTIVE,
                    activating: 2_000_000 * LAMPORTS_PER_SOL,
                    deactivating: 1_500_000 * LAMPORTS_PER_SOL,
                },
            )
        })
        .collect()
}

pub fn stake_address(seed: u8) -> Pubkey {
    Pubkey::new_from_array([seed; 32])
}
