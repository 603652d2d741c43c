//! Network warmup/cooldown policy injected into the calculator.

use {
    crate::error::StakeActivationError,
    serde_derive::{Deserialize, Serialize},
    solana_clock::Epoch,
};

pub const BASIS_POINTS_PER_UNIT: u64 = 10_000;
pub const ORIGINAL_WARMUP_COOLDOWN_RATE_BPS: u64 = 2_500; // 25%
pub const TOWER_WARMUP_COOLDOWN_RATE_BPS: u64 = 900; // 9%

/// How a fractional per-epoch stake change is turned into whole lamports.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepRounding {
    /// Round half away from zero.
    #[default]
    Nearest,
    /// Truncate toward zero, as the validator's own arithmetic does.
    Floor,
}

/// A rate that applied to every epoch strictly before `until_epoch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyRate {
    pub rate_bps: u64,
    pub until_epoch: Epoch,
}

/// No more than `rate_bps` of the cluster's effective stake may be added or subtracted per
/// epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WarmupCooldownConfig {
    pub rate_bps: u64,
    pub legacy_rate: Option<LegacyRate>,
    pub rounding: StepRounding,
}

impl Default for WarmupCooldownConfig {
    fn default() -> Self {
        Self {
            rate_bps: TOWER_WARMUP_COOLDOWN_RATE_BPS,
            legacy_rate: None,
            rounding: StepRounding::default(),
        }
    }
}

impl WarmupCooldownConfig {
    /// The validator's rate schedule: 25% before `new_rate_activation_epoch`, 9% from it on.
    /// `None` means the new rate never activated.
    pub fn with_new_rate_activation_epoch(new_rate_activation_epoch: Option<Epoch>) -> Self {
        Self {
            legacy_rate: Some(LegacyRate {
                rate_bps: ORIGINAL_WARMUP_COOLDOWN_RATE_BPS,
                until_epoch: new_rate_activation_epoch.unwrap_or(u64::MAX),
            }),
            ..Self::default()
        }
    }

    pub fn with_rounding(self, rounding: StepRounding) -> Self {
        Self { rounding, ..self }
    }

    /// Rate in basis points that governs the transition into `epoch`.
    #[inline]
    pub fn rate_bps(&self, epoch: Epoch) -> u64 {
        match self.legacy_rate {
            Some(legacy) if epoch < legacy.until_epoch => legacy.rate_bps,
            _ => self.rate_bps,
        }
    }

    pub fn validate(&self) -> Result<(), StakeActivationError> {
        let check = |name: &str, rate_bps: u64| {
            if rate_bps == 0 || rate_bps > BASIS_POINTS_PER_UNIT {
                Err(StakeActivationError::InvalidConfig(format!(
                    "{name} must be within 1..={BASIS_POINTS_PER_UNIT} basis points, got {rate_bps}"
                )))
            } else {
                Ok(())
            }
        };
        check("rateBps", self.rate_bps)?;
        if let Some(legacy) = self.legacy_rate {
            check("legacyRate.rateBps", legacy.rate_bps)?;
        }
        Ok(())
    }

    /// Load a configuration from JSON, filling absent fields with defaults.
    pub fn from_json(json: &str) -> Result<Self, StakeActivationError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}
