//! Models of the RPC `jsonParsed` encoding of stake accounts and the stake history sysvar.
//!
//! The RPC node renders stake amounts and epochs as decimal strings. Everything the
//! calculation needs is validated here, so a malformed payload fails with the name of the
//! offending field instead of producing a wrong answer.

use {
    crate::{
        error::StakeActivationError,
        stake_history::{StakeHistory, StakeHistoryEntry},
        state::{Delegation, StakeAccount},
    },
    serde_derive::{Deserialize, Serialize},
    solana_clock::Epoch,
    solana_pubkey::Pubkey,
    std::str::FromStr,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiParsedAccount<T> {
    pub lamports: u64,
    pub data: UiParsedData<T>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub executable: bool,
    #[serde(default)]
    pub rent_epoch: Option<u64>,
    #[serde(default)]
    pub space: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiParsedData<T> {
    pub parsed: UiParsed<T>,
    #[serde(default)]
    pub program: Option<String>,
    #[serde(default)]
    pub space: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiParsed<T> {
    pub info: T,
    #[serde(rename = "type")]
    pub account_type: String,
}

pub type UiStakeAccount = UiParsedAccount<UiStakeAccountInfo>;
pub type UiStakeHistory = UiParsedAccount<Option<Vec<UiStakeHistoryEntry>>>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UiStakeAccountInfo {
    #[serde(default)]
    pub meta: Option<UiMeta>,
    /// absent while the account is initialized but not delegated
    #[serde(default)]
    pub stake: Option<UiStake>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiMeta {
    #[serde(default)]
    pub rent_exempt_reserve: Option<String>,
    #[serde(default)]
    pub authorized: Option<UiAuthorized>,
    #[serde(default)]
    pub lockup: Option<UiLockup>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiAuthorized {
    pub staker: String,
    pub withdrawer: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiLockup {
    pub custodian: String,
    pub epoch: Epoch,
    pub unix_timestamp: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiStake {
    pub delegation: UiDelegation,
    #[serde(default)]
    pub credits_observed: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiDelegation {
    #[serde(default)]
    pub voter: Option<String>,
    #[serde(default)]
    pub stake: Option<String>,
    #[serde(default)]
    pub activation_epoch: Option<String>,
    #[serde(default)]
    pub deactivation_epoch: Option<String>,
    /// Per-delegation rate carried by the account. The network-wide rate supersedes it.
    #[serde(default)]
    pub warmup_cooldown_rate: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiStakeHistoryEntry {
    pub epoch: Epoch,
    pub stake_history: StakeHistoryEntry,
}

fn required<'a>(
    field: &'static str,
    value: Option<&'a str>,
) -> Result<&'a str, StakeActivationError> {
    value
        .filter(|value| !value.is_empty())
        .ok_or(StakeActivationError::MissingField(field))
}

fn parse_field<T: FromStr>(
    field: &'static str,
    value: Option<&str>,
) -> Result<T, StakeActivationError> {
    let value = required(field, value)?;
    value
        .parse()
        .map_err(|_| StakeActivationError::UnparsableField {
            field,
            value: value.to_string(),
        })
}

impl TryFrom<&UiDelegation> for Delegation {
    type Error = StakeActivationError;

    fn try_from(ui: &UiDelegation) -> Result<Self, Self::Error> {
        let voter_pubkey: Pubkey = parse_field("voter", ui.voter.as_deref())?;
        Ok(Delegation::from_raw_epochs(
            &voter_pubkey,
            parse_field("stake", ui.stake.as_deref())?,
            parse_field("activationEpoch", ui.activation_epoch.as_deref())?,
            parse_field("deactivationEpoch", ui.deactivation_epoch.as_deref())?,
        ))
    }
}

impl TryFrom<&UiStakeAccount> for StakeAccount {
    type Error = StakeActivationError;

    fn try_from(ui: &UiStakeAccount) -> Result<Self, Self::Error> {
        let info = &ui.data.parsed.info;
        let rent_exempt_reserve = parse_field(
            "rentExemptReserve",
            info.meta
                .as_ref()
                .and_then(|meta| meta.rent_exempt_reserve.as_deref()),
        )?;
        let delegation = info
            .stake
            .as_ref()
            .map(|stake| Delegation::try_from(&stake.delegation))
            .transpose()?;

        Ok(StakeAccount {
            lamports: ui.lamports,
            rent_exempt_reserve,
            delegation,
        })
    }
}

impl TryFrom<&UiStakeHistory> for StakeHistory {
    type Error = StakeActivationError;

    fn try_from(ui: &UiStakeHistory) -> Result<Self, Self::Error> {
        let entries = ui
            .data
            .parsed
            .info
            .as_ref()
            .ok_or(StakeActivationError::MissingField("info"))?;
        Ok(entries
            .iter()
            .map(|entry| (entry.epoch, entry.stake_history))
            .collect())
    }
}

/// Decode a `jsonParsed` stake account, as found in the `value` of a `getAccountInfo`
/// response.
pub fn parse_stake_account(json: &str) -> Result<StakeAccount, StakeActivationError> {
    let ui: UiStakeAccount = serde_json::from_str(json)?;
    StakeAccount::try_from(&ui)
}

/// Decode the `jsonParsed` stake history sysvar.
pub fn parse_stake_history(json: &str) -> Result<StakeHistory, StakeActivationError> {
    let ui: UiStakeHistory = serde_json::from_str(json)?;
    StakeHistory::try_from(&ui)
}
