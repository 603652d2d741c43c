//! A type to hold the network-wide stake aggregates published by the stake history sysvar.

pub use solana_clock::Epoch;
use {
    crate::error::StakeActivationError,
    serde_derive::{Deserialize, Serialize},
    std::{ops::Deref, sync::Arc},
};

pub const MAX_ENTRIES: usize = 512; // it should never take as many as 512 epochs to warm up or cool down

#[repr(C)]
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Default, Clone, Copy)]
pub struct StakeHistoryEntry {
    pub effective: u64,    // effective stake at this epoch
    pub activating: u64,   // sum of portion of stakes not fully warmed up
    pub deactivating: u64, // requested to be cooled down, not fully deactivated yet
}

impl StakeHistoryEntry {
    pub fn with_effective(effective: u64) -> Self {
        Self {
            effective,
            ..Self::default()
        }
    }

    pub fn with_effective_and_activating(effective: u64, activating: u64) -> Self {
        Self {
            effective,
            activating,
            ..Self::default()
        }
    }

    pub fn with_deactivating(deactivating: u64) -> Self {
        Self {
            effective: deactivating,
            deactivating,
            ..Self::default()
        }
    }
}

impl std::ops::Add for StakeHistoryEntry {
    type Output = StakeHistoryEntry;
    fn add(self, rhs: StakeHistoryEntry) -> Self::Output {
        Self {
            effective: self.effective.saturating_add(rhs.effective),
            activating: self.activating.saturating_add(rhs.activating),
            deactivating: self.deactivating.saturating_add(rhs.deactivating),
        }
    }
}

/// Per-epoch cluster aggregates, newest epoch first.
///
/// Lookups are exact: an epoch that is not in the snapshot has no history, and nothing is
/// interpolated from its neighbours.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Default, Clone)]
pub struct StakeHistory(Vec<(Epoch, StakeHistoryEntry)>);

impl StakeHistory {
    pub fn get(&self, epoch: Epoch) -> Option<&StakeHistoryEntry> {
        self.binary_search_by(|probe| epoch.cmp(&probe.0))
            .ok()
            .map(|index| &self[index].1)
    }

    pub fn add(&mut self, epoch: Epoch, entry: StakeHistoryEntry) {
        match self.binary_search_by(|probe| epoch.cmp(&probe.0)) {
            Ok(index) => (self.0)[index] = (epoch, entry),
            Err(index) => (self.0).insert(index, (epoch, entry)),
        }
        (self.0).truncate(MAX_ENTRIES);
    }

    /// Decode the raw data of the stake history sysvar account.
    pub fn from_account_data(data: &[u8]) -> Result<Self, StakeActivationError> {
        let entries: Vec<(Epoch, StakeHistoryEntry)> = bincode::deserialize(data)?;
        // the sysvar is already newest-first; `add` re-sorts anything else
        Ok(entries.into_iter().collect())
    }

    pub fn newest_epoch(&self) -> Option<Epoch> {
        self.first().map(|(epoch, _)| *epoch)
    }

    pub fn oldest_epoch(&self) -> Option<Epoch> {
        self.last().map(|(epoch, _)| *epoch)
    }
}

impl FromIterator<(Epoch, StakeHistoryEntry)> for StakeHistory {
    fn from_iter<I: IntoIterator<Item = (Epoch, StakeHistoryEntry)>>(iter: I) -> Self {
        let mut stake_history = StakeHistory::default();
        for (epoch, entry) in iter {
            stake_history.add(epoch, entry);
        }
        stake_history
    }
}

impl Deref for StakeHistory {
    type Target = Vec<(Epoch, StakeHistoryEntry)>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Exact-match lookup of a cluster aggregate by epoch.
pub trait StakeHistoryGetEntry {
    fn get_entry(&self, epoch: Epoch) -> Option<StakeHistoryEntry>;
}

impl StakeHistoryGetEntry for StakeHistory {
    fn get_entry(&self, epoch: Epoch) -> Option<StakeHistoryEntry> {
        self.get(epoch).copied()
    }
}

impl<T: StakeHistoryGetEntry + ?Sized> StakeHistoryGetEntry for &T {
    fn get_entry(&self, epoch: Epoch) -> Option<StakeHistoryEntry> {
        (**self).get_entry(epoch)
    }
}

impl<T: StakeHistoryGetEntry + ?Sized> StakeHistoryGetEntry for Arc<T> {
    fn get_entry(&self, epoch: Epoch) -> Option<StakeHistoryEntry> {
        self.deref().get_entry(epoch)
    }
}
