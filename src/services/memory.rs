use crate::models::RawProfile;
use crate::services::source::{ProfileSource, StoreError};
use serde_json::Value;
use std::path::Path;

/// Fixed in-memory population snapshot
///
/// Used by the batch command when profiles come from a JSON export, and by
/// tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProfiles {
    profiles: Vec<RawProfile>,
}

impl InMemoryProfiles {
    pub fn new(profiles: Vec<RawProfile>) -> Self {
        Self { profiles }
    }

    /// Load a JSON array of raw profile records
    ///
    /// Each element is read on its own; an element without a usable id is
    /// skipped with a warning instead of failing the whole file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let records: Vec<Value> = serde_json::from_str(&contents)?;
        let total = records.len();

        let profiles: Vec<RawProfile> = records
            .into_iter()
            .enumerate()
            .filter_map(|(index, record)| match serde_json::from_value::<RawProfile>(record) {
                Ok(profile) => Some(profile),
                Err(e) => {
                    tracing::warn!("Skipping profile record {} without usable id: {}", index, e);
                    None
                }
            })
            .collect();

        tracing::debug!(
            "Loaded {} of {} profiles from {}",
            profiles.len(),
            total,
            path.as_ref().display()
        );
        Ok(Self { profiles })
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl ProfileSource for InMemoryProfiles {
    async fn fetch_active_profiles(&self) -> Result<Vec<RawProfile>, StoreError> {
        Ok(self.profiles.clone())
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}
