//! Data file: store snapshot plus attendee roster

use anyhow::{Context, Result};
use meetup_core::ExternalAttendeeId;
use meetup_effects::StoreSnapshot;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// On-disk state for the CLI
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataFile {
    /// Identities, meetups, tickets, raffle records
    #[serde(flatten)]
    pub store: StoreSnapshot,
    /// Display names from the ticketing platform
    #[serde(default)]
    pub attendees: BTreeMap<ExternalAttendeeId, String>,
}

impl DataFile {
    /// Read and parse `path`
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read data file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse data file {}", path.display()))
    }

    /// Write to `path` through a sibling temp file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, content)
            .with_context(|| format!("failed to write {}", tmp.display()))?;
        std::fs::rename(&tmp, path)
            .with_context(|| format!("failed to replace data file {}", path.display()))?;
        Ok(())
    }
}
