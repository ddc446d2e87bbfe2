//! Wires production handlers into the evaluator and raffle engine

use crate::data::DataFile;
use anyhow::{Context, Result};
use meetup_authorization::AuthorizationEvaluator;
use meetup_core::MeetupConfig;
use meetup_effects::{
    BroadcastNotifier, HmacTokenAuthority, MemoryStore, RealRandomHandler, RealTimeHandler,
    RosterAttendeeDirectory,
};
use meetup_raffle::RaffleEngine;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Handlers for one CLI invocation
pub struct Services {
    /// Store loaded from the data file
    pub store: Arc<MemoryStore>,
    /// Token issuer and verifier
    pub tokens: Arc<HmacTokenAuthority>,
    /// Authorization evaluator
    pub evaluator: AuthorizationEvaluator,
    /// Raffle engine
    pub raffle: RaffleEngine,
    attendees: Arc<RosterAttendeeDirectory>,
    data_path: PathBuf,
}

impl Services {
    /// Load `data_path` and build handlers from `config`
    pub fn open(config: &MeetupConfig, data_path: &Path) -> Result<Self> {
        let data = DataFile::load(data_path)?;
        let store = Arc::new(
            MemoryStore::from_snapshot(data.store).context("data file is inconsistent")?,
        );
        let time = Arc::new(RealTimeHandler::new());
        let tokens = Arc::new(HmacTokenAuthority::from_config(&config.auth, time.clone()));
        let attendees = Arc::new(RosterAttendeeDirectory::new(data.attendees));

        let evaluator = AuthorizationEvaluator::new(tokens.clone(), store.clone(), store.clone());
        let raffle = RaffleEngine::new(
            store.clone(),
            store.clone(),
            Arc::new(RealRandomHandler::new()),
            time,
            config.raffle.clone(),
        )
        .with_attendee_directory(attendees.clone())
        .with_notifier(Arc::new(BroadcastNotifier::from_config(&config.live)));

        tracing::debug!(
            path = %data_path.display(),
            attendees = attendees.len(),
            "Data file loaded"
        );

        Ok(Self {
            store,
            tokens,
            evaluator,
            raffle,
            attendees,
            data_path: data_path.to_path_buf(),
        })
    }

    /// Write the current store back to the data file
    pub async fn persist(&self) -> Result<()> {
        let data = DataFile {
            store: self.store.snapshot().await,
            attendees: self.attendees.names().clone(),
        };
        data.save(&self.data_path)
    }
}
