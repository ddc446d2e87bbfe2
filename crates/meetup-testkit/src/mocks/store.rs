use async_trait::async_trait;
use meetup_core::domain::{ClaimOutcome, Identity, Meetup, RaffleRecord, Ticket};
use meetup_core::effects::{
    IdentityStore, RaffleLedger, RaffleWithMeetup, ResourceStore, StoreError, TicketWithMeetup,
};
use meetup_core::{MeetupId, RaffleId, TicketId, UserId};

/// Store whose every call fails with [`StoreError::Unavailable`]
#[derive(Debug, Clone)]
pub struct FailingStore {
    reason: String,
}

impl FailingStore {
    /// Fail with the given reason
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn fail<T>(&self) -> Result<T, StoreError> {
        Err(StoreError::Unavailable(self.reason.clone()))
    }
}

impl Default for FailingStore {
    fn default() -> Self {
        Self::new("connection refused: 10.0.0.5:5432")
    }
}

#[async_trait]
impl IdentityStore for FailingStore {
    async fn find_identity(&self, _id: &UserId) -> Result<Option<Identity>, StoreError> {
        self.fail()
    }
}

#[async_trait]
impl ResourceStore for FailingStore {
    async fn find_meetup(&self, _id: &MeetupId) -> Result<Option<Meetup>, StoreError> {
        self.fail()
    }

    async fn find_ticket(&self, _id: &TicketId) -> Result<Option<Ticket>, StoreError> {
        self.fail()
    }

    async fn find_ticket_with_meetup(
        &self,
        _id: &TicketId,
    ) -> Result<Option<TicketWithMeetup>, StoreError> {
        self.fail()
    }

    async fn find_raffle_with_meetup(
        &self,
        _id: &RaffleId,
    ) -> Result<Option<RaffleWithMeetup>, StoreError> {
        self.fail()
    }

    async fn tickets_for_meetup(&self, _id: &MeetupId) -> Result<Vec<Ticket>, StoreError> {
        self.fail()
    }

    async fn raffle_records_for_meetup(
        &self,
        _id: &MeetupId,
    ) -> Result<Vec<RaffleRecord>, StoreError> {
        self.fail()
    }
}

#[async_trait]
impl RaffleLedger for FailingStore {
    async fn append_raffle_record(&self, _record: RaffleRecord) -> Result<(), StoreError> {
        self.fail()
    }

    async fn claim_ticket_win(&self, _id: &TicketId) -> Result<Option<ClaimOutcome>, StoreError> {
        self.fail()
    }
}
