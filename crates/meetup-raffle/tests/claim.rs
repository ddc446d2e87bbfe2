//! Claim tests: atomic counting and winner bookkeeping

use assert_matches::assert_matches;
use meetup_core::effects::ResourceStore;
use meetup_core::{ClaimOutcome, ErrorKind, Meetup, RaffleConfig, WinnerNumber};
use meetup_effects::MemoryStore;
use meetup_raffle::RaffleEngine;
use meetup_testkit::*;
use std::sync::Arc;

fn engine(store: &MemoryStore) -> RaffleEngine {
    let store = Arc::new(store.clone());
    RaffleEngine::new(
        store.clone(),
        store,
        Arc::new(MockRandomHandler::default()),
        Arc::new(ManualClock::default()),
        RaffleConfig::default(),
    )
}

async fn store_with_ticket(entries: u32, wins: u32) -> (MemoryStore, Meetup, meetup_core::Ticket) {
    let store = MemoryStore::new();
    let meetup = Meetup::new(test_meetup_id(1), "Claims", [test_user_id(1)]);
    store.insert_meetup(meetup.clone()).await;
    let ticket = TicketBuilder::new(1, meetup.id)
        .checked_in()
        .entries(entries)
        .wins(wins)
        .build();
    store.insert_ticket(ticket.clone()).await.unwrap();
    (store, meetup, ticket)
}

#[tokio::test]
async fn test_concurrent_claims_on_last_slot() {
    let (store, _, ticket) = store_with_ticket(2, 1).await;
    let engine = engine(&store);

    let (a, b) = tokio::join!(engine.claim_winner(&ticket.id), engine.claim_winner(&ticket.id));
    let outcomes = [a.unwrap(), b.unwrap()];
    let claimed = outcomes.iter().filter(|o| o.is_claimed()).count();
    assert_eq!(claimed, 1);

    let stored = store.find_ticket(&ticket.id).await.unwrap().unwrap();
    assert_eq!(stored.raffle_wins, 2);
}

#[tokio::test]
async fn test_many_concurrent_claims_never_exceed_entries() {
    let (store, _, ticket) = store_with_ticket(3, 0).await;
    let engine = Arc::new(engine(&store));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let engine = engine.clone();
        let id = ticket.id;
        handles.push(tokio::spawn(async move { engine.claim_winner(&id).await }));
    }
    let mut claimed = 0;
    for handle in handles {
        if handle.await.unwrap().unwrap().is_claimed() {
            claimed += 1;
        }
    }
    assert_eq!(claimed, 3);

    let stored = store.find_ticket(&ticket.id).await.unwrap().unwrap();
    assert_eq!(stored.raffle_wins, 3);
}

#[tokio::test]
async fn test_zero_entry_ticket_is_not_eligible() {
    let (store, _, ticket) = store_with_ticket(0, 0).await;
    let outcome = engine(&store).claim_winner(&ticket.id).await.unwrap();
    assert_matches!(outcome, ClaimOutcome::NotEligible { wins: 0, entries: 0, .. });
}

#[tokio::test]
async fn test_unknown_ticket_is_not_found() {
    let store = MemoryStore::new();
    let err = engine(&store)
        .claim_winner(&test_ticket_id(42))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_claim_marks_oldest_winner_entry() {
    let (store, meetup, ticket) = store_with_ticket(2, 0).await;
    let engine = engine(&store);

    let first = engine.roll_winner(&meetup.id).await.unwrap();
    let second = engine.roll_winner(&meetup.id).await.unwrap();
    let first_raffle = first.winner().unwrap().raffle_id;
    let second_raffle = second.winner().unwrap().raffle_id;

    let outcome = engine.claim_winner(&ticket.id).await.unwrap();
    assert_matches!(
        outcome,
        ClaimOutcome::Claimed { wins: 1, winner: Some((raffle, WinnerNumber(1))), .. }
            if raffle == first_raffle
    );

    let records = store.raffle_records_for_meetup(&meetup.id).await.unwrap();
    assert!(records[0].winners[0].claimed);
    assert!(!records[1].winners[0].claimed);

    let outcome = engine.claim_winner(&ticket.id).await.unwrap();
    assert_matches!(
        outcome,
        ClaimOutcome::Claimed { wins: 2, winner: Some((raffle, _)), .. } if raffle == second_raffle
    );
}

#[tokio::test]
async fn test_claim_without_draw_still_counts() {
    let (store, _, ticket) = store_with_ticket(1, 0).await;
    let outcome = engine(&store).claim_winner(&ticket.id).await.unwrap();
    assert_matches!(outcome, ClaimOutcome::Claimed { wins: 1, winner: None, .. });
}
