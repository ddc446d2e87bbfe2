//! Draw engine tests

use assert_matches::assert_matches;
use meetup_core::effects::{LiveEvent, RandomEffects, ResourceStore};
use meetup_core::{ClaimOutcome, ErrorKind, Meetup, RaffleConfig, WinnerNumber};
use meetup_effects::MemoryStore;
use meetup_raffle::{DrawOutcome, RaffleEngine};
use meetup_testkit::*;
use std::collections::HashSet;
use std::sync::Arc;

fn engine_with(
    store: &MemoryStore,
    random: impl RandomEffects + 'static,
    config: RaffleConfig,
) -> RaffleEngine {
    let store = Arc::new(store.clone());
    RaffleEngine::new(
        store.clone(),
        store,
        Arc::new(random),
        Arc::new(ManualClock::default()),
        config,
    )
}

fn engine(store: &MemoryStore, seed: u64) -> RaffleEngine {
    engine_with(store, MockRandomHandler::new(seed), RaffleConfig::default())
}

#[tokio::test]
async fn test_only_checked_in_ticket_is_drawn() {
    let scenario = RaffleScenario::new();
    for seed in 0..20 {
        let outcome = engine(&scenario.store, seed)
            .roll_winner(&scenario.meetup.id)
            .await
            .unwrap();
        let winner = outcome.winner().expect("t1 is eligible");
        assert_eq!(winner.ticket_id, scenario.t1.id);
        assert_eq!(winner.display_name, "T1");
        assert_eq!(winner.winner_number, WinnerNumber::FIRST);
    }
    assert_eq!(scenario.store.raffle_count().await, 20);
}

#[tokio::test]
async fn test_draw_then_claim_until_exhausted() {
    let scenario = RaffleScenario::new();
    let engine = engine(&scenario.store, 1);

    let first = engine.roll_winner(&scenario.meetup.id).await.unwrap();
    assert_eq!(first.winner().map(|w| w.ticket_id), Some(scenario.t1.id));
    let claimed = engine.claim_winner(&scenario.t1.id).await.unwrap();
    assert_matches!(claimed, ClaimOutcome::Claimed { wins: 1, entries: 2, .. });

    let second = engine.roll_winner(&scenario.meetup.id).await.unwrap();
    assert_eq!(second.winner().map(|w| w.ticket_id), Some(scenario.t1.id));
    let claimed = engine.claim_winner(&scenario.t1.id).await.unwrap();
    assert_matches!(claimed, ClaimOutcome::Claimed { wins: 2, entries: 2, .. });

    let rejected = engine.claim_winner(&scenario.t1.id).await.unwrap();
    assert_matches!(rejected, ClaimOutcome::NotEligible { wins: 2, entries: 2, .. });
    assert_eq!(
        rejected.into_result().unwrap_err().kind(),
        ErrorKind::InvariantViolation
    );

    let records_before = scenario.store.raffle_count().await;
    let third = engine.roll_winner(&scenario.meetup.id).await.unwrap();
    assert_eq!(third, DrawOutcome::NoEligibleEntrants);
    assert_eq!(scenario.store.raffle_count().await, records_before);
}

#[tokio::test]
async fn test_empty_pool_writes_nothing() {
    let store = MemoryStore::new();
    let meetup = Meetup::new(test_meetup_id(1), "Empty", [test_user_id(1)]);
    store.insert_meetup(meetup.clone()).await;
    store
        .insert_ticket(TicketBuilder::new(1, meetup.id).entries(5).build())
        .await
        .unwrap();

    let outcome = engine(&store, 3).roll_winner(&meetup.id).await.unwrap();
    assert_eq!(outcome, DrawOutcome::NoEligibleEntrants);
    assert_eq!(store.raffle_count().await, 0);
}

#[tokio::test]
async fn test_unknown_meetup_is_not_found() {
    let store = MemoryStore::new();
    let err = engine(&store, 0)
        .roll_winner(&test_meetup_id(9))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_external_attendee_name_is_resolved() {
    let scenario = RaffleScenario::new();
    let ticket = TicketBuilder::new(20, scenario.meetup.id)
        .external("evt-1001")
        .named("walk-in form name")
        .checked_in()
        .build();
    scenario.store.insert_ticket(ticket.clone()).await.unwrap();

    let directory = MockAttendeeDirectory::new().with_attendee("evt-1001", "Grace Hopper");
    // Pool is in ticket id order: [t1, external]
    let engine = engine_with(
        &scenario.store,
        ScriptedRandomHandler::new([1]),
        RaffleConfig::default(),
    )
    .with_attendee_directory(Arc::new(directory.clone()));

    let outcome = engine.roll_winner(&scenario.meetup.id).await.unwrap();
    let winner = outcome.winner().unwrap();
    assert_eq!(winner.ticket_id, ticket.id);
    assert_eq!(winner.display_name, "Grace Hopper");
    assert_eq!(directory.call_count(), 1);
}

#[tokio::test]
async fn test_attendee_failure_aborts_draw() {
    let scenario = RaffleScenario::new();
    let meetup = Meetup::new(test_meetup_id(30), "External only", [test_user_id(30)]);
    scenario.store.insert_meetup(meetup.clone()).await;
    scenario
        .store
        .insert_ticket(
            TicketBuilder::new(31, meetup.id)
                .external("evt-31")
                .checked_in()
                .build(),
        )
        .await
        .unwrap();

    let directory = MockAttendeeDirectory::new().with_attendee("evt-31", "Known");
    directory.set_unreachable(true);
    let engine = engine(&scenario.store, 0).with_attendee_directory(Arc::new(directory));

    let err = engine.roll_winner(&meetup.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ExternalDependency);
    assert_eq!(scenario.store.raffle_count().await, 0);

    let unconfigured = self::engine(&scenario.store, 0)
        .roll_winner(&meetup.id)
        .await
        .unwrap_err();
    assert_eq!(unconfigured.kind(), ErrorKind::ExternalDependency);
    assert_eq!(scenario.store.raffle_count().await, 0);
}

#[tokio::test]
async fn test_draw_publishes_winner_event() {
    let scenario = RaffleScenario::new();
    let notifier = RecordingNotifier::new();
    let engine = engine(&scenario.store, 5).with_notifier(Arc::new(notifier.clone()));

    let outcome = engine.roll_winner(&scenario.meetup.id).await.unwrap();
    let winner = outcome.winner().unwrap().clone();

    let event = notifier.next_event().await.expect("winner event");
    assert_eq!(
        event,
        LiveEvent::RaffleWinner {
            meetup_id: scenario.meetup.id,
            raffle_id: winner.raffle_id,
            ticket_id: winner.ticket_id,
            winner_number: WinnerNumber::FIRST,
            display_name: "T1".into(),
        }
    );

    engine.claim_winner(&scenario.t1.id).await.unwrap();
    let event = notifier.next_event().await.expect("claim event");
    assert_eq!(
        event,
        LiveEvent::WinnerClaimed {
            meetup_id: scenario.meetup.id,
            ticket_id: scenario.t1.id,
            wins: 1,
        }
    );
}

#[tokio::test]
async fn test_notifier_failure_does_not_fail_draw() {
    let scenario = RaffleScenario::new();
    let notifier = RecordingNotifier::failing();
    let engine = engine(&scenario.store, 5).with_notifier(Arc::new(notifier.clone()));

    let outcome = engine.roll_winner(&scenario.meetup.id).await.unwrap();
    assert!(outcome.winner().is_some());
    assert!(notifier.next_event().await.is_some());
}

#[tokio::test]
async fn test_multi_winner_draw_numbers_distinct_tickets() {
    let store = MemoryStore::new();
    let meetup = Meetup::new(test_meetup_id(40), "Big Night", [test_user_id(40)]);
    store.insert_meetup(meetup.clone()).await;
    for seed in 41..45 {
        store
            .insert_ticket(TicketBuilder::new(seed, meetup.id).checked_in().build())
            .await
            .unwrap();
    }

    let engine = engine(&store, 9);
    let winners = engine.roll_winners(&meetup.id, 3).await.unwrap();
    assert_eq!(winners.len(), 3);
    let distinct: HashSet<_> = winners.iter().map(|w| w.ticket_id).collect();
    assert_eq!(distinct.len(), 3);
    let numbers: Vec<u32> = winners.iter().map(|w| w.winner_number.0).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    assert!(winners.iter().all(|w| w.raffle_id == winners[0].raffle_id));

    let all = engine.roll_winners(&meetup.id, 10).await.unwrap();
    assert_eq!(all.len(), 4);

    let records = store.raffle_records_for_meetup(&meetup.id).await.unwrap();
    assert_eq!(records.len(), 2);
}

#[tokio::test]
async fn test_winner_count_bounds() {
    let scenario = RaffleScenario::new();
    let engine = engine(&scenario.store, 0);

    let zero = engine.roll_winners(&scenario.meetup.id, 0).await.unwrap_err();
    assert_eq!(zero.kind(), ErrorKind::Validation);

    let too_many = engine
        .roll_winners(&scenario.meetup.id, 11)
        .await
        .unwrap_err();
    assert_eq!(too_many.kind(), ErrorKind::Validation);
    assert_eq!(scenario.store.raffle_count().await, 0);
}

#[tokio::test]
async fn test_serialized_draws_count_pending_wins() {
    let store = MemoryStore::new();
    let meetup = Meetup::new(test_meetup_id(50), "Serial", [test_user_id(50)]);
    store.insert_meetup(meetup.clone()).await;
    let only = TicketBuilder::new(51, meetup.id).checked_in().build();
    store.insert_ticket(only.clone()).await.unwrap();

    // Default: the unclaimed win does not remove the ticket from the pool
    let loose = engine(&store, 0);
    assert!(loose.roll_winner(&meetup.id).await.unwrap().winner().is_some());
    assert!(loose.roll_winner(&meetup.id).await.unwrap().winner().is_some());

    let serial_store = MemoryStore::new();
    serial_store.insert_meetup(meetup.clone()).await;
    serial_store.insert_ticket(only.clone()).await.unwrap();
    let config = RaffleConfig {
        serialize_draws: true,
        ..RaffleConfig::default()
    };
    let serial = Arc::new(engine_with(&serial_store, MockRandomHandler::new(0), config));

    let (a, b) = tokio::join!(
        serial.roll_winner(&meetup.id),
        serial.roll_winner(&meetup.id)
    );
    let drawn = [a.unwrap(), b.unwrap()]
        .into_iter()
        .filter(|o| o.winner().is_some())
        .count();
    assert_eq!(drawn, 1);
    assert_eq!(serial_store.raffle_count().await, 1);

    // Claiming the pending win keeps the ticket out: its single entry is used
    let claimed = serial.claim_winner(&only.id).await.unwrap();
    assert!(claimed.is_claimed());
    assert_eq!(
        serial.roll_winner(&meetup.id).await.unwrap(),
        DrawOutcome::NoEligibleEntrants
    );
}
