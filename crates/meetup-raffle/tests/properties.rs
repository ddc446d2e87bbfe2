//! Property tests for draw eligibility and the wins <= entries invariant

use meetup_core::effects::ResourceStore;
use meetup_core::{Meetup, RaffleConfig, Ticket};
use meetup_effects::MemoryStore;
use meetup_raffle::{is_eligible, RaffleEngine};
use meetup_testkit::*;
use proptest::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone)]
enum Step {
    Roll,
    Claim(usize),
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![Just(Step::Roll), (0usize..6).prop_map(Step::Claim)]
}

fn ticket_strategy() -> impl Strategy<Value = (bool, u32, u32)> {
    (any::<bool>(), 0u32..4).prop_flat_map(|(checked_in, entries)| {
        (Just(checked_in), Just(entries), 0..=entries)
    })
}

proptest! {
    #[test]
    fn wins_never_exceed_entries_and_draws_stay_eligible(
        specs in proptest::collection::vec(ticket_strategy(), 1..6),
        steps in proptest::collection::vec(step_strategy(), 1..30),
        seed in any::<u64>(),
    ) {
        tokio_test::block_on(async {
            let store = MemoryStore::new();
            let meetup = Meetup::new(test_meetup_id(1), "Prop", [test_user_id(1)]);
            store.insert_meetup(meetup.clone()).await;

            let mut ids = Vec::new();
            for (i, (checked_in, entries, wins)) in specs.iter().copied().enumerate() {
                let mut builder = TicketBuilder::new(i as u8 + 1, meetup.id)
                    .entries(entries)
                    .wins(wins);
                if checked_in {
                    builder = builder.checked_in();
                }
                let ticket = builder.build();
                ids.push(ticket.id);
                store.insert_ticket(ticket).await.unwrap();
            }

            let shared = Arc::new(store.clone());
            let engine = RaffleEngine::new(
                shared.clone(),
                shared,
                Arc::new(MockRandomHandler::new(seed)),
                Arc::new(ManualClock::default()),
                RaffleConfig::default(),
            );

            for step in steps {
                match step {
                    Step::Roll => {
                        let before: HashMap<_, Ticket> = store
                            .tickets_for_meetup(&meetup.id)
                            .await
                            .unwrap()
                            .into_iter()
                            .map(|t| (t.id, t))
                            .collect();
                        let outcome = engine.roll_winner(&meetup.id).await.unwrap();
                        match outcome.winner() {
                            Some(winner) => {
                                assert!(is_eligible(&before[&winner.ticket_id], &meetup.id));
                            }
                            None => {
                                assert!(before.values().all(|t| !is_eligible(t, &meetup.id)));
                            }
                        }
                    }
                    Step::Claim(index) => {
                        let id = ids[index % ids.len()];
                        engine.claim_winner(&id).await.unwrap();
                    }
                }

                for ticket in store.tickets_for_meetup(&meetup.id).await.unwrap() {
                    assert!(ticket.raffle_wins <= ticket.raffle_entries);
                }
            }
        });
    }
}
