//! End-to-end command tests against a temporary data file

use clap::Parser;
use meetup_authorization::MeetupOperation;
use meetup_cli::commands::{AuthorizeArgs, RaffleCommand, TicketCommand, TokenCommand};
use meetup_cli::{execute, Command, DataFile};
use meetup_core::{ErrorKind, ExternalAttendeeId, MeetupConfig, MeetupError, UserId};
use meetup_testkit::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct Harness {
    _dir: TempDir,
    data: PathBuf,
    config: MeetupConfig,
    scenario: StandardScenario,
}

impl Harness {
    async fn new() -> Self {
        let scenario = StandardScenario::new();
        scenario
            .store
            .insert_ticket(
                TicketBuilder::new(60, scenario.meetup.id)
                    .owned_by(scenario.stranger.id)
                    .entries(2)
                    .build(),
            )
            .await
            .unwrap();

        let dir = TempDir::new().unwrap();
        let data = dir.path().join("meetup-data.json");
        let mut file = DataFile {
            store: scenario.store.snapshot().await,
            ..DataFile::default()
        };
        file.attendees
            .insert(ExternalAttendeeId::new("evt-7"), "Grace".to_string());
        file.save(&data).unwrap();

        let mut config = MeetupConfig::default();
        config.auth.token_secret = TEST_SECRET.to_string();

        Self {
            _dir: dir,
            data,
            config,
            scenario,
        }
    }

    async fn run(&self, command: Command) -> anyhow::Result<serde_json::Value> {
        execute(command, &self.config, &self.data).await
    }

    async fn token(&self, user: UserId) -> String {
        let output = self
            .run(Command::Token(TokenCommand::Issue { user }))
            .await
            .unwrap();
        output["token"].as_str().unwrap().to_string()
    }

    fn reload(&self) -> DataFile {
        DataFile::load(&self.data).unwrap()
    }
}

fn error_kind(err: &anyhow::Error) -> Option<ErrorKind> {
    err.downcast_ref::<MeetupError>().map(MeetupError::kind)
}

#[tokio::test]
async fn test_token_issue_requires_known_user() {
    let harness = Harness::new().await;
    let token = harness.token(harness.scenario.organizer.id).await;
    assert_eq!(token.split('.').count(), 2);

    let unknown = harness
        .run(Command::Token(TokenCommand::Issue {
            user: test_user_id(99),
        }))
        .await;
    assert!(unknown.is_err());
}

#[tokio::test]
async fn test_check_in_persists() {
    let harness = Harness::new().await;
    let token = harness.token(harness.scenario.organizer.id).await;
    let ticket = test_ticket_id(60);

    let output = harness
        .run(Command::Ticket(TicketCommand::CheckIn { token, ticket }))
        .await
        .unwrap();
    assert_eq!(output["is_checked_in"], true);

    let stored = harness
        .reload()
        .store
        .tickets
        .into_iter()
        .find(|t| t.id == ticket)
        .unwrap();
    assert!(stored.is_checked_in);
}

#[tokio::test]
async fn test_check_in_denied_for_attendee() {
    let harness = Harness::new().await;
    let token = harness.token(harness.scenario.attendee.id).await;

    let err = harness
        .run(Command::Ticket(TicketCommand::CheckIn {
            token,
            ticket: test_ticket_id(60),
        }))
        .await
        .unwrap_err();
    assert_eq!(error_kind(&err), Some(ErrorKind::AuthorizationDenied));
    let stored = harness.reload().store.tickets;
    assert!(!stored
        .iter()
        .any(|t| t.id == test_ticket_id(60) && t.is_checked_in));
}

#[tokio::test]
async fn test_roll_and_claim_round() {
    let harness = Harness::new().await;
    let token = harness.token(harness.scenario.organizer.id).await;
    let meetup = harness.scenario.meetup.id;
    let records_before = harness.reload().store.raffles.len();

    let rolled = harness
        .run(Command::Raffle(RaffleCommand::Roll {
            token: token.clone(),
            meetup,
            count: 1,
        }))
        .await
        .unwrap();
    let winners = rolled["winners"].as_array().unwrap();
    assert_eq!(winners.len(), 1);
    assert_eq!(
        winners[0]["ticket_id"],
        serde_json::json!(harness.scenario.attendee_ticket.id)
    );
    assert_eq!(harness.reload().store.raffles.len(), records_before + 1);

    let claimed = harness
        .run(Command::Raffle(RaffleCommand::Claim {
            token: token.clone(),
            ticket: harness.scenario.attendee_ticket.id,
        }))
        .await
        .unwrap();
    assert_eq!(claimed["outcome"], "claimed");
    assert_eq!(claimed["wins"], 1);

    // Single entry used up
    let again = harness
        .run(Command::Raffle(RaffleCommand::Claim {
            token: token.clone(),
            ticket: harness.scenario.attendee_ticket.id,
        }))
        .await
        .unwrap_err();
    assert_eq!(error_kind(&again), Some(ErrorKind::InvariantViolation));

    let empty = harness
        .run(Command::Raffle(RaffleCommand::Roll {
            token,
            meetup,
            count: 1,
        }))
        .await
        .unwrap();
    assert!(empty["winners"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_roll_denied_for_outside_organizer() {
    let harness = Harness::new().await;
    let token = harness.token(harness.scenario.outside_organizer.id).await;

    let err = harness
        .run(Command::Raffle(RaffleCommand::Roll {
            token,
            meetup: harness.scenario.meetup.id,
            count: 1,
        }))
        .await
        .unwrap_err();
    assert_eq!(error_kind(&err), Some(ErrorKind::AuthorizationDenied));
}

#[tokio::test]
async fn test_authorize_reports_decision() {
    let harness = Harness::new().await;
    let token = harness.token(harness.scenario.admin.id).await;

    let allowed = harness
        .run(Command::Authorize(AuthorizeArgs {
            token: token.clone(),
            operation: MeetupOperation::ViewUser,
            user: Some(harness.scenario.attendee.id),
            meetup: None,
            ticket: None,
            raffle: None,
        }))
        .await
        .unwrap();
    assert_eq!(allowed["decision"], "allow");

    let denied = harness
        .run(Command::Authorize(AuthorizeArgs {
            token: token.clone(),
            operation: MeetupOperation::RollRaffle,
            user: None,
            meetup: Some(harness.scenario.meetup.id),
            ticket: None,
            raffle: None,
        }))
        .await
        .unwrap();
    assert_eq!(denied["decision"], "deny");

    let bad_refs = harness
        .run(Command::Authorize(AuthorizeArgs {
            token,
            operation: MeetupOperation::RollRaffle,
            user: None,
            meetup: None,
            ticket: None,
            raffle: None,
        }))
        .await
        .unwrap_err();
    assert_eq!(error_kind(&bad_refs), Some(ErrorKind::Validation));
}

#[tokio::test]
async fn test_attendee_roster_survives_save() {
    let harness = Harness::new().await;
    let token = harness.token(harness.scenario.organizer.id).await;
    harness
        .run(Command::Ticket(TicketCommand::CheckIn {
            token,
            ticket: test_ticket_id(60),
        }))
        .await
        .unwrap();

    let data = harness.reload();
    assert_eq!(
        data.attendees.get(&ExternalAttendeeId::new("evt-7")),
        Some(&"Grace".to_string())
    );
}

#[test]
fn test_missing_data_file_is_an_error() {
    assert!(DataFile::load(Path::new("/nonexistent/meetup-data.json")).is_err());
}

#[derive(Parser)]
struct TestCli {
    #[command(subcommand)]
    command: Command,
}

#[test]
fn test_command_line_parsing() {
    let meetup = test_meetup_id(1);
    let meetup_arg = meetup.to_string();
    let ticket_arg = test_ticket_id(2).to_string();
    let cli = TestCli::try_parse_from([
        "meetup",
        "raffle",
        "roll",
        "--token",
        "abc.def",
        "--meetup",
        meetup_arg.as_str(),
        "--count",
        "3",
    ])
    .unwrap();
    match cli.command {
        Command::Raffle(RaffleCommand::Roll {
            meetup: parsed,
            count,
            ..
        }) => {
            assert_eq!(parsed, meetup);
            assert_eq!(count, 3);
        }
        other => panic!("unexpected command: {other:?}"),
    }

    let cli = TestCli::try_parse_from([
        "meetup",
        "authorize",
        "--token",
        "abc.def",
        "--operation",
        "check-in-ticket",
        "--ticket",
        ticket_arg.as_str(),
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Command::Authorize(AuthorizeArgs {
            operation: MeetupOperation::CheckInTicket,
            ..
        })
    ));

    let unknown_operation = TestCli::try_parse_from([
        "meetup",
        "authorize",
        "--token",
        "t",
        "--operation",
        "nope",
    ]);
    assert!(unknown_operation.is_err());
}
