//! End-to-end exercise of the decision lifecycle over in-memory stores:
//! create → roll → confirm, with the pending, cooldown, and cap gates.

use std::sync::Arc;

use aleator::application::handlers::decision::{
    BinaryParams, CreateDecisionCommand, CreateDecisionHandler, MultiChoiceParams,
    UpdateDecisionCommand, UpdateDecisionHandler,
};
use aleator::application::handlers::roll::{
    ConfirmRollCommand, ConfirmRollHandler, GetPendingRollHandler, GetPendingRollQuery,
    RollDecisionCommand, RollDecisionHandler, RollOverride,
};
use aleator::application::handlers::testing::{
    InMemoryDecisionRepository, InMemoryRollRepository, SequenceRandomSource,
};
use aleator::domain::decision::{Decision, DecisionError, DecisionKind, HistoryEntry};
use aleator::domain::foundation::{ChoiceId, Granularity, UserId};
use aleator::domain::roll::RollSnapshot;

struct Fixture {
    decisions: Arc<InMemoryDecisionRepository>,
    rolls: Arc<InMemoryRollRepository>,
    create: CreateDecisionHandler,
    update: UpdateDecisionHandler,
    roll: RollDecisionHandler,
    confirm: ConfirmRollHandler,
    pending: GetPendingRollHandler,
    user_id: UserId,
}

fn fixture(draws: Vec<u32>) -> Fixture {
    let decisions = Arc::new(InMemoryDecisionRepository::new());
    let rolls = Arc::new(InMemoryRollRepository::linked(decisions.clone()));
    let rng = Arc::new(SequenceRandomSource::new(draws));

    Fixture {
        create: CreateDecisionHandler::new(decisions.clone(), 100),
        update: UpdateDecisionHandler::new(decisions.clone()),
        roll: RollDecisionHandler::new(decisions.clone(), rolls.clone(), rng, 1_000_000),
        confirm: ConfirmRollHandler::new(decisions.clone(), rolls.clone()),
        pending: GetPendingRollHandler::new(decisions.clone(), rolls.clone()),
        decisions,
        rolls,
        user_id: UserId::new(),
    }
}

async fn create_binary(fx: &Fixture, probability: f64, cooldown_hours: f64) -> Decision {
    fx.create
        .handle(CreateDecisionCommand {
            user_id: fx.user_id,
            title: "Skip dessert".to_string(),
            cooldown_hours,
            kind: DecisionKind::Binary,
            binary: Some(BinaryParams {
                probability,
                granularity: Granularity::Whole,
                yes_text: "Yes".to_string(),
                no_text: "No".to_string(),
            }),
            multi_choice: None,
        })
        .await
        .unwrap()
}

#[tokio::test]
async fn full_binary_lifecycle_without_override() {
    let fx = fixture(vec![2999]); // 29.99 < 30 -> yes
    let decision = create_binary(&fx, 30.0, 0.0).await;

    // Creation wrote the initial probability history entry
    assert_eq!(fx.decisions.history().len(), 1);

    let roll = fx
        .roll
        .handle(RollDecisionCommand {
            decision_id: *decision.id(),
            user_id: fx.user_id,
            overrides: None,
        })
        .await
        .unwrap();
    assert_eq!(roll.result(), "yes");

    // The roll is visible as pending
    let pending = fx
        .pending
        .handle(GetPendingRollQuery {
            decision_id: *decision.id(),
            user_id: fx.user_id,
        })
        .await
        .unwrap();
    assert_eq!(pending.unwrap().id(), roll.id());

    // A second roll is blocked until confirmation
    let second = fx
        .roll
        .handle(RollDecisionCommand {
            decision_id: *decision.id(),
            user_id: fx.user_id,
            overrides: None,
        })
        .await;
    assert!(matches!(second, Err(DecisionError::PendingRollExists)));

    // Confirm without follow-through: config stays at 30
    let confirmed = fx
        .confirm
        .handle(ConfirmRollCommand {
            decision_id: *decision.id(),
            roll_id: *roll.id(),
            user_id: fx.user_id,
            followed: false,
        })
        .await
        .unwrap();
    assert_eq!(confirmed.followed(), Some(false));

    let stored = fx.decisions.get(decision.id()).unwrap();
    assert_eq!(stored.binary_config().unwrap().probability().value(), 30.0);

    // Confirming again is rejected
    let again = fx
        .confirm
        .handle(ConfirmRollCommand {
            decision_id: *decision.id(),
            roll_id: *roll.id(),
            user_id: fx.user_id,
            followed: true,
        })
        .await;
    assert!(matches!(again, Err(DecisionError::AlreadyConfirmed)));
}

#[tokio::test]
async fn override_roll_promotes_only_on_follow_through() {
    let fx = fixture(vec![0]);
    let decision = create_binary(&fx, 30.0, 0.0).await;
    let history_after_create = fx.decisions.history().len();

    // Roll with an override probability; live config is untouched
    let roll = fx
        .roll
        .handle(RollDecisionCommand {
            decision_id: *decision.id(),
            user_id: fx.user_id,
            overrides: Some(RollOverride {
                probability: Some(75.0),
                weights: None,
            }),
        })
        .await
        .unwrap();
    assert_eq!(roll.snapshot(), &RollSnapshot::Binary { probability: 75.0 });
    assert_eq!(
        fx.decisions
            .get(decision.id())
            .unwrap()
            .binary_config()
            .unwrap()
            .probability()
            .value(),
        30.0
    );

    // Follow-through commits the snapshot, with no extra history entry
    fx.confirm
        .handle(ConfirmRollCommand {
            decision_id: *decision.id(),
            roll_id: *roll.id(),
            user_id: fx.user_id,
            followed: true,
        })
        .await
        .unwrap();

    let stored = fx.decisions.get(decision.id()).unwrap();
    assert_eq!(stored.binary_config().unwrap().probability().value(), 75.0);
    assert_eq!(fx.decisions.history().len(), history_after_create);
}

#[tokio::test]
async fn cooldown_starts_at_confirmation() {
    let fx = fixture(vec![0]);
    let decision = create_binary(&fx, 50.0, 24.0).await;

    let roll = fx
        .roll
        .handle(RollDecisionCommand {
            decision_id: *decision.id(),
            user_id: fx.user_id,
            overrides: None,
        })
        .await
        .unwrap();
    fx.confirm
        .handle(ConfirmRollCommand {
            decision_id: *decision.id(),
            roll_id: *roll.id(),
            user_id: fx.user_id,
            followed: true,
        })
        .await
        .unwrap();

    let blocked = fx
        .roll
        .handle(RollDecisionCommand {
            decision_id: *decision.id(),
            user_id: fx.user_id,
            overrides: None,
        })
        .await;
    match blocked {
        Err(DecisionError::OnCooldown { ends_at }) => {
            assert_eq!(ends_at, roll.created_at().plus_hours(24.0));
        }
        other => panic!("expected OnCooldown, got {:?}", other),
    }
}

#[tokio::test]
async fn multi_choice_weight_update_appends_history_and_rolls_with_new_weights() {
    let fx = fixture(vec![99]); // draw 100 -> last choice
    let decision = fx
        .create
        .handle(CreateDecisionCommand {
            user_id: fx.user_id,
            title: "Dinner".to_string(),
            cooldown_hours: 0.0,
            kind: DecisionKind::MultiChoice,
            binary: None,
            multi_choice: Some(MultiChoiceParams {
                granularity: Granularity::Whole,
                choices: vec![
                    ("Pizza".to_string(), 40.0),
                    ("Sushi".to_string(), 30.0),
                    ("Salad".to_string(), 30.0),
                ],
            }),
        })
        .await
        .unwrap();
    assert_eq!(fx.decisions.history().len(), 3);

    let ids: Vec<ChoiceId> = decision
        .multi_choice_config()
        .unwrap()
        .choices()
        .iter()
        .map(|c| *c.id())
        .collect();

    let mut cmd = UpdateDecisionCommand::for_decision(*decision.id(), fx.user_id);
    cmd.weights = Some(vec![(ids[0], 20.0), (ids[1], 30.0), (ids[2], 50.0)]);
    fx.update.handle(cmd).await.unwrap();

    // Two weights changed, so two new history entries
    let weight_entries = fx
        .decisions
        .history()
        .iter()
        .filter(|e| matches!(e, HistoryEntry::Weight { .. }))
        .count();
    assert_eq!(weight_entries, 5);

    let roll = fx
        .roll
        .handle(RollDecisionCommand {
            decision_id: *decision.id(),
            user_id: fx.user_id,
            overrides: None,
        })
        .await
        .unwrap();
    assert_eq!(roll.result(), "Salad");
    match roll.snapshot() {
        RollSnapshot::MultiChoice { weights } => {
            let values: Vec<f64> = weights.iter().map(|w| w.weight).collect();
            assert_eq!(values, vec![20.0, 30.0, 50.0]);
        }
        other => panic!("expected multi-choice snapshot, got {:?}", other),
    }

    assert_eq!(fx.rolls.all().len(), 1);
}
