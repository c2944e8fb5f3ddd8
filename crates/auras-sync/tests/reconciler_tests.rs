//! End-to-end movement reconciliation against an in-process authority.

mod common;

use std::sync::Arc;

use auras_core::disposition::{AuraDisposition, SecretDispositionPolicy, TokenDisposition};
use auras_core::effect::EffectKind;
use auras_core::error::DomainError;
use auras_core::geometry::CollisionPolicy;
use auras_gateway::domain::requests::{
    APPLY_AURA_EFFECTS, APPLY_EFFECT, DELETE_AURA_EFFECTS, DELETE_EFFECTS,
};
use auras_sync::application::reconciler::{
    NO_AUTHORITY_WARNING, ReconcileOutcome, ReconcileReport, SkipReason,
};
use auras_sync::config::AuraSettings;
use auras_sync::domain::movement::{MovementOptions, PositionDelta};
use auras_test_support::{FailingChannel, HangingChannel};
use common::{World, quick_settings};
use uuid::Uuid;

// --- source perspective ---

#[tokio::test]
async fn test_moving_aura_into_range_applies_derived_effect() {
    // Arrange
    let world = World::new();
    let paladin = world.place(TokenDisposition::Friendly, 0.0, 0.0);
    let fighter = world.place(TokenDisposition::Friendly, 30.0, 0.0);
    let aura = world
        .give_aura(paladin.actor_id, 10.0, AuraDisposition::Allies)
        .await;

    // Act
    let outcome = world.move_to(&paladin, 25.0, 0.0).await.unwrap();

    // Assert
    assert_eq!(
        outcome,
        ReconcileOutcome::Reconciled(ReconcileReport {
            removal_requests: 0,
            addition_requests: 1,
        })
    );
    let derived = world.derived(fighter.actor_id, &aura).await.unwrap();
    assert_eq!(derived.name, aura.name);
    assert!(derived.is_derived_from(aura.id));
    assert_eq!(
        derived.kind,
        EffectKind::Base {
            type_tag: "base".to_owned()
        }
    );
    assert_eq!(derived.changes, aura.changes);
    assert_eq!(world.operations(), vec![APPLY_EFFECT]);
}

#[tokio::test]
async fn test_token_exactly_at_radius_is_inside() {
    let world = World::new();
    let source = world.place(TokenDisposition::Friendly, 0.0, 0.0);
    let target = world.place(TokenDisposition::Friendly, 40.0, 0.0);
    let aura = world
        .give_aura(source.actor_id, 10.0, AuraDisposition::Any)
        .await;

    world.move_to(&source, 30.0, 0.0).await.unwrap();

    assert!(world.derived(target.actor_id, &aura).await.is_some());
}

#[tokio::test]
async fn test_moving_aura_away_removes_derived_effect() {
    // Arrange
    let world = World::new();
    let source = world.place(TokenDisposition::Friendly, 0.0, 0.0);
    let target = world.place(TokenDisposition::Friendly, 5.0, 0.0);
    let aura = world
        .give_aura(source.actor_id, 10.0, AuraDisposition::Any)
        .await;
    world.give_derived(target.actor_id, &aura).await;

    // Act
    let outcome = world.move_to(&source, -20.0, 0.0).await.unwrap();

    // Assert
    assert_eq!(
        outcome,
        ReconcileOutcome::Reconciled(ReconcileReport {
            removal_requests: 1,
            addition_requests: 0,
        })
    );
    assert!(world.derived(target.actor_id, &aura).await.is_none());
    assert_eq!(world.operations(), vec![DELETE_EFFECTS]);
}

#[tokio::test]
async fn test_removal_is_acknowledged_before_addition() {
    // Arrange
    let world = World::new();
    let source = world.place(TokenDisposition::Friendly, 0.0, 0.0);
    let leaving = world.place(TokenDisposition::Friendly, 5.0, 0.0);
    let entering = world.place(TokenDisposition::Friendly, 30.0, 0.0);
    let aura = world
        .give_aura(source.actor_id, 10.0, AuraDisposition::Any)
        .await;
    world.give_derived(leaving.actor_id, &aura).await;

    // Act
    world.move_to(&source, 25.0, 0.0).await.unwrap();

    // Assert
    assert_eq!(world.operations(), vec![DELETE_EFFECTS, APPLY_EFFECT]);
    assert!(world.derived(leaving.actor_id, &aura).await.is_none());
    assert!(world.derived(entering.actor_id, &aura).await.is_some());
}

#[tokio::test]
async fn test_repeated_event_without_movement_sends_nothing() {
    // Arrange
    let world = World::new();
    let source = world.place(TokenDisposition::Friendly, 0.0, 0.0);
    let target = world.place(TokenDisposition::Friendly, 30.0, 0.0);
    let aura = world
        .give_aura(source.actor_id, 10.0, AuraDisposition::Any)
        .await;
    world.move_to(&source, 25.0, 0.0).await.unwrap();
    let sent = world.operations().len();

    // Act
    let outcome = world.move_to(&source, 25.0, 0.0).await.unwrap();

    // Assert
    assert_eq!(
        outcome,
        ReconcileOutcome::Reconciled(ReconcileReport::default())
    );
    assert_eq!(world.operations().len(), sent);
    let holders = world.repo.derived_from(aura.id).await;
    assert_eq!(holders.len(), 1);
    assert_eq!(holders[0].0, target.actor_id);
}

#[tokio::test]
async fn test_actor_already_holding_effect_is_not_sent_again() {
    let world = World::new();
    let source = world.place(TokenDisposition::Friendly, 0.0, 0.0);
    let target = world.place(TokenDisposition::Friendly, 6.0, 0.0);
    let aura = world
        .give_aura(source.actor_id, 10.0, AuraDisposition::Any)
        .await;
    world.give_derived(target.actor_id, &aura).await;

    world.move_to(&source, 2.0, 0.0).await.unwrap();

    assert!(world.operations().is_empty());
}

#[tokio::test]
async fn test_actor_in_range_missing_effect_receives_it_on_next_move() {
    let world = World::new();
    let source = world.place(TokenDisposition::Friendly, 0.0, 0.0);
    let target = world.place(TokenDisposition::Friendly, 6.0, 0.0);
    let aura = world
        .give_aura(source.actor_id, 10.0, AuraDisposition::Any)
        .await;

    world.move_to(&source, 1.0, 0.0).await.unwrap();

    assert!(world.derived(target.actor_id, &aura).await.is_some());
}

#[tokio::test]
async fn test_aura_never_lands_on_its_own_actor() {
    // Arrange
    let world = World::new();
    let actor_id = Uuid::new_v4();
    let first = world.place_for(actor_id, TokenDisposition::Friendly, 0.0, 0.0);
    world.place_for(actor_id, TokenDisposition::Friendly, 30.0, 0.0);
    let aura = world.give_aura(actor_id, 10.0, AuraDisposition::Any).await;

    // Act
    world.move_to(&first, 28.0, 0.0).await.unwrap();

    // Assert
    assert!(world.derived(actor_id, &aura).await.is_none());
    assert!(world.operations().is_empty());
}

#[tokio::test]
async fn test_inert_aura_reaches_nobody() {
    let world = World::new();
    let source = world.place(TokenDisposition::Friendly, 0.0, 0.0);
    world.place(TokenDisposition::Friendly, 30.0, 0.0);
    world
        .give_aura(source.actor_id, 0.0, AuraDisposition::Any)
        .await;

    world.move_to(&source, 30.0, 1.0).await.unwrap();

    assert!(world.operations().is_empty());
}

#[tokio::test]
async fn test_wall_blocking_collision_policy_keeps_effect_out() {
    let world = World::new();
    let source = world.place(TokenDisposition::Friendly, 0.0, 0.0);
    let target = world.place(TokenDisposition::Friendly, 30.0, 0.0);
    let aura = world
        .give_aura(source.actor_id, 10.0, AuraDisposition::Any)
        .await;
    world
        .geometry
        .block(source.token_id, target.token_id, CollisionPolicy::Move);

    world.move_to(&source, 25.0, 0.0).await.unwrap();

    assert!(world.derived(target.actor_id, &aura).await.is_none());
}

// --- multi-segment paths ---

#[tokio::test]
async fn test_additions_wait_for_final_segment() {
    // Arrange
    let world = World::new();
    let source = world.place(TokenDisposition::Friendly, 0.0, 0.0);
    let target = world.place(TokenDisposition::Friendly, 30.0, 0.0);
    let aura = world
        .give_aura(source.actor_id, 10.0, AuraDisposition::Any)
        .await;

    // Act / Assert: in range mid-path, nothing is added.
    world.move_segment(&source, 25.0, 0.0, false).await.unwrap();
    assert!(world.derived(target.actor_id, &aura).await.is_none());

    world.move_segment(&source, 50.0, 0.0, false).await.unwrap();
    assert!(world.derived(target.actor_id, &aura).await.is_none());

    world.move_segment(&source, 22.0, 0.0, true).await.unwrap();
    assert!(world.derived(target.actor_id, &aura).await.is_some());
    assert_eq!(world.operations(), vec![APPLY_EFFECT]);
}

#[tokio::test]
async fn test_removals_apply_mid_path() {
    let world = World::new();
    let source = world.place(TokenDisposition::Friendly, 0.0, 0.0);
    let target = world.place(TokenDisposition::Friendly, 5.0, 0.0);
    let aura = world
        .give_aura(source.actor_id, 10.0, AuraDisposition::Any)
        .await;
    world.give_derived(target.actor_id, &aura).await;

    world.move_segment(&source, -30.0, 0.0, false).await.unwrap();

    assert!(world.derived(target.actor_id, &aura).await.is_none());
    assert_eq!(world.operations(), vec![DELETE_EFFECTS]);
}

#[tokio::test]
async fn test_leaving_and_reentering_over_three_segments() {
    // Arrange
    let world = World::new();
    let guardian = world.place(TokenDisposition::Friendly, 0.0, 0.0);
    let scout = world.place(TokenDisposition::Friendly, 5.0, 0.0);
    let aura = world
        .give_aura(guardian.actor_id, 10.0, AuraDisposition::Any)
        .await;
    world.give_derived(scout.actor_id, &aura).await;

    // Act / Assert: leaving is applied on the first segment.
    world.move_segment(&scout, 40.0, 0.0, false).await.unwrap();
    assert!(world.derived(scout.actor_id, &aura).await.is_none());
    assert_eq!(world.operations(), vec![DELETE_AURA_EFFECTS]);

    // Still outside: nothing to send.
    world.move_segment(&scout, 40.0, 20.0, false).await.unwrap();
    assert!(world.derived(scout.actor_id, &aura).await.is_none());
    assert_eq!(world.operations(), vec![DELETE_AURA_EFFECTS]);

    // Back inside on the final segment.
    world.move_segment(&scout, 8.0, 0.0, true).await.unwrap();
    assert!(world.derived(scout.actor_id, &aura).await.is_some());
    assert_eq!(
        world.operations(),
        vec![DELETE_AURA_EFFECTS, APPLY_AURA_EFFECTS]
    );
}

// --- multi-token actors ---

#[tokio::test]
async fn test_twin_token_still_in_range_keeps_derived_effect() {
    // Arrange
    let world = World::new();
    let source = world.place(TokenDisposition::Friendly, 0.0, 0.0);
    world.place_for(source.actor_id, TokenDisposition::Friendly, 8.0, 0.0);
    let target = world.place(TokenDisposition::Friendly, 5.0, 0.0);
    let aura = world
        .give_aura(source.actor_id, 10.0, AuraDisposition::Any)
        .await;
    let held = world.give_derived(target.actor_id, &aura).await;

    // Act
    world.move_to(&source, -50.0, 0.0).await.unwrap();

    // Assert
    let still_held = world.derived(target.actor_id, &aura).await.unwrap();
    assert_eq!(still_held.id, held.id);
    assert!(world.operations().is_empty());
}

#[tokio::test]
async fn test_twin_token_out_of_range_does_not_keep_derived_effect() {
    let world = World::new();
    let source = world.place(TokenDisposition::Friendly, 0.0, 0.0);
    world.place_for(source.actor_id, TokenDisposition::Friendly, 80.0, 0.0);
    let target = world.place(TokenDisposition::Friendly, 5.0, 0.0);
    let aura = world
        .give_aura(source.actor_id, 10.0, AuraDisposition::Any)
        .await;
    world.give_derived(target.actor_id, &aura).await;

    world.move_to(&source, -50.0, 0.0).await.unwrap();

    assert!(world.derived(target.actor_id, &aura).await.is_none());
    assert_eq!(world.operations(), vec![DELETE_EFFECTS]);
}

// --- disposition ---

#[tokio::test]
async fn test_enemies_aura_reaches_enemies_from_either_side() {
    // Arrange
    let world = World::new();
    let hostile_source = world.place(TokenDisposition::Hostile, 0.0, 0.0);
    let friendly_target = world.place(TokenDisposition::Friendly, 30.0, 0.0);
    let friendly_source = world.place(TokenDisposition::Friendly, 0.0, 100.0);
    let hostile_target = world.place(TokenDisposition::Hostile, 30.0, 100.0);
    let friendly_bystander = world.place(TokenDisposition::Friendly, 30.0, 95.0);
    let hostile_aura = world
        .give_aura(hostile_source.actor_id, 10.0, AuraDisposition::Enemies)
        .await;
    let friendly_aura = world
        .give_aura(friendly_source.actor_id, 10.0, AuraDisposition::Enemies)
        .await;

    // Act
    world.move_to(&hostile_source, 25.0, 0.0).await.unwrap();
    world.move_to(&friendly_source, 25.0, 100.0).await.unwrap();

    // Assert
    assert!(
        world
            .derived(friendly_target.actor_id, &hostile_aura)
            .await
            .is_some()
    );
    assert!(
        world
            .derived(hostile_target.actor_id, &friendly_aura)
            .await
            .is_some()
    );
    assert!(
        world
            .derived(friendly_bystander.actor_id, &friendly_aura)
            .await
            .is_none()
    );
}

#[tokio::test]
async fn test_excluded_secret_tokens_receive_nothing() {
    let world = World::with_settings(AuraSettings {
        secret_disposition: SecretDispositionPolicy::Exclude,
        ..AuraSettings::default()
    });
    let source = world.place(TokenDisposition::Friendly, 0.0, 0.0);
    let secret = world.place(TokenDisposition::Secret, 30.0, 0.0);
    let aura = world
        .give_aura(source.actor_id, 10.0, AuraDisposition::Any)
        .await;

    world.move_to(&source, 25.0, 0.0).await.unwrap();

    assert!(world.derived(secret.actor_id, &aura).await.is_none());
}

// --- target perspective ---

#[tokio::test]
async fn test_walking_into_and_out_of_an_aura() {
    // Arrange
    let world = World::new();
    let guardian = world.place(TokenDisposition::Hostile, 0.0, 0.0);
    let rogue = world.place(TokenDisposition::Friendly, 30.0, 0.0);
    let aura = world
        .give_aura(guardian.actor_id, 10.0, AuraDisposition::Enemies)
        .await;

    // Act
    world.move_to(&rogue, 8.0, 0.0).await.unwrap();
    let entered = world.derived(rogue.actor_id, &aura).await;
    world.move_to(&rogue, 40.0, 0.0).await.unwrap();
    let left = world.derived(rogue.actor_id, &aura).await;

    // Assert
    assert!(entered.is_some());
    assert!(left.is_none());
    assert_eq!(
        world.operations(),
        vec![APPLY_AURA_EFFECTS, DELETE_AURA_EFFECTS]
    );
}

#[tokio::test]
async fn test_target_pass_removes_before_adding() {
    // Arrange
    let world = World::new();
    let first = world.place(TokenDisposition::Friendly, 0.0, 0.0);
    let second = world.place(TokenDisposition::Friendly, 100.0, 0.0);
    let mover = world.place(TokenDisposition::Friendly, 5.0, 0.0);
    let first_aura = world
        .give_aura(first.actor_id, 10.0, AuraDisposition::Allies)
        .await;
    let second_aura = world
        .give_aura(second.actor_id, 10.0, AuraDisposition::Allies)
        .await;
    world.give_derived(mover.actor_id, &first_aura).await;

    // Act
    world.move_to(&mover, 95.0, 0.0).await.unwrap();

    // Assert
    assert_eq!(
        world.operations(),
        vec![DELETE_AURA_EFFECTS, APPLY_AURA_EFFECTS]
    );
    assert!(world.derived(mover.actor_id, &first_aura).await.is_none());
    assert!(world.derived(mover.actor_id, &second_aura).await.is_some());
}

#[tokio::test]
async fn test_target_pass_defers_additions_mid_path() {
    let world = World::new();
    let guardian = world.place(TokenDisposition::Friendly, 0.0, 0.0);
    let mover = world.place(TokenDisposition::Friendly, 30.0, 0.0);
    let aura = world
        .give_aura(guardian.actor_id, 10.0, AuraDisposition::Any)
        .await;

    world.move_segment(&mover, 5.0, 0.0, false).await.unwrap();

    assert!(world.derived(mover.actor_id, &aura).await.is_none());
    assert!(world.operations().is_empty());
}

// --- skips ---

#[tokio::test]
async fn test_update_without_position_change_is_skipped() {
    let world = World::new();
    let token = world.place(TokenDisposition::Friendly, 0.0, 0.0);

    let outcome = world
        .reconciler
        .on_token_moved(
            &token,
            &PositionDelta::default(),
            &MovementOptions::default(),
            world.player_id,
        )
        .await
        .unwrap();

    assert_eq!(outcome, ReconcileOutcome::Skipped(SkipReason::NotAMove));
}

#[tokio::test]
async fn test_move_by_another_participant_is_skipped() {
    let world = World::new();
    let token = world.place(TokenDisposition::Friendly, 0.0, 0.0);
    let delta = PositionDelta {
        x: Some(10.0),
        ..PositionDelta::default()
    };

    let outcome = world
        .reconciler
        .on_token_moved(&token, &delta, &MovementOptions::default(), world.gm_id)
        .await
        .unwrap();

    assert_eq!(outcome, ReconcileOutcome::Skipped(SkipReason::NotInitiator));
    assert_eq!(world.scene.settle_count(), 0);
}

#[tokio::test]
async fn test_missing_authority_warns_once_and_sends_nothing() {
    // Arrange
    let world = World::new();
    world.authority.set(None);
    let source = world.place(TokenDisposition::Friendly, 0.0, 0.0);
    world.place(TokenDisposition::Friendly, 30.0, 0.0);
    world
        .give_aura(source.actor_id, 10.0, AuraDisposition::Any)
        .await;

    // Act
    let first = world.move_to(&source, 25.0, 0.0).await.unwrap();
    let second = world.move_to(&source, 0.0, 0.0).await.unwrap();

    // Assert
    assert_eq!(first, ReconcileOutcome::Skipped(SkipReason::NoAuthority));
    assert_eq!(second, ReconcileOutcome::Skipped(SkipReason::NoAuthority));
    assert_eq!(world.notifier.warnings(), vec![NO_AUTHORITY_WARNING.to_owned()]);
    assert!(world.operations().is_empty());
    assert!(world.session.has_warned_no_authority());
}

// --- gateway failures ---

#[tokio::test]
async fn test_rejected_request_is_reported() {
    let world = World::with_channel(
        Arc::new(FailingChannel::new("document locked")),
        AuraSettings::default(),
    );
    let source = world.place(TokenDisposition::Friendly, 0.0, 0.0);
    world.place(TokenDisposition::Friendly, 30.0, 0.0);
    world
        .give_aura(source.actor_id, 10.0, AuraDisposition::Any)
        .await;

    let result = world.move_to(&source, 25.0, 0.0).await;

    match result.unwrap_err() {
        DomainError::GatewayRejected { operation, reason } => {
            assert_eq!(operation, APPLY_EFFECT);
            assert_eq!(reason, "document locked");
        }
        other => panic!("expected GatewayRejected, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unanswered_request_times_out() {
    let world = World::with_channel(Arc::new(HangingChannel), quick_settings());
    let source = world.place(TokenDisposition::Friendly, 0.0, 0.0);
    let target = world.place(TokenDisposition::Friendly, 5.0, 0.0);
    let aura = world
        .give_aura(source.actor_id, 10.0, AuraDisposition::Any)
        .await;
    world.give_derived(target.actor_id, &aura).await;

    let result = world.move_to(&source, 50.0, 0.0).await;

    assert!(matches!(
        result,
        Err(DomainError::GatewayTimeout {
            operation: DELETE_EFFECTS,
            timeout_ms: 25
        })
    ));
    assert!(world.derived(target.actor_id, &aura).await.is_some());
}
