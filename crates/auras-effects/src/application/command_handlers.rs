//! Command handlers for the Effects context.
//!
//! These run on the authority only. Every handler is idempotent: an actor
//! that already holds a derived effect for an origin is skipped, and
//! deleting something that is already gone is a no-op.

use std::collections::HashSet;

use auras_core::effect::{ActiveEffect, AuraParams, EffectDraft, EffectKind};
use auras_core::error::DomainError;
use auras_core::repository::EffectRepository;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::domain::commands::{
    ApplyAuraEffects, ApplyEffect, ConfigureAura, CreateEffect, DeleteAuraEffects, DeleteEffects,
    SetAuraMode,
};

/// Result of a successfully handled mutation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EffectCommandResult {
    /// Identifiers of effects created.
    pub created: Vec<Uuid>,
    /// Identifiers of effects deleted.
    pub deleted: Vec<Uuid>,
}

/// Returns the origin of a derived effect draft.
fn require_origin(draft: &EffectDraft) -> Result<Uuid, DomainError> {
    if matches!(draft.kind, EffectKind::Aura(_)) {
        return Err(DomainError::Validation(
            "derived effect must not itself be an aura".into(),
        ));
    }
    draft
        .origin
        .ok_or_else(|| DomainError::Validation("derived effect must carry an origin".into()))
}

/// Returns the actor owning the source aura, if it still exists.
async fn source_actor(repo: &dyn EffectRepository, origin: Uuid) -> Result<Option<Uuid>, DomainError> {
    Ok(repo.find_effect(origin).await?.map(|effect| effect.actor_id))
}

/// Handles the `ApplyEffect` command: creates one derived copy per listed
/// actor that does not already hold one.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the draft has no origin or is an
/// aura, or `DomainError` if the repository fails.
#[instrument(skip_all, fields(correlation_id = %command.correlation_id))]
pub async fn handle_apply_effect(
    command: &ApplyEffect,
    repo: &dyn EffectRepository,
) -> Result<EffectCommandResult, DomainError> {
    let origin = require_origin(&command.effect)?;
    let owner = source_actor(repo, origin).await?;

    let mut result = EffectCommandResult::default();
    let mut seen = HashSet::new();
    for &actor_id in &command.actor_ids {
        if !seen.insert(actor_id) || owner == Some(actor_id) {
            continue;
        }
        let created = repo
            .create_derived_effects(actor_id, std::slice::from_ref(&command.effect))
            .await?;
        if created.is_empty() {
            debug!(%actor_id, %origin, "actor already holds derived effect");
        }
        result.created.extend(created.iter().map(|effect| effect.id));
    }

    info!(%origin, created = result.created.len(), "applied derived effect");
    Ok(result)
}

/// Handles the `DeleteEffects` command.
///
/// # Errors
///
/// Returns `DomainError` if the repository fails.
#[instrument(skip_all, fields(correlation_id = %command.correlation_id))]
pub async fn handle_delete_effects(
    command: &DeleteEffects,
    repo: &dyn EffectRepository,
) -> Result<EffectCommandResult, DomainError> {
    if command.effect_ids.is_empty() {
        return Ok(EffectCommandResult::default());
    }

    let deleted = repo.delete_effects(&command.effect_ids).await?;

    info!(
        requested = command.effect_ids.len(),
        deleted = deleted.len(),
        "deleted effects"
    );
    Ok(EffectCommandResult {
        created: Vec::new(),
        deleted,
    })
}

/// Handles the `ApplyAuraEffects` command: creates each distinct derived
/// effect the actor does not already hold.
///
/// # Errors
///
/// Returns `DomainError::Validation` if any draft has no origin or is an
/// aura, or `DomainError` if the repository fails.
#[instrument(skip_all, fields(correlation_id = %command.correlation_id, actor_id = %command.actor_id))]
pub async fn handle_apply_aura_effects(
    command: &ApplyAuraEffects,
    repo: &dyn EffectRepository,
) -> Result<EffectCommandResult, DomainError> {
    let mut seen = HashSet::new();
    let mut drafts = Vec::with_capacity(command.effects.len());
    for draft in &command.effects {
        let origin = require_origin(draft)?;
        if !seen.insert(origin) {
            continue;
        }
        if source_actor(repo, origin).await? == Some(command.actor_id) {
            continue;
        }
        drafts.push(draft.clone());
    }

    if drafts.is_empty() {
        return Ok(EffectCommandResult::default());
    }

    let created = repo
        .create_derived_effects(command.actor_id, &drafts)
        .await?;

    info!(created = created.len(), "applied aura effects");
    Ok(EffectCommandResult {
        created: created.iter().map(|effect| effect.id).collect(),
        deleted: Vec::new(),
    })
}

/// Handles the `DeleteAuraEffects` command: deletes the actor's effects
/// derived from each listed origin. Origins with no derived effect are
/// skipped.
///
/// # Errors
///
/// Returns `DomainError` if the repository fails.
#[instrument(skip_all, fields(correlation_id = %command.correlation_id, actor_id = %command.actor_id))]
pub async fn handle_delete_aura_effects(
    command: &DeleteAuraEffects,
    repo: &dyn EffectRepository,
) -> Result<EffectCommandResult, DomainError> {
    let mut seen = HashSet::new();
    let mut effect_ids = Vec::new();
    for &origin in &command.origin_ids {
        if !seen.insert(origin) {
            continue;
        }
        match repo.find_derived(command.actor_id, origin).await? {
            Some(effect) => effect_ids.push(effect.id),
            None => debug!(%origin, "no derived effect to delete"),
        }
    }

    if effect_ids.is_empty() {
        return Ok(EffectCommandResult::default());
    }

    let deleted = repo.delete_effects(&effect_ids).await?;

    info!(deleted = deleted.len(), "deleted aura effects");
    Ok(EffectCommandResult {
        created: Vec::new(),
        deleted,
    })
}

/// Handles the `CreateEffect` command.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the draft carries an origin or has
/// a negative radius, or `DomainError` if the repository fails.
#[instrument(skip_all, fields(correlation_id = %command.correlation_id, actor_id = %command.actor_id))]
pub async fn handle_create_effect(
    command: &CreateEffect,
    repo: &dyn EffectRepository,
) -> Result<ActiveEffect, DomainError> {
    if command.effect.origin.is_some() {
        return Err(DomainError::Validation(
            "derived effects are only created by aura reconciliation".into(),
        ));
    }
    let invalid_radius = match &command.effect.kind {
        EffectKind::Aura(params) => !params.radius.is_finite() || params.radius < 0.0,
        EffectKind::Base { .. } => false,
    };
    if invalid_radius {
        return Err(DomainError::Validation(
            "aura radius must be a non-negative number".into(),
        ));
    }

    let mut created = repo
        .create_effects(command.actor_id, std::slice::from_ref(&command.effect))
        .await?;
    let effect = created
        .pop()
        .ok_or_else(|| DomainError::Infrastructure("effect store created nothing".into()))?;
    info!(effect_id = %effect.id, "created effect");
    Ok(effect)
}

/// Handles the `SetAuraMode` command: converts the effect to an aura or
/// back to the type it had before.
///
/// # Errors
///
/// Returns `DomainError::EffectNotFound` if the effect does not exist, or
/// `DomainError` if the repository fails.
#[instrument(skip_all, fields(correlation_id = %command.correlation_id, effect_id = %command.effect_id))]
pub async fn handle_set_aura_mode(
    command: &SetAuraMode,
    repo: &dyn EffectRepository,
) -> Result<ActiveEffect, DomainError> {
    let effect = repo
        .find_effect(command.effect_id)
        .await?
        .ok_or(DomainError::EffectNotFound(command.effect_id))?;

    let kind = if command.enabled {
        effect.kind.clone().to_aura()
    } else {
        effect.kind.clone().from_aura()
    };
    if kind == effect.kind {
        return Ok(effect);
    }

    info!(enabled = command.enabled, "switching aura mode");
    repo.update_kind(command.effect_id, kind).await
}

/// Handles the `ConfigureAura` command.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the radius is negative or not a
/// number or the effect is not an aura, `DomainError::EffectNotFound` if
/// it does not exist, or `DomainError` if the repository fails.
#[instrument(skip_all, fields(correlation_id = %command.correlation_id, effect_id = %command.effect_id))]
pub async fn handle_configure_aura(
    command: &ConfigureAura,
    repo: &dyn EffectRepository,
) -> Result<ActiveEffect, DomainError> {
    if !command.radius.is_finite() || command.radius < 0.0 {
        return Err(DomainError::Validation(
            "aura radius must be a non-negative number".into(),
        ));
    }

    let effect = repo
        .find_effect(command.effect_id)
        .await?
        .ok_or(DomainError::EffectNotFound(command.effect_id))?;
    let Some(params) = effect.aura() else {
        return Err(DomainError::Validation(format!(
            "effect {} is not an aura",
            command.effect_id
        )));
    };

    let kind = EffectKind::Aura(AuraParams {
        radius: command.radius,
        disposition: command.disposition,
        collision: command.collision,
        original_type: params.original_type.clone(),
    });

    repo.update_kind(command.effect_id, kind).await
}
