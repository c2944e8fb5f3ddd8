//! Shared harness for reconciler integration tests.
//!
//! Wires a player-side reconciler to an in-process authority that applies
//! requests to an in-memory effect store.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use auras_core::disposition::{AuraDisposition, TokenDisposition};
use auras_core::effect::{ActiveEffect, AuraParams, EffectChange, EffectKind};
use auras_core::error::DomainError;
use auras_core::geometry::{CollisionPolicy, Position, TokenPlacement};
use auras_core::repository::EffectRepository;
use auras_effect_store::memory_effect_repository::InMemoryEffectRepository;
use auras_gateway::application::client::ArbitrationGateway;
use auras_gateway::application::dispatcher::GatewayDispatcher;
use auras_gateway::domain::channel::AuthorityChannel;
use auras_sync::application::reconciler::{
    MovementReconciler, ReconcileOutcome, ReconcilerPorts,
};
use auras_sync::config::AuraSettings;
use auras_sync::domain::movement::{MovementOptions, PositionDelta};
use auras_sync::domain::session::SessionState;
use auras_test_support::{
    GridGeometry, InMemoryScene, LoopbackChannel, RecordingNotifier, StaticAuthority,
};
use uuid::Uuid;

pub struct World {
    pub player_id: Uuid,
    pub gm_id: Uuid,
    pub scene_id: Uuid,
    pub geometry: Arc<GridGeometry>,
    pub scene: Arc<InMemoryScene>,
    pub repo: Arc<InMemoryEffectRepository>,
    pub authority: Arc<StaticAuthority>,
    pub notifier: Arc<RecordingNotifier>,
    pub loopback: Arc<LoopbackChannel>,
    pub session: Arc<SessionState>,
    pub reconciler: MovementReconciler,
}

impl World {
    /// A session where a game master holds authority and the player moves
    /// tokens.
    pub fn new() -> Self {
        Self::build(None, AuraSettings::default())
    }

    /// Same as [`World::new`] with custom settings.
    pub fn with_settings(settings: AuraSettings) -> Self {
        Self::build(None, settings)
    }

    /// Same as [`World::new`] but requests go through `channel` instead of
    /// reaching the in-process authority.
    pub fn with_channel(channel: Arc<dyn AuthorityChannel>, settings: AuraSettings) -> Self {
        Self::build(Some(channel), settings)
    }

    fn build(channel: Option<Arc<dyn AuthorityChannel>>, settings: AuraSettings) -> Self {
        let player_id = Uuid::new_v4();
        let gm_id = Uuid::new_v4();
        let geometry = Arc::new(GridGeometry::new());
        let scene = Arc::new(InMemoryScene::new());
        let repo = Arc::new(InMemoryEffectRepository::new());
        let authority = Arc::new(StaticAuthority::held_by(gm_id));
        let notifier = Arc::new(RecordingNotifier::new());

        let dispatcher = GatewayDispatcher::new(gm_id, authority.clone(), repo.clone());
        let loopback = Arc::new(LoopbackChannel::new(dispatcher));
        let channel: Arc<dyn AuthorityChannel> = match channel {
            Some(channel) => channel,
            None => loopback.clone(),
        };
        let gateway = ArbitrationGateway::new(authority.clone(), channel, settings.gateway_timeout);

        let session = Arc::new(SessionState::new(player_id));
        let ports = ReconcilerPorts {
            geometry: geometry.clone(),
            scene: scene.clone(),
            movement: scene.clone(),
            effects: repo.clone(),
            notifier: notifier.clone(),
        };
        let reconciler = MovementReconciler::new(session.clone(), ports, gateway, settings);

        Self {
            player_id,
            gm_id,
            scene_id: Uuid::new_v4(),
            geometry,
            scene,
            repo,
            authority,
            notifier,
            loopback,
            session,
            reconciler,
        }
    }

    /// Places a token for a new actor.
    pub fn place(&self, disposition: TokenDisposition, x: f64, y: f64) -> TokenPlacement {
        self.place_for(Uuid::new_v4(), disposition, x, y)
    }

    /// Places another token for `actor_id`.
    pub fn place_for(
        &self,
        actor_id: Uuid,
        disposition: TokenDisposition,
        x: f64,
        y: f64,
    ) -> TokenPlacement {
        let token = TokenPlacement {
            token_id: Uuid::new_v4(),
            actor_id,
            scene_id: self.scene_id,
            disposition,
            position: Position {
                x,
                y,
                elevation: 0.0,
            },
        };
        self.scene.place(token.clone());
        token
    }

    /// Gives `actor_id` an aura effect.
    pub async fn give_aura(
        &self,
        actor_id: Uuid,
        radius: f64,
        disposition: AuraDisposition,
    ) -> ActiveEffect {
        let effect = ActiveEffect {
            id: Uuid::new_v4(),
            actor_id,
            name: "Aura of Protection".to_owned(),
            origin: None,
            kind: EffectKind::Aura(AuraParams {
                radius,
                disposition,
                collision: CollisionPolicy::Move,
                original_type: "base".to_owned(),
            }),
            changes: vec![EffectChange {
                key: "system.bonuses.save".to_owned(),
                value: serde_json::json!(3),
            }],
        };
        self.repo.insert(effect.clone()).await.unwrap();
        effect
    }

    /// Gives `actor_id` the effect derived from `aura` without reconciling.
    pub async fn give_derived(&self, actor_id: Uuid, aura: &ActiveEffect) -> ActiveEffect {
        let draft = aura.derive().unwrap();
        self.repo
            .create_effects(actor_id, &[draft])
            .await
            .unwrap()
            .remove(0)
    }

    /// The effect on `actor_id` derived from `aura`, if any.
    pub async fn derived(&self, actor_id: Uuid, aura: &ActiveEffect) -> Option<ActiveEffect> {
        self.repo.find_derived(actor_id, aura.id).await.unwrap()
    }

    /// Moves `token` to (x, y) in one segment, initiated by the player.
    pub async fn move_to(
        &self,
        token: &TokenPlacement,
        x: f64,
        y: f64,
    ) -> Result<ReconcileOutcome, DomainError> {
        self.move_segment(token, x, y, true).await
    }

    /// Moves `token` along one segment of a path, initiated by the player.
    pub async fn move_segment(
        &self,
        token: &TokenPlacement,
        x: f64,
        y: f64,
        is_final: bool,
    ) -> Result<ReconcileOutcome, DomainError> {
        self.scene.begin_segment(
            token.token_id,
            Position {
                x,
                y,
                elevation: 0.0,
            },
            is_final,
        );
        let delta = PositionDelta {
            x: Some(x),
            y: Some(y),
            elevation: None,
        };
        self.reconciler
            .on_token_moved(token, &delta, &MovementOptions::default(), self.player_id)
            .await
    }

    /// Operation names of the requests the authority received, in order.
    pub fn operations(&self) -> Vec<&'static str> {
        self.loopback
            .requests()
            .iter()
            .map(|request| request.operation())
            .collect()
    }
}

/// Settings with a short gateway timeout.
pub fn quick_settings() -> AuraSettings {
    AuraSettings {
        gateway_timeout: Duration::from_millis(25),
        ..AuraSettings::default()
    }
}
