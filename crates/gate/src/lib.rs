//! Authward Action Gate
//!
//! The gate sits between the host engine's event dispatch and its default
//! handling: one guard function per action channel, each consulting the
//! session registry and answering Proceed or Reject. A Reject obliges the
//! host to abandon its default handling for that event; the gate
//! additionally invokes the channel's corrective engine primitives itself
//! (teleport-back, velocity zeroing, action cancellation, forced failure
//! results) so a held actor cannot affect the world even when the host's
//! own handling is further along.
//!
//! The gate never initiates engine calls outside those corrections, never
//! blocks, and recovers every failure locally: a session lookup error fails
//! closed, a failed engine primitive is logged and retried naturally on the
//! next tick or attempt. Nothing here can take down the host's tick loop.
//!
//! Per-actor state (the drift anchor and notice cooldown) is owned by the
//! gate and keyed by `ActorId`; guards for distinct actors never touch each
//! other's state, so a host that multiplexes actors through a single tick
//! loop needs no locking.

#![deny(unsafe_code)]

pub mod allowlist;
pub mod drift;
pub mod engine;
pub mod messages;
pub mod session;

use authward_core::{
    ActionOutcome, ActorId, BlockPos, DamageBypassConfig, DamageSource, EntityId, GateConfig,
    ItemId,
};
use tracing::{debug, warn};

pub use allowlist::{Classification, CommandAllowlist};
pub use drift::{DriftGuard, DriftOutcome};
pub use engine::{EngineError, EngineHooks};
pub use messages::{DefaultMessages, MessageResolver, NoticeKey};
pub use session::{MemorySessions, SessionError, SessionRegistry};

// ============================================================================
// Guard Decision
// ============================================================================

/// Verdict of a guard: whether the host may continue its default handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a rejected action must not be applied by the host"]
pub enum Decision {
    Proceed,
    Reject,
}

impl Decision {
    pub fn is_proceed(&self) -> bool {
        matches!(self, Self::Proceed)
    }

    pub fn is_reject(&self) -> bool {
        matches!(self, Self::Reject)
    }
}

// ============================================================================
// Action Gate
// ============================================================================

/// The per-channel interception façade.
///
/// The host calls exactly one guard per intercepted event, passing the
/// acting actor, the channel payload, and mutable access to the engine
/// primitives. Authenticated actors always Proceed with no side effects.
pub struct ActionGate<S, M = DefaultMessages> {
    registry: S,
    messages: M,
    allowlist: CommandAllowlist,
    damage_bypass: DamageBypassConfig,
    drift: DriftGuard,
}

impl<S: SessionRegistry> ActionGate<S, DefaultMessages> {
    /// Gate with default configuration and the built-in English notices.
    pub fn with_defaults(registry: S) -> Self {
        Self::new(GateConfig::default(), registry, DefaultMessages)
    }
}

impl<S: SessionRegistry, M: MessageResolver> ActionGate<S, M> {
    pub fn new(config: GateConfig, registry: S, messages: M) -> Self {
        Self {
            allowlist: CommandAllowlist::from_config(&config),
            drift: DriftGuard::new(config.drift),
            damage_bypass: config.damage_bypass,
            registry,
            messages,
        }
    }

    pub fn registry(&self) -> &S {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut S {
        &mut self.registry
    }

    /// Drop all per-actor gate state. The host must call this when the
    /// actor disconnects; nothing survives the session.
    pub fn disconnect(&mut self, actor: ActorId) {
        self.drift.remove(actor);
    }

    /// Number of actors currently held by the drift guard.
    pub fn tracked_actors(&self) -> usize {
        self.drift.tracked_actors()
    }

    // ------------------------------------------------------------------
    // Per-channel guards
    // ------------------------------------------------------------------

    /// Movement channel: invoked once per simulation tick per actor.
    pub fn movement_tick<E: EngineHooks>(&mut self, actor: ActorId, engine: &mut E) -> Decision {
        let authenticated = self.authenticated(actor);
        match self.drift.tick(actor, authenticated, engine) {
            DriftOutcome::Cleared => Decision::Proceed,
            DriftOutcome::Held { notice_due, .. } => {
                if notice_due {
                    self.notify(actor, NoticeKey::MovementBlocked, engine);
                }
                Decision::Reject
            }
        }
    }

    /// Jump attempt. Cancelled outright, no notice.
    pub fn jump<E: EngineHooks>(&self, actor: ActorId, engine: &mut E) -> Decision {
        if self.authenticated(actor) {
            return Decision::Proceed;
        }
        debug!(actor, "jump blocked pre-authentication");
        self.cancel(actor, engine);
        Decision::Reject
    }

    /// Melee/ranged attack on a target entity.
    pub fn attack<E: EngineHooks>(
        &self,
        actor: ActorId,
        target: EntityId,
        engine: &mut E,
    ) -> Decision {
        if self.authenticated(actor) {
            return Decision::Proceed;
        }
        debug!(actor, target, "attack blocked pre-authentication");
        self.cancel(actor, engine);
        self.notify(actor, NoticeKey::AttackBlocked, engine);
        Decision::Reject
    }

    /// Use/right-click on a target entity.
    pub fn interact_entity<E: EngineHooks>(
        &self,
        actor: ActorId,
        target: EntityId,
        engine: &mut E,
    ) -> Decision {
        if self.authenticated(actor) {
            return Decision::Proceed;
        }
        debug!(actor, target, "entity interaction blocked pre-authentication");
        self.force_fail(actor, engine);
        self.notify(actor, NoticeKey::EntityInteractBlocked, engine);
        Decision::Reject
    }

    /// A ground item overlaps the actor's hitbox. No notice: the trigger
    /// is continuous, not a deliberate act.
    pub fn collide_with_item<E: EngineHooks>(
        &self,
        actor: ActorId,
        _item: EntityId,
        engine: &mut E,
    ) -> Decision {
        if self.authenticated(actor) {
            return Decision::Proceed;
        }
        self.cancel(actor, engine);
        Decision::Reject
    }

    /// Incoming damage. Environmental-boundary and privileged-source damage
    /// always applies (per the configured bypass set) so a held actor is
    /// not exploitably invulnerable.
    pub fn take_damage<E: EngineHooks>(
        &self,
        actor: ActorId,
        source: &DamageSource,
        engine: &mut E,
    ) -> Decision {
        if self.authenticated(actor) {
            return Decision::Proceed;
        }
        if self.damage_bypass.bypasses(source) {
            return Decision::Proceed;
        }
        debug!(actor, kind = ?source.kind, "damage suppressed pre-authentication");
        self.force_fail(actor, engine);
        Decision::Reject
    }

    /// Block-break attempt.
    pub fn break_block<E: EngineHooks>(
        &self,
        actor: ActorId,
        position: BlockPos,
        engine: &mut E,
    ) -> Decision {
        if self.authenticated(actor) {
            return Decision::Proceed;
        }
        debug!(actor, ?position, "block break blocked pre-authentication");
        self.force_fail(actor, engine);
        self.notify(actor, NoticeKey::BlockBreakBlocked, engine);
        Decision::Reject
    }

    /// Block-place / block-interact attempt.
    pub fn place_block<E: EngineHooks>(
        &self,
        actor: ActorId,
        position: BlockPos,
        engine: &mut E,
    ) -> Decision {
        if self.authenticated(actor) {
            return Decision::Proceed;
        }
        debug!(actor, ?position, "block place blocked pre-authentication");
        self.force_fail(actor, engine);
        self.notify(actor, NoticeKey::BlockPlaceBlocked, engine);
        Decision::Reject
    }

    /// Right-click-air item use.
    pub fn use_item<E: EngineHooks>(
        &self,
        actor: ActorId,
        item: ItemId,
        engine: &mut E,
    ) -> Decision {
        if self.authenticated(actor) {
            return Decision::Proceed;
        }
        debug!(actor, item, "item use blocked pre-authentication");
        self.force_fail(actor, engine);
        self.notify(actor, NoticeKey::ItemUseBlocked, engine);
        Decision::Reject
    }

    /// A raw chat line. Command-shaped input (leading `/`) passes through
    /// the allowlist; bare chat is never permitted pre-authentication.
    pub fn send_chat<E: EngineHooks>(&self, actor: ActorId, text: &str, engine: &mut E) -> Decision {
        if self.authenticated(actor) {
            return Decision::Proceed;
        }

        let trimmed = text.trim();
        if trimmed.starts_with('/') {
            if self.allowlist.classify(trimmed).is_allowed() {
                return Decision::Proceed;
            }
            debug!(actor, "command blocked pre-authentication");
            self.cancel(actor, engine);
            self.notify(actor, NoticeKey::CommandBlocked, engine);
        } else {
            debug!(actor, "chat blocked pre-authentication");
            self.cancel(actor, engine);
            self.notify(actor, NoticeKey::ChatBlocked, engine);
        }
        Decision::Reject
    }

    /// An already-parsed command submission (no `/` marker required).
    pub fn execute_command<E: EngineHooks>(
        &self,
        actor: ActorId,
        command: &str,
        engine: &mut E,
    ) -> Decision {
        if self.authenticated(actor) {
            return Decision::Proceed;
        }
        if self.allowlist.classify(command).is_allowed() {
            return Decision::Proceed;
        }
        debug!(actor, "command blocked pre-authentication");
        self.cancel(actor, engine);
        self.notify(actor, NoticeKey::CommandBlocked, engine);
        Decision::Reject
    }

    // ------------------------------------------------------------------
    // Internal helpers
    // ------------------------------------------------------------------

    /// Fail-closed session lookup: a registry error counts as
    /// unauthenticated.
    fn authenticated(&self, actor: ActorId) -> bool {
        match self.registry.is_authenticated(actor) {
            Ok(authenticated) => authenticated,
            Err(err) => {
                warn!(actor, error = %err, "session lookup failed; failing closed");
                false
            }
        }
    }

    fn notify<E: EngineHooks>(&self, actor: ActorId, key: NoticeKey, engine: &mut E) {
        engine.send_notice(actor, &self.messages.resolve(key));
    }

    fn cancel<E: EngineHooks>(&self, actor: ActorId, engine: &mut E) {
        if let Err(err) = engine.cancel_current_action(actor) {
            warn!(actor, error = %err, "action cancellation failed; action stays rejected");
        }
    }

    fn force_fail<E: EngineHooks>(&self, actor: ActorId, engine: &mut E) {
        if let Err(err) = engine.force_action_result(actor, ActionOutcome::Fail) {
            warn!(actor, error = %err, "forcing failure result failed; action stays rejected");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use authward_core::{DamageKind, Position, Vec3};

    use super::*;

    /// World double recording every corrective call the gate makes.
    struct RecordingEngine {
        position: Position,
        velocity: Vec3,
        on_ground: bool,
        cancels: u32,
        forced_results: Vec<ActionOutcome>,
        notices: Vec<String>,
    }

    impl RecordingEngine {
        fn new() -> Self {
            Self {
                position: Position::new(0.0, 64.0, 0.0, 0.0, 0.0),
                velocity: Vec3::ZERO,
                on_ground: true,
                cancels: 0,
                forced_results: Vec::new(),
                notices: Vec::new(),
            }
        }

        fn quiet(&self) -> bool {
            self.cancels == 0 && self.forced_results.is_empty() && self.notices.is_empty()
        }
    }

    impl EngineHooks for RecordingEngine {
        fn position(&self, _actor: ActorId) -> Result<Position, EngineError> {
            Ok(self.position)
        }

        fn velocity(&self, _actor: ActorId) -> Result<Vec3, EngineError> {
            Ok(self.velocity)
        }

        fn on_ground(&self, _actor: ActorId) -> bool {
            self.on_ground
        }

        fn set_position(&mut self, _actor: ActorId, position: Position) -> Result<(), EngineError> {
            self.position = position;
            Ok(())
        }

        fn set_velocity(&mut self, _actor: ActorId, velocity: Vec3) -> Result<(), EngineError> {
            self.velocity = velocity;
            Ok(())
        }

        fn zero_fall_accumulator(&mut self, _actor: ActorId) -> Result<(), EngineError> {
            Ok(())
        }

        fn cancel_current_action(&mut self, _actor: ActorId) -> Result<(), EngineError> {
            self.cancels += 1;
            Ok(())
        }

        fn force_action_result(
            &mut self,
            _actor: ActorId,
            outcome: ActionOutcome,
        ) -> Result<(), EngineError> {
            self.forced_results.push(outcome);
            Ok(())
        }

        fn send_notice(&mut self, _actor: ActorId, text: &str) {
            self.notices.push(text.to_string());
        }
    }

    const ACTOR: ActorId = 7;

    fn gate() -> ActionGate<MemorySessions> {
        ActionGate::with_defaults(MemorySessions::new())
    }

    fn authed_gate() -> ActionGate<MemorySessions> {
        let mut gate = gate();
        gate.registry_mut().login(ACTOR);
        gate
    }

    fn text_for(key: NoticeKey) -> String {
        DefaultMessages.resolve(key)
    }

    #[test]
    fn test_authenticated_actor_proceeds_everywhere() {
        let mut gate = authed_gate();
        let mut engine = RecordingEngine::new();

        assert!(gate.movement_tick(ACTOR, &mut engine).is_proceed());
        assert!(gate.jump(ACTOR, &mut engine).is_proceed());
        assert!(gate.attack(ACTOR, 99, &mut engine).is_proceed());
        assert!(gate.interact_entity(ACTOR, 99, &mut engine).is_proceed());
        assert!(gate.collide_with_item(ACTOR, 99, &mut engine).is_proceed());
        assert!(
            gate.take_damage(ACTOR, &DamageSource::new(DamageKind::Melee), &mut engine)
                .is_proceed()
        );
        assert!(
            gate.break_block(ACTOR, BlockPos::new(0, 64, 0), &mut engine)
                .is_proceed()
        );
        assert!(
            gate.place_block(ACTOR, BlockPos::new(0, 64, 0), &mut engine)
                .is_proceed()
        );
        assert!(gate.use_item(ACTOR, 3, &mut engine).is_proceed());
        assert!(gate.send_chat(ACTOR, "hello world", &mut engine).is_proceed());
        assert!(gate.execute_command(ACTOR, "home set", &mut engine).is_proceed());

        // No corrective side effects, no notices, no drift state.
        assert!(engine.quiet());
        assert_eq!(gate.tracked_actors(), 0);
    }

    #[test]
    fn test_movement_tick_holds_unauthenticated_actor() {
        let mut gate = gate();
        let mut engine = RecordingEngine::new();

        assert!(gate.movement_tick(ACTOR, &mut engine).is_reject());
        assert_eq!(gate.tracked_actors(), 1);

        // Authentication clears the hold within one tick.
        gate.registry_mut().login(ACTOR);
        assert!(gate.movement_tick(ACTOR, &mut engine).is_proceed());
        assert_eq!(gate.tracked_actors(), 0);
    }

    #[test]
    fn test_jump_cancelled_silently() {
        let gate = gate();
        let mut engine = RecordingEngine::new();

        assert!(gate.jump(ACTOR, &mut engine).is_reject());
        assert_eq!(engine.cancels, 1);
        assert!(engine.notices.is_empty());
    }

    #[test]
    fn test_attack_cancelled_with_notice_per_attempt() {
        let gate = gate();
        let mut engine = RecordingEngine::new();

        assert!(gate.attack(ACTOR, 99, &mut engine).is_reject());
        assert!(gate.attack(ACTOR, 99, &mut engine).is_reject());

        assert_eq!(engine.cancels, 2);
        // No throttling on discrete channels: one notice per attempt.
        assert_eq!(
            engine.notices,
            vec![
                text_for(NoticeKey::AttackBlocked),
                text_for(NoticeKey::AttackBlocked)
            ]
        );
    }

    #[test]
    fn test_interact_entity_forces_fail_result() {
        let gate = gate();
        let mut engine = RecordingEngine::new();

        assert!(gate.interact_entity(ACTOR, 99, &mut engine).is_reject());
        assert_eq!(engine.forced_results, vec![ActionOutcome::Fail]);
        assert_eq!(engine.notices, vec![text_for(NoticeKey::EntityInteractBlocked)]);
    }

    #[test]
    fn test_item_collision_blocked_silently() {
        let gate = gate();
        let mut engine = RecordingEngine::new();

        assert!(gate.collide_with_item(ACTOR, 42, &mut engine).is_reject());
        assert_eq!(engine.cancels, 1);
        assert!(engine.notices.is_empty());
    }

    #[test]
    fn test_damage_suppressed_except_bypass() {
        let gate = gate();
        let mut engine = RecordingEngine::new();

        // Plain melee: suppressed.
        assert!(
            gate.take_damage(ACTOR, &DamageSource::new(DamageKind::Melee), &mut engine)
                .is_reject()
        );
        assert_eq!(engine.forced_results, vec![ActionOutcome::Fail]);

        // Boundary damage always applies.
        assert!(
            gate.take_damage(ACTOR, &DamageSource::new(DamageKind::OutOfWorld), &mut engine)
                .is_proceed()
        );
        // Privileged-source damage always applies.
        assert!(
            gate.take_damage(
                ACTOR,
                &DamageSource::privileged(DamageKind::Melee),
                &mut engine
            )
            .is_proceed()
        );
        // Damage rejections are silent.
        assert!(engine.notices.is_empty());
    }

    #[test]
    fn test_damage_bypass_is_configurable() {
        let config = GateConfig {
            damage_bypass: DamageBypassConfig {
                kinds: vec![DamageKind::OutOfWorld, DamageKind::Fire],
                privileged_sources: false,
            },
            ..Default::default()
        };
        let gate = ActionGate::new(config, MemorySessions::new(), DefaultMessages);
        let mut engine = RecordingEngine::new();

        assert!(
            gate.take_damage(ACTOR, &DamageSource::new(DamageKind::Fire), &mut engine)
                .is_proceed()
        );
        assert!(
            gate.take_damage(
                ACTOR,
                &DamageSource::privileged(DamageKind::Melee),
                &mut engine
            )
            .is_reject()
        );
    }

    #[test]
    fn test_block_channels_force_fail_with_notice() {
        let gate = gate();
        let mut engine = RecordingEngine::new();
        let position = BlockPos::new(10, 64, -3);

        assert!(gate.break_block(ACTOR, position, &mut engine).is_reject());
        assert!(gate.place_block(ACTOR, position, &mut engine).is_reject());
        assert!(gate.use_item(ACTOR, 5, &mut engine).is_reject());

        assert_eq!(
            engine.forced_results,
            vec![ActionOutcome::Fail, ActionOutcome::Fail, ActionOutcome::Fail]
        );
        assert_eq!(
            engine.notices,
            vec![
                text_for(NoticeKey::BlockBreakBlocked),
                text_for(NoticeKey::BlockPlaceBlocked),
                text_for(NoticeKey::ItemUseBlocked)
            ]
        );
    }

    #[test]
    fn test_chat_blocked_with_chat_notice() {
        let gate = gate();
        let mut engine = RecordingEngine::new();

        assert!(gate.send_chat(ACTOR, "hello world", &mut engine).is_reject());
        assert_eq!(engine.notices, vec![text_for(NoticeKey::ChatBlocked)]);
        assert_eq!(engine.cancels, 1);
    }

    #[test]
    fn test_chat_allowlisted_command_proceeds() {
        let gate = gate();
        let mut engine = RecordingEngine::new();

        assert!(gate.send_chat(ACTOR, "/login hunter2", &mut engine).is_proceed());
        assert!(gate.send_chat(ACTOR, "/register pw pw", &mut engine).is_proceed());
        assert!(engine.quiet());
    }

    #[test]
    fn test_chat_unlisted_command_gets_command_notice() {
        let gate = gate();
        let mut engine = RecordingEngine::new();

        assert!(gate.send_chat(ACTOR, "/kill", &mut engine).is_reject());
        assert_eq!(engine.notices, vec![text_for(NoticeKey::CommandBlocked)]);
    }

    #[test]
    fn test_chat_bare_command_name_is_still_chat() {
        // Without the marker, an allowlisted name in the chat channel is a
        // chat message and stays blocked.
        let gate = gate();
        let mut engine = RecordingEngine::new();

        assert!(gate.send_chat(ACTOR, "register", &mut engine).is_reject());
        assert_eq!(engine.notices, vec![text_for(NoticeKey::ChatBlocked)]);
    }

    #[test]
    fn test_empty_chat_blocked_as_chat() {
        let gate = gate();
        let mut engine = RecordingEngine::new();

        assert!(gate.send_chat(ACTOR, "   ", &mut engine).is_reject());
        assert_eq!(engine.notices, vec![text_for(NoticeKey::ChatBlocked)]);
    }

    #[test]
    fn test_execute_command_allowlist() {
        let gate = gate();
        let mut engine = RecordingEngine::new();

        assert!(gate.execute_command(ACTOR, "login hunter2", &mut engine).is_proceed());
        assert!(gate.execute_command(ACTOR, "reg", &mut engine).is_proceed());
        assert!(gate.execute_command(ACTOR, "kill", &mut engine).is_reject());
        assert_eq!(engine.notices, vec![text_for(NoticeKey::CommandBlocked)]);
        assert_eq!(engine.cancels, 1);
    }

    #[test]
    fn test_registry_failure_fails_closed() {
        struct BrokenRegistry;
        impl SessionRegistry for BrokenRegistry {
            fn is_authenticated(&self, _actor: ActorId) -> Result<bool, SessionError> {
                Err(SessionError::Unavailable("store offline".into()))
            }
        }

        let gate = ActionGate::with_defaults(BrokenRegistry);
        let mut engine = RecordingEngine::new();

        assert!(gate.jump(ACTOR, &mut engine).is_reject());
        assert!(gate.attack(ACTOR, 99, &mut engine).is_reject());
        assert!(gate.send_chat(ACTOR, "hello", &mut engine).is_reject());
    }

    #[test]
    fn test_disconnect_drops_gate_state() {
        let mut gate = gate();
        let mut engine = RecordingEngine::new();

        let _ = gate.movement_tick(ACTOR, &mut engine);
        assert_eq!(gate.tracked_actors(), 1);

        gate.disconnect(ACTOR);
        assert_eq!(gate.tracked_actors(), 0);
    }

    #[test]
    fn test_custom_allowlist_from_config() {
        let config = GateConfig {
            allowed_commands: vec!["auth".to_string()],
            ..Default::default()
        };
        let gate = ActionGate::new(config, MemorySessions::new(), DefaultMessages);
        let mut engine = RecordingEngine::new();

        assert!(gate.send_chat(ACTOR, "/auth pw", &mut engine).is_proceed());
        assert!(gate.send_chat(ACTOR, "/login pw", &mut engine).is_reject());
    }
}
