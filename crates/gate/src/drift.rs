//! Position anchoring and drift correction for unauthenticated actors.
//!
//! An unauthenticated actor is pinned near the position it held when it
//! entered the world (or when its authentication lapsed). Correction is
//! interval-based: drift is measured every `check_interval_ticks` ticks and
//! the actor is snapped back to its anchor only when it exceeds the squared
//! distance budget, so the per-tick cost stays at a counter increment plus
//! two cheap velocity clamps. The clamps run every tick because a single
//! tick of gravity or impulse is enough to escape otherwise.
//!
//! Per-actor state lives in a map owned by the guard; nothing is bolted
//! onto the host's actor objects. Authentication clears an actor's entry
//! the next time its tick runs; disconnect clears it immediately.

use std::collections::HashMap;

use authward_core::{ActorId, DriftConfig, Position, Vec3};
use tracing::warn;

use crate::engine::{EngineError, EngineHooks};

/// Derived per-actor gating state.
#[derive(Debug, Clone, Default)]
struct AnchorState {
    /// Set lazily on the first unauthenticated tick.
    anchor: Option<Position>,
    /// Ticks since the last drift check; wraps within the check interval.
    tick_counter: u32,
    /// Ticks until the next movement-blocked notice may fire.
    message_cooldown: u32,
}

/// Outcome of one drift-guard tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriftOutcome {
    /// Actor is authenticated; any anchor state was discarded.
    Cleared,
    /// Actor is unauthenticated and held at its anchor.
    Held {
        /// A drift check fired and snapped the actor back this tick.
        corrected: bool,
        /// The movement-blocked notice should be shown this tick.
        notice_due: bool,
    },
}

impl DriftOutcome {
    pub fn is_held(&self) -> bool {
        matches!(self, Self::Held { .. })
    }
}

/// Tracks anchors and applies drift correction for all gated actors.
#[derive(Debug, Default)]
pub struct DriftGuard {
    config: DriftConfig,
    anchors: HashMap<ActorId, AnchorState>,
}

impl DriftGuard {
    pub fn new(config: DriftConfig) -> Self {
        Self {
            config,
            anchors: HashMap::new(),
        }
    }

    /// Run one simulation tick for an actor.
    ///
    /// `authenticated` is the caller's (already fail-closed) view of the
    /// session registry for this instant.
    pub fn tick<E: EngineHooks>(
        &mut self,
        actor: ActorId,
        authenticated: bool,
        engine: &mut E,
    ) -> DriftOutcome {
        if authenticated {
            // Disengage fully: anchor discarded, counters reset by removal.
            self.anchors.remove(&actor);
            return DriftOutcome::Cleared;
        }

        let state = self.anchors.entry(actor).or_default();

        if state.anchor.is_none() {
            match engine.position(actor) {
                Ok(position) => state.anchor = Some(position),
                // Leave unset; the next tick retries.
                Err(err) => warn_engine(actor, "anchor position read", &err),
            }
        }

        // The cooldown counts down at real tick rate. It runs before the
        // interval check so a notice fired below reads exactly the
        // configured cooldown after this tick completes.
        if state.message_cooldown > 0 {
            state.message_cooldown -= 1;
        }

        let mut corrected = false;
        let mut notice_due = false;

        state.tick_counter += 1;
        if state.tick_counter >= self.config.check_interval_ticks {
            state.tick_counter = 0;

            if let Some(anchor) = state.anchor {
                match engine.position(actor) {
                    Ok(current) => {
                        if current.squared_distance_to(&anchor) > self.config.threshold_sq {
                            corrected = true;

                            // Back to the anchor, facing wherever the actor
                            // is currently looking.
                            let target = anchor.with_orientation_of(&current);
                            if let Err(err) = engine.set_position(actor, target) {
                                warn_engine(actor, "anchor reposition", &err);
                            }
                            if let Err(err) = engine.set_velocity(actor, Vec3::ZERO) {
                                warn_engine(actor, "velocity zeroing", &err);
                            }

                            if state.message_cooldown == 0 {
                                notice_due = true;
                                state.message_cooldown = self.config.notice_cooldown_ticks;
                            }
                        }
                    }
                    Err(err) => warn_engine(actor, "drift check position read", &err),
                }
            }
        }

        self.clamp_vertical_velocity(actor, engine);

        DriftOutcome::Held {
            corrected,
            notice_due,
        }
    }

    /// Every unauthenticated tick: a falling actor's descent is stopped and
    /// its fall accumulator reset; vertical velocity is clamped
    /// non-negative.
    fn clamp_vertical_velocity<E: EngineHooks>(&self, actor: ActorId, engine: &mut E) {
        let velocity = match engine.velocity(actor) {
            Ok(velocity) => velocity,
            Err(err) => {
                warn_engine(actor, "velocity read", &err);
                return;
            }
        };

        if velocity.y >= 0.0 {
            return;
        }

        if !engine.on_ground(actor) {
            if let Err(err) = engine.zero_fall_accumulator(actor) {
                warn_engine(actor, "fall accumulator reset", &err);
            }
        }
        let clamped = Vec3 {
            y: 0.0,
            ..velocity
        };
        if let Err(err) = engine.set_velocity(actor, clamped) {
            warn_engine(actor, "vertical velocity clamp", &err);
        }
    }

    /// Discard all state for a disconnected actor.
    pub fn remove(&mut self, actor: ActorId) {
        self.anchors.remove(&actor);
    }

    /// Number of actors currently tracked (anchored or pending anchor).
    pub fn tracked_actors(&self) -> usize {
        self.anchors.len()
    }

    /// The actor's current anchor, if one is set.
    pub fn anchor_of(&self, actor: ActorId) -> Option<Position> {
        self.anchors.get(&actor).and_then(|state| state.anchor)
    }
}

fn warn_engine(actor: ActorId, what: &str, err: &EngineError) {
    warn!(actor, error = %err, "engine primitive failed during {what}; skipping");
}
