//! Engine primitives the gate may invoke.
//!
//! The host engine drives the gate (one guard call per tick or event); the
//! gate only ever calls back for corrective side effects: repositioning a
//! drifted actor, zeroing velocity, cancelling an in-flight action, or
//! forcing an action callback's result. A failed primitive is logged and
//! skipped by the caller — the action stays rejected and the drift guard
//! retries on its next interval, so no engine failure can crash a tick.

use authward_core::{ActionOutcome, ActorId, Position, Vec3};
use thiserror::Error;

/// Failure reported by an engine primitive.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The actor is not (or no longer) present in the world.
    #[error("actor {0} not found in world")]
    ActorNotFound(ActorId),
    /// The engine refused the operation.
    #[error("engine rejected primitive: {0}")]
    Rejected(String),
}

/// The slice of the host engine the gate is allowed to touch.
pub trait EngineHooks {
    // Reads.
    fn position(&self, actor: ActorId) -> Result<Position, EngineError>;
    fn velocity(&self, actor: ActorId) -> Result<Vec3, EngineError>;
    fn on_ground(&self, actor: ActorId) -> bool;

    // Corrective writes.
    fn set_position(&mut self, actor: ActorId, position: Position) -> Result<(), EngineError>;
    fn set_velocity(&mut self, actor: ActorId, velocity: Vec3) -> Result<(), EngineError>;
    /// Reset accumulated fall state so a held actor never banks fall damage.
    fn zero_fall_accumulator(&mut self, actor: ActorId) -> Result<(), EngineError>;
    /// Abort the engine's in-flight handling of the current event.
    fn cancel_current_action(&mut self, actor: ActorId) -> Result<(), EngineError>;
    /// Force the result value of the current action callback.
    fn force_action_result(
        &mut self,
        actor: ActorId,
        outcome: ActionOutcome,
    ) -> Result<(), EngineError>;

    /// Show a rejection notice to the actor. Best effort; a lost notice is
    /// harmless because every channel re-notifies on the next attempt.
    fn send_notice(&mut self, actor: ActorId, text: &str);
}
