//! Authward Core Vocabulary
//!
//! This crate defines the types shared between the action gate and its host
//! engine: actor/entity identifiers, the spatial types the drift guard
//! operates on, the damage taxonomy consulted by the take-damage guard, and
//! the gate configuration with its normative defaults.
//!
//! The crate is deliberately dependency-free: everything here is plain data
//! exchanged across the gate boundary. Policy and interception live in
//! `authward-gate`.

#![deny(unsafe_code)]

// ============================================================================
// Identifier Aliases
// ============================================================================

/// A single discrete simulation timestep; the atomic unit of game time.
pub type Tick = u64;

/// Opaque per-actor identifier, assigned by the host engine.
///
/// Stable for the lifetime of the actor's connected session. The gate uses
/// it only as a map key and never assumes contiguity or ordering.
pub type ActorId = u64;

/// Unique identifier for a world entity (attack targets, ground items).
pub type EntityId = u64;

/// Identifier for an item definition (use-item payload).
pub type ItemId = u32;

// ============================================================================
// Spatial Types
// ============================================================================

/// A world position: 3D coordinates plus an orientation pair.
///
/// Engine-owned state; the gate reads and writes it only through the engine
/// primitives. Orientation never participates in drift distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub yaw: f32,
    pub pitch: f32,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64, yaw: f32, pitch: f32) -> Self {
        Self { x, y, z, yaw, pitch }
    }

    /// Squared distance between the coordinate components, orientation
    /// ignored. Drift checks compare this against a squared threshold so no
    /// square root is taken on the tick path.
    pub fn squared_distance_to(&self, other: &Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }

    /// This position's coordinates combined with `other`'s orientation.
    ///
    /// Used when repositioning a drifted actor back to its anchor: the
    /// actor returns to the anchored coordinates but keeps facing wherever
    /// it is currently looking.
    pub fn with_orientation_of(&self, other: &Position) -> Position {
        Position {
            yaw: other.yaw,
            pitch: other.pitch,
            ..*self
        }
    }
}

/// A velocity vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Integer block coordinates (block break/place payload).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

// ============================================================================
// Damage Taxonomy
// ============================================================================

/// Categories of damage the host engine can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageKind {
    /// Environmental-boundary damage: the actor left the playable volume.
    OutOfWorld,
    Fall,
    Melee,
    Projectile,
    Fire,
    Explosion,
    Magic,
}

/// A single damage event as seen by the take-damage guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageSource {
    pub kind: DamageKind,
    /// True when the damage originates from a privileged (creative-mode /
    /// operator) source.
    pub privileged: bool,
}

impl DamageSource {
    pub fn new(kind: DamageKind) -> Self {
        Self {
            kind,
            privileged: false,
        }
    }

    pub fn privileged(kind: DamageKind) -> Self {
        Self {
            kind,
            privileged: true,
        }
    }
}

/// Forced result for an engine action callback.
///
/// The gate forces `Fail` when it rejects an interaction whose engine
/// callback expects an explicit outcome value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Success,
    Fail,
}

// ============================================================================
// Normative Defaults
// ============================================================================

/// Ticks between drift checks for an unauthenticated actor.
///
/// Correction is interval-based rather than per-tick so a full position
/// comparison and potential teleport happen at most once per interval.
pub const CHECK_INTERVAL_TICKS: u32 = 40;

/// Squared drift distance beyond which the actor is snapped back to its
/// anchor.
pub const DRIFT_THRESHOLD_SQ: f64 = 2.0;

/// Minimum ticks between two movement-blocked notices for one actor.
pub const NOTICE_COOLDOWN_TICKS: u32 = 20;

/// Commands an unauthenticated actor may still run.
pub const DEFAULT_ALLOWED_COMMANDS: [&str; 3] = ["login", "register", "reg"];

// ============================================================================
// Configuration
// ============================================================================

/// Drift-guard tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriftConfig {
    /// Ticks between drift checks.
    pub check_interval_ticks: u32,
    /// Squared distance budget before correction.
    pub threshold_sq: f64,
    /// Ticks between movement-blocked notices.
    pub notice_cooldown_ticks: u32,
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            check_interval_ticks: CHECK_INTERVAL_TICKS,
            threshold_sq: DRIFT_THRESHOLD_SQ,
            notice_cooldown_ticks: NOTICE_COOLDOWN_TICKS,
        }
    }
}

/// Which damage is allowed to reach an unauthenticated actor.
///
/// Kept as configuration rather than hard-coded policy so hosts can extend
/// the bypass set without touching guard logic.
#[derive(Debug, Clone, PartialEq)]
pub struct DamageBypassConfig {
    /// Damage kinds that always apply. Out-of-world damage applies by
    /// default so an actor stuck below the playable volume is not
    /// invulnerable there forever.
    pub kinds: Vec<DamageKind>,
    /// Whether privileged-source damage always applies.
    pub privileged_sources: bool,
}

impl Default for DamageBypassConfig {
    fn default() -> Self {
        Self {
            kinds: vec![DamageKind::OutOfWorld],
            privileged_sources: true,
        }
    }
}

impl DamageBypassConfig {
    /// True when this damage event must be applied despite the gate.
    pub fn bypasses(&self, source: &DamageSource) -> bool {
        if self.privileged_sources && source.privileged {
            return true;
        }
        self.kinds.contains(&source.kind)
    }
}

/// Full gate configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct GateConfig {
    pub drift: DriftConfig,
    /// Command names permitted before authentication, matched
    /// case-insensitively by the allowlist filter.
    pub allowed_commands: Vec<String>,
    pub damage_bypass: DamageBypassConfig,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            drift: DriftConfig::default(),
            allowed_commands: DEFAULT_ALLOWED_COMMANDS
                .iter()
                .map(|c| (*c).to_string())
                .collect(),
            damage_bypass: DamageBypassConfig::default(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
