#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Trial Grounds simulation.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure behavior systems. Systems read immutable
//! [`SurvivorView`], [`KillerView`] and [`RepairSlotView`] snapshots and
//! respond exclusively with [`Command`] values. The world executes those
//! commands via its `apply` entry point and broadcasts [`Event`] values that
//! describe what actually changed.

mod capabilities;
pub mod config;
pub mod geometry;

use serde::{Deserialize, Serialize};

pub use capabilities::{Clock, PhysicsBody};
pub use config::{ConfigError, SimulationConfig};
pub use geometry::Heading;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Trial Grounds.";

/// Number of repair slots surrounding every generator.
pub const SLOTS_PER_GENERATOR: usize = 4;

/// Monotonic simulation time measured in whole milliseconds.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Timestamp at the very beginning of a run.
    pub const ZERO: Self = Self(0);

    /// Creates a timestamp from a millisecond count.
    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Millisecond count represented by the timestamp.
    #[must_use]
    pub const fn as_millis(&self) -> u64 {
        self.0
    }

    /// Returns the timestamp shifted forward by `delay`, saturating on overflow.
    #[must_use]
    pub fn after(self, delay: std::time::Duration) -> Self {
        let millis = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        Self(self.0.saturating_add(millis))
    }
}

/// Position in arena space expressed in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    x: f32,
    y: f32,
}

impl Coordinates {
    /// Creates a new coordinate pair.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal component.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical component, growing downwards.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }
}

/// Velocity in pixels per second.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    x: f32,
    y: f32,
}

impl Velocity {
    /// Stationary velocity.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Creates a new velocity from its components.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal component.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical component.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Reports whether both components are exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Returns a copy with the horizontal component replaced.
    #[must_use]
    pub const fn with_x(self, x: f32) -> Self {
        Self { x, y: self.y }
    }
}

/// Unique identifier assigned to a survivor.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct SurvivorId(u32);

impl SurvivorId {
    /// Creates a new survivor identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a killer.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct KillerId(u32);

impl KillerId {
    /// Creates a new killer identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a generator. Generators are numbered from one.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct GeneratorId(u32);

impl GeneratorId {
    /// Creates a new generator identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Identifier of a repair slot, unique within its generator (`1..=4`).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct SlotId(u8);

impl SlotId {
    /// Creates a new slot identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }
}

/// Lookup reference to a repair slot, resolved through the objective registry.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct SlotRef {
    /// Generator owning the slot.
    pub generator: GeneratorId,
    /// Slot within the generator.
    pub slot: SlotId,
}

impl SlotRef {
    /// Creates a new slot reference.
    #[must_use]
    pub const fn new(generator: GeneratorId, slot: SlotId) -> Self {
        Self { generator, slot }
    }
}

/// Cardinal side of a generator that hosts a repair slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RepairSide {
    /// Slot above the generator (decreasing y).
    North,
    /// Slot right of the generator.
    East,
    /// Slot below the generator.
    South,
    /// Slot left of the generator.
    West,
}

impl RepairSide {
    /// Every side in slot-identifier order.
    pub const ALL: [Self; SLOTS_PER_GENERATOR] = [Self::North, Self::East, Self::South, Self::West];

    /// Slot identifier hosted on this side.
    #[must_use]
    pub const fn slot_id(self) -> SlotId {
        match self {
            Self::North => SlotId::new(1),
            Self::East => SlotId::new(2),
            Self::South => SlotId::new(3),
            Self::West => SlotId::new(4),
        }
    }
}

impl TryFrom<u8> for RepairSide {
    type Error = ConfigError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        match index {
            1 => Ok(Self::North),
            2 => Ok(Self::East),
            3 => Ok(Self::South),
            4 => Ok(Self::West),
            other => Err(ConfigError::UnknownSlotSide(other)),
        }
    }
}

/// Distinguishes the two agent variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentKind {
    /// Agent trying to repair generators.
    Survivor,
    /// Agent hunting survivors.
    Killer,
}

/// Identifier of any agent in the simulation.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum AgentId {
    /// A survivor from the survivor roster.
    Survivor(SurvivorId),
    /// A killer from the killer roster.
    Killer(KillerId),
}

impl AgentId {
    /// Variant of the identified agent.
    #[must_use]
    pub const fn kind(&self) -> AgentKind {
        match self {
            Self::Survivor(_) => AgentKind::Survivor,
            Self::Killer(_) => AgentKind::Killer,
        }
    }
}

/// Survivor health, advancing one step per hit and never recovering.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum HealthState {
    /// Unharmed.
    #[default]
    Normal,
    /// Hit once.
    Injured,
    /// Hit twice. Further hits leave the state unchanged.
    Downed,
}

impl HealthState {
    /// Health after receiving a basic attack.
    #[must_use]
    pub const fn after_hit(self) -> Self {
        match self {
            Self::Normal => Self::Injured,
            Self::Injured | Self::Downed => Self::Downed,
        }
    }
}

/// High-level behavioral mode of a survivor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SurvivorIntention {
    /// Initial state, superseded on the first behavior tick.
    #[default]
    Idle,
    /// Walking to or working on a repair slot.
    Repair,
    /// Running away from the nearest killer.
    Escape,
}

/// High-level behavioral mode of a killer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KillerIntention {
    /// Initial state, superseded on the first behavior tick.
    #[default]
    Idle,
    /// Pursuing the nearest survivor.
    Chase,
}

/// Directional keys held for a manually driven agent during a frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DirectionalInput {
    /// Move towards decreasing y.
    pub up: bool,
    /// Move towards increasing y.
    pub down: bool,
    /// Move towards decreasing x.
    pub left: bool,
    /// Move towards increasing x.
    pub right: bool,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Advances the simulation clock, refreshes cached positions from the
    /// physics bodies and fires every due timer.
    Tick {
        /// Current simulation time.
        now: Timestamp,
    },
    /// Changes the intention of a survivor.
    SetSurvivorIntention {
        /// Survivor being updated.
        survivor: SurvivorId,
        /// Intention to adopt.
        intention: SurvivorIntention,
    },
    /// Changes the intention of a killer.
    SetKillerIntention {
        /// Killer being updated.
        killer: KillerId,
        /// Intention to adopt.
        intention: KillerIntention,
    },
    /// Sets or clears the repair slot a survivor walks to.
    FocusRepairSlot {
        /// Survivor being updated.
        survivor: SurvivorId,
        /// Slot to focus, or `None` when no eligible slot exists.
        slot: Option<SlotRef>,
    },
    /// Sets or clears the point a killer walks to.
    FocusPoint {
        /// Killer being updated.
        killer: KillerId,
        /// Point to focus, or `None` when no survivor exists.
        point: Option<Coordinates>,
    },
    /// Writes a velocity to an agent and its physics body.
    SetVelocity {
        /// Agent being updated.
        agent: AgentId,
        /// Velocity to apply.
        velocity: Velocity,
    },
    /// Snaps a survivor onto a slot it reached and claims the slot.
    ClaimSlot {
        /// Survivor that arrived.
        survivor: SurvivorId,
        /// Slot that was reached.
        slot: SlotRef,
    },
    /// Releases every slot claimed by the survivor.
    ReleaseClaims {
        /// Survivor abandoning its slot.
        survivor: SurvivorId,
    },
    /// Registers a basic attack landed by a killer on a survivor.
    LandHit {
        /// Survivor receiving the attack.
        survivor: SurvivorId,
        /// Killer delivering the attack.
        killer: KillerId,
    },
    /// Closes an elapsed hurt-animation window.
    EndHurtAnimation {
        /// Survivor whose window elapsed.
        survivor: SurvivorId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Time reached by the tick.
        now: Timestamp,
    },
    /// Announces that the cinematic start delay elapsed and behavior began.
    BehaviorStarted {
        /// Time of the first behavior tick.
        at: Timestamp,
    },
    /// Reports a survivor intention transition.
    SurvivorIntentionChanged {
        /// Survivor that transitioned.
        survivor: SurvivorId,
        /// Intention before the transition.
        from: SurvivorIntention,
        /// Intention after the transition.
        to: SurvivorIntention,
    },
    /// Reports a killer intention transition.
    KillerIntentionChanged {
        /// Killer that transitioned.
        killer: KillerId,
        /// Intention before the transition.
        from: KillerIntention,
        /// Intention after the transition.
        to: KillerIntention,
    },
    /// Confirms that a survivor claimed a slot.
    SlotClaimed {
        /// Claimed slot.
        slot: SlotRef,
        /// New holder of the slot.
        survivor: SurvivorId,
    },
    /// Reports that a claim was refused.
    SlotClaimRejected {
        /// Slot requested.
        slot: SlotRef,
        /// Survivor whose claim was refused.
        survivor: SurvivorId,
        /// Current holder, or `None` when the reference was stale.
        holder: Option<SurvivorId>,
    },
    /// Confirms that a slot became free.
    SlotReleased {
        /// Released slot.
        slot: SlotRef,
        /// Previous holder of the slot.
        survivor: SurvivorId,
    },
    /// Confirms that a hit registered.
    SurvivorHit {
        /// Survivor that was hit.
        survivor: SurvivorId,
        /// Killer that landed the hit.
        killer: KillerId,
        /// Health after the hit.
        health: HealthState,
    },
    /// Confirms that a hurt-animation window closed.
    HurtAnimationEnded {
        /// Survivor whose window closed.
        survivor: SurvivorId,
    },
    /// Reports an updated movement-speed modifier.
    SpeedModifierChanged {
        /// Agent whose modifier changed.
        agent: AgentId,
        /// Modifier after the change.
        modifier: f32,
    },
}

/// Immutable representation of a single survivor used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct SurvivorSnapshot {
    /// Unique identifier assigned to the survivor.
    pub id: SurvivorId,
    /// Position cached from the physics body at the start of the tick.
    pub position: Coordinates,
    /// Velocity last written to the survivor.
    pub velocity: Velocity,
    /// Current intention.
    pub intention: SurvivorIntention,
    /// Current health.
    pub health: HealthState,
    /// Focused repair slot, if any.
    pub focused_slot: Option<SlotRef>,
    /// Multiplicative speed factor, one by default.
    pub speed_modifier: f32,
    /// End of the active hurt-animation window, if one is open.
    pub hurt_until: Option<Timestamp>,
    /// Whether the behavior state machine drives this survivor.
    pub automated: bool,
    /// Whether the survivor walks the scripted horizontal pattern instead.
    pub dummy: bool,
}

/// Read-only snapshot describing all survivors in roster order.
#[derive(Clone, Debug, Default)]
pub struct SurvivorView {
    snapshots: Vec<SurvivorSnapshot>,
}

impl SurvivorView {
    /// Creates a new survivor view, keeping the provided roster order.
    #[must_use]
    pub fn from_snapshots(snapshots: Vec<SurvivorSnapshot>) -> Self {
        Self { snapshots }
    }

    /// Iterator over the captured survivor snapshots in roster order.
    pub fn iter(&self) -> impl Iterator<Item = &SurvivorSnapshot> {
        self.snapshots.iter()
    }

    /// Looks up a survivor by identifier.
    #[must_use]
    pub fn get(&self, id: SurvivorId) -> Option<&SurvivorSnapshot> {
        self.snapshots.iter().find(|snapshot| snapshot.id == id)
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<SurvivorSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single killer used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct KillerSnapshot {
    /// Unique identifier assigned to the killer.
    pub id: KillerId,
    /// Position cached from the physics body at the start of the tick.
    pub position: Coordinates,
    /// Velocity last written to the killer.
    pub velocity: Velocity,
    /// Current intention.
    pub intention: KillerIntention,
    /// Focused point, if any.
    pub focused_point: Option<Coordinates>,
    /// Multiplicative speed factor, one by default.
    pub speed_modifier: f32,
    /// Threat radius in pixels.
    pub threat_radius: f32,
    /// Whether the behavior state machine drives this killer.
    pub automated: bool,
}

/// Read-only snapshot describing all killers in roster order.
#[derive(Clone, Debug, Default)]
pub struct KillerView {
    snapshots: Vec<KillerSnapshot>,
}

impl KillerView {
    /// Creates a new killer view, keeping the provided roster order.
    #[must_use]
    pub fn from_snapshots(snapshots: Vec<KillerSnapshot>) -> Self {
        Self { snapshots }
    }

    /// Iterator over the captured killer snapshots in roster order.
    pub fn iter(&self) -> impl Iterator<Item = &KillerSnapshot> {
        self.snapshots.iter()
    }

    /// Looks up a killer by identifier.
    #[must_use]
    pub fn get(&self, id: KillerId) -> Option<&KillerSnapshot> {
        self.snapshots.iter().find(|snapshot| snapshot.id == id)
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<KillerSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single repair slot used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlotSnapshot {
    /// Reference to the slot.
    pub slot: SlotRef,
    /// Fixed position of the slot.
    pub coordinates: Coordinates,
    /// Survivor holding the slot, if any.
    pub claimed_by: Option<SurvivorId>,
}

impl SlotSnapshot {
    /// Reports whether `survivor` may target or claim the slot.
    #[must_use]
    pub fn is_available_to(&self, survivor: SurvivorId) -> bool {
        self.claimed_by.map_or(true, |holder| holder == survivor)
    }
}

/// Read-only snapshot of every repair slot, ordered by generator then slot.
#[derive(Clone, Debug, Default)]
pub struct RepairSlotView {
    snapshots: Vec<SlotSnapshot>,
}

impl RepairSlotView {
    /// Creates a new slot view, keeping the provided registry order.
    #[must_use]
    pub fn from_snapshots(snapshots: Vec<SlotSnapshot>) -> Self {
        Self { snapshots }
    }

    /// Iterator over the slots in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &SlotSnapshot> {
        self.snapshots.iter()
    }

    /// Resolves a slot reference, returning `None` for stale references.
    #[must_use]
    pub fn get(&self, slot: SlotRef) -> Option<&SlotSnapshot> {
        self.snapshots.iter().find(|snapshot| snapshot.slot == slot)
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<SlotSnapshot> {
        self.snapshots
    }
}
