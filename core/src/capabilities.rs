//! Capabilities the simulation consumes from its host.

use std::fmt;

use crate::{Coordinates, Timestamp, Velocity};

/// Handle to an externally simulated body.
///
/// The core reads positions at the start of every tick and issues velocity or
/// position commands. It never assumes anything about collision resolution or
/// world-bounds clamping performed by the host.
pub trait PhysicsBody: fmt::Debug {
    /// Current position of the body.
    fn position(&self) -> Coordinates;

    /// Replaces the velocity of the body.
    fn set_velocity(&mut self, velocity: Velocity);

    /// Teleports the body, used when a survivor snaps onto a repair slot.
    fn set_position(&mut self, position: Coordinates);
}

/// Source of monotonic simulation time.
pub trait Clock {
    /// Current simulation time. Never decreases within a run.
    fn now(&self) -> Timestamp;
}
