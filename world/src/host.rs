//! Minimal host-side capabilities for headless runs and tests.
//!
//! [`KinematicSpace`] integrates velocities into positions without collision
//! resolution, optionally clamping bodies inside the arena. [`ManualClock`]
//! is advanced explicitly by the driver.

use std::{cell::RefCell, rc::Rc, time::Duration};

use trial_grounds_core::{geometry::Rect, Clock, Coordinates, PhysicsBody, Timestamp, Velocity};

#[derive(Clone, Copy, Debug, PartialEq)]
struct BodyState {
    position: Coordinates,
    velocity: Velocity,
    radius: f32,
}

/// Shared handle to a body simulated by a [`KinematicSpace`].
#[derive(Clone, Debug)]
pub struct KinematicBody {
    state: Rc<RefCell<BodyState>>,
}

impl KinematicBody {
    /// Creates a free-standing body that is not integrated by any space.
    #[must_use]
    pub fn detached(position: Coordinates) -> Self {
        Self {
            state: Rc::new(RefCell::new(BodyState {
                position,
                velocity: Velocity::ZERO,
                radius: 0.0,
            })),
        }
    }

    /// Velocity last written to the body.
    #[must_use]
    pub fn velocity(&self) -> Velocity {
        self.state.borrow().velocity
    }
}

impl PhysicsBody for KinematicBody {
    fn position(&self) -> Coordinates {
        self.state.borrow().position
    }

    fn set_velocity(&mut self, velocity: Velocity) {
        self.state.borrow_mut().velocity = velocity;
    }

    fn set_position(&mut self, position: Coordinates) {
        self.state.borrow_mut().position = position;
    }
}

/// Integrates every spawned body once per step.
#[derive(Debug, Default)]
pub struct KinematicSpace {
    bodies: Vec<KinematicBody>,
    bounds: Option<Rect>,
}

impl KinematicSpace {
    /// Creates a space without bounds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a space that keeps bodies inside `bounds`.
    #[must_use]
    pub fn bounded(bounds: Rect) -> Self {
        Self {
            bodies: Vec::new(),
            bounds: Some(bounds),
        }
    }

    /// Spawns a body and returns a handle sharing its state.
    pub fn spawn(&mut self, position: Coordinates, radius: f32) -> KinematicBody {
        let body = KinematicBody {
            state: Rc::new(RefCell::new(BodyState {
                position,
                velocity: Velocity::ZERO,
                radius,
            })),
        };
        self.bodies.push(body.clone());
        body
    }

    /// Moves every body by `velocity * dt`.
    pub fn step(&mut self, dt: Duration) {
        let seconds = dt.as_secs_f32();
        for body in &self.bodies {
            let mut state = body.state.borrow_mut();
            let mut x = state.position.x() + state.velocity.x() * seconds;
            let mut y = state.position.y() + state.velocity.y() * seconds;
            if let Some(bounds) = self.bounds {
                x = clamp_axis(x, bounds.min_x(), bounds.max_x(), state.radius);
                y = clamp_axis(y, bounds.min_y(), bounds.max_y(), state.radius);
            }
            state.position = Coordinates::new(x, y);
        }
    }

    /// Number of bodies simulated by the space.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Reports whether the space simulates no body.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

fn clamp_axis(value: f32, min: f32, max: f32, radius: f32) -> f32 {
    let low = min + radius;
    let high = max - radius;
    if low > high {
        return (min + max) / 2.0;
    }
    value.clamp(low, high)
}

/// Clock advanced explicitly by the driver.
#[derive(Clone, Copy, Debug, Default)]
pub struct ManualClock {
    now: Timestamp,
}

impl ManualClock {
    /// Creates a clock reading `start`.
    #[must_use]
    pub const fn starting_at(start: Timestamp) -> Self {
        Self { now: start }
    }

    /// Moves the clock forward and returns the new reading.
    pub fn advance(&mut self, dt: Duration) -> Timestamp {
        self.now = self.now.after(dt);
        self.now
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.now
    }
}
