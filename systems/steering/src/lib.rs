#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure velocity computation for every agent movement mode.

use std::f32::consts::FRAC_1_SQRT_2;

use trial_grounds_core::{
    geometry::try_unit_vector, AgentKind, Coordinates, DirectionalInput, SimulationConfig,
    Velocity,
};

/// Whether the agent moves towards its target or flees from it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SteerDirection {
    /// Move along the unit vector to the target.
    Towards,
    /// Move along the opposite direction.
    Away,
}

impl SteerDirection {
    const fn sign(self) -> f32 {
        match self {
            Self::Towards => 1.0,
            Self::Away => -1.0,
        }
    }
}

/// Computes the velocity that steers an agent relative to `target`.
///
/// An absent target, or a target coinciding with `position`, yields zero
/// velocity. The result is scaled by the agent kind's base speed, its speed
/// modifier, the pixel scale and the global multiplier.
#[must_use]
pub fn steer(
    kind: AgentKind,
    position: Coordinates,
    speed_modifier: f32,
    target: Option<Coordinates>,
    direction: SteerDirection,
    config: &SimulationConfig,
) -> Velocity {
    let Some(target) = target else {
        return Velocity::ZERO;
    };
    let Some(heading) = try_unit_vector(position, target) else {
        return Velocity::ZERO;
    };
    let magnitude =
        direction.sign() * config.base_speed(kind) * speed_modifier * config.speed_scale();
    heading.scaled(magnitude)
}

/// Horizontal patrol for scripted survivors.
///
/// Bodies left of the 10% band head right, bodies right of the 90% band head
/// left, and a stationary body starts moving right. Only the horizontal
/// component changes; the speed modifier does not apply.
#[must_use]
pub fn dummy_velocity(
    position: Coordinates,
    current: Velocity,
    config: &SimulationConfig,
) -> Velocity {
    let speed = config.base_speed(AgentKind::Survivor) * config.speed_scale();
    let left_band = config.arena.origin_x + 0.1 * config.arena.width;
    let right_band = config.arena.origin_x + 0.9 * config.arena.width;

    if position.x() < left_band {
        current.with_x(speed)
    } else if position.x() > right_band {
        current.with_x(-speed)
    } else if current.x() == 0.0 {
        current.with_x(speed)
    } else {
        current
    }
}

/// Velocity of a player-driven killer.
///
/// Opposing directions cancel and diagonal movement is normalised so it is
/// no faster than straight movement.
#[must_use]
pub fn manual_velocity(input: DirectionalInput, config: &SimulationConfig) -> Velocity {
    let speed = config.base_speed(AgentKind::Killer) * config.speed_scale();
    let axis = |negative: bool, positive: bool| match (negative, positive) {
        (true, false) => -speed,
        (false, true) => speed,
        _ => 0.0,
    };

    let x = axis(input.left, input.right);
    let y = axis(input.up, input.down);
    if x != 0.0 && y != 0.0 {
        Velocity::new(x * FRAC_1_SQRT_2, y * FRAC_1_SQRT_2)
    } else {
        Velocity::new(x, y)
    }
}
