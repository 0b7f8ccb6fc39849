#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Killer intention machine: leave `Idle` on the first active frame, then
//! chase the nearest survivor forever, re-aiming every frame.

use trial_grounds_core::{
    AgentId, AgentKind, Command, DirectionalInput, KillerIntention, KillerSnapshot,
    SimulationConfig, SurvivorView,
};
use trial_grounds_system_steering::{manual_velocity, steer, SteerDirection};
use trial_grounds_system_targeting::nearest_survivor;

/// Emits the commands that drive one killer for the current frame.
///
/// Player-driven killers ignore the intention machine and move from `input`;
/// a missing input stops them.
pub fn handle(
    killer: &KillerSnapshot,
    survivors: &SurvivorView,
    input: Option<DirectionalInput>,
    config: &SimulationConfig,
    out: &mut Vec<Command>,
) {
    let agent = AgentId::Killer(killer.id);

    if !killer.automated {
        out.push(Command::SetVelocity {
            agent,
            velocity: manual_velocity(input.unwrap_or_default(), config),
        });
        return;
    }

    if killer.intention == KillerIntention::Idle {
        out.push(Command::SetKillerIntention {
            killer: killer.id,
            intention: KillerIntention::Chase,
        });
    }

    let target = nearest_survivor(killer.position, survivors).map(|found| found.candidate.position);
    if target != killer.focused_point {
        out.push(Command::FocusPoint {
            killer: killer.id,
            point: target,
        });
    }

    out.push(Command::SetVelocity {
        agent,
        velocity: steer(
            AgentKind::Killer,
            killer.position,
            killer.speed_modifier,
            target,
            SteerDirection::Towards,
            config,
        ),
    });
}
