#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Survivor intention machine, hit detection and hurt expiry.
//!
//! Each frame an automated survivor either flees the nearest killer or heads
//! for the nearest repair slot it may use, claiming the slot once it stands
//! on it. Scripted survivors only patrol. Every other survivor, automated or
//! not, can be hit by a killer in contact range.

use trial_grounds_core::{
    geometry::distance, AgentId, AgentKind, Command, KillerView, RepairSlotView,
    SimulationConfig, SurvivorIntention, SurvivorSnapshot, Timestamp,
};
use trial_grounds_system_steering::{dummy_velocity, steer, SteerDirection};
use trial_grounds_system_targeting::{nearest_available_slot, nearest_killer};

/// World state a survivor decides against.
#[derive(Clone, Copy, Debug)]
pub struct Surroundings<'a> {
    /// Killers in roster order.
    pub killers: &'a KillerView,
    /// Every repair slot with its current claim.
    pub slots: &'a RepairSlotView,
    /// Time of the current frame.
    pub now: Timestamp,
}

/// Emits the commands that drive one survivor for the current frame.
pub fn handle(
    survivor: &SurvivorSnapshot,
    surroundings: Surroundings<'_>,
    config: &SimulationConfig,
    out: &mut Vec<Command>,
) {
    if survivor.dummy {
        out.push(Command::SetVelocity {
            agent: AgentId::Survivor(survivor.id),
            velocity: dummy_velocity(survivor.position, survivor.velocity, config),
        });
        return;
    }

    if survivor.automated {
        decide(survivor, surroundings, config, out);
    }

    if survivor.hurt_until.is_none() {
        let contact = config.contact_radius();
        let attacker = surroundings
            .killers
            .iter()
            .find(|killer| distance(survivor.position, killer.position) <= contact);
        if let Some(killer) = attacker {
            out.push(Command::LandHit {
                survivor: survivor.id,
                killer: killer.id,
            });
        }
    }

    if survivor
        .hurt_until
        .map_or(false, |ends_at| surroundings.now >= ends_at)
    {
        out.push(Command::EndHurtAnimation {
            survivor: survivor.id,
        });
    }
}

fn decide(
    survivor: &SurvivorSnapshot,
    surroundings: Surroundings<'_>,
    config: &SimulationConfig,
    out: &mut Vec<Command>,
) {
    let agent = AgentId::Survivor(survivor.id);
    let threat = nearest_killer(survivor.position, surroundings.killers);
    let fleeing = threat.filter(|found| {
        found.distance < config.escape_distance(found.candidate.threat_radius)
    });

    if let Some(killer) = fleeing {
        set_intention(survivor, SurvivorIntention::Escape, out);
        out.push(Command::ReleaseClaims {
            survivor: survivor.id,
        });
        if survivor.focused_slot.is_some() {
            out.push(Command::FocusRepairSlot {
                survivor: survivor.id,
                slot: None,
            });
        }
        out.push(Command::SetVelocity {
            agent,
            velocity: steer(
                AgentKind::Survivor,
                survivor.position,
                survivor.speed_modifier,
                Some(killer.candidate.position),
                SteerDirection::Away,
                config,
            ),
        });
        return;
    }

    set_intention(survivor, SurvivorIntention::Repair, out);
    let selected = nearest_available_slot(survivor.position, survivor.id, surroundings.slots);
    let focus = selected.map(|found| found.candidate.slot);
    if focus != survivor.focused_slot {
        out.push(Command::FocusRepairSlot {
            survivor: survivor.id,
            slot: focus,
        });
    }

    match selected {
        Some(found) if found.distance <= config.survivor.radius => {
            out.push(Command::ClaimSlot {
                survivor: survivor.id,
                slot: found.candidate.slot,
            });
        }
        selected => {
            out.push(Command::SetVelocity {
                agent,
                velocity: steer(
                    AgentKind::Survivor,
                    survivor.position,
                    survivor.speed_modifier,
                    selected.map(|found| found.candidate.coordinates),
                    SteerDirection::Towards,
                    config,
                ),
            });
        }
    }
}

fn set_intention(
    survivor: &SurvivorSnapshot,
    intention: SurvivorIntention,
    out: &mut Vec<Command>,
) {
    if survivor.intention != intention {
        out.push(Command::SetSurvivorIntention {
            survivor: survivor.id,
            intention,
        });
    }
}
