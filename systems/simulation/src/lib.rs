#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Per-frame orchestration of the behavior systems against the world.
//!
//! A frame first ticks the world, which snapshots every body position and
//! fires due timers. Once the cinematic delay has elapsed each survivor and
//! then each killer is processed in roster order. Commands produced for an
//! agent are applied before the next agent decides, so a slot claimed by one
//! survivor is already excluded for the survivors after it.

use std::collections::BTreeMap;

use log::trace;
use trial_grounds_core::{Clock, Command, DirectionalInput, Event, KillerId};
use trial_grounds_system_survivor_behavior::Surroundings;
use trial_grounds_world::{self as world, query, World};

/// Directional input held for player-driven killers during a frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ManualInputs {
    killers: BTreeMap<KillerId, DirectionalInput>,
}

impl ManualInputs {
    /// Creates an empty input set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the input for `killer`, replacing any earlier value.
    pub fn set(&mut self, killer: KillerId, input: DirectionalInput) {
        let _ = self.killers.insert(killer, input);
    }

    /// Input recorded for `killer`.
    #[must_use]
    pub fn get(&self, killer: KillerId) -> Option<DirectionalInput> {
        self.killers.get(&killer).copied()
    }
}

/// Runs one simulation frame at the time reported by `clock`.
///
/// Every event produced during the frame is appended to `out_events`.
pub fn simulate_frame(
    world: &mut World,
    clock: &impl Clock,
    inputs: &ManualInputs,
    out_events: &mut Vec<Event>,
) {
    let now = clock.now();
    world::apply(world, Command::Tick { now }, out_events);
    if !query::behavior_active(world) {
        return;
    }

    let config = *query::config(world);
    let mut commands = Vec::new();

    let survivor_ids: Vec<_> = query::survivor_view(world)
        .iter()
        .map(|survivor| survivor.id)
        .collect();
    for id in survivor_ids {
        let survivors = query::survivor_view(world);
        let Some(survivor) = survivors.get(id) else {
            continue;
        };
        let killers = query::killer_view(world);
        let slots = query::repair_slot_view(world);
        trial_grounds_system_survivor_behavior::handle(
            survivor,
            Surroundings {
                killers: &killers,
                slots: &slots,
                now,
            },
            &config,
            &mut commands,
        );
        apply_all(world, &mut commands, out_events);
    }

    let killer_ids: Vec<_> = query::killer_view(world)
        .iter()
        .map(|killer| killer.id)
        .collect();
    for id in killer_ids {
        let killers = query::killer_view(world);
        let Some(killer) = killers.get(id) else {
            continue;
        };
        let survivors = query::survivor_view(world);
        trial_grounds_system_killer_behavior::handle(
            killer,
            &survivors,
            inputs.get(id),
            &config,
            &mut commands,
        );
        apply_all(world, &mut commands, out_events);
    }
}

fn apply_all(world: &mut World, commands: &mut Vec<Command>, out_events: &mut Vec<Event>) {
    for command in commands.drain(..) {
        trace!("applying {command:?}");
        world::apply(world, command, out_events);
    }
}
