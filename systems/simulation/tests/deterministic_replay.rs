use std::{collections::BTreeMap, time::Duration};

use trial_grounds_core::{
    geometry::Rect, Event, KillerSnapshot, SimulationConfig, SurvivorId, SurvivorSnapshot,
};
use trial_grounds_system_simulation::{simulate_frame, ManualInputs};
use trial_grounds_system_spawning::plan_layout;
use trial_grounds_world::{
    host::{KinematicSpace, ManualClock},
    query, KillerSpawn, SurvivorSpawn, World,
};

const FRAME: Duration = Duration::from_millis(16);
const FRAMES: usize = 900;

#[test]
fn deterministic_replay_produces_identical_transcripts() {
    let first = replay(SimulationConfig::default());
    let second = replay(SimulationConfig::default());

    assert_eq!(first.transcript, second.transcript, "replay diverged");
    assert_eq!(first.survivors, second.survivors);
    assert_eq!(first.killers, second.killers);

    let events: Vec<Event> = bincode::deserialize(&first.transcript).expect("decode transcript");
    let starts = events
        .iter()
        .filter(|event| matches!(event, Event::BehaviorStarted { .. }))
        .count();
    assert_eq!(starts, 1);
}

#[test]
fn no_survivor_ever_holds_two_slots() {
    let config = SimulationConfig::default();
    let (mut world, mut space) = build(config);
    let mut clock = ManualClock::default();
    let inputs = ManualInputs::new();

    for _ in 0..FRAMES {
        let _ = clock.advance(FRAME);
        let mut events = Vec::new();
        simulate_frame(&mut world, &clock, &inputs, &mut events);
        space.step(FRAME);

        let mut held: BTreeMap<SurvivorId, usize> = BTreeMap::new();
        for slot in query::repair_slot_view(&world).iter() {
            if let Some(holder) = slot.claimed_by {
                *held.entry(holder).or_default() += 1;
            }
        }
        assert!(held.values().all(|count| *count == 1), "{held:?}");
    }
}

struct ReplayOutcome {
    transcript: Vec<u8>,
    survivors: Vec<SurvivorSnapshot>,
    killers: Vec<KillerSnapshot>,
}

fn build(config: SimulationConfig) -> (World, KinematicSpace) {
    let layout = plan_layout(&config).expect("layout");
    let arena = config.arena;
    let mut space = KinematicSpace::bounded(Rect::new(
        arena.origin_x,
        arena.origin_y,
        arena.origin_x + arena.width,
        arena.origin_y + arena.height,
    ));

    let mut builder = World::builder(config);
    for position in layout.generators {
        builder = builder.generator(position);
    }
    for position in layout.survivors {
        let body = space.spawn(position, config.survivor.radius);
        builder = builder.survivor(SurvivorSpawn::automated(body));
    }
    for position in layout.killers {
        let body = space.spawn(position, config.killer.radius);
        builder = builder.killer(KillerSpawn::automated(body));
    }
    (builder.build().expect("world"), space)
}

fn replay(config: SimulationConfig) -> ReplayOutcome {
    let (mut world, mut space) = build(config);
    let mut clock = ManualClock::default();
    let inputs = ManualInputs::new();
    let mut log = Vec::new();

    for _ in 0..FRAMES {
        let _ = clock.advance(FRAME);
        simulate_frame(&mut world, &clock, &inputs, &mut log);
        space.step(FRAME);
    }

    ReplayOutcome {
        transcript: bincode::serialize(&log).expect("encode transcript"),
        survivors: query::survivor_view(&world).into_vec(),
        killers: query::killer_view(&world).into_vec(),
    }
}
