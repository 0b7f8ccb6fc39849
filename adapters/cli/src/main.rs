#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Trial Grounds match.

mod logging;
mod settings;

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};
use trial_grounds_core::{geometry::Rect, Event, SimulationConfig};
use trial_grounds_system_simulation::{simulate_frame, ManualInputs};
use trial_grounds_system_spawning::plan_layout;
use trial_grounds_world::{
    host::{KinematicSpace, ManualClock},
    query, KillerSpawn, SurvivorSpawn, World,
};

/// Runs automated survivors and killers on a generated arena.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON configuration file. Missing fields keep their defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Number of frames to simulate.
    #[arg(long, default_value_t = 1_200)]
    frames: u32,
    /// Frame length in milliseconds.
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,
    /// Overrides the spawn placement seed.
    #[arg(long)]
    seed: Option<u64>,
    /// Number of survivors, counted from the first, that walk the scripted patrol.
    #[arg(long, default_value_t = 0)]
    dummy_survivors: u32,
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let mut config = settings::load(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config.spawn.seed = seed;
    }

    let (mut world, mut space) = build_world(&config, args.dummy_survivors)?;
    println!("{}", query::welcome_banner(&world));

    let frame = Duration::from_millis(args.frame_ms);
    let mut clock = ManualClock::default();
    let inputs = ManualInputs::new();
    let mut events = Vec::new();
    for _ in 0..args.frames {
        let _ = clock.advance(frame);
        simulate_frame(&mut world, &clock, &inputs, &mut events);
        for event in events.drain(..) {
            report(&event);
        }
        space.step(frame);
    }

    print_status(&world);
    Ok(())
}

fn build_world(config: &SimulationConfig, dummies: u32) -> Result<(World, KinematicSpace)> {
    let layout = plan_layout(config).context("failed to place arena elements")?;
    let arena = config.arena;
    let mut space = KinematicSpace::bounded(Rect::new(
        arena.origin_x,
        arena.origin_y,
        arena.origin_x + arena.width,
        arena.origin_y + arena.height,
    ));

    let mut builder = World::builder(*config);
    for position in layout.generators {
        builder = builder.generator(position);
    }
    for (index, position) in layout.survivors.into_iter().enumerate() {
        let body = space.spawn(position, config.survivor.radius);
        let spawn = if (index as u32) < dummies {
            SurvivorSpawn::dummy(body)
        } else {
            SurvivorSpawn::automated(body)
        };
        builder = builder.survivor(spawn);
    }
    for position in layout.killers {
        let body = space.spawn(position, config.killer.radius);
        builder = builder.killer(KillerSpawn::automated(body));
    }

    let world = builder.build().context("failed to build world")?;
    info!(
        "arena ready: {} generators, {} bodies",
        query::generators(&world).count(),
        space.len()
    );
    Ok((world, space))
}

fn report(event: &Event) {
    match event {
        Event::TimeAdvanced { .. } => {}
        Event::BehaviorStarted { at } => info!("behavior started at {} ms", at.as_millis()),
        Event::SlotClaimed { slot, survivor } => info!(
            "survivor {} started repairing generator {} slot {}",
            survivor.get(),
            slot.generator.get(),
            slot.slot.get()
        ),
        Event::SurvivorHit {
            survivor,
            killer,
            health,
        } => info!(
            "killer {} hit survivor {} ({health:?})",
            killer.get(),
            survivor.get()
        ),
        other => debug!("{other:?}"),
    }
}

fn print_status(world: &World) {
    println!("t = {} ms", query::now(world).as_millis());
    for survivor in query::survivor_view(world).iter() {
        let hurt = if survivor.hurt_until.is_some() {
            " hurt"
        } else {
            ""
        };
        println!(
            "survivor {}: {:?} {:?}{hurt} at ({:.1}, {:.1})",
            survivor.id.get(),
            survivor.intention,
            survivor.health,
            survivor.position.x(),
            survivor.position.y()
        );
    }
    for killer in query::killer_view(world).iter() {
        println!(
            "killer {}: {:?} threat radius {:.0} at ({:.1}, {:.1})",
            killer.id.get(),
            killer.intention,
            killer.threat_radius,
            killer.position.x(),
            killer.position.y()
        );
    }
    let claimed = query::repair_slot_view(world)
        .iter()
        .filter(|slot| slot.claimed_by.is_some())
        .count();
    println!("{claimed} repair slots in use");
}
