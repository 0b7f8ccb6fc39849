#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Trial Grounds.
//!
//! The world owns the objective registry, both agent rosters, the physics
//! body handles and the pending timers. It changes only through [`apply`];
//! systems observe it through the [`query`] module.

pub mod host;
pub mod registry;
mod timers;

use log::{debug, trace};
use thiserror::Error;
use trial_grounds_core::{
    AgentId, Command, ConfigError, Coordinates, Event, GeneratorId, HealthState, KillerId,
    KillerIntention, PhysicsBody, SimulationConfig, SlotRef, SurvivorId, SurvivorIntention,
    Timestamp, Velocity, WELCOME_BANNER,
};

use registry::{create_generator, ClaimOutcome, ObjectiveRegistry};
use timers::{ScheduledEffect, TimerQueue};

/// Errors raised while constructing a world.
#[derive(Debug, Error)]
pub enum WorldError {
    /// The configuration failed validation.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    /// A generator was placed at a non-finite position.
    #[error("generator {index} has a non-finite position ({x}, {y})")]
    NonFiniteGenerator {
        /// Zero-based placement index of the generator.
        index: usize,
        /// Rejected horizontal coordinate.
        x: f32,
        /// Rejected vertical coordinate.
        y: f32,
    },
}

/// Survivor to add to the roster at setup.
#[derive(Debug)]
pub struct SurvivorSpawn {
    body: Box<dyn PhysicsBody>,
    automated: bool,
    dummy: bool,
}

impl SurvivorSpawn {
    /// Survivor driven by the behavior state machine.
    pub fn automated(body: impl PhysicsBody + 'static) -> Self {
        Self {
            body: Box::new(body),
            automated: true,
            dummy: false,
        }
    }

    /// Survivor driven by the host. Still subject to hits.
    pub fn manual(body: impl PhysicsBody + 'static) -> Self {
        Self {
            body: Box::new(body),
            automated: false,
            dummy: false,
        }
    }

    /// Survivor walking the scripted horizontal pattern.
    pub fn dummy(body: impl PhysicsBody + 'static) -> Self {
        Self {
            body: Box::new(body),
            automated: false,
            dummy: true,
        }
    }
}

/// Killer to add to the roster at setup.
#[derive(Debug)]
pub struct KillerSpawn {
    body: Box<dyn PhysicsBody>,
    automated: bool,
    threat_radius: Option<f32>,
}

impl KillerSpawn {
    /// Killer driven by the behavior state machine.
    pub fn automated(body: impl PhysicsBody + 'static) -> Self {
        Self {
            body: Box::new(body),
            automated: true,
            threat_radius: None,
        }
    }

    /// Killer driven by directional input from the host.
    pub fn manual(body: impl PhysicsBody + 'static) -> Self {
        Self {
            body: Box::new(body),
            automated: false,
            threat_radius: None,
        }
    }

    /// Overrides the configured default threat radius, in pixels.
    #[must_use]
    pub fn with_threat_radius(mut self, threat_radius: f32) -> Self {
        self.threat_radius = Some(threat_radius);
        self
    }
}

/// Collects setup data before constructing a [`World`].
#[derive(Debug)]
pub struct WorldBuilder {
    config: SimulationConfig,
    start: Timestamp,
    generators: Vec<Coordinates>,
    survivors: Vec<SurvivorSpawn>,
    killers: Vec<KillerSpawn>,
}

impl WorldBuilder {
    /// Sets the time at which the run begins. The cinematic delay counts from here.
    #[must_use]
    pub fn starting_at(mut self, start: Timestamp) -> Self {
        self.start = start;
        self
    }

    /// Adds a generator centred on `position`.
    #[must_use]
    pub fn generator(mut self, position: Coordinates) -> Self {
        self.generators.push(position);
        self
    }

    /// Appends a survivor to the roster.
    #[must_use]
    pub fn survivor(mut self, spawn: SurvivorSpawn) -> Self {
        self.survivors.push(spawn);
        self
    }

    /// Appends a killer to the roster.
    #[must_use]
    pub fn killer(mut self, spawn: KillerSpawn) -> Self {
        self.killers.push(spawn);
        self
    }

    /// Validates the setup and constructs the world.
    pub fn build(self) -> Result<World, WorldError> {
        let Self {
            config,
            start,
            generators,
            survivors,
            killers,
        } = self;
        config.validate()?;

        let mut registry = ObjectiveRegistry::new();
        for (index, position) in generators.into_iter().enumerate() {
            if !(position.x().is_finite() && position.y().is_finite()) {
                return Err(WorldError::NonFiniteGenerator {
                    index,
                    x: position.x(),
                    y: position.y(),
                });
            }
            let id = GeneratorId::new(index as u32 + 1);
            registry.insert(create_generator(
                id,
                position,
                &config.generator,
                config.survivor.radius,
            )?);
        }

        let survivors = survivors
            .into_iter()
            .enumerate()
            .map(|(index, spawn)| Survivor::new(SurvivorId::new(index as u32), spawn))
            .collect();
        let default_threat = config.killer_threat_radius();
        let killers = killers
            .into_iter()
            .enumerate()
            .map(|(index, spawn)| Killer::new(KillerId::new(index as u32), spawn, default_threat))
            .collect();

        Ok(World {
            banner: WELCOME_BANNER,
            behavior_starts_at: start.after(config.cinematic_delay()),
            config,
            registry,
            survivors,
            killers,
            timers: TimerQueue::default(),
            now: start,
            behavior_started: false,
        })
    }
}

#[derive(Debug)]
struct Survivor {
    id: SurvivorId,
    body: Box<dyn PhysicsBody>,
    position: Coordinates,
    velocity: Velocity,
    intention: SurvivorIntention,
    health: HealthState,
    focused_slot: Option<SlotRef>,
    speed_modifier: f32,
    hurt_until: Option<Timestamp>,
    automated: bool,
    dummy: bool,
}

impl Survivor {
    fn new(id: SurvivorId, spawn: SurvivorSpawn) -> Self {
        Self {
            id,
            position: spawn.body.position(),
            body: spawn.body,
            velocity: Velocity::ZERO,
            intention: SurvivorIntention::Idle,
            health: HealthState::Normal,
            focused_slot: None,
            speed_modifier: 1.0,
            hurt_until: None,
            automated: spawn.automated,
            dummy: spawn.dummy,
        }
    }
}

#[derive(Debug)]
struct Killer {
    id: KillerId,
    body: Box<dyn PhysicsBody>,
    position: Coordinates,
    velocity: Velocity,
    intention: KillerIntention,
    focused_point: Option<Coordinates>,
    speed_modifier: f32,
    threat_radius: f32,
    automated: bool,
}

impl Killer {
    fn new(id: KillerId, spawn: KillerSpawn, default_threat: f32) -> Self {
        Self {
            id,
            position: spawn.body.position(),
            body: spawn.body,
            velocity: Velocity::ZERO,
            intention: KillerIntention::Idle,
            focused_point: None,
            speed_modifier: 1.0,
            threat_radius: spawn.threat_radius.unwrap_or(default_threat),
            automated: spawn.automated,
        }
    }
}

/// Represents the authoritative Trial Grounds world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    config: SimulationConfig,
    registry: ObjectiveRegistry,
    survivors: Vec<Survivor>,
    killers: Vec<Killer>,
    timers: TimerQueue,
    now: Timestamp,
    behavior_starts_at: Timestamp,
    behavior_started: bool,
}

impl World {
    /// Starts building a world with the provided configuration.
    #[must_use]
    pub fn builder(config: SimulationConfig) -> WorldBuilder {
        WorldBuilder {
            config,
            start: Timestamp::ZERO,
            generators: Vec::new(),
            survivors: Vec::new(),
            killers: Vec::new(),
        }
    }

    fn survivor_mut(&mut self, id: SurvivorId) -> Option<&mut Survivor> {
        self.survivors.iter_mut().find(|survivor| survivor.id == id)
    }

    fn killer_mut(&mut self, id: KillerId) -> Option<&mut Killer> {
        self.killers.iter_mut().find(|killer| killer.id == id)
    }

    fn capture_positions(&mut self) {
        for survivor in &mut self.survivors {
            survivor.position = survivor.body.position();
        }
        for killer in &mut self.killers {
            killer.position = killer.body.position();
        }
    }

    fn fire_due_timers(&mut self, out_events: &mut Vec<Event>) {
        while let Some(effect) = self.timers.pop_due(self.now) {
            match effect {
                ScheduledEffect::AdjustSpeed { agent, delta } => {
                    self.adjust_speed(agent, delta, out_events);
                }
            }
        }
    }

    fn adjust_speed(&mut self, agent: AgentId, delta: f32, out_events: &mut Vec<Event>) {
        let modifier = match agent {
            AgentId::Survivor(id) => self.survivor_mut(id).map(|survivor| {
                survivor.speed_modifier += delta;
                survivor.speed_modifier
            }),
            AgentId::Killer(id) => self.killer_mut(id).map(|killer| {
                killer.speed_modifier += delta;
                killer.speed_modifier
            }),
        };
        if let Some(modifier) = modifier {
            out_events.push(Event::SpeedModifierChanged { agent, modifier });
        }
    }

    fn release_claims(
        &mut self,
        survivor: SurvivorId,
        keep: Option<SlotRef>,
        out_events: &mut Vec<Event>,
    ) {
        for slot in self.registry.release_held_by(survivor, keep) {
            debug!("survivor {} released {:?}", survivor.get(), slot);
            out_events.push(Event::SlotReleased { slot, survivor });
        }
    }

    fn claim_slot(&mut self, survivor: SurvivorId, slot: SlotRef, out_events: &mut Vec<Event>) {
        if !self.survivors.iter().any(|candidate| candidate.id == survivor) {
            trace!("claim by unknown survivor {} ignored", survivor.get());
            return;
        }

        let Some(repair_slot) = self.registry.slot_mut(slot) else {
            trace!("survivor {} claimed stale slot {:?}", survivor.get(), slot);
            out_events.push(Event::SlotClaimRejected {
                slot,
                survivor,
                holder: None,
            });
            return;
        };

        let coordinates = repair_slot.coordinates();
        match repair_slot.claim(survivor) {
            ClaimOutcome::Rejected { holder } => {
                debug!(
                    "survivor {} lost {:?} to survivor {}",
                    survivor.get(),
                    slot,
                    holder.get()
                );
                out_events.push(Event::SlotClaimRejected {
                    slot,
                    survivor,
                    holder: Some(holder),
                });
                return;
            }
            ClaimOutcome::Claimed => {
                debug!("survivor {} claimed {:?}", survivor.get(), slot);
                self.release_claims(survivor, Some(slot), out_events);
                out_events.push(Event::SlotClaimed { slot, survivor });
            }
            ClaimOutcome::AlreadyHeld => {}
        }

        if let Some(agent) = self.survivor_mut(survivor) {
            agent.body.set_position(coordinates);
            agent.position = coordinates;
            agent.body.set_velocity(Velocity::ZERO);
            agent.velocity = Velocity::ZERO;
        }
    }

    fn land_hit(&mut self, survivor: SurvivorId, killer: KillerId, out_events: &mut Vec<Event>) {
        if !self.killers.iter().any(|candidate| candidate.id == killer) {
            trace!("hit by unknown killer {} ignored", killer.get());
            return;
        }

        let now = self.now;
        let hit = self.config.hit;
        let Some(target) = self.survivor_mut(survivor) else {
            trace!("hit on unknown survivor {} ignored", survivor.get());
            return;
        };
        if target.hurt_until.is_some() {
            trace!("survivor {} is still hurt, hit ignored", survivor.get());
            return;
        }

        target.health = target.health.after_hit();
        target.hurt_until = Some(now.after(hit.hurt_duration()));
        let health = target.health;
        debug!(
            "killer {} hit survivor {}, health now {:?}",
            killer.get(),
            survivor.get(),
            health
        );
        out_events.push(Event::SurvivorHit {
            survivor,
            killer,
            health,
        });

        let survivor_agent = AgentId::Survivor(survivor);
        self.adjust_speed(survivor_agent, hit.survivor_speed_delta, out_events);
        self.timers.schedule(
            now.after(hit.survivor_recovery()),
            ScheduledEffect::AdjustSpeed {
                agent: survivor_agent,
                delta: -hit.survivor_speed_delta,
            },
        );

        let killer_agent = AgentId::Killer(killer);
        self.adjust_speed(killer_agent, hit.killer_speed_delta, out_events);
        self.timers.schedule(
            now.after(hit.killer_recovery()),
            ScheduledEffect::AdjustSpeed {
                agent: killer_agent,
                delta: -hit.killer_speed_delta,
            },
        );
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { now } => {
            world.now = world.now.max(now);
            world.capture_positions();
            out_events.push(Event::TimeAdvanced { now: world.now });
            world.fire_due_timers(out_events);

            if !world.behavior_started && world.now > world.behavior_starts_at {
                world.behavior_started = true;
                debug!("behavior started at {} ms", world.now.as_millis());
                out_events.push(Event::BehaviorStarted { at: world.now });
            }
        }
        Command::SetSurvivorIntention {
            survivor,
            intention,
        } => {
            if let Some(agent) = world.survivor_mut(survivor) {
                let from = agent.intention;
                if from != intention {
                    agent.intention = intention;
                    out_events.push(Event::SurvivorIntentionChanged {
                        survivor,
                        from,
                        to: intention,
                    });
                }
            }
        }
        Command::SetKillerIntention { killer, intention } => {
            if let Some(agent) = world.killer_mut(killer) {
                let from = agent.intention;
                if from != intention {
                    agent.intention = intention;
                    out_events.push(Event::KillerIntentionChanged {
                        killer,
                        from,
                        to: intention,
                    });
                }
            }
        }
        Command::FocusRepairSlot { survivor, slot } => {
            let Some(agent) = world.survivor_mut(survivor) else {
                return;
            };
            agent.focused_slot = slot;
            world.release_claims(survivor, slot, out_events);
        }
        Command::FocusPoint { killer, point } => {
            if let Some(agent) = world.killer_mut(killer) {
                agent.focused_point = point;
            }
        }
        Command::SetVelocity { agent, velocity } => match agent {
            AgentId::Survivor(id) => {
                if let Some(survivor) = world.survivor_mut(id) {
                    survivor.velocity = velocity;
                    survivor.body.set_velocity(velocity);
                }
            }
            AgentId::Killer(id) => {
                if let Some(killer) = world.killer_mut(id) {
                    killer.velocity = velocity;
                    killer.body.set_velocity(velocity);
                }
            }
        },
        Command::ClaimSlot { survivor, slot } => world.claim_slot(survivor, slot, out_events),
        Command::ReleaseClaims { survivor } => world.release_claims(survivor, None, out_events),
        Command::LandHit { survivor, killer } => world.land_hit(survivor, killer, out_events),
        Command::EndHurtAnimation { survivor } => {
            let now = world.now;
            if let Some(agent) = world.survivor_mut(survivor) {
                if agent.hurt_until.map_or(false, |ends_at| now >= ends_at) {
                    agent.hurt_until = None;
                    out_events.push(Event::HurtAnimationEnded { survivor });
                }
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use crate::registry::{Generator, ObjectiveRegistry};
    use trial_grounds_core::{
        KillerSnapshot, KillerView, RepairSlotView, SimulationConfig, SlotRef, SlotSnapshot,
        SurvivorSnapshot, SurvivorView, Timestamp,
    };

    /// Retrieves the welcome banner that adapters may display.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Configuration the world was built with.
    #[must_use]
    pub fn config(world: &World) -> &SimulationConfig {
        &world.config
    }

    /// Time reached by the most recent tick.
    #[must_use]
    pub fn now(world: &World) -> Timestamp {
        world.now
    }

    /// Deadline after which behavior starts.
    #[must_use]
    pub fn behavior_starts_at(world: &World) -> Timestamp {
        world.behavior_starts_at
    }

    /// Reports whether the cinematic delay has elapsed.
    #[must_use]
    pub fn behavior_active(world: &World) -> bool {
        world.behavior_started
    }

    /// Number of deferred effects still waiting for their deadline.
    #[must_use]
    pub fn pending_timers(world: &World) -> usize {
        world.timers.len()
    }

    /// Provides read-only access to the objective registry.
    #[must_use]
    pub fn registry(world: &World) -> &ObjectiveRegistry {
        &world.registry
    }

    /// Generators in identifier order.
    pub fn generators(world: &World) -> impl Iterator<Item = &Generator> {
        world.registry.generators()
    }

    /// Captures a read-only view of the survivors in roster order.
    #[must_use]
    pub fn survivor_view(world: &World) -> SurvivorView {
        SurvivorView::from_snapshots(
            world
                .survivors
                .iter()
                .map(|survivor| SurvivorSnapshot {
                    id: survivor.id,
                    position: survivor.position,
                    velocity: survivor.velocity,
                    intention: survivor.intention,
                    health: survivor.health,
                    focused_slot: survivor.focused_slot,
                    speed_modifier: survivor.speed_modifier,
                    hurt_until: survivor.hurt_until,
                    automated: survivor.automated,
                    dummy: survivor.dummy,
                })
                .collect(),
        )
    }

    /// Captures a read-only view of the killers in roster order.
    #[must_use]
    pub fn killer_view(world: &World) -> KillerView {
        KillerView::from_snapshots(
            world
                .killers
                .iter()
                .map(|killer| KillerSnapshot {
                    id: killer.id,
                    position: killer.position,
                    velocity: killer.velocity,
                    intention: killer.intention,
                    focused_point: killer.focused_point,
                    speed_modifier: killer.speed_modifier,
                    threat_radius: killer.threat_radius,
                    automated: killer.automated,
                })
                .collect(),
        )
    }

    /// Captures every repair slot, ordered by generator then slot.
    #[must_use]
    pub fn repair_slot_view(world: &World) -> RepairSlotView {
        RepairSlotView::from_snapshots(world.registry.slots().map(snapshot_of).collect())
    }

    /// Resolves a single slot reference.
    #[must_use]
    pub fn slot(world: &World, slot: SlotRef) -> Option<SlotSnapshot> {
        world.registry.slot(slot).map(snapshot_of)
    }

    fn snapshot_of(slot: &crate::registry::RepairSlot) -> SlotSnapshot {
        SlotSnapshot {
            slot: slot.reference(),
            coordinates: slot.coordinates(),
            claimed_by: slot.claimed_by(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::KinematicBody;
    use trial_grounds_core::SlotId;

    fn slot(generator: u32, slot: u8) -> SlotRef {
        SlotRef::new(GeneratorId::new(generator), SlotId::new(slot))
    }

    fn world_with_bodies(
        config: SimulationConfig,
    ) -> (World, Vec<KinematicBody>, Vec<KinematicBody>) {
        let survivors = vec![
            KinematicBody::detached(Coordinates::new(100.0, 60.0)),
            KinematicBody::detached(Coordinates::new(150.0, 60.0)),
        ];
        let killers = vec![KinematicBody::detached(Coordinates::new(300.0, 300.0))];
        let world = World::builder(config)
            .generator(Coordinates::new(100.0, 100.0))
            .survivor(SurvivorSpawn::automated(survivors[0].clone()))
            .survivor(SurvivorSpawn::automated(survivors[1].clone()))
            .killer(KillerSpawn::automated(killers[0].clone()))
            .build()
            .expect("valid world");
        (world, survivors, killers)
    }

    fn tick(world: &mut World, millis: u64) -> Vec<Event> {
        let mut events = Vec::new();
        apply(
            world,
            Command::Tick {
                now: Timestamp::from_millis(millis),
            },
            &mut events,
        );
        events
    }

    #[test]
    fn builder_rejects_invalid_config() {
        let mut config = SimulationConfig::default();
        config.killer.base_speed = -1.0;
        let result = World::builder(config).build();
        assert!(matches!(result, Err(WorldError::Config(_))));
    }

    #[test]
    fn builder_rejects_non_finite_generator() {
        let result = World::builder(SimulationConfig::default())
            .generator(Coordinates::new(f32::NAN, 0.0))
            .build();
        assert!(matches!(
            result,
            Err(WorldError::NonFiniteGenerator { index: 0, .. })
        ));
    }

    #[test]
    fn generators_are_numbered_from_one() {
        let (world, _, _) = world_with_bodies(SimulationConfig::default());
        let ids: Vec<u32> = query::generators(&world).map(|g| g.id().get()).collect();
        assert_eq!(ids, vec![1]);
        assert_eq!(query::repair_slot_view(&world).iter().count(), 4);
    }

    #[test]
    fn behavior_starts_strictly_after_cinematic_delay() {
        let (mut world, _, _) = world_with_bodies(SimulationConfig::default());
        let events = tick(&mut world, 3_000);
        assert!(!query::behavior_active(&world));
        assert!(!events
            .iter()
            .any(|event| matches!(event, Event::BehaviorStarted { .. })));

        let events = tick(&mut world, 3_016);
        assert!(query::behavior_active(&world));
        assert!(events.contains(&Event::BehaviorStarted {
            at: Timestamp::from_millis(3_016)
        }));

        let events = tick(&mut world, 3_032);
        assert!(!events
            .iter()
            .any(|event| matches!(event, Event::BehaviorStarted { .. })));
    }

    #[test]
    fn tick_captures_body_positions() {
        let (mut world, mut survivors, _) = world_with_bodies(SimulationConfig::default());
        survivors[0].set_position(Coordinates::new(111.0, 222.0));
        let before = query::survivor_view(&world);
        assert_eq!(
            before.iter().next().map(|s| s.position),
            Some(Coordinates::new(100.0, 60.0))
        );

        let _ = tick(&mut world, 16);
        let after = query::survivor_view(&world);
        assert_eq!(
            after.iter().next().map(|s| s.position),
            Some(Coordinates::new(111.0, 222.0))
        );
    }

    #[test]
    fn claim_snaps_survivor_and_stops_it() {
        let (mut world, survivors, _) = world_with_bodies(SimulationConfig::default());
        let survivor = SurvivorId::new(0);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SetVelocity {
                agent: AgentId::Survivor(survivor),
                velocity: Velocity::new(5.0, 5.0),
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::ClaimSlot {
                survivor,
                slot: slot(1, 1),
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::SlotClaimed {
                slot: slot(1, 1),
                survivor
            }]
        );
        assert_eq!(survivors[0].position(), Coordinates::new(100.0, 81.5));
        assert_eq!(survivors[0].velocity(), Velocity::ZERO);
        assert_eq!(
            query::slot(&world, slot(1, 1)).and_then(|s| s.claimed_by),
            Some(survivor)
        );
    }

    #[test]
    fn claim_held_by_other_survivor_is_rejected() {
        let (mut world, survivors, _) = world_with_bodies(SimulationConfig::default());
        let first = SurvivorId::new(0);
        let second = SurvivorId::new(1);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::ClaimSlot {
                survivor: first,
                slot: slot(1, 2),
            },
            &mut events,
        );
        events.clear();
        apply(
            &mut world,
            Command::ClaimSlot {
                survivor: second,
                slot: slot(1, 2),
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::SlotClaimRejected {
                slot: slot(1, 2),
                survivor: second,
                holder: Some(first),
            }]
        );
        assert_eq!(survivors[1].position(), Coordinates::new(150.0, 60.0));
        assert_eq!(
            query::slot(&world, slot(1, 2)).and_then(|s| s.claimed_by),
            Some(first)
        );
    }

    #[test]
    fn stale_claim_is_rejected_without_holder() {
        let (mut world, _, _) = world_with_bodies(SimulationConfig::default());
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::ClaimSlot {
                survivor: SurvivorId::new(0),
                slot: slot(7, 1),
            },
            &mut events,
        );
        assert_eq!(
            events,
            vec![Event::SlotClaimRejected {
                slot: slot(7, 1),
                survivor: SurvivorId::new(0),
                holder: None,
            }]
        );
    }

    #[test]
    fn refocusing_releases_previous_claim() {
        let (mut world, _, _) = world_with_bodies(SimulationConfig::default());
        let survivor = SurvivorId::new(0);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::FocusRepairSlot {
                survivor,
                slot: Some(slot(1, 1)),
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::ClaimSlot {
                survivor,
                slot: slot(1, 1),
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::FocusRepairSlot {
                survivor,
                slot: Some(slot(1, 1)),
            },
            &mut events,
        );
        assert!(!events
            .iter()
            .any(|event| matches!(event, Event::SlotReleased { .. })));

        apply(
            &mut world,
            Command::FocusRepairSlot {
                survivor,
                slot: Some(slot(1, 3)),
            },
            &mut events,
        );
        assert!(events.contains(&Event::SlotReleased {
            slot: slot(1, 1),
            survivor
        }));
        assert_eq!(
            query::slot(&world, slot(1, 1)).and_then(|s| s.claimed_by),
            None
        );
    }

    #[test]
    fn hit_advances_health_and_schedules_recovery() {
        let config = SimulationConfig::default();
        let (mut world, _, _) = world_with_bodies(config);
        let survivor = SurvivorId::new(0);
        let killer = KillerId::new(0);
        let _ = tick(&mut world, 5_000);

        let mut events = Vec::new();
        apply(&mut world, Command::LandHit { survivor, killer }, &mut events);
        assert_eq!(
            events,
            vec![
                Event::SurvivorHit {
                    survivor,
                    killer,
                    health: HealthState::Injured,
                },
                Event::SpeedModifierChanged {
                    agent: AgentId::Survivor(survivor),
                    modifier: 0.5,
                },
                Event::SpeedModifierChanged {
                    agent: AgentId::Killer(killer),
                    modifier: 0.5,
                },
            ]
        );
        assert_eq!(query::pending_timers(&world), 2);

        let snapshot = query::survivor_view(&world);
        let hurt = snapshot.get(survivor).expect("survivor");
        assert_eq!(hurt.hurt_until, Some(Timestamp::from_millis(6_000)));

        let events = tick(&mut world, 6_799);
        assert!(!events
            .iter()
            .any(|event| matches!(event, Event::SpeedModifierChanged { .. })));

        let events = tick(&mut world, 6_800);
        assert!(events.contains(&Event::SpeedModifierChanged {
            agent: AgentId::Survivor(survivor),
            modifier: 1.0,
        }));

        let events = tick(&mut world, 7_700);
        assert!(events.contains(&Event::SpeedModifierChanged {
            agent: AgentId::Killer(killer),
            modifier: 1.0,
        }));
        assert_eq!(query::pending_timers(&world), 0);
    }

    #[test]
    fn hit_during_hurt_window_is_ignored() {
        let (mut world, _, _) = world_with_bodies(SimulationConfig::default());
        let survivor = SurvivorId::new(0);
        let killer = KillerId::new(0);
        let mut events = Vec::new();
        apply(&mut world, Command::LandHit { survivor, killer }, &mut events);
        events.clear();
        apply(&mut world, Command::LandHit { survivor, killer }, &mut events);

        assert!(events.is_empty());
        let view = query::survivor_view(&world);
        assert_eq!(
            view.get(survivor).map(|s| s.health),
            Some(HealthState::Injured)
        );
    }

    #[test]
    fn hurt_window_closes_only_after_deadline() {
        let (mut world, _, _) = world_with_bodies(SimulationConfig::default());
        let survivor = SurvivorId::new(0);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::LandHit {
                survivor,
                killer: KillerId::new(0),
            },
            &mut events,
        );

        let _ = tick(&mut world, 999);
        events.clear();
        apply(&mut world, Command::EndHurtAnimation { survivor }, &mut events);
        assert!(events.is_empty());

        let _ = tick(&mut world, 1_000);
        apply(&mut world, Command::EndHurtAnimation { survivor }, &mut events);
        assert_eq!(events, vec![Event::HurtAnimationEnded { survivor }]);
        let view = query::survivor_view(&world);
        assert_eq!(view.get(survivor).and_then(|s| s.hurt_until), None);
    }

    #[test]
    fn intention_events_fire_only_on_change() {
        let (mut world, _, _) = world_with_bodies(SimulationConfig::default());
        let killer = KillerId::new(0);
        let mut events = Vec::new();
        for _ in 0..2 {
            apply(
                &mut world,
                Command::SetKillerIntention {
                    killer,
                    intention: KillerIntention::Chase,
                },
                &mut events,
            );
        }
        assert_eq!(
            events,
            vec![Event::KillerIntentionChanged {
                killer,
                from: KillerIntention::Idle,
                to: KillerIntention::Chase,
            }]
        );
    }

    #[test]
    fn killer_threat_radius_defaults_from_config() {
        let (world, _, _) = world_with_bodies(SimulationConfig::default());
        let view = query::killer_view(&world);
        let threat = view.iter().next().map(|k| k.threat_radius);
        assert_eq!(threat, Some(192.0));
    }
}
