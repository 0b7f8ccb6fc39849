//! Objective registry: generators and the repair slots around them.

use std::collections::BTreeMap;

use trial_grounds_core::{
    config::GeneratorConfig, ConfigError, Coordinates, GeneratorId, RepairSide, SlotId, SlotRef,
    SurvivorId, SLOTS_PER_GENERATOR,
};

/// Position next to a generator where one survivor may work at a time.
#[derive(Clone, Debug, PartialEq)]
pub struct RepairSlot {
    id: SlotId,
    generator: GeneratorId,
    coordinates: Coordinates,
    claimed_by: Option<SurvivorId>,
}

/// Result of a claim attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// The slot was free and now belongs to the claimant.
    Claimed,
    /// The claimant already held the slot.
    AlreadyHeld,
    /// A different survivor holds the slot. Nothing changed.
    Rejected {
        /// Current holder of the slot.
        holder: SurvivorId,
    },
}

impl RepairSlot {
    /// Identifier of the slot within its generator.
    #[must_use]
    pub const fn id(&self) -> SlotId {
        self.id
    }

    /// Generator owning the slot.
    #[must_use]
    pub const fn generator(&self) -> GeneratorId {
        self.generator
    }

    /// Reference usable for later lookups.
    #[must_use]
    pub const fn reference(&self) -> SlotRef {
        SlotRef::new(self.generator, self.id)
    }

    /// Fixed position of the slot.
    #[must_use]
    pub const fn coordinates(&self) -> Coordinates {
        self.coordinates
    }

    /// Survivor holding the slot, if any.
    #[must_use]
    pub const fn claimed_by(&self) -> Option<SurvivorId> {
        self.claimed_by
    }

    /// Claims the slot for `survivor` unless another survivor holds it.
    pub fn claim(&mut self, survivor: SurvivorId) -> ClaimOutcome {
        match self.claimed_by {
            None => {
                self.claimed_by = Some(survivor);
                ClaimOutcome::Claimed
            }
            Some(holder) if holder == survivor => ClaimOutcome::AlreadyHeld,
            Some(holder) => ClaimOutcome::Rejected { holder },
        }
    }

    /// Frees the slot, returning the previous holder.
    pub fn release(&mut self) -> Option<SurvivorId> {
        self.claimed_by.take()
    }
}

/// Repairable objective with four fixed slots, one per cardinal side.
#[derive(Clone, Debug, PartialEq)]
pub struct Generator {
    id: GeneratorId,
    position: Coordinates,
    slots: BTreeMap<SlotId, RepairSlot>,
}

impl Generator {
    /// Identifier of the generator.
    #[must_use]
    pub const fn id(&self) -> GeneratorId {
        self.id
    }

    /// Center of the generator.
    #[must_use]
    pub const fn position(&self) -> Coordinates {
        self.position
    }

    /// Looks up a slot by identifier.
    #[must_use]
    pub fn slot(&self, id: SlotId) -> Option<&RepairSlot> {
        self.slots.get(&id)
    }

    /// Looks up a slot by identifier for mutation.
    pub fn slot_mut(&mut self, id: SlotId) -> Option<&mut RepairSlot> {
        self.slots.get_mut(&id)
    }

    /// Slots in identifier order.
    pub fn slots(&self) -> impl Iterator<Item = &RepairSlot> {
        self.slots.values()
    }
}

/// Builds a generator and derives its four slot positions.
///
/// Slots sit `half extent + agent radius` away from the center: slot 1 above,
/// slot 2 to the right, slot 3 below and slot 4 to the left.
pub fn create_generator(
    id: GeneratorId,
    position: Coordinates,
    footprint: &GeneratorConfig,
    agent_radius: f32,
) -> Result<Generator, ConfigError> {
    let horizontal = footprint.half_width + agent_radius;
    let vertical = footprint.half_height + agent_radius;

    let mut slots = BTreeMap::new();
    for index in 1..=SLOTS_PER_GENERATOR as u8 {
        let side = RepairSide::try_from(index)?;
        let coordinates = match side {
            RepairSide::North => Coordinates::new(position.x(), position.y() - vertical),
            RepairSide::East => Coordinates::new(position.x() + horizontal, position.y()),
            RepairSide::South => Coordinates::new(position.x(), position.y() + vertical),
            RepairSide::West => Coordinates::new(position.x() - horizontal, position.y()),
        };
        let slot = RepairSlot {
            id: side.slot_id(),
            generator: id,
            coordinates,
            claimed_by: None,
        };
        let _ = slots.insert(slot.id, slot);
    }

    Ok(Generator {
        id,
        position,
        slots,
    })
}

/// Registry owning every generator, iterated in identifier order.
#[derive(Clone, Debug, Default)]
pub struct ObjectiveRegistry {
    generators: BTreeMap<GeneratorId, Generator>,
}

impl ObjectiveRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a generator, replacing any previous one with the same identifier.
    pub fn insert(&mut self, generator: Generator) {
        let _ = self.generators.insert(generator.id, generator);
    }

    /// Looks up a generator.
    #[must_use]
    pub fn generator(&self, id: GeneratorId) -> Option<&Generator> {
        self.generators.get(&id)
    }

    /// Generators in identifier order.
    pub fn generators(&self) -> impl Iterator<Item = &Generator> {
        self.generators.values()
    }

    /// Resolves a slot reference.
    #[must_use]
    pub fn slot(&self, slot: SlotRef) -> Option<&RepairSlot> {
        self.generators
            .get(&slot.generator)
            .and_then(|generator| generator.slot(slot.slot))
    }

    /// Resolves a slot reference for mutation.
    pub fn slot_mut(&mut self, slot: SlotRef) -> Option<&mut RepairSlot> {
        self.generators
            .get_mut(&slot.generator)
            .and_then(|generator| generator.slot_mut(slot.slot))
    }

    /// Every slot across all generators, ordered by generator then slot.
    pub fn slots(&self) -> impl Iterator<Item = &RepairSlot> {
        self.generators.values().flat_map(|generator| generator.slots())
    }

    /// Releases every slot held by `survivor` except `keep`, returning the
    /// released references.
    pub fn release_held_by(&mut self, survivor: SurvivorId, keep: Option<SlotRef>) -> Vec<SlotRef> {
        let mut released = Vec::new();
        for generator in self.generators.values_mut() {
            for slot in generator.slots.values_mut() {
                if slot.claimed_by == Some(survivor) && Some(slot.reference()) != keep {
                    let _ = slot.release();
                    released.push(slot.reference());
                }
            }
        }
        released
    }
}
