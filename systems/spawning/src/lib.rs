#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Seeded rejection sampling of initial generator and agent positions.
//!
//! Generators are placed first as rectangles, then survivors and killers as
//! circles. Every accepted shape is recorded grown by the spawn clearance so
//! later shapes keep their distance.

use std::fmt;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use trial_grounds_core::{
    config::SimulationConfig,
    geometry::{circle_rect_overlap, circles_overlap, Rect},
    Coordinates,
};

/// Kind of element being placed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpawnElement {
    /// Rectangular generator footprint.
    Generator,
    /// Survivor body.
    Survivor,
    /// Killer body.
    Killer,
}

impl fmt::Display for SpawnElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Generator => "generator",
            Self::Survivor => "survivor",
            Self::Killer => "killer",
        };
        f.write_str(name)
    }
}

/// Errors raised when a layout cannot be produced.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpawnError {
    /// Every candidate drawn for the element overlapped something.
    #[error("no free space for {element} {index} after {attempts} attempts")]
    NoFreeSpace {
        /// Element that could not be placed.
        element: SpawnElement,
        /// Zero-based index of the element within its kind.
        index: usize,
        /// Number of candidates rejected.
        attempts: u32,
    },
}

/// Initial positions for every element of a run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpawnLayout {
    /// Generator centers in placement order.
    pub generators: Vec<Coordinates>,
    /// Survivor centers in roster order.
    pub survivors: Vec<Coordinates>,
    /// Killer centers in roster order.
    pub killers: Vec<Coordinates>,
}

/// Plans a layout for the roster sizes and seed in `config`.
pub fn plan_layout(config: &SimulationConfig) -> Result<SpawnLayout, SpawnError> {
    let mut placement = Placement::new(config);
    let roster = config.roster;

    let mut layout = SpawnLayout::default();
    for index in 0..roster.generators as usize {
        layout.generators.push(placement.place_generator(index)?);
    }
    for index in 0..roster.survivors as usize {
        let radius = config.survivor.radius;
        layout
            .survivors
            .push(placement.place_circle(SpawnElement::Survivor, index, radius)?);
    }
    for index in 0..roster.killers as usize {
        let radius = config.killer.radius;
        layout
            .killers
            .push(placement.place_circle(SpawnElement::Killer, index, radius)?);
    }
    Ok(layout)
}

#[derive(Debug)]
struct Placement<'a> {
    config: &'a SimulationConfig,
    rng: ChaCha8Rng,
    rectangles: Vec<Rect>,
    circles: Vec<(Coordinates, f32)>,
}

impl<'a> Placement<'a> {
    fn new(config: &'a SimulationConfig) -> Self {
        Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(config.spawn.seed),
            rectangles: Vec::new(),
            circles: Vec::new(),
        }
    }

    fn place_generator(&mut self, index: usize) -> Result<Coordinates, SpawnError> {
        let footprint = self.config.generator;
        let clearance = self.config.spawn.clearance;

        for _ in 0..self.config.spawn.max_attempts {
            let center = self.candidate(footprint.half_width, footprint.half_height);
            let rect = Rect::centered(center, footprint.half_width, footprint.half_height);
            if self.rectangles.iter().any(|placed| placed.overlaps(&rect)) {
                continue;
            }
            self.rectangles.push(rect.padded(clearance));
            return Ok(center);
        }

        Err(self.exhausted(SpawnElement::Generator, index))
    }

    fn place_circle(
        &mut self,
        element: SpawnElement,
        index: usize,
        radius: f32,
    ) -> Result<Coordinates, SpawnError> {
        let clearance = self.config.spawn.clearance;

        for _ in 0..self.config.spawn.max_attempts {
            let center = self.candidate(radius, radius);
            let blocked = self
                .rectangles
                .iter()
                .any(|rect| circle_rect_overlap(radius, center, rect))
                || self
                    .circles
                    .iter()
                    .any(|&(placed, placed_radius)| {
                        circles_overlap(center, radius, placed, placed_radius)
                    });
            if blocked {
                continue;
            }
            self.circles.push((center, radius + clearance));
            return Ok(center);
        }

        Err(self.exhausted(element, index))
    }

    /// Draws a center keeping `half_x`/`half_y` away from the inner 80% of the arena.
    fn candidate(&mut self, half_x: f32, half_y: f32) -> Coordinates {
        let arena = self.config.arena;
        let x = arena.origin_x
            + 0.1 * arena.width
            + self.random_int(half_x, 0.8 * arena.width - half_x);
        let y = arena.origin_y
            + 0.1 * arena.height
            + self.random_int(half_y, 0.8 * arena.height - half_y);
        Coordinates::new(x, y)
    }

    /// Integer-stepped draw from `low` with `high - low + 1` outcomes.
    fn random_int(&mut self, low: f32, high: f32) -> f32 {
        let unit: f32 = self.rng.gen();
        (unit * (high - low + 1.0) + low).floor()
    }

    fn exhausted(&self, element: SpawnElement, index: usize) -> SpawnError {
        SpawnError::NoFreeSpace {
            element,
            index,
            attempts: self.config.spawn.max_attempts,
        }
    }
}
