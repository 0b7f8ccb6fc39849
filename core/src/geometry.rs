//! Pure geometry helpers used by targeting, steering and spawn placement.

use serde::{Deserialize, Serialize};

use crate::{Coordinates, Velocity};

/// Direction of travel. Built by [`unit_vector`], so normally of length one.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    x: f32,
    y: f32,
}

impl Heading {
    /// Horizontal component.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical component.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Converts the heading into a velocity of the provided signed magnitude.
    #[must_use]
    pub fn scaled(self, magnitude: f32) -> Velocity {
        Velocity::new(self.x * magnitude, self.y * magnitude)
    }
}

/// Axis-aligned rectangle given by its minimum and maximum corners.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Rect {
    /// Creates a rectangle from its corners.
    #[must_use]
    pub const fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Creates a rectangle centred on `center` with the provided half extents.
    #[must_use]
    pub fn centered(center: Coordinates, half_width: f32, half_height: f32) -> Self {
        Self::new(
            center.x() - half_width,
            center.y() - half_height,
            center.x() + half_width,
            center.y() + half_height,
        )
    }

    /// Returns the rectangle grown by `margin` on every side.
    #[must_use]
    pub fn padded(&self, margin: f32) -> Self {
        Self::new(
            self.min_x - margin,
            self.min_y - margin,
            self.max_x + margin,
            self.max_y + margin,
        )
    }

    /// Minimum x coordinate.
    #[must_use]
    pub const fn min_x(&self) -> f32 {
        self.min_x
    }

    /// Minimum y coordinate.
    #[must_use]
    pub const fn min_y(&self) -> f32 {
        self.min_y
    }

    /// Maximum x coordinate.
    #[must_use]
    pub const fn max_x(&self) -> f32 {
        self.max_x
    }

    /// Maximum y coordinate.
    #[must_use]
    pub const fn max_y(&self) -> f32 {
        self.max_y
    }

    /// Reports whether the two rectangles share interior area. Touching edges
    /// do not count as overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.min_x < other.max_x
            && self.max_x > other.min_x
            && self.min_y < other.max_y
            && self.max_y > other.min_y
    }
}

/// Euclidean distance between two points.
#[must_use]
pub fn distance(from: Coordinates, to: Coordinates) -> f32 {
    let dx = to.x() - from.x();
    let dy = to.y() - from.y();
    (dx * dx + dy * dy).sqrt()
}

/// Normalized direction from `from` to `to`.
///
/// The caller guarantees `from != to`. Coincident points produce a heading
/// with NaN components; use [`try_unit_vector`] when that case is possible.
#[must_use]
pub fn unit_vector(from: Coordinates, to: Coordinates) -> Heading {
    let dx = to.x() - from.x();
    let dy = to.y() - from.y();
    let magnitude = (dx * dx + dy * dy).sqrt();
    Heading {
        x: dx / magnitude,
        y: dy / magnitude,
    }
}

/// Normalized direction from `from` to `to`, or `None` when the points
/// coincide.
#[must_use]
pub fn try_unit_vector(from: Coordinates, to: Coordinates) -> Option<Heading> {
    if distance(from, to) > 0.0 {
        let heading = unit_vector(from, to);
        if heading.x.is_finite() && heading.y.is_finite() {
            return Some(heading);
        }
    }
    None
}

/// Reports whether a circle touches or intersects a rectangle.
///
/// The circle center is clamped onto the rectangle and the squared distance
/// to the clamped point is compared against the squared radius.
#[must_use]
pub fn circle_rect_overlap(radius: f32, center: Coordinates, rect: &Rect) -> bool {
    let nearest_x = rect.min_x.max(center.x().min(rect.max_x));
    let nearest_y = rect.min_y.max(center.y().min(rect.max_y));
    let dx = nearest_x - center.x();
    let dy = nearest_y - center.y();
    dx * dx + dy * dy <= radius * radius
}

/// Spacing check used by spawn placement.
///
/// True when the centers are closer than the larger of the two radii, which is
/// narrower than a collision test (`r1 + r2`).
#[must_use]
pub fn circles_overlap(
    first_center: Coordinates,
    first_radius: f32,
    second_center: Coordinates,
    second_radius: f32,
) -> bool {
    distance(first_center, second_center) < first_radius.max(second_radius)
}
