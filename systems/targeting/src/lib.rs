#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure nearest-candidate selection shared by survivors and killers.
//!
//! Candidates are scanned once in iteration order and the first strictly
//! closer candidate wins, so equidistant candidates resolve to the one seen
//! first. Views keep roster and registry order, which makes the choice
//! reproducible.

use trial_grounds_core::{
    geometry::distance, Coordinates, KillerSnapshot, KillerView, RepairSlotView, SlotSnapshot,
    SurvivorId, SurvivorSnapshot, SurvivorView,
};

/// Candidate chosen by a nearest search together with its distance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Nearest<T> {
    /// Selected candidate.
    pub candidate: T,
    /// Distance from the search origin to the candidate.
    pub distance: f32,
}

/// Returns the candidate closest to `from`, keeping the first on ties.
pub fn nearest<T, I, F>(from: Coordinates, candidates: I, position: F) -> Option<Nearest<T>>
where
    I: IntoIterator<Item = T>,
    F: Fn(&T) -> Coordinates,
{
    let mut best: Option<Nearest<T>> = None;
    for candidate in candidates {
        let candidate_distance = distance(from, position(&candidate));
        let closer = best
            .as_ref()
            .map_or(true, |current| candidate_distance < current.distance);
        if closer {
            best = Some(Nearest {
                candidate,
                distance: candidate_distance,
            });
        }
    }
    best
}

/// Nearest survivor to `from`. Every survivor is eligible, whatever its health.
#[must_use]
pub fn nearest_survivor(
    from: Coordinates,
    survivors: &SurvivorView,
) -> Option<Nearest<&SurvivorSnapshot>> {
    nearest(from, survivors.iter(), |survivor| survivor.position)
}

/// Nearest killer to `from`.
#[must_use]
pub fn nearest_killer(from: Coordinates, killers: &KillerView) -> Option<Nearest<&KillerSnapshot>> {
    nearest(from, killers.iter(), |killer| killer.position)
}

/// Nearest slot that is free or already held by `survivor`.
///
/// Slots held by other survivors are skipped even when they are closer.
#[must_use]
pub fn nearest_available_slot(
    from: Coordinates,
    survivor: SurvivorId,
    slots: &RepairSlotView,
) -> Option<Nearest<&SlotSnapshot>> {
    nearest(
        from,
        slots.iter().filter(|slot| slot.is_available_to(survivor)),
        |slot| slot.coordinates,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use trial_grounds_core::{GeneratorId, SlotId, SlotRef};

    fn slot(generator: u32, id: u8, x: f32, y: f32, claimed_by: Option<u32>) -> SlotSnapshot {
        SlotSnapshot {
            slot: SlotRef::new(GeneratorId::new(generator), SlotId::new(id)),
            coordinates: Coordinates::new(x, y),
            claimed_by: claimed_by.map(SurvivorId::new),
        }
    }

    #[test]
    fn equidistant_candidates_keep_first_seen() {
        let points = [
            Coordinates::new(10.0, 0.0),
            Coordinates::new(-10.0, 0.0),
            Coordinates::new(0.0, 10.0),
        ];
        let chosen = nearest(Coordinates::new(0.0, 0.0), points.iter().enumerate(), |(_, p)| {
            **p
        })
        .map(|found| found.candidate.0);
        assert_eq!(chosen, Some(0));

        let reversed = nearest(
            Coordinates::new(0.0, 0.0),
            points.iter().rev().enumerate(),
            |(_, p)| **p,
        )
        .map(|found| found.candidate.0);
        assert_eq!(reversed, Some(0));
    }

    #[test]
    fn closer_candidate_replaces_earlier_one() {
        let points = [Coordinates::new(30.0, 40.0), Coordinates::new(3.0, 4.0)];
        let found = nearest(Coordinates::new(0.0, 0.0), points.iter(), |p| **p).expect("found");
        assert_eq!(*found.candidate, Coordinates::new(3.0, 4.0));
        assert!((found.distance - 5.0).abs() < 1e-6);
    }

    #[test]
    fn empty_candidates_yield_none() {
        let none: Option<Nearest<Coordinates>> =
            nearest(Coordinates::new(0.0, 0.0), Vec::new(), |p| *p);
        assert!(none.is_none());
    }

    #[test]
    fn slots_held_by_others_are_excluded_even_when_closer() {
        let me = SurvivorId::new(0);
        let view = RepairSlotView::from_snapshots(vec![
            slot(1, 1, 1.0, 0.0, Some(1)),
            slot(1, 2, 50.0, 0.0, None),
            slot(2, 1, 80.0, 0.0, Some(0)),
        ]);
        let found = nearest_available_slot(Coordinates::new(0.0, 0.0), me, &view)
            .map(|found| found.candidate.slot);
        assert_eq!(
            found,
            Some(SlotRef::new(GeneratorId::new(1), SlotId::new(2)))
        );
    }

    #[test]
    fn own_claim_remains_eligible() {
        let me = SurvivorId::new(2);
        let view = RepairSlotView::from_snapshots(vec![
            slot(1, 1, 100.0, 0.0, None),
            slot(1, 2, 5.0, 0.0, Some(2)),
        ]);
        let found = nearest_available_slot(Coordinates::new(0.0, 0.0), me, &view)
            .map(|found| found.candidate.slot.slot);
        assert_eq!(found, Some(SlotId::new(2)));
    }

    #[test]
    fn all_slots_claimed_by_others_yields_none() {
        let view = RepairSlotView::from_snapshots(vec![
            slot(1, 1, 1.0, 0.0, Some(1)),
            slot(1, 2, 2.0, 0.0, Some(3)),
        ]);
        assert!(nearest_available_slot(Coordinates::new(0.0, 0.0), SurvivorId::new(0), &view)
            .is_none());
    }
}
