//! One-shot timers keyed to absolute simulation time.

use std::{
    cmp::{Ordering, Reverse},
    collections::BinaryHeap,
};

use trial_grounds_core::{AgentId, Timestamp};

/// Deferred effect executed once its deadline passes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum ScheduledEffect {
    /// Adds `delta` to the agent's movement-speed modifier.
    AdjustSpeed { agent: AgentId, delta: f32 },
}

#[derive(Clone, Copy, Debug)]
struct Timer {
    deadline: Timestamp,
    sequence: u64,
    effect: ScheduledEffect,
}

impl Timer {
    fn key(&self) -> (Timestamp, u64) {
        (self.deadline, self.sequence)
    }
}

impl PartialEq for Timer {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Timer {}

impl PartialOrd for Timer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timer {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

/// Min-heap of pending timers. Equal deadlines fire in scheduling order.
#[derive(Debug, Default)]
pub(crate) struct TimerQueue {
    heap: BinaryHeap<Reverse<Timer>>,
    next_sequence: u64,
}

impl TimerQueue {
    pub(crate) fn schedule(&mut self, deadline: Timestamp, effect: ScheduledEffect) {
        let sequence = self.next_sequence;
        self.next_sequence = self.next_sequence.wrapping_add(1);
        self.heap.push(Reverse(Timer {
            deadline,
            sequence,
            effect,
        }));
    }

    /// Removes and returns the earliest timer whose deadline is at or before `now`.
    pub(crate) fn pop_due(&mut self, now: Timestamp) -> Option<ScheduledEffect> {
        let due = self
            .heap
            .peek()
            .map_or(false, |Reverse(timer)| timer.deadline <= now);
        if !due {
            return None;
        }
        self.heap.pop().map(|Reverse(timer)| timer.effect)
    }

    pub(crate) fn len(&self) -> usize {
        self.heap.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trial_grounds_core::{KillerId, SurvivorId};

    fn adjust(agent: AgentId, delta: f32) -> ScheduledEffect {
        ScheduledEffect::AdjustSpeed { agent, delta }
    }

    #[test]
    fn timers_fire_in_deadline_order() {
        let mut queue = TimerQueue::default();
        let killer = AgentId::Killer(KillerId::new(0));
        let survivor = AgentId::Survivor(SurvivorId::new(0));
        queue.schedule(Timestamp::from_millis(2_700), adjust(killer, 0.5));
        queue.schedule(Timestamp::from_millis(1_800), adjust(survivor, 0.5));

        assert_eq!(queue.pop_due(Timestamp::from_millis(1_000)), None);
        assert_eq!(
            queue.pop_due(Timestamp::from_millis(3_000)),
            Some(adjust(survivor, 0.5))
        );
        assert_eq!(
            queue.pop_due(Timestamp::from_millis(3_000)),
            Some(adjust(killer, 0.5))
        );
        assert_eq!(queue.len(), 0);
    }

    #[test]
    fn equal_deadlines_fire_in_scheduling_order() {
        let mut queue = TimerQueue::default();
        let deadline = Timestamp::from_millis(500);
        for index in 0..3 {
            queue.schedule(
                deadline,
                adjust(AgentId::Survivor(SurvivorId::new(index)), 0.5),
            );
        }

        let fired: Vec<_> = std::iter::from_fn(|| queue.pop_due(deadline)).collect();
        assert_eq!(
            fired,
            (0..3)
                .map(|index| adjust(AgentId::Survivor(SurvivorId::new(index)), 0.5))
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn deadline_is_inclusive() {
        let mut queue = TimerQueue::default();
        let agent = AgentId::Killer(KillerId::new(1));
        queue.schedule(Timestamp::from_millis(10), adjust(agent, -0.5));
        assert_eq!(queue.pop_due(Timestamp::from_millis(9)), None);
        assert_eq!(
            queue.pop_due(Timestamp::from_millis(10)),
            Some(adjust(agent, -0.5))
        );
    }
}
