// ABOUTME: FIFO queue of milestone events awaiting presentation
// ABOUTME: Append, read all, clear by index after display, or clear everything
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gutsense Contributors

use gutsense_core::models::MilestoneEvent;
use std::collections::VecDeque;

/// Pending events for one user, oldest first; never persisted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventQueue {
    events: VecDeque<MilestoneEvent>,
}

impl EventQueue {
    /// Create an empty queue
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one event
    pub fn push(&mut self, event: MilestoneEvent) {
        self.events.push_back(event);
    }

    /// Append events in order
    pub fn extend(&mut self, events: impl IntoIterator<Item = MilestoneEvent>) {
        self.events.extend(events);
    }

    /// Snapshot of every pending event, oldest first
    #[must_use]
    pub fn all(&self) -> Vec<MilestoneEvent> {
        self.events.iter().cloned().collect()
    }

    /// Remove the event at `index`, returning it if the index was valid
    pub fn clear_at(&mut self, index: usize) -> Option<MilestoneEvent> {
        self.events.remove(index)
    }

    /// Remove every pending event
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Number of pending events
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether nothing is pending
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gutsense_core::models::MilestoneEventType;

    fn event(id: &str) -> MilestoneEvent {
        MilestoneEvent::new(MilestoneEventType::MilestoneComplete, id, id, id, 1)
    }

    #[test]
    fn test_clear_at_keeps_order() {
        let mut queue = EventQueue::new();
        queue.extend([event("a"), event("b"), event("c")]);

        assert_eq!(queue.clear_at(1).map(|e| e.milestone_id), Some("b".to_owned()));
        assert!(queue.clear_at(5).is_none());

        let ids: Vec<String> = queue.all().into_iter().map(|e| e.milestone_id).collect();
        assert_eq!(ids, vec!["a", "c"]);

        queue.clear();
        assert!(queue.is_empty());
    }
}
