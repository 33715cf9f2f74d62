//! Progression notifications
//!
//! The skill manager publishes events here. Subscribers are optional;
//! nothing in the core depends on anyone listening.

/// Something observable happened to a player's progression
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressionEvent {
    /// Player reached a new character level
    LevelUp { new_level: u32 },
    /// XP was added (after any bonus was applied)
    ExperienceGained { amount: u32 },
    SkillUnlocked { skill_id: String, level: u32 },
    SkillLeveledUp { skill_id: String, level: u32 },
    SkillPointsChanged { current: u32 },
}

type Subscriber = Box<dyn FnMut(&ProgressionEvent)>;

/// Fan-out of progression events to any number of subscribers.
///
/// While nobody is subscribed, emitted events are queued so a frame-driven
/// consumer (UI) can drain them once per tick instead. Once a subscriber is
/// attached events are delivered to it and no longer queued.
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<Subscriber>,
    pending: Vec<ProgressionEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, subscriber: F)
    where
        F: FnMut(&ProgressionEvent) + 'static,
    {
        self.subscribers.push(Box::new(subscriber));
    }

    pub fn emit(&mut self, event: ProgressionEvent) {
        if self.subscribers.is_empty() {
            self.pending.push(event);
            return;
        }
        for subscriber in &mut self.subscribers {
            subscriber(&event);
        }
    }

    /// Take every event emitted since the last drain
    pub fn drain(&mut self) -> Vec<ProgressionEvent> {
        std::mem::take(&mut self.pending)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .field("pending", &self.pending)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_emit_without_subscribers_is_fine() {
        let mut bus = EventBus::new();
        bus.emit(ProgressionEvent::LevelUp { new_level: 2 });
        assert_eq!(bus.drain(), vec![ProgressionEvent::LevelUp { new_level: 2 }]);
        assert!(bus.drain().is_empty());
    }

    #[test]
    fn test_all_subscribers_receive_events() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();

        for _ in 0..2 {
            let seen = Rc::clone(&seen);
            bus.subscribe(move |event| seen.borrow_mut().push(event.clone()));
        }

        bus.emit(ProgressionEvent::SkillPointsChanged { current: 3 });
        assert_eq!(seen.borrow().len(), 2);
        assert_eq!(bus.subscriber_count(), 2);
    }

    #[test]
    fn test_subscribed_bus_does_not_queue() {
        let mut bus = EventBus::new();
        bus.emit(ProgressionEvent::LevelUp { new_level: 2 });
        bus.subscribe(|_| {});

        for current in 0..1000 {
            bus.emit(ProgressionEvent::SkillPointsChanged { current });
        }
        assert_eq!(bus.drain(), vec![ProgressionEvent::LevelUp { new_level: 2 }]);
    }
}
