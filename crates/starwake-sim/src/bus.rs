//! In-process publish/subscribe message bus.
//!
//! Systems publish `GameEvent`s while a frame runs. At the end of the frame
//! the engine calls `dispatch`, which hands every queued event, in publish
//! order, to the handlers subscribed to its topic (and to `EventTopic::All`
//! handlers). Delivered events are then kept for the frame snapshot.

use std::collections::VecDeque;

use starwake_core::events::{EventTopic, GameEvent};

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler = Box<dyn FnMut(&GameEvent) + Send>;

struct Subscriber {
    id: SubscriptionId,
    topic: EventTopic,
    handler: Handler,
}

#[derive(Default)]
pub struct EventBus {
    queue: VecDeque<GameEvent>,
    delivered: Vec<GameEvent>,
    subscribers: Vec<Subscriber>,
    next_id: u64,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("queued", &self.queue.len())
            .field("delivered", &self.delivered.len())
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an event for delivery at the next `dispatch`.
    pub fn publish(&mut self, event: GameEvent) {
        log::trace!("publish {event:?}");
        self.queue.push_back(event);
    }

    /// Register `handler` for every event on `topic`.
    pub fn subscribe(
        &mut self,
        topic: EventTopic,
        handler: impl FnMut(&GameEvent) + Send + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push(Subscriber {
            id,
            topic,
            handler: Box::new(handler),
        });
        id
    }

    /// Remove a handler. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != id);
        self.subscribers.len() != before
    }

    /// Deliver all queued events to their subscribers.
    pub fn dispatch(&mut self) {
        while let Some(event) = self.queue.pop_front() {
            let topic = event.topic();
            for sub in &mut self.subscribers {
                if sub.topic == topic || sub.topic == EventTopic::All {
                    (sub.handler)(&event);
                }
            }
            self.delivered.push(event);
        }
    }

    /// Take the events delivered since the last call.
    pub fn drain_delivered(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.delivered)
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Events queued but not yet dispatched.
    pub fn queued(&self) -> impl Iterator<Item = &GameEvent> {
        self.queue.iter()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    fn recorder(bus: &mut EventBus, topic: EventTopic) -> Arc<Mutex<Vec<GameEvent>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        bus.subscribe(topic, move |e| sink.lock().unwrap().push(e.clone()));
        seen
    }

    #[test]
    fn test_dispatch_routes_by_topic() {
        let mut bus = EventBus::new();
        let combat = recorder(&mut bus, EventTopic::Combat);
        let docking = recorder(&mut bus, EventTopic::Docking);
        let all = recorder(&mut bus, EventTopic::All);

        bus.publish(GameEvent::ShotFired { shooter: 1 });
        bus.publish(GameEvent::Docked { station: 2 });
        assert!(combat.lock().unwrap().is_empty(), "nothing before dispatch");

        bus.dispatch();
        assert_eq!(*combat.lock().unwrap(), vec![GameEvent::ShotFired { shooter: 1 }]);
        assert_eq!(*docking.lock().unwrap(), vec![GameEvent::Docked { station: 2 }]);
        assert_eq!(all.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_delivery_preserves_publish_order() {
        let mut bus = EventBus::new();
        for shooter in 0..5 {
            bus.publish(GameEvent::ShotFired { shooter });
        }
        assert_eq!(bus.pending(), 5);
        bus.dispatch();
        let delivered = bus.drain_delivered();
        let order: Vec<u64> = delivered
            .iter()
            .map(|e| match e {
                GameEvent::ShotFired { shooter } => *shooter,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(order, vec![0, 1, 2, 3, 4]);
        assert!(bus.drain_delivered().is_empty());
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let mut bus = EventBus::new();
        let count = Arc::new(Mutex::new(0));
        let c = Arc::clone(&count);
        let id = bus.subscribe(EventTopic::Game, move |_| *c.lock().unwrap() += 1);

        bus.publish(GameEvent::PlayerDestroyed);
        bus.dispatch();
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.publish(GameEvent::PlayerDestroyed);
        bus.dispatch();
        assert_eq!(*count.lock().unwrap(), 1);
    }
}
