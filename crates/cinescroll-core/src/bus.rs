//! In-process publish/subscribe channel for engine events.
//!
//! Topic wire names are a stable contract with outside listeners.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::gate::TriggerFired;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Topic {
    ChapterJumpRequested,
    TransitionStarted,
    TransitionComplete,
    InteractionTriggered,
    InteractionComplete,
    TimelineEndReached,
}

impl Topic {
    pub const ALL: [Topic; 6] = [
        Topic::ChapterJumpRequested,
        Topic::TransitionStarted,
        Topic::TransitionComplete,
        Topic::InteractionTriggered,
        Topic::InteractionComplete,
        Topic::TimelineEndReached,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::ChapterJumpRequested => "chapter-jump-requested",
            Topic::TransitionStarted => "transition-started",
            Topic::TransitionComplete => "transition-complete",
            Topic::InteractionTriggered => "interaction-triggered",
            Topic::InteractionComplete => "interaction-complete",
            Topic::TimelineEndReached => "timeline-end-reached",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Topic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Topic::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown topic: {s}"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "topic", rename_all = "kebab-case")]
pub enum CameraEvent {
    ChapterJumpRequested {
        /// Active chapter index, `None` for a direct position jump.
        chapter: Option<usize>,
        target: f32,
    },
    TransitionStarted {
        start: f32,
        target: f32,
    },
    TransitionComplete {
        position: f32,
    },
    InteractionTriggered(TriggerFired),
    InteractionComplete {
        id: String,
    },
    TimelineEndReached {
        position: f32,
    },
}

impl CameraEvent {
    pub fn topic(&self) -> Topic {
        match self {
            CameraEvent::ChapterJumpRequested { .. } => Topic::ChapterJumpRequested,
            CameraEvent::TransitionStarted { .. } => Topic::TransitionStarted,
            CameraEvent::TransitionComplete { .. } => Topic::TransitionComplete,
            CameraEvent::InteractionTriggered(_) => Topic::InteractionTriggered,
            CameraEvent::InteractionComplete { .. } => Topic::InteractionComplete,
            CameraEvent::TimelineEndReached { .. } => Topic::TimelineEndReached,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler = Box<dyn FnMut(&CameraEvent) + Send + Sync>;

struct Subscriber {
    id: SubscriptionId,
    topic: Topic,
    handler: Handler,
}

#[derive(Default)]
pub struct MessageBus {
    next_id: u64,
    subscribers: Vec<Subscriber>,
}

impl fmt::Debug for MessageBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageBus")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl MessageBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(
        &mut self,
        topic: Topic,
        handler: impl FnMut(&CameraEvent) + Send + Sync + 'static,
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

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != id);
        self.subscribers.len() != before
    }

    /// Delivers `event` to every handler of its topic, in subscription order.
    pub fn publish(&mut self, event: &CameraEvent) {
        let topic = event.topic();
        tracing::debug!("[bus] publish {}", topic);
        for subscriber in self.subscribers.iter_mut().filter(|s| s.topic == topic) {
            (subscriber.handler)(event);
        }
    }
}
