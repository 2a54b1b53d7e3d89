// src/session/activity.rs
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// User input signals that count as activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActivityEvent {
    PointerMove,
    PointerDown,
    KeyDown,
    TouchStart,
    Scroll,
    Click,
}

impl ActivityEvent {
    pub const ALL: [ActivityEvent; 6] = [
        ActivityEvent::PointerMove,
        ActivityEvent::PointerDown,
        ActivityEvent::KeyDown,
        ActivityEvent::TouchStart,
        ActivityEvent::Scroll,
        ActivityEvent::Click,
    ];

    /// DOM event name the signal corresponds to
    pub fn dom_name(&self) -> &'static str {
        match self {
            ActivityEvent::PointerMove => "mousemove",
            ActivityEvent::PointerDown => "mousedown",
            ActivityEvent::KeyDown => "keydown",
            ActivityEvent::TouchStart => "touchstart",
            ActivityEvent::Scroll => "scroll",
            ActivityEvent::Click => "click",
        }
    }
}

impl FromStr for ActivityEvent {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mousemove" | "move" => Ok(ActivityEvent::PointerMove),
            "mousedown" | "down" => Ok(ActivityEvent::PointerDown),
            "keydown" | "key" => Ok(ActivityEvent::KeyDown),
            "touchstart" | "touch" => Ok(ActivityEvent::TouchStart),
            "scroll" => Ok(ActivityEvent::Scroll),
            "click" => Ok(ActivityEvent::Click),
            other => anyhow::bail!(
                "Unknown activity event: {}. Use one of: {}",
                other,
                ActivityEvent::ALL
                    .iter()
                    .map(|e| e.dom_name())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }
    }
}

/// Fan-out of host activity events to whoever is listening
#[derive(Debug, Clone)]
pub struct ActivityBus {
    sender: broadcast::Sender<ActivityEvent>,
}

impl Default for ActivityBus {
    fn default() -> Self {
        Self::new(64)
    }
}

impl ActivityBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Returns how many listeners received the event
    pub fn publish(&self, event: ActivityEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ActivityEvent> {
        self.sender.subscribe()
    }

    pub fn listener_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_activity_event() {
        assert_eq!("mousemove".parse::<ActivityEvent>().unwrap(), ActivityEvent::PointerMove);
        assert_eq!("KEY".parse::<ActivityEvent>().unwrap(), ActivityEvent::KeyDown);
        assert!("hover".parse::<ActivityEvent>().is_err());
    }

    #[test]
    fn test_dom_names_round_trip() {
        for event in ActivityEvent::ALL {
            assert_eq!(event.dom_name().parse::<ActivityEvent>().unwrap(), event);
        }
    }

    #[tokio::test]
    async fn test_publish_without_listeners() {
        let bus = ActivityBus::default();
        assert_eq!(bus.publish(ActivityEvent::Click), 0);

        let mut rx = bus.subscribe();
        assert_eq!(bus.publish(ActivityEvent::Scroll), 1);
        assert_eq!(rx.recv().await.unwrap(), ActivityEvent::Scroll);
    }
}
