//! Event fan-out with bounded history.

use crate::traffic::HubEvent;
use std::collections::VecDeque;
use tokio::sync::{broadcast, Mutex};

pub type EventSender = broadcast::Sender<HubEvent>;
pub type EventReceiver = broadcast::Receiver<HubEvent>;

/// Broadcasts events to live subscribers and remembers the most recent ones
/// for subscribers that join later.
pub struct EventHub {
    sender: EventSender,
    history: Mutex<VecDeque<HubEvent>>,
    capacity: usize,
}

impl EventHub {
    pub fn new(history_capacity: usize, buffer: usize) -> Self {
        let (sender, _) = broadcast::channel(buffer.max(1));
        Self {
            sender,
            history: Mutex::new(VecDeque::with_capacity(history_capacity)),
            capacity: history_capacity.max(1),
        }
    }

    pub fn subscribe(&self) -> EventReceiver {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Record and broadcast an event.
    ///
    /// The history guard is held across the send so subscribers receive
    /// events in history order.
    pub async fn publish(&self, event: HubEvent) {
        let mut history = self.history.lock().await;
        if history.len() == self.capacity {
            history.pop_front();
        }
        history.push_back(event.clone());
        // Err only means nobody is listening.
        if self.sender.send(event).is_err() {
            tracing::trace!("event published without subscribers");
        }
    }

    /// Retained events, oldest first.
    pub async fn history(&self) -> Vec<HubEvent> {
        self.history.lock().await.iter().cloned().collect()
    }

    /// Snapshot envelope for a newly connected subscriber.
    pub async fn history_sync(&self) -> HubEvent {
        HubEvent::HistorySync {
            history: self.history().await,
        }
    }
}
