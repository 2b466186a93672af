//! Scene lifecycle notifications for whoever hosts the game.

use crossbeam_channel::{Receiver, Sender};

/// Announcements made by the engine and its scenes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EngineEvent {
    /// A scene finished `on_enter` and is now active.
    SceneReady { scene: &'static str },
}

/// Fan-out publisher. Every subscriber gets its own unbounded channel.
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<Sender<EngineEvent>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> Receiver<EngineEvent> {
        let (tx, rx) = crossbeam_channel::unbounded();
        self.subscribers.push(tx);
        rx
    }

    /// Send `event` to every live subscriber and return how many received it.
    ///
    /// Subscribers whose receiver was dropped are forgotten.
    pub fn emit(&mut self, event: EngineEvent) -> usize {
        self.subscribers
            .retain(|tx| tx.send(event.clone()).is_ok());
        self.subscribers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
