pub mod events;

use self::events::{InputEvent, KeyBindings, KeyDown};
use crate::traits::InputSource;
use crossbeam_channel::{unbounded, Receiver, Sender};

/// Collects keyboard events from any thread and hands them to the game loop as lane
/// presses.
pub struct InputQueue {
    sender: Sender<InputEvent>,
    receiver: Receiver<InputEvent>,
    bindings: KeyBindings,
}

impl InputQueue {
    pub fn new(bindings: KeyBindings) -> Self {
        let (sender, receiver) = unbounded();
        Self {
            sender,
            receiver,
            bindings,
        }
    }

    /// Pushes an event into the queue.
    /// This can be called from multiple threads (e.g. input polling thread).
    pub fn push(&self, event: InputEvent) {
        let _ = self.sender.send(event);
    }

    /// Pops an event from the queue.
    /// Non-blocking. Returns None if queue is empty.
    pub fn pop(&self) -> Option<InputEvent> {
        self.receiver.try_recv().ok()
    }

    /// Returns a clone of the sender, allowing it to be passed to other threads/structs.
    pub fn sender(&self) -> Sender<InputEvent> {
        self.sender.clone()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new(KeyBindings::default())
    }
}

impl InputSource for InputQueue {
    /// Drains the queue. Releases and unbound keys are dropped.
    fn poll(&mut self, out: &mut Vec<KeyDown>) {
        while let Some(event) = self.pop() {
            if !event.pressed {
                continue;
            }
            if let Some(lane) = self.bindings.lane_for(event.key) {
                out.push(KeyDown { lane });
            }
        }
    }
}
