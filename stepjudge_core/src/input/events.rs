use serde::{Deserialize, Serialize};

/// Raw keyboard event as delivered by the windowing layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    pub key: char,
    pub pressed: bool,
}

/// A press on a lane. No velocity or duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyDown {
    pub lane: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    keys: Vec<char>,
}

impl KeyBindings {
    pub fn new(keys: Vec<char>) -> Self {
        Self { keys }
    }

    /// Case-insensitive lookup.
    pub fn lane_for(&self, key: char) -> Option<usize> {
        let key = key.to_ascii_lowercase();
        self.keys
            .iter()
            .position(|k| k.to_ascii_lowercase() == key)
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::new(vec!['d', 'f', 'j', 'k'])
    }
}
