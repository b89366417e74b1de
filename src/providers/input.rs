//! Dry-run input provider
//!
//! Logs every requested event and keeps a record of it, without touching the OS.

use super::types::InputProvider;
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum InputEvent {
    Click { x: i32, y: i32 },
    Scroll { steps: i32 },
    KeyPress { key: String, hold: Duration },
    MousePress { hold: Duration },
}

#[derive(Debug, Default)]
pub struct LoggingInput {
    events: Vec<InputEvent>,
}

impl LoggingInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[InputEvent] {
        &self.events
    }

    /// Coordinates of every click, in order
    pub fn clicks(&self) -> Vec<(i32, i32)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                InputEvent::Click { x, y } => Some((*x, *y)),
                _ => None,
            })
            .collect()
    }
}

impl InputProvider for LoggingInput {
    fn click(&mut self, x: i32, y: i32) {
        log::info!("👆 click ({x},{y})");
        self.events.push(InputEvent::Click { x, y });
    }

    fn scroll(&mut self, steps: i32) {
        log::info!("🖱️ scroll {steps}");
        self.events.push(InputEvent::Scroll { steps });
    }

    fn press_key(&mut self, key: &str, hold: Duration) {
        log::info!("⌨️ key '{key}' for {hold:?}");
        self.events.push(InputEvent::KeyPress {
            key: key.to_string(),
            hold,
        });
    }

    fn press_mouse(&mut self, hold: Duration) {
        log::info!("🖱️ mouse press for {hold:?}");
        self.events.push(InputEvent::MousePress { hold });
    }
}
