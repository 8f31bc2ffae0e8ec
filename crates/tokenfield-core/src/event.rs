//! Input events for widgets.
//!
//! Raw pointer/touch recognition happens upstream; widgets receive the
//! already-recognized tap and long-press gestures alongside key and text
//! input.

use crate::geometry::Point;
use serde::{Deserialize, Serialize};

/// Input event types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// Mouse button pressed
    MouseDown {
        /// Position of click
        position: Point,
        /// Button pressed
        button: MouseButton,
    },
    /// Key pressed
    KeyDown {
        /// Key pressed
        key: Key,
    },
    /// Text input received
    TextInput {
        /// Input text
        text: String,
    },
    /// Widget gained focus
    FocusIn,
    /// Widget lost focus
    FocusOut,
    /// Long press gesture (hold of at least [`LONG_PRESS_MS`])
    GestureLongPress {
        /// Position
        position: Point,
    },
    /// Tap gesture
    GestureTap {
        /// Position
        position: Point,
        /// Number of taps (1 = single, 2 = double)
        count: u8,
    },
}

/// Hold duration after which a press is recognized as a long press.
pub const LONG_PRESS_MS: u64 = 500;

impl Event {
    /// Position of a pointer-style event (click, tap, long press).
    #[must_use]
    pub const fn position(&self) -> Option<Point> {
        match self {
            Self::MouseDown { position, .. }
            | Self::GestureLongPress { position }
            | Self::GestureTap { position, .. } => Some(*position),
            _ => None,
        }
    }

    /// Whether the event is a primary-button click or a tap.
    #[must_use]
    pub const fn is_tap(&self) -> bool {
        matches!(
            self,
            Self::GestureTap { .. }
                | Self::MouseDown {
                    button: MouseButton::Left,
                    ..
                }
        )
    }
}

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button (wheel click)
    Middle,
}

/// Keyboard keys that carry editing semantics.
///
/// Printable characters arrive as [`Event::TextInput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Backspace
    Backspace,
    /// Forward delete
    Delete,
    /// Return / submit
    Enter,
    /// Escape
    Escape,
    /// Tab
    Tab,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
    /// Home
    Home,
    /// End
    End,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_position() {
        let tap = Event::GestureTap {
            position: Point::new(1.0, 2.0),
            count: 1,
        };
        assert_eq!(tap.position(), Some(Point::new(1.0, 2.0)));
        assert_eq!(Event::FocusOut.position(), None);
    }

    #[test]
    fn test_event_is_tap() {
        assert!(Event::MouseDown {
            position: Point::ORIGIN,
            button: MouseButton::Left
        }
        .is_tap());
        assert!(!Event::MouseDown {
            position: Point::ORIGIN,
            button: MouseButton::Right
        }
        .is_tap());
        assert!(!Event::GestureLongPress {
            position: Point::ORIGIN
        }
        .is_tap());
    }

    #[test]
    fn test_event_serde() {
        let event = Event::KeyDown { key: Key::Backspace };
        let json = serde_json::to_string(&event).unwrap();
        let back: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
