// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use bitflags::bitflags;
use std::fmt;

/// Character reported for keys that have no printable representation
/// (arrows, modifiers, function keys). Check `key_code` instead.
pub const CODED: char = '\u{FFFF}';

bitflags! {
    /// Keyboard modifiers held while an event was produced.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// No modifier held.
        const NONE = 0;
        /// Shift key.
        const SHIFT = 1;
        /// Control key.
        const CTRL = 1 << 1;
        /// Meta / command / super key.
        const META = 1 << 2;
        /// Alt / option key.
        const ALT = 1 << 3;
    }
}

/// The mouse button attached to a mouse event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// The primary (usually left) button.
    Left,
    /// The secondary (usually right) button.
    Right,
    /// The tertiary (usually middle/wheel) button.
    Center,
    /// Any other physical button, identified by its platform code.
    Other(u32),
}

/// The kind of an [`Event`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A pointer event presented as a mouse.
    Mouse,
    /// A keyboard event.
    Key,
    /// A multi-touch event.
    Touch,
}

/// What happened in a [`MouseEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseAction {
    /// A button went down.
    Press,
    /// A button went up.
    Release,
    /// A press followed by a release without significant movement.
    Click,
    /// The pointer moved while a button was held.
    Drag,
    /// The pointer moved with no button held.
    Move,
    /// The pointer entered the sketch surface.
    Enter,
    /// The pointer left the sketch surface.
    Exit,
    /// The wheel was rotated; the amount is carried in `count`.
    Wheel,
}

/// What happened in a [`KeyEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// The key went down (possibly an auto-repeat).
    Press,
    /// The key went up.
    Release,
}

/// What happened in a [`TouchEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchAction {
    /// A contact touched the surface.
    Start,
    /// One or more contacts moved.
    Move,
    /// A contact left the surface.
    End,
    /// The platform aborted the gesture.
    Cancel,
}

/// A mouse event, either from a real mouse or emulated from a touch contact.
#[derive(Debug, Clone, PartialEq)]
pub struct MouseEvent {
    /// Milliseconds on the host's clock.
    pub timestamp: u64,
    /// What happened.
    pub action: MouseAction,
    /// Horizontal position in surface coordinates.
    pub x: f32,
    /// Vertical position in surface coordinates.
    pub y: f32,
    /// The button involved, if any.
    pub button: Option<MouseButton>,
    /// Click count for clicks and presses; scroll amount for wheel events.
    pub count: i32,
    /// Modifiers held when the event was produced.
    pub modifiers: Modifiers,
}

/// A keyboard event.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyEvent {
    /// Milliseconds on the host's clock.
    pub timestamp: u64,
    /// What happened.
    pub action: KeyAction,
    /// The typed character, or [`CODED`] for non-printable keys.
    pub key: char,
    /// The platform-independent key code.
    pub key_code: i32,
    /// `true` if this press was generated by the platform's key repeat.
    pub is_auto_repeat: bool,
    /// Modifiers held when the event was produced.
    pub modifiers: Modifiers,
}

/// One contact in a [`TouchEvent`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pointer {
    /// Platform-assigned identity, stable for the lifetime of the contact.
    pub id: i32,
    /// Horizontal position in surface coordinates.
    pub x: f32,
    /// Vertical position in surface coordinates.
    pub y: f32,
    /// Normalized contact size.
    pub size: f32,
    /// Normalized contact pressure.
    pub pressure: f32,
}

/// A multi-touch event carrying every contact active at that instant.
#[derive(Debug, Clone, PartialEq)]
pub struct TouchEvent {
    /// Milliseconds on the host's clock.
    pub timestamp: u64,
    /// What happened.
    pub action: TouchAction,
    /// Contacts on the surface.
    pub pointers: Vec<Pointer>,
    /// Modifiers held when the event was produced.
    pub modifiers: Modifiers,
}

impl TouchEvent {
    /// Number of contacts carried by this event.
    pub fn pointer_count(&self) -> usize {
        self.pointers.len()
    }

    /// Looks up a contact by its platform identity.
    pub fn pointer(&self, id: i32) -> Option<&Pointer> {
        self.pointers.iter().find(|p| p.id == id)
    }
}

/// A normalized input event, created by the input normalizer and consumed
/// exactly once by the frame scheduler.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A mouse event.
    Mouse(MouseEvent),
    /// A keyboard event.
    Key(KeyEvent),
    /// A touch event.
    Touch(TouchEvent),
}

impl Event {
    /// The kind of this event.
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Mouse(_) => EventKind::Mouse,
            Event::Key(_) => EventKind::Key,
            Event::Touch(_) => EventKind::Touch,
        }
    }

    /// Milliseconds on the host's clock.
    pub fn timestamp(&self) -> u64 {
        match self {
            Event::Mouse(e) => e.timestamp,
            Event::Key(e) => e.timestamp,
            Event::Touch(e) => e.timestamp,
        }
    }

    /// Modifiers held when the event was produced.
    pub fn modifiers(&self) -> Modifiers {
        match self {
            Event::Mouse(e) => e.modifiers,
            Event::Key(e) => e.modifiers,
            Event::Touch(e) => e.modifiers,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Mouse => write!(f, "mouse"),
            EventKind::Key => write!(f, "key"),
            EventKind::Touch => write!(f, "touch"),
        }
    }
}
