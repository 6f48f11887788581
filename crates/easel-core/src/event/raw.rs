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

//! Raw host notifications, before normalization.
//!
//! These mirror the shape of a mobile platform's motion events: one
//! notification carries every contact currently on the surface, the action
//! tells which contact changed, and coalesced high-frequency samples ride
//! along in `history`. Platform adapters build these; the input normalizer
//! turns them into [`Event`](super::Event)s.

use super::Modifiers;
use bitflags::bitflags;

bitflags! {
    /// Raw button bits carried by a pointer notification.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct RawButtons: u32 {
        /// The primary button.
        const PRIMARY = 1;
        /// The secondary button.
        const SECONDARY = 1 << 1;
        /// The tertiary button.
        const TERTIARY = 1 << 2;
        /// The "back" side button.
        const BACK = 1 << 3;
        /// The "forward" side button.
        const FORWARD = 1 << 4;
    }
}

/// The class of device that produced a pointer notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerSource {
    /// A touchscreen; contacts are fingers or styluses.
    Touch,
    /// A mouse or trackpad.
    Mouse,
}

/// What a raw pointer notification reports.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawPointerAction {
    /// The first contact went down. It is `pointers[0]`.
    Down,
    /// An additional contact went down while others were active.
    PointerDown {
        /// Index into `pointers` of the new contact.
        index: usize,
    },
    /// One or more contacts moved.
    Move,
    /// The last contact went up. It is `pointers[0]`.
    Up,
    /// A contact went up while others stay active.
    PointerUp {
        /// Index into `pointers` of the lifted contact.
        index: usize,
    },
    /// The platform aborted the gesture.
    Cancel,
    /// A hovering pointer moved without touching.
    HoverMove,
    /// A hovering pointer entered the surface.
    HoverEnter,
    /// A hovering pointer left the surface.
    HoverExit,
    /// A scroll wheel or gesture; positive is towards the user.
    Scroll {
        /// Scroll amount in wheel notches.
        delta: f32,
    },
}

/// One contact as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawPointer {
    /// Platform-assigned identity.
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

impl RawPointer {
    /// A contact with default size and full pressure.
    pub fn at(id: i32, x: f32, y: f32) -> Self {
        Self { id, x, y, size: 0.0, pressure: 1.0 }
    }
}

/// A coalesced historical sample attached to a move notification.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSample {
    /// Milliseconds on the host's clock.
    pub timestamp: u64,
    /// Contacts at that instant, in the same order as the notification's.
    pub pointers: Vec<RawPointer>,
}

/// A raw pointer notification.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPointerEvent {
    /// The device class.
    pub source: PointerSource,
    /// What happened.
    pub action: RawPointerAction,
    /// Milliseconds on the host's clock.
    pub timestamp: u64,
    /// Contacts at this instant.
    pub pointers: Vec<RawPointer>,
    /// Older samples, oldest first. Only meaningful for moves.
    pub history: Vec<RawSample>,
    /// Buttons involved in this notification.
    pub buttons: RawButtons,
    /// Modifiers held.
    pub modifiers: Modifiers,
}

impl RawPointerEvent {
    /// A notification with a single contact and no history.
    pub fn single(
        source: PointerSource,
        action: RawPointerAction,
        timestamp: u64,
        pointer: RawPointer,
    ) -> Self {
        Self {
            source,
            action,
            timestamp,
            pointers: vec![pointer],
            history: Vec::new(),
            buttons: RawButtons::empty(),
            modifiers: Modifiers::NONE,
        }
    }

    /// Sets the buttons involved.
    pub fn with_buttons(mut self, buttons: RawButtons) -> Self {
        self.buttons = buttons;
        self
    }

    /// Sets the held modifiers.
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Attaches coalesced historical samples.
    pub fn with_history(mut self, history: Vec<RawSample>) -> Self {
        self.history = history;
        self
    }
}

/// Whether a raw key notification is a key going down or up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RawKeyAction {
    /// The key went down.
    Down,
    /// The key went up.
    Up,
}

/// A raw key notification.
#[derive(Debug, Clone, PartialEq)]
pub struct RawKeyEvent {
    /// What happened.
    pub action: RawKeyAction,
    /// Milliseconds on the host's clock.
    pub timestamp: u64,
    /// The platform-independent key code.
    pub key_code: i32,
    /// The produced character, if the key is printable.
    pub character: Option<char>,
    /// How many times the platform has repeated this key-down. Zero for a
    /// physical press.
    pub repeat_count: u32,
    /// Modifiers held.
    pub modifiers: Modifiers,
}
