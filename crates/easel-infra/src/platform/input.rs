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

//! Translation from `winit` window events to Easel's raw input notifications.
//!
//! `winit` reports one thing at a time: a cursor position, a button edge, a
//! single touch contact. The input normalizer expects the shape of a mobile
//! motion event instead, where every notification carries all active
//! contacts and the button bits involved. [`WinitInputTranslator`] keeps the
//! little state needed to bridge the two.

use easel_core::event::raw::{
    PointerSource, RawButtons, RawKeyAction, RawKeyEvent, RawPointer, RawPointerAction,
    RawPointerEvent,
};
use easel_core::{Modifiers, Stopwatch};
use winit::event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, TouchPhase, WindowEvent};
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};

/// Pixels per wheel notch for trackpads that report pixel deltas.
const PIXELS_PER_LINE: f32 = 16.0;

/// A window event, translated.
#[derive(Debug, Clone, PartialEq)]
pub enum TranslatedInput {
    /// Feed to `InputNormalizer::on_raw_pointer_event`.
    Pointer(RawPointerEvent),
    /// Feed to `InputNormalizer::on_raw_key_event`.
    Key(RawKeyEvent),
    /// The platform's back control was pressed.
    BackNavigation,
    /// The window gained or lost focus.
    Focus(bool),
}

/// Stateful `winit` to raw-notification adapter. One per window.
#[derive(Debug)]
pub struct WinitInputTranslator {
    clock: Stopwatch,
    cursor: (f32, f32),
    buttons: RawButtons,
    modifiers: Modifiers,
    /// Active touch contacts with the `winit` id each was reported under.
    contacts: Vec<(u64, RawPointer)>,
}

impl Default for WinitInputTranslator {
    fn default() -> Self {
        Self::new()
    }
}

impl WinitInputTranslator {
    /// Creates a translator with no buttons held and no contacts down.
    pub fn new() -> Self {
        Self {
            clock: Stopwatch::new(),
            cursor: (0.0, 0.0),
            buttons: RawButtons::empty(),
            modifiers: Modifiers::NONE,
            contacts: Vec::new(),
        }
    }

    /// Translates a window event. Events that carry no input return `None`.
    pub fn translate(&mut self, event: &WindowEvent) -> Option<TranslatedInput> {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_moved(position.x as f32, position.y as f32)
            }
            WindowEvent::CursorEntered { .. } => self.cursor_crossed(true),
            WindowEvent::CursorLeft { .. } => self.cursor_crossed(false),
            WindowEvent::MouseInput { state, button, .. } => {
                self.mouse_button(map_mouse_button(*button), *state == ElementState::Pressed)
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_LINE,
                };
                self.wheel(lines)
            }
            WindowEvent::Touch(touch) => {
                let pressure = touch.force.map_or(1.0, |f| f.normalized() as f32);
                self.touch(
                    touch.id,
                    touch.phase,
                    touch.location.x as f32,
                    touch.location.y as f32,
                    pressure,
                )
            }
            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(code) = event.physical_key else {
                    return None;
                };
                self.key(
                    code,
                    event.text.as_deref(),
                    event.state == ElementState::Pressed,
                    event.repeat,
                )
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers = map_modifiers(modifiers.state());
                None
            }
            WindowEvent::Focused(focused) => Some(TranslatedInput::Focus(*focused)),
            _ => None,
        }
    }

    /// Modifiers currently held.
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Replaces the held modifiers.
    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }

    /// The cursor moved to `(x, y)`. A move with a button held is a drag
    /// candidate; otherwise it is a hover.
    pub fn cursor_moved(&mut self, x: f32, y: f32) -> Option<TranslatedInput> {
        self.cursor = (x, y);
        let action = if !self.buttons.is_empty() {
            RawPointerAction::Move
        } else {
            RawPointerAction::HoverMove
        };
        Some(self.mouse_event(action, self.buttons))
    }

    /// The cursor entered or left the window.
    pub fn cursor_crossed(&mut self, entered: bool) -> Option<TranslatedInput> {
        let action = if entered {
            RawPointerAction::HoverEnter
        } else {
            RawPointerAction::HoverExit
        };
        Some(self.mouse_event(action, self.buttons))
    }

    /// A mouse button edge. Only the first button down and the last button
    /// up produce notifications.
    pub fn mouse_button(&mut self, button: RawButtons, pressed: bool) -> Option<TranslatedInput> {
        let held_before = self.buttons;
        if pressed {
            self.buttons.insert(button);
            held_before
                .is_empty()
                .then(|| self.mouse_event(RawPointerAction::Down, button))
        } else {
            self.buttons.remove(button);
            (!held_before.is_empty() && self.buttons.is_empty())
                .then(|| self.mouse_event(RawPointerAction::Up, button))
        }
    }

    /// The wheel turned by `lines` notches; positive scrolls content up.
    pub fn wheel(&mut self, lines: f32) -> Option<TranslatedInput> {
        if lines == 0.0 {
            return None;
        }
        Some(self.mouse_event(RawPointerAction::Scroll { delta: -lines }, self.buttons))
    }

    /// A touch contact changed.
    ///
    /// `winit` ids are opaque `u64`s. Each new contact is given the lowest
    /// pointer id not held by another active contact, so ids stay small and
    /// distinct contacts never share one.
    pub fn touch(&mut self, id: u64, phase: TouchPhase, x: f32, y: f32, pressure: f32) -> Option<TranslatedInput> {
        let index = self.contacts.iter().position(|(touch_id, _)| *touch_id == id);

        let action = match (phase, index) {
            (TouchPhase::Started, None) => {
                let pointer_id = self.free_pointer_id();
                self.contacts.push((id, RawPointer { id: pointer_id, x, y, size: 0.0, pressure }));
                if self.contacts.len() == 1 {
                    RawPointerAction::Down
                } else {
                    RawPointerAction::PointerDown { index: self.contacts.len() - 1 }
                }
            }
            (TouchPhase::Moved, Some(i)) => {
                self.update_contact(i, x, y, pressure);
                RawPointerAction::Move
            }
            (TouchPhase::Ended, Some(i)) => {
                self.update_contact(i, x, y, pressure);
                let action = if self.contacts.len() == 1 {
                    RawPointerAction::Up
                } else {
                    RawPointerAction::PointerUp { index: i }
                };
                let event = self.touch_event(action);
                self.contacts.remove(i);
                return Some(event);
            }
            (TouchPhase::Cancelled, _) => {
                let event = self.touch_event(RawPointerAction::Cancel);
                self.contacts.clear();
                return Some(event);
            }
            (phase, _) => {
                log::trace!("Ignoring touch {phase:?} for contact {id}.");
                return None;
            }
        };
        Some(self.touch_event(action))
    }

    fn free_pointer_id(&self) -> i32 {
        (0..)
            .find(|candidate| self.contacts.iter().all(|(_, p)| p.id != *candidate))
            .unwrap_or_default()
    }

    fn update_contact(&mut self, index: usize, x: f32, y: f32, pressure: f32) {
        let contact = &mut self.contacts[index].1;
        contact.x = x;
        contact.y = y;
        contact.pressure = pressure;
    }

    /// A physical key edge. `BrowserBack` becomes back navigation.
    pub fn key(&mut self, code: KeyCode, text: Option<&str>, pressed: bool, repeat: bool) -> Option<TranslatedInput> {
        if code == KeyCode::BrowserBack {
            return pressed.then_some(TranslatedInput::BackNavigation);
        }
        Some(TranslatedInput::Key(RawKeyEvent {
            action: if pressed { RawKeyAction::Down } else { RawKeyAction::Up },
            timestamp: self.clock.elapsed_ms(),
            key_code: map_key_code(code),
            character: map_character(code, text),
            repeat_count: u32::from(repeat && pressed),
            modifiers: self.modifiers,
        }))
    }

    fn mouse_event(&self, action: RawPointerAction, buttons: RawButtons) -> TranslatedInput {
        let pointer = RawPointer::at(0, self.cursor.0, self.cursor.1);
        TranslatedInput::Pointer(
            RawPointerEvent::single(PointerSource::Mouse, action, self.clock.elapsed_ms(), pointer)
                .with_buttons(buttons)
                .with_modifiers(self.modifiers),
        )
    }

    fn touch_event(&self, action: RawPointerAction) -> TranslatedInput {
        TranslatedInput::Pointer(RawPointerEvent {
            source: PointerSource::Touch,
            action,
            timestamp: self.clock.elapsed_ms(),
            pointers: self.contacts.iter().map(|(_, p)| *p).collect(),
            history: Vec::new(),
            buttons: RawButtons::empty(),
            modifiers: self.modifiers,
        })
    }
}

fn map_mouse_button(button: WinitMouseButton) -> RawButtons {
    match button {
        WinitMouseButton::Left => RawButtons::PRIMARY,
        WinitMouseButton::Right => RawButtons::SECONDARY,
        WinitMouseButton::Middle => RawButtons::TERTIARY,
        WinitMouseButton::Back => RawButtons::BACK,
        WinitMouseButton::Forward => RawButtons::FORWARD,
        WinitMouseButton::Other(id) => RawButtons::from_bits_retain(1 << (5 + u32::from(id).min(26))),
    }
}

fn map_modifiers(state: ModifiersState) -> Modifiers {
    let mut modifiers = Modifiers::empty();
    if state.shift_key() {
        modifiers.insert(Modifiers::SHIFT);
    }
    if state.control_key() {
        modifiers.insert(Modifiers::CTRL);
    }
    if state.super_key() {
        modifiers.insert(Modifiers::META);
    }
    if state.alt_key() {
        modifiers.insert(Modifiers::ALT);
    }
    modifiers
}

/// Maps a physical key to the classic virtual-key codes sketches test
/// `key_code` against. Keys without one map to 0.
fn map_key_code(code: KeyCode) -> i32 {
    use KeyCode::*;
    match code {
        Backspace => 8,
        Tab => 9,
        Enter | NumpadEnter => 10,
        ShiftLeft | ShiftRight => 16,
        ControlLeft | ControlRight => 17,
        AltLeft | AltRight => 18,
        CapsLock => 20,
        Escape => 27,
        Space => 32,
        PageUp => 33,
        PageDown => 34,
        End => 35,
        Home => 36,
        ArrowLeft => 37,
        ArrowUp => 38,
        ArrowRight => 39,
        ArrowDown => 40,
        Digit0 | Numpad0 => 48,
        Digit1 | Numpad1 => 49,
        Digit2 | Numpad2 => 50,
        Digit3 | Numpad3 => 51,
        Digit4 | Numpad4 => 52,
        Digit5 | Numpad5 => 53,
        Digit6 | Numpad6 => 54,
        Digit7 | Numpad7 => 55,
        Digit8 | Numpad8 => 56,
        Digit9 | Numpad9 => 57,
        KeyA => 65,
        KeyB => 66,
        KeyC => 67,
        KeyD => 68,
        KeyE => 69,
        KeyF => 70,
        KeyG => 71,
        KeyH => 72,
        KeyI => 73,
        KeyJ => 74,
        KeyK => 75,
        KeyL => 76,
        KeyM => 77,
        KeyN => 78,
        KeyO => 79,
        KeyP => 80,
        KeyQ => 81,
        KeyR => 82,
        KeyS => 83,
        KeyT => 84,
        KeyU => 85,
        KeyV => 86,
        KeyW => 87,
        KeyX => 88,
        KeyY => 89,
        KeyZ => 90,
        SuperLeft | SuperRight => 157,
        F1 => 112,
        F2 => 113,
        F3 => 114,
        F4 => 115,
        F5 => 116,
        F6 => 117,
        F7 => 118,
        F8 => 119,
        F9 => 120,
        F10 => 121,
        F11 => 122,
        F12 => 123,
        Delete => 127,
        Insert => 155,
        _ => 0,
    }
}

/// The character a key produces, or `None` for coded keys.
fn map_character(code: KeyCode, text: Option<&str>) -> Option<char> {
    match code {
        KeyCode::Enter | KeyCode::NumpadEnter => Some('\n'),
        KeyCode::Backspace => Some('\u{8}'),
        KeyCode::Tab => Some('\t'),
        KeyCode::Escape => Some('\u{1b}'),
        KeyCode::Delete => Some('\u{7f}'),
        _ => text
            .and_then(|t| t.chars().next())
            .filter(|c| !c.is_control()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;
    use winit::event::DeviceId;

    fn pointer(input: Option<TranslatedInput>) -> RawPointerEvent {
        match input {
            Some(TranslatedInput::Pointer(event)) => event,
            other => panic!("expected a pointer notification, got {other:?}"),
        }
    }

    #[test]
    fn mouse_buttons_map_to_raw_bits() {
        assert_eq!(map_mouse_button(WinitMouseButton::Left), RawButtons::PRIMARY);
        assert_eq!(map_mouse_button(WinitMouseButton::Right), RawButtons::SECONDARY);
        assert_eq!(map_mouse_button(WinitMouseButton::Middle), RawButtons::TERTIARY);
        assert_eq!(map_mouse_button(WinitMouseButton::Back), RawButtons::BACK);
        assert_eq!(map_mouse_button(WinitMouseButton::Forward), RawButtons::FORWARD);
    }

    #[test]
    fn cursor_moves_hover_until_a_button_is_held() {
        let mut translator = WinitInputTranslator::new();
        let hover = pointer(translator.translate(&WindowEvent::CursorMoved {
            device_id: DeviceId::dummy(),
            position: PhysicalPosition::new(100.5, 200.75),
        }));
        assert_eq!(hover.action, RawPointerAction::HoverMove);
        assert_eq!((hover.pointers[0].x, hover.pointers[0].y), (100.5, 200.75));

        let down = pointer(translator.translate(&WindowEvent::MouseInput {
            device_id: DeviceId::dummy(),
            state: ElementState::Pressed,
            button: WinitMouseButton::Left,
        }));
        assert_eq!(down.action, RawPointerAction::Down);
        assert_eq!(down.buttons, RawButtons::PRIMARY);
        assert_eq!(down.pointers[0].x, 100.5);

        let drag = pointer(translator.cursor_moved(110.0, 200.0));
        assert_eq!(drag.action, RawPointerAction::Move);
    }

    #[test]
    fn only_first_press_and_last_release_are_reported() {
        let mut translator = WinitInputTranslator::new();
        assert!(translator.mouse_button(RawButtons::PRIMARY, true).is_some());
        assert!(translator.mouse_button(RawButtons::SECONDARY, true).is_none());
        assert!(translator.mouse_button(RawButtons::SECONDARY, false).is_none());
        let up = pointer(translator.mouse_button(RawButtons::PRIMARY, false));
        assert_eq!(up.action, RawPointerAction::Up);
        assert!(translator.mouse_button(RawButtons::PRIMARY, false).is_none());
    }

    #[test]
    fn wheel_lines_are_inverted_and_pixels_scaled() {
        let mut translator = WinitInputTranslator::new();
        let line = pointer(translator.translate(&WindowEvent::MouseWheel {
            device_id: DeviceId::dummy(),
            delta: MouseScrollDelta::LineDelta(0.0, 2.0),
            phase: TouchPhase::Moved,
        }));
        assert_eq!(line.action, RawPointerAction::Scroll { delta: -2.0 });

        let pixels = pointer(translator.translate(&WindowEvent::MouseWheel {
            device_id: DeviceId::dummy(),
            delta: MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, -32.0)),
            phase: TouchPhase::Moved,
        }));
        assert_eq!(pixels.action, RawPointerAction::Scroll { delta: 2.0 });

        assert!(translator.wheel(0.0).is_none());
    }

    #[test]
    fn touches_carry_every_active_contact() {
        let mut translator = WinitInputTranslator::new();
        let first = pointer(translator.touch(7, TouchPhase::Started, 1.0, 1.0, 1.0));
        assert_eq!(first.action, RawPointerAction::Down);
        assert_eq!(first.source, PointerSource::Touch);

        let second = pointer(translator.touch(9, TouchPhase::Started, 5.0, 5.0, 1.0));
        assert_eq!(second.action, RawPointerAction::PointerDown { index: 1 });
        assert_eq!(second.pointers.len(), 2);

        let moved = pointer(translator.touch(7, TouchPhase::Moved, 2.0, 2.0, 0.5));
        assert_eq!(moved.action, RawPointerAction::Move);
        assert_eq!(moved.pointers[0].x, 2.0);

        let lifted = pointer(translator.touch(7, TouchPhase::Ended, 2.0, 2.0, 0.5));
        assert_eq!(lifted.action, RawPointerAction::PointerUp { index: 0 });
        assert_eq!(lifted.pointers.len(), 2);

        let last = pointer(translator.touch(9, TouchPhase::Ended, 5.0, 5.0, 1.0));
        assert_eq!(last.action, RawPointerAction::Up);
        assert_eq!(last.pointers[0].id, 1);
    }

    #[test]
    fn wide_touch_ids_get_distinct_pointer_ids() {
        let mut translator = WinitInputTranslator::new();
        // Both truncate to 1 as an i32.
        let (a, b) = (1_u64, (1_u64 << 32) + 1);

        pointer(translator.touch(a, TouchPhase::Started, 0.0, 0.0, 1.0));
        let both = pointer(translator.touch(b, TouchPhase::Started, 9.0, 9.0, 1.0));
        let ids: Vec<i32> = both.pointers.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![0, 1]);

        let moved = pointer(translator.touch(b, TouchPhase::Moved, 8.0, 8.0, 1.0));
        assert_eq!((moved.pointers[0].x, moved.pointers[1].x), (0.0, 8.0));
    }

    #[test]
    fn lifted_pointer_ids_are_reused() {
        let mut translator = WinitInputTranslator::new();
        translator.touch(40, TouchPhase::Started, 0.0, 0.0, 1.0);
        translator.touch(41, TouchPhase::Started, 1.0, 1.0, 1.0);
        translator.touch(40, TouchPhase::Ended, 0.0, 0.0, 1.0);

        let again = pointer(translator.touch(42, TouchPhase::Started, 2.0, 2.0, 1.0));
        let ids: Vec<i32> = again.pointers.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 0]);
    }

    #[test]
    fn cancel_clears_all_contacts() {
        let mut translator = WinitInputTranslator::new();
        translator.touch(1, TouchPhase::Started, 0.0, 0.0, 1.0);
        let cancel = pointer(translator.touch(1, TouchPhase::Cancelled, 0.0, 0.0, 1.0));
        assert_eq!(cancel.action, RawPointerAction::Cancel);
        assert!(translator.touch(1, TouchPhase::Moved, 0.0, 0.0, 1.0).is_none());
    }

    #[test]
    fn keys_map_to_codes_and_characters() {
        let mut translator = WinitInputTranslator::new();
        translator.set_modifiers(Modifiers::SHIFT);
        match translator.key(KeyCode::KeyA, Some("A"), true, false) {
            Some(TranslatedInput::Key(key)) => {
                assert_eq!(key.key_code, 65);
                assert_eq!(key.character, Some('A'));
                assert_eq!(key.repeat_count, 0);
                assert!(key.modifiers.contains(Modifiers::SHIFT));
            }
            other => panic!("expected a key, got {other:?}"),
        }
        match translator.key(KeyCode::ArrowUp, None, true, true) {
            Some(TranslatedInput::Key(key)) => {
                assert_eq!(key.key_code, 38);
                assert_eq!(key.character, None);
                assert_eq!(key.repeat_count, 1);
            }
            other => panic!("expected a key, got {other:?}"),
        }
        assert_eq!(map_character(KeyCode::Enter, Some("\r")), Some('\n'));
    }

    #[test]
    fn browser_back_is_back_navigation() {
        let mut translator = WinitInputTranslator::new();
        assert_eq!(
            translator.key(KeyCode::BrowserBack, None, true, false),
            Some(TranslatedInput::BackNavigation)
        );
        assert_eq!(translator.key(KeyCode::BrowserBack, None, false, false), None);
    }

    #[test]
    fn non_input_events_are_ignored() {
        let mut translator = WinitInputTranslator::new();
        assert_eq!(translator.translate(&WindowEvent::Resized(winit::dpi::PhysicalSize::new(100, 100))), None);
        assert_eq!(translator.translate(&WindowEvent::CloseRequested), None);
        assert_eq!(translator.translate(&WindowEvent::Focused(false)), Some(TranslatedInput::Focus(false)));
    }
}
