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

use easel_core::{KeyAction, KeyEvent, MouseAction, MouseButton, MouseEvent, Pointer, TouchAction, TouchEvent, CODED};

/// Input-derived state, updated by the scheduler as events are dispatched.
///
/// Two previous-position caches are kept: `frame_prev` is refreshed once per
/// completed frame and becomes `pmouse` at the start of the next one;
/// `event_prev` is refreshed on every move, drag and press and becomes
/// `pmouse` while a move or drag is being dispatched.
#[derive(Debug, Clone, PartialEq)]
pub struct InputState {
    /// Current pointer position.
    pub mouse: (f32, f32),
    /// Previous pointer position, as seen by user code.
    pub pmouse: (f32, f32),
    /// Position at the end of the previous frame.
    pub frame_prev: (f32, f32),
    /// Position after the previous mouse event.
    pub event_prev: (f32, f32),
    /// `true` between a press and its release.
    pub mouse_pressed: bool,
    /// The button of the most recent press.
    pub mouse_button: Option<MouseButton>,
    /// Character of the most recent key event.
    pub key: char,
    /// Key code of the most recent key event.
    pub key_code: i32,
    /// `true` between a key press and its release.
    pub key_pressed: bool,
    /// Contacts of the most recent touch event.
    pub touches: Vec<Pointer>,
    /// `true` while at least one contact is down.
    pub touch_is_started: bool,
    /// `true` while the sketch window has focus.
    pub focused: bool,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            mouse: (0.0, 0.0),
            pmouse: (0.0, 0.0),
            frame_prev: (0.0, 0.0),
            event_prev: (0.0, 0.0),
            mouse_pressed: false,
            mouse_button: None,
            key: CODED,
            key_code: 0,
            key_pressed: false,
            touches: Vec::new(),
            touch_is_started: false,
            focused: true,
        }
    }
}

impl InputState {
    /// Applies a mouse event before its handlers run.
    pub fn apply_mouse(&mut self, event: &MouseEvent) {
        let position = (event.x, event.y);
        match event.action {
            MouseAction::Press => {
                self.pmouse = position;
                self.event_prev = position;
                self.frame_prev = position;
                self.mouse_pressed = true;
                self.mouse_button = event.button;
            }
            MouseAction::Release => {
                self.mouse_pressed = false;
            }
            MouseAction::Drag | MouseAction::Move => {
                self.pmouse = self.event_prev;
            }
            _ => {}
        }
        self.mouse = position;
    }

    /// Updates the event-scoped cache after a mouse event's handlers ran.
    pub fn finish_mouse(&mut self, event: &MouseEvent) {
        if matches!(
            event.action,
            MouseAction::Drag | MouseAction::Move | MouseAction::Press
        ) {
            self.event_prev = self.mouse;
        }
    }

    /// Applies a key event before its handlers run.
    pub fn apply_key(&mut self, event: &KeyEvent) {
        self.key = event.key;
        self.key_code = event.key_code;
        self.key_pressed = event.action == KeyAction::Press;
    }

    /// Applies a touch event before its handlers run.
    pub fn apply_touch(&mut self, event: &TouchEvent) {
        self.touches.clone_from(&event.pointers);
        match event.action {
            TouchAction::Start => self.touch_is_started = true,
            TouchAction::End => self.touch_is_started = !event.pointers.is_empty(),
            TouchAction::Cancel => self.touch_is_started = false,
            TouchAction::Move => {}
        }
    }

    /// Called at the start of a frame body: user code sees the position at
    /// the end of the previous frame as `pmouse`.
    pub fn begin_frame(&mut self) {
        self.pmouse = self.frame_prev;
    }

    /// Called after `draw`: remembers the position for the next frame.
    pub fn end_frame(&mut self) {
        self.frame_prev = self.mouse;
    }
}
