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

//! Per-event dispatch: input state first, then the typed hook, then the
//! sketch's handler for the action.

use super::FrameScheduler;
use crate::error::FrameError;
use crate::sketch::Sketch;
use easel_core::{
    Event, Hook, HookArgs, KeyAction, KeyEvent, MouseAction, MouseEvent, TouchAction, TouchEvent,
};

impl<S: Sketch> FrameScheduler<S> {
    /// Dispatches every queued event, oldest first.
    pub(super) fn drain_events(&mut self) -> Result<(), FrameError> {
        while let Ok(event) = self.queue.drain_one() {
            self.dispatch(event)?;
        }
        Ok(())
    }

    fn dispatch(&mut self, event: Event) -> Result<(), FrameError> {
        match event {
            Event::Mouse(event) => self.dispatch_mouse(&event),
            Event::Key(event) => self.dispatch_key(&event),
            Event::Touch(event) => self.dispatch_touch(&event),
        }
    }

    fn dispatch_mouse(&mut self, event: &MouseEvent) -> Result<(), FrameError> {
        self.input.apply_mouse(event);
        self.registry.invoke(&Hook::MouseEvent, &HookArgs::Mouse(event))?;

        let result = match event.action {
            MouseAction::Press => self.call_sketch("mouse_pressed", |s, ctx| s.mouse_pressed(ctx, event)),
            MouseAction::Release => self.call_sketch("mouse_released", |s, ctx| s.mouse_released(ctx, event)),
            MouseAction::Click => self.call_sketch("mouse_clicked", |s, ctx| s.mouse_clicked(ctx, event)),
            MouseAction::Drag => self.call_sketch("mouse_dragged", |s, ctx| s.mouse_dragged(ctx, event)),
            MouseAction::Move => self.call_sketch("mouse_moved", |s, ctx| s.mouse_moved(ctx, event)),
            MouseAction::Enter => self.call_sketch("mouse_entered", |s, ctx| s.mouse_entered(ctx, event)),
            MouseAction::Exit => self.call_sketch("mouse_exited", |s, ctx| s.mouse_exited(ctx, event)),
            MouseAction::Wheel => self.call_sketch("mouse_wheel", |s, ctx| s.mouse_wheel(ctx, event)),
        };

        self.input.finish_mouse(event);
        result
    }

    fn dispatch_key(&mut self, event: &KeyEvent) -> Result<(), FrameError> {
        if event.is_auto_repeat && !self.frame.key_repeat {
            log::trace!("Dropping auto-repeat key {}.", event.key_code);
            return Ok(());
        }

        self.input.apply_key(event);
        self.registry.invoke(&Hook::KeyEvent, &HookArgs::Key(event))?;

        match event.action {
            KeyAction::Press => self.call_sketch("key_pressed", |s, ctx| s.key_pressed(ctx, event)),
            KeyAction::Release => self.call_sketch("key_released", |s, ctx| s.key_released(ctx, event)),
        }
    }

    fn dispatch_touch(&mut self, event: &TouchEvent) -> Result<(), FrameError> {
        self.input.apply_touch(event);
        self.registry.invoke(&Hook::TouchEvent, &HookArgs::Touch(event))?;

        match event.action {
            TouchAction::Start => self.call_sketch("touch_started", |s, ctx| s.touch_started(ctx, event)),
            TouchAction::Move => self.call_sketch("touch_moved", |s, ctx| s.touch_moved(ctx, event)),
            TouchAction::End => self.call_sketch("touch_ended", |s, ctx| s.touch_ended(ctx, event)),
            TouchAction::Cancel => self.call_sketch("touch_cancelled", |s, ctx| s.touch_cancelled(ctx, event)),
        }
    }
}
