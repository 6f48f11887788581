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

//! The user-facing side of the runtime: the [`Sketch`] trait and the
//! [`SketchContext`] its callbacks receive.

use crate::input::InputState;
use crate::permissions::PermissionRequestBatch;
use crate::scheduler::FrameState;
use anyhow::Result;
use easel_core::{KeyEvent, MouseButton, MouseEvent, Pointer, RenderBackend, Stopwatch, TouchEvent};

/// A user-authored program driven by a [`FrameScheduler`](crate::FrameScheduler).
///
/// Every callback runs on the scheduler's thread, to completion, at a fixed
/// point of the frame cycle. All of them default to doing nothing. Returning
/// an error stops the sketch and surfaces the error to the driver.
#[allow(unused_variables)]
pub trait Sketch {
    /// The rendering backend this sketch draws with.
    type Backend: RenderBackend;

    /// Called once, in the first frame, before any `draw`.
    fn setup(&mut self, ctx: &mut SketchContext<'_, Self::Backend>) -> Result<()> {
        Ok(())
    }

    /// Called once per frame.
    fn draw(&mut self, ctx: &mut SketchContext<'_, Self::Backend>) -> Result<()> {
        Ok(())
    }

    /// The host is going to the background.
    fn pause(&mut self, ctx: &mut SketchContext<'_, Self::Backend>) -> Result<()> {
        Ok(())
    }

    /// The host came back to the foreground.
    fn resume(&mut self, ctx: &mut SketchContext<'_, Self::Backend>) -> Result<()> {
        Ok(())
    }

    /// The sketch is being torn down. Called at most once.
    fn dispose(&mut self, ctx: &mut SketchContext<'_, Self::Backend>) -> Result<()> {
        Ok(())
    }

    /// The window gained focus.
    fn focus_gained(&mut self, ctx: &mut SketchContext<'_, Self::Backend>) -> Result<()> {
        Ok(())
    }

    /// The window lost focus.
    fn focus_lost(&mut self, ctx: &mut SketchContext<'_, Self::Backend>) -> Result<()> {
        Ok(())
    }

    /// The user pressed the platform's back control. Return `true` to
    /// consume it; otherwise the sketch exits.
    fn back_pressed(&mut self, ctx: &mut SketchContext<'_, Self::Backend>) -> Result<bool> {
        Ok(false)
    }

    /// The host answered a permission request.
    fn permission_result(
        &mut self,
        ctx: &mut SketchContext<'_, Self::Backend>,
        permission: &str,
        granted: bool,
    ) -> Result<()> {
        Ok(())
    }

    /// A mouse button went down.
    fn mouse_pressed(&mut self, ctx: &mut SketchContext<'_, Self::Backend>, event: &MouseEvent) -> Result<()> {
        Ok(())
    }

    /// A mouse button went up.
    fn mouse_released(&mut self, ctx: &mut SketchContext<'_, Self::Backend>, event: &MouseEvent) -> Result<()> {
        Ok(())
    }

    /// A press and release happened without significant movement.
    fn mouse_clicked(&mut self, ctx: &mut SketchContext<'_, Self::Backend>, event: &MouseEvent) -> Result<()> {
        Ok(())
    }

    /// The mouse moved with a button held.
    fn mouse_dragged(&mut self, ctx: &mut SketchContext<'_, Self::Backend>, event: &MouseEvent) -> Result<()> {
        Ok(())
    }

    /// The mouse moved with no button held.
    fn mouse_moved(&mut self, ctx: &mut SketchContext<'_, Self::Backend>, event: &MouseEvent) -> Result<()> {
        Ok(())
    }

    /// The mouse entered the surface.
    fn mouse_entered(&mut self, ctx: &mut SketchContext<'_, Self::Backend>, event: &MouseEvent) -> Result<()> {
        Ok(())
    }

    /// The mouse left the surface.
    fn mouse_exited(&mut self, ctx: &mut SketchContext<'_, Self::Backend>, event: &MouseEvent) -> Result<()> {
        Ok(())
    }

    /// The wheel turned; the amount is `event.count`.
    fn mouse_wheel(&mut self, ctx: &mut SketchContext<'_, Self::Backend>, event: &MouseEvent) -> Result<()> {
        Ok(())
    }

    /// A key went down.
    fn key_pressed(&mut self, ctx: &mut SketchContext<'_, Self::Backend>, event: &KeyEvent) -> Result<()> {
        Ok(())
    }

    /// A key went up.
    fn key_released(&mut self, ctx: &mut SketchContext<'_, Self::Backend>, event: &KeyEvent) -> Result<()> {
        Ok(())
    }

    /// A contact touched the surface.
    fn touch_started(&mut self, ctx: &mut SketchContext<'_, Self::Backend>, event: &TouchEvent) -> Result<()> {
        Ok(())
    }

    /// Contacts moved.
    fn touch_moved(&mut self, ctx: &mut SketchContext<'_, Self::Backend>, event: &TouchEvent) -> Result<()> {
        Ok(())
    }

    /// A contact left the surface.
    fn touch_ended(&mut self, ctx: &mut SketchContext<'_, Self::Backend>, event: &TouchEvent) -> Result<()> {
        Ok(())
    }

    /// The platform aborted the gesture.
    fn touch_cancelled(&mut self, ctx: &mut SketchContext<'_, Self::Backend>, event: &TouchEvent) -> Result<()> {
        Ok(())
    }
}

/// What a sketch callback can see and ask for.
///
/// Borrowed from the scheduler for the duration of one callback.
pub struct SketchContext<'a, B> {
    frame: &'a mut FrameState,
    input: &'a InputState,
    graphics: &'a mut B,
    permissions: &'a mut PermissionRequestBatch,
    clock: &'a Stopwatch,
}

impl<'a, B: RenderBackend> SketchContext<'a, B> {
    pub(crate) fn new(
        frame: &'a mut FrameState,
        input: &'a InputState,
        graphics: &'a mut B,
        permissions: &'a mut PermissionRequestBatch,
        clock: &'a Stopwatch,
    ) -> Self {
        Self {
            frame,
            input,
            graphics,
            permissions,
            clock,
        }
    }

    /// Number of completed frames. 0 during `setup`.
    pub fn frame_count(&self) -> u64 {
        self.frame.frame_count
    }

    /// Smoothed frames-per-second estimate.
    pub fn frame_rate(&self) -> f32 {
        self.frame.frame_rate.estimate()
    }

    /// Milliseconds since the sketch started.
    pub fn millis(&self) -> u64 {
        self.clock.elapsed_ms()
    }

    /// Surface width.
    pub fn width(&self) -> u32 {
        self.frame.width
    }

    /// Surface height.
    pub fn height(&self) -> u32 {
        self.frame.height
    }

    /// Current pointer x.
    pub fn mouse_x(&self) -> f32 {
        self.input.mouse.0
    }

    /// Current pointer y.
    pub fn mouse_y(&self) -> f32 {
        self.input.mouse.1
    }

    /// Previous pointer x: the previous frame's inside `draw`, the previous
    /// event's inside move and drag handlers.
    pub fn pmouse_x(&self) -> f32 {
        self.input.pmouse.0
    }

    /// Previous pointer y.
    pub fn pmouse_y(&self) -> f32 {
        self.input.pmouse.1
    }

    /// `true` while a mouse button is held.
    pub fn mouse_pressed(&self) -> bool {
        self.input.mouse_pressed
    }

    /// Button of the most recent press.
    pub fn mouse_button(&self) -> Option<MouseButton> {
        self.input.mouse_button
    }

    /// Character of the most recent key event.
    pub fn key(&self) -> char {
        self.input.key
    }

    /// Key code of the most recent key event.
    pub fn key_code(&self) -> i32 {
        self.input.key_code
    }

    /// `true` while a key is held.
    pub fn key_pressed(&self) -> bool {
        self.input.key_pressed
    }

    /// Contacts of the most recent touch event.
    pub fn touches(&self) -> &[Pointer] {
        &self.input.touches
    }

    /// `true` while at least one contact is down.
    pub fn touch_is_started(&self) -> bool {
        self.input.touch_is_started
    }

    /// `true` while the window has focus.
    pub fn focused(&self) -> bool {
        self.input.focused
    }

    /// Resumes calling `draw` every frame.
    pub fn loop_(&mut self) {
        self.frame.request_loop(&mut *self.graphics);
    }

    /// Stops calling `draw` every frame.
    pub fn no_loop(&mut self) {
        self.frame.request_no_loop(&mut *self.graphics);
    }

    /// Draws one more frame while not looping.
    pub fn redraw(&mut self) {
        self.frame.request_redraw();
    }

    /// `true` if `draw` runs every frame.
    pub fn is_looping(&self) -> bool {
        self.frame.looping
    }

    /// Sets the frame rate the driver aims for.
    pub fn set_frame_rate(&mut self, fps: f32) {
        self.frame.set_target_frame_rate(fps);
    }

    /// Enables or disables delivery of auto-repeat key presses.
    pub fn set_key_repeat(&mut self, enabled: bool) {
        self.frame.key_repeat = enabled;
    }

    /// Asks the host for a platform permission at the end of this frame.
    pub fn request_permission(&mut self, permission: &str) {
        if self.permissions.request(permission) {
            log::debug!("Permission '{permission}' queued for request.");
        }
    }

    /// `true` if the host has granted `permission`.
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.has_permission(permission)
    }

    /// Ends the sketch once the current tick is over.
    pub fn exit(&mut self) {
        log::info!("Sketch requested exit.");
        self.frame.exit_requested = true;
    }

    /// The rendering backend.
    pub fn graphics(&mut self) -> &mut B {
        &mut *self.graphics
    }
}
