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

//! Recording doubles shared by the runtime integration tests.

#![allow(dead_code)]

use anyhow::{anyhow, Result};
use easel_core::{Hook, HookArgs, KeyEvent, MouseEvent, RenderBackend, SketchConfig, TouchEvent};
use easel_runtime::{FrameScheduler, Sketch, SketchContext};
use std::sync::{Arc, Mutex};

/// An ordered log of everything the sketch, backend and hooks did.
#[derive(Debug, Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    /// Returns and clears the log.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }

    pub fn count(&self, entry: &str) -> usize {
        self.0.lock().unwrap().iter().filter(|e| e.as_str() == entry).count()
    }
}

pub struct MockBackend {
    pub journal: Journal,
    pub ready: bool,
    pub restoring: bool,
    pub courtesy_frame: bool,
    stop_pending: bool,
}

impl MockBackend {
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
            ready: true,
            restoring: false,
            courtesy_frame: false,
            stop_pending: false,
        }
    }

    pub fn with_courtesy_frame(mut self) -> Self {
        self.courtesy_frame = true;
        self
    }
}

impl RenderBackend for MockBackend {
    fn surface_is_ready(&self) -> bool {
        self.ready
    }

    fn begin_frame(&mut self) {
        self.journal.push("begin");
    }

    fn end_frame(&mut self) {
        self.journal.push("end");
    }

    fn is_restoring_state(&self) -> bool {
        self.restoring
    }

    fn request_stop_looping(&mut self) -> bool {
        if self.courtesy_frame {
            self.stop_pending = true;
        }
        self.courtesy_frame
    }

    fn stop_looping_pending(&self) -> bool {
        self.stop_pending
    }

    fn clear_stop_looping_request(&mut self) {
        self.stop_pending = false;
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.journal.push(format!("resize:{width}x{height}"));
    }

    fn dispose(&mut self) {
        self.journal.push("backend.dispose");
    }
}

/// A sketch that journals its callbacks and misbehaves on request.
#[derive(Default)]
pub struct Recorder {
    pub journal: Journal,
    pub no_loop_at: Option<u64>,
    pub panic_at: Option<u64>,
    pub fail_at: Option<u64>,
    pub exit_at: Option<u64>,
    pub handles_back: bool,
    pub redraw_on_key: bool,
    pub permission: Option<&'static str>,
    pub record_pmouse: bool,
}

impl Recorder {
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
            ..Self::default()
        }
    }
}

impl Sketch for Recorder {
    type Backend = MockBackend;

    fn setup(&mut self, ctx: &mut SketchContext<'_, MockBackend>) -> Result<()> {
        self.journal.push(format!("setup({})", ctx.frame_count()));
        Ok(())
    }

    fn draw(&mut self, ctx: &mut SketchContext<'_, MockBackend>) -> Result<()> {
        let frame = ctx.frame_count();
        self.journal.push(format!("draw({frame})"));
        if self.record_pmouse {
            self.journal.push(format!("pmouse:{},{}", ctx.pmouse_x(), ctx.pmouse_y()));
        }
        if let Some(permission) = self.permission {
            ctx.request_permission(permission);
            ctx.request_permission(permission);
        }
        if self.panic_at == Some(frame) {
            panic!("draw blew up");
        }
        if self.fail_at == Some(frame) {
            return Err(anyhow!("draw failed"));
        }
        if self.no_loop_at == Some(frame) {
            ctx.no_loop();
        }
        if self.exit_at == Some(frame) {
            ctx.exit();
        }
        Ok(())
    }

    fn pause(&mut self, _ctx: &mut SketchContext<'_, MockBackend>) -> Result<()> {
        self.journal.push("pause");
        Ok(())
    }

    fn resume(&mut self, _ctx: &mut SketchContext<'_, MockBackend>) -> Result<()> {
        self.journal.push("resume");
        Ok(())
    }

    fn dispose(&mut self, _ctx: &mut SketchContext<'_, MockBackend>) -> Result<()> {
        self.journal.push("dispose");
        Ok(())
    }

    fn focus_gained(&mut self, _ctx: &mut SketchContext<'_, MockBackend>) -> Result<()> {
        self.journal.push("focus_gained");
        Ok(())
    }

    fn focus_lost(&mut self, _ctx: &mut SketchContext<'_, MockBackend>) -> Result<()> {
        self.journal.push("focus_lost");
        Ok(())
    }

    fn back_pressed(&mut self, _ctx: &mut SketchContext<'_, MockBackend>) -> Result<bool> {
        self.journal.push("back_pressed");
        Ok(self.handles_back)
    }

    fn permission_result(
        &mut self,
        _ctx: &mut SketchContext<'_, MockBackend>,
        permission: &str,
        granted: bool,
    ) -> Result<()> {
        self.journal.push(format!("permission:{permission}={granted}"));
        Ok(())
    }

    fn mouse_pressed(&mut self, ctx: &mut SketchContext<'_, MockBackend>, event: &MouseEvent) -> Result<()> {
        self.journal.push(format!("mouse_pressed:{},{}", event.x, event.y));
        if self.record_pmouse {
            self.journal.push(format!("pmouse:{},{}", ctx.pmouse_x(), ctx.pmouse_y()));
        }
        Ok(())
    }

    fn mouse_released(&mut self, _ctx: &mut SketchContext<'_, MockBackend>, _event: &MouseEvent) -> Result<()> {
        self.journal.push("mouse_released");
        Ok(())
    }

    fn mouse_clicked(&mut self, _ctx: &mut SketchContext<'_, MockBackend>, _event: &MouseEvent) -> Result<()> {
        self.journal.push("mouse_clicked");
        Ok(())
    }

    fn mouse_dragged(&mut self, ctx: &mut SketchContext<'_, MockBackend>, event: &MouseEvent) -> Result<()> {
        self.journal.push(format!("mouse_dragged:{},{}", event.x, event.y));
        if self.record_pmouse {
            self.journal.push(format!("pmouse:{},{}", ctx.pmouse_x(), ctx.pmouse_y()));
        }
        Ok(())
    }

    fn mouse_moved(&mut self, _ctx: &mut SketchContext<'_, MockBackend>, event: &MouseEvent) -> Result<()> {
        self.journal.push(format!("mouse_moved:{},{}", event.x, event.y));
        Ok(())
    }

    fn key_pressed(&mut self, ctx: &mut SketchContext<'_, MockBackend>, event: &KeyEvent) -> Result<()> {
        self.journal.push(format!("key_pressed:{}", event.key));
        if self.redraw_on_key {
            ctx.redraw();
        }
        Ok(())
    }

    fn key_released(&mut self, _ctx: &mut SketchContext<'_, MockBackend>, event: &KeyEvent) -> Result<()> {
        self.journal.push(format!("key_released:{}", event.key));
        Ok(())
    }

    fn touch_started(&mut self, ctx: &mut SketchContext<'_, MockBackend>, event: &TouchEvent) -> Result<()> {
        self.journal.push(format!("touch_started:{}:{}", event.pointer_count(), ctx.touch_is_started()));
        Ok(())
    }

    fn touch_ended(&mut self, ctx: &mut SketchContext<'_, MockBackend>, event: &TouchEvent) -> Result<()> {
        self.journal.push(format!("touch_ended:{}:{}", event.pointer_count(), ctx.touch_is_started()));
        Ok(())
    }
}

pub fn scheduler(sketch: Recorder, backend: MockBackend) -> FrameScheduler<Recorder> {
    FrameScheduler::new(sketch, backend, SketchConfig::default())
}

/// Registers a listener on `hook` that journals `hook:<name>`.
pub fn listen(scheduler: &mut FrameScheduler<Recorder>, journal: &Journal, hook: Hook) {
    let journal = journal.clone();
    let entry = format!("hook:{}", hook.name());
    scheduler
        .registry_mut()
        .register(hook, "test-listener", move |_: &HookArgs<'_>| {
            journal.push(entry.clone());
            Ok(())
        })
        .unwrap();
}
