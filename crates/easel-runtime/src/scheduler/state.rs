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

use easel_core::{FrameRateEstimator, RenderBackend, SketchConfig};

/// Frame bookkeeping owned by the scheduler.
///
/// User code never writes these fields directly: `loop_()`, `no_loop()` and
/// `redraw()` only record intent, which the scheduler applies on its next
/// tick.
#[derive(Debug, Clone)]
pub(crate) struct FrameState {
    pub looping: bool,
    pub redraw_requested: bool,
    pub inside_draw: bool,
    pub finished: bool,
    pub disposed: bool,
    /// 0 while `setup` runs, 1 once the first `draw` has completed.
    pub frame_count: u64,
    pub frame_rate: FrameRateEstimator,
    pub target_frame_rate: f32,
    pub key_repeat: bool,
    pub exit_requested: bool,
    pub back_requested: bool,
    pub width: u32,
    pub height: u32,
    pub surface_sized: bool,
}

impl FrameState {
    pub fn new(config: &SketchConfig) -> Self {
        Self {
            looping: config.start_looping,
            // The first frame after setup is always drawn, looping or not.
            redraw_requested: true,
            inside_draw: false,
            finished: false,
            disposed: false,
            frame_count: 0,
            frame_rate: FrameRateEstimator::new(),
            target_frame_rate: config.target_frame_rate,
            key_repeat: config.key_repeat,
            exit_requested: false,
            back_requested: false,
            width: config.width,
            height: config.height,
            surface_sized: false,
        }
    }

    /// Resumes looping. A stop still waiting on its courtesy frame is
    /// withdrawn, so the later intent wins.
    pub fn request_loop<B: RenderBackend>(&mut self, backend: &mut B) {
        if backend.stop_looping_pending() {
            log::debug!("Pending stop-looping request withdrawn.");
            backend.clear_stop_looping_request();
        }
        if !self.looping {
            log::debug!("Looping requested.");
            self.looping = true;
        }
    }

    /// Stops looping, unless the backend wants a courtesy frame first; in
    /// that case the scheduler clears `looping` after that frame.
    pub fn request_no_loop<B: RenderBackend>(&mut self, backend: &mut B) {
        if !self.looping {
            return;
        }
        if backend.request_stop_looping() {
            log::debug!("Stop looping deferred to a courtesy frame.");
        } else {
            log::debug!("Looping stopped.");
            self.looping = false;
        }
    }

    pub fn request_redraw(&mut self) {
        self.redraw_requested = true;
    }

    pub fn set_target_frame_rate(&mut self, fps: f32) {
        if fps.is_finite() && fps > 0.0 {
            self.target_frame_rate = fps;
        } else {
            log::warn!("Ignoring invalid target frame rate {fps}.");
        }
    }
}
