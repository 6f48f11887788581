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

//! A backend that draws nothing.

use easel_core::RenderBackend;

/// A headless [`RenderBackend`] that counts frames.
///
/// Useful for running sketches without a window: in tests, on servers, or
/// to drive logic-only sketches. It can emulate a backend that asks for a
/// courtesy frame before looping stops.
#[derive(Debug, Clone, Default)]
pub struct NullBackend {
    frames: u64,
    in_frame: bool,
    courtesy_frame: bool,
    stop_pending: bool,
    size: (u32, u32),
    disposed: bool,
}

impl NullBackend {
    /// Creates a backend with the given surface size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
            ..Self::default()
        }
    }

    /// Makes `no_loop()` wait for one more empty frame.
    pub fn with_courtesy_frame(mut self) -> Self {
        self.courtesy_frame = true;
        self
    }

    /// Number of frames ended so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Current surface size.
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// `true` once [`RenderBackend::dispose`] has run.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl RenderBackend for NullBackend {
    fn surface_is_ready(&self) -> bool {
        !self.disposed
    }

    fn begin_frame(&mut self) {
        if self.in_frame {
            log::warn!("NullBackend: begin_frame called twice without end_frame.");
        }
        self.in_frame = true;
    }

    fn end_frame(&mut self) {
        self.in_frame = false;
        self.frames += 1;
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
        self.size = (width, height);
    }

    fn dispose(&mut self) {
        log::debug!("NullBackend disposed after {} frames.", self.frames);
        self.disposed = true;
    }
}
