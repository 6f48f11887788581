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

//! The contract between the frame scheduler and a rendering backend.

/// The rendering side of a sketch, as seen by the frame scheduler.
///
/// Implementations own every pixel; the scheduler only brackets each frame
/// with [`begin_frame`](Self::begin_frame) / [`end_frame`](Self::end_frame)
/// and queries a few flags that change how the frame is run.
pub trait RenderBackend {
    /// Returns `true` once the drawing surface exists and can be rendered to.
    fn surface_is_ready(&self) -> bool;

    /// Starts a frame.
    fn begin_frame(&mut self);

    /// Finishes a frame and presents it.
    fn end_frame(&mut self);

    /// Returns `true` while the backend is replaying saved state after the
    /// surface was recreated. Frames run empty in the meantime.
    fn is_restoring_state(&self) -> bool {
        false
    }

    /// Asks the backend whether it needs one more frame before looping
    /// stops. Returning `true` defers the stop to that courtesy frame.
    fn request_stop_looping(&mut self) -> bool {
        false
    }

    /// Returns `true` if a courtesy frame was requested and has not run yet.
    fn stop_looping_pending(&self) -> bool {
        false
    }

    /// Clears the pending courtesy-frame request.
    fn clear_stop_looping_request(&mut self) {}

    /// The drawing surface changed size.
    fn resize(&mut self, _width: u32, _height: u32) {}

    /// Releases every resource held by the backend. Called once, after the
    /// last frame.
    fn dispose(&mut self) {}
}

impl<B: RenderBackend + ?Sized> RenderBackend for Box<B> {
    fn surface_is_ready(&self) -> bool {
        (**self).surface_is_ready()
    }

    fn begin_frame(&mut self) {
        (**self).begin_frame();
    }

    fn end_frame(&mut self) {
        (**self).end_frame();
    }

    fn is_restoring_state(&self) -> bool {
        (**self).is_restoring_state()
    }

    fn request_stop_looping(&mut self) -> bool {
        (**self).request_stop_looping()
    }

    fn stop_looping_pending(&self) -> bool {
        (**self).stop_looping_pending()
    }

    fn clear_stop_looping_request(&mut self) {
        (**self).clear_stop_looping_request();
    }

    fn resize(&mut self, width: u32, height: u32) {
        (**self).resize(width, height);
    }

    fn dispose(&mut self) {
        (**self).dispose();
    }
}
