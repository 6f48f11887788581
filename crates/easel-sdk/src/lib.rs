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


//! The public-facing API for writing and running Easel sketches.
//!
//! Implement [`Sketch`](prelude::Sketch) for your program, then hand it to
//! [`Easel`]: [`Easel::run_headless`] drives it on the animation thread with
//! no window, [`Easel::run_windowed`] opens a `winit` window and drives it
//! from the event loop.

use anyhow::Result;
use easel_core::SketchConfig;
use easel_runtime::{AnimationThread, FrameScheduler, HostRequest, PermissionResult, Sketch};
use std::sync::Arc;
use winit::event_loop::EventLoop;
use winit::window::Window;

mod windowed;

pub use easel_infra::logging;

use windowed::WindowedRunner;

pub mod prelude {
    pub use crate::Easel;
    pub use easel_core::event::CODED;
    pub use easel_core::{
        Event, Hook, HookArgs, HookError, KeyAction, KeyEvent, Modifiers, MouseAction, MouseButton,
        MouseEvent, Pointer, RenderBackend, SketchConfig, TouchAction, TouchEvent,
    };
    pub use easel_infra::NullBackend;
    pub use easel_runtime::{FrameScheduler, HostHandle, Sketch, SketchContext, TickOutcome};
}

/// The public entry point for running sketches.
pub struct Easel;

impl Easel {
    /// Creates a scheduler for `sketch` without starting it.
    ///
    /// Use this to register hooks or grab an input normalizer before
    /// handing the scheduler to [`Easel::run_headless`].
    pub fn scheduler<S: Sketch>(sketch: S, backend: S::Backend, config: SketchConfig) -> FrameScheduler<S> {
        FrameScheduler::new(sketch, backend, config)
    }

    /// Runs `scheduler` on the animation thread until the sketch finishes,
    /// blocking the calling thread.
    ///
    /// The calling thread plays the host: there is nobody to ask, so every
    /// permission request is denied.
    pub fn run_headless<S>(scheduler: FrameScheduler<S>) -> Result<()>
    where
        S: Sketch + Send + 'static,
        S::Backend: Send,
    {
        log::info!("Easel: starting headless sketch '{}'.", scheduler.config().title);
        let requests = scheduler.host_requests();
        let host = scheduler.host_handle();
        let driver = AnimationThread::spawn(scheduler)?;

        // The channel disconnects once the scheduler is dropped with its thread.
        for request in requests.iter() {
            match request {
                HostRequest::RequestPermissions(permissions) => {
                    log::warn!("No host to grant {permissions:?}, denying.");
                    let denied = permissions
                        .into_iter()
                        .map(|p| PermissionResult::new(p, false))
                        .collect();
                    host.permissions_result(denied);
                }
                HostRequest::Finish => {
                    log::info!("Sketch finished.");
                    break;
                }
            }
        }

        driver.join()
    }

    /// Opens a window and runs `sketch` in it until the window closes or the
    /// sketch exits, blocking the calling thread.
    ///
    /// `backend` is called once the window exists and builds the rendering
    /// backend for it. Must be called from the main thread on most platforms.
    pub fn run_windowed<S, F>(sketch: S, config: SketchConfig, backend: F) -> Result<()>
    where
        S: Sketch,
        F: FnOnce(Arc<Window>) -> Result<S::Backend>,
    {
        log::info!("Easel: starting windowed sketch '{}'.", config.title);
        config.validate()?;
        let event_loop = EventLoop::new()?;

        let mut runner = WindowedRunner::new(sketch, config, backend);
        event_loop.run_app(&mut runner)?;

        runner.into_result()
    }
}
