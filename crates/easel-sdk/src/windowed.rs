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


//! Runs a sketch inside a `winit` window, on the event loop's thread.

use anyhow::Result;
use easel_core::SketchConfig;
use easel_infra::{TranslatedInput, WinitInputTranslator};
use easel_runtime::{FrameScheduler, HostRequest, InputNormalizer, PermissionResult, Sketch};
use std::sync::Arc;
use std::time::{Duration, Instant};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::window::{Window, WindowId};

/// Everything that only exists once the window does.
struct Live<S: Sketch> {
    window: Arc<Window>,
    scheduler: FrameScheduler<S>,
    normalizer: InputNormalizer,
    requests: flume::Receiver<HostRequest>,
    next_frame: Instant,
    paused: bool,
}

/// The event loop state. The sketch and the backend factory are consumed
/// the first time the application is resumed.
pub(crate) struct WindowedRunner<S: Sketch, F> {
    pending: Option<(S, F)>,
    config: SketchConfig,
    translator: WinitInputTranslator,
    live: Option<Live<S>>,
    error: Option<anyhow::Error>,
}

impl<S, F> WindowedRunner<S, F>
where
    S: Sketch,
    F: FnOnce(Arc<Window>) -> Result<S::Backend>,
{
    pub(crate) fn new(sketch: S, config: SketchConfig, backend: F) -> Self {
        Self {
            pending: Some((sketch, backend)),
            config,
            translator: WinitInputTranslator::new(),
            live: None,
            error: None,
        }
    }

    /// How the run ended, once the event loop has returned.
    pub(crate) fn into_result(mut self) -> Result<()> {
        if let Some(live) = self.live.as_mut() {
            live.scheduler.dispose();
        }
        match self.error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let Some((sketch, factory)) = self.pending.take() else {
            return Ok(());
        };

        let attributes = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(self.config.width as f64, self.config.height as f64));
        let window = Arc::new(event_loop.create_window(attributes)?);
        let backend = factory(Arc::clone(&window))?;

        let mut scheduler = FrameScheduler::new(sketch, backend, self.config.clone());
        let size = window.inner_size();
        scheduler.on_surface_resized(size.width, size.height);

        self.live = Some(Live {
            normalizer: scheduler.input_normalizer(),
            requests: scheduler.host_requests(),
            window,
            scheduler,
            next_frame: Instant::now(),
            paused: false,
        });
        log::info!("Window created, sketch ready.");
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("Sketch stopped: {error:#}");
        self.error.get_or_insert(error);
        event_loop.exit();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(live) = self.live.as_mut() else {
            return;
        };
        if let Err(e) = live.scheduler.on_tick() {
            self.fail(event_loop, e.into());
            return;
        }
        self.answer_requests(event_loop);
    }

    /// Desktop platforms have no runtime permission model: everything asked
    /// for is granted.
    fn answer_requests(&mut self, event_loop: &ActiveEventLoop) {
        let Some(live) = self.live.as_mut() else {
            return;
        };
        let requests: Vec<HostRequest> = live.requests.try_iter().collect();
        for request in requests {
            match request {
                HostRequest::RequestPermissions(permissions) => {
                    let granted = permissions
                        .into_iter()
                        .map(|p| PermissionResult::new(p, true))
                        .collect();
                    if let Err(e) = live.scheduler.on_permissions_result(granted) {
                        self.fail(event_loop, e.into());
                        return;
                    }
                }
                HostRequest::Finish => {
                    log::info!("Sketch finished, closing window.");
                    event_loop.exit();
                }
            }
        }
    }

    fn input(&mut self, event_loop: &ActiveEventLoop, event: &WindowEvent) {
        let Some(translated) = self.translator.translate(event) else {
            return;
        };
        let Some(live) = self.live.as_mut() else {
            return;
        };
        let outcome = match translated {
            TranslatedInput::Pointer(raw) => live.normalizer.on_raw_pointer_event(&raw),
            TranslatedInput::Key(raw) => live.normalizer.on_raw_key_event(&raw),
            TranslatedInput::BackNavigation => {
                live.scheduler.on_back_navigation_requested();
                live.window.request_redraw();
                return;
            }
            TranslatedInput::Focus(focused) => {
                if let Err(e) = live.scheduler.on_focus_changed(focused) {
                    self.fail(event_loop, e.into());
                }
                return;
            }
        };
        if outcome.drain_requested {
            live.window.request_redraw();
        }
    }
}

impl<S, F> ApplicationHandler for WindowedRunner<S, F>
where
    S: Sketch,
    F: FnOnce(Arc<Window>) -> Result<S::Backend>,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(live) = self.live.as_mut() {
            if std::mem::take(&mut live.paused) {
                if let Err(e) = live.scheduler.on_resume_requested() {
                    self.fail(event_loop, e.into());
                }
            }
            return;
        }
        if let Err(e) = self.start(event_loop) {
            self.fail(event_loop, e.context("failed to open the sketch window"));
        }
    }

    fn suspended(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(live) = self.live.as_mut() {
            live.paused = true;
            if let Err(e) = live.scheduler.on_pause_requested() {
                self.fail(event_loop, e.into());
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        match self.live.as_ref() {
            Some(live) if live.window.id() == id => {}
            _ => return,
        }

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting event loop...");
                if let Some(live) = self.live.as_mut() {
                    live.scheduler.dispose();
                }
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(live) = self.live.as_mut() {
                    live.scheduler.on_surface_resized(size.width, size.height);
                    live.window.request_redraw();
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            other => self.input(event_loop, &other),
        }
    }

    /// Paces redraws at the sketch's target frame rate while it loops, and
    /// sleeps until the next input otherwise.
    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(live) = self.live.as_mut() else {
            return;
        };
        if live.paused || live.scheduler.is_finished() {
            event_loop.set_control_flow(ControlFlow::Wait);
            return;
        }
        let idle = !live.scheduler.is_looping() && !live.scheduler.redraw_pending();
        if idle && live.scheduler.frame_count() > 0 {
            event_loop.set_control_flow(ControlFlow::Wait);
            return;
        }

        let Some(period) = frame_period(live.scheduler.target_frame_rate()) else {
            log::debug!("Frame period out of range, waiting for input.");
            event_loop.set_control_flow(ControlFlow::Wait);
            return;
        };
        let now = Instant::now();
        if now >= live.next_frame {
            live.window.request_redraw();
            // Skip missed frames rather than bursting to catch up.
            live.next_frame = (live.next_frame + period).max(now);
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(live.next_frame));
    }
}

/// Time between frames at `fps`, or `None` when it cannot be represented.
fn frame_period(fps: f32) -> Option<Duration> {
    Duration::try_from_secs_f32(1.0 / fps).ok()
}
