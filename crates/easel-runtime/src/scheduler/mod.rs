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

//! The frame scheduler: the state machine that decides, once per host tick,
//! whether and how a frame runs.

mod dispatch;
mod signals;
mod state;

pub use self::signals::SchedulerSignals;
pub(crate) use self::state::FrameState;

use crate::error::FrameError;
use crate::host::{HostHandle, HostMessage, HostRequest};
use crate::input::{InputNormalizer, InputState};
use crate::permissions::{PermissionRequestBatch, PermissionResult};
use crate::sketch::{Sketch, SketchContext};
use easel_core::{
    CallbackRegistry, EventQueue, Hook, HookArgs, RenderBackend, SketchConfig, Stopwatch,
};
use std::sync::Arc;

/// Where a sketch is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchedulerState {
    /// The surface is missing, or a parent-sized surface has no size yet.
    NotReady,
    /// Ready; the next frame runs `setup`.
    SetupPending,
    /// `draw` runs every tick.
    Looping,
    /// `draw` runs only on `redraw()`.
    PausedNoLoop,
    /// The backend is replaying saved state; frames run empty.
    Restoring,
    /// Terminal.
    Finished,
}

/// Why a tick did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// The surface cannot be drawn to yet.
    NotReady,
    /// Not looping and no redraw requested.
    Idle,
    /// The sketch has finished.
    Finished,
}

/// What a tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TickOutcome {
    /// Nothing ran.
    Skipped(SkipReason),
    /// An empty frame while the backend restores its state.
    Restoring,
    /// The empty frame a backend asked for before looping stops.
    CourtesyFrame,
    /// The frame that ran `setup`.
    Setup,
    /// A regular frame that ran `draw`.
    Frame,
    /// No frame, but queued input was dispatched.
    EventsOnly,
}

/// Drives a [`Sketch`] one tick at a time.
///
/// Owns the sketch, its backend and every piece of frame state. Input enters
/// through the [`EventQueue`] (fed by an [`InputNormalizer`]) and host
/// notifications through a [`HostHandle`]; both are applied on the
/// scheduler's own thread.
pub struct FrameScheduler<S: Sketch> {
    sketch: S,
    backend: S::Backend,
    frame: FrameState,
    input: InputState,
    registry: CallbackRegistry,
    queue: EventQueue,
    permissions: PermissionRequestBatch,
    signals: Arc<SchedulerSignals>,
    inbox: flume::Receiver<HostMessage>,
    host_tx: flume::Sender<HostMessage>,
    requests_tx: flume::Sender<HostRequest>,
    requests_rx: flume::Receiver<HostRequest>,
    clock: Stopwatch,
    config: SketchConfig,
}

impl<S: Sketch> FrameScheduler<S> {
    /// Creates a scheduler. Nothing runs until the first tick.
    pub fn new(sketch: S, backend: S::Backend, config: SketchConfig) -> Self {
        let (host_tx, inbox) = flume::unbounded();
        let (requests_tx, requests_rx) = flume::unbounded();
        let frame = FrameState::new(&config);
        let signals = Arc::new(SchedulerSignals::new(frame.looping));

        log::info!(
            "Frame scheduler created for '{}' ({}x{} @ {} fps).",
            config.title,
            config.width,
            config.height,
            config.target_frame_rate
        );

        Self {
            sketch,
            backend,
            frame,
            input: InputState::default(),
            registry: CallbackRegistry::new(),
            queue: EventQueue::new(),
            permissions: PermissionRequestBatch::new(),
            signals,
            inbox,
            host_tx,
            requests_tx,
            requests_rx,
            clock: Stopwatch::new(),
            config,
        }
    }

    /// A normalizer feeding this scheduler's queue, for the input thread.
    pub fn input_normalizer(&self) -> InputNormalizer {
        InputNormalizer::new(
            self.queue.producer(),
            Arc::clone(&self.signals),
            self.config.click_slop,
        )
    }

    /// A handle for sending lifecycle notifications.
    pub fn host_handle(&self) -> HostHandle {
        HostHandle::new(self.host_tx.clone())
    }

    /// The receiving end of the scheduler's requests to the host.
    pub fn host_requests(&self) -> flume::Receiver<HostRequest> {
        self.requests_rx.clone()
    }

    /// The state mirror shared with other threads.
    pub fn signals(&self) -> Arc<SchedulerSignals> {
        Arc::clone(&self.signals)
    }

    /// The hook registry, for attaching listeners.
    pub fn registry_mut(&mut self) -> &mut CallbackRegistry {
        &mut self.registry
    }

    /// The hook registry.
    pub fn registry(&self) -> &CallbackRegistry {
        &self.registry
    }

    /// The event queue drained by this scheduler.
    pub fn queue(&self) -> &EventQueue {
        &self.queue
    }

    /// The sketch.
    pub fn sketch(&self) -> &S {
        &self.sketch
    }

    /// The sketch, mutably.
    pub fn sketch_mut(&mut self) -> &mut S {
        &mut self.sketch
    }

    /// The rendering backend.
    pub fn backend(&self) -> &S::Backend {
        &self.backend
    }

    /// The rendering backend, mutably.
    pub fn backend_mut(&mut self) -> &mut S::Backend {
        &mut self.backend
    }

    /// Input-derived state as of the last dispatched event.
    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// The configuration the sketch started with.
    pub fn config(&self) -> &SketchConfig {
        &self.config
    }

    /// Number of completed frames.
    pub fn frame_count(&self) -> u64 {
        self.frame.frame_count
    }

    /// Smoothed frames-per-second estimate.
    pub fn frame_rate(&self) -> f32 {
        self.frame.frame_rate.estimate()
    }

    /// Frame rate the driver should aim for.
    pub fn target_frame_rate(&self) -> f32 {
        self.frame.target_frame_rate
    }

    /// `true` if `draw` runs every tick.
    pub fn is_looping(&self) -> bool {
        self.frame.looping
    }

    /// `true` once the sketch has stopped for good.
    pub fn is_finished(&self) -> bool {
        self.frame.finished
    }

    /// `true` once the sketch has been torn down.
    pub fn is_disposed(&self) -> bool {
        self.frame.disposed
    }

    /// Current position in the lifecycle.
    pub fn state(&self) -> SchedulerState {
        if self.frame.finished {
            SchedulerState::Finished
        } else if !self.is_ready() {
            SchedulerState::NotReady
        } else if self.backend.is_restoring_state() {
            SchedulerState::Restoring
        } else if self.frame.frame_count == 0 {
            SchedulerState::SetupPending
        } else if self.frame.looping {
            SchedulerState::Looping
        } else {
            SchedulerState::PausedNoLoop
        }
    }

    /// Resumes looping, as `loop()` would from inside the sketch.
    pub fn loop_(&mut self) {
        self.frame.request_loop(&mut self.backend);
        self.signals.set_looping(self.frame.looping);
    }

    /// Stops looping, as `no_loop()` would from inside the sketch.
    pub fn no_loop(&mut self) {
        self.frame.request_no_loop(&mut self.backend);
        self.signals.set_looping(self.frame.looping);
    }

    /// Requests one more frame while not looping.
    pub fn redraw(&mut self) {
        self.frame.request_redraw();
    }

    /// `true` if a frame was requested with `redraw()` and has not run yet.
    pub fn redraw_pending(&self) -> bool {
        self.frame.redraw_requested
    }

    /// Runs one tick at the current time.
    pub fn on_tick(&mut self) -> Result<TickOutcome, FrameError> {
        let now = self.clock.elapsed_nanos();
        self.on_tick_at(now)
    }

    /// Runs one tick, with `now_nanos` as the frame timestamp.
    ///
    /// Host messages received since the previous tick are applied first.
    /// Any error other than [`FrameError::Reentrant`] finishes the sketch.
    pub fn on_tick_at(&mut self, now_nanos: u64) -> Result<TickOutcome, FrameError> {
        let result = self.pump_host_messages().and_then(|()| {
            if self.frame.exit_requested {
                Ok(TickOutcome::Skipped(SkipReason::Finished))
            } else {
                self.tick(now_nanos)
            }
        });
        self.signals.set_looping(self.frame.looping);

        if let Err(e) = &result {
            if !e.terminates_process() {
                log::error!("Sketch stopped: {e}");
                self.frame.finished = true;
            }
        }
        if self.frame.exit_requested && !self.frame.disposed {
            self.dispose();
        }
        result
    }

    fn tick(&mut self, now: u64) -> Result<TickOutcome, FrameError> {
        if !self.is_ready() {
            return Ok(TickOutcome::Skipped(SkipReason::NotReady));
        }
        if self.frame.finished {
            return Ok(TickOutcome::Skipped(SkipReason::Finished));
        }

        if !self.frame.looping && !self.frame.redraw_requested {
            if self.frame.frame_count > 0 && self.queue.has_pending() {
                log::trace!("Dispatching input outside a frame.");
                self.drain_events()?;
                return Ok(TickOutcome::EventsOnly);
            }
            return Ok(TickOutcome::Skipped(SkipReason::Idle));
        }

        if self.frame.inside_draw {
            log::error!("Frame body re-entered.");
            return Err(FrameError::Reentrant);
        }
        self.frame.inside_draw = true;

        if self.backend.is_restoring_state() {
            self.backend.begin_frame();
            self.backend.end_frame();
            self.frame.inside_draw = false;
            return Ok(TickOutcome::Restoring);
        }

        if self.backend.stop_looping_pending() {
            self.backend.begin_frame();
            self.backend.end_frame();
            self.frame.looping = false;
            self.backend.clear_stop_looping_request();
            self.frame.inside_draw = false;
            log::debug!("Courtesy frame done, looping stopped.");
            return Ok(TickOutcome::CourtesyFrame);
        }

        self.backend.begin_frame();

        let outcome = if self.frame.frame_count == 0 {
            log::info!("Running setup.");
            self.call_sketch("setup", |sketch, ctx| sketch.setup(ctx))?;
            TickOutcome::Setup
        } else {
            self.frame.frame_rate.update(now);
            self.registry.invoke(&Hook::Pre, &HookArgs::None)?;

            self.input.begin_frame();
            self.call_sketch("draw", |sketch, ctx| sketch.draw(ctx))?;
            self.input.end_frame();

            self.drain_events()?;
            self.registry.invoke(&Hook::Draw, &HookArgs::None)?;
            self.flush_permissions();
            self.process_back_navigation()?;
            self.frame.redraw_requested = false;
            TickOutcome::Frame
        };

        self.backend.end_frame();
        self.frame.inside_draw = false;

        if self.frame.frame_count != 0 {
            self.registry.invoke(&Hook::Post, &HookArgs::None)?;
        }

        self.frame.frame_rate.record_baseline(now);
        self.frame.frame_count += 1;
        log::trace!("Frame {} complete.", self.frame.frame_count);
        Ok(outcome)
    }

    fn is_ready(&self) -> bool {
        self.backend.surface_is_ready() && (!self.config.parent_sized || self.frame.surface_sized)
    }

    fn pump_host_messages(&mut self) -> Result<(), FrameError> {
        while let Ok(message) = self.inbox.try_recv() {
            self.handle_host_message(message)?;
        }
        Ok(())
    }

    /// Applies one host notification immediately. Ignored once the sketch
    /// has been disposed.
    pub fn handle_host_message(&mut self, message: HostMessage) -> Result<(), FrameError> {
        if self.frame.disposed {
            log::debug!("Sketch disposed, ignoring host message {message:?}.");
            return Ok(());
        }
        log::debug!("Host message: {message:?}");
        match message {
            HostMessage::FocusChanged(focused) => self.on_focus_changed(focused),
            HostMessage::Pause => self.on_pause_requested(),
            HostMessage::Resume => self.on_resume_requested(),
            HostMessage::BackNavigation => {
                self.on_back_navigation_requested();
                Ok(())
            }
            HostMessage::Resized { width, height } => {
                self.on_surface_resized(width, height);
                Ok(())
            }
            HostMessage::PermissionsResult(results) => self.on_permissions_result(results),
            HostMessage::Exit => {
                self.frame.exit_requested = true;
                Ok(())
            }
        }
    }

    /// The window gained or lost focus.
    pub fn on_focus_changed(&mut self, focused: bool) -> Result<(), FrameError> {
        if self.ignored_after_dispose("focus change") {
            return Ok(());
        }
        self.input.focused = focused;
        if focused {
            self.call_sketch("focus_gained", |sketch, ctx| sketch.focus_gained(ctx))
        } else {
            self.call_sketch("focus_lost", |sketch, ctx| sketch.focus_lost(ctx))
        }
    }

    /// The host is going to the background: the sketch's `pause`, then the
    /// `pause` hook.
    pub fn on_pause_requested(&mut self) -> Result<(), FrameError> {
        if self.ignored_after_dispose("pause") {
            return Ok(());
        }
        log::info!("Sketch paused.");
        self.call_sketch("pause", |sketch, ctx| sketch.pause(ctx))?;
        self.registry.invoke(&Hook::Pause, &HookArgs::None)?;
        Ok(())
    }

    /// The host came back: the `resume` hook, then the sketch's `resume`.
    ///
    /// Looping state is left as it was. A sketch that stopped looping before
    /// the pause stays stopped and no frame is forced.
    pub fn on_resume_requested(&mut self) -> Result<(), FrameError> {
        if self.ignored_after_dispose("resume") {
            return Ok(());
        }
        log::info!("Sketch resumed.");
        self.registry.invoke(&Hook::Resume, &HookArgs::None)?;
        self.call_sketch("resume", |sketch, ctx| sketch.resume(ctx))
    }

    /// Back navigation is handled at the end of the next drawn frame.
    pub fn on_back_navigation_requested(&mut self) {
        self.frame.back_requested = true;
    }

    /// The surface has a new size.
    pub fn on_surface_resized(&mut self, width: u32, height: u32) {
        log::debug!("Surface resized to {width}x{height}.");
        self.frame.width = width;
        self.frame.height = height;
        self.frame.surface_sized = true;
        self.backend.resize(width, height);
    }

    /// Applies the host's answers to a permission request.
    pub fn on_permissions_result(&mut self, results: Vec<PermissionResult>) -> Result<(), FrameError> {
        if self.ignored_after_dispose("permission results") {
            return Ok(());
        }
        for result in results {
            self.permissions.record_result(&result);
            self.call_sketch("permission_result", |sketch, ctx| {
                sketch.permission_result(ctx, &result.permission, result.granted)
            })?;
        }
        Ok(())
    }

    /// Tears the sketch down: the `dispose` hook, the sketch's `dispose`,
    /// then the backend. Runs once; later calls do nothing.
    pub fn dispose(&mut self) {
        if self.frame.disposed {
            return;
        }
        log::info!("Disposing sketch after {} frames.", self.frame.frame_count);
        self.frame.disposed = true;
        self.frame.finished = true;

        if let Err(e) = self.registry.invoke(&Hook::Dispose, &HookArgs::None) {
            log::error!("Dispose hook failed: {e}");
        }
        if let Err(e) = self.call_sketch("dispose", |sketch, ctx| sketch.dispose(ctx)) {
            log::error!("{e}");
        }
        self.backend.dispose();
        self.signals.set_looping(false);
        self.request(HostRequest::Finish);
    }

    fn ignored_after_dispose(&self, what: &str) -> bool {
        if self.frame.disposed {
            log::debug!("Sketch disposed, ignoring {what}.");
        }
        self.frame.disposed
    }

    fn flush_permissions(&mut self) {
        if self.permissions.has_pending() {
            let pending = self.permissions.take_pending();
            log::info!("Requesting permissions: {pending:?}");
            self.request(HostRequest::RequestPermissions(pending));
        }
    }

    fn process_back_navigation(&mut self) -> Result<(), FrameError> {
        if !std::mem::take(&mut self.frame.back_requested) {
            return Ok(());
        }
        let handled = self.call_sketch("back_pressed", |sketch, ctx| sketch.back_pressed(ctx))?;
        if !handled {
            log::info!("Back navigation not handled, exiting.");
            self.frame.exit_requested = true;
        }
        Ok(())
    }

    fn request(&self, request: HostRequest) {
        // The scheduler keeps a receiver itself, so this cannot disconnect.
        if let Err(e) = self.requests_tx.send(request) {
            log::warn!("Host request dropped: {:?}", e.into_inner());
        }
    }

    fn call_sketch<T, F>(&mut self, callback: &'static str, f: F) -> Result<T, FrameError>
    where
        F: FnOnce(&mut S, &mut SketchContext<'_, S::Backend>) -> anyhow::Result<T>,
    {
        let mut ctx = SketchContext::new(
            &mut self.frame,
            &self.input,
            &mut self.backend,
            &mut self.permissions,
            &self.clock,
        );
        f(&mut self.sketch, &mut ctx).map_err(|cause| FrameError::Callback { callback, cause })
    }
}

impl<S: Sketch> std::fmt::Debug for FrameScheduler<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameScheduler")
            .field("state", &self.state())
            .field("frame_count", &self.frame.frame_count)
            .field("looping", &self.frame.looping)
            .field("pending_events", &self.queue.len())
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
