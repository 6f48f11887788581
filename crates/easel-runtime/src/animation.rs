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

//! The dedicated thread that ticks a scheduler at its target frame rate.

use crate::error::FrameError;
use crate::scheduler::FrameScheduler;
use crate::sketch::Sketch;
use anyhow::anyhow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Consecutive frames without a sleep before the thread yields.
const NO_DELAYS_PER_YIELD: u32 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DriverCommand {
    Pause,
    Resume,
    Stop,
}

/// Owns a [`FrameScheduler`] on its own thread and ticks it.
///
/// The thread stops when the sketch finishes, when [`stop`](Self::stop) is
/// called, or when a tick fails. A re-entered frame body aborts the process.
/// The sketch is disposed before the thread exits.
#[derive(Debug)]
pub struct AnimationThread {
    commands: flume::Sender<DriverCommand>,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<Result<(), FrameError>>>,
}

impl AnimationThread {
    /// Moves `scheduler` onto a new thread named "Animation Thread" and
    /// starts ticking.
    pub fn spawn<S>(scheduler: FrameScheduler<S>) -> std::io::Result<Self>
    where
        S: Sketch + Send + 'static,
        S::Backend: Send,
    {
        let (commands, command_rx) = flume::unbounded();
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);

        let handle = thread::Builder::new()
            .name("Animation Thread".to_string())
            .spawn(move || {
                let result = run(scheduler, &command_rx);
                flag.store(false, Ordering::SeqCst);
                result
            })?;

        Ok(Self {
            commands,
            running,
            handle: Some(handle),
        })
    }

    /// Calls the sketch's `pause` and suspends ticking.
    pub fn pause(&self) {
        self.send(DriverCommand::Pause);
    }

    /// Calls the sketch's `resume` and resumes ticking.
    pub fn resume(&self) {
        self.send(DriverCommand::Resume);
    }

    /// Asks the thread to dispose the sketch and exit.
    pub fn stop(&self) {
        self.send(DriverCommand::Stop);
    }

    /// `true` until the thread has exited.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Waits for the thread to exit and returns how the sketch ended.
    pub fn join(mut self) -> anyhow::Result<()> {
        self.join_inner()
    }

    fn join_inner(&mut self) -> anyhow::Result<()> {
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };
        match handle.join() {
            Ok(result) => result.map_err(anyhow::Error::from),
            Err(_) => Err(anyhow!("animation thread panicked")),
        }
    }

    fn send(&self, command: DriverCommand) {
        if self.commands.send(command).is_err() {
            log::warn!("Animation thread already stopped, {command:?} ignored.");
        }
    }
}

impl Drop for AnimationThread {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.stop();
            if let Err(e) = self.join_inner() {
                log::error!("Animation thread ended with an error: {e:#}");
            }
        }
    }
}

enum Control {
    Continue,
    Stop,
}

fn run<S: Sketch>(
    mut scheduler: FrameScheduler<S>,
    commands: &flume::Receiver<DriverCommand>,
) -> Result<(), FrameError> {
    log::info!("Animation thread started.");
    let mut pacer = FramePacer::new();

    let result = loop {
        match handle_commands(&mut scheduler, commands, &mut pacer) {
            Ok(Control::Continue) => {}
            Ok(Control::Stop) => break Ok(()),
            Err(e) => break Err(e),
        }

        match scheduler.on_tick() {
            Ok(_) => {}
            Err(e) if e.terminates_process() => {
                log::error!("{e}; aborting.");
                std::process::abort();
            }
            Err(e) => break Err(e),
        }

        if scheduler.is_finished() {
            break Ok(());
        }
        pacer.wait(scheduler.target_frame_rate());
    };

    scheduler.dispose();
    log::info!("Animation thread stopped after {} frames.", scheduler.frame_count());
    result
}

fn handle_commands<S: Sketch>(
    scheduler: &mut FrameScheduler<S>,
    commands: &flume::Receiver<DriverCommand>,
    pacer: &mut FramePacer,
) -> Result<Control, FrameError> {
    while let Ok(command) = commands.try_recv() {
        match command {
            DriverCommand::Pause => {
                scheduler.on_pause_requested()?;
                loop {
                    match commands.recv() {
                        Ok(DriverCommand::Resume) => break,
                        Ok(DriverCommand::Pause) => {}
                        Ok(DriverCommand::Stop) | Err(_) => return Ok(Control::Stop),
                    }
                }
                scheduler.on_resume_requested()?;
                pacer.reset();
            }
            DriverCommand::Resume => {}
            DriverCommand::Stop => return Ok(Control::Stop),
        }
    }
    Ok(Control::Continue)
}

/// Sleeps between ticks so frames start one period apart.
///
/// Time overslept in one frame is taken off the next sleep. When frames run
/// late several times in a row the thread yields instead of sleeping.
#[derive(Debug)]
struct FramePacer {
    before: Instant,
    over_sleep: Duration,
    no_delays: u32,
}

impl FramePacer {
    fn new() -> Self {
        Self {
            before: Instant::now(),
            over_sleep: Duration::ZERO,
            no_delays: 0,
        }
    }

    fn reset(&mut self) {
        self.before = Instant::now();
        self.over_sleep = Duration::ZERO;
        self.no_delays = 0;
    }

    /// How long to sleep after a frame that took `elapsed`, at `fps`.
    fn sleep_time(&self, fps: f32, elapsed: Duration) -> Option<Duration> {
        let period = Duration::from_secs_f64(1.0 / f64::from(fps.max(f32::EPSILON)));
        period
            .checked_sub(elapsed)
            .and_then(|remaining| remaining.checked_sub(self.over_sleep))
            .filter(|sleep| !sleep.is_zero())
    }

    fn wait(&mut self, fps: f32) {
        let after = Instant::now();
        match self.sleep_time(fps, after - self.before) {
            Some(sleep) => {
                thread::sleep(sleep);
                self.over_sleep = after.elapsed().saturating_sub(sleep);
                self.no_delays = 0;
            }
            None => {
                self.over_sleep = Duration::ZERO;
                self.no_delays += 1;
                if self.no_delays > NO_DELAYS_PER_YIELD {
                    thread::yield_now();
                    self.no_delays = 0;
                }
            }
        }
        self.before = Instant::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pacer_sleeps_for_the_rest_of_the_period() {
        let pacer = FramePacer::new();
        let sleep = pacer.sleep_time(50.0, Duration::from_millis(5)).unwrap();
        assert!(sleep >= Duration::from_millis(14) && sleep <= Duration::from_millis(15));
    }

    #[test]
    fn pacer_subtracts_the_previous_oversleep() {
        let mut pacer = FramePacer::new();
        pacer.over_sleep = Duration::from_millis(4);
        let sleep = pacer.sleep_time(50.0, Duration::from_millis(5)).unwrap();
        assert!(sleep <= Duration::from_millis(11));
    }

    #[test]
    fn late_frames_do_not_sleep() {
        let pacer = FramePacer::new();
        assert!(pacer.sleep_time(60.0, Duration::from_millis(40)).is_none());
    }

    #[test]
    fn pacer_yields_after_a_run_of_late_frames() {
        let mut pacer = FramePacer::new();
        for _ in 0..NO_DELAYS_PER_YIELD {
            pacer.before = Instant::now() - Duration::from_millis(100);
            pacer.wait(60.0);
        }
        assert_eq!(pacer.no_delays, NO_DELAYS_PER_YIELD);
        pacer.before = Instant::now() - Duration::from_millis(100);
        pacer.wait(60.0);
        assert_eq!(pacer.no_delays, 0);
    }
}
