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


//! Running sketches headless on the animation thread.

use anyhow::{bail, Result};
use easel_sdk::prelude::*;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Outcome {
    frames: u64,
    permission: Option<(String, bool)>,
    disposed: bool,
}

struct Asker {
    outcome: Arc<Mutex<Outcome>>,
}

impl Sketch for Asker {
    type Backend = NullBackend;

    fn setup(&mut self, ctx: &mut SketchContext<'_, NullBackend>) -> Result<()> {
        ctx.request_permission("android.permission.CAMERA");
        Ok(())
    }

    fn draw(&mut self, ctx: &mut SketchContext<'_, NullBackend>) -> Result<()> {
        self.outcome.lock().unwrap().frames = ctx.frame_count();
        Ok(())
    }

    fn permission_result(
        &mut self,
        ctx: &mut SketchContext<'_, NullBackend>,
        permission: &str,
        granted: bool,
    ) -> Result<()> {
        self.outcome.lock().unwrap().permission = Some((permission.to_string(), granted));
        ctx.exit();
        Ok(())
    }

    fn dispose(&mut self, _: &mut SketchContext<'_, NullBackend>) -> Result<()> {
        self.outcome.lock().unwrap().disposed = true;
        Ok(())
    }
}

fn fast_config() -> SketchConfig {
    SketchConfig {
        target_frame_rate: 240.0,
        ..SketchConfig::default()
    }
}

#[test]
fn permissions_are_denied_without_a_host() {
    let outcome = Arc::new(Mutex::new(Outcome::default()));
    let scheduler = Easel::scheduler(
        Asker { outcome: Arc::clone(&outcome) },
        NullBackend::new(100, 100),
        fast_config(),
    );

    Easel::run_headless(scheduler).unwrap();

    let outcome = outcome.lock().unwrap();
    assert_eq!(outcome.permission, Some(("android.permission.CAMERA".to_string(), false)));
    assert!(outcome.frames >= 1);
    assert!(outcome.disposed);
}

struct Exploder;

impl Sketch for Exploder {
    type Backend = NullBackend;

    fn draw(&mut self, ctx: &mut SketchContext<'_, NullBackend>) -> Result<()> {
        if ctx.frame_count() == 3 {
            bail!("out of paint");
        }
        Ok(())
    }
}

#[test]
fn sketch_errors_are_returned() {
    let scheduler = Easel::scheduler(Exploder, NullBackend::new(10, 10), fast_config());
    let err = Easel::run_headless(scheduler).unwrap_err();
    assert!(format!("{err:#}").contains("out of paint"));
}

#[test]
fn input_from_another_thread_reaches_the_sketch() {
    use easel_core::event::raw::{
        PointerSource, RawButtons, RawPointer, RawPointerAction, RawPointerEvent,
    };

    struct Waiter;

    impl Sketch for Waiter {
        type Backend = NullBackend;

        fn mouse_clicked(&mut self, ctx: &mut SketchContext<'_, NullBackend>, event: &MouseEvent) -> Result<()> {
            assert_eq!((event.x, event.y), (4.0, 2.0));
            ctx.exit();
            Ok(())
        }
    }

    let scheduler = Easel::scheduler(Waiter, NullBackend::new(10, 10), fast_config());
    let mut normalizer = scheduler.input_normalizer();
    let input = std::thread::spawn(move || {
        let contact = RawPointer::at(0, 4.0, 2.0);
        for action in [RawPointerAction::Down, RawPointerAction::Up] {
            normalizer.on_raw_pointer_event(
                &RawPointerEvent::single(PointerSource::Mouse, action, 0, contact).with_buttons(RawButtons::PRIMARY),
            );
        }
    });

    Easel::run_headless(scheduler).unwrap();
    input.join().unwrap();
}
