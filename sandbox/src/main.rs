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


//! A headless demo: a sketch that follows a scripted "user" on another
//! thread, then exits.
//!
//! Pass a JSON config path as the first argument to override the defaults.

use anyhow::Result;
use easel_core::event::raw::{
    PointerSource, RawButtons, RawKeyAction, RawKeyEvent, RawPointer, RawPointerAction,
    RawPointerEvent,
};
use easel_sdk::prelude::*;
use std::thread;
use std::time::Duration;

/// Frames to run before exiting on our own.
const FRAME_LIMIT: u64 = 180;

#[derive(Default)]
struct Trail {
    points: Vec<(f32, f32)>,
    clicks: u32,
}

impl Sketch for Trail {
    type Backend = NullBackend;

    fn setup(&mut self, ctx: &mut SketchContext<'_, NullBackend>) -> Result<()> {
        log::info!("Trail sketch on a {}x{} surface.", ctx.width(), ctx.height());
        Ok(())
    }

    fn draw(&mut self, ctx: &mut SketchContext<'_, NullBackend>) -> Result<()> {
        if ctx.mouse_pressed() {
            self.points.push((ctx.mouse_x(), ctx.mouse_y()));
        }
        if ctx.frame_count() % 60 == 0 {
            log::info!(
                "Frame {} at {:.1} fps, {} points traced.",
                ctx.frame_count(),
                ctx.frame_rate(),
                self.points.len()
            );
        }
        if ctx.frame_count() >= FRAME_LIMIT {
            ctx.exit();
        }
        Ok(())
    }

    fn mouse_clicked(&mut self, _: &mut SketchContext<'_, NullBackend>, event: &MouseEvent) -> Result<()> {
        self.clicks += 1;
        log::info!("Click #{} at ({}, {}).", self.clicks, event.x, event.y);
        Ok(())
    }

    fn key_pressed(&mut self, ctx: &mut SketchContext<'_, NullBackend>, event: &KeyEvent) -> Result<()> {
        if event.key == ' ' {
            self.points.clear();
            log::info!("Trail cleared at frame {}.", ctx.frame_count());
        }
        Ok(())
    }

    fn dispose(&mut self, ctx: &mut SketchContext<'_, NullBackend>) -> Result<()> {
        log::info!(
            "Done after {} ms: {} clicks, {} points left.",
            ctx.millis(),
            self.clicks,
            self.points.len()
        );
        Ok(())
    }
}

fn load_config() -> Result<SketchConfig> {
    let config = match std::env::args().nth(1) {
        Some(path) => SketchConfig::from_path(path)?,
        None => SketchConfig {
            title: "trail".to_string(),
            width: 320,
            height: 240,
            ..SketchConfig::default()
        },
    };
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    easel_sdk::logging::init();

    let config = load_config()?;
    let (width, height) = (config.width, config.height);
    let mut scheduler = Easel::scheduler(Trail::default(), NullBackend::new(width, height), config);
    scheduler
        .registry_mut()
        .register(Hook::Dispose, "sandbox", |_: &HookArgs<'_>| {
            log::debug!("Dispose hook reached.");
            Ok(())
        })?;

    let mut normalizer = scheduler.input_normalizer();
    let user = thread::Builder::new().name("Scripted User".to_string()).spawn(move || {
        let pace = Duration::from_millis(16);
        let at = |action, x: f32, y: f32, t| {
            RawPointerEvent::single(PointerSource::Mouse, action, t, RawPointer::at(0, x, y))
                .with_buttons(RawButtons::PRIMARY)
        };

        thread::sleep(Duration::from_millis(200));
        normalizer.on_raw_pointer_event(&at(RawPointerAction::Down, 20.0, 20.0, 200));
        for step in 1..=40u64 {
            let d = step as f32 * 5.0;
            normalizer.on_raw_pointer_event(&at(RawPointerAction::Move, 20.0 + d, 20.0 + d / 2.0, 200 + step * 16));
            thread::sleep(pace);
        }
        normalizer.on_raw_pointer_event(&at(RawPointerAction::Up, 220.0, 120.0, 900));

        normalizer.on_raw_pointer_event(&at(RawPointerAction::Down, 160.0, 100.0, 1000));
        normalizer.on_raw_pointer_event(&at(RawPointerAction::Up, 161.0, 100.0, 1050));

        normalizer.on_raw_key_event(&RawKeyEvent {
            action: RawKeyAction::Down,
            timestamp: 1100,
            key_code: 32,
            character: Some(' '),
            repeat_count: 0,
            modifiers: Modifiers::NONE,
        });
    })?;

    Easel::run_headless(scheduler)?;
    if user.join().is_err() {
        log::warn!("Scripted user thread panicked.");
    }
    Ok(())
}
