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

//! The animation thread driving a scheduler in real time.

mod common;

use common::{listen, scheduler, Journal, MockBackend, Recorder};
use easel_core::Hook;
use easel_runtime::{AnimationThread, FrameError, HostRequest};
use std::thread;
use std::time::Duration;

#[test]
fn runs_until_the_sketch_exits_then_disposes() {
    let journal = Journal::default();
    let sketch = Recorder { exit_at: Some(5), ..Recorder::new(&journal) };
    let mut scheduler = scheduler(sketch, MockBackend::new(&journal));
    listen(&mut scheduler, &journal, Hook::Dispose);
    let requests = scheduler.host_requests();

    let driver = AnimationThread::spawn(scheduler).unwrap();
    driver.join().unwrap();

    assert_eq!(journal.count("draw(5)"), 1);
    assert_eq!(journal.count("draw(6)"), 0);
    assert_eq!(journal.count("hook:dispose"), 1);
    assert_eq!(journal.count("backend.dispose"), 1);
    assert_eq!(requests.try_recv(), Ok(HostRequest::Finish));
}

#[test]
fn stop_ends_a_looping_sketch() {
    let journal = Journal::default();
    let driver = AnimationThread::spawn(scheduler(Recorder::new(&journal), MockBackend::new(&journal))).unwrap();

    thread::sleep(Duration::from_millis(50));
    assert!(driver.is_running());
    driver.stop();
    driver.join().unwrap();

    assert!(journal.count("draw(1)") == 1);
    assert_eq!(journal.count("dispose"), 1);
}

#[test]
fn pause_and_resume_call_the_sketch_in_order() {
    let journal = Journal::default();
    let driver = AnimationThread::spawn(scheduler(Recorder::new(&journal), MockBackend::new(&journal))).unwrap();

    thread::sleep(Duration::from_millis(30));
    driver.pause();
    thread::sleep(Duration::from_millis(30));
    driver.resume();
    thread::sleep(Duration::from_millis(30));
    driver.stop();
    driver.join().unwrap();

    let entries = journal.take();
    let pause = entries.iter().position(|e| e == "pause").unwrap();
    let resume = entries.iter().position(|e| e == "resume").unwrap();
    assert!(pause < resume);
    assert!(
        entries[pause + 1..resume].iter().all(|e| !e.starts_with("draw")),
        "no frame runs while paused"
    );
}

#[test]
fn failing_sketch_error_is_returned_from_join() {
    let journal = Journal::default();
    let sketch = Recorder { fail_at: Some(2), ..Recorder::new(&journal) };
    let driver = AnimationThread::spawn(scheduler(sketch, MockBackend::new(&journal))).unwrap();

    let error = driver.join().unwrap_err();
    let frame_error = error.downcast_ref::<FrameError>().unwrap();
    assert!(matches!(frame_error, FrameError::Callback { callback: "draw", .. }));
    assert_eq!(journal.count("dispose"), 1);
}
