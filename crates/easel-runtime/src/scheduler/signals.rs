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

use std::sync::atomic::{AtomicBool, Ordering};

/// Scheduler state mirrored for other threads.
///
/// The scheduler is the only writer; the input thread reads the looping flag
/// to decide whether new input needs an out-of-frame drain.
#[derive(Debug)]
pub struct SchedulerSignals {
    looping: AtomicBool,
}

impl SchedulerSignals {
    /// Creates the mirror with an initial looping flag.
    pub fn new(looping: bool) -> Self {
        Self {
            looping: AtomicBool::new(looping),
        }
    }

    /// Last looping flag published by the scheduler.
    pub fn is_looping(&self) -> bool {
        self.looping.load(Ordering::Acquire)
    }

    pub(crate) fn set_looping(&self, looping: bool) {
        self.looping.store(looping, Ordering::Release);
    }
}
