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

//! Errors that stop a sketch.

use easel_core::FatalHookError;

/// A failure raised while running a tick.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// A tick started while the previous frame body was still running.
    #[error("frame body re-entered while a frame was in progress")]
    Reentrant,
    /// A hook listener failed fatally.
    #[error(transparent)]
    Hook(#[from] FatalHookError),
    /// A user callback returned an error.
    #[error("sketch callback '{callback}' failed: {cause:#}")]
    Callback {
        /// The callback that failed.
        callback: &'static str,
        /// What it returned.
        cause: anyhow::Error,
    },
}

impl FrameError {
    /// Returns `true` if the driver must terminate the process rather than
    /// just stop the sketch.
    pub fn terminates_process(&self) -> bool {
        matches!(self, FrameError::Reentrant)
    }
}
