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

//! The execution engine behind an Easel sketch.
//!
//! A [`FrameScheduler`] owns the user's [`Sketch`], its rendering backend and
//! all frame state. The host feeds it raw input through an
//! [`InputNormalizer`] (which may live on another thread) and lifecycle
//! notifications through a [`HostHandle`]; a driver such as the
//! [`AnimationThread`] calls [`FrameScheduler::on_tick`] at the target rate.

#![warn(missing_docs)]

pub mod animation;
pub mod error;
pub mod host;
pub mod input;
pub mod permissions;
pub mod scheduler;
pub mod sketch;

pub use animation::AnimationThread;
pub use error::FrameError;
pub use host::{HostHandle, HostMessage, HostRequest};
pub use input::{InputNormalizer, InputState, NormalizeOutcome};
pub use permissions::{PermissionRequestBatch, PermissionResult};
pub use scheduler::{FrameScheduler, SchedulerState, SkipReason, TickOutcome};
pub use sketch::{Sketch, SketchContext};
