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

//! Foundational types for the Easel sketch runtime.
//!
//! `easel-core` holds everything that has no opinion about threads or hosts:
//! the normalized event model and its queue, the hook registry used to notify
//! auxiliary listeners, frame timing, the rendering backend contract and the
//! sketch configuration. Higher-level crates (`easel-runtime`, `easel-infra`)
//! build the scheduler and platform adapters on top of these.

#![warn(missing_docs)]

pub mod backend;
pub mod config;
pub mod event;
pub mod registry;
pub mod timing;

pub use backend::RenderBackend;
pub use config::{ConfigError, SketchConfig};
pub use event::{
    Event, EventKind, EventProducer, EventQueue, KeyAction, KeyEvent, Modifiers, MouseAction,
    MouseButton, MouseEvent, Pointer, QueueError, TouchAction, TouchEvent, CODED,
};
pub use registry::{CallbackRegistry, FatalHookError, Hook, HookArgs, HookError, ListenerId, RegistryError};
pub use timing::{FrameRateEstimator, Stopwatch};
