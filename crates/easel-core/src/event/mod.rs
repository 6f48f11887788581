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

//! The event model and the channel that carries it across threads.
//!
//! Raw notifications from a host ([`raw`]) are normalized elsewhere into
//! [`Event`]s, which travel through an [`EventQueue`] from the input context
//! to the scheduler's context. The queue is the only synchronized boundary
//! between the two.

mod model;
mod queue;
pub mod raw;

pub use self::model::{
    Event, EventKind, KeyAction, KeyEvent, Modifiers, MouseAction, MouseButton, MouseEvent,
    Pointer, TouchAction, TouchEvent, CODED,
};
pub use self::queue::{EventProducer, EventQueue, QueueError};
