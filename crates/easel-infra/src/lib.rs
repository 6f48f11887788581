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

//! Concrete adapters between Easel and the outside world.
//!
//! The runtime only knows raw pointer and key notifications, the
//! [`RenderBackend`](easel_core::RenderBackend) contract and the `log`
//! facade. This crate fills those in: `winit` input translation, a headless
//! backend and logger initialization.

#![warn(missing_docs)]

pub mod backend;
pub mod logging;
#[cfg(feature = "platform")]
pub mod platform;

pub use backend::NullBackend;
#[cfg(feature = "platform")]
pub use platform::input::{TranslatedInput, WinitInputTranslator};
