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

//! Logger initialization for binaries.

use env_logger::{Builder, Env};

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "info";

/// Installs `env_logger` with [`DEFAULT_FILTER`], honouring `RUST_LOG`.
///
/// Safe to call more than once; later calls are ignored.
pub fn init() {
    init_with_filter(DEFAULT_FILTER);
}

/// Installs `env_logger` with a custom default filter, honouring `RUST_LOG`.
///
/// Returns `false` if a logger was already installed.
pub fn init_with_filter(default_filter: &str) -> bool {
    Builder::from_env(Env::default().default_filter_or(default_filter))
        .filter_module("calloop", log::LevelFilter::Warn)
        .filter_module("sctk", log::LevelFilter::Warn)
        .try_init()
        .is_ok()
}
