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

//! Platform permissions requested by a sketch.

use std::collections::HashSet;

/// The host's answer for one permission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionResult {
    /// The permission identifier, e.g. `"android.permission.CAMERA"`.
    pub permission: String,
    /// Whether the user granted it.
    pub granted: bool,
}

impl PermissionResult {
    /// Creates a result.
    pub fn new(permission: impl Into<String>, granted: bool) -> Self {
        Self {
            permission: permission.into(),
            granted,
        }
    }
}

/// Permissions requested during a frame, flushed to the host once at the
/// end of that frame, plus the set already granted.
#[derive(Debug, Default)]
pub struct PermissionRequestBatch {
    pending: Vec<String>,
    granted: HashSet<String>,
}

impl PermissionRequestBatch {
    /// Creates an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a request. Already-granted or already-queued permissions are
    /// ignored; returns `true` if the request was queued.
    pub fn request(&mut self, permission: &str) -> bool {
        if self.granted.contains(permission) || self.pending.iter().any(|p| p == permission) {
            return false;
        }
        self.pending.push(permission.to_string());
        true
    }

    /// Returns `true` if the host has granted `permission`.
    pub fn has_permission(&self, permission: &str) -> bool {
        self.granted.contains(permission)
    }

    /// Returns `true` if requests are waiting to be flushed.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Takes every queued request, leaving the batch empty.
    pub fn take_pending(&mut self) -> Vec<String> {
        std::mem::take(&mut self.pending)
    }

    /// Applies a host answer to the granted set.
    pub fn record_result(&mut self, result: &PermissionResult) {
        if result.granted {
            self.granted.insert(result.permission.clone());
        } else {
            self.granted.remove(&result.permission);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAMERA: &str = "android.permission.CAMERA";

    #[test]
    fn duplicate_requests_are_queued_once() {
        let mut batch = PermissionRequestBatch::new();
        assert!(batch.request(CAMERA));
        assert!(!batch.request(CAMERA));
        assert_eq!(batch.take_pending(), vec![CAMERA.to_string()]);
        assert!(!batch.has_pending());
    }

    #[test]
    fn granted_permissions_are_not_requested_again() {
        let mut batch = PermissionRequestBatch::new();
        batch.record_result(&PermissionResult::new(CAMERA, true));
        assert!(batch.has_permission(CAMERA));
        assert!(!batch.request(CAMERA));
    }

    #[test]
    fn denial_revokes_a_previous_grant() {
        let mut batch = PermissionRequestBatch::new();
        batch.record_result(&PermissionResult::new(CAMERA, true));
        batch.record_result(&PermissionResult::new(CAMERA, false));
        assert!(!batch.has_permission(CAMERA));
    }
}
