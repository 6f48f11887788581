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

//! Messages exchanged between the host and the scheduler's context.
//!
//! Lifecycle notifications travel into the scheduler as [`HostMessage`]s and
//! are applied at the start of the next tick, on the scheduler's thread.
//! Requests the scheduler makes of the host travel back as [`HostRequest`]s.

use crate::permissions::PermissionResult;

/// A notification from the host to the scheduler.
#[derive(Debug, Clone, PartialEq)]
pub enum HostMessage {
    /// The window gained (`true`) or lost (`false`) focus.
    FocusChanged(bool),
    /// The host is going to the background.
    Pause,
    /// The host came back to the foreground.
    Resume,
    /// The user pressed the platform's back control.
    BackNavigation,
    /// The drawing surface has a new size.
    Resized {
        /// New width.
        width: u32,
        /// New height.
        height: u32,
    },
    /// Answers to a previous [`HostRequest::RequestPermissions`].
    PermissionsResult(Vec<PermissionResult>),
    /// The host wants the sketch torn down.
    Exit,
}

/// A request from the scheduler to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostRequest {
    /// Ask the user for these platform permissions.
    RequestPermissions(Vec<String>),
    /// The sketch has finished; the host should close.
    Finish,
}

/// The host's sending end into a scheduler. Cheap to clone and `Send`.
#[derive(Debug, Clone)]
pub struct HostHandle {
    sender: flume::Sender<HostMessage>,
}

impl HostHandle {
    pub(crate) fn new(sender: flume::Sender<HostMessage>) -> Self {
        Self { sender }
    }

    /// Sends a message. Returns `false` if the scheduler is gone.
    pub fn send(&self, message: HostMessage) -> bool {
        match self.sender.send(message) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Host message dropped, scheduler is gone: {:?}", e.into_inner());
                false
            }
        }
    }

    /// Reports a focus change.
    pub fn focus_changed(&self, focused: bool) -> bool {
        self.send(HostMessage::FocusChanged(focused))
    }

    /// Asks the sketch to pause.
    pub fn pause(&self) -> bool {
        self.send(HostMessage::Pause)
    }

    /// Asks the sketch to resume.
    pub fn resume(&self) -> bool {
        self.send(HostMessage::Resume)
    }

    /// Reports a back-navigation request.
    pub fn back_navigation(&self) -> bool {
        self.send(HostMessage::BackNavigation)
    }

    /// Reports a new surface size.
    pub fn resized(&self, width: u32, height: u32) -> bool {
        self.send(HostMessage::Resized { width, height })
    }

    /// Delivers permission answers.
    pub fn permissions_result(&self, results: Vec<PermissionResult>) -> bool {
        self.send(HostMessage::PermissionsResult(results))
    }

    /// Asks the sketch to tear down.
    pub fn exit(&self) -> bool {
        self.send(HostMessage::Exit)
    }
}
