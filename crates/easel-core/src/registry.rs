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

//! Named extension points in the frame cycle.
//!
//! Auxiliary listeners (libraries, overlays, recorders) attach callables to a
//! [`Hook`]; the scheduler invokes every callable of a hook, in registration
//! order, at a fixed point of each frame.

use crate::event::{KeyEvent, MouseEvent, TouchEvent};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;

/// A named extension point.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Hook {
    /// Before `draw`, once per frame.
    Pre,
    /// After `draw` and event dispatch, once per frame.
    Draw,
    /// After the frame has ended.
    Post,
    /// The sketch is being paused.
    Pause,
    /// The sketch is being resumed.
    Resume,
    /// The sketch is being torn down.
    Dispose,
    /// Every mouse event, before its action handler.
    MouseEvent,
    /// Every key event, before its action handler.
    KeyEvent,
    /// Every touch event, before its action handler.
    TouchEvent,
    /// A user-defined hook with no dispatch point of its own.
    Custom(String),
}

impl Hook {
    /// Resolves a hook from its name. Unknown names become [`Hook::Custom`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "pre" => Hook::Pre,
            "draw" => Hook::Draw,
            "post" => Hook::Post,
            "pause" => Hook::Pause,
            "resume" => Hook::Resume,
            "dispose" => Hook::Dispose,
            "mouseEvent" => Hook::MouseEvent,
            "keyEvent" => Hook::KeyEvent,
            "touchEvent" => Hook::TouchEvent,
            other => Hook::Custom(other.to_string()),
        }
    }

    /// The hook's name.
    pub fn name(&self) -> &str {
        match self {
            Hook::Pre => "pre",
            Hook::Draw => "draw",
            Hook::Post => "post",
            Hook::Pause => "pause",
            Hook::Resume => "resume",
            Hook::Dispose => "dispose",
            Hook::MouseEvent => "mouseEvent",
            Hook::KeyEvent => "keyEvent",
            Hook::TouchEvent => "touchEvent",
            Hook::Custom(name) => name,
        }
    }

    /// Returns `true` for hooks the scheduler fires itself.
    pub fn is_reserved(&self) -> bool {
        !matches!(self, Hook::Custom(_))
    }
}

impl From<&str> for Hook {
    fn from(name: &str) -> Self {
        Hook::from_name(name)
    }
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identity of a listener. A listener may attach to a hook at most once.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListenerId(String);

impl ListenerId {
    /// Creates a listener identity.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The identity as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ListenerId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ListenerId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Arguments passed to hook callables.
#[derive(Clone, Copy)]
pub enum HookArgs<'a> {
    /// Zero-argument hooks (`pre`, `draw`, `post`, lifecycle).
    None,
    /// The `mouseEvent` hook.
    Mouse(&'a MouseEvent),
    /// The `keyEvent` hook.
    Key(&'a KeyEvent),
    /// The `touchEvent` hook.
    Touch(&'a TouchEvent),
    /// A typed value for user-defined hooks.
    Custom(&'a (dyn Any + Send + Sync)),
}

impl<'a> HookArgs<'a> {
    /// Downcasts a [`HookArgs::Custom`] argument.
    pub fn downcast<T: Any>(&self) -> Option<&'a T> {
        match *self {
            HookArgs::Custom(value) => value.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Returns `true` for zero-argument invocations.
    pub fn is_empty(&self) -> bool {
        matches!(self, HookArgs::None)
    }
}

impl fmt::Debug for HookArgs<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookArgs::None => write!(f, "None"),
            HookArgs::Mouse(e) => f.debug_tuple("Mouse").field(e).finish(),
            HookArgs::Key(e) => f.debug_tuple("Key").field(e).finish(),
            HookArgs::Touch(e) => f.debug_tuple("Touch").field(e).finish(),
            HookArgs::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

/// Failure raised by a hook callable.
#[derive(Debug, thiserror::Error)]
pub enum HookError {
    /// Stops the current invocation and propagates to the scheduler.
    #[error("fatal: {0:#}")]
    Fatal(anyhow::Error),
    /// Logged; the remaining callables still run.
    #[error("recoverable: {0:#}")]
    Recoverable(anyhow::Error),
}

impl HookError {
    /// Wraps an error as fatal.
    pub fn fatal(error: impl Into<anyhow::Error>) -> Self {
        HookError::Fatal(error.into())
    }

    /// Wraps an error as recoverable.
    pub fn recoverable(error: impl Into<anyhow::Error>) -> Self {
        HookError::Recoverable(error.into())
    }

    /// Returns `true` for [`HookError::Fatal`].
    pub fn is_fatal(&self) -> bool {
        matches!(self, HookError::Fatal(_))
    }
}

/// A fatal hook failure, rethrown to the caller of [`CallbackRegistry::invoke`].
#[derive(Debug, thiserror::Error)]
#[error("listener '{listener}' failed fatally in hook '{hook}': {cause:#}")]
pub struct FatalHookError {
    /// The hook being invoked.
    pub hook: Hook,
    /// The listener whose callable failed.
    pub listener: ListenerId,
    /// What the callable returned.
    pub cause: anyhow::Error,
}

/// Registration errors. These are reported, never fatal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// The listener is already attached to this hook.
    #[error("listener '{listener}' is already registered for hook '{hook}'")]
    AlreadyRegistered {
        /// The hook.
        hook: Hook,
        /// The listener.
        listener: ListenerId,
    },
    /// The listener is not attached to this hook.
    #[error("listener '{listener}' is not registered for hook '{hook}'")]
    NotRegistered {
        /// The hook.
        hook: Hook,
        /// The listener.
        listener: ListenerId,
    },
}

/// A hook callable.
pub type HookFn = Box<dyn FnMut(&HookArgs<'_>) -> Result<(), HookError> + Send>;

struct HookEntry {
    listener: ListenerId,
    callable: HookFn,
}

/// Maps each hook to its ordered list of listeners.
#[derive(Default)]
pub struct CallbackRegistry {
    hooks: HashMap<Hook, Vec<HookEntry>>,
}

impl CallbackRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            hooks: HashMap::new(),
        }
    }

    /// Attaches `callable` to `hook` under `listener`.
    ///
    /// Fails (and logs a warning) if the listener is already attached to
    /// this hook; the existing entry is left untouched.
    pub fn register<F>(
        &mut self,
        hook: impl Into<Hook>,
        listener: impl Into<ListenerId>,
        callable: F,
    ) -> Result<(), RegistryError>
    where
        F: FnMut(&HookArgs<'_>) -> Result<(), HookError> + Send + 'static,
    {
        let hook = hook.into();
        let listener = listener.into();
        let entries = self.hooks.entry(hook.clone()).or_default();

        if entries.iter().any(|e| e.listener == listener) {
            let error = RegistryError::AlreadyRegistered { hook, listener };
            log::warn!("CallbackRegistry: {error}");
            return Err(error);
        }

        log::debug!("CallbackRegistry: '{listener}' attached to '{hook}'.");
        entries.push(HookEntry {
            listener,
            callable: Box::new(callable),
        });
        Ok(())
    }

    /// Detaches the first entry of `listener` from `hook`, keeping the order
    /// of the others.
    pub fn unregister(
        &mut self,
        hook: impl Into<Hook>,
        listener: impl Into<ListenerId>,
    ) -> Result<(), RegistryError> {
        let hook = hook.into();
        let listener = listener.into();

        let position = self
            .hooks
            .get(&hook)
            .and_then(|entries| entries.iter().position(|e| e.listener == listener));

        let Some(index) = position else {
            let error = RegistryError::NotRegistered { hook, listener };
            log::warn!("CallbackRegistry: {error}");
            return Err(error);
        };

        if let Some(entries) = self.hooks.get_mut(&hook) {
            entries.remove(index);
            if entries.is_empty() {
                self.hooks.remove(&hook);
            }
        }
        log::debug!("CallbackRegistry: '{listener}' detached from '{hook}'.");
        Ok(())
    }

    /// Calls every callable attached to `hook`, in registration order.
    ///
    /// A recoverable failure is logged and the next callable runs. A fatal
    /// failure aborts the invocation and is returned.
    pub fn invoke(&mut self, hook: &Hook, args: &HookArgs<'_>) -> Result<(), FatalHookError> {
        let Some(entries) = self.hooks.get_mut(hook) else {
            return Ok(());
        };

        for entry in entries.iter_mut() {
            match (entry.callable)(args) {
                Ok(()) => {}
                Err(HookError::Recoverable(cause)) => {
                    log::warn!(
                        "CallbackRegistry: '{}' failed in '{hook}': {cause:#}",
                        entry.listener
                    );
                }
                Err(HookError::Fatal(cause)) => {
                    log::error!(
                        "CallbackRegistry: '{}' failed fatally in '{hook}': {cause:#}",
                        entry.listener
                    );
                    return Err(FatalHookError {
                        hook: hook.clone(),
                        listener: entry.listener.clone(),
                        cause,
                    });
                }
            }
        }
        Ok(())
    }

    /// Returns `true` if `listener` is attached to `hook`.
    pub fn contains(&self, hook: &Hook, listener: &ListenerId) -> bool {
        self.hooks
            .get(hook)
            .is_some_and(|entries| entries.iter().any(|e| &e.listener == listener))
    }

    /// Listeners attached to `hook`, in invocation order.
    pub fn listeners(&self, hook: &Hook) -> Vec<&ListenerId> {
        self.hooks
            .get(hook)
            .map(|entries| entries.iter().map(|e| &e.listener).collect())
            .unwrap_or_default()
    }

    /// Number of entries attached to `hook`.
    pub fn len(&self, hook: &Hook) -> usize {
        self.hooks.get(hook).map_or(0, Vec::len)
    }

    /// Returns `true` if no hook has any listener.
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

impl fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (hook, entries) in &self.hooks {
            let listeners: Vec<&str> = entries.iter().map(|e| e.listener.as_str()).collect();
            map.entry(&hook.name(), &listeners);
        }
        map.finish()
    }
}
