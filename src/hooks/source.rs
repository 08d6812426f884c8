use std::fmt;
use std::path::{Path, PathBuf};

use super::{FileHook, HookEvent, HookScope, LifecycleHook};
use crate::utils::error::Result;

/// Anything that can stand behind a hook file
pub trait HookRuntime: LifecycleHook + FileHook {}

impl<T: LifecycleHook + FileHook> HookRuntime for T {}

/// A loaded hook with its running context.
///
/// The path is the only ordering key between hooks.
pub struct HookSource {
    path: PathBuf,
    scope: HookScope,
    runtime: Box<dyn HookRuntime>,
}

impl HookSource {
    pub fn new(path: impl Into<PathBuf>, scope: HookScope, runtime: impl HookRuntime + 'static) -> Self {
        HookSource {
            path: path.into(),
            scope,
            runtime: Box::new(runtime),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn scope(&self) -> &HookScope {
        &self.scope
    }

    pub fn run_event(&self, event: HookEvent) -> Result<()> {
        match event {
            HookEvent::OnStart => self.runtime.on_start(),
            HookEvent::OnFinish => self.runtime.on_finish(),
        }
    }

    pub fn write(&self, request: &str) -> Result<Option<String>> {
        self.runtime.write(request)
    }
}

impl fmt::Debug for HookSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookSource")
            .field("path", &self.path)
            .field("scope", &self.scope)
            .finish()
    }
}
