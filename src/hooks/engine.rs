use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use log::{debug, error, info};
use walkdir::WalkDir;

use super::api::HostRoots;
use super::script::RhaiHook;
use super::{HookEvent, HookRequest, HookResponse, HookSource, HookedFile, HOOK_EXTENSION};
use crate::transformers::TransformedFile;
use crate::utils::error::{AlvuError, Result};

/// Where a `HookEngine` is in its build lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Unloaded,
    Loaded,
    Started,
    Finished,
    Closed,
}

/// Loads the hooks of a site and runs them for one build.
///
/// `load` → `start` → `process_file`* → `finish` → `close`. Every hook
/// context lives from `load` until `close`; none is recreated per page.
pub struct HookEngine {
    hooks_dir: PathBuf,
    roots: HostRoots,
    hooks: Vec<HookSource>,
    state: EngineState,
    /// Held for the whole hook pass of one page
    pass_lock: Mutex<()>,
}

impl HookEngine {
    pub fn new(hooks_dir: impl Into<PathBuf>, roots: HostRoots) -> Self {
        HookEngine {
            hooks_dir: hooks_dir.into(),
            roots,
            hooks: Vec::new(),
            state: EngineState::Unloaded,
            pass_lock: Mutex::new(()),
        }
    }

    /// An engine that runs the given hooks instead of scripts from disk
    pub fn with_hooks(mut hooks: Vec<HookSource>) -> Self {
        hooks.sort_by(by_path_text);
        HookEngine {
            hooks_dir: PathBuf::new(),
            roots: HostRoots::default(),
            hooks,
            state: EngineState::Loaded,
            pass_lock: Mutex::new(()),
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn hooks(&self) -> &[HookSource] {
        &self.hooks
    }

    /// Load every `.rhai` file below the hooks directory.
    ///
    /// A missing hooks directory means no hooks.
    pub fn load(&mut self) -> Result<()> {
        self.expect_state(EngineState::Unloaded, "load")?;

        if self.hooks_dir.is_dir() {
            for entry in WalkDir::new(&self.hooks_dir).sort_by_file_name() {
                let entry = entry?;
                let is_hook = entry.file_type().is_file()
                    && entry.path().extension().map_or(false, |ext| ext == HOOK_EXTENSION);
                if is_hook {
                    self.hooks.push(RhaiHook::load_source(entry.path(), &self.roots)?);
                }
            }
        } else {
            debug!("No hooks directory at {}", self.hooks_dir.display());
        }

        self.hooks.sort_by(by_path_text);
        if !self.hooks.is_empty() {
            info!("Loaded {} hook(s) from {}", self.hooks.len(), self.hooks_dir.display());
        }

        self.state = EngineState::Loaded;
        Ok(())
    }

    /// Run `OnStart` on every hook
    pub fn start(&mut self) -> Result<()> {
        self.expect_state(EngineState::Loaded, "start")?;
        self.run_lifecycle(HookEvent::OnStart)?;
        self.state = EngineState::Started;
        Ok(())
    }

    /// Run `OnFinish` on every hook
    pub fn finish(&mut self) -> Result<()> {
        self.expect_state(EngineState::Started, "finish")?;
        self.run_lifecycle(HookEvent::OnFinish)?;
        self.state = EngineState::Finished;
        Ok(())
    }

    /// Drop every hook context
    pub fn close(&mut self) {
        self.hooks.clear();
        self.state = EngineState::Closed;
    }

    /// Run `event` on all hooks, scoped ones included, in path order
    pub fn run_lifecycle(&self, event: HookEvent) -> Result<()> {
        for hook in &self.hooks {
            debug!("Running {} of {}", event.name(), hook.path().display());
            hook.run_event(event)?;
        }
        Ok(())
    }

    /// Hooks whose `Writer` applies to the page `name`, in path order
    pub fn applicable<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a HookSource> + 'a {
        self.hooks.iter().filter(move |hook| hook.scope().applies_to(name))
    }

    /// Run every applicable `Writer` over one page.
    ///
    /// Each hook gets the same request; responses are folded into the
    /// returned `HookedFile` in order. A response that is not a valid
    /// `HookResponse` is logged and skipped. Script errors are returned.
    pub fn process_file(&self, file: TransformedFile, dest_path: &Path) -> Result<HookedFile> {
        self.expect_state(EngineState::Started, "process files")?;
        let _pass = self.pass_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let request = serde_json::to_string(&HookRequest::new(&file, dest_path))
            .map_err(|e| AlvuError::transform(&file.source_path, e))?;

        let name = file.name.clone();
        let mut hooked = HookedFile::new(file);
        for hook in self.applicable(&name) {
            let raw = match hook.write(&request)? {
                Some(raw) => raw,
                None => continue,
            };

            match HookResponse::parse(&raw) {
                Ok(response) => hooked.apply(response),
                Err(e) => error!(
                    "Invalid return value from hook {} for {}: {}",
                    hook.path().display(),
                    name,
                    e
                ),
            }
        }

        Ok(hooked)
    }

    fn expect_state(&self, expected: EngineState, action: &str) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(AlvuError::hook(
                &self.hooks_dir,
                format!("cannot {} while hooks are {:?}", action, self.state),
            ))
        }
    }
}

/// Order hooks by the text of their paths, byte by byte, so `a.rhai`
/// comes before `a/z.rhai`
fn by_path_text(a: &HookSource, b: &HookSource) -> Ordering {
    a.path().as_os_str().cmp(b.path().as_os_str())
}
