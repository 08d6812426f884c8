//! User hooks: scripts that run around a build and rewrite pages.
//!
//! A hook may define `OnStart`, `OnFinish` and `Writer`. Hooks run sorted by
//! their file path; a hook that declares `ForFile` only sees that one page in
//! its `Writer`, but still takes part in the lifecycle events.

pub mod api;
pub mod engine;
pub mod script;
pub mod source;
pub mod types;

use crate::utils::error::Result;

pub use api::HostRoots;
pub use engine::{EngineState, HookEngine};
pub use script::RhaiHook;
pub use source::HookSource;
pub use types::{HookRequest, HookResponse, HookScope, HookedFile};

/// File extension of hook scripts
pub const HOOK_EXTENSION: &str = "rhai";

/// Build-wide events a hook can listen to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookEvent {
    OnStart,
    OnFinish,
}

impl HookEvent {
    /// Name of the script function handling the event
    pub fn name(&self) -> &'static str {
        match self {
            HookEvent::OnStart => "OnStart",
            HookEvent::OnFinish => "OnFinish",
        }
    }
}

/// Called once at the start and once at the end of every build
pub trait LifecycleHook: Send + Sync {
    fn on_start(&self) -> Result<()> {
        Ok(())
    }

    fn on_finish(&self) -> Result<()> {
        Ok(())
    }
}

/// Called once per page with the JSON encoded `HookRequest`.
///
/// Returns the raw JSON response, or `None` when the hook has nothing to say
/// about the page.
pub trait FileHook: Send + Sync {
    fn write(&self, request: &str) -> Result<Option<String>>;
}
