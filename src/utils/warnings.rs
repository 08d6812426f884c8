use std::sync::atomic::{AtomicBool, Ordering};

use log::warn;

/// Legacy behaviours that still work but print a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deprecation {
    /// `{{.Content}}` placeholder inside the layout
    ContentToken,
    /// `_head.html` / `_tail.html` instead of a `_layout.html`
    HeadTail,
    /// `{{.Meta.BaseURL}}` prefix inside Markdown links
    BaseUrlLink,
}

impl Deprecation {
    fn index(self) -> usize {
        match self {
            Deprecation::ContentToken => 0,
            Deprecation::HeadTail => 1,
            Deprecation::BaseUrlLink => 2,
        }
    }

    fn message(self) -> &'static str {
        match self {
            Deprecation::ContentToken => {
                "{{.Content}} in the layout is deprecated, use <slot></slot> or <slot/> instead"
            }
            Deprecation::HeadTail => {
                "_head.html and _tail.html are deprecated, merge them into pages/_layout.html with a <slot/> marker"
            }
            Deprecation::BaseUrlLink => {
                "{{.Meta.BaseURL}} is no longer needed in markdown links, root links like /docs/topic are rewritten automatically"
            }
        }
    }
}

/// Once-per-build deprecation notices.
///
/// Owned by the build context; `reset` is called when a new build starts.
#[derive(Debug, Default)]
pub struct DeprecationWarnings {
    fired: [AtomicBool; 3],
}

impl DeprecationWarnings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Print the notice for `kind` unless it was already printed in this build
    pub fn warn_once(&self, kind: Deprecation) {
        if !self.fired[kind.index()].swap(true, Ordering::SeqCst) {
            warn!("{}", kind.message());
        }
    }

    pub fn has_fired(&self, kind: Deprecation) -> bool {
        self.fired[kind.index()].load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        for flag in &self.fired {
            flag.store(false, Ordering::SeqCst);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warn_once_tracks_each_kind() {
        let warnings = DeprecationWarnings::new();
        assert!(!warnings.has_fired(Deprecation::ContentToken));

        warnings.warn_once(Deprecation::ContentToken);
        warnings.warn_once(Deprecation::ContentToken);

        assert!(warnings.has_fired(Deprecation::ContentToken));
        assert!(!warnings.has_fired(Deprecation::HeadTail));

        warnings.reset();
        assert!(!warnings.has_fired(Deprecation::ContentToken));
    }
}
