use std::path::{Path, PathBuf};

use log::debug;

use super::context::BuildContext;
use super::output::{copy_destination, destination_path, override_destination};
use crate::hooks::HookEngine;
use crate::layout::LayoutRenderer;
use crate::server::livereload::inject_livereload_script;
use crate::transformers::SourceFile;
use crate::utils::error::Result;
use crate::utils::fs::{copy_file, write_file_atomic};
use crate::utils::path::get_extension;

/// What happened to one file under `pages/`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// Went through transformers, hooks and the layout
    Rendered(PathBuf),
    /// No transformer chain for its extension, copied as-is
    Copied(PathBuf),
}

/// Renders single pages against one loaded hook set and layout
pub struct PageRenderer<'a> {
    ctx: &'a BuildContext,
    hooks: &'a HookEngine,
    layout: &'a LayoutRenderer,
}

impl<'a> PageRenderer<'a> {
    pub fn new(ctx: &'a BuildContext, hooks: &'a HookEngine, layout: &'a LayoutRenderer) -> Self {
        PageRenderer { ctx, hooks, layout }
    }

    pub fn render(&self, source: &Path) -> Result<PageOutcome> {
        let pages_dir = self.ctx.config.pages_dir();
        let out_dir = &self.ctx.config.destination;

        // Checked before reading so binary files never go through a string
        if !self.ctx.registry.handles(&get_extension(source)) {
            return self.copy_verbatim(source, &pages_dir);
        }

        let file = SourceFile::read(source, &pages_dir)?;
        let transformed = match self.ctx.registry.run(&file)? {
            Some(transformed) => transformed,
            None => return self.copy_verbatim(source, &pages_dir),
        };

        let dest = destination_path(source, &pages_dir, out_dir);
        let hooked = self.hooks.process_file(transformed, &dest)?;
        let dest = match &hooked.name {
            Some(name) => override_destination(out_dir, name),
            None => dest,
        };

        let mut html = self.layout.render(&hooked)?;
        if self.ctx.config.inject_livereload() {
            html = inject_livereload_script(&html);
        }

        write_file_atomic(&dest, html.as_bytes())?;
        debug!("Rendered {} -> {}", source.display(), dest.display());
        Ok(PageOutcome::Rendered(dest))
    }

    fn copy_verbatim(&self, source: &Path, pages_dir: &Path) -> Result<PageOutcome> {
        let dest = copy_destination(source, pages_dir, &self.ctx.config.destination);
        copy_file(source, &dest)?;
        debug!("Copied {} -> {}", source.display(), dest.display());
        Ok(PageOutcome::Copied(dest))
    }
}
