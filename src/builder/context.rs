use std::io;
use std::sync::Arc;

use log::debug;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::config::Config;
use crate::transformers::{MarkdownOptions, TransformerRegistry};
use crate::utils::error::{AlvuError, Result};
use crate::utils::warnings::DeprecationWarnings;

/// Everything a build needs, owned by whoever starts builds.
///
/// The dev server keeps one context alive across rebuilds; deprecation
/// notices are reset at the start of each build.
pub struct BuildContext {
    pub config: Config,
    pub registry: Arc<TransformerRegistry>,
    pub warnings: Arc<DeprecationWarnings>,
    pool: ThreadPool,
}

impl BuildContext {
    pub fn new(config: Config) -> Result<Self> {
        let warnings = Arc::new(DeprecationWarnings::new());
        let markdown = MarkdownOptions {
            hard_wrap: config.hard_wrap,
            highlight: config.highlight,
            highlight_theme: config.highlight_theme.clone(),
            base_url: config.base_url.clone(),
        };
        let registry = Arc::new(TransformerRegistry::with_defaults(&markdown, warnings.clone()));

        let cpu_count = num_cpus::get();
        debug!("Using {} worker threads", cpu_count);
        let pool = ThreadPoolBuilder::new()
            .num_threads(cpu_count)
            .thread_name(|i| format!("alvu-worker-{}", i))
            .build()
            .map_err(|e| AlvuError::Io(io::Error::new(io::ErrorKind::Other, e)))?;

        Ok(BuildContext {
            config,
            registry,
            warnings,
            pool,
        })
    }

    /// Worker pool shared by asset copies and page renders
    pub fn pool(&self) -> &ThreadPool {
        &self.pool
    }
}
