use std::path::PathBuf;

use clap::Parser;

use crate::config::{Config, WatcherKind};

/// Main CLI parser structure
#[derive(Parser, Debug)]
#[command(name = "alvu")]
#[command(about = "A scriptable static site generator", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Site root containing pages/, public/ and hooks/
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub path: PathBuf,

    /// Output directory (defaults to ./dist)
    #[arg(long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Hooks directory, relative to --path (defaults to hooks)
    #[arg(long, value_name = "DIR")]
    pub hooks: Option<PathBuf>,

    /// Base URL prefixed to root links and exposed as Meta.BaseURL
    #[arg(long, value_name = "URL")]
    pub baseurl: Option<String>,

    /// Highlight fenced code blocks
    #[arg(long, default_value_t = false)]
    pub highlight: bool,

    /// Syntax highlighting theme
    #[arg(long, value_name = "THEME")]
    pub highlight_theme: Option<String>,

    /// Turn single newlines into line breaks
    #[arg(long, value_name = "BOOL")]
    pub hard_wrap: Option<bool>,

    /// Serve the site and rebuild on changes
    #[arg(short, long, default_value_t = false)]
    pub serve: bool,

    /// Port for the dev server (defaults to 3000)
    #[arg(short, long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Poll interval in milliseconds (defaults to 2000)
    #[arg(long, value_name = "MS")]
    pub poll: Option<u64>,

    /// Change detection: poll or native
    #[arg(long, value_name = "KIND")]
    pub watcher: Option<WatcherKind>,

    /// Enable verbose debugging
    #[arg(short = 'g', long, default_value_t = false)]
    pub debug: bool,
}

impl Cli {
    /// Apply the flags that were given on top of `config`
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(out) = &self.out {
            config.destination = out.clone();
        }
        if let Some(hooks) = &self.hooks {
            config.hooks_dir = hooks.clone();
        }
        if let Some(base_url) = &self.baseurl {
            config.base_url = base_url.clone();
        }
        if self.highlight {
            config.highlight = true;
        }
        if let Some(theme) = &self.highlight_theme {
            config.highlight_theme = theme.clone();
        }
        if let Some(hard_wrap) = self.hard_wrap {
            config.hard_wrap = hard_wrap;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(poll) = self.poll {
            config.poll_interval_ms = poll;
        }
        if let Some(watcher) = self.watcher {
            config.watcher = watcher;
        }
        config.serve = self.serve;
    }
}
