use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::defaults;

/// How the dev server notices source changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WatcherKind {
    /// Compare modification times on a timer
    #[default]
    Poll,
    /// Filesystem notifications from the OS
    Native,
}

impl FromStr for WatcherKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "poll" => Ok(WatcherKind::Poll),
            "native" => Ok(WatcherKind::Native),
            other => Err(format!("unknown watcher \"{}\", expected poll or native", other)),
        }
    }
}

impl fmt::Display for WatcherKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WatcherKind::Poll => write!(f, "poll"),
            WatcherKind::Native => write!(f, "native"),
        }
    }
}

/// Site configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Site root holding `pages/`, `public/` and the hooks
    #[serde(default = "defaults::default_source")]
    pub source: PathBuf,

    /// Output directory
    #[serde(default = "defaults::default_destination")]
    pub destination: PathBuf,

    /// Hook scripts directory, relative to `source` unless absolute
    #[serde(default = "defaults::default_hooks_dir")]
    pub hooks_dir: PathBuf,

    /// Base URL that root links and `Meta.BaseURL` resolve against
    #[serde(default = "defaults::default_base_url")]
    pub base_url: String,

    /// Turn single newlines in Markdown into line breaks
    #[serde(default = "defaults::default_true")]
    pub hard_wrap: bool,

    /// Highlight fenced code blocks
    #[serde(default)]
    pub highlight: bool,

    #[serde(default = "defaults::default_highlight_theme")]
    pub highlight_theme: String,

    /// Dev server port
    #[serde(default = "defaults::default_port")]
    pub port: u16,

    #[serde(default = "defaults::default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    #[serde(default)]
    pub watcher: WatcherKind,

    /// Inject the live reload client into pages while serving
    #[serde(default = "defaults::default_true")]
    pub livereload: bool,

    /// Set by the CLI when the dev server runs
    #[serde(skip)]
    pub serve: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            source: defaults::default_source(),
            destination: defaults::default_destination(),
            hooks_dir: defaults::default_hooks_dir(),
            base_url: defaults::default_base_url(),
            hard_wrap: true,
            highlight: false,
            highlight_theme: defaults::default_highlight_theme(),
            port: defaults::default_port(),
            poll_interval_ms: defaults::default_poll_interval_ms(),
            watcher: WatcherKind::default(),
            livereload: true,
            serve: false,
        }
    }
}

impl Config {
    /// Content pages directory
    pub fn pages_dir(&self) -> PathBuf {
        self.source.join("pages")
    }

    /// Static assets copied as they are
    pub fn public_dir(&self) -> PathBuf {
        self.source.join("public")
    }

    /// Resolved hooks directory
    pub fn hooks_path(&self) -> PathBuf {
        if self.hooks_dir.is_absolute() {
            self.hooks_dir.clone()
        } else {
            self.source.join(&self.hooks_dir)
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Whether rendered pages get the live reload client
    pub fn inject_livereload(&self) -> bool {
        self.serve && self.livereload
    }
}
