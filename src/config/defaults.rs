use std::path::PathBuf;

/// Default source directory
pub fn default_source() -> PathBuf {
    PathBuf::from(".")
}

/// Default destination directory
pub fn default_destination() -> PathBuf {
    PathBuf::from("./dist")
}

/// Default hooks directory, relative to the source directory
pub fn default_hooks_dir() -> PathBuf {
    PathBuf::from("hooks")
}

/// Default base URL
pub fn default_base_url() -> String {
    "/".to_string()
}

pub fn default_highlight_theme() -> String {
    "base16-ocean.dark".to_string()
}

/// Default dev server port
pub fn default_port() -> u16 {
    3000
}

/// Default change polling interval in milliseconds
pub fn default_poll_interval_ms() -> u64 {
    2000
}

pub fn default_true() -> bool {
    true
}
