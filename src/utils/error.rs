use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// Result type for the build pipeline
pub type Result<T> = std::result::Result<T, AlvuError>;

/// Boxed result used at the CLI and server edges
pub type BoxResult<T> = std::result::Result<T, Box<dyn Error + Send + Sync>>;

/// Error types for Alvu operations
#[derive(Debug)]
pub enum AlvuError {
    /// IO error wrapper
    Io(io::Error),
    /// Configuration error (missing content root, unreadable directory)
    Config(String),
    /// Malformed front-matter block
    FrontMatter { path: PathBuf, message: String },
    /// A content transformer failed
    Transform { path: PathBuf, message: String },
    /// A hook script failed to load or raised during execution
    Hook { path: PathBuf, message: String },
    /// Layout templating error
    Template(String),
    /// Change detection error
    Watch(String),
    /// Server error
    Server(String),
}

impl AlvuError {
    pub fn front_matter(path: impl Into<PathBuf>, message: impl fmt::Display) -> Self {
        AlvuError::FrontMatter {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub fn transform(path: impl Into<PathBuf>, message: impl fmt::Display) -> Self {
        AlvuError::Transform {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub fn hook(path: impl Into<PathBuf>, message: impl fmt::Display) -> Self {
        AlvuError::Hook {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

impl fmt::Display for AlvuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlvuError::Io(err) => write!(f, "IO error: {}", err),
            AlvuError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AlvuError::FrontMatter { path, message } => {
                write!(f, "Front matter error in {}: {}", path.display(), message)
            }
            AlvuError::Transform { path, message } => {
                write!(f, "Failed to transform file {}: {}", path.display(), message)
            }
            AlvuError::Hook { path, message } => {
                write!(f, "Hook {} failed: {}", path.display(), message)
            }
            AlvuError::Template(msg) => write!(f, "Template error: {}", msg),
            AlvuError::Watch(msg) => write!(f, "Watch error: {}", msg),
            AlvuError::Server(msg) => write!(f, "Server error: {}", msg),
        }
    }
}

impl Error for AlvuError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AlvuError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for AlvuError {
    fn from(err: io::Error) -> Self {
        AlvuError::Io(err)
    }
}

impl From<walkdir::Error> for AlvuError {
    fn from(err: walkdir::Error) -> Self {
        match err.into_io_error() {
            Some(io_err) => AlvuError::Io(io_err),
            None => AlvuError::Config("filesystem loop detected while walking directory".to_string()),
        }
    }
}
