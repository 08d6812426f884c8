//! Development server: serves the output directory, watches the sources and
//! tells connected browsers to reload after each rebuild.

pub mod core;
pub mod handlers;
pub mod livereload;
pub mod watch;

pub use self::core::serve;
