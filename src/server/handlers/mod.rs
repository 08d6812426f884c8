pub mod static_files;

pub use static_files::{handle_not_found, static_files_router};
