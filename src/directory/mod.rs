pub mod discovery;

pub use discovery::{discover_files, is_reserved_name, LAYOUT_FILE, LEGACY_HEAD_FILE, LEGACY_TAIL_FILE};
