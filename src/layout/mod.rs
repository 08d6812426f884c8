pub mod renderer;
pub mod slot;

pub use renderer::{read_layout, LayoutRenderer, DEFAULT_LAYOUT};
pub use slot::{inject_in_slot, LEGACY_CONTENT_TOKEN};
