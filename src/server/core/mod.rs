pub mod server;
pub mod watcher;

pub use server::{create_router, serve, ServerState};
pub use watcher::handle_file_changes;
