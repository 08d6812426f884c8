pub mod assets;
pub mod context;
pub mod output;
pub mod page;
pub mod site;

pub use context::BuildContext;
pub use site::{build_site, rebuild_file, BuildStats};
