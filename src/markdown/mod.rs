pub mod engine;
pub mod links;

pub use engine::{create_comrak_options, create_highlighter, render_markdown};
pub use links::{rewrite_link, LinkRewrite};
