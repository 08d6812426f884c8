mod comrak;

pub use self::comrak::{create_comrak_options, create_highlighter, render_markdown};
