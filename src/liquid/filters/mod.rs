mod transform;

use std::sync::Arc;

use liquid::ParserBuilder;

use crate::transformers::TransformerRegistry;

pub use transform::{TransformFilter, TransformFilterParser};

/// Register the site's custom filters
pub fn register_filters(parser_builder: ParserBuilder, registry: Arc<TransformerRegistry>) -> ParserBuilder {
    parser_builder.filter(TransformFilterParser { registry })
}
