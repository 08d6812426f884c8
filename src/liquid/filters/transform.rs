use std::fmt;
use std::sync::Arc;

use liquid_core::parser::{FilterArguments, ParameterReflection, ParseFilter};
use liquid_core::{Error as LiquidError, Expression, FilterReflection, Result as LiquidResult};
use liquid_core::{Runtime, Value, ValueView};

use crate::transformers::TransformerRegistry;

/// `{{ snippet | transform: "md" }}` runs the snippet through the transformer
/// chain registered for the extension
pub struct TransformFilter {
    extension: Expression,
    registry: Arc<TransformerRegistry>,
}

impl liquid_core::Filter for TransformFilter {
    fn evaluate(&self, input: &dyn ValueView, runtime: &dyn Runtime) -> LiquidResult<Value> {
        let extension = self.extension.evaluate(runtime)?.to_kstr().to_string();
        let content = input.to_kstr().to_string();

        match self.registry.transform_str(&extension, &content) {
            Ok(Some(output)) => Ok(Value::scalar(output)),
            Ok(None) => Err(LiquidError::with_msg(format!(
                "transform: no transformer registered for \"{}\"",
                extension
            ))),
            Err(e) => Err(LiquidError::with_msg(format!("transform: {}", e))),
        }
    }
}

impl fmt::Debug for TransformFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformFilter")
            .field("extension", &self.extension)
            .finish()
    }
}

impl fmt::Display for TransformFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "transform: {}", self.extension)
    }
}

const TRANSFORM_PARAMETERS: &[ParameterReflection] = &[ParameterReflection {
    name: "extension",
    description: "Extension whose transformer chain to apply, e.g. \"md\"",
    is_optional: false,
}];

/// Parse filter factory for transform
#[derive(Clone)]
pub struct TransformFilterParser {
    pub registry: Arc<TransformerRegistry>,
}

impl fmt::Debug for TransformFilterParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TransformFilterParser")
    }
}

impl FilterReflection for TransformFilterParser {
    fn name(&self) -> &str {
        "transform"
    }

    fn description(&self) -> &str {
        "Converts the input with the transformers registered for an extension"
    }

    fn positional_parameters(&self) -> &'static [ParameterReflection] {
        TRANSFORM_PARAMETERS
    }

    fn keyword_parameters(&self) -> &'static [ParameterReflection] {
        &[]
    }
}

impl ParseFilter for TransformFilterParser {
    fn parse(&self, mut args: FilterArguments) -> LiquidResult<Box<dyn liquid_core::Filter>> {
        let extension = args
            .positional
            .next()
            .ok_or_else(|| LiquidError::with_msg("transform requires an extension, e.g. transform: \"md\""))?;

        if args.positional.next().is_some() {
            return Err(LiquidError::with_msg("transform takes a single extension argument"));
        }

        Ok(Box::new(TransformFilter {
            extension,
            registry: self.registry.clone(),
        }))
    }

    fn reflection(&self) -> &dyn FilterReflection {
        self
    }
}
