use crate::constants::ALLOWED_TAG_OPTIONS;
use crate::constants::TAG_DELIMITER;
use crate::constants::TAG_OPTION_DEFAULT;
use crate::constants::TAG_OPTION_NAME;
use crate::BindError;
use crate::Result;

/// Recognized per-field options
///
/// Parsed from `key:value` pairs joined by `:`, e.g. `name:port:default:8080`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagOptions {
    name: Option<String>,
    default: Option<String>,
}

impl TagOptions {
    /// Parses a tag string.
    ///
    /// An empty tag yields empty options. An odd number of tokens fails with
    /// [`BindError::InvalidTagSyntax`]. Pairs with unknown keys are dropped;
    /// a repeated key keeps its last value.
    pub fn parse(tag: &str) -> Result<Self> {
        let mut options = Self::default();
        if tag.is_empty() {
            return Ok(options);
        }

        let tokens: Vec<&str> = tag.split(TAG_DELIMITER).collect();
        if tokens.len() % 2 != 0 {
            return Err(BindError::InvalidTagSyntax {
                tag: tag.to_string(),
            }
            .into());
        }

        for pair in tokens.chunks_exact(2) {
            let (key, value) = (pair[0], pair[1]);
            if !ALLOWED_TAG_OPTIONS.contains(&key) {
                continue;
            }
            match key {
                TAG_OPTION_NAME => options.name = Some(value.to_string()),
                TAG_OPTION_DEFAULT => options.default = Some(value.to_string()),
                _ => {}
            }
        }

        Ok(options)
    }

    /// Path segment override
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Literal used when the key is absent from the store
    pub fn default_value(&self) -> Option<&str> {
        self.default.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.default.is_none()
    }
}
