//! Generator configuration.
//!
//! Configuration is optional. Without a file the generator produces the
//! stock `VImage` declarations:
//!
//! ```toml
//! image_type = "VipsImage"
//! static_marker = "static"
//! void_type = "void"
//! option_bag = "VOption *options = 0"
//!
//! [types]
//! VipsInterpolate = "VInterpolate"
//! ```

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{GenerateError, Result};

/// Value-type identifier of the image handle in the stock registry.
pub const DEFAULT_IMAGE_TYPE: &str = "VipsImage";
/// Marker prefixed to declarations without a receiver.
pub const DEFAULT_STATIC_MARKER: &str = "static";
/// Return type of declarations without a result.
pub const DEFAULT_VOID_TYPE: &str = "void";
/// Trailing parameter standing in for all optional arguments.
pub const DEFAULT_OPTION_BAG: &str = "VOption *options = 0";

/// Settings that shape the generated declarations.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Value type whose first required input becomes the receiver.
    pub image_type: String,
    /// Prefix for class-level declarations.
    pub static_marker: String,
    /// Return type used when an operation has no required output.
    pub void_type: String,
    /// Text of the always-present trailing parameter.
    pub option_bag: String,
    /// Extra type-table entries, applied over the built-in table.
    pub types: BTreeMap<String, String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            image_type: DEFAULT_IMAGE_TYPE.to_string(),
            static_marker: DEFAULT_STATIC_MARKER.to_string(),
            void_type: DEFAULT_VOID_TYPE.to_string(),
            option_bag: DEFAULT_OPTION_BAG.to_string(),
            types: BTreeMap::new(),
        }
    }
}

impl GeneratorConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml(contents: &str, path: &Path) -> Result<Self> {
        toml::from_str(contents).map_err(|err| GenerateError::Config {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
    }

    /// Load the configuration at `path`, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let contents = fs::read_to_string(path).map_err(|err| GenerateError::Config {
            path: path.to_path_buf(),
            message: format!("failed to read file: {err}"),
        })?;

        Self::from_toml(&contents, path)
    }
}
