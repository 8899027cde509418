//! Plugin parameters.
//!
//! protoc passes everything after `--netlify-cms_opt=` (or buf's `opt:`) as a
//! single comma-separated string of `key=value` pairs.

use std::str::FromStr;

use strum::{Display, EnumString};
use tracing::debug;

use crate::error::{Error, Result};

const DEFAULT_EXTENSION: &str = "yml";

/// Where generated files land relative to the protoc output directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum PathsMode {
    /// Mirror the proto file's directory, `a/b/c.proto` -> `a/b/c.yml`.
    /// `import` is an alias.
    #[default]
    #[strum(to_string = "source_relative", serialize = "import")]
    SourceRelative,
    /// File stem only, `a/b/c.proto` -> `c.yml`.
    Flat,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub extension: String,
    pub paths: PathsMode,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            extension: DEFAULT_EXTENSION.to_string(),
            paths: PathsMode::default(),
        }
    }
}

impl GeneratorConfig {
    pub fn from_parameter(parameter: &str) -> Result<Self> {
        let mut config = Self::default();
        for pair in parameter.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let (key, value) = (key.trim(), value.trim());
            match key {
                "extension" => {
                    let extension = value.trim_start_matches('.');
                    if extension.is_empty() {
                        return Err(invalid(key, value));
                    }
                    config.extension = extension.to_string();
                }
                "paths" => {
                    config.paths = PathsMode::from_str(value).map_err(|_| invalid(key, value))?;
                }
                _ => {
                    return Err(Error::UnknownParameter {
                        key: key.to_string(),
                    });
                }
            }
        }
        debug!(extension = %config.extension, paths = %config.paths, "Parsed plugin parameter");
        Ok(config)
    }

    /// Output file name for the given proto file name.
    pub fn output_name(&self, proto_name: &str) -> String {
        let prefix = proto_name.strip_suffix(".proto").unwrap_or(proto_name);
        let prefix = match self.paths {
            PathsMode::SourceRelative => prefix,
            PathsMode::Flat => prefix.rsplit('/').next().unwrap_or(prefix),
        };
        format!("{prefix}.{}", self.extension)
    }
}

fn invalid(key: &str, value: &str) -> Error {
    Error::InvalidParameter {
        key: key.to_string(),
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_parameter_uses_defaults() {
        let config = GeneratorConfig::from_parameter("").unwrap();
        assert_eq!(config, GeneratorConfig::default());
        assert_eq!(
            config.output_name("einride/example/v1/config.proto"),
            "einride/example/v1/config.yml"
        );
    }

    #[test]
    fn parses_extension_and_paths() {
        let config = GeneratorConfig::from_parameter("extension=.yaml, paths=flat").unwrap();
        assert_eq!(config.extension, "yaml");
        assert_eq!(config.paths, PathsMode::Flat);
        assert_eq!(config.output_name("a/b/config.proto"), "config.yaml");
    }

    #[test]
    fn import_paths_mirror_source_layout() {
        let config = GeneratorConfig::from_parameter("paths=import").unwrap();
        assert_eq!(config.paths, PathsMode::SourceRelative);
        assert_eq!(config.paths.to_string(), "source_relative");
        assert_eq!(config.output_name("a/b/config.proto"), "a/b/config.yml");
    }

    #[test]
    fn rejects_unknown_keys_and_values() {
        assert!(matches!(
            GeneratorConfig::from_parameter("module=foo"),
            Err(Error::UnknownParameter { key }) if key == "module"
        ));
        assert!(matches!(
            GeneratorConfig::from_parameter("paths=nested"),
            Err(Error::InvalidParameter { key, value }) if key == "paths" && value == "nested"
        ));
        assert!(GeneratorConfig::from_parameter("extension=").is_err());
    }
}
