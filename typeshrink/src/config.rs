//! Configuration for inference and rewriting.
//!
//! Settings come from a TOML document:
//!
//! ```toml
//! [inference]
//! max_shape_size = 20
//!
//! [rewrite]
//! max_union_len = 5
//! max_passes = 8
//! ```
//!
//! or from the environment:
//! - `TYPESHRINK_MAX_SHAPE_SIZE`
//! - `TYPESHRINK_MAX_UNION_LEN`
//! - `TYPESHRINK_MAX_REWRITE_PASSES`
//!
//! Every field is optional; missing fields take their defaults.

use std::env;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::infer::Inferencer;
use crate::rewrite::{
    default_rewriter, ChainedRewriter, FixedPointRewriter, DEFAULT_MAX_UNION_LEN,
    MAX_REWRITE_PASSES,
};

pub const ENV_MAX_SHAPE_SIZE: &str = "TYPESHRINK_MAX_SHAPE_SIZE";
pub const ENV_MAX_UNION_LEN: &str = "TYPESHRINK_MAX_UNION_LEN";
pub const ENV_MAX_REWRITE_PASSES: &str = "TYPESHRINK_MAX_REWRITE_PASSES";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub inference: InferenceConfig,
    pub rewrite: RewriteConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InferenceConfig {
    /// Largest string-keyed mapping still described as a shape. Unbounded
    /// when absent.
    pub max_shape_size: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RewriteConfig {
    pub max_union_len: usize,
    pub max_passes: usize,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            max_union_len: DEFAULT_MAX_UNION_LEN,
            max_passes: MAX_REWRITE_PASSES,
        }
    }
}

impl Config {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by the `TYPESHRINK_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Config::default();
        if let Some(size) = parse_var(&lookup, ENV_MAX_SHAPE_SIZE)? {
            config.inference.max_shape_size = Some(size);
        }
        if let Some(len) = parse_var(&lookup, ENV_MAX_UNION_LEN)? {
            config.rewrite.max_union_len = len;
        }
        if let Some(passes) = parse_var(&lookup, ENV_MAX_REWRITE_PASSES)? {
            config.rewrite.max_passes = passes;
        }
        config.validate()?;
        tracing::debug!(?config, "loaded configuration from environment");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rewrite.max_union_len == 0 {
            return Err(ConfigError::invalid(
                "rewrite.max_union_len",
                "must be at least 1",
            ));
        }
        if self.rewrite.max_passes == 0 {
            return Err(ConfigError::invalid("rewrite.max_passes", "must be at least 1"));
        }
        Ok(())
    }

    pub fn inferencer(&self) -> Inferencer {
        Inferencer::new(self.inference.max_shape_size)
    }

    pub fn rewriter(&self) -> FixedPointRewriter<ChainedRewriter> {
        default_rewriter(self.rewrite.max_union_len, self.rewrite.max_passes)
    }
}

fn parse_var(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &str,
) -> Result<Option<usize>, ConfigError> {
    let Some(raw) = lookup(var) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse()
        .map(Some)
        .map_err(|_| ConfigError::InvalidEnv {
            var: var.to_string(),
            value: raw.clone(),
        })
}
