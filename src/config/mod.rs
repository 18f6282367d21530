//! Configuration management for observable documents.
//!
//! Provides hierarchical configuration loading and validation with:
//! - Default values as code base
//! - Configuration file support
//! - Environment variable overrides
//! - Component-wise validation
mod notify;
mod path;
pub use notify::*;
pub use path::*;


use std::env;
use std::fmt::Debug;

use config::Config;
use config::Environment;
use config::File;
use serde::Deserialize;
use serde::Serialize;

use crate::Result;

/// Environment variable prefix, e.g. `OTREE__PATH__SEPARATOR=.`
const ENV_PREFIX: &str = "OTREE";

/// Settings of one [`ObservableDocument`](crate::ObservableDocument).
///
/// Sources are merged with increasing priority:
/// 1. Default values from code
/// 2. Configuration file specified by `CONFIG_PATH`
/// 3. Environment variables with the `OTREE__` prefix
#[derive(Serialize, Deserialize, Clone, Default)]
pub struct DocumentConfig {
    /// Path syntax
    #[serde(default)]
    pub path: PathConfig,
    /// Diff traversal switches
    #[serde(default)]
    pub notify: NotifyConfig,
}

impl Debug for DocumentConfig {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("DocumentConfig")
            .field("separator", &self.path.separator)
            .field("notify", &self.notify)
            .finish()
    }
}

impl DocumentConfig {
    /// Loads configuration from hierarchical sources without validation.
    ///
    /// Callers MUST call `validate()` before handing the result to a document.
    ///
    /// # Examples
    /// ```ignore
    /// std::env::set_var("CONFIG_PATH", "config/document.toml");
    /// std::env::set_var("OTREE__PATH__SEPARATOR", ".");
    /// let cfg = DocumentConfig::new()?.validate()?;
    /// ```
    pub fn new() -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if let Ok(config_path) = env::var("CONFIG_PATH") {
            builder = builder.add_source(File::with_name(&config_path).required(true));
        }

        builder = builder.add_source(environment());

        let config: Self = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Applies additional overrides from file without validation.
    ///
    /// Merging order (later sources override earlier):
    /// 1. Current configuration values
    /// 2. New configuration file
    /// 3. Latest environment variables
    pub fn with_override_config(
        &self,
        path: &str,
    ) -> Result<Self> {
        let config: Self = Config::builder()
            .add_source(Config::try_from(self)?)
            .add_source(File::with_name(path))
            .add_source(environment())
            .build()?
            .try_deserialize()?;
        Ok(config)
    }

    /// Validates configuration and returns the validated instance.
    pub fn validate(self) -> Result<Self> {
        self.path.validate()?;
        self.notify.validate()?;
        Ok(self)
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .ignore_empty(true)
        .try_parsing(true)
}
