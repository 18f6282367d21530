use config::ConfigError;
use serde::Deserialize;
use serde::Serialize;

use crate::path::DEFAULT_SEPARATOR;
use crate::Error;
use crate::Result;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PathConfig {
    /// Character splitting raw path strings into segments
    /// Default: "/"
    #[serde(default = "default_separator")]
    pub separator: String,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            separator: default_separator(),
        }
    }
}

impl PathConfig {
    /// The separator must be exactly one non-whitespace character
    pub fn validate(&self) -> Result<()> {
        self.separator_char().map(|_| ())
    }

    pub fn separator_char(&self) -> Result<char> {
        let mut chars = self.separator.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if !c.is_whitespace() => Ok(c),
            _ => Err(Error::Config(ConfigError::Message(format!(
                "path.separator must be a single non-whitespace character, got {:?}",
                self.separator
            )))),
        }
    }
}

fn default_separator() -> String {
    DEFAULT_SEPARATOR.to_string()
}
