use serde::Deserialize;
use serde::Serialize;

use crate::DiffOptions;
use crate::Result;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NotifyConfig {
    /// Skip the children of a node whose old and new values are both empty.
    /// Never changes which callbacks fire, only how much is compared.
    /// Default: true
    #[serde(default = "default_true")]
    pub skip_empty_subtrees: bool,

    /// Forget registries whose callbacks were all cancelled when a diff
    /// passes over them. Their tree nodes are kept either way.
    /// Default: true
    #[serde(default = "default_true")]
    pub drop_inactive_registries: bool,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            skip_empty_subtrees: default_true(),
            drop_inactive_registries: default_true(),
        }
    }
}

impl NotifyConfig {
    pub fn validate(&self) -> Result<()> {
        Ok(())
    }

    pub fn diff_options(&self) -> DiffOptions {
        DiffOptions {
            skip_empty_subtrees: self.skip_empty_subtrees,
            drop_inactive_registries: self.drop_inactive_registries,
        }
    }
}

fn default_true() -> bool {
    true
}
