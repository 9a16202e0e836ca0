use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::chess::bounds::WorldBorder;
use crate::chess::rules::GameRules;
use crate::error::ConfigError;

/// Engine configuration, read from a JSON file. Every field is optional.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// `tracing` filter directive; `RUST_LOG` wins when set.
    pub log_filter: Option<String>,

    /// Workers for batch validation. `None` uses the global rayon pool.
    pub batch_threads: Option<usize>,

    /// Slide limit applied to games whose rules leave it unset.
    pub default_slide_limit: Option<i64>,

    /// Border applied to games whose rules leave it unset.
    pub world_border: Option<WorldBorder>,
}

impl EngineConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Fills in the rules the game itself left open.
    pub fn apply_to(&self, rules: &mut GameRules) {
        if rules.slide_limit.is_none() {
            rules.slide_limit = self.default_slide_limit;
        }
        if rules.world_border.is_none() {
            rules.world_border = self.world_border;
        }
    }

    pub fn log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or("info")
    }
}
