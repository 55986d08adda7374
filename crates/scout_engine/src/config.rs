use std::time::Duration;

use scout_core::MonitorSettings;
use serde::{Deserialize, Serialize};

use crate::PollBudget;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid engine config: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// Every tunable of the engine. Unset fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub monitor: MonitorSettings,
    pub board: BoardSettings,
    pub videos: VideoSettings,
}

impl EngineConfig {
    /// Parses a RON document such as `(board: (fast_path_threshold: 4))`.
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(text)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardSettings {
    /// Prefix of card element ids; stripped to obtain the issue key.
    pub card_id_prefix: String,
    /// Restricts cards to one project, e.g. `"BIP-"`.
    pub project_key_prefix: Option<String>,
    /// An immediate pass with at least this many cards skips scrolling.
    pub fast_path_threshold: usize,
    pub max_scroll_rounds: u32,
    pub scroll_step_px: i32,
    pub settle_delay_ms: u64,
    /// A round with no new cards stops the loader only after this many rounds ran.
    pub plateau_after_rounds: u32,
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            card_id_prefix: "card-".to_string(),
            project_key_prefix: None,
            fast_path_threshold: 8,
            max_scroll_rounds: 5,
            scroll_step_px: 300,
            settle_delay_ms: 500,
            plateau_after_rounds: 2,
        }
    }
}

impl BoardSettings {
    pub fn poll_budget(&self) -> PollBudget {
        PollBudget {
            max_rounds: self.max_scroll_rounds,
            delay: Duration::from_millis(self.settle_delay_ms),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoSettings {
    /// The broad anchor pass runs when the container pass found fewer videos.
    pub broad_pass_threshold: usize,
    pub max_videos: usize,
    pub min_title_chars: usize,
    pub min_broad_title_chars: usize,
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self {
            broad_pass_threshold: 10,
            max_videos: 100,
            min_title_chars: 2,
            min_broad_title_chars: 4,
        }
    }
}
