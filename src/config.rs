use std::time::Duration;

use serde::{Deserialize, Deserializer, de};

use crate::ai::{DEFAULT_SEARCH_DEPTH, MAX_SEARCH_DEPTH};

/// Engine settings. Missing fields fall back to their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Extra plies explored below each candidate move, at most
    /// [`MAX_SEARCH_DEPTH`]. Larger values are rejected when deserializing
    /// and clamped by [`EngineConfig::effective_depth`].
    #[serde(deserialize_with = "deserialize_search_depth")]
    pub search_depth: u8,
    /// Time after which the root search stops trying further moves.
    /// `None` runs every search to completion.
    pub search_deadline_ms: Option<u64>,
}

impl EngineConfig {
    /// Depth handed to AI players.
    pub fn effective_depth(&self) -> u8 {
        self.search_depth.min(MAX_SEARCH_DEPTH)
    }

    pub fn search_deadline(&self) -> Option<Duration> {
        self.search_deadline_ms.map(Duration::from_millis)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            search_depth: DEFAULT_SEARCH_DEPTH,
            search_deadline_ms: None,
        }
    }
}

fn deserialize_search_depth<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let depth = u8::deserialize(deserializer)?;
    if depth > MAX_SEARCH_DEPTH {
        return Err(de::Error::custom(format!(
            "search_depth {depth} exceeds maximum of {MAX_SEARCH_DEPTH}"
        )));
    }
    Ok(depth)
}
