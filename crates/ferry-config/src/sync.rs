//! Run-level sync settings: dry run, retry and pacing.

use serde::{Deserialize, Deserializer, Serialize};

const fn default_max_attempts() -> u32 {
    3
}

const fn default_base_delay_ms() -> u64 {
    1_000
}

const fn default_write_delay_ms() -> u64 {
    500
}

const fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SyncConfig {
    /// Simulate writes instead of performing them.
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub dry_run: bool,

    /// Attempts per network operation, including the first one.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Base delay for retry backoff; attempt `n` waits `n × base_delay_ms`.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Pause between consecutive destination writes.
    #[serde(default = "default_write_delay_ms")]
    pub write_delay_ms: u64,

    /// HTTP request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Optional JSON file mapping source media URLs to destination IDs.
    /// When set, media is resolved from this table instead of by filename search.
    #[serde(default)]
    pub media_map_path: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            dry_run: false,
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            write_delay_ms: default_write_delay_ms(),
            timeout_secs: default_timeout_secs(),
            media_map_path: String::new(),
        }
    }
}

/// Accept `true`, `1`, `"yes"`, `"TRUE"`, ... for flags set from env files.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
        Str(String),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => value,
        Flag::Int(value) => value == 1,
        Flag::Str(value) => matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "true" | "1" | "yes" | "on"
        ),
    })
}
