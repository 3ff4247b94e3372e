use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct HydroConfig {
    #[serde(default)]
    pub fusion: FusionConfig,
    #[serde(default)]
    pub advisor: AdvisorConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// Configuration for the climate-data fusion layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FusionConfig {
    /// Reanalysis archive endpoint.
    #[serde(default = "default_archive_url")]
    pub archive_url: String,
    /// Timeout in seconds for a single-day archive request.
    #[serde(default = "default_day_timeout")]
    pub day_timeout_seconds: u64,
    /// Timeout in seconds for a multi-day archive request.
    #[serde(default = "default_range_timeout")]
    pub range_timeout_seconds: u64,
    /// Path to the static CSV used when the archive is unreachable.
    #[serde(default = "default_local_table_path")]
    pub local_table_path: String,
    /// Timezone mode passed to the archive.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Pause between requests when walking a window one day at a time.
    #[serde(default = "default_sequential_pause")]
    pub sequential_pause_ms: u64,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            archive_url: default_archive_url(),
            day_timeout_seconds: default_day_timeout(),
            range_timeout_seconds: default_range_timeout(),
            local_table_path: default_local_table_path(),
            timezone: default_timezone(),
            sequential_pause_ms: default_sequential_pause(),
        }
    }
}

/// Configuration for the advisory generator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdvisorConfig {
    /// Base URL of the generative backend's model collection.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Hard ceiling for one generation call.
    #[serde(default = "default_advisor_timeout")]
    pub timeout_seconds: u64,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    /// Environment variable holding the backend credential.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            timeout_seconds: default_advisor_timeout(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
            api_key_env: default_api_key_env(),
        }
    }
}

/// Configuration for the fetch → compute → advise pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PipelineConfig {
    /// Length of the trend window ending on the target date (inclusive).
    #[serde(default = "default_window_days")]
    pub window_days: u32,
    /// Walk the window day by day when the range request comes back empty.
    #[serde(default)]
    pub sequential_fallback: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            window_days: default_window_days(),
            sequential_fallback: false,
        }
    }
}

fn default_archive_url() -> String {
    "https://archive-api.open-meteo.com/v1/archive".to_string()
}
fn default_day_timeout() -> u64 {
    5
}
fn default_range_timeout() -> u64 {
    8
}
fn default_local_table_path() -> String {
    "data/samples/local_station.csv".to_string()
}
fn default_timezone() -> String {
    "auto".to_string()
}
fn default_sequential_pause() -> u64 {
    250
}
fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta/models".to_string()
}
fn default_model() -> String {
    "gemini-2.5-flash-lite".to_string()
}
fn default_advisor_timeout() -> u64 {
    15
}
fn default_temperature() -> f32 {
    0.2
}
fn default_max_output_tokens() -> u32 {
    256
}
fn default_api_key_env() -> String {
    "GOOGLE_API_KEY".to_string()
}
fn default_window_days() -> u32 {
    7
}
