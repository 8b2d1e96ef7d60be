use serde::Deserialize;

use crate::services::{
    reveal::{Pacing, PacingError},
    script::{NarrativeTone, ScriptOptions},
};

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Start from the fast pacing preset instead of the standard one
    #[serde(default)]
    pub fast_mode: bool,

    /// Pacing overrides, in seconds
    #[serde(default)]
    pub inter_message_pause_secs: Option<f64>,
    #[serde(default)]
    pub char_reveal_delay_secs: Option<f64>,
    #[serde(default)]
    pub typing_indicator_min_secs: Option<f64>,
    #[serde(default)]
    pub typing_indicator_tick_secs: Option<f64>,

    /// `analytic` or `casual`
    #[serde(default)]
    pub narrative_tone: NarrativeTone,

    /// Name shown in the typing indicator and greeting
    #[serde(default = "default_assistant_name")]
    pub assistant_name: String,

    /// Code the closing message asks the user to enter
    #[serde(default)]
    pub completion_code: Option<String>,

    /// Seed for recommendation numbers; random when unset
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_assistant_name() -> String {
    "CineMate".to_string()
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.pacing()?;
        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Preset selected by `fast_mode`, with any per-field overrides applied
    pub fn pacing(&self) -> Result<Pacing, PacingError> {
        let mut pacing = if self.fast_mode {
            Pacing::fast()
        } else {
            Pacing::standard()
        };

        if let Some(secs) = self.inter_message_pause_secs {
            pacing.inter_message_pause = Pacing::secs("INTER_MESSAGE_PAUSE_SECS", secs)?;
        }
        if let Some(secs) = self.char_reveal_delay_secs {
            pacing.char_reveal_delay = Pacing::secs("CHAR_REVEAL_DELAY_SECS", secs)?;
        }
        if let Some(secs) = self.typing_indicator_min_secs {
            pacing.typing_indicator_min_duration = Pacing::secs("TYPING_INDICATOR_MIN_SECS", secs)?;
        }
        if let Some(secs) = self.typing_indicator_tick_secs {
            pacing.typing_indicator_tick_delay = Pacing::tick_secs("TYPING_INDICATOR_TICK_SECS", secs)?;
        }
        Ok(pacing)
    }

    pub fn script_options(&self) -> ScriptOptions {
        ScriptOptions {
            tone: self.narrative_tone,
            assistant_name: self.assistant_name.clone(),
            completion_code: self.completion_code.clone(),
        }
    }
}
