//! Scene settings and tuning
//!
//! Persisted in LocalStorage on the web; natively the defaults are used.

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    /// Background stars in the celebration sky
    pub fn star_count(&self) -> usize {
        match self {
            QualityPreset::Low => 60,
            QualityPreset::Medium => 120,
            QualityPreset::High => 200,
        }
    }

    /// Multiplier applied to every glow (shadow blur) radius
    pub fn glow_scale(&self) -> f32 {
        match self {
            QualityPreset::Low => 0.0,
            QualityPreset::Medium => 1.0,
            QualityPreset::High => 1.0,
        }
    }
}

/// Floating-symbol background tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbientTuning {
    /// Symbols placed at random when the scene mounts
    pub initial_symbols: usize,
    /// Soft cap on concurrent symbols
    pub max_symbols: usize,
    /// Period of spawn attempts at the bottom edge
    pub spawn_interval_ms: f64,
    /// Fragments scattered by one pop
    pub fragments_per_pop: usize,
    /// How many of those fragments reuse the popped glyph
    pub own_glyph_fragments: usize,
    /// Distance past the top/bottom edge before a symbol wraps
    pub wrap_margin: f32,
}

impl Default for AmbientTuning {
    fn default() -> Self {
        Self {
            initial_symbols: 20,
            max_symbols: 25,
            spawn_interval_ms: 2000.0,
            fragments_per_pop: 12,
            own_glyph_fragments: 3,
            wrap_margin: 50.0,
        }
    }
}

/// Scripted fireworks celebration tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CelebrationTuning {
    /// Delay from mount to the first shell launch
    pub first_launch_delay_ms: f64,
    /// Delay from the first reveal to the second shell launch
    pub second_launch_delay_ms: f64,
    /// Delay from the second reveal to the exit control
    pub controls_delay_ms: f64,
    /// Sparks from the first shell
    pub first_burst: usize,
    /// Sparks from the second shell
    pub second_burst: usize,
    /// Sparks from each background shell
    pub ambient_burst: usize,
    /// Per-frame chance of a background launch once line 2 is shown
    pub ambient_launch_chance: f32,
    /// First shell target, as a fraction of viewport height
    pub first_target: f32,
    /// Second shell target, as a fraction of viewport height
    pub second_target: f32,
    pub line1: String,
    pub line2: String,
    pub exit_label: String,
}

impl Default for CelebrationTuning {
    fn default() -> Self {
        Self {
            first_launch_delay_ms: 800.0,
            second_launch_delay_ms: 1200.0,
            controls_delay_ms: 1500.0,
            first_burst: 100,
            second_burst: 80,
            ambient_burst: 60,
            ambient_launch_chance: 0.04,
            first_target: 0.38,
            second_target: 0.55,
            line1: "Happy Birthday".to_string(),
            line2: "Make a wish!".to_string(),
            exit_label: "Return".to_string(),
        }
    }
}

/// Pointer sparkle trail tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SparkleTuning {
    pub enabled: bool,
    /// Minimum gap between two sparkles
    pub throttle_ms: f64,
    /// How long a sparkle stays on screen
    pub lifetime_ms: f64,
    /// Max offset from the pointer on each axis
    pub jitter: f32,
}

impl Default for SparkleTuning {
    fn default() -> Self {
        Self {
            enabled: true,
            throttle_ms: 50.0,
            lifetime_ms: 800.0,
            jitter: 10.0,
        }
    }
}

/// Scene settings/preferences
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,
    pub ambient: AmbientTuning,
    pub celebration: CelebrationTuning,
    pub sparkle: SparkleTuning,
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Parse and validate settings JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the scenes cannot honour
    pub fn validate(&self) -> Result<(), SettingsError> {
        let sp = &self.sparkle;
        if sp.throttle_ms < 0.0 || sp.lifetime_ms <= 0.0 || sp.jitter < 0.0 {
            return Err(SettingsError::Invalid(
                "sparkle timings must be positive and jitter non-negative".into(),
            ));
        }
        let a = &self.ambient;
        if a.max_symbols == 0 {
            return Err(SettingsError::Invalid("ambient.max_symbols must be > 0".into()));
        }
        if a.initial_symbols > a.max_symbols {
            return Err(SettingsError::Invalid(format!(
                "ambient.initial_symbols ({}) exceeds max_symbols ({})",
                a.initial_symbols, a.max_symbols
            )));
        }
        if a.own_glyph_fragments > a.fragments_per_pop {
            return Err(SettingsError::Invalid(
                "ambient.own_glyph_fragments exceeds fragments_per_pop".into(),
            ));
        }
        if a.spawn_interval_ms <= 0.0 {
            return Err(SettingsError::Invalid("ambient.spawn_interval_ms must be > 0".into()));
        }

        let c = &self.celebration;
        if !(0.0..=1.0).contains(&c.ambient_launch_chance) {
            return Err(SettingsError::Invalid(
                "celebration.ambient_launch_chance must be within [0, 1]".into(),
            ));
        }
        for (name, delay) in [
            ("first_launch_delay_ms", c.first_launch_delay_ms),
            ("second_launch_delay_ms", c.second_launch_delay_ms),
            ("controls_delay_ms", c.controls_delay_ms),
        ] {
            if delay < 0.0 {
                return Err(SettingsError::Invalid(format!("celebration.{name} is negative")));
            }
        }
        for (name, target) in [("first_target", c.first_target), ("second_target", c.second_target)] {
            if target <= 0.0 || target >= 1.0 {
                return Err(SettingsError::Invalid(format!(
                    "celebration.{name} must be within (0, 1)"
                )));
            }
        }
        Ok(())
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "skyburst_settings";

    /// Load validated settings from LocalStorage, falling back to defaults
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let stored = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .and_then(|storage| storage.get_item(Self::STORAGE_KEY).ok().flatten());

        if let Some(json) = stored {
            match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring stored settings: {}", e),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Native builds have no settings store
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
