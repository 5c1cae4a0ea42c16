use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::generator::linear::{DEFAULT_MAX_ATTEMPTS, GeneratorRanges, MAX_ATTEMPTS_LIMIT};
use crate::session::practice::PracticeSettings;

pub const SUPPORTED_LOCALES: &[&str] = &["en", "ja"];

/// Largest magnitude accepted for any generator range bound.
pub const RANGE_LIMIT: i32 = 1_000_000;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default = "default_keep_practicing")]
    pub keep_practicing: bool,
    #[serde(default = "default_auto_advance_ms")]
    pub auto_advance_ms: u64,
    #[serde(default = "default_highlight_ms")]
    pub highlight_ms: u64,
    #[serde(default = "default_variable_min")]
    pub variable_min: i32,
    #[serde(default = "default_variable_max")]
    pub variable_max: i32,
    #[serde(default = "default_constant_min")]
    pub constant_min: i32,
    #[serde(default = "default_constant_max")]
    pub constant_max: i32,
    #[serde(default = "default_solution_min")]
    pub solution_min: i32,
    #[serde(default = "default_solution_max")]
    pub solution_max: i32,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}
fn default_locale() -> String {
    "en".to_string()
}
fn default_keep_practicing() -> bool {
    true
}
fn default_auto_advance_ms() -> u64 {
    1600
}
fn default_highlight_ms() -> u64 {
    900
}
fn default_variable_min() -> i32 {
    -9
}
fn default_variable_max() -> i32 {
    9
}
fn default_constant_min() -> i32 {
    -12
}
fn default_constant_max() -> i32 {
    12
}
fn default_solution_min() -> i32 {
    -9
}
fn default_solution_max() -> i32 {
    9
}
fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            locale: default_locale(),
            keep_practicing: default_keep_practicing(),
            auto_advance_ms: default_auto_advance_ms(),
            highlight_ms: default_highlight_ms(),
            variable_min: default_variable_min(),
            variable_max: default_variable_max(),
            constant_min: default_constant_min(),
            constant_max: default_constant_max(),
            solution_min: default_solution_min(),
            solution_max: default_solution_max(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("eqlab")
            .join("config.toml")
    }

    /// Repair values that would leave the generator without any valid draw
    /// or point at an unknown locale. Call after deserialization.
    pub fn validate(&mut self) {
        for bound in [
            &mut self.variable_min,
            &mut self.variable_max,
            &mut self.constant_min,
            &mut self.constant_max,
            &mut self.solution_min,
            &mut self.solution_max,
        ] {
            *bound = (*bound).clamp(-RANGE_LIMIT, RANGE_LIMIT);
        }
        // a variable range of only zero has no non-zero coefficient
        if self.variable_min > self.variable_max
            || (self.variable_min == 0 && self.variable_max == 0)
        {
            self.variable_min = default_variable_min();
            self.variable_max = default_variable_max();
        }
        if self.constant_min > self.constant_max {
            self.constant_min = default_constant_min();
            self.constant_max = default_constant_max();
        }
        if self.solution_min > self.solution_max {
            self.solution_min = default_solution_min();
            self.solution_max = default_solution_max();
        }
        if self.max_attempts == 0 {
            self.max_attempts = default_max_attempts();
        }
        self.max_attempts = self.max_attempts.min(MAX_ATTEMPTS_LIMIT);
        if !SUPPORTED_LOCALES.contains(&self.locale.as_str()) {
            self.locale = default_locale();
        }
    }

    pub fn ranges(&self) -> GeneratorRanges {
        GeneratorRanges {
            variable: self.variable_min..=self.variable_max,
            constant: self.constant_min..=self.constant_max,
            solution: self.solution_min..=self.solution_max,
        }
    }

    pub fn practice_settings(&self) -> PracticeSettings {
        PracticeSettings {
            keep_practicing: self.keep_practicing,
            auto_advance: Duration::from_millis(self.auto_advance_ms),
            highlight: Duration::from_millis(self.highlight_ms),
        }
    }
}
