use std::fs;

use ratatui::style::Color;
use rust_embed::Embed;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::engine::term::CardStatus;

#[derive(Embed)]
#[folder = "assets/themes/"]
struct ThemeAssets;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ThemeColors {
    pub bg: String,
    pub fg: String,
    pub muted: String,
    pub accent: String,
    pub border: String,
    pub border_focused: String,
    pub header_bg: String,
    pub header_fg: String,
    pub banner_highlight: String,
    pub card_source: String,
    pub card_misplaced: String,
    pub card_sign_pending: String,
    pub card_correct: String,
    pub card_cursor_bg: String,
    pub field_active: String,
    pub field_match: String,
    pub warning: String,
    pub success: String,
}

impl Theme {
    pub fn load(name: &str) -> Option<Self> {
        if let Some(config_dir) = dirs::config_dir() {
            let user_theme_path = config_dir
                .join("eqlab")
                .join("themes")
                .join(format!("{name}.toml"));
            if let Ok(content) = fs::read_to_string(&user_theme_path) {
                match toml::from_str::<Theme>(&content) {
                    Ok(theme) => return Some(theme),
                    Err(err) => warn!(%err, theme = name, "ignoring malformed user theme"),
                }
            }
        }

        let filename = format!("{name}.toml");
        let file = ThemeAssets::get(&filename)?;
        let content = std::str::from_utf8(file.data.as_ref()).ok()?;
        toml::from_str::<Theme>(content).ok()
    }

    pub fn available_themes() -> Vec<String> {
        let mut names: Vec<String> = ThemeAssets::iter()
            .filter_map(|f| f.strip_suffix(".toml").map(|n| n.to_string()))
            .collect();
        names.sort();
        names
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::load("catppuccin-mocha").unwrap_or_else(|| Self {
            name: "default".to_string(),
            colors: ThemeColors::default(),
        })
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            bg: "#1e1e2e".to_string(),
            fg: "#cdd6f4".to_string(),
            muted: "#6c7086".to_string(),
            accent: "#89b4fa".to_string(),
            border: "#45475a".to_string(),
            border_focused: "#89b4fa".to_string(),
            header_bg: "#313244".to_string(),
            header_fg: "#cdd6f4".to_string(),
            banner_highlight: "#f9e2af".to_string(),
            card_source: "#bac2de".to_string(),
            card_misplaced: "#f38ba8".to_string(),
            card_sign_pending: "#f9e2af".to_string(),
            card_correct: "#a6e3a1".to_string(),
            card_cursor_bg: "#45475a".to_string(),
            field_active: "#89b4fa".to_string(),
            field_match: "#a6e3a1".to_string(),
            warning: "#fab387".to_string(),
            success: "#a6e3a1".to_string(),
        }
    }
}

impl ThemeColors {
    pub fn parse_color(hex: &str) -> Color {
        let hex = hex.trim_start_matches('#');
        if hex.len() == 6
            && let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            )
        {
            return Color::Rgb(r, g, b);
        }
        Color::Reset
    }

    pub fn card(&self, status: CardStatus) -> Color {
        match status {
            CardStatus::Source => self.card_source(),
            CardStatus::Misplaced => self.card_misplaced(),
            CardStatus::SignPending => self.card_sign_pending(),
            CardStatus::Correct => self.card_correct(),
        }
    }

    pub fn bg(&self) -> Color { Self::parse_color(&self.bg) }
    pub fn fg(&self) -> Color { Self::parse_color(&self.fg) }
    pub fn muted(&self) -> Color { Self::parse_color(&self.muted) }
    pub fn accent(&self) -> Color { Self::parse_color(&self.accent) }
    pub fn border(&self) -> Color { Self::parse_color(&self.border) }
    pub fn border_focused(&self) -> Color { Self::parse_color(&self.border_focused) }
    pub fn header_bg(&self) -> Color { Self::parse_color(&self.header_bg) }
    pub fn header_fg(&self) -> Color { Self::parse_color(&self.header_fg) }
    pub fn banner_highlight(&self) -> Color { Self::parse_color(&self.banner_highlight) }
    pub fn card_source(&self) -> Color { Self::parse_color(&self.card_source) }
    pub fn card_misplaced(&self) -> Color { Self::parse_color(&self.card_misplaced) }
    pub fn card_sign_pending(&self) -> Color { Self::parse_color(&self.card_sign_pending) }
    pub fn card_correct(&self) -> Color { Self::parse_color(&self.card_correct) }
    pub fn card_cursor_bg(&self) -> Color { Self::parse_color(&self.card_cursor_bg) }
    pub fn field_active(&self) -> Color { Self::parse_color(&self.field_active) }
    pub fn field_match(&self) -> Color { Self::parse_color(&self.field_match) }
    pub fn warning(&self) -> Color { Self::parse_color(&self.warning) }
    pub fn success(&self) -> Color { Self::parse_color(&self.success) }
}
