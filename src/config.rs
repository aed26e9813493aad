// ============================================================================
// CLOCK CONFIGURATION
// ============================================================================

use std::path::{Path, PathBuf};

use bon::Builder;
use serde::Deserialize;

use crate::error::ClockError;

/// Color representation for clock elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn as_tuple(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    pub const BLACK: Color = Color::new(0x00, 0x00, 0x00);
    pub const WHITE: Color = Color::new(0xff, 0xff, 0xff);
    pub const LAWN_GREEN: Color = Color::new(0x7c, 0xfc, 0x00);
    pub const DARK_RED: Color = Color::new(0x8b, 0x00, 0x00);
}

/// Appearance and behavior of the clock window.
///
/// Sizes are logical pixels at the configured window size and scale with the
/// actual framebuffer. Every field has a default, so a TOML file only needs
/// the keys it overrides.
#[derive(Debug, Clone, Builder, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    #[builder(default = "Clock".to_string())]
    pub title: String,

    // Window configuration
    #[builder(default = 1000)]
    pub window_width: usize,
    #[builder(default = 500)]
    pub window_height: usize,
    #[builder(default = 60.0)]
    pub max_framerate: f64,

    // Face configuration
    #[builder(default = 150.0)]
    pub clock_radius: f64,
    #[builder(default = Color::new(0xf4, 0xf1, 0xe8))]
    pub face_color: Color,
    #[builder(default = Color::LAWN_GREEN)]
    pub arc_color: Color,
    #[builder(default = 1.0)]
    pub arc_alpha: f32,
    #[builder(default = Color::WHITE)]
    pub background_color: Color,

    // Stroke configuration
    #[builder(default = 6.0)]
    pub hour_stroke_width: f64,
    #[builder(default = 12.0)]
    pub hour_stroke_height: f64,
    #[builder(default = 3.0)]
    pub minute_stroke_width: f64,
    #[builder(default = 6.0)]
    pub minute_stroke_height: f64,
    #[builder(default = Color::BLACK)]
    pub stroke_color: Color,

    // Numerals
    #[builder(default = 24.0)]
    pub numeral_font_size: f32,
    #[builder(default = 0.8)]
    pub numeral_radius_factor: f64,
    #[builder(default = Color::BLACK)]
    pub numeral_color: Color,

    // Hands
    #[builder(default = Color::BLACK)]
    pub hand_color: Color,
    #[builder(default = Color::DARK_RED)]
    pub second_hand_color: Color,

    // Controls
    #[builder(default = 10.0)]
    pub max_rate: f64,
    #[builder(default = 0.1)]
    pub rate_step: f64,
    #[builder(default = 20.0)]
    pub panel_font_size: f32,
    #[builder(default = 4.0)]
    pub notification_seconds: f64,
    #[builder(default = Color::new(0x33, 0x66, 0xcc))]
    pub accent_color: Color,
    #[builder(default = Color::new(0xa0, 0xa0, 0xa0))]
    pub disabled_color: Color,
    #[builder(default = Color::new(0xcc, 0x00, 0x00))]
    pub error_color: Color,

    // Font configuration
    /// Font file to use instead of a system font.
    pub font_path: Option<PathBuf>,
    /// System font family; falls back to the default sans-serif.
    pub font_family: Option<String>,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ClockConfig {
    /// Loads overrides from a TOML file on top of the defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ClockError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ClockError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&text)?;
        log::info!("loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self, ClockError> {
        Ok(toml::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_builder() {
        let config = ClockConfig::default();
        assert_eq!(config.window_width, 1000);
        assert_eq!(config.window_height, 500);
        assert_eq!(config.clock_radius, 150.0);
        assert_eq!(config.second_hand_color, Color::DARK_RED);
        assert!(config.font_path.is_none());
    }

    #[test]
    fn toml_overrides_merge_over_defaults() {
        let config = ClockConfig::from_toml(
            r#"
            title = "Desk clock"
            clock_radius = 200.0
            arc_color = { r = 10, g = 20, b = 30 }
            "#,
        )
        .unwrap();
        assert_eq!(config.title, "Desk clock");
        assert_eq!(config.clock_radius, 200.0);
        assert_eq!(config.arc_color, Color::new(10, 20, 30));
        assert_eq!(config.max_rate, 10.0);
    }

    #[test]
    fn bad_toml_is_an_error() {
        assert!(matches!(
            ClockConfig::from_toml("clock_radius = \"big\""),
            Err(ClockError::ConfigParse(_))
        ));
    }

    #[test]
    fn builder_overrides() {
        let config = ClockConfig::builder().max_rate(4.0).title("t".into()).build();
        assert_eq!(config.max_rate, 4.0);
        assert_eq!(config.title, "t");
    }
}
