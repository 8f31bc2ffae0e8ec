//! Host configuration for [`crate::TokenInput`], loadable from TOML.
//!
//! ```
//! use tokenfield_widgets::TokenInputConfig;
//!
//! let config = TokenInputConfig::from_toml_str(
//!     r##"
//!     field_name = "To:"
//!     text_color = "#336699"
//!
//!     [metrics]
//!     padding_left = 12.0
//!     "##,
//! )
//! .unwrap();
//! assert_eq!(config.metrics.padding_left, 12.0);
//! assert_eq!(config.metrics.standard_row_height, 25.0);
//! assert!(config.tokenize_on_end_editing);
//! ```

use crate::backspace_input::{Autocapitalization, Autocorrection, KeyboardType};
use crate::chip::ChipColors;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokenfield_core::{Color, ColorParseError};
use tokenfield_layout::{FlowMetrics, MetricsError};

/// Errors loading a [`TokenInputConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML did not parse or did not match the schema.
    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A color field is not a valid hex color.
    #[error("invalid color in `{field}`: {source}")]
    Color {
        /// Field name
        field: &'static str,
        /// Parse failure
        #[source]
        source: ColorParseError,
    },

    /// Layout geometry is invalid.
    #[error("invalid metrics: {0}")]
    Metrics(#[from] MetricsError),

    /// A font size is not a positive number.
    #[error("`{field}` must be positive (got {value})")]
    FontSize {
        /// Field name
        field: &'static str,
        /// Offending value
        value: f32,
    },
}

/// Everything a host can configure on a token input.
///
/// Every field has a default; colors are hex strings and fall back to the
/// tint-derived defaults when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenInputConfig {
    /// Layout geometry
    pub metrics: FlowMetrics,
    /// Chip and text font size
    pub font_size: f32,
    /// Field-name label font size; the chip font size when absent
    pub field_name_font_size: Option<f32>,
    /// Chip name color
    pub text_color: Option<String>,
    /// Chip name color while selected
    pub selected_text_color: Option<String>,
    /// Selected chip background
    pub selected_background_color: Option<String>,
    /// Separator glyph color
    pub separator_color: Option<String>,
    /// Field-name label color
    pub field_name_color: Option<String>,
    /// Placeholder shown while there are no tokens
    pub placeholder: Option<String>,
    /// Leading field name, such as "To:"
    pub field_name: Option<String>,
    /// Tokenize leftover text when editing ends
    pub tokenize_on_end_editing: bool,
    /// Draw a hairline along the bottom edge
    pub draw_bottom_border: bool,
    /// Keyboard hint
    pub keyboard_type: KeyboardType,
    /// Capitalization hint
    pub autocapitalization: Autocapitalization,
    /// Autocorrection hint
    pub autocorrection: Autocorrection,
}

impl Default for TokenInputConfig {
    fn default() -> Self {
        Self {
            metrics: FlowMetrics::default(),
            font_size: 17.0,
            field_name_font_size: None,
            text_color: None,
            selected_text_color: None,
            selected_background_color: None,
            separator_color: None,
            field_name_color: None,
            placeholder: None,
            field_name: None,
            tokenize_on_end_editing: true,
            draw_bottom_border: false,
            keyboard_type: KeyboardType::default(),
            autocapitalization: Autocapitalization::default(),
            autocorrection: Autocorrection::default(),
        }
    }
}

fn parse_color(
    field: &'static str,
    value: Option<&str>,
    fallback: Color,
) -> Result<Color, ConfigError> {
    value.map_or(Ok(fallback), |hex| {
        Color::from_hex(hex).map_err(|source| ConfigError::Color { field, source })
    })
}

impl TokenInputConfig {
    /// Parse and validate a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the TOML is malformed or any value is
    /// invalid.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to a TOML string.
    #[must_use]
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }

    /// Check geometry, font sizes and colors.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.metrics.validate()?;
        let sizes = [
            ("font_size", Some(self.font_size)),
            ("field_name_font_size", self.field_name_font_size),
        ];
        for (field, value) in sizes {
            if let Some(value) = value {
                if !value.is_finite() || value <= 0.0 {
                    return Err(ConfigError::FontSize { field, value });
                }
            }
        }
        self.chip_colors()?;
        self.field_name_color()?;
        Ok(())
    }

    /// Chip colors, with absent fields taken from the default tint.
    pub fn chip_colors(&self) -> Result<ChipColors, ConfigError> {
        let defaults = ChipColors::default();
        Ok(ChipColors {
            text: parse_color("text_color", self.text_color.as_deref(), defaults.text)?,
            selected_text: parse_color(
                "selected_text_color",
                self.selected_text_color.as_deref(),
                defaults.selected_text,
            )?,
            selected_background: parse_color(
                "selected_background_color",
                self.selected_background_color.as_deref(),
                defaults.selected_background,
            )?,
            separator: parse_color(
                "separator_color",
                self.separator_color.as_deref(),
                defaults.separator,
            )?,
        })
    }

    /// Field-name label color; light gray when absent.
    pub fn field_name_color(&self) -> Result<Color, ConfigError> {
        parse_color(
            "field_name_color",
            self.field_name_color.as_deref(),
            Color::LIGHT_GRAY,
        )
    }

    /// Field-name font size.
    #[must_use]
    pub fn field_name_font_size(&self) -> f32 {
        self.field_name_font_size.unwrap_or(self.font_size)
    }
}
