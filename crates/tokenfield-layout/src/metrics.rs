//! Geometry constants for the flow layout.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Spacing, padding and row geometry used by [`crate::FlowLayout`].
///
/// Every field has a default, so a partial TOML table deserializes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowMetrics {
    /// Horizontal space between consecutive chips
    pub hspace: f32,
    /// Indent of the text field after the last chip
    pub text_field_hspace: f32,
    /// Space between rows
    pub vertical_space_between_rows: f32,
    /// Narrowest text field allowed before it wraps to its own row
    pub minimum_text_field_width: f32,
    /// Top padding
    pub padding_top: f32,
    /// Bottom padding
    pub padding_bottom: f32,
    /// Left padding
    pub padding_left: f32,
    /// Right padding
    pub padding_right: f32,
    /// Height of one row
    pub standard_row_height: f32,
    /// Margin on either side of the field view and field-name label
    pub field_margin_x: f32,
    /// Smallest preferred height of the whole control
    pub minimum_view_height: f32,
}

impl FlowMetrics {
    /// Vertical distance from one row's top to the next.
    #[must_use]
    pub fn row_advance(&self) -> f32 {
        self.standard_row_height + self.vertical_space_between_rows
    }

    /// Widest a single chip may be for a view of `width`.
    #[must_use]
    pub fn max_line_width(&self, width: f32) -> f32 {
        width - self.padding_left - self.padding_right
    }

    /// Reject geometry the layout cannot honor.
    ///
    /// # Errors
    ///
    /// Returns the first offending field.
    pub fn validate(&self) -> Result<(), MetricsError> {
        let non_negative = [
            ("hspace", self.hspace),
            ("text_field_hspace", self.text_field_hspace),
            ("vertical_space_between_rows", self.vertical_space_between_rows),
            ("minimum_text_field_width", self.minimum_text_field_width),
            ("padding_top", self.padding_top),
            ("padding_bottom", self.padding_bottom),
            ("padding_left", self.padding_left),
            ("padding_right", self.padding_right),
            ("field_margin_x", self.field_margin_x),
            ("minimum_view_height", self.minimum_view_height),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(MetricsError::Negative { field, value });
            }
        }
        if !self.standard_row_height.is_finite() || self.standard_row_height <= 0.0 {
            return Err(MetricsError::RowHeight(self.standard_row_height));
        }
        Ok(())
    }
}

impl Default for FlowMetrics {
    fn default() -> Self {
        Self {
            hspace: 0.0,
            text_field_hspace: 4.0,
            vertical_space_between_rows: 4.0,
            minimum_text_field_width: 10.0,
            padding_top: 10.0,
            padding_bottom: 10.0,
            padding_left: 8.0,
            padding_right: 16.0,
            standard_row_height: 25.0,
            field_margin_x: 4.0,
            minimum_view_height: 45.0,
        }
    }
}

/// Invalid [`FlowMetrics`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MetricsError {
    /// A spacing or padding value is negative or not finite
    #[error("{field} must be a finite, non-negative number (got {value})")]
    Negative {
        /// Field name
        field: &'static str,
        /// Offending value
        value: f32,
    },
    /// Row height must be positive
    #[error("standard_row_height must be positive (got {0})")]
    RowHeight(f32),
}
