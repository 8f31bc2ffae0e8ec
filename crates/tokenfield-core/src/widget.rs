//! Widget trait and related types.
//!
//! Widgets follow a verify-measure-layout-paint cycle:
//!
//! 1. **Verify**: check the widget's [`Brick`] assertions
//! 2. **Measure**: compute intrinsic size given constraints
//! 3. **Layout**: position self and children within allocated bounds
//! 4. **Paint**: generate draw commands for rendering
//!
//! # Examples
//!
//! ```
//! use tokenfield_core::{TextStyle, FontWeight, Size};
//!
//! let style = TextStyle::default();
//! assert_eq!(style.size, 17.0);
//! assert_eq!(style.weight, FontWeight::Normal);
//!
//! // Text is measured with a fixed advance per display column.
//! let size = style.measure("abcd");
//! assert!(size.width > 0.0);
//! assert_eq!(style.measure("").width, 0.0);
//! ```

use crate::brick::Brick;
use crate::constraints::Constraints;
use crate::event::Event;
use crate::geometry::{Point, Rect, Size};
use crate::Color;
use serde::{Deserialize, Serialize};
use std::any::Any;
use unicode_width::UnicodeWidthStr;

/// Unique identifier for a widget instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WidgetId(pub u64);

impl WidgetId {
    /// Create a new widget ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

/// Type identifier for widget types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(std::any::TypeId);

impl TypeId {
    /// Get the type ID for a type.
    #[must_use]
    pub fn of<T: 'static>() -> Self {
        Self(std::any::TypeId::of::<T>())
    }
}

/// Result of laying out a widget.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutResult {
    /// Computed size after layout
    pub size: Size,
}

/// Core widget trait that all UI elements implement.
pub trait Widget: Brick + Send + Sync {
    /// Get the type identifier for this widget type.
    fn type_id(&self) -> TypeId;

    /// Compute intrinsic size constraints.
    fn measure(&self, constraints: Constraints) -> Size;

    /// Position self (and children) within allocated bounds.
    fn layout(&mut self, bounds: Rect) -> LayoutResult;

    /// Generate draw commands for rendering.
    fn paint(&self, canvas: &mut dyn Canvas);

    /// Handle input events, optionally emitting a message.
    fn event(&mut self, event: &Event) -> Option<Box<dyn Any + Send>>;

    /// Check if this widget is interactive (can receive focus/events).
    fn is_interactive(&self) -> bool {
        false
    }

    /// Check if this widget can receive keyboard focus.
    fn is_focusable(&self) -> bool {
        false
    }

    /// Get the test ID for this widget (if any).
    fn test_id(&self) -> Option<&str> {
        None
    }

    /// Get the current bounds of this widget.
    fn bounds(&self) -> Rect {
        Rect::ZERO
    }
}

/// Canvas trait for paint operations.
///
/// This is a minimal abstraction over the rendering backend.
pub trait Canvas {
    /// Draw a filled rectangle.
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Draw a filled rectangle with rounded corners.
    fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, color: Color);

    /// Draw text.
    fn draw_text(&mut self, text: &str, position: Point, style: &TextStyle);

    /// Draw a line between two points.
    fn draw_line(&mut self, from: Point, to: Point, color: Color, width: f32);
}

/// Text style for rendering and measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Font size in pixels
    pub size: f32,
    /// Text color
    pub color: Color,
    /// Font weight
    pub weight: FontWeight,
}

impl TextStyle {
    /// Average advance of one display column, in ems.
    pub const ADVANCE_EM: f32 = 0.6;
    /// Line height, in ems.
    pub const LINE_HEIGHT_EM: f32 = 1.2;

    /// Create a style of the given size.
    #[must_use]
    pub fn sized(size: f32) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    /// Same style, different color.
    #[must_use]
    pub fn with_color(&self, color: Color) -> Self {
        Self {
            color,
            ..self.clone()
        }
    }

    /// Single-line size of `text` in this style.
    ///
    /// Wide (CJK) characters count as two columns.
    #[must_use]
    pub fn measure(&self, text: &str) -> Size {
        let columns = text.width() as f32;
        let bold = if self.weight == FontWeight::Bold {
            1.05
        } else {
            1.0
        };
        Size::new(
            columns * self.size * Self::ADVANCE_EM * bold,
            self.line_height(),
        )
    }

    /// Height of one line.
    #[must_use]
    pub fn line_height(&self) -> f32 {
        self.size * Self::LINE_HEIGHT_EM
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            size: 17.0,
            color: Color::BLACK,
            weight: FontWeight::Normal,
        }
    }
}

/// Font weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FontWeight {
    /// Light (300)
    Light,
    /// Normal (400)
    #[default]
    Normal,
    /// Bold (700)
    Bold,
}
