//! Label widget for the field name ("To:", "Cc:").

use serde::{Deserialize, Serialize};
use std::any::Any;
use tokenfield_core::{
    widget::LayoutResult, Brick, BrickAssertion, BrickVerification, Canvas, Color, Constraints,
    Event, Rect, Size, TextStyle, TypeId, Widget,
};

/// Single-line, non-interactive text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Label {
    /// Text content
    content: String,
    /// Text style
    style: TextStyle,
    /// Cached bounds
    #[serde(skip)]
    bounds: Rect,
}

impl Label {
    /// Create a label in light gray.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            style: TextStyle::default().with_color(Color::LIGHT_GRAY),
            bounds: Rect::ZERO,
        }
    }

    /// Set the text color.
    #[must_use]
    pub fn color(mut self, color: Color) -> Self {
        self.style.color = color;
        self
    }

    /// Set the font size.
    #[must_use]
    pub const fn font_size(mut self, size: f32) -> Self {
        self.style.size = size;
        self
    }

    /// The text content.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// The text style.
    #[must_use]
    pub const fn style(&self) -> &TextStyle {
        &self.style
    }

    /// Replace the text content.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    /// Replace the text style.
    pub fn set_style(&mut self, style: TextStyle) {
        self.style = style;
    }

    /// Size that fits the content on one line.
    #[must_use]
    pub fn size_to_fit(&self) -> Size {
        self.style.measure(&self.content)
    }
}

impl Widget for Label {
    fn type_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn measure(&self, constraints: Constraints) -> Size {
        constraints.constrain(self.size_to_fit())
    }

    fn layout(&mut self, bounds: Rect) -> LayoutResult {
        self.bounds = bounds;
        LayoutResult {
            size: bounds.size(),
        }
    }

    fn paint(&self, canvas: &mut dyn Canvas) {
        if self.bounds.is_empty() {
            return;
        }
        canvas.draw_text(&self.content, self.bounds.origin(), &self.style);
    }

    fn event(&mut self, _event: &Event) -> Option<Box<dyn Any + Send>> {
        None
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }
}

impl Brick for Label {
    fn brick_name(&self) -> &'static str {
        "Label"
    }

    fn assertions(&self) -> Vec<BrickAssertion> {
        vec![BrickAssertion::TextVisible]
    }

    fn verify(&self) -> BrickVerification {
        let mut v = BrickVerification::new();
        v.check(
            BrickAssertion::TextVisible,
            !self.content.is_empty(),
            || "label content is empty".into(),
        );
        v
    }
}
