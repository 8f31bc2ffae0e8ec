//! Token: one unit of entered data, rendered as a chip.

use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tokenfield_core::Color;

/// A display string plus opaque caller data.
///
/// Tokens compare (and hash) by display text only: two tokens with the same
/// text are the same token, whatever their base objects.
///
/// ```
/// use tokenfield_widgets::Token;
///
/// let a = Token::new("ada@example.com", 1_u32);
/// let b = Token::new("ada@example.com", "other data");
/// assert_eq!(a, b);
/// assert_eq!(a.base_object::<u32>(), Some(&1));
/// assert_eq!(b.base_object::<u32>(), None);
/// ```
#[derive(Clone)]
pub struct Token {
    display_text: String,
    base_object: Arc<dyn Any + Send + Sync>,
    text_color: Option<Color>,
    selected_text_color: Option<Color>,
    selected_background_color: Option<Color>,
}

impl Token {
    /// Create a token carrying `base_object`.
    #[must_use]
    pub fn new(display_text: impl Into<String>, base_object: impl Any + Send + Sync) -> Self {
        Self {
            display_text: display_text.into(),
            base_object: Arc::new(base_object),
            text_color: None,
            selected_text_color: None,
            selected_background_color: None,
        }
    }

    /// Create a token whose only payload is its text.
    #[must_use]
    pub fn from_text(display_text: impl Into<String>) -> Self {
        Self::new(display_text, ())
    }

    /// Override the container's text color for this token.
    #[must_use]
    pub const fn with_text_color(mut self, color: Color) -> Self {
        self.text_color = Some(color);
        self
    }

    /// Override the container's selected text color for this token.
    #[must_use]
    pub const fn with_selected_text_color(mut self, color: Color) -> Self {
        self.selected_text_color = Some(color);
        self
    }

    /// Override the container's selected background color for this token.
    #[must_use]
    pub const fn with_selected_background_color(mut self, color: Color) -> Self {
        self.selected_background_color = Some(color);
        self
    }

    /// Text shown in the chip.
    #[must_use]
    pub fn display_text(&self) -> &str {
        &self.display_text
    }

    /// The caller's data, if it is a `T`.
    #[must_use]
    pub fn base_object<T: Any>(&self) -> Option<&T> {
        self.base_object.downcast_ref::<T>()
    }

    /// The caller's data, untyped.
    #[must_use]
    pub fn base_object_any(&self) -> &(dyn Any + Send + Sync) {
        self.base_object.as_ref()
    }

    /// Per-token text color override.
    #[must_use]
    pub const fn text_color(&self) -> Option<Color> {
        self.text_color
    }

    /// Per-token selected text color override.
    #[must_use]
    pub const fn selected_text_color(&self) -> Option<Color> {
        self.selected_text_color
    }

    /// Per-token selected background color override.
    #[must_use]
    pub const fn selected_background_color(&self) -> Option<Color> {
        self.selected_background_color
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.display_text == other.display_text
    }
}

impl Eq for Token {}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.display_text.hash(state);
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("display_text", &self.display_text)
            .field("text_color", &self.text_color)
            .field("selected_text_color", &self.selected_text_color)
            .field("selected_background_color", &self.selected_background_color)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_text)
    }
}
