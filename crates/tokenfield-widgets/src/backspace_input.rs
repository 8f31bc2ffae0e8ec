//! `BackspaceInput`: single-line text entry that always reports backspace.

use serde::{Deserialize, Serialize};
use std::any::Any;
use tokenfield_core::{
    widget::LayoutResult, Brick, BrickAssertion, BrickVerification, Canvas, Color, Constraints,
    Event, Key, Point, Rect, Size, TextStyle, TypeId, Widget,
};

/// Something the owner of a [`BackspaceInput`] should react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSignal {
    /// The text changed
    Changed,
    /// Backspace was pressed, whether or not anything was deleted
    Backspace {
        /// The field was already empty when the key arrived
        was_empty: bool,
    },
    /// The submit key was pressed
    Submitted,
}

/// Keyboard layout hint for the text field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyboardType {
    /// General text entry
    #[default]
    Default,
    /// Email addresses
    EmailAddress,
    /// Phone numbers
    PhonePad,
    /// URLs
    Url,
    /// Names and phone numbers
    NamePhonePad,
}

/// Automatic capitalization hint for the text field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Autocapitalization {
    /// Never capitalize
    #[default]
    None,
    /// First letter of each word
    Words,
    /// First letter of each sentence
    Sentences,
    /// Every character
    AllCharacters,
}

/// Autocorrection hint for the text field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Autocorrection {
    /// Platform default
    Default,
    /// Autocorrect off
    #[default]
    No,
    /// Autocorrect on
    Yes,
}

/// Text entry that signals every backspace, including on an empty field.
#[derive(Serialize, Deserialize)]
pub struct BackspaceInput {
    /// Current text
    text: String,
    /// Placeholder shown while the text is empty
    placeholder: Option<String>,
    /// Text style
    text_style: TextStyle,
    /// Placeholder color
    placeholder_color: Color,
    /// Keyboard hint
    keyboard_type: KeyboardType,
    /// Capitalization hint
    autocapitalization: Autocapitalization,
    /// Autocorrection hint
    autocorrection: Autocorrection,
    /// Whether the field accepts input
    enabled: bool,
    /// Panel shown above the keyboard while editing
    #[serde(skip)]
    input_accessory: Option<Box<dyn Widget>>,
    /// Cached bounds
    #[serde(skip)]
    bounds: Rect,
    /// Whether focused
    #[serde(skip)]
    focused: bool,
    /// Cursor position (character index)
    #[serde(skip)]
    cursor: usize,
}

impl Default for BackspaceInput {
    fn default() -> Self {
        Self::new()
    }
}

impl BackspaceInput {
    /// Create an empty, enabled, unfocused field.
    #[must_use]
    pub fn new() -> Self {
        Self {
            text: String::new(),
            placeholder: None,
            text_style: TextStyle::default(),
            placeholder_color: Color::LIGHT_GRAY,
            keyboard_type: KeyboardType::default(),
            autocapitalization: Autocapitalization::default(),
            autocorrection: Autocorrection::default(),
            enabled: true,
            input_accessory: None,
            bounds: Rect::ZERO,
            focused: false,
            cursor: 0,
        }
    }

    /// Current text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text and move the cursor to the end.
    ///
    /// Programmatic changes emit no [`InputSignal`].
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.cursor = self.text.chars().count();
    }

    /// Clear the text.
    pub fn clear(&mut self) {
        self.set_text(String::new());
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Cursor position in characters.
    #[must_use]
    pub const fn cursor_position(&self) -> usize {
        self.cursor
    }

    /// Take focus. Returns `true` if focus changed.
    pub fn focus(&mut self) -> bool {
        if self.focused || !self.enabled {
            return false;
        }
        self.focused = true;
        self.cursor = self.text.chars().count();
        true
    }

    /// Drop focus. Returns `true` if focus changed.
    pub fn blur(&mut self) -> bool {
        std::mem::replace(&mut self.focused, false)
    }

    /// Check if focused.
    #[must_use]
    pub const fn is_focused(&self) -> bool {
        self.focused
    }

    /// Enable or disable input. Disabling drops focus.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.focused = false;
        }
    }

    /// Whether the field accepts input.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Placeholder text, if any.
    #[must_use]
    pub fn placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    /// Set or clear the placeholder.
    pub fn set_placeholder(&mut self, placeholder: Option<String>) {
        self.placeholder = placeholder;
    }

    /// Text style.
    #[must_use]
    pub const fn text_style(&self) -> &TextStyle {
        &self.text_style
    }

    /// Set the text style.
    pub fn set_text_style(&mut self, style: TextStyle) {
        self.text_style = style;
    }

    /// Keyboard hint.
    #[must_use]
    pub const fn keyboard_type(&self) -> KeyboardType {
        self.keyboard_type
    }

    /// Set the keyboard hint.
    pub fn set_keyboard_type(&mut self, keyboard_type: KeyboardType) {
        self.keyboard_type = keyboard_type;
    }

    /// Capitalization hint.
    #[must_use]
    pub const fn autocapitalization(&self) -> Autocapitalization {
        self.autocapitalization
    }

    /// Set the capitalization hint.
    pub fn set_autocapitalization(&mut self, autocapitalization: Autocapitalization) {
        self.autocapitalization = autocapitalization;
    }

    /// Autocorrection hint.
    #[must_use]
    pub const fn autocorrection(&self) -> Autocorrection {
        self.autocorrection
    }

    /// Set the autocorrection hint.
    pub fn set_autocorrection(&mut self, autocorrection: Autocorrection) {
        self.autocorrection = autocorrection;
    }

    /// Panel shown above the keyboard while editing.
    #[must_use]
    pub fn input_accessory(&self) -> Option<&dyn Widget> {
        self.input_accessory.as_deref()
    }

    /// Set the panel shown above the keyboard while editing.
    pub fn set_input_accessory(&mut self, accessory: Option<Box<dyn Widget>>) {
        self.input_accessory = accessory;
    }

    /// Whether the input accessory is currently presented.
    #[must_use]
    pub fn is_input_accessory_shown(&self) -> bool {
        self.focused && self.input_accessory.is_some()
    }

    /// Apply an event and report what happened.
    pub fn handle(&mut self, event: &Event) -> Vec<InputSignal> {
        if !self.enabled {
            return Vec::new();
        }

        let mut signals = Vec::new();
        match event {
            Event::FocusIn => {
                self.focus();
            }
            Event::FocusOut => {
                self.blur();
            }
            Event::TextInput { text } if self.focused => {
                if self.insert_text(text) {
                    signals.push(InputSignal::Changed);
                }
            }
            Event::KeyDown { key } if self.focused => match key {
                Key::Backspace => {
                    signals.push(InputSignal::Backspace {
                        was_empty: self.text.is_empty(),
                    });
                    if self.backspace() {
                        signals.push(InputSignal::Changed);
                    }
                }
                Key::Delete => {
                    if self.delete() {
                        signals.push(InputSignal::Changed);
                    }
                }
                Key::Left => self.cursor = self.cursor.saturating_sub(1),
                Key::Right => self.cursor = (self.cursor + 1).min(self.text.chars().count()),
                Key::Home => self.cursor = 0,
                Key::End => self.cursor = self.text.chars().count(),
                Key::Enter => signals.push(InputSignal::Submitted),
                Key::Escape | Key::Tab => {}
            },
            _ => {}
        }
        signals
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map_or(self.text.len(), |(offset, _)| offset)
    }

    fn insert_text(&mut self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        let at = self.byte_offset(self.cursor);
        self.text.insert_str(at, text);
        self.cursor += text.chars().count();
        true
    }

    fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let at = self.byte_offset(self.cursor);
        self.text.remove(at);
        true
    }

    fn delete(&mut self) -> bool {
        if self.cursor >= self.text.chars().count() {
            return false;
        }
        let at = self.byte_offset(self.cursor);
        self.text.remove(at);
        true
    }
}

impl Brick for BackspaceInput {
    fn brick_name(&self) -> &'static str {
        "BackspaceInput"
    }

    fn assertions(&self) -> Vec<BrickAssertion> {
        vec![BrickAssertion::Invariant("cursor within text")]
    }

    fn verify(&self) -> BrickVerification {
        let mut v = BrickVerification::new();
        let len = self.text.chars().count();
        v.check(
            BrickAssertion::Invariant("cursor within text"),
            self.cursor <= len,
            || format!("cursor {} past end of {len} characters", self.cursor),
        );
        v
    }
}

impl Widget for BackspaceInput {
    fn type_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn measure(&self, constraints: Constraints) -> Size {
        let size = self.text_style.measure(&self.text);
        constraints.constrain(Size::new(
            size.width.max(constraints.min_width),
            self.text_style.line_height(),
        ))
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
        let line = self.text_style.line_height();
        let position = Point::new(
            self.bounds.x,
            self.bounds.y + (self.bounds.height - line) / 2.0,
        );
        if self.text.is_empty() {
            if let Some(placeholder) = &self.placeholder {
                let style = self.text_style.with_color(self.placeholder_color);
                canvas.draw_text(placeholder, position, &style);
            }
        } else {
            canvas.draw_text(&self.text, position, &self.text_style);
        }
    }

    fn event(&mut self, event: &Event) -> Option<Box<dyn Any + Send>> {
        let signals = self.handle(event);
        if signals.is_empty() {
            None
        } else {
            Some(Box::new(signals))
        }
    }

    fn is_interactive(&self) -> bool {
        self.enabled
    }

    fn is_focusable(&self) -> bool {
        self.enabled
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokenfield_core::RecordingCanvas;

    fn focused() -> BackspaceInput {
        let mut input = BackspaceInput::new();
        input.focus();
        input
    }

    fn type_text(input: &mut BackspaceInput, text: &str) -> Vec<InputSignal> {
        input.handle(&Event::TextInput { text: text.into() })
    }

    fn press(input: &mut BackspaceInput, key: Key) -> Vec<InputSignal> {
        input.handle(&Event::KeyDown { key })
    }

    // =========================================================================
    // Construction
    // =========================================================================

    #[test]
    fn test_new_is_empty_and_unfocused() {
        let input = BackspaceInput::default();
        assert!(input.is_empty());
        assert!(!input.is_focused());
        assert!(input.is_enabled());
        assert_eq!(input.placeholder(), None);
        assert_eq!(input.keyboard_type(), KeyboardType::Default);
    }

    #[test]
    fn test_set_text_moves_cursor_to_end() {
        let mut input = BackspaceInput::new();
        input.set_text("héllo");
        assert_eq!(input.text(), "héllo");
        assert_eq!(input.cursor_position(), 5);
        input.clear();
        assert!(input.is_empty());
        assert_eq!(input.cursor_position(), 0);
    }

    // =========================================================================
    // Focus
    // =========================================================================

    #[test]
    fn test_focus_and_blur_report_change() {
        let mut input = BackspaceInput::new();
        assert!(input.focus());
        assert!(!input.focus());
        assert!(input.blur());
        assert!(!input.blur());
    }

    #[test]
    fn test_disabled_field_cannot_focus() {
        let mut input = focused();
        input.set_enabled(false);
        assert!(!input.is_focused());
        assert!(!input.focus());
        assert!(type_text(&mut input, "a").is_empty());
    }

    #[test]
    fn test_focus_events() {
        let mut input = BackspaceInput::new();
        input.handle(&Event::FocusIn);
        assert!(input.is_focused());
        input.handle(&Event::FocusOut);
        assert!(!input.is_focused());
    }

    // =========================================================================
    // Editing
    // =========================================================================

    #[test]
    fn test_typing_requires_focus() {
        let mut input = BackspaceInput::new();
        assert!(type_text(&mut input, "a").is_empty());
        assert!(input.is_empty());
    }

    #[test]
    fn test_typing_signals_change() {
        let mut input = focused();
        assert_eq!(type_text(&mut input, "ab"), vec![InputSignal::Changed]);
        assert_eq!(input.text(), "ab");
        assert_eq!(input.cursor_position(), 2);
    }

    #[test]
    fn test_backspace_on_empty_still_signals() {
        let mut input = focused();
        assert_eq!(
            press(&mut input, Key::Backspace),
            vec![InputSignal::Backspace { was_empty: true }]
        );
    }

    #[test]
    fn test_backspace_with_text_deletes_and_signals() {
        let mut input = focused();
        type_text(&mut input, "ab");
        assert_eq!(
            press(&mut input, Key::Backspace),
            vec![
                InputSignal::Backspace { was_empty: false },
                InputSignal::Changed
            ]
        );
        assert_eq!(input.text(), "a");
    }

    #[test]
    fn test_backspace_at_start_deletes_nothing() {
        let mut input = focused();
        type_text(&mut input, "ab");
        press(&mut input, Key::Home);
        assert_eq!(
            press(&mut input, Key::Backspace),
            vec![InputSignal::Backspace { was_empty: false }]
        );
        assert_eq!(input.text(), "ab");
    }

    #[test]
    fn test_cursor_movement_and_insert_multibyte() {
        let mut input = focused();
        type_text(&mut input, "aé");
        press(&mut input, Key::Left);
        type_text(&mut input, "ü");
        assert_eq!(input.text(), "aüé");
        press(&mut input, Key::Right);
        press(&mut input, Key::Right);
        assert_eq!(input.cursor_position(), 3);
        press(&mut input, Key::Home);
        assert_eq!(press(&mut input, Key::Delete), vec![InputSignal::Changed]);
        assert_eq!(input.text(), "üé");
        press(&mut input, Key::End);
        assert!(press(&mut input, Key::Delete).is_empty());
    }

    #[test]
    fn test_enter_submits() {
        let mut input = focused();
        assert_eq!(press(&mut input, Key::Enter), vec![InputSignal::Submitted]);
    }

    #[test]
    fn test_widget_event_boxes_signals() {
        let mut input = focused();
        let msg = input.event(&Event::KeyDown { key: Key::Backspace }).unwrap();
        let signals = msg.downcast_ref::<Vec<InputSignal>>().unwrap();
        assert_eq!(signals, &vec![InputSignal::Backspace { was_empty: true }]);
        assert!(input.event(&Event::KeyDown { key: Key::Tab }).is_none());
    }

    // =========================================================================
    // Accessory and hints
    // =========================================================================

    #[test]
    fn test_input_accessory_shown_only_while_focused() {
        let mut input = BackspaceInput::new();
        input.set_input_accessory(Some(Box::new(BackspaceInput::new())));
        assert!(input.input_accessory().is_some());
        assert!(!input.is_input_accessory_shown());
        input.focus();
        assert!(input.is_input_accessory_shown());
    }

    #[test]
    fn test_hint_setters() {
        let mut input = BackspaceInput::new();
        input.set_keyboard_type(KeyboardType::EmailAddress);
        input.set_autocapitalization(Autocapitalization::Words);
        input.set_autocorrection(Autocorrection::Yes);
        assert_eq!(input.keyboard_type(), KeyboardType::EmailAddress);
        assert_eq!(input.autocapitalization(), Autocapitalization::Words);
        assert_eq!(input.autocorrection(), Autocorrection::Yes);
    }

    #[test]
    fn test_hint_serde_names() {
        let json = serde_json::to_string(&KeyboardType::EmailAddress).unwrap();
        assert_eq!(json, "\"email_address\"");
    }

    // =========================================================================
    // Paint and verification
    // =========================================================================

    #[test]
    fn test_paint_placeholder_when_empty() {
        let mut input = BackspaceInput::new();
        input.set_placeholder(Some("To".into()));
        input.layout(Rect::new(0.0, 0.0, 100.0, 25.0));
        let mut canvas = RecordingCanvas::new();
        input.paint(&mut canvas);
        assert_eq!(canvas.texts(), vec!["To"]);
    }

    #[test]
    fn test_paint_nothing_when_collapsed() {
        let mut input = BackspaceInput::new();
        input.set_text("abc");
        input.layout(Rect::ZERO);
        let mut canvas = RecordingCanvas::new();
        input.paint(&mut canvas);
        assert!(canvas.is_empty());
    }

    #[test]
    fn test_verify_cursor() {
        let mut input = focused();
        type_text(&mut input, "abc");
        assert!(input.verify().is_valid());
    }
}
