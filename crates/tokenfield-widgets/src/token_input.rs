//! `TokenInput`: chips and a text field flowing across wrapped rows.
//!
//! The container owns the token list, one [`TokenChip`] per token at the same
//! index, and a [`BackspaceInput`]. It runs the flow layout on every bounds
//! change and token mutation, keeps chip selection exclusive, and drives the
//! backspace cascade:
//!
//! 1. Backspace on the empty text field schedules a deferred step.
//! 2. On the next [`TokenInput::run_deferred`] (or [`TokenInput::tick`]), if
//!    the field is still empty, the last chip is selected and takes focus.
//! 3. Backspace on the focused chip removes it; typing on it removes it and
//!    puts the typed text in the field.
//!
//! ```
//! use tokenfield_core::{Event, Key, Rect, Widget};
//! use tokenfield_widgets::{DisplayMode, Token, TokenInput};
//!
//! let mut input = TokenInput::new(DisplayMode::Edit);
//! input.layout(Rect::new(0.0, 0.0, 320.0, 45.0));
//! input.add_token(Token::from_text("ada@example.com"));
//! input.add_token(Token::from_text("grace@example.com"));
//!
//! input.begin_editing();
//! input.event(&Event::KeyDown { key: Key::Backspace });
//! input.run_deferred();
//! assert_eq!(input.selected_index(), Some(1));
//! assert!(!input.is_editing());
//! ```

use crate::backspace_input::{
    Autocapitalization, Autocorrection, BackspaceInput, InputSignal, KeyboardType,
};
use crate::chip::{ChipAction, ChipColors, TokenChip};
use crate::config::{ConfigError, TokenInputConfig};
use crate::context_menu::ContextMenu;
use crate::delegate::TokenInputDelegate;
use crate::label::Label;
use crate::token::Token;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::collections::HashSet;
use tokenfield_core::{
    Brick, BrickAssertion, BrickVerification, Canvas, Color, Constraints, DeferredQueue, Event,
    LayoutResult, Point, Rect, Size, TextStyle, TypeId, Widget,
};
use tokenfield_layout::{collapse, FlowFrames, FlowInput, FlowLayout, FlowMetrics, FlowPass};
use tracing::{debug, trace};

/// Whether the control accepts text entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    /// Chips plus an editable text field
    #[default]
    Edit,
    /// Read-only chips; selection and context menus still work
    View,
}

/// Messages [`TokenInput`] returns from [`Widget::event`].
#[derive(Debug, Clone, PartialEq)]
pub enum TokenInputMessage {
    /// A long press opened a context menu
    ContextMenuShown(ContextMenu),
    /// The submit key was consumed; `token` is set if the text was tokenized
    SubmitHandled {
        /// Token created from the free text, if any
        token: Option<Token>,
    },
}

/// Work scheduled for the next event-loop iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeferredAction {
    /// Select the last chip if the text field is still empty
    SelectLastToken,
}

const BORDER_WIDTH: f32 = 0.5;

/// Token input container.
pub struct TokenInput<D = ()> {
    mode: DisplayMode,
    delegate: D,
    layout: FlowLayout,
    tokens: Vec<Token>,
    chips: Vec<TokenChip>,
    text_field: BackspaceInput,
    field_label: Label,
    field_name: Option<String>,
    field_view: Option<Box<dyn Widget>>,
    accessory: Option<Box<dyn Widget>>,
    accessory_hidden: bool,
    placeholder: Option<String>,
    font: TextStyle,
    colors: ChipColors,
    tokenize_on_end_editing: bool,
    draw_bottom_border: bool,
    intrinsic_content_height: f32,
    height_zero: bool,
    force_reposition: bool,
    needs_display: bool,
    bounds: Rect,
    deferred: DeferredQueue<DeferredAction>,
    context_menu: Option<ContextMenu>,
}

impl TokenInput<()> {
    /// Create a container with no delegate.
    #[must_use]
    pub fn new(mode: DisplayMode) -> Self {
        Self::with_delegate(mode, ())
    }
}

impl Default for TokenInput<()> {
    fn default() -> Self {
        Self::new(DisplayMode::Edit)
    }
}

impl<D: TokenInputDelegate> TokenInput<D> {
    /// Create a container reporting to `delegate`.
    pub fn with_delegate(mode: DisplayMode, delegate: D) -> Self {
        let metrics = FlowMetrics::default();
        let font = TextStyle::default();
        let mut text_field = BackspaceInput::new();
        text_field.set_text_style(font.clone());
        text_field.set_enabled(mode == DisplayMode::Edit);

        let mut input = Self {
            mode,
            delegate,
            layout: FlowLayout::new(metrics),
            tokens: Vec::new(),
            chips: Vec::new(),
            text_field,
            field_label: Label::new(""),
            field_name: None,
            field_view: None,
            accessory: None,
            accessory_hidden: true,
            placeholder: None,
            font,
            colors: ChipColors::default(),
            tokenize_on_end_editing: true,
            draw_bottom_border: false,
            intrinsic_content_height: metrics.standard_row_height,
            height_zero: false,
            force_reposition: false,
            needs_display: false,
            bounds: Rect::ZERO,
            deferred: DeferredQueue::new(),
            context_menu: None,
        };
        input.reposition();
        input
    }

    /// Create a container configured from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the config does not validate.
    pub fn with_config(
        mode: DisplayMode,
        delegate: D,
        config: &TokenInputConfig,
    ) -> Result<Self, ConfigError> {
        let mut input = Self::with_delegate(mode, delegate);
        input.apply_config(config)?;
        Ok(input)
    }

    /// Apply every setting in `config` and re-run layout.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the config does not validate; nothing is
    /// applied in that case.
    pub fn apply_config(&mut self, config: &TokenInputConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let colors = config.chip_colors()?;
        let field_name_color = config.field_name_color()?;

        self.layout = FlowLayout::new(config.metrics);
        self.colors = colors;
        for chip in &mut self.chips {
            chip.set_colors(colors);
        }
        self.field_label.set_style(
            TextStyle::sized(config.field_name_font_size()).with_color(field_name_color),
        );
        self.tokenize_on_end_editing = config.tokenize_on_end_editing;
        self.draw_bottom_border = config.draw_bottom_border;
        self.text_field.set_keyboard_type(config.keyboard_type);
        self.text_field.set_autocapitalization(config.autocapitalization);
        self.text_field.set_autocorrection(config.autocorrection);
        self.set_placeholder(config.placeholder.clone());
        self.field_name = config.field_name.clone();
        self.field_label
            .set_content(self.field_name.clone().unwrap_or_default());
        self.set_font(TextStyle::sized(config.font_size));
        Ok(())
    }

    // =========================================================================
    // Tokens
    // =========================================================================

    /// Append `token` unless an equal one is present. Returns whether it was
    /// added.
    pub fn add_token(&mut self, token: Token) -> bool {
        if self.tokens.contains(&token) {
            return false;
        }

        let chip = TokenChip::new(token.clone(), self.mode, self.font.clone(), self.colors);
        self.tokens.push(token.clone());
        self.chips.push(chip);
        self.context_menu = None;
        debug!(
            text = token.display_text(),
            index = self.tokens.len() - 1,
            "token added"
        );

        self.text_field.clear();
        self.delegate.did_add_token(&token);
        // Clearing the field programmatically emits no input signal.
        self.delegate.did_change_text(self.text_field.text());

        self.update_placeholder();
        self.reposition();
        true
    }

    /// Remove the token equal to `token`. Returns whether one was removed.
    pub fn remove_token(&mut self, token: &Token) -> bool {
        self.tokens
            .iter()
            .position(|t| t == token)
            .and_then(|index| self.remove_token_at(index))
            .is_some()
    }

    /// Remove the token at `index`, if any.
    pub fn remove_token_at(&mut self, index: usize) -> Option<Token> {
        if index >= self.tokens.len() {
            return None;
        }
        self.chips.remove(index);
        let removed = self.tokens.remove(index);
        self.context_menu = None;
        debug!(text = removed.display_text(), index, "token removed");

        self.delegate.did_remove_token(&removed);
        self.update_placeholder();
        self.reposition();
        Some(removed)
    }

    /// Remove every token, notifying once per token in order, then lay out
    /// once.
    pub fn remove_all_tokens(&mut self) {
        let removed = std::mem::take(&mut self.tokens);
        self.chips.clear();
        self.context_menu = None;
        debug!(count = removed.len(), "tokens cleared");

        for token in &removed {
            self.delegate.did_remove_token(token);
        }
        self.update_placeholder();
        self.reposition();
    }

    /// Ask the delegate to turn the current free text into a token and add
    /// it.
    pub fn force_tokenize_current_text(&mut self) -> Option<Token> {
        self.tokenize_text_field_text()
    }

    fn tokenize_text_field_text(&mut self) -> Option<Token> {
        if self.text_field.is_empty() {
            return None;
        }
        let text = self.text_field.text().to_string();
        let token = self.delegate.token_for_text(&text)?;
        self.add_token(token.clone());
        self.delegate.did_change_text(self.text_field.text());
        Some(token)
    }

    /// Copy of the token list, in display order.
    #[must_use]
    pub fn all_tokens(&self) -> Vec<Token> {
        self.tokens.clone()
    }

    /// Number of tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether there are no tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Chip views, index-aligned with [`Self::all_tokens`].
    #[must_use]
    pub fn chips(&self) -> &[TokenChip] {
        &self.chips
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Select the chip at `index` and unselect every other chip.
    ///
    /// In edit mode the selected chip takes focus from the text field.
    pub fn select_token_view(&mut self, index: usize, animated: bool) {
        if index >= self.chips.len() {
            return;
        }
        let claimed = self.chips[index].set_selected(true, animated);
        for (i, chip) in self.chips.iter_mut().enumerate() {
            if i != index {
                chip.set_selected(false, animated);
            }
        }
        if claimed {
            self.blur_text_field();
        }
    }

    /// Unselect every chip.
    pub fn unselect_all(&mut self, animated: bool) {
        for chip in &mut self.chips {
            chip.set_selected(false, animated);
        }
    }

    /// Index of the selected chip, if any.
    #[must_use]
    pub fn selected_index(&self) -> Option<usize> {
        self.chips.iter().position(TokenChip::is_selected)
    }

    fn focused_chip(&self) -> Option<usize> {
        self.chips.iter().position(TokenChip::is_focused)
    }

    // =========================================================================
    // Editing
    // =========================================================================

    /// Focus the text field. No-op in view mode.
    pub fn begin_editing(&mut self) {
        if self.mode == DisplayMode::View {
            return;
        }
        self.unselect_all(false);
        self.focus_text_field();
        self.reposition();
    }

    /// Unfocus the text field. No-op in view mode.
    pub fn end_editing(&mut self) {
        if self.mode == DisplayMode::View {
            return;
        }
        self.blur_text_field();
        self.reposition();
    }

    /// Whether the text field has focus.
    #[must_use]
    pub const fn is_editing(&self) -> bool {
        self.text_field.is_focused()
    }

    /// The raw, untokenized text.
    #[must_use]
    pub fn text(&self) -> &str {
        self.text_field.text()
    }

    /// The text field, read-only.
    #[must_use]
    pub const fn text_field(&self) -> &BackspaceInput {
        &self.text_field
    }

    fn focus_text_field(&mut self) -> bool {
        if !self.text_field.focus() {
            return false;
        }
        self.accessory_hidden = false;
        self.delegate.did_begin_editing();
        self.unselect_all(true);
        self.update_separators();
        true
    }

    fn blur_text_field(&mut self) -> bool {
        if !self.text_field.blur() {
            return false;
        }
        self.accessory_hidden = true;
        self.delegate.did_end_editing();
        if self.tokenize_on_end_editing && self.mode == DisplayMode::Edit {
            self.tokenize_text_field_text();
        }
        self.reposition();
        true
    }

    fn view_was_tapped(&mut self) {
        self.unselect_all(true);
        if self.mode == DisplayMode::View {
            return;
        }
        self.begin_editing();
    }

    // =========================================================================
    // Deferred work
    // =========================================================================

    /// Run work deferred from earlier events. Returns how many steps ran.
    ///
    /// Hosts call this once per event-loop iteration, after dispatching
    /// events.
    pub fn run_deferred(&mut self) -> usize {
        let actions = self.deferred.drain();
        for action in &actions {
            match action {
                DeferredAction::SelectLastToken => self.select_last_token_if_empty(),
            }
        }
        actions.len()
    }

    /// Number of deferred steps waiting to run.
    #[must_use]
    pub fn pending_deferred(&self) -> usize {
        self.deferred.len()
    }

    fn select_last_token_if_empty(&mut self) {
        if !self.text_field.is_empty() {
            debug!("deferred backspace dropped: text was typed");
            return;
        }
        let Some(last) = self.chips.len().checked_sub(1) else {
            debug!("deferred backspace dropped: no tokens");
            return;
        };
        debug!(index = last, "deferred backspace selects last token");
        self.select_token_view(last, true);
        self.blur_text_field();
    }

    /// Run deferred work and advance selection fades by `dt` seconds.
    pub fn tick(&mut self, dt: f64) {
        self.run_deferred();
        for chip in &mut self.chips {
            chip.tick(dt);
        }
    }

    /// Whether any selection fade is in flight.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.chips.iter().any(TokenChip::is_animating)
    }

    // =========================================================================
    // Height
    // =========================================================================

    /// Pin the control to zero height, whatever its content.
    pub fn set_height_to_zero(&mut self) {
        self.height_zero = true;
        self.reposition();
    }

    /// Release the zero-height pin.
    pub fn set_height_to_auto(&mut self) {
        self.height_zero = false;
        self.reposition();
    }

    /// Whether the zero-height pin is set.
    #[must_use]
    pub const fn is_height_zero(&self) -> bool {
        self.height_zero
    }

    /// Content height computed by the last full layout pass.
    #[must_use]
    pub const fn intrinsic_content_height(&self) -> f32 {
        self.intrinsic_content_height
    }

    /// Height the control asks its host for.
    #[must_use]
    pub fn preferred_height(&self) -> f32 {
        self.layout
            .metrics()
            .minimum_view_height
            .max(self.intrinsic_content_height)
    }

    /// Run the next layout pass in full even at zero height.
    pub fn set_force_reposition(&mut self, force: bool) {
        self.force_reposition = force;
    }

    // =========================================================================
    // Context menu
    // =========================================================================

    /// The context menu currently shown, if any.
    #[must_use]
    pub const fn context_menu(&self) -> Option<&ContextMenu> {
        self.context_menu.as_ref()
    }

    /// Close the context menu.
    pub fn dismiss_context_menu(&mut self) {
        self.context_menu = None;
    }

    fn show_context_menu(&mut self, index: usize) -> Option<ContextMenu> {
        if !self.delegate.should_display_menu_items() {
            debug!(index, "context menu suppressed by delegate");
            return None;
        }
        let token = self.tokens.get(index)?.clone();
        let items = self.delegate.menu_items(&token);
        if items.is_empty() {
            debug!(index, "context menu suppressed: no items");
            return None;
        }
        let frame = self.chips[index].bounds();
        let menu = ContextMenu {
            token_index: index,
            token,
            anchor: Point::new(frame.x + frame.width / 2.0, frame.y),
            items,
        };
        debug!(index, items = menu.items.len(), "context menu shown");
        self.context_menu = Some(menu.clone());
        Some(menu)
    }

    // =========================================================================
    // Appearance
    // =========================================================================

    /// Set the three chip colors; per-token overrides still win.
    pub fn set_colors(&mut self, text: Color, selected_text: Color, selected_background: Color) {
        self.colors = ChipColors {
            text,
            selected_text,
            selected_background,
            separator: self.colors.separator,
        };
        for chip in &mut self.chips {
            chip.set_colors(self.colors);
        }
    }

    /// Current container chip colors.
    #[must_use]
    pub const fn colors(&self) -> &ChipColors {
        &self.colors
    }

    /// Set the font of the text field and every chip.
    pub fn set_font(&mut self, font: TextStyle) {
        self.text_field.set_text_style(font.clone());
        for chip in &mut self.chips {
            chip.set_font(font.clone());
        }
        self.font = font;
        self.reposition();
    }

    /// Current font.
    #[must_use]
    pub const fn font(&self) -> &TextStyle {
        &self.font
    }

    /// Set the field-name label font size.
    pub fn set_field_name_font_size(&mut self, size: f32) {
        let style = TextStyle::sized(size).with_color(self.field_label.style().color);
        self.field_label.set_style(style);
        self.reposition();
    }

    /// Set the field-name label color.
    pub fn set_field_name_color(&mut self, color: Color) {
        let style = self.field_label.style().with_color(color);
        self.field_label.set_style(style);
    }

    /// Set the field name ("To:"). Empty or `None` hides the label.
    pub fn set_field_name(&mut self, name: Option<String>) {
        if self.field_name == name {
            return;
        }
        self.field_label
            .set_content(name.clone().unwrap_or_default());
        self.field_name = name;
        self.reposition();
    }

    /// Current field name.
    #[must_use]
    pub fn field_name(&self) -> Option<&str> {
        self.field_name.as_deref()
    }

    /// The field-name label, while shown.
    #[must_use]
    pub fn field_label(&self) -> Option<&Label> {
        self.is_field_label_visible().then_some(&self.field_label)
    }

    fn is_field_label_visible(&self) -> bool {
        self.field_name.as_deref().is_some_and(|name| !name.is_empty())
    }

    /// Set or clear the leading field view.
    pub fn set_field_view(&mut self, view: Option<Box<dyn Widget>>) {
        if view.is_none() && self.field_view.is_none() {
            return;
        }
        self.field_view = view;
        self.reposition();
    }

    /// The leading field view.
    #[must_use]
    pub fn field_view(&self) -> Option<&dyn Widget> {
        self.field_view.as_deref()
    }

    /// Set or clear the trailing accessory. It stays hidden until editing
    /// begins.
    pub fn set_accessory_view(&mut self, view: Option<Box<dyn Widget>>) {
        if view.is_none() && self.accessory.is_none() {
            return;
        }
        self.accessory = view;
        self.accessory_hidden = true;
        self.reposition();
    }

    /// The trailing accessory.
    #[must_use]
    pub fn accessory_view(&self) -> Option<&dyn Widget> {
        self.accessory.as_deref()
    }

    /// Whether the accessory is set and currently shown.
    #[must_use]
    pub const fn is_accessory_visible(&self) -> bool {
        self.accessory.is_some() && !self.accessory_hidden
    }

    /// Set the placeholder, shown only while there are no tokens.
    pub fn set_placeholder(&mut self, placeholder: Option<String>) {
        if self.placeholder == placeholder {
            return;
        }
        self.placeholder = placeholder;
        self.update_placeholder();
    }

    /// Configured placeholder text.
    #[must_use]
    pub fn placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    fn update_placeholder(&mut self) {
        let shown = if self.tokens.is_empty() {
            self.placeholder.clone()
        } else {
            None
        };
        self.text_field.set_placeholder(shown);
    }

    /// Set the keyboard hint of the text field.
    pub fn set_keyboard_type(&mut self, keyboard_type: KeyboardType) {
        self.text_field.set_keyboard_type(keyboard_type);
    }

    /// Set the capitalization hint of the text field.
    pub fn set_autocapitalization(&mut self, autocapitalization: Autocapitalization) {
        self.text_field.set_autocapitalization(autocapitalization);
    }

    /// Set the autocorrection hint of the text field.
    pub fn set_autocorrection(&mut self, autocorrection: Autocorrection) {
        self.text_field.set_autocorrection(autocorrection);
    }

    /// Set the panel shown above the keyboard while editing.
    pub fn set_input_accessory(&mut self, view: Box<dyn Widget>) {
        self.text_field.set_input_accessory(Some(view));
    }

    /// Tokenize leftover text when editing ends.
    pub fn set_tokenize_on_end_editing(&mut self, tokenize: bool) {
        self.tokenize_on_end_editing = tokenize;
    }

    /// Whether leftover text is tokenized when editing ends.
    #[must_use]
    pub const fn tokenize_on_end_editing(&self) -> bool {
        self.tokenize_on_end_editing
    }

    /// Draw a hairline along the bottom edge.
    pub fn set_draw_bottom_border(&mut self, draw: bool) {
        if self.draw_bottom_border == draw {
            return;
        }
        self.draw_bottom_border = draw;
        self.needs_display = true;
    }

    /// Whether the bottom hairline is drawn.
    #[must_use]
    pub const fn draw_bottom_border(&self) -> bool {
        self.draw_bottom_border
    }

    /// Whether the control must be repainted.
    #[must_use]
    pub const fn needs_display(&self) -> bool {
        self.needs_display
    }

    /// Read and clear the repaint flag.
    pub fn take_needs_display(&mut self) -> bool {
        std::mem::replace(&mut self.needs_display, false)
    }

    /// Replace the layout geometry and re-run layout.
    pub fn set_metrics(&mut self, metrics: FlowMetrics) {
        self.layout = FlowLayout::new(metrics);
        self.reposition();
    }

    /// Layout geometry in use.
    #[must_use]
    pub const fn metrics(&self) -> &FlowMetrics {
        self.layout.metrics()
    }

    /// Display mode, fixed at construction.
    #[must_use]
    pub const fn mode(&self) -> DisplayMode {
        self.mode
    }

    /// The delegate.
    #[must_use]
    pub const fn delegate(&self) -> &D {
        &self.delegate
    }

    /// The delegate, mutably.
    pub fn delegate_mut(&mut self) -> &mut D {
        &mut self.delegate
    }

    // =========================================================================
    // Layout
    // =========================================================================

    fn reposition(&mut self) {
        let height = if self.height_zero {
            0.0
        } else {
            self.bounds.height
        };
        let chip_sizes: Vec<Size> = self.chips.iter().map(TokenChip::intrinsic_size).collect();
        let input = FlowInput {
            bounds: Size::new(self.bounds.width, height),
            force_reposition: self.force_reposition,
            field_view: self
                .field_view
                .as_ref()
                .map(|view| view.measure(Constraints::unbounded())),
            field_label: self
                .is_field_label_visible()
                .then(|| self.field_label.size_to_fit()),
            accessory: self
                .accessory
                .as_ref()
                .map(|view| view.measure(Constraints::unbounded())),
            chips: &chip_sizes,
            editing: self.text_field.is_focused(),
            editable: self.mode == DisplayMode::Edit,
        };

        match self.layout.compute(&input) {
            FlowPass::Collapsed => self.collapse_children(),
            FlowPass::Placed(frames) => {
                self.force_reposition = false;
                self.apply_frames(frames);
            }
        }
    }

    fn collapse_children(&mut self) {
        trace!(chips = self.chips.len(), "collapsing to zero height");
        for view in self.field_view.iter_mut().chain(self.accessory.iter_mut()) {
            let frame = collapse(view.bounds());
            view.layout(frame);
        }
        let frame = collapse(self.field_label.bounds());
        self.field_label.layout(frame);
        let frame = collapse(self.text_field.bounds());
        self.text_field.layout(frame);
        for chip in &mut self.chips {
            let frame = collapse(chip.bounds());
            chip.layout(frame);
        }
        self.update_separators();
    }

    /// Place children from a full pass. Flow frames are relative to the
    /// control; children live in the parent's coordinates, like `bounds`.
    fn apply_frames(&mut self, frames: FlowFrames) {
        let origin = self.bounds.origin();
        if let (Some(view), Some(frame)) = (self.field_view.as_mut(), frames.field_view) {
            view.layout(frame.offset(origin));
        }
        if let Some(frame) = frames.field_label {
            self.field_label.layout(frame.offset(origin));
        }
        if let (Some(view), Some(frame)) = (self.accessory.as_mut(), frames.accessory) {
            view.layout(frame.offset(origin));
        }
        for ((chip, frame), visible) in self
            .chips
            .iter_mut()
            .zip(&frames.chips)
            .zip(&frames.separators)
        {
            chip.layout(frame.offset(origin));
            chip.set_separator_visibility(*visible);
        }
        self.text_field.layout(frames.text_field.offset(origin));

        let old = self.intrinsic_content_height;
        self.intrinsic_content_height = frames.content_height;
        if old != frames.content_height {
            let preferred = self.preferred_height();
            debug!(old, new = frames.content_height, preferred, "height changed");
            self.delegate.did_change_height(preferred);
        }
        self.needs_display = true;
    }

    fn update_separators(&mut self) {
        let editing = self.text_field.is_focused();
        let last = self.chips.len().saturating_sub(1);
        for (i, chip) in self.chips.iter_mut().enumerate() {
            chip.set_separator_visibility(i != last || editing);
        }
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Apply an input event.
    pub fn handle(&mut self, event: &Event) -> Option<TokenInputMessage> {
        match event {
            Event::GestureTap { position, .. }
            | Event::MouseDown { position, .. }
            | Event::GestureLongPress { position } => self.handle_pointer(event, *position),
            Event::KeyDown { .. } | Event::TextInput { .. } => self.handle_key(event),
            Event::FocusIn => {
                if self.focus_text_field() {
                    self.reposition();
                }
                None
            }
            Event::FocusOut => {
                for chip in &mut self.chips {
                    chip.resign_focus();
                }
                self.blur_text_field();
                None
            }
        }
    }

    fn handle_pointer(&mut self, event: &Event, position: Point) -> Option<TokenInputMessage> {
        if self.height_zero || !self.bounds.contains_point(&position) {
            return None;
        }
        let hit = self
            .chips
            .iter_mut()
            .enumerate()
            .find_map(|(i, chip)| chip.handle(event).map(|action| (i, action)));
        if let Some((index, action)) = hit {
            return self.apply_chip_action(index, action);
        }
        if event.is_tap() {
            self.view_was_tapped();
        }
        None
    }

    fn handle_key(&mut self, event: &Event) -> Option<TokenInputMessage> {
        if let Some(index) = self.focused_chip() {
            let action = self.chips[index].handle(event)?;
            return self.apply_chip_action(index, action);
        }
        if !self.text_field.is_focused() {
            return None;
        }

        let mut message = None;
        for signal in self.text_field.handle(event) {
            match signal {
                InputSignal::Changed => self.delegate.did_change_text(self.text_field.text()),
                InputSignal::Backspace { was_empty: true } => {
                    trace!("backspace on empty field, deferring selection");
                    self.deferred.schedule(DeferredAction::SelectLastToken);
                }
                InputSignal::Backspace { was_empty: false } => {}
                InputSignal::Submitted => {
                    let token = self.tokenize_text_field_text();
                    message = Some(TokenInputMessage::SubmitHandled { token });
                }
            }
        }
        message
    }

    fn apply_chip_action(&mut self, index: usize, action: ChipAction) -> Option<TokenInputMessage> {
        match action {
            ChipAction::SelectionRequested => {
                self.select_token_view(index, true);
                None
            }
            ChipAction::MenuRequested => self
                .show_context_menu(index)
                .map(TokenInputMessage::ContextMenuShown),
            ChipAction::DeleteRequested { replacement } => {
                if self.mode == DisplayMode::View {
                    return None;
                }
                self.focus_text_field();
                if let Some(text) = replacement.filter(|t| !t.is_empty()) {
                    self.text_field.set_text(text);
                    self.delegate.did_change_text(self.text_field.text());
                }
                self.remove_token_at(index);
                None
            }
        }
    }
}

impl<D: TokenInputDelegate> Brick for TokenInput<D> {
    fn brick_name(&self) -> &'static str {
        "TokenInput"
    }

    fn assertions(&self) -> Vec<BrickAssertion> {
        vec![
            BrickAssertion::IndexAligned("tokens and chips"),
            BrickAssertion::Unique("tokens"),
            BrickAssertion::SingleSelection,
            BrickAssertion::Invariant("separators follow editing state"),
            BrickAssertion::Invariant("placeholder only while empty"),
        ]
    }

    fn verify(&self) -> BrickVerification {
        let mut v = BrickVerification::new();

        let aligned = self.tokens.len() == self.chips.len()
            && self
                .tokens
                .iter()
                .zip(&self.chips)
                .all(|(token, chip)| chip.token() == token);
        v.check(
            BrickAssertion::IndexAligned("tokens and chips"),
            aligned,
            || {
                format!(
                    "{} tokens but {} chips, or order differs",
                    self.tokens.len(),
                    self.chips.len()
                )
            },
        );

        let unique: HashSet<&str> = self.tokens.iter().map(Token::display_text).collect();
        v.check(
            BrickAssertion::Unique("tokens"),
            unique.len() == self.tokens.len(),
            || "duplicate display text in token list".into(),
        );

        let selected = self.chips.iter().filter(|c| c.is_selected()).count();
        v.check(BrickAssertion::SingleSelection, selected <= 1, || {
            format!("{selected} chips selected")
        });

        let editing = self.is_editing();
        let last = self.chips.len().saturating_sub(1);
        let separators_ok = self
            .chips
            .iter()
            .enumerate()
            .all(|(i, chip)| chip.is_separator_visible() == (i != last || editing));
        v.check(
            BrickAssertion::Invariant("separators follow editing state"),
            separators_ok,
            || "a chip separator disagrees with the editing state".into(),
        );

        v.check(
            BrickAssertion::Invariant("placeholder only while empty"),
            self.text_field.placeholder().is_none() || self.tokens.is_empty(),
            || "placeholder shown while tokens are present".into(),
        );
        v
    }
}

impl<D: TokenInputDelegate + 'static> Widget for TokenInput<D> {
    fn type_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn measure(&self, constraints: Constraints) -> Size {
        let width = if constraints.has_bounded_width() {
            constraints.max_width
        } else {
            self.bounds.width
        };
        let height = if self.height_zero {
            0.0
        } else {
            self.preferred_height()
        };
        constraints.constrain(Size::new(width, height))
    }

    fn layout(&mut self, bounds: Rect) -> LayoutResult {
        self.bounds = bounds;
        self.reposition();
        LayoutResult {
            size: bounds.size(),
        }
    }

    fn paint(&self, canvas: &mut dyn Canvas) {
        if self.draw_bottom_border {
            let y = self.bounds.max_y();
            canvas.draw_line(
                Point::new(self.bounds.x, y),
                Point::new(self.bounds.max_x(), y),
                Color::LIGHT_GRAY,
                BORDER_WIDTH,
            );
        }
        if let Some(view) = &self.field_view {
            view.paint(canvas);
        }
        if let Some(label) = self.field_label() {
            label.paint(canvas);
        }
        if let Some(view) = self.accessory.as_ref().filter(|_| !self.accessory_hidden) {
            view.paint(canvas);
        }
        for chip in &self.chips {
            chip.paint(canvas);
        }
        self.text_field.paint(canvas);
    }

    fn event(&mut self, event: &Event) -> Option<Box<dyn Any + Send>> {
        self.handle(event)
            .map(|message| Box::new(message) as Box<dyn Any + Send>)
    }

    fn is_interactive(&self) -> bool {
        true
    }

    fn is_focusable(&self) -> bool {
        self.mode == DisplayMode::Edit
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context_menu::MenuItem;
    use crate::delegate::{DelegateEvent, RecordingDelegate};
    use tokenfield_core::{DrawCommand, Key, RecordingCanvas};

    type Input = TokenInput<RecordingDelegate>;

    fn input_with(delegate: RecordingDelegate) -> Input {
        let mut input = TokenInput::with_delegate(DisplayMode::Edit, delegate);
        input.layout(Rect::new(0.0, 0.0, 320.0, 100.0));
        input.delegate_mut().clear();
        input
    }

    fn input() -> Input {
        input_with(RecordingDelegate::new())
    }

    fn with_tokens(names: &[&str]) -> Input {
        let mut input = input();
        for name in names {
            input.add_token(Token::from_text(*name));
        }
        input.delegate_mut().clear();
        input
    }

    fn type_text(input: &mut Input, text: &str) {
        input.handle(&Event::TextInput { text: text.into() });
    }

    fn backspace(input: &mut Input) {
        input.handle(&Event::KeyDown { key: Key::Backspace });
    }

    fn tap(input: &mut Input, at: Point) -> Option<TokenInputMessage> {
        input.handle(&Event::GestureTap {
            position: at,
            count: 1,
        })
    }

    fn center(rect: Rect) -> Point {
        Point::new(rect.x + rect.width / 2.0, rect.y + rect.height / 2.0)
    }

    // =========================================================================
    // Construction
    // =========================================================================

    #[test]
    fn test_new_defaults() {
        let input = TokenInput::default();
        assert_eq!(input.mode(), DisplayMode::Edit);
        assert!(input.is_empty());
        assert!(!input.is_editing());
        assert!(input.tokenize_on_end_editing());
        assert_eq!(input.intrinsic_content_height(), 25.0);
        assert_eq!(input.preferred_height(), 45.0);
        assert_eq!(input.colors(), &ChipColors::default());
        assert_eq!(input.font().size, 17.0);
    }

    #[test]
    fn test_view_mode_disables_text_field() {
        let input = TokenInput::new(DisplayMode::View);
        assert!(!input.text_field().is_enabled());
        assert!(!input.is_focusable());
    }

    #[test]
    fn test_with_config_applies_settings() {
        let config = TokenInputConfig {
            placeholder: Some("Add".into()),
            field_name: Some("To:".into()),
            font_size: 10.0,
            draw_bottom_border: true,
            tokenize_on_end_editing: false,
            text_color: Some("#000000".into()),
            keyboard_type: KeyboardType::EmailAddress,
            ..TokenInputConfig::default()
        };
        let input = TokenInput::with_config(DisplayMode::Edit, (), &config).unwrap();
        assert_eq!(input.placeholder(), Some("Add"));
        assert_eq!(input.text_field().placeholder(), Some("Add"));
        assert_eq!(input.field_name(), Some("To:"));
        assert!(input.field_label().is_some());
        assert_eq!(input.font().size, 10.0);
        assert!(input.draw_bottom_border());
        assert!(!input.tokenize_on_end_editing());
        assert_eq!(input.colors().text, Color::BLACK);
        assert_eq!(input.text_field().keyboard_type(), KeyboardType::EmailAddress);
    }

    #[test]
    fn test_with_config_rejects_bad_color() {
        let config = TokenInputConfig {
            text_color: Some("nope".into()),
            ..TokenInputConfig::default()
        };
        assert!(TokenInput::with_config(DisplayMode::Edit, (), &config).is_err());
    }

    // =========================================================================
    // Adding and removing tokens
    // =========================================================================

    #[test]
    fn test_add_token_notifies_and_clears_text() {
        let mut input = input();
        input.begin_editing();
        type_text(&mut input, "ada");
        input.delegate_mut().clear();

        assert!(input.add_token(Token::from_text("ada@example.com")));
        assert_eq!(input.text(), "");
        assert_eq!(input.len(), 1);
        assert_eq!(input.chips()[0].display_text(), "ada@example.com");
        let events = &input.delegate().events;
        assert_eq!(
            events[..2],
            [
                DelegateEvent::TokenAdded(Token::from_text("ada@example.com")),
                DelegateEvent::TextChanged(String::new()),
            ]
        );
    }

    #[test]
    fn test_add_duplicate_is_noop() {
        let mut input = with_tokens(&["a"]);
        assert!(!input.add_token(Token::new("a", 42_u8)));
        assert_eq!(input.len(), 1);
        assert!(input.delegate().events.is_empty());
    }

    #[test]
    fn test_remove_token_by_value() {
        let mut input = with_tokens(&["a", "b", "c"]);
        assert!(input.remove_token(&Token::from_text("b")));
        assert!(!input.remove_token(&Token::from_text("zzz")));
        let names: Vec<_> = input.chips().iter().map(TokenChip::display_text).collect();
        assert_eq!(names, ["a", "c"]);
        assert_eq!(input.delegate().removed(), vec![&Token::from_text("b")]);
    }

    #[test]
    fn test_remove_token_at_out_of_range() {
        let mut input = with_tokens(&["a"]);
        assert!(input.remove_token_at(3).is_none());
        assert_eq!(input.len(), 1);
    }

    #[test]
    fn test_all_tokens_is_a_copy() {
        let mut input = with_tokens(&["a", "b"]);
        let mut copy = input.all_tokens();
        copy.clear();
        assert_eq!(input.len(), 2);
        input.remove_all_tokens();
        assert!(input.all_tokens().is_empty());
    }

    #[test]
    fn test_placeholder_hidden_while_tokens_present() {
        let mut input = input();
        input.set_placeholder(Some("Recipients".into()));
        assert_eq!(input.text_field().placeholder(), Some("Recipients"));
        input.add_token(Token::from_text("a"));
        assert_eq!(input.text_field().placeholder(), None);
        input.remove_all_tokens();
        assert_eq!(input.text_field().placeholder(), Some("Recipients"));
    }

    // =========================================================================
    // Tokenizing
    // =========================================================================

    #[test]
    fn test_force_tokenize_without_delegate_support_does_nothing() {
        let mut input = input();
        input.begin_editing();
        type_text(&mut input, "ada");
        assert!(input.force_tokenize_current_text().is_none());
        assert_eq!(input.text(), "ada");
        assert!(input.is_empty());
    }

    #[test]
    fn test_force_tokenize_empty_text_does_nothing() {
        let mut input = input_with(RecordingDelegate::new().tokenizing());
        assert!(input.force_tokenize_current_text().is_none());
    }

    #[test]
    fn test_submit_tokenizes_and_is_handled() {
        let mut input = input_with(RecordingDelegate::new().tokenizing());
        input.begin_editing();
        type_text(&mut input, "ada");
        let msg = input.handle(&Event::KeyDown { key: Key::Enter });
        assert_eq!(
            msg,
            Some(TokenInputMessage::SubmitHandled {
                token: Some(Token::from_text("ada"))
            })
        );
        assert_eq!(input.all_tokens(), vec![Token::from_text("ada")]);
        assert_eq!(input.text(), "");
        assert!(input.is_editing());
    }

    #[test]
    fn test_submit_without_text_is_still_handled() {
        let mut input = input();
        input.begin_editing();
        let msg = input.handle(&Event::KeyDown { key: Key::Enter });
        assert_eq!(msg, Some(TokenInputMessage::SubmitHandled { token: None }));
    }

    #[test]
    fn test_end_editing_tokenizes_leftover_text() {
        let mut input = input_with(RecordingDelegate::new().tokenizing());
        input.begin_editing();
        type_text(&mut input, "grace");
        input.end_editing();
        assert_eq!(input.all_tokens(), vec![Token::from_text("grace")]);
        assert!(input
            .delegate()
            .events
            .contains(&DelegateEvent::EndedEditing));
    }

    #[test]
    fn test_end_editing_keeps_text_when_flag_off() {
        let mut input = input_with(RecordingDelegate::new().tokenizing());
        input.set_tokenize_on_end_editing(false);
        input.begin_editing();
        type_text(&mut input, "grace");
        input.end_editing();
        assert!(input.is_empty());
        assert_eq!(input.text(), "grace");
    }

    // =========================================================================
    // Editing and selection
    // =========================================================================

    #[test]
    fn test_begin_editing_notifies_and_shows_accessory() {
        let mut input = input();
        input.set_accessory_view(Some(Box::new(Label::new("+"))));
        assert!(!input.is_accessory_visible());
        input.begin_editing();
        assert!(input.is_editing());
        assert!(input.is_accessory_visible());
        assert_eq!(input.delegate().events[0], DelegateEvent::BeganEditing);
        input.end_editing();
        assert!(!input.is_accessory_visible());
    }

    #[test]
    fn test_begin_editing_unselects_without_animation() {
        let mut input = with_tokens(&["a", "b"]);
        input.select_token_view(0, true);
        input.begin_editing();
        assert_eq!(input.selected_index(), None);
        assert!(!input.is_animating());
    }

    #[test]
    fn test_view_mode_editing_is_inert() {
        let mut input = TokenInput::with_delegate(DisplayMode::View, RecordingDelegate::new());
        input.layout(Rect::new(0.0, 0.0, 320.0, 100.0));
        input.begin_editing();
        assert!(!input.is_editing());
        assert!(!input
            .delegate()
            .events
            .contains(&DelegateEvent::BeganEditing));
    }

    #[test]
    fn test_select_token_view_is_exclusive() {
        let mut input = with_tokens(&["a", "b", "c"]);
        input.select_token_view(0, false);
        input.select_token_view(2, false);
        assert_eq!(input.selected_index(), Some(2));
        assert_eq!(input.chips().iter().filter(|c| c.is_selected()).count(), 1);
        input.unselect_all(false);
        assert_eq!(input.selected_index(), None);
    }

    #[test]
    fn test_selecting_chip_takes_focus_from_text_field() {
        let mut input = with_tokens(&["a", "b"]);
        input.begin_editing();
        input.select_token_view(0, true);
        assert!(!input.is_editing());
        assert!(input.chips()[0].is_focused());
    }

    #[test]
    fn test_tap_on_chip_selects_it() {
        let mut input = with_tokens(&["a", "b"]);
        let at = center(input.chips()[1].bounds());
        assert!(tap(&mut input, at).is_none());
        assert_eq!(input.selected_index(), Some(1));
    }

    #[test]
    fn test_tap_on_background_begins_editing() {
        let mut input = with_tokens(&["a"]);
        input.select_token_view(0, false);
        tap(&mut input, Point::new(300.0, 90.0));
        assert_eq!(input.selected_index(), None);
        assert!(input.is_editing());
    }

    #[test]
    fn test_tap_in_view_mode_only_unselects() {
        let mut input = TokenInput::new(DisplayMode::View);
        input.layout(Rect::new(0.0, 0.0, 320.0, 100.0));
        input.add_token(Token::from_text("a"));
        let at = center(input.chips()[0].bounds());
        input.handle(&Event::GestureTap {
            position: at,
            count: 1,
        });
        assert_eq!(input.selected_index(), Some(0));
        assert!(!input.chips()[0].is_focused());
        input.handle(&Event::GestureTap {
            position: Point::new(300.0, 90.0),
            count: 1,
        });
        assert_eq!(input.selected_index(), None);
        assert!(!input.is_editing());
    }

    #[test]
    fn test_focus_events() {
        let mut input = input();
        input.handle(&Event::FocusIn);
        assert!(input.is_editing());
        input.handle(&Event::FocusOut);
        assert!(!input.is_editing());
        let focus: Vec<_> = input
            .delegate()
            .events
            .iter()
            .filter(|e| !matches!(e, DelegateEvent::HeightChanged(_)))
            .collect();
        assert_eq!(
            focus,
            [&DelegateEvent::BeganEditing, &DelegateEvent::EndedEditing]
        );
    }

    // =========================================================================
    // Backspace cascade
    // =========================================================================

    #[test]
    fn test_backspace_with_text_does_not_schedule() {
        let mut input = with_tokens(&["a"]);
        input.begin_editing();
        type_text(&mut input, "xy");
        backspace(&mut input);
        assert_eq!(input.pending_deferred(), 0);
        assert_eq!(input.text(), "x");
    }

    #[test]
    fn test_deferred_step_dropped_when_text_typed() {
        let mut input = with_tokens(&["a", "b"]);
        input.begin_editing();
        backspace(&mut input);
        assert_eq!(input.pending_deferred(), 1);
        type_text(&mut input, "z");
        assert_eq!(input.run_deferred(), 1);
        assert_eq!(input.selected_index(), None);
        assert!(input.is_editing());
    }

    #[test]
    fn test_deferred_step_without_tokens_is_noop() {
        let mut input = input();
        input.begin_editing();
        backspace(&mut input);
        input.tick(0.0);
        assert!(input.is_editing());
        assert_eq!(input.pending_deferred(), 0);
    }

    #[test]
    fn test_focused_chip_backspace_removes_and_refocuses() {
        let mut input = with_tokens(&["a", "b"]);
        input.select_token_view(1, false);
        backspace(&mut input);
        assert_eq!(input.all_tokens(), vec![Token::from_text("a")]);
        assert!(input.is_editing());
        assert_eq!(input.text(), "");
        assert_eq!(input.delegate().removed(), vec![&Token::from_text("b")]);
    }

    #[test]
    fn test_view_mode_chip_cannot_be_deleted() {
        let mut input = TokenInput::new(DisplayMode::View);
        input.layout(Rect::new(0.0, 0.0, 320.0, 100.0));
        input.add_token(Token::from_text("a"));
        input.select_token_view(0, false);
        input.handle(&Event::KeyDown { key: Key::Backspace });
        assert_eq!(input.len(), 1);
    }

    // =========================================================================
    // Context menu
    // =========================================================================

    #[test]
    fn test_long_press_without_permission_shows_nothing() {
        let mut input = with_tokens(&["a"]);
        let at = center(input.chips()[0].bounds());
        let msg = input.handle(&Event::GestureLongPress { position: at });
        assert!(msg.is_none());
        assert!(input.context_menu().is_none());
    }

    #[test]
    fn test_long_press_with_empty_items_shows_nothing() {
        let mut input = input_with(RecordingDelegate::new().with_menu(Vec::new()));
        input.add_token(Token::from_text("a"));
        let at = center(input.chips()[0].bounds());
        assert!(input
            .handle(&Event::GestureLongPress { position: at })
            .is_none());
    }

    #[test]
    fn test_long_press_shows_menu() {
        let items = vec![MenuItem::new("Copy", "copy")];
        let mut input = input_with(RecordingDelegate::new().with_menu(items.clone()));
        input.add_token(Token::from_text("a"));
        input.add_token(Token::from_text("b"));
        let frame = input.chips()[1].bounds();
        let msg = input.handle(&Event::GestureLongPress {
            position: center(frame),
        });
        let Some(TokenInputMessage::ContextMenuShown(menu)) = msg else {
            panic!("expected a context menu");
        };
        assert_eq!(menu.token_index, 1);
        assert_eq!(menu.token, Token::from_text("b"));
        assert_eq!(menu.items, items);
        assert_eq!(menu.anchor, Point::new(frame.x + frame.width / 2.0, frame.y));
        assert_eq!(input.context_menu(), Some(&menu));

        input.dismiss_context_menu();
        assert!(input.context_menu().is_none());
    }

    #[test]
    fn test_token_mutation_dismisses_menu() {
        let delegate = RecordingDelegate::new().with_menu(vec![MenuItem::new("Remove", "remove")]);
        let mut input = input_with(delegate);
        input.add_token(Token::from_text("a"));
        let at = center(input.chips()[0].bounds());
        input.handle(&Event::GestureLongPress { position: at });
        assert!(input.context_menu().is_some());
        input.add_token(Token::from_text("b"));
        assert!(input.context_menu().is_none());
    }

    // =========================================================================
    // Layout and height
    // =========================================================================

    #[test]
    fn test_height_change_reported_once() {
        let mut input = input();
        // 3 * "abcdefghij" chips: 10 columns * 17 * 0.6 + 8 = 110 wide.
        input.add_token(Token::from_text("abcdefghij"));
        input.add_token(Token::from_text("bcdefghijk"));
        input.delegate_mut().clear();
        input.add_token(Token::from_text("cdefghijkl"));
        // The third chip wraps onto a second row.
        let heights = input.delegate().heights();
        assert_eq!(heights.len(), 1);
        assert!(heights[0] > 45.0);

        input.delegate_mut().clear();
        input.layout(Rect::new(0.0, 0.0, 320.0, 100.0));
        assert!(input.delegate().heights().is_empty());
    }

    #[test]
    fn test_measure_uses_preferred_height() {
        let mut input = input();
        let size = input.measure(Constraints::loose(Size::new(320.0, 500.0)));
        assert_eq!(size.width, 320.0);
        assert_eq!(size.height, input.preferred_height());
        input.set_height_to_zero();
        let size = input.measure(Constraints::loose(Size::new(320.0, 500.0)));
        assert_eq!(size.height, 0.0);
        input.set_height_to_auto();
        assert!(!input.is_height_zero());
    }

    #[test]
    fn test_text_field_frame_only_while_editing() {
        let mut input = with_tokens(&["a"]);
        assert!(input.text_field().bounds().is_empty());
        input.begin_editing();
        let frame = input.text_field().bounds();
        assert_eq!(frame.height, 25.0);
        assert!(frame.x > input.chips()[0].bounds().max_x());
    }

    #[test]
    fn test_field_name_label_precedes_chips() {
        let mut input = with_tokens(&["a"]);
        input.set_field_name(Some("To:".into()));
        let label = input.field_label().map(Widget::bounds).unwrap();
        assert_eq!(label.x, 12.0);
        assert!(input.chips()[0].bounds().x >= label.max_x());

        input.set_field_name(Some(String::new()));
        assert!(input.field_label().is_none());
        assert_eq!(input.chips()[0].bounds().x, 8.0);
    }

    #[test]
    fn test_accessory_pinned_right_on_first_row() {
        let mut input = with_tokens(&["a"]);
        input.set_accessory_view(Some(Box::new(Label::new("+").font_size(20.0))));
        let frame = input.accessory_view().map(Widget::bounds).unwrap();
        // 320 - 16 - 12
        assert_eq!(frame.x, 292.0);
        assert_eq!(frame.y, 10.0);
    }

    #[test]
    fn test_force_reposition_lays_out_at_zero_height() {
        let mut input = TokenInput::new(DisplayMode::Edit);
        input.add_token(Token::from_text("a"));
        assert_eq!(input.chips()[0].bounds().x, 0.0);
        input.set_force_reposition(true);
        input.layout(Rect::new(0.0, 0.0, 320.0, 0.0));
        assert_eq!(input.chips()[0].bounds().x, 8.0);
        // Cleared by the full pass.
        input.layout(Rect::new(0.0, 0.0, 320.0, 0.0));
        assert_eq!(input.chips()[0].bounds().height, 0.0);
    }

    #[test]
    fn test_set_font_resizes_chips() {
        let mut input = with_tokens(&["abc"]);
        let before = input.chips()[0].bounds().width;
        input.set_font(TextStyle::sized(34.0));
        assert!(input.chips()[0].bounds().width > before);
        assert_eq!(input.text_field().text_style().size, 34.0);
    }

    #[test]
    fn test_set_colors_reaches_chips() {
        let mut input = with_tokens(&["a"]);
        input.set_colors(Color::BLACK, Color::WHITE, Color::BLACK);
        assert_eq!(input.chips()[0].colors().text, Color::BLACK);
        input.add_token(Token::from_text("b"));
        assert_eq!(input.chips()[1].colors().selected_background, Color::BLACK);
    }

    // =========================================================================
    // Paint and verification
    // =========================================================================

    #[test]
    fn test_bottom_border_painted_when_enabled() {
        let mut input = with_tokens(&["a"]);
        assert!(input.take_needs_display());
        assert!(!input.needs_display());
        input.set_draw_bottom_border(true);
        assert!(input.needs_display());

        let mut canvas = RecordingCanvas::new();
        input.paint(&mut canvas);
        assert!(matches!(
            canvas.commands()[0],
            DrawCommand::Line { width, .. } if width == 0.5
        ));
    }

    #[test]
    fn test_verify_holds_through_interaction() {
        let mut input = with_tokens(&["a", "b", "c"]);
        assert!(input.verify().is_valid());
        input.begin_editing();
        assert!(input.verify().is_valid());
        backspace(&mut input);
        input.run_deferred();
        assert!(input.verify().is_valid());
        type_text(&mut input, "x");
        assert!(input.verify().is_valid());
        assert_eq!(input.assertions().len(), 5);
    }

    #[test]
    fn test_widget_event_boxes_message() {
        let mut input = input();
        input.begin_editing();
        let msg = input.event(&Event::KeyDown { key: Key::Enter }).unwrap();
        assert!(msg.downcast_ref::<TokenInputMessage>().is_some());
    }
}
