//! `TokenChip`: renders one token as `"<name>,"` with a selectable overlay.

use crate::token::Token;
use crate::DisplayMode;
use serde::Serialize;
use std::any::Any;
use std::ops::Range;
use tokenfield_core::{
    widget::LayoutResult, Brick, BrickAssertion, BrickVerification, Canvas, Color, Constraints,
    EasedValue, Event, Key, Point, Rect, Size, TextStyle, TypeId, Widget,
};

/// Horizontal padding around the label.
pub const PADDING_X: f32 = 4.0;
/// Vertical padding around the label.
pub const PADDING_Y: f32 = 2.0;
/// Duration of the selection cross-fade, in seconds.
pub const SELECTION_FADE_SECS: f64 = 0.25;
/// Trailing glyph separating consecutive chips.
pub const SEPARATOR: char = ',';

const CORNER_RADIUS: f32 = 3.0;
/// Slack for float error when a frame was sized from the same measurement.
const FIT_TOLERANCE: f32 = 0.01;

/// What the user asked a chip to do. The owning container decides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChipAction {
    /// Short tap: select this chip
    SelectionRequested,
    /// Long press: show a context menu for this chip
    MenuRequested,
    /// Key input while focused: remove this chip, typing `replacement` (if
    /// any) into the free-text field
    DeleteRequested {
        /// Text typed over the chip; `None` for a bare backspace
        replacement: Option<String>,
    },
}

/// Normal, selected and separator colors for a chip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChipColors {
    /// Name color while unselected
    pub text: Color,
    /// Name color while selected
    pub selected_text: Color,
    /// Overlay color while selected
    pub selected_background: Color,
    /// Separator glyph color
    pub separator: Color,
}

impl ChipColors {
    /// Colors derived from a tint: tinted text on clear, white on tint when
    /// selected.
    #[must_use]
    pub const fn tinted(tint: Color) -> Self {
        Self {
            text: tint,
            selected_text: Color::WHITE,
            selected_background: tint,
            separator: Color::LIGHT_GRAY,
        }
    }

    /// Apply a token's own overrides on top of these colors.
    #[must_use]
    pub fn for_token(&self, token: &Token) -> Self {
        Self {
            text: token.text_color().unwrap_or(self.text),
            selected_text: token.selected_text_color().unwrap_or(self.selected_text),
            selected_background: token
                .selected_background_color()
                .unwrap_or(self.selected_background),
            separator: self.separator,
        }
    }
}

impl Default for ChipColors {
    fn default() -> Self {
        Self::tinted(Color::SYSTEM_BLUE)
    }
}

/// A colored byte range of the chip label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleRun {
    /// Byte range into [`TokenChip::label_text`]
    pub range: Range<usize>,
    /// Color of the run
    pub color: Color,
}

/// Chip view for a single [`Token`].
///
/// Chips are always built from a token; they serialize for inspection but
/// cannot be deserialized.
#[derive(Serialize)]
pub struct TokenChip {
    #[serde(skip)]
    token: Token,
    display_text: String,
    #[serde(skip)]
    font: TextStyle,
    colors: ChipColors,
    mode: DisplayMode,
    selected: bool,
    focused: bool,
    separator_visible: bool,
    runs: Vec<StyleRun>,
    /// Overlay opacity, 0 (hidden) to 1 (fully selected)
    #[serde(skip)]
    overlay: EasedValue,
    bounds: Rect,
}

impl TokenChip {
    /// Build a chip for `token`; per-token color overrides win over `colors`.
    #[must_use]
    pub fn new(token: Token, mode: DisplayMode, font: TextStyle, colors: ChipColors) -> Self {
        let display_text = token.display_text().to_string();
        let mut chip = Self {
            colors: colors.for_token(&token),
            token,
            display_text,
            font,
            mode,
            selected: false,
            focused: false,
            separator_visible: true,
            runs: Vec::new(),
            overlay: EasedValue::settled(0.0),
            bounds: Rect::ZERO,
        };
        chip.rebuild_runs();
        chip.bounds = Rect::from_size(chip.intrinsic_size());
        chip
    }

    /// The token this chip renders.
    #[must_use]
    pub const fn token(&self) -> &Token {
        &self.token
    }

    /// The token's display text.
    #[must_use]
    pub fn display_text(&self) -> &str {
        &self.display_text
    }

    /// Rendered label: display text followed by the separator glyph.
    #[must_use]
    pub fn label_text(&self) -> String {
        format!("{}{SEPARATOR}", self.display_text)
    }

    /// Color runs over [`Self::label_text`]: the name, then the separator.
    #[must_use]
    pub fn style_runs(&self) -> &[StyleRun] {
        &self.runs
    }

    fn rebuild_runs(&mut self) {
        let name_end = self.display_text.len();
        let separator = if self.separator_visible {
            self.colors.separator
        } else {
            Color::TRANSPARENT
        };
        self.runs = vec![
            StyleRun {
                range: 0..name_end,
                color: self.colors.text,
            },
            StyleRun {
                range: name_end..name_end + SEPARATOR.len_utf8(),
                color: separator,
            },
        ];
    }

    /// Label size plus padding; the flow layout places chips at this size.
    #[must_use]
    pub fn intrinsic_size(&self) -> Size {
        self.font
            .measure(&self.display_text)
            .inflate(PADDING_X, PADDING_Y)
    }

    /// Display text as painted. A chip laid out narrower than its intrinsic
    /// width shows only the prefix that leaves room for the separator inside
    /// the padded frame.
    #[must_use]
    pub fn visible_name(&self) -> &str {
        let inner = (self.bounds.width - 2.0 * PADDING_X).max(0.0);
        if self.font.measure(&self.display_text).width <= inner + FIT_TOLERANCE {
            return &self.display_text;
        }
        let mut buf = [0u8; 4];
        let separator = self.font.measure(SEPARATOR.encode_utf8(&mut buf)).width;
        let budget = inner - separator + FIT_TOLERANCE;
        let end = self
            .display_text
            .char_indices()
            .map(|(i, c)| i + c.len_utf8())
            .take_while(|&end| self.font.measure(&self.display_text[..end]).width <= budget)
            .last()
            .unwrap_or(0);
        &self.display_text[..end]
    }

    /// Whether the chip is selected.
    #[must_use]
    pub const fn is_selected(&self) -> bool {
        self.selected
    }

    /// Whether the chip holds input focus.
    #[must_use]
    pub const fn is_focused(&self) -> bool {
        self.focused
    }

    /// Whether the trailing separator is drawn.
    #[must_use]
    pub const fn is_separator_visible(&self) -> bool {
        self.separator_visible
    }

    /// Current colors (after token overrides).
    #[must_use]
    pub const fn colors(&self) -> &ChipColors {
        &self.colors
    }

    /// Select or unselect. No-op if the state is unchanged.
    ///
    /// Selecting in edit mode claims input focus; the return value reports
    /// whether it did, so the owner can take focus away from the text field.
    pub fn set_selected(&mut self, selected: bool, animated: bool) -> bool {
        if self.selected == selected {
            return false;
        }
        self.selected = selected;

        let claimed = selected && self.can_become_focused();
        self.focused = claimed;

        let target = if selected { 1.0 } else { 0.0 };
        if animated {
            self.overlay.retarget(target, SELECTION_FADE_SECS);
        } else {
            self.overlay.snap(target);
        }
        claimed
    }

    /// Drop input focus without changing selection.
    pub fn resign_focus(&mut self) {
        self.focused = false;
    }

    /// Show or hide the trailing separator glyph.
    pub fn set_separator_visibility(&mut self, visible: bool) {
        if self.separator_visible != visible {
            self.separator_visible = visible;
            self.rebuild_runs();
        }
    }

    /// Replace the container colors; token overrides still apply.
    pub fn set_colors(&mut self, colors: ChipColors) {
        self.colors = colors.for_token(&self.token);
        self.rebuild_runs();
    }

    /// Change the font. The next layout pass picks up the new size.
    pub fn set_font(&mut self, font: TextStyle) {
        self.font = font;
    }

    /// Chips take focus only where they can be edited.
    #[must_use]
    pub fn can_become_focused(&self) -> bool {
        self.mode == DisplayMode::Edit
    }

    /// Chips never offer copy, paste or select-all.
    #[must_use]
    pub const fn can_perform_standard_editing_actions(&self) -> bool {
        false
    }

    /// Opacity of the selected overlay.
    #[must_use]
    pub fn overlay_alpha(&self) -> f32 {
        self.overlay.value() as f32
    }

    /// Whether the selected overlay is drawn at all.
    #[must_use]
    pub fn is_overlay_visible(&self) -> bool {
        self.selected || !self.overlay.is_complete()
    }

    /// Whether a selection fade is in flight.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        !self.overlay.is_complete()
    }

    /// Advance the selection fade.
    pub fn tick(&mut self, dt: f64) {
        self.overlay.update(dt);
    }

    /// Translate an input event into a request for the owner.
    pub fn handle(&mut self, event: &Event) -> Option<ChipAction> {
        match event {
            Event::GestureTap { position, .. } | Event::MouseDown { position, .. }
                if event.is_tap() && self.bounds.contains_point(position) =>
            {
                Some(ChipAction::SelectionRequested)
            }
            Event::GestureLongPress { position } if self.bounds.contains_point(position) => {
                Some(ChipAction::MenuRequested)
            }
            Event::KeyDown { key: Key::Backspace } if self.focused => {
                Some(ChipAction::DeleteRequested { replacement: None })
            }
            Event::TextInput { text } if self.focused => Some(ChipAction::DeleteRequested {
                replacement: Some(text.clone()),
            }),
            _ => None,
        }
    }
}

impl Brick for TokenChip {
    fn brick_name(&self) -> &'static str {
        "TokenChip"
    }

    fn assertions(&self) -> Vec<BrickAssertion> {
        vec![
            BrickAssertion::TextVisible,
            BrickAssertion::Invariant("focus implies selection"),
        ]
    }

    fn verify(&self) -> BrickVerification {
        let mut v = BrickVerification::new();
        v.check(
            BrickAssertion::TextVisible,
            !self.display_text.is_empty(),
            || "display text is empty".into(),
        );
        v.check(
            BrickAssertion::Invariant("focus implies selection"),
            !self.focused || self.selected,
            || format!("chip {:?} is focused but not selected", self.display_text),
        );
        v
    }
}

impl Widget for TokenChip {
    fn type_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn measure(&self, constraints: Constraints) -> Size {
        constraints.constrain(self.intrinsic_size())
    }

    fn layout(&mut self, bounds: Rect) -> LayoutResult {
        self.bounds = bounds;
        LayoutResult {
            size: bounds.size(),
        }
    }

    fn paint(&self, canvas: &mut dyn Canvas) {
        let origin = Point::new(self.bounds.x + PADDING_X, self.bounds.y + PADDING_Y);
        let label = self.label_text();
        let (_, separator) = label.split_at(self.display_text.len());
        let name = self.visible_name();
        let mut x = origin.x;
        for (run, text) in self.runs.iter().zip([name, separator]) {
            let style = self.font.with_color(run.color);
            canvas.draw_text(text, Point::new(x, origin.y), &style);
            x += style.measure(text).width;
        }

        if self.is_overlay_visible() {
            let alpha = self.overlay_alpha();
            canvas.fill_rounded_rect(
                self.bounds,
                CORNER_RADIUS,
                self.colors.selected_background.fade(alpha),
            );
            let style = self.font.with_color(self.colors.selected_text.fade(alpha));
            canvas.draw_text(name, origin, &style);
        }
    }

    fn event(&mut self, event: &Event) -> Option<Box<dyn Any + Send>> {
        self.handle(event)
            .map(|action| Box::new(action) as Box<dyn Any + Send>)
    }

    fn is_interactive(&self) -> bool {
        true
    }

    fn is_focusable(&self) -> bool {
        self.can_become_focused()
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }
}
