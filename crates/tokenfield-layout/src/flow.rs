//! Row-wrapping flow layout.
//!
//! Lays out, left to right and wrapping into rows:
//!
//! 1. an optional leading field view and field-name label,
//! 2. an optional accessory pinned to the right edge of the first row,
//! 3. the chips, in order,
//! 4. the text field, which takes the rest of the last row (or a new row if
//!    less than [`FlowMetrics::minimum_text_field_width`] is left).
//!
//! The layout is a pure function of measured sizes; the widget applies the
//! resulting frames.

use crate::metrics::FlowMetrics;
use tokenfield_core::{Rect, Size};
use tracing::trace;

/// Measured inputs for one layout pass.
#[derive(Debug, Clone, Default)]
pub struct FlowInput<'a> {
    /// Current bounds size of the control
    pub bounds: Size,
    /// Run the full pass even when the bounds height is zero
    pub force_reposition: bool,
    /// Natural size of the leading field view, if any
    pub field_view: Option<Size>,
    /// Natural size of the field-name label, if shown
    pub field_label: Option<Size>,
    /// Natural size of the trailing accessory, if any
    pub accessory: Option<Size>,
    /// Intrinsic size of every chip, in display order
    pub chips: &'a [Size],
    /// Whether the text field currently has focus
    pub editing: bool,
    /// Whether text entry is possible at all (edit mode)
    pub editable: bool,
}

/// Frames produced by a full layout pass.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowFrames {
    /// Leading field view frame
    pub field_view: Option<Rect>,
    /// Field-name label frame
    pub field_label: Option<Rect>,
    /// Accessory frame (first row, right edge)
    pub accessory: Option<Rect>,
    /// One frame per chip, index-aligned with the input
    pub chips: Vec<Rect>,
    /// Whether each chip draws its trailing separator
    pub separators: Vec<bool>,
    /// Text field frame; zero-sized unless the field is being edited
    pub text_field: Rect,
    /// Height the content needs, including bottom padding
    pub content_height: f32,
    /// Number of rows the chips occupy (at least one)
    pub rows: usize,
}

/// Outcome of a layout pass.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowPass {
    /// Bounds height is zero: keep existing frames, collapse their heights
    Collapsed,
    /// Full placement
    Placed(FlowFrames),
}

/// Collapse a frame to zero height in place of recomputing it.
#[must_use]
pub const fn collapse(frame: Rect) -> Rect {
    frame.with_height(0.0)
}

/// The flow layout algorithm, parameterized by its metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FlowLayout {
    metrics: FlowMetrics,
}

impl FlowLayout {
    /// Create a layout with the given metrics.
    #[must_use]
    pub const fn new(metrics: FlowMetrics) -> Self {
        Self { metrics }
    }

    /// The metrics in use.
    #[must_use]
    pub const fn metrics(&self) -> &FlowMetrics {
        &self.metrics
    }

    /// Run one layout pass.
    #[must_use]
    pub fn compute(&self, input: &FlowInput<'_>) -> FlowPass {
        if input.bounds.height == 0.0 && !input.force_reposition {
            trace!(chips = input.chips.len(), "zero height, collapsing");
            return FlowPass::Collapsed;
        }

        let m = &self.metrics;
        let width = input.bounds.width;
        let row = m.standard_row_height;
        let right_boundary = width - m.padding_right;
        let max_line_width = m.max_line_width(width);
        let mut first_line_right_boundary = right_boundary;

        let mut cur_x = m.padding_left;
        let mut cur_y = m.padding_top;
        let mut on_first_line = true;
        let mut rows = 1;

        let place_leading = |size: Size, cur_x: &mut f32| {
            let frame = Rect::new(
                *cur_x + m.field_margin_x,
                cur_y + (row - size.height) / 2.0,
                size.width,
                size.height,
            );
            *cur_x = frame.max_x() + m.field_margin_x;
            frame
        };
        let field_view = input.field_view.map(|s| place_leading(s, &mut cur_x));
        let field_label = input.field_label.map(|s| place_leading(s, &mut cur_x));

        let accessory = input.accessory.map(|size| {
            let frame = Rect::new(width - m.padding_right - size.width, cur_y, size.width, size.height);
            first_line_right_boundary = frame.x - m.hspace;
            frame
        });

        let mut chips = Vec::with_capacity(input.chips.len());
        let mut last_chip_row_y = None;
        for size in input.chips {
            let boundary = if on_first_line {
                first_line_right_boundary
            } else {
                right_boundary
            };
            if cur_x + size.width > boundary {
                cur_x = m.padding_left;
                cur_y += m.row_advance();
                on_first_line = false;
                rows += 1;
            }
            let frame = Rect::new(
                cur_x,
                cur_y + (row - size.height) / 2.0,
                size.width.min(max_line_width),
                size.height,
            );
            cur_x = frame.max_x() + m.hspace;
            last_chip_row_y = Some(cur_y);
            chips.push(frame);
        }

        let field_active = input.editing && input.editable;
        let last = chips.len().saturating_sub(1);
        let separators = (0..chips.len())
            .map(|i| i != last || input.editing)
            .collect();

        cur_x += m.text_field_hspace;
        let boundary = if on_first_line {
            first_line_right_boundary
        } else {
            right_boundary
        };
        let mut available = boundary - cur_x;
        if available < m.minimum_text_field_width {
            cur_x = m.padding_left + m.text_field_hspace;
            cur_y += m.row_advance();
            available = right_boundary - cur_x;
        }

        // A row reserved only for the text field is dropped once focus leaves.
        if let Some(chip_row) = last_chip_row_y {
            if !input.editing && cur_y > chip_row {
                cur_y -= m.row_advance();
            }
        }

        let text_field = if field_active {
            Rect::new(cur_x, cur_y, available, row)
        } else {
            Rect::ZERO
        };

        let content_height = if field_active {
            text_field.max_y() + m.padding_bottom
        } else {
            chips.last().map_or(0.0, |c| c.max_y() + m.padding_bottom)
        };

        trace!(
            width,
            height = input.bounds.height,
            chips = chips.len(),
            editing = input.editing,
            content_height,
            "flow layout pass"
        );

        FlowPass::Placed(FlowFrames {
            field_view,
            field_label,
            accessory,
            chips,
            separators,
            text_field,
            content_height,
            rows,
        })
    }
}
