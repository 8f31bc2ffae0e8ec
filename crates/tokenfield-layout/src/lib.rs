//! Flow layout engine for the tokenfield chip input.
//!
//! [`FlowLayout::compute`] places a leading field view and label, an
//! optional first-row accessory, a sequence of chips and the text field into
//! wrapped rows, and reports the height the content needs. Geometry comes
//! from [`FlowMetrics`].

mod flow;
mod metrics;

pub use flow::{collapse, FlowFrames, FlowInput, FlowLayout, FlowPass};
pub use metrics::{FlowMetrics, MetricsError};
