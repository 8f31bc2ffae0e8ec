//! Core types and traits for the tokenfield chip input control.
//!
//! This crate provides the foundational types the layout engine and widgets
//! build on:
//! - Geometric primitives: [`Point`], [`Size`], [`Rect`]
//! - Color representation: [`Color`]
//! - Layout constraints: [`Constraints`]
//! - Input events: [`Event`], [`Key`]
//! - The [`Widget`] and [`Canvas`] traits, with [`Brick`] verification
//! - Selection fades: [`EasedValue`]
//! - Next-iteration work: [`DeferredQueue`]

mod animation;
mod brick;
mod canvas;
mod color;
mod constraints;
mod deferred;
mod event;
mod geometry;
pub mod widget;

pub use animation::{EasedValue, Easing};
pub use brick::{Brick, BrickAssertion, BrickVerification};
pub use canvas::{DrawCommand, RecordingCanvas};
pub use color::{Color, ColorParseError};
pub use constraints::Constraints;
pub use deferred::DeferredQueue;
pub use event::{Event, Key, MouseButton, LONG_PRESS_MS};
pub use geometry::{Point, Rect, Size};
pub use widget::{Canvas, FontWeight, LayoutResult, TextStyle, TypeId, Widget, WidgetId};
