//! Token chip input widgets.
//!
//! [`TokenInput`] shows a list of [`Token`]s as tappable chips followed by a
//! free-text field, wrapping across rows as it grows. A host supplies a
//! [`TokenInputDelegate`] to turn typed text into tokens and to hear about
//! edits and height changes.

pub mod backspace_input;
pub mod chip;
pub mod config;
pub mod context_menu;
pub mod delegate;
pub mod label;
pub mod token;
pub mod token_input;

pub use backspace_input::{
    Autocapitalization, Autocorrection, BackspaceInput, InputSignal, KeyboardType,
};
pub use chip::{ChipAction, ChipColors, StyleRun, TokenChip};
pub use config::{ConfigError, TokenInputConfig};
pub use context_menu::{ContextMenu, MenuItem};
pub use delegate::{DelegateEvent, RecordingDelegate, TokenInputDelegate};
pub use label::Label;
pub use token::Token;
pub use token_input::{DisplayMode, TokenInput, TokenInputMessage};
