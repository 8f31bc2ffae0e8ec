//! Host callbacks for [`crate::TokenInput`].
//!
//! Every method has a default, so a host implements only what it needs; `()`
//! is the delegate that ignores everything and never tokenizes.

use crate::context_menu::MenuItem;
use crate::token::Token;

/// Notifications and queries a [`crate::TokenInput`] sends to its host.
pub trait TokenInputDelegate: Send + Sync {
    /// The text field gained focus.
    fn did_begin_editing(&mut self) {}

    /// The text field lost focus.
    fn did_end_editing(&mut self) {}

    /// The free text changed, including programmatic clears after a token was
    /// added.
    fn did_change_text(&mut self, _text: &str) {}

    /// A token was appended.
    fn did_add_token(&mut self, _token: &Token) {}

    /// A token was removed.
    fn did_remove_token(&mut self, _token: &Token) {}

    /// Convert free text into a token; `None` declines.
    fn token_for_text(&mut self, _text: &str) -> Option<Token> {
        None
    }

    /// The preferred height changed.
    fn did_change_height(&mut self, _height: f32) {}

    /// Whether a long press on a chip may show a context menu.
    fn should_display_menu_items(&self) -> bool {
        false
    }

    /// Menu items for `token`; an empty list shows nothing.
    fn menu_items(&self, _token: &Token) -> Vec<MenuItem> {
        Vec::new()
    }
}

impl TokenInputDelegate for () {}

impl<D: TokenInputDelegate + ?Sized> TokenInputDelegate for Box<D> {
    fn did_begin_editing(&mut self) {
        (**self).did_begin_editing();
    }

    fn did_end_editing(&mut self) {
        (**self).did_end_editing();
    }

    fn did_change_text(&mut self, text: &str) {
        (**self).did_change_text(text);
    }

    fn did_add_token(&mut self, token: &Token) {
        (**self).did_add_token(token);
    }

    fn did_remove_token(&mut self, token: &Token) {
        (**self).did_remove_token(token);
    }

    fn token_for_text(&mut self, text: &str) -> Option<Token> {
        (**self).token_for_text(text)
    }

    fn did_change_height(&mut self, height: f32) {
        (**self).did_change_height(height);
    }

    fn should_display_menu_items(&self) -> bool {
        (**self).should_display_menu_items()
    }

    fn menu_items(&self, token: &Token) -> Vec<MenuItem> {
        (**self).menu_items(token)
    }
}

/// A notification observed by [`RecordingDelegate`].
#[derive(Debug, Clone, PartialEq)]
pub enum DelegateEvent {
    /// `did_begin_editing`
    BeganEditing,
    /// `did_end_editing`
    EndedEditing,
    /// `did_change_text`
    TextChanged(String),
    /// `did_add_token`
    TokenAdded(Token),
    /// `did_remove_token`
    TokenRemoved(Token),
    /// `did_change_height`
    HeightChanged(f32),
}

/// Delegate that records every notification, for tests and tooling.
///
/// Tokenizing and menus are off unless enabled with the builders.
#[derive(Debug, Default)]
pub struct RecordingDelegate {
    /// Notifications in the order they arrived
    pub events: Vec<DelegateEvent>,
    tokenize: bool,
    menu: Option<Vec<MenuItem>>,
}

impl RecordingDelegate {
    /// Create a delegate that records but declines everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Turn any non-empty free text into a token of the same text.
    #[must_use]
    pub const fn tokenizing(mut self) -> Self {
        self.tokenize = true;
        self
    }

    /// Allow context menus, offering `items` for every token.
    #[must_use]
    pub fn with_menu(mut self, items: Vec<MenuItem>) -> Self {
        self.menu = Some(items);
        self
    }

    /// Tokens added, in order.
    #[must_use]
    pub fn added(&self) -> Vec<&Token> {
        self.events
            .iter()
            .filter_map(|e| match e {
                DelegateEvent::TokenAdded(t) => Some(t),
                _ => None,
            })
            .collect()
    }

    /// Tokens removed, in order.
    #[must_use]
    pub fn removed(&self) -> Vec<&Token> {
        self.events
            .iter()
            .filter_map(|e| match e {
                DelegateEvent::TokenRemoved(t) => Some(t),
                _ => None,
            })
            .collect()
    }

    /// Heights reported, in order.
    #[must_use]
    pub fn heights(&self) -> Vec<f32> {
        self.events
            .iter()
            .filter_map(|e| match e {
                DelegateEvent::HeightChanged(h) => Some(*h),
                _ => None,
            })
            .collect()
    }

    /// Text-change notifications, in order.
    #[must_use]
    pub fn texts(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                DelegateEvent::TextChanged(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Forget everything recorded so far.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl TokenInputDelegate for RecordingDelegate {
    fn did_begin_editing(&mut self) {
        self.events.push(DelegateEvent::BeganEditing);
    }

    fn did_end_editing(&mut self) {
        self.events.push(DelegateEvent::EndedEditing);
    }

    fn did_change_text(&mut self, text: &str) {
        self.events.push(DelegateEvent::TextChanged(text.to_string()));
    }

    fn did_add_token(&mut self, token: &Token) {
        self.events.push(DelegateEvent::TokenAdded(token.clone()));
    }

    fn did_remove_token(&mut self, token: &Token) {
        self.events.push(DelegateEvent::TokenRemoved(token.clone()));
    }

    fn token_for_text(&mut self, text: &str) -> Option<Token> {
        self.tokenize.then(|| Token::from_text(text))
    }

    fn did_change_height(&mut self, height: f32) {
        self.events.push(DelegateEvent::HeightChanged(height));
    }

    fn should_display_menu_items(&self) -> bool {
        self.menu.is_some()
    }

    fn menu_items(&self, _token: &Token) -> Vec<MenuItem> {
        self.menu.clone().unwrap_or_default()
    }
}
