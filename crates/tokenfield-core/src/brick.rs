//! Brick verification: widgets declare falsifiable assertions about their
//! own state, and `verify` checks them against the live widget.
//!
//! Painting code and tests call [`Brick::verify`] to catch a widget whose
//! internal state has drifted (for example, a chip list that no longer lines
//! up with its token list).

use std::fmt;

/// An assertion a widget makes about itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrickAssertion {
    /// Text content is non-empty and drawable
    TextVisible,
    /// Two parallel collections have the same length and ordering
    IndexAligned(&'static str),
    /// At most one item in a collection is selected
    SingleSelection,
    /// No two items in a collection compare equal
    Unique(&'static str),
    /// Free-form invariant, named
    Invariant(&'static str),
}

impl fmt::Display for BrickAssertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TextVisible => write!(f, "text visible"),
            Self::IndexAligned(what) => write!(f, "index aligned: {what}"),
            Self::SingleSelection => write!(f, "single selection"),
            Self::Unique(what) => write!(f, "unique: {what}"),
            Self::Invariant(what) => write!(f, "invariant: {what}"),
        }
    }
}

/// Result of verifying brick assertions.
#[derive(Debug, Clone, Default)]
pub struct BrickVerification {
    /// Assertions that held
    pub passed: Vec<BrickAssertion>,
    /// Assertions that failed, with a reason
    pub failed: Vec<(BrickAssertion, String)>,
}

impl BrickVerification {
    /// Create an empty verification.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `assertion` as passed when `holds`, otherwise as failed with
    /// the lazily built reason.
    pub fn check(
        &mut self,
        assertion: BrickAssertion,
        holds: bool,
        reason: impl FnOnce() -> String,
    ) {
        if holds {
            self.passed.push(assertion);
        } else {
            self.failed.push((assertion, reason()));
        }
    }

    /// Whether every assertion held.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.failed.is_empty()
    }

    /// Fraction of assertions that held (1.0 when there were none).
    #[must_use]
    pub fn score(&self) -> f32 {
        let total = self.passed.len() + self.failed.len();
        if total == 0 {
            1.0
        } else {
            self.passed.len() as f32 / total as f32
        }
    }
}

/// Core brick trait: every widget carries verifiable assertions.
pub trait Brick {
    /// Stable name used in diagnostics.
    fn brick_name(&self) -> &'static str;

    /// Assertions this brick makes.
    fn assertions(&self) -> Vec<BrickAssertion>;

    /// Check every assertion against the current state.
    fn verify(&self) -> BrickVerification;

    /// Whether the brick may render.
    fn can_render(&self) -> bool {
        self.verify().is_valid()
    }
}
