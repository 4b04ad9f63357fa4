use std::fmt::{Display, Formatter};

/// Failure of the program-level parse driver.
///
/// Combinator failure itself is in-band (the `(bool, PT, TokenStream)` triple
/// returned by every [`crate::production::Combinator`]) and never reaches this
/// type directly; [`ParseError`] is raised only once the driver decides the
/// whole input could not be consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Token index at which parsing gave up. Not a line/column position —
    /// see Open Questions in SPEC_FULL.md.
    pub pointer: usize,
    pub message: String,
}

impl ParseError {
    pub fn new(pointer: usize, message: impl Into<String>) -> Self {
        Self {
            pointer,
            message: message.into(),
        }
    }

    pub fn unparsed(pointer: usize) -> Self {
        Self::new(pointer, "Could not parse!")
    }

    pub fn trailing_input(pointer: usize) -> Self {
        Self::new(pointer, "Could not parse the whole input!")
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "SyntaxError: {}", self.message)
    }
}

impl std::error::Error for ParseError {}

/// A type-checking failure. The wire-format message is part of the external
/// contract (spec §6) and is compared verbatim by callers/tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeError(pub String);

impl TypeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl Display for TypeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for TypeError {}

/// Raised when the grammar itself is malformed (a [`crate::production::RefProd`]
/// left unresolved, a rule redefined, etc). Distinct from [`ParseError`],
/// which reports failure of a well-formed grammar against bad input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImplementationError {
    what: String,
    message: String,
}

impl ImplementationError {
    pub fn new(what: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            what: what.into(),
            message: message.into(),
        }
    }
}

impl Display for ImplementationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "ImplementationError: {}-{}", self.what, self.message)
    }
}

impl std::error::Error for ImplementationError {}
