//! The combinator kernel: a handful of primitive and derived parsers that
//! compose into a grammar by plain function/struct composition (spec §4).
//!
//! Every combinator is a pure function from a [`TokenStream`] to a success
//! flag, a [`PT`] fragment and the stream positioned past whatever was
//! consumed. Failure never panics and never consumes: a failing combinator
//! returns the stream it was given, unchanged.
mod and;
mod any;
mod at_least_one;
mod literal;
mod many;
mod none;
mod optional;
mod or;
mod reference;
mod regex_field;

pub use and::And;
pub use any::Any;
pub use at_least_one::AtLeastOne;
pub use literal::Literal;
pub use many::many;
pub use none::None as NoneProd;
pub use optional::optional;
pub use or::Or;
pub use reference::RefProd;
pub use regex_field::RegexField;

use crate::pt::{RuleId, PT};
use crate::stream::TokenStream;
use std::rc::Rc;

/// Common interface implemented by every production in the kernel.
///
/// `parse` never panics and never consumes input on failure: a failing
/// combinator must return the exact `tokens` it was handed.
pub trait Combinator<R: RuleId> {
    fn parse(&self, tokens: TokenStream) -> (bool, PT<R>, TokenStream);

    /// One-line description used for debugging/grammar introspection.
    /// Default is intentionally uninformative; `And`/`Or` override it since
    /// they're the only productions with inner structure worth summarizing.
    fn describe(&self) -> String {
        String::from("<production>")
    }
}

pub type BoxedCombinator<R> = Rc<dyn Combinator<R>>;

#[cfg(debug_assertions)]
pub(crate) fn trace(event: &str, id: &str) {
    eprintln!("[trace] {event} {id}");
}
