use super::{BoxedCombinator, Combinator};
use crate::error::ImplementationError;
use crate::pt::{RuleId, PT};
use crate::stream::TokenStream;
use once_cell::unsync::OnceCell;

/// A forward declaration for a production that refers to itself (directly or
/// through a cycle), following the teacher's `OnceCell`-based construction
/// idiom (`production/non_terminals/{concat,union}.rs`): build a `RefProd`
/// first, wire it into the rules that need to recurse into it, then call
/// [`RefProd::set`] once the real production exists.
pub struct RefProd<R> {
    target: OnceCell<BoxedCombinator<R>>,
}

impl<R> RefProd<R> {
    pub fn new() -> Self {
        Self {
            target: OnceCell::new(),
        }
    }

    /// Wires the deferred production. Panics only if called twice on the
    /// same reference, which is a grammar-construction bug, not a runtime
    /// parse failure.
    pub fn set(&self, production: BoxedCombinator<R>) {
        self.target
            .set(production)
            .unwrap_or_else(|_| panic!("RefProd already resolved"));
    }
}

impl<R> Default for RefProd<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RuleId> Combinator<R> for RefProd<R> {
    fn parse(&self, tokens: TokenStream) -> (bool, PT<R>, TokenStream) {
        match self.target.get() {
            Some(production) => production.parse(tokens),
            None => {
                let err = ImplementationError::new(
                    "RefProd",
                    "referenced production was never resolved with set()",
                );
                panic!("{err}");
            }
        }
    }

    fn describe(&self) -> String {
        String::from("ref(...)")
    }
}
