use super::{BoxedCombinator, Combinator};
use crate::pt::{RuleId, PT};
use crate::stream::TokenStream;

/// Ordered choice: tries each alternative in turn and commits to the first
/// that succeeds (PEG semantics, not ambiguous-grammar alternation). An
/// earlier, shorter match wins even if a later alternative would have
/// matched more input (spec §4.1).
pub struct Or<R: RuleId> {
    rule_id: Option<R>,
    rules: Vec<BoxedCombinator<R>>,
}

impl<R: RuleId> Or<R> {
    pub fn new(rule_id: Option<R>, rules: Vec<BoxedCombinator<R>>) -> Self {
        Self { rule_id, rules }
    }
}

impl<R: RuleId> Combinator<R> for Or<R> {
    fn parse(&self, tokens: TokenStream) -> (bool, PT<R>, TokenStream) {
        #[cfg(debug_assertions)]
        super::trace("enter or", &format!("{:?}", self.rule_id));
        for rule in &self.rules {
            let (ok, pt, rest) = rule.parse(tokens.clone());
            if ok {
                return (true, PT::new(self.rule_id, pt.matched, vec![pt]), rest);
            }
        }
        (false, PT::empty(), tokens)
    }

    fn describe(&self) -> String {
        format!("or({})", self.rules.len())
    }
}
