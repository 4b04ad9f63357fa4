use super::Combinator;
use crate::pt::{RuleId, PT};
use crate::stream::TokenStream;

/// Always succeeds, consuming nothing. Used as the empty alternative that
/// gives `optional`/`many` their "zero is fine" behaviour (spec §4.1).
pub struct None<R> {
    rule_id: Option<R>,
}

impl<R> None<R> {
    pub fn new(rule_id: Option<R>) -> Self {
        Self { rule_id }
    }
}

impl<R: RuleId> Combinator<R> for None<R> {
    fn parse(&self, tokens: TokenStream) -> (bool, PT<R>, TokenStream) {
        (true, PT::new(self.rule_id, Vec::new(), Vec::new()), tokens)
    }
}
