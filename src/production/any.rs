use super::{BoxedCombinator, Combinator};
use crate::pt::{RuleId, PT};
use crate::stream::TokenStream;

/// Consumes exactly one token, whatever it is, as long as the stream isn't
/// empty and (when `excluded` is supplied) that excluded production doesn't
/// also match here. Used for catch-alls like "any token that isn't a
/// reserved word" (spec §4.1).
pub struct Any<R: RuleId> {
    rule_id: Option<R>,
    excluded: Option<BoxedCombinator<R>>,
}

impl<R: RuleId> Any<R> {
    pub fn new(rule_id: Option<R>, excluded: Option<BoxedCombinator<R>>) -> Self {
        Self { rule_id, excluded }
    }
}

impl<R: RuleId> Combinator<R> for Any<R> {
    fn parse(&self, tokens: TokenStream) -> (bool, PT<R>, TokenStream) {
        if tokens.is_empty() {
            return (false, PT::empty(), tokens);
        }
        if let Some(excluded) = &self.excluded {
            let (matched, _, _) = excluded.parse(tokens.clone());
            if matched {
                return (false, PT::empty(), tokens);
            }
        }
        let (token, rest) = tokens.advance();
        (true, PT::leaf(self.rule_id, token.to_string()), rest)
    }
}
