use super::Combinator;
use crate::pt::{RuleId, PT};
use crate::stream::TokenStream;

/// Matches a single token against an exact string value.
pub struct Literal<R> {
    rule_id: Option<R>,
    value: String,
}

impl<R> Literal<R> {
    pub fn new(rule_id: Option<R>, value: String) -> Self {
        Self { rule_id, value }
    }
}

impl<R: RuleId> Combinator<R> for Literal<R> {
    fn parse(&self, tokens: TokenStream) -> (bool, PT<R>, TokenStream) {
        match tokens.peek() {
            Some(tok) if tok == self.value => {
                let (token, rest) = tokens.advance();
                (true, PT::leaf(self.rule_id, token.to_string()), rest)
            }
            _ => (false, PT::empty(), tokens),
        }
    }
}
