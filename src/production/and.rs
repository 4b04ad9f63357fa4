use super::{BoxedCombinator, Combinator};
use crate::pt::{RuleId, PT};
use crate::stream::TokenStream;

/// Sequences productions: all must succeed in order, atomically. If any
/// member fails the whole `And` fails and the stream is returned exactly as
/// given — no partial consumption ever leaks out (spec §4.1).
pub struct And<R: RuleId> {
    rule_id: Option<R>,
    rules: Vec<BoxedCombinator<R>>,
}

impl<R: RuleId> And<R> {
    pub fn new(rule_id: Option<R>, rules: Vec<BoxedCombinator<R>>) -> Self {
        Self { rule_id, rules }
    }
}

impl<R: RuleId> Combinator<R> for And<R> {
    fn parse(&self, tokens: TokenStream) -> (bool, PT<R>, TokenStream) {
        #[cfg(debug_assertions)]
        super::trace("enter and", &format!("{:?}", self.rule_id));
        let mut remaining = tokens.clone();
        let mut matched = Vec::new();
        let mut children = Vec::new();
        for rule in &self.rules {
            let (ok, pt, rest) = rule.parse(remaining);
            if !ok {
                return (false, PT::empty(), tokens);
            }
            matched.extend(pt.matched.iter().cloned());
            children.push(pt);
            remaining = rest;
        }
        (true, PT::new(self.rule_id, matched, children), remaining)
    }

    fn describe(&self) -> String {
        format!("and({})", self.rules.len())
    }
}
