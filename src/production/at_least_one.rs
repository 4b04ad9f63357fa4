use super::{BoxedCombinator, Combinator};
use crate::pt::{RuleId, PT};
use crate::stream::TokenStream;

/// Repeats `element` one or more times, optionally separated by `delim`.
///
/// Implemented as an explicit work-list loop rather than recursion: without
/// a delimiter, grammars like `at_least_one(number)` over a long input would
/// otherwise recurse once per repetition and blow the stack (spec §4.1, §9).
///
/// With a delimiter, each step is `delim` then `element`, tried as one
/// atomic unit — if either half fails the step is rolled back entirely and
/// the loop stops at the last fully-successful element. A delimiter match
/// contributes its own children (not itself as a node) to the result, so a
/// delimiter that carries no rule id of its own doesn't show up as an empty
/// wrapper in the tree.
pub struct AtLeastOne<R: RuleId> {
    rule_id: Option<R>,
    element: BoxedCombinator<R>,
    delim: Option<BoxedCombinator<R>>,
}

impl<R: RuleId> AtLeastOne<R> {
    pub fn new(
        rule_id: Option<R>,
        element: BoxedCombinator<R>,
        delim: Option<BoxedCombinator<R>>,
    ) -> Self {
        Self {
            rule_id,
            element,
            delim,
        }
    }
}

impl<R: RuleId> Combinator<R> for AtLeastOne<R> {
    fn parse(&self, tokens: TokenStream) -> (bool, PT<R>, TokenStream) {
        #[cfg(debug_assertions)]
        super::trace("enter at_least_one", &format!("{:?}", self.rule_id));

        let (ok, first, mut remaining) = self.element.parse(tokens.clone());
        if !ok {
            return (false, PT::empty(), tokens);
        }
        let mut matched = first.matched.clone();
        let mut children = vec![first];

        loop {
            match &self.delim {
                None => {
                    let (ok, pt, rest) = self.element.parse(remaining.clone());
                    if !ok {
                        break;
                    }
                    matched.extend(pt.matched.iter().cloned());
                    children.push(pt);
                    remaining = rest;
                }
                Some(delim) => {
                    let (ok_d, pt_d, rest_d) = delim.parse(remaining.clone());
                    if !ok_d {
                        break;
                    }
                    let (ok_e, pt_e, rest_e) = self.element.parse(rest_d);
                    if !ok_e {
                        // Roll back: the delimiter consumption is discarded
                        // along with it, so `remaining` is untouched.
                        break;
                    }
                    matched.extend(pt_d.matched.iter().cloned());
                    children.extend(pt_d.children);
                    matched.extend(pt_e.matched.iter().cloned());
                    children.push(pt_e);
                    remaining = rest_e;
                }
            }
        }

        (true, PT::new(self.rule_id, matched, children), remaining)
    }

    fn describe(&self) -> String {
        String::from("at_least_one(element)")
    }
}
