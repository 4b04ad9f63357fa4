use super::{AtLeastOne, BoxedCombinator, NoneProd, Or};
use crate::pt::RuleId;
use std::rc::Rc;

/// `many(id, element, delim) ≡ or(id, at_least_one(id, element, delim), none(id))`
/// — zero or more repetitions (spec §4.1).
pub fn many<R: RuleId>(
    rule_id: Option<R>,
    element: BoxedCombinator<R>,
    delim: Option<BoxedCombinator<R>>,
) -> BoxedCombinator<R> {
    Rc::new(Or::new(
        rule_id,
        vec![
            Rc::new(AtLeastOne::new(rule_id, element, delim)),
            Rc::new(NoneProd::new(rule_id)),
        ],
    ))
}
