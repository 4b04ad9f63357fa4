use super::{BoxedCombinator, NoneProd, Or};
use crate::pt::RuleId;
use std::rc::Rc;

/// `optional(id, p) ≡ or(id, p, none(id))` — `p` if it matches, otherwise a
/// successful empty match (spec §4.1).
pub fn optional<R: RuleId>(rule_id: Option<R>, production: BoxedCombinator<R>) -> BoxedCombinator<R> {
    Rc::new(Or::new(
        rule_id,
        vec![production, Rc::new(NoneProd::new(rule_id))],
    ))
}
