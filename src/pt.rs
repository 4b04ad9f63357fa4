use std::collections::HashSet;
use std::hash::Hash;

/// A closed tag identifying a grammar rule. Implemented by the `Rule` enum
/// in `grammar.rs`; kept as a trait here so the combinator kernel (this
/// module and `production/`) stays generic over the grammar it drives.
pub trait RuleId: Copy + Eq + Hash + std::fmt::Debug {}

impl<T: Copy + Eq + Hash + std::fmt::Debug> RuleId for T {}

/// Concrete syntax tree node produced by the combinator kernel.
///
/// Invariant (spec §3): `matched` equals the in-order concatenation of the
/// `matched` lists of `children` when children are present, or the node's
/// own leaf tokens otherwise. Every combinator preserves this by construction:
/// terminals populate `matched` with exactly what they consumed, and
/// `merge`/`and`/`or` only ever fold children's `matched` into their own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PT<R> {
    pub rule_id: Option<R>,
    pub matched: Vec<String>,
    pub children: Vec<PT<R>>,
}

impl<R: RuleId> PT<R> {
    pub fn new(rule_id: Option<R>, matched: Vec<String>, children: Vec<PT<R>>) -> Self {
        Self {
            rule_id,
            matched,
            children,
        }
    }

    pub fn empty() -> Self {
        Self::new(None, Vec::new(), Vec::new())
    }

    pub fn leaf(rule_id: Option<R>, token: String) -> Self {
        Self::new(rule_id, vec![token], Vec::new())
    }

    /// Append `other`'s matched tokens to `self` and push `other` as a child.
    pub fn merge(mut self, other: PT<R>) -> Self {
        self.matched.extend(other.matched.iter().cloned());
        self.children.push(other);
        self
    }

    /// Structural rewrite collapsing degenerate single-child chains and
    /// dropping unlabeled, childless structural noise (spec §4.2).
    ///
    /// `excluded`: rule ids whose single-child nodes must NOT be collapsed
    /// (their own identity survives even with exactly one child).
    /// `use_child_rule`: rule ids whose node, when collapsed into a single
    /// labeled child, adopts that child's rule id instead of keeping its own.
    pub fn prune(&self, excluded: &HashSet<R>, use_child_rule: &HashSet<R>) -> PT<R> {
        if self.children.len() == 1 && self.rule_id.map_or(true, |id| !excluded.contains(&id)) {
            let pruned_child = self.children[0].prune(excluded, use_child_rule);
            match pruned_child.rule_id {
                None => PT::new(self.rule_id, pruned_child.matched, pruned_child.children),
                Some(child_id) => {
                    let adopt = self
                        .rule_id
                        .map_or(true, |own_id| use_child_rule.contains(&own_id));
                    let new_id = if adopt {
                        Some(child_id)
                    } else {
                        self.rule_id
                    };
                    PT::new(new_id, pruned_child.matched, pruned_child.children)
                }
            }
        } else {
            let children = self
                .children
                .iter()
                .map(|c| c.prune(excluded, use_child_rule))
                .filter(|c| c.rule_id.is_some() || count_grandchildren(c) > 1)
                .collect();
            PT::new(self.rule_id, self.matched.clone(), children)
        }
    }
}

fn count_grandchildren<R>(node: &PT<R>) -> usize {
    node.children.len()
}

#[cfg(debug_assertions)]
impl<R: RuleId> ptree::TreeItem for PT<R> {
    type Child = Self;

    fn write_self<W: std::io::Write>(&self, f: &mut W, _: &ptree::Style) -> std::io::Result<()> {
        write!(f, "{:?} {:?}", self.rule_id, self.matched)
    }

    fn children(&self) -> std::borrow::Cow<[Self::Child]> {
        std::borrow::Cow::from(&self.children)
    }
}

#[cfg(debug_assertions)]
impl<R: RuleId> PT<R> {
    pub fn print_tree(&self) -> std::io::Result<()> {
        ptree::print_tree(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum R {
        Variable,
        Identifier,
        Name,
    }

    #[test]
    fn merge_concatenates_matched_tokens() {
        let a = PT::<R>::leaf(None, "a".into());
        let b = PT::<R>::leaf(None, "b".into());
        let merged = PT::<R>::empty().merge(a).merge(b);
        assert_eq!(merged.matched, vec!["a", "b"]);
        assert_eq!(merged.children.len(), 2);
    }

    #[test]
    fn prune_collapses_single_child_chain() {
        let tree = PT::new(
            Some(R::Variable),
            vec![],
            vec![PT::new(
                Some(R::Identifier),
                vec![],
                vec![PT::leaf(Some(R::Name), "myvar".into())],
            )],
        );
        let pruned = tree.prune(&HashSet::new(), &HashSet::new());
        assert_eq!(
            pruned,
            PT::new(Some(R::Variable), vec!["myvar".into()], vec![])
        );
    }

    #[test]
    fn prune_respects_excluded() {
        let tree = PT::new(
            Some(R::Variable),
            vec![],
            vec![PT::new(
                Some(R::Identifier),
                vec![],
                vec![PT::leaf(None, "myvar".into())],
            )],
        );
        let excluded = HashSet::from([R::Variable]);
        let pruned = tree.prune(&excluded, &HashSet::new());
        assert_eq!(
            pruned,
            PT::new(
                Some(R::Variable),
                vec![],
                vec![PT::new(Some(R::Identifier), vec!["myvar".into()], vec![])]
            )
        );
    }

    #[test]
    fn prune_use_child_rule_adopts_child_tag() {
        let tree = PT::new(
            Some(R::Variable),
            vec![],
            vec![PT::new(
                Some(R::Identifier),
                vec![],
                vec![PT::leaf(Some(R::Name), "myvar".into())],
            )],
        );
        let excluded = HashSet::from([R::Variable]);
        let use_child = HashSet::from([R::Identifier]);
        let pruned = tree.prune(&excluded, &use_child);
        assert_eq!(
            pruned,
            PT::new(
                Some(R::Variable),
                vec![],
                vec![PT::new(Some(R::Name), vec!["myvar".into()], vec![])]
            )
        );
    }

    #[test]
    fn prune_is_idempotent() {
        let tree = PT::new(
            Some(R::Variable),
            vec![],
            vec![
                PT::leaf(None, "(".into()),
                PT::new(
                    Some(R::Identifier),
                    vec![],
                    vec![PT::leaf(Some(R::Name), "myvar".into())],
                ),
                PT::leaf(None, ")".into()),
            ],
        );
        let excluded = HashSet::from([R::Variable]);
        let use_child = HashSet::from([R::Identifier]);
        let once = tree.prune(&excluded, &use_child);
        let twice = once.prune(&excluded, &use_child);
        assert_eq!(once, twice);
    }
}
