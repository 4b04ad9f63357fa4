//! The surface grammar (spec §4.4), built from the combinator kernel.
use crate::production::{
    many, And, AtLeastOne, BoxedCombinator, Combinator, Literal, Or, RefProd, RegexField,
};
use crate::pt::PT;
use crate::stream::TokenStream;
use std::collections::HashSet;
use std::rc::Rc;

/// Tags surviving into the pruned tree and consumed by `ast::lower`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    Program,
    Form,
    FunctionDef,
    Elements,
    Element,
    TypeDec,
    TypeName,
    Atom,
}

/// Rule ids whose single-child nodes must keep their own tag rather than
/// collapsing (spec §4.4): `Program` because it's the parse root and
/// `TypeDec` because `identifier ":" type_name` always has useful structure
/// even when `type_name` itself degenerates to one token.
fn excluded() -> HashSet<Rule> {
    HashSet::from([Rule::Program, Rule::TypeDec])
}

/// Rule ids that, when collapsed to a single labeled child, adopt that
/// child's tag instead of keeping their own — `Element`/`Elements` are pure
/// routing nodes (an `element` is *whatever it matched*, not a wrapper
/// around it).
fn use_child_rule() -> HashSet<Rule> {
    HashSet::from([Rule::Element, Rule::Elements])
}

pub struct Grammar {
    program: BoxedCombinator<Rule>,
}

impl Grammar {
    pub fn new() -> Self {
        let number = Rc::new(RegexField::new(Some(Rule::Atom), r"\d+(?:\.\d+)?"));
        let string = Rc::new(RegexField::new(Some(Rule::Atom), r#""[^"]*""#));
        let identifier = Rc::new(RegexField::new(
            Some(Rule::Atom),
            r"[a-zA-Z\-+*^/0-9<>=]+",
        ));
        // Structural occurrences of an identifier (a function name, a
        // type_dec's parameter name, a type_name's base) carry no rule tag:
        // tagging them `Atom` would make prune's branch-2 filter keep them
        // as stray children alongside the node they actually name, shifting
        // every subsequent child index. Only a "real" atom value — the one
        // reachable through `element` — is tagged.
        let bare_identifier: BoxedCombinator<Rule> = Rc::new(RegexField::new(
            None,
            r"[a-zA-Z\-+*^/0-9<>=]+",
        ));
        let atom: BoxedCombinator<Rule> = Rc::new(Or::new(
            Some(Rule::Atom),
            vec![identifier, number, string],
        ));

        let element_ref: Rc<RefProd<Rule>> = Rc::new(RefProd::new());
        let element: BoxedCombinator<Rule> = element_ref.clone();

        let type_name_ref: Rc<RefProd<Rule>> = Rc::new(RefProd::new());
        let type_name: BoxedCombinator<Rule> = type_name_ref.clone();
        let bracketed_type_name: BoxedCombinator<Rule> = Rc::new(And::new(
            Some(Rule::TypeName),
            vec![
                bare_identifier.clone(),
                Rc::new(Literal::new(None, "[".into())),
                type_name.clone(),
                Rc::new(Literal::new(None, "]".into())),
            ],
        ));
        type_name_ref.set(Rc::new(Or::new(
            Some(Rule::TypeName),
            vec![bracketed_type_name, bare_identifier.clone()],
        )));

        let type_dec: BoxedCombinator<Rule> = Rc::new(And::new(
            Some(Rule::TypeDec),
            vec![
                bare_identifier.clone(),
                Rc::new(Literal::new(None, ":".into())),
                type_name,
            ],
        ));

        let form: BoxedCombinator<Rule> = Rc::new(And::new(
            Some(Rule::Form),
            vec![
                Rc::new(Literal::new(None, "(".into())),
                many(Some(Rule::Elements), element.clone(), None),
                Rc::new(Literal::new(None, ")".into())),
            ],
        ));

        let function_def: BoxedCombinator<Rule> = Rc::new(And::new(
            Some(Rule::FunctionDef),
            vec![
                Rc::new(Literal::new(None, "(".into())),
                Rc::new(Literal::new(None, "fun".into())),
                bare_identifier,
                Rc::new(Literal::new(None, "(".into())),
                many(
                    Some(Rule::Elements),
                    type_dec,
                    Some(Rc::new(Literal::new(None, ",".into()))),
                ),
                Rc::new(Literal::new(None, ")".into())),
                element.clone(),
                Rc::new(Literal::new(None, ")".into())),
            ],
        ));

        element_ref.set(Rc::new(Or::new(
            Some(Rule::Element),
            vec![form, function_def.clone(), atom],
        )));

        let program = Rc::new(AtLeastOne::new(Some(Rule::Program), element, None));

        Self { program }
    }

    /// Parses `source` tokens against the grammar root (`program`), pruned
    /// per §4.4's `excluded`/`useChildRule` configuration. Returns the raw
    /// success flag, the pruned tree and the remaining (hopefully empty)
    /// stream — the driver in `lib.rs` turns this into `Result<_, ParseError>`.
    pub fn parse(&self, tokens: TokenStream) -> (bool, PT<Rule>, TokenStream) {
        let (ok, tree, rest) = self.program.parse(tokens);
        (ok, tree.prune(&excluded(), &use_child_rule()), rest)
    }
}

impl Default for Grammar {
    fn default() -> Self {
        Self::new()
    }
}
