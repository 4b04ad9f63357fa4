//! A parser-combinator engine and static type checker for a small,
//! parenthesized Lisp-flavored surface language.
//!
//! # Overview
//!
//! The crate is layered bottom-up:
//!
//! - [`production`] — a PEG-style combinator kernel ([`production::Combinator`])
//!   operating on a [`stream::TokenStream`] and producing a [`pt::PT`] parse
//!   tree. Combinators never panic and never consume input on failure.
//! - [`lexer`] — a single regex-alternation tokenizer.
//! - [`grammar`] — the surface grammar built from the kernel, plus the
//!   [`pt::PT::prune`] configuration that turns a raw parse tree into a
//!   lean one.
//! - [`ast`] — the term algebra ([`ast::Expr`], [`ast::Function`], ...)
//!   lowered from a pruned tree.
//! - [`types`] / [`typecheck`] — the type lattice and the checker that
//!   infers a [`types::Type`] for every top-level function.
//!
//! [`parse_program`] and [`check`] compose these into the two operations a
//! caller needs: turn source text into a program, and turn a program into
//! a checked namespace of function types.
pub mod ast;
pub mod error;
pub mod grammar;
pub mod lexer;
pub mod production;
pub mod pt;
pub mod stream;
pub mod typecheck;
pub mod types;

pub use ast::{Expr, Form, Function, TopLevel, TypeDec, TypeName};
pub use error::{ImplementationError, ParseError, TypeError};
pub use grammar::{Grammar, Rule};
pub use lexer::Lexer;
pub use pt::PT;
pub use stream::TokenStream;
pub use typecheck::{CheckFailure, Namespace};
pub use types::{Primitive, Type};

/// Parses `source` into its top-level functions and expressions, requiring
/// a zero-argument `main` (spec §6: "a `main` function with no arguments
/// acting as the entry point").
///
/// Returns a [`ParseError`] if the token stream cannot be consumed by the
/// grammar, is left with unconsumed trailing tokens, or a reserved builtin
/// is redefined as a user function. Does not run the type checker — call
/// [`check`] on the result for that.
pub fn parse_program(source: &str) -> Result<Vec<TopLevel>, ParseError> {
    let program = parse_line(source)?;
    match program.iter().find_map(|top| match top {
        TopLevel::Function(f) if f.name == "main" => Some(f),
        _ => None,
    }) {
        Some(main) if main.args.is_empty() => Ok(program),
        Some(_) => Err(ParseError::new(0, "'main' must take no arguments")),
        None => Err(ParseError::new(0, "program has no 'main' function")),
    }
}

/// Parses `source` into its top-level functions and expressions without
/// requiring a `main` — the REPL / line-at-a-time entry point (spec §6's
/// "optional in an interactive line-at-a-time mode").
pub fn parse_line(source: &str) -> Result<Vec<TopLevel>, ParseError> {
    let lexer = Lexer::default();
    let tokens = TokenStream::new(lexer.tokenize(source));
    let grammar = Grammar::new();
    let (ok, tree, rest) = grammar.parse(tokens);
    if !ok {
        return Err(ParseError::unparsed(rest.position()));
    }
    if !rest.is_empty() {
        return Err(ParseError::trailing_input(rest.position()));
    }
    ast::lower_program(&tree).map_err(|e| match e {
        ast::LowerError::Syntax(parse_error) => parse_error,
        ast::LowerError::Internal(impl_error) => {
            ParseError::new(0, format!("{impl_error}"))
        }
    })
}

/// Type-checks a parsed program's functions in order (spec §4.6, §7).
/// Non-function top-level expressions are ignored: only function
/// definitions populate the namespace.
pub fn check(program: &[TopLevel]) -> Result<Namespace, CheckFailure> {
    let functions: Vec<Function> = program
        .iter()
        .filter_map(|top| match top {
            TopLevel::Function(f) => Some(f.clone()),
            TopLevel::Expr(_) => None,
        })
        .collect();
    typecheck::check_types(&functions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s1_parses_and_checks_a_minimal_main() {
        let program = parse_program("(fun main () 42)").expect("parses");
        let namespace = check(&program).expect("type-checks");
        assert_eq!(
            namespace.get("main"),
            Some(&Type::Primitive(Primitive::Number))
        );
    }

    #[test]
    fn parse_program_requires_a_zero_arg_main() {
        assert!(parse_program("(fun helper () 1)").is_err());
        assert!(parse_program("(fun main (x: number) x)").is_err());
    }

    #[test]
    fn parse_line_does_not_require_main() {
        let program = parse_line("(fun helper () 1)").expect("parses without main");
        assert_eq!(program.len(), 1);
    }

    #[test]
    fn rejects_trailing_input() {
        let err = parse_line("(fun main () 1))").unwrap_err();
        assert_eq!(err.message, "Could not parse the whole input!");
    }

    #[test]
    fn rejects_unparseable_input() {
        let err = parse_line("(fun main (").unwrap_err();
        assert_eq!(err.message, "Could not parse!");
    }

    #[test]
    fn rejects_redefining_a_builtin_with_the_original_wording() {
        let err = parse_line("(fun + (x: number) x)").unwrap_err();
        assert_eq!(err.message, "Builtin function + is being redefined.");
    }

    #[test]
    fn check_ignores_bare_top_level_expressions() {
        let program = parse_line("(fun main () 1) (+ 1 2)").expect("parses");
        assert_eq!(program.len(), 2);
        let namespace = check(&program).expect("type-checks");
        assert_eq!(namespace.len(), 1);
    }

    #[test]
    fn check_surfaces_a_type_error_with_the_partial_namespace_intact() {
        let program = parse_line("(fun one () 1) (fun broken () undefined_name)").expect("parses");
        let failure = check(&program).unwrap_err();
        assert_eq!(
            failure.partial.get("one"),
            Some(&Type::Primitive(Primitive::Number))
        );
        assert_eq!(failure.error.0, "Cannot infer type of 'undefined_name'");
    }
}
