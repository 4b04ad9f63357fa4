//! The type checker (spec §4.6, §4.7), grounded in
//! `original_source/examples/lisp/type_system/type_checker.py`. Error
//! message text is part of the external contract (spec §6) and is produced
//! verbatim from this module.
use crate::ast::{Atom, AtomValue, Expr, Form, Function, TypeName, BUILTINS};
use crate::error::TypeError;
use crate::types::{join, Primitive, Type};
use std::collections::HashMap;

pub type Namespace = HashMap<String, Type>;

/// Result of a failed [`check_types`] pass: the error that aborted it and
/// the namespace as it stood right before that failure (spec §7 — no
/// binding is discarded, later functions may still be diagnosed against it).
#[derive(Debug, Clone, PartialEq)]
pub struct CheckFailure {
    pub error: TypeError,
    pub partial: Namespace,
}

/// Resolves a surface `TypeName` against the `baseTypes`/`constructors`
/// registries (spec §4.7).
pub fn resolve_type_name(type_name: &TypeName) -> Result<Type, TypeError> {
    match &type_name.sub {
        None => match type_name.base.as_str() {
            "number" => Ok(Type::Primitive(Primitive::Number)),
            "string" => Ok(Type::Primitive(Primitive::String)),
            "bool" => Ok(Type::Primitive(Primitive::Bool)),
            "EmptyList" => Ok(Type::EmptyList),
            "List" | "List*" => Err(TypeError::new(format!(
                "Base type '{}' is not defined, maybe you meant '{}[...]'",
                type_name.base, type_name.base
            ))),
            other => Err(TypeError::new(format!("Base type '{other}' is not defined"))),
        },
        Some(sub) => {
            let element = resolve_type_name(sub)?;
            match type_name.base.as_str() {
                "List" => Ok(Type::list(element)),
                "List*" => Ok(Type::list_star(element)),
                other => Err(TypeError::new(format!(
                    "Composite type '{other}' is not defined"
                ))),
            }
        }
    }
}

fn atom_display(atom: &Atom) -> String {
    match &atom.value {
        AtomValue::Identifier(s) => s.clone(),
        AtomValue::Str(s) => format!("\"{s}\""),
        AtomValue::Bool(b) => b.to_string(),
        AtomValue::Number(n) => n.to_string(),
    }
}

/// Fetches `elements[index]` or reports the builtin's arity requirement as
/// a `TypeError` instead of panicking — the grammar accepts `(first)`,
/// `(if x)`, etc. as valid syntax (spec §4.4's `form` allows zero or more
/// elements), so too-few-arguments is a type error, not an internal bug.
fn require_arg<'a>(
    elements: &'a [Expr],
    index: usize,
    name: &str,
    min_args: usize,
) -> Result<&'a Expr, TypeError> {
    elements.get(index).ok_or_else(|| {
        TypeError::new(format!(
            "'{name}' expects at least {min_args} argument{}",
            if min_args == 1 { "" } else { "s" }
        ))
    })
}

fn infer_atom(atom: &Atom, namespace: &Namespace) -> Result<Type, TypeError> {
    match &atom.value {
        AtomValue::Str(_) => Ok(Type::Primitive(Primitive::String)),
        AtomValue::Bool(_) => Ok(Type::Primitive(Primitive::Bool)),
        AtomValue::Number(_) => Ok(Type::Primitive(Primitive::Number)),
        AtomValue::Identifier(name) => namespace
            .get(name)
            .cloned()
            .ok_or_else(|| TypeError::new(format!("Cannot infer type of '{name}'"))),
    }
}

fn infer_list(elements: &[Expr], namespace: &Namespace) -> Result<Type, TypeError> {
    if elements.len() == 1 {
        return Ok(Type::EmptyList);
    }
    let mut element_type = infer_type(&elements[1], namespace)?;
    for i in 2..elements.len() {
        let i_type = infer_type(&elements[i], namespace)?;
        match join(&Type::list(element_type.clone()), &Type::list(i_type.clone())) {
            Ok(Type::List(joined)) => element_type = *joined,
            _ => {
                return Err(TypeError::new(format!(
                    "List {}-th element has type '{i_type}' which is not compatible with inferred type '{element_type}'",
                    i - 1
                )));
            }
        }
    }
    Ok(Type::list(element_type))
}

fn infer_append(elements: &[Expr], namespace: &Namespace) -> Result<Type, TypeError> {
    let element_type = infer_type(require_arg(elements, 1, "++", 2)?, namespace)?;
    let list_type = infer_type(require_arg(elements, 2, "++", 2)?, namespace)?;
    if matches!(list_type, Type::EmptyList) {
        return Ok(Type::list(element_type));
    }
    if matches!(list_type, Type::List(_) | Type::ListStar(_)) {
        if let Ok(joined) = join(&Type::list(element_type.clone()), &list_type) {
            let inner = match joined {
                Type::List(e) | Type::ListStar(e) => *e,
                _ => unreachable!("join(List, _) only ever produces List or List*"),
            };
            return Ok(Type::list(inner));
        }
    }
    Err(TypeError::new(format!(
        "Cannot append element of type '{element_type}' to '{list_type}'"
    )))
}

fn infer_first(elements: &[Expr], namespace: &Namespace) -> Result<Type, TypeError> {
    let list_type = infer_type(require_arg(elements, 1, "first", 1)?, namespace)?;
    match list_type {
        Type::List(e) => Ok(*e),
        other => Err(TypeError::new(format!(
            "'first' expected a non-empty List type but got '{other}'"
        ))),
    }
}

fn infer_rest(elements: &[Expr], namespace: &Namespace) -> Result<Type, TypeError> {
    let list_type = infer_type(require_arg(elements, 1, "rest", 1)?, namespace)?;
    match list_type {
        Type::List(e) => Ok(Type::list_star(*e)),
        other => Err(TypeError::new(format!(
            "'rest' expected a non-empty List type but got '{other}'"
        ))),
    }
}

fn infer_if(elements: &[Expr], namespace: &Namespace) -> Result<Type, TypeError> {
    let condition = infer_type(require_arg(elements, 1, "if", 3)?, namespace)?;
    if condition != Type::Primitive(Primitive::Bool) {
        return Err(TypeError::new(format!(
            "Expected if condition to have type 'bool' but got '{condition}'"
        )));
    }
    let then_type = infer_type(require_arg(elements, 2, "if", 3)?, namespace)?;
    let else_type = infer_type(require_arg(elements, 3, "if", 3)?, namespace)?;
    if then_type == else_type {
        return Ok(then_type);
    }
    let maybe_empty = |a: &Type, b: &Type| {
        matches!(a, Type::List(_)) && matches!(b, Type::EmptyList | Type::ListStar(_))
    };
    if maybe_empty(&then_type, &else_type) || maybe_empty(&else_type, &then_type) {
        let element = match (&then_type, &else_type) {
            (Type::List(e), _) => (**e).clone(),
            (_, Type::List(e)) => (**e).clone(),
            _ => unreachable!("maybe_empty guarantees one side is List(_)"),
        };
        return Ok(Type::list_star(element));
    }
    Err(TypeError::new(format!(
        "Incompatible types in if branches: '{then_type}' and '{else_type}'"
    )))
}

fn infer_comparison(name: &str, elements: &[Expr], namespace: &Namespace) -> Result<Type, TypeError> {
    let first = infer_type(require_arg(elements, 1, name, 2)?, namespace)?;
    let second = infer_type(require_arg(elements, 2, name, 2)?, namespace)?;
    if first != second {
        return Err(TypeError::new(format!(
            "'{name}' expects '{first}' but got '{second}' for the second argument"
        )));
    }
    Ok(Type::Primitive(Primitive::Bool))
}

fn infer_arithmetic(name: &str, elements: &[Expr], namespace: &Namespace) -> Result<Type, TypeError> {
    let element_type = infer_type(require_arg(elements, 1, name, 1)?, namespace)?;
    if element_type != Type::Primitive(Primitive::Number) {
        return Err(TypeError::new(format!(
            "'{name}' expects '{}' but got '{element_type}'",
            Primitive::Number
        )));
    }
    for (i, element) in elements.iter().enumerate().skip(2) {
        let i_type = infer_type(element, namespace)?;
        if element_type != i_type {
            return Err(TypeError::new(format!(
                "'{name}' expects '{element_type}' but got '{i_type}' for {}-th argument",
                i - 2
            )));
        }
    }
    Ok(element_type)
}

fn infer_form(form: &Form, namespace: &Namespace) -> Result<Type, TypeError> {
    let head = match form.elements.first() {
        Some(Expr::Atom(atom)) => atom,
        _ => {
            return Err(TypeError::new(
                "Unrecognized form, cannot infer type".to_string(),
            ))
        }
    };
    let name = match &head.value {
        AtomValue::Identifier(name) => name.clone(),
        _ => {
            return Err(TypeError::new(format!(
                "Unrecognized form '{}', cannot infer type",
                atom_display(head)
            )))
        }
    };
    if let Some(bound) = namespace.get(&name) {
        return Ok(bound.clone());
    }
    if !BUILTINS.contains(&name.as_str()) {
        return Err(TypeError::new(format!(
            "Unrecognized form '{name}', cannot infer type"
        )));
    }
    match name.as_str() {
        "list" => infer_list(&form.elements, namespace),
        "++" => infer_append(&form.elements, namespace),
        "first" => infer_first(&form.elements, namespace),
        "rest" => infer_rest(&form.elements, namespace),
        "if" => infer_if(&form.elements, namespace),
        "print" => infer_type(require_arg(&form.elements, 1, "print", 1)?, namespace),
        ">" | "<" | "<=" | ">=" => infer_comparison(&name, &form.elements, namespace),
        "+" | "-" | "*" | "/" => infer_arithmetic(&name, &form.elements, namespace),
        // Builtins with no inference rule of their own (`and`, `or`, `not`,
        // `=`, `lambda`, `map`, `filter`, `import`): reserved so a user
        // can't redefine them, but using one as a value form has no type.
        _ => Err(TypeError::new(format!(
            "Unrecognized form '{name}', cannot infer type"
        ))),
    }
}

/// Infers the type of any term in the algebra (spec §4.6's dispatch).
pub fn infer_type(expr: &Expr, namespace: &Namespace) -> Result<Type, TypeError> {
    match expr {
        Expr::Atom(atom) => infer_atom(atom, namespace),
        Expr::Form(form) => infer_form(form, namespace),
    }
}

fn infer_function_type(function: &Function, namespace: &Namespace) -> Result<Type, TypeError> {
    let mut inner = namespace.clone();
    for arg in &function.args {
        let resolved = resolve_type_name(&arg.type_name)?;
        inner.insert(arg.identifier.clone(), resolved);
    }
    let body = function
        .body
        .first()
        .ok_or_else(|| TypeError::new(format!("Function '{}' has no body", function.name)))?;
    infer_type(body, &inner)
}

/// Checks every function in order, threading the namespace so later
/// functions see earlier ones (spec §4.6, §8 invariant 6: no binding is
/// ever overwritten within a pass).
pub fn check_types(functions: &[Function]) -> Result<Namespace, CheckFailure> {
    let mut namespace = Namespace::new();
    for function in functions {
        match infer_function_type(function, &namespace) {
            Ok(inferred) => {
                namespace.insert(function.name.clone(), inferred);
            }
            Err(error) => {
                return Err(CheckFailure {
                    error,
                    partial: namespace,
                })
            }
        }
    }
    Ok(namespace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Atom, AtomValue, Expr, Form, TypeDec};

    fn atom_num(n: f64) -> Expr {
        Expr::Atom(Atom {
            value: AtomValue::Number(n),
        })
    }

    fn atom_id(name: &str) -> Expr {
        Expr::Atom(Atom {
            value: AtomValue::Identifier(name.to_string()),
        })
    }

    fn form(elements: Vec<Expr>) -> Expr {
        Expr::Form(Form { elements })
    }

    #[test]
    fn s2_empty_list() {
        let namespace = Namespace::new();
        let expr = form(vec![atom_id("list")]);
        assert_eq!(infer_type(&expr, &namespace).unwrap(), Type::EmptyList);
    }

    #[test]
    fn s3_homogeneous_list() {
        let namespace = Namespace::new();
        let expr = form(vec![atom_id("list"), atom_num(1.0), atom_num(2.0)]);
        assert_eq!(
            infer_type(&expr, &namespace).unwrap(),
            Type::list(Type::Primitive(Primitive::Number))
        );
    }

    #[test]
    fn s4_mismatched_list_element() {
        let namespace = Namespace::new();
        let string_atom = Expr::Atom(Atom {
            value: AtomValue::Str("x".to_string()),
        });
        let expr = form(vec![atom_id("list"), atom_num(1.0), string_atom]);
        let err = infer_type(&expr, &namespace).unwrap_err();
        assert_eq!(
            err.0,
            "List 1-th element has type 'string' which is not compatible with inferred type 'number'"
        );
    }

    #[test]
    fn s5_append_to_empty_and_mismatch() {
        let namespace = Namespace::new();
        let ok = form(vec![atom_id("++"), atom_num(1.0), form(vec![atom_id("list")])]);
        assert_eq!(
            infer_type(&ok, &namespace).unwrap(),
            Type::list(Type::Primitive(Primitive::Number))
        );

        let string_atom = Expr::Atom(Atom {
            value: AtomValue::Str("x".to_string()),
        });
        let bad = form(vec![atom_id("++"), atom_num(1.0), string_atom]);
        let err = infer_type(&bad, &namespace).unwrap_err();
        assert_eq!(
            err.0,
            "Cannot append element of type 'number' to 'string'"
        );
    }

    #[test]
    fn s6_if_branches() {
        let namespace = Namespace::new();
        let bool_atom = Expr::Atom(Atom {
            value: AtomValue::Bool(false),
        });
        let ok = form(vec![
            atom_id("if"),
            bool_atom,
            form(vec![atom_id("list"), atom_num(1.0)]),
            form(vec![atom_id("list")]),
        ]);
        assert_eq!(
            infer_type(&ok, &namespace).unwrap(),
            Type::list_star(Type::Primitive(Primitive::Number))
        );

        let bad = form(vec![atom_id("if"), atom_num(1.0), atom_num(1.0), atom_num(1.0)]);
        let err = infer_type(&bad, &namespace).unwrap_err();
        assert_eq!(
            err.0,
            "Expected if condition to have type 'bool' but got 'number'"
        );
    }

    #[test]
    fn s7_rest_of_a_list() {
        let namespace = Namespace::new();
        let expr = form(vec![
            atom_id("rest"),
            form(vec![atom_id("list"), atom_num(1.0), atom_num(2.0)]),
        ]);
        assert_eq!(
            infer_type(&expr, &namespace).unwrap(),
            Type::list_star(Type::Primitive(Primitive::Number))
        );
    }

    #[test]
    fn too_few_arguments_is_a_type_error_not_a_panic() {
        // The grammar happily parses `(first)`, `(if x)`, etc. — a form
        // with fewer elements than the builtin expects — so missing
        // arguments must surface as TypeErrors, not out-of-bounds panics.
        let namespace = Namespace::new();
        assert_eq!(
            infer_type(&form(vec![atom_id("first")]), &namespace)
                .unwrap_err()
                .0,
            "'first' expects at least 1 argument"
        );
        assert_eq!(
            infer_type(&form(vec![atom_id("rest")]), &namespace)
                .unwrap_err()
                .0,
            "'rest' expects at least 1 argument"
        );
        assert_eq!(
            infer_type(&form(vec![atom_id("++"), atom_num(1.0)]), &namespace)
                .unwrap_err()
                .0,
            "'++' expects at least 2 arguments"
        );
        assert_eq!(
            infer_type(&form(vec![atom_id("if"), atom_num(1.0)]), &namespace)
                .unwrap_err()
                .0,
            "'if' expects at least 3 arguments"
        );
        assert_eq!(
            infer_type(&form(vec![atom_id("<"), atom_num(1.0)]), &namespace)
                .unwrap_err()
                .0,
            "'<' expects at least 2 arguments"
        );
        assert_eq!(
            infer_type(&form(vec![atom_id("+")]), &namespace)
                .unwrap_err()
                .0,
            "'+' expects at least 1 argument"
        );
        assert_eq!(
            infer_type(&form(vec![atom_id("print")]), &namespace)
                .unwrap_err()
                .0,
            "'print' expects at least 1 argument"
        );
    }

    #[test]
    fn rejects_redefining_a_builtin_name_via_checker_namespace() {
        // Builtins never enter the namespace, so even a wholly unrelated
        // function named e.g. "first" is found via the builtin dispatch
        // first, not shadowed — this test locks in that precedence.
        let functions = vec![Function {
            name: "main".to_string(),
            args: vec![],
            body: vec![form(vec![atom_id("+"), atom_num(1.0), atom_num(2.0)])],
        }];
        let namespace = check_types(&functions).unwrap();
        assert_eq!(
            namespace.get("main"),
            Some(&Type::Primitive(Primitive::Number))
        );
    }

    #[test]
    fn namespace_is_monotonic_across_functions() {
        let functions = vec![
            Function {
                name: "one".to_string(),
                args: vec![],
                body: vec![atom_num(1.0)],
            },
            Function {
                name: "two".to_string(),
                args: vec![],
                body: vec![atom_id("one")],
            },
        ];
        let namespace = check_types(&functions).unwrap();
        assert_eq!(namespace.get("one"), Some(&Type::Primitive(Primitive::Number)));
        assert_eq!(namespace.get("two"), Some(&Type::Primitive(Primitive::Number)));
    }

    #[test]
    fn failure_preserves_partial_namespace() {
        let functions = vec![
            Function {
                name: "one".to_string(),
                args: vec![],
                body: vec![atom_num(1.0)],
            },
            Function {
                name: "broken".to_string(),
                args: vec![],
                body: vec![atom_id("undefined_name")],
            },
        ];
        let failure = check_types(&functions).unwrap_err();
        assert_eq!(failure.partial.get("one"), Some(&Type::Primitive(Primitive::Number)));
        assert!(!failure.partial.contains_key("broken"));
    }

    #[test]
    fn resolves_nested_generic_type_names() {
        let type_name = TypeName {
            base: "List".to_string(),
            sub: Some(Box::new(TypeName {
                base: "number".to_string(),
                sub: None,
            })),
        };
        assert_eq!(
            resolve_type_name(&type_name).unwrap(),
            Type::list(Type::Primitive(Primitive::Number))
        );
    }

    #[test]
    fn hints_at_missing_brackets_for_constructor_base_types() {
        let type_name = TypeName {
            base: "List".to_string(),
            sub: None,
        };
        let err = resolve_type_name(&type_name).unwrap_err();
        assert_eq!(
            err.0,
            "Base type 'List' is not defined, maybe you meant 'List[...]'"
        );
    }

    #[test]
    fn function_params_resolve_into_inner_namespace() {
        let functions = vec![Function {
            name: "id".to_string(),
            args: vec![TypeDec {
                identifier: "x".to_string(),
                type_name: TypeName {
                    base: "number".to_string(),
                    sub: None,
                },
            }],
            body: vec![atom_id("x")],
        }];
        let namespace = check_types(&functions).unwrap();
        assert_eq!(namespace.get("id"), Some(&Type::Primitive(Primitive::Number)));
    }
}
