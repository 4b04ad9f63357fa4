//! The type lattice (spec §3, §4.6) and its `join` operator, grounded in
//! `original_source/examples/lisp/type_system/types.py`.
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Number,
    String,
    Bool,
    Void,
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Primitive::Number => "number",
            Primitive::String => "string",
            Primitive::Bool => "bool",
            Primitive::Void => "void",
        };
        write!(f, "{name}")
    }
}

/// A value in the lattice described by spec §3. Structurally compared:
/// `Type::List(Box::new(Type::Primitive(Primitive::Number)))` is equal to
/// another instance built the same way regardless of identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Primitive(Primitive),
    /// Inhabited only by the literal `(list)`.
    EmptyList,
    /// Known non-empty list of `T`.
    List(Box<Type>),
    /// "Possibly empty" list of `T` — the join of `List[T]` with `EmptyList`.
    ListStar(Box<Type>),
    /// Absorbing bottom used for error reporting; compatible with nothing,
    /// not even itself.
    Unrecognized,
}

impl Type {
    pub fn list(element: Type) -> Type {
        Type::List(Box::new(element))
    }

    pub fn list_star(element: Type) -> Type {
        Type::ListStar(Box::new(element))
    }

    fn is_empty_list(&self) -> bool {
        matches!(self, Type::EmptyList)
    }

    fn is_list(&self) -> bool {
        matches!(self, Type::List(_))
    }

    fn is_list_star(&self) -> bool {
        matches!(self, Type::ListStar(_))
    }

    fn element(&self) -> Option<&Type> {
        match self {
            Type::List(t) | Type::ListStar(t) => Some(t),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Primitive(p) => write!(f, "{p}"),
            Type::EmptyList => write!(f, "EmptyList"),
            Type::List(t) => write!(f, "List<{t}>"),
            Type::ListStar(t) => write!(f, "List*<{t}>"),
            Type::Unrecognized => write!(f, "UnrecognizedType"),
        }
    }
}

/// The lattice join (∪), spec §4.6. Returns the joined type or the
/// "Incompatible list types" message verbatim (part of the external error
/// contract, reused by callers composing their own messages around it).
pub fn join(t1: &Type, t2: &Type) -> Result<Type, String> {
    if t1.is_empty_list() && t2.is_empty_list() {
        return Ok(Type::EmptyList);
    }
    if (t1.is_list() || t1.is_list_star()) && t2.is_empty_list() {
        return Ok(Type::list_star(t1.element().unwrap().clone()));
    }
    if (t2.is_list() || t2.is_list_star()) && t1.is_empty_list() {
        return Ok(Type::list_star(t2.element().unwrap().clone()));
    }
    if t1.is_list() && t2.is_list() {
        return match join(t1.element().unwrap(), t2.element().unwrap()) {
            Ok(element) => Ok(Type::list(element)),
            Err(_) => Err(format!(
                "Incompatible list types '{t1}' and '{t2}'"
            )),
        };
    }
    if (t1.is_list() || t1.is_list_star()) && (t2.is_list() || t2.is_list_star()) {
        return match join(t1.element().unwrap(), t2.element().unwrap()) {
            Ok(element) => Ok(Type::list_star(element)),
            Err(_) => Err(format!(
                "Incompatible list types '{t1}' and '{t2}'"
            )),
        };
    }
    if matches!(t1, Type::Unrecognized) || matches!(t2, Type::Unrecognized) {
        // Unrecognized is the lattice's absorbing bottom: compatible with
        // nothing, not even itself (spec.md §3).
        return Err(format!("Incompatible list types '{t1}' and '{t2}'"));
    }
    if t1 == t2 {
        return Ok(t1.clone());
    }
    Err(format!("Incompatible list types '{t1}' and '{t2}'"))
}
