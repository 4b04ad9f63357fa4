//! Term algebra (spec §3, §4.4): the typed shape lowered from a pruned
//! [`PT`] tree. Lowering is a single dispatch on each node's [`Rule`] tag,
//! grounded in `original_source/examples/lisp/constructs.py`'s
//! `to_object`/`to_form`/`to_type`/`to_args`/`to_function`.
use crate::error::{ImplementationError, ParseError};
use crate::grammar::Rule;
use crate::pt::PT;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum AtomValue {
    Number(f64),
    Str(String),
    Bool(bool),
    Identifier(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub value: AtomValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Atom(Atom),
    Form(Form),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Form {
    pub elements: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeName {
    pub base: String,
    pub sub: Option<Box<TypeName>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeDec {
    pub identifier: String,
    pub type_name: TypeName,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub args: Vec<TypeDec>,
    pub body: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TopLevel {
    Function(Function),
    Expr(Expr),
}

/// Classifies a raw token into an [`AtomValue`] (spec §4.4: "classified by
/// regex at lower time"). Order matters: a quoted string is recognized
/// before anything else could misread its contents.
pub fn classify_atom(token: &str) -> AtomValue {
    if token.starts_with('"') && token.ends_with('"') && token.len() >= 2 {
        return AtomValue::Str(token[1..token.len() - 1].to_string());
    }
    match token {
        "true" => return AtomValue::Bool(true),
        "false" => return AtomValue::Bool(false),
        _ => {}
    }
    if let Ok(n) = token.parse::<f64>() {
        return AtomValue::Number(n);
    }
    AtomValue::Identifier(token.to_string())
}

/// Lowering can fail two different ways: a malformed program (the user
/// redefined a reserved name — a `SyntaxError` in
/// `original_source/examples/lisp/constructs.py`'s `to_function`) or a
/// pruned tree that doesn't have the shape this module assumes (a bug in
/// `grammar.rs`, not in the user's program).
#[derive(Debug, Clone, PartialEq)]
pub enum LowerError {
    Syntax(ParseError),
    Internal(ImplementationError),
}

impl From<ImplementationError> for LowerError {
    fn from(e: ImplementationError) -> Self {
        LowerError::Internal(e)
    }
}

impl From<ParseError> for LowerError {
    fn from(e: ParseError) -> Self {
        LowerError::Syntax(e)
    }
}

impl fmt::Display for LowerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LowerError::Syntax(e) => write!(f, "{e}"),
            LowerError::Internal(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for LowerError {}

fn err(what: &str, message: impl Into<String>) -> ImplementationError {
    ImplementationError::new(what, message.into())
}

fn lower_atom(node: &PT<Rule>) -> Result<Atom, LowerError> {
    let token = node
        .matched
        .first()
        .ok_or_else(|| err("ast::lower_atom", "atom node carries no matched token"))?;
    Ok(Atom {
        value: classify_atom(token),
    })
}

fn lower_expr(node: &PT<Rule>) -> Result<Expr, LowerError> {
    match node.rule_id {
        Some(Rule::Atom) => Ok(Expr::Atom(lower_atom(node)?)),
        Some(Rule::Form) => Ok(Expr::Form(lower_form(node)?)),
        other => Err(err(
            "ast::lower_expr",
            format!("expected an atom or form node, got {other:?}"),
        )),
    }
}

fn lower_form(node: &PT<Rule>) -> Result<Form, LowerError> {
    let elements = match node.children.first() {
        None => Vec::new(),
        Some(first) if first.rule_id == Some(Rule::Elements) => first
            .children
            .iter()
            .map(lower_expr)
            .collect::<Result<Vec<_>, _>>()?,
        Some(single) => vec![lower_expr(single)?],
    };
    Ok(Form { elements })
}

fn lower_type_name(node: &PT<Rule>) -> Result<TypeName, LowerError> {
    let base = node
        .matched
        .first()
        .ok_or_else(|| err("ast::lower_type_name", "type name node carries no base token"))?
        .clone();
    let sub = match node.children.first() {
        Some(child) => Some(Box::new(lower_type_name(child)?)),
        None => None,
    };
    Ok(TypeName { base, sub })
}

fn lower_type_dec(node: &PT<Rule>) -> Result<TypeDec, LowerError> {
    let identifier = node
        .matched
        .first()
        .ok_or_else(|| err("ast::lower_type_dec", "type_dec node carries no identifier token"))?
        .clone();
    let type_node = node
        .children
        .first()
        .ok_or_else(|| err("ast::lower_type_dec", "type_dec node has no type_name child"))?;
    Ok(TypeDec {
        identifier,
        type_name: lower_type_name(type_node)?,
    })
}

fn lower_args(node: &PT<Rule>) -> Result<Vec<TypeDec>, LowerError> {
    match node.rule_id {
        Some(Rule::Elements) => node.children.iter().map(lower_type_dec).collect(),
        Some(Rule::TypeDec) => Ok(vec![lower_type_dec(node)?]),
        // A single argument collapses `Elements` away entirely via
        // `useChildRule`, leaving a bare `TypeName` when the lone parameter
        // itself degenerates further than `TypeDec` does (excluded, so this
        // shouldn't normally happen — defensive only).
        _ => Ok(Vec::new()),
    }
}

/// Reserved head symbols (spec §4.5). Redefining one as a user function is
/// rejected during lowering, matching `to_function`'s `SyntaxError`.
pub const BUILTINS: &[&str] = &[
    "import", "+", "-", "*", "/", "^", "=", ">", "<", ">=", "<=", "and", "or", "not", "print",
    "list", "++", "first", "rest", "map", "filter", "lambda", "if",
];

fn lower_function(node: &PT<Rule>) -> Result<Function, LowerError> {
    let name = node
        .matched
        .get(2)
        .ok_or_else(|| err("ast::lower_function", "function_def node is missing its name token"))?
        .clone();
    if BUILTINS.contains(&name.as_str()) {
        return Err(LowerError::Syntax(ParseError::new(
            0,
            format!("Builtin function {name} is being redefined."),
        )));
    }
    let args_node = node
        .children
        .first()
        .ok_or_else(|| err("ast::lower_function", "function_def node has no argument list"))?;
    let body_node = node
        .children
        .get(1)
        .ok_or_else(|| err("ast::lower_function", "function_def node has no body"))?;
    Ok(Function {
        name,
        args: lower_args(args_node)?,
        body: vec![lower_expr(body_node)?],
    })
}

fn lower_top_level(node: &PT<Rule>) -> Result<TopLevel, LowerError> {
    match node.rule_id {
        Some(Rule::FunctionDef) => Ok(TopLevel::Function(lower_function(node)?)),
        Some(Rule::Atom) => Ok(TopLevel::Expr(Expr::Atom(lower_atom(node)?))),
        Some(Rule::Form) => Ok(TopLevel::Expr(Expr::Form(lower_form(node)?))),
        other => Err(err(
            "ast::lower_top_level",
            format!("expected a top-level function, form, or atom, got {other:?}"),
        )),
    }
}

/// Lowers a pruned `Program` tree (root of `grammar::Grammar::parse`) into
/// the program's top-level definitions and bare expressions, in order.
pub fn lower_program(tree: &PT<Rule>) -> Result<Vec<TopLevel>, LowerError> {
    if tree.rule_id != Some(Rule::Program) {
        return Err(err(
            "ast::lower_program",
            format!("expected a Program root, got {:?}", tree.rule_id),
        ));
    }
    tree.children.iter().map(lower_top_level).collect()
}
