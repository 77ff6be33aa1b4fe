// lits-parser - AST node model
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! The abstract syntax tree produced by the parser.
//!
//! Nodes are plain data, immutable once built, and owned strictly from parent
//! to child. Every node can carry the position of the token it came from.

use std::fmt;
use std::rc::Rc;

use crate::token::Position;

/// A parsed program: its top-level forms in source order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub body: Vec<AstNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AstNode {
    Number {
        value: f64,
        position: Option<Position>,
    },
    String {
        value: String,
        position: Option<Position>,
    },
    Name {
        name: String,
        position: Option<Position>,
    },
    /// `true`, `false` or `nil`.
    ReservedName {
        name: String,
        position: Option<Position>,
    },
    NormalExpression(NormalExpression),
    SpecialExpression(Box<SpecialExpression>),
}

impl AstNode {
    pub fn position(&self) -> Option<&Position> {
        match self {
            AstNode::Number { position, .. }
            | AstNode::String { position, .. }
            | AstNode::Name { position, .. }
            | AstNode::ReservedName { position, .. } => position.as_ref(),
            AstNode::NormalExpression(expr) => expr.position.as_ref(),
            AstNode::SpecialExpression(expr) => expr.position.as_ref(),
        }
    }

    /// The name, if this node is a bare `Name`.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            AstNode::Name { name, .. } => Some(name),
            _ => None,
        }
    }

    /// A short description of the node kind, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            AstNode::Number { .. } => "number",
            AstNode::String { .. } => "string",
            AstNode::Name { .. } => "name",
            AstNode::ReservedName { .. } => "reserved name",
            AstNode::NormalExpression(_) => "expression",
            AstNode::SpecialExpression(expr) => expr.form.name(),
        }
    }
}

/// An ordinary call: every parameter is evaluated before the call.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalExpression {
    pub callee: Callee,
    pub params: Vec<AstNode>,
    pub position: Option<Position>,
}

/// The head of a normal expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Callee {
    /// A bare name: a builtin or a bound function.
    Name(String),
    /// A computed head, e.g. `((fn [x] x) 1)`.
    Expression(Box<AstNode>),
}

/// `name value` inside a bindings vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub name: String,
    pub value: AstNode,
    pub position: Option<Position>,
}

/// How many arguments a function overload accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    /// Variadic: at least this many arguments.
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(&self, count: usize) -> bool {
        match *self {
            Arity::Exact(n) => count == n,
            Arity::AtLeast(min) => count >= min,
        }
    }

    /// True if some argument count is accepted by both arities.
    pub fn overlaps(&self, other: &Arity) -> bool {
        match (*self, *other) {
            (Arity::Exact(a), Arity::Exact(b)) => a == b,
            (Arity::Exact(n), Arity::AtLeast(min)) | (Arity::AtLeast(min), Arity::Exact(n)) => {
                n >= min
            }
            (Arity::AtLeast(_), Arity::AtLeast(_)) => true,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(n) => write!(f, "{}", n),
            Arity::AtLeast(min) => write!(f, "at least {}", min),
        }
    }
}

/// A parsed argument vector: `[a b & rest &let [c (+ a b)]]`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FunctionArguments {
    pub mandatory: Vec<String>,
    pub rest: Option<String>,
    pub let_bindings: Vec<Binding>,
}

impl FunctionArguments {
    pub fn arity(&self) -> Arity {
        match self.rest {
            Some(_) => Arity::AtLeast(self.mandatory.len()),
            None => Arity::Exact(self.mandatory.len()),
        }
    }
}

/// One arity-specific implementation of a function.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionOverload {
    pub arguments: FunctionArguments,
    pub body: Vec<AstNode>,
    pub arity: Arity,
}

/// One binding of a `for`/`doseq` with its modifiers.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopBinding {
    pub binding: Binding,
    /// `&let [..]`
    pub let_bindings: Vec<Binding>,
    /// `&when expr`
    pub when: Option<AstNode>,
    /// `&while expr`
    pub while_: Option<AstNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comprehension {
    pub bindings: Vec<LoopBinding>,
    pub body: AstNode,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CondClause {
    pub test: AstNode,
    pub form: AstNode,
}

/// `if`/`if-not` share a shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Conditional {
    pub test: AstNode,
    pub then: AstNode,
    pub otherwise: Option<AstNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpecialExpression {
    pub form: SpecialForm,
    pub position: Option<Position>,
}

/// One variant per special form.
#[derive(Debug, Clone, PartialEq)]
pub enum SpecialForm {
    And(Vec<AstNode>),
    Or(Vec<AstNode>),
    Comment,
    Cond(Vec<CondClause>),
    Declared(String),
    Def {
        name: String,
        value: AstNode,
    },
    Defs {
        name: AstNode,
        value: AstNode,
    },
    Defn {
        name: String,
        overloads: Rc<[FunctionOverload]>,
    },
    Defns {
        name: AstNode,
        overloads: Rc<[FunctionOverload]>,
    },
    Fn {
        name: Option<String>,
        overloads: Rc<[FunctionOverload]>,
    },
    Do(Vec<AstNode>),
    For(Comprehension),
    Doseq(Comprehension),
    If(Conditional),
    IfNot(Conditional),
    IfLet {
        binding: Binding,
        then: AstNode,
        otherwise: Option<AstNode>,
    },
    WhenLet {
        binding: Binding,
        body: Vec<AstNode>,
    },
    WhenFirst {
        binding: Binding,
        body: Vec<AstNode>,
    },
    When {
        test: AstNode,
        body: Vec<AstNode>,
    },
    WhenNot {
        test: AstNode,
        body: Vec<AstNode>,
    },
    Let {
        bindings: Vec<Binding>,
        body: Vec<AstNode>,
    },
    Loop {
        bindings: Vec<Binding>,
        body: Vec<AstNode>,
    },
    Recur(Vec<AstNode>),
    Throw(AstNode),
    Try {
        expression: AstNode,
        error_name: String,
        catch: AstNode,
    },
}

impl SpecialForm {
    /// The source-level name of this form.
    pub fn name(&self) -> &'static str {
        match self {
            SpecialForm::And(_) => "and",
            SpecialForm::Or(_) => "or",
            SpecialForm::Comment => "comment",
            SpecialForm::Cond(_) => "cond",
            SpecialForm::Declared(_) => "declared?",
            SpecialForm::Def { .. } => "def",
            SpecialForm::Defs { .. } => "defs",
            SpecialForm::Defn { .. } => "defn",
            SpecialForm::Defns { .. } => "defns",
            SpecialForm::Fn { .. } => "fn",
            SpecialForm::Do(_) => "do",
            SpecialForm::For(_) => "for",
            SpecialForm::Doseq(_) => "doseq",
            SpecialForm::If(_) => "if",
            SpecialForm::IfNot(_) => "if-not",
            SpecialForm::IfLet { .. } => "if-let",
            SpecialForm::WhenLet { .. } => "when-let",
            SpecialForm::WhenFirst { .. } => "when-first",
            SpecialForm::When { .. } => "when",
            SpecialForm::WhenNot { .. } => "when-not",
            SpecialForm::Let { .. } => "let",
            SpecialForm::Loop { .. } => "loop",
            SpecialForm::Recur(_) => "recur",
            SpecialForm::Throw(_) => "throw",
            SpecialForm::Try { .. } => "try",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arity_accepts() {
        assert!(Arity::Exact(2).accepts(2));
        assert!(!Arity::Exact(2).accepts(3));
        assert!(Arity::AtLeast(1).accepts(1));
        assert!(Arity::AtLeast(1).accepts(5));
        assert!(!Arity::AtLeast(1).accepts(0));
    }

    #[test]
    fn test_arity_overlaps() {
        assert!(Arity::Exact(1).overlaps(&Arity::Exact(1)));
        assert!(!Arity::Exact(1).overlaps(&Arity::Exact(2)));
        assert!(!Arity::Exact(1).overlaps(&Arity::AtLeast(2)));
        assert!(Arity::Exact(3).overlaps(&Arity::AtLeast(2)));
        assert!(Arity::AtLeast(0).overlaps(&Arity::AtLeast(4)));
    }

    #[test]
    fn test_function_arguments_arity() {
        let args = FunctionArguments {
            mandatory: vec!["a".into(), "b".into()],
            rest: Some("more".into()),
            let_bindings: vec![],
        };
        assert_eq!(args.arity(), Arity::AtLeast(2));
        assert_eq!(args.arity().to_string(), "at least 2");
    }
}
