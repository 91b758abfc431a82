//! AST node types for Drift programs.
//!
//! The tree is heap-owned: expression children are boxed, blocks are vectors.
//! Function bodies are `Rc<[Stmt]>` because every function value closes over
//! its body, and closures share the statements rather than clone them.

use std::fmt;
use std::rc::Rc;

use crate::{InterrogativeKind, Name, PredicateKind, Span};

/// A complete parsed program: the top-level statement sequence.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Program {
    pub stmts: Vec<Stmt>,
}

/// Statement node.
#[derive(Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Stmt { kind, span }
    }
}

impl fmt::Debug for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {:?}", self.kind, self.span)
    }
}

/// Statement kinds.
#[derive(Clone, PartialEq, Debug)]
pub enum StmtKind {
    /// Expression statement
    Expr(Expr),

    /// Assignment: `name is expression`
    Assign { name: Name, value: Expr },

    /// Function definition: `define name [as]: block`
    ///
    /// The parameter is always the implicit `n`; the field exists so the
    /// evaluator binds by `Name` without re-interning.
    FuncDef {
        name: Name,
        param: Name,
        body: Rc<[Stmt]>,
    },

    /// Conditional: `if cond: block` with optional `else: block`
    If {
        cond: Expr,
        then_body: Vec<Stmt>,
        else_body: Option<Vec<Stmt>>,
    },

    /// Loop: `loop [while] cond: block`
    Loop { cond: Expr, body: Vec<Stmt> },

    /// Early return: `return expression`
    Return(Expr),
}

/// Expression node.
#[derive(Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {:?}", self.kind, self.span)
    }
}

/// Expression kinds.
#[derive(Clone, PartialEq, Debug)]
pub enum ExprKind {
    /// Number literal: 42, 3.14
    Num(f64),

    /// String literal (interned)
    Str(Name),

    /// Null literal, also synthesized by parser error recovery
    Null,

    /// Variable reference
    Ident(Name),

    /// List literal: `[a, b, c]`
    List(Vec<Expr>),

    /// List comprehension: `[expr for var in iter if filter]`
    ListComp {
        expr: Box<Expr>,
        var: Name,
        iter: Box<Expr>,
        filter: Option<Box<Expr>>,
    },

    /// Binary operation: left op right
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Unary operation: op operand
    Unary { op: UnOp, operand: Box<Expr> },

    /// Application: `func of arg`
    Relation { func: Box<Expr>, arg: Box<Expr> },

    /// Index access: `target[index]`
    Index {
        target: Box<Expr>,
        index: Box<Expr>,
    },

    /// Observer query: `what is expr`, `why is expr`, ...
    Interrogate {
        kind: InterrogativeKind,
        target: Box<Expr>,
    },

    /// State predicate on the last observation: `converged`, `diverging`, ...
    Predicate(PredicateKind),
}

/// Binary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    // Comparison
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Logical
    And,
    Or,
}

impl BinOp {
    /// Returns the source-level symbol for this operator.
    ///
    /// Used in error messages to show the exact operator that failed.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Eq => "=",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::And => "and",
            Self::Or => "or",
        }
    }
}

/// Unary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnOp {
    Neg,
    Not,
}

impl UnOp {
    /// Returns the source-level symbol for this operator.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Not => "not",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expr_construction() {
        let left = Expr::new(ExprKind::Num(1.0), Span::new(0, 1));
        let right = Expr::new(ExprKind::Num(2.0), Span::new(4, 5));
        let sum = Expr::new(
            ExprKind::Binary {
                op: BinOp::Add,
                left: Box::new(left),
                right: Box::new(right),
            },
            Span::new(0, 5),
        );

        let ExprKind::Binary { op, left, right } = &sum.kind else {
            panic!("expected binary node");
        };
        assert_eq!(*op, BinOp::Add);
        assert_eq!(left.kind, ExprKind::Num(1.0));
        assert_eq!(right.kind, ExprKind::Num(2.0));
    }

    #[test]
    fn test_func_body_is_shared() {
        let body: Rc<[Stmt]> = Rc::from(vec![Stmt::new(
            StmtKind::Return(Expr::new(ExprKind::Ident(Name::EMPTY), Span::DUMMY)),
            Span::DUMMY,
        )]);
        let def = StmtKind::FuncDef {
            name: Name::from_raw(1),
            param: Name::from_raw(2),
            body: Rc::clone(&body),
        };

        let StmtKind::FuncDef { body: shared, .. } = &def else {
            panic!("expected function definition");
        };
        assert!(Rc::ptr_eq(shared, &body));
    }

    #[test]
    fn test_operator_symbols() {
        assert_eq!(BinOp::Add.as_symbol(), "+");
        assert_eq!(BinOp::Eq.as_symbol(), "=");
        assert_eq!(BinOp::And.as_symbol(), "and");
        assert_eq!(UnOp::Neg.as_symbol(), "-");
        assert_eq!(UnOp::Not.as_symbol(), "not");
    }
}
