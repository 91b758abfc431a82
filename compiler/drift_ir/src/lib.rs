//! Drift IR - Shared Representation Types
//!
//! This crate contains the core data structures for the Drift runtime:
//! - Spans for source locations
//! - Names for interned identifiers
//! - Tokens for lexer output
//! - AST nodes (Expr, Stmt, Program)
//!
//! # Design Philosophy
//!
//! - **Intern strings**: identifiers and string literals become `Name(u32)`
//!   for O(1) equality in the parser and environment lookups
//! - **Tokens stay hashable**: number payloads are stored as `f64` bits
//! - **The AST owns its tree**: boxed children, `Rc<[Stmt]>` function bodies
//!   shared with closures

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-allocated types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

pub mod ast;
mod interner;
mod name;
mod span;
mod token;

pub use ast::{BinOp, Expr, ExprKind, Program, Stmt, StmtKind, UnOp};
pub use interner::{InternError, StringInterner};
pub use name::Name;
pub use span::Span;
pub use token::{InterrogativeKind, PredicateKind, Token, TokenKind};
