//! Drift Eval - Tree-walking evaluator for the Drift runtime.
//!
//! This crate executes parsed Drift programs and maintains the entropy
//! observer that the language's predicates and interrogatives expose.
//!
//! # Architecture
//!
//! The evaluator uses:
//! - `Interpreter`: Statement and expression walking over a scope chain
//! - `Scope` / `Shared`: Chained lexical environments with aliased lists
//! - `Observation` / `entropy`: Per-value entropy records and measurement
//! - `PrintHandler`: Pluggable `print` output routing
//! - `register_default_natives`: The standard native bindings
//!
//! # Modes
//!
//! Lenient mode (the default) resolves undefined operations to null and
//! records warnings; strict mode raises `EvalError` for the same cases.
//! Assertion failures are hard errors in both modes.

mod config;
mod environment;
pub mod errors;
mod interpreter;
mod natives;
mod observer;
mod print_handler;
mod shared;
mod value;

pub use config::{EvalConfig, Strictness};
pub use environment::Scope;
pub use interpreter::Interpreter;
pub use natives::register_default_natives;
pub use observer::{classify, entropy, observe, Observation};
pub use print_handler::{BufferPrintHandler, PrintHandler, StdoutPrintHandler};
pub use shared::Shared;
pub use value::{FunctionValue, NativeFn, Value, ValueKind};

// Re-export error constructors for convenience (canonical path is drift_eval::errors::*)
pub use errors::{
    // Operator errors
    binary_type_mismatch, division_by_zero, invalid_unary_op, modulo_by_zero,
    // Name and call errors
    not_callable, recursion_limit, undefined_variable,
    // Index errors
    index_out_of_range,
    // Assertions
    assertion_failed, assertion_failed_with,
    EvalError, EvalResult,
};
