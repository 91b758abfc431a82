//! Evaluation errors.
//!
//! In lenient mode (the default) most of these never surface: undefined
//! operations resolve to null and the evaluator keeps going. Strict mode
//! promotes them to hard `Err` returns. Assertion failures are hard errors
//! in both modes.

use thiserror::Error;

/// Result alias for evaluation.
pub type EvalResult<T> = Result<T, EvalError>;

/// A runtime evaluation error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("modulo by zero")]
    ModuloByZero,

    #[error("operator `{op}` cannot be applied to {left} and {right}")]
    TypeMismatch {
        op: &'static str,
        left: &'static str,
        right: &'static str,
    },

    #[error("unary operator `{op}` cannot be applied to {operand}")]
    InvalidUnaryOp {
        op: &'static str,
        operand: &'static str,
    },

    #[error("undefined variable '{name}'")]
    UndefinedVariable { name: String },

    #[error("{type_name} is not callable")]
    NotCallable { type_name: &'static str },

    #[error("index {index} out of bounds")]
    IndexOutOfRange { index: i64 },

    #[error("maximum recursion depth exceeded (limit: {depth})")]
    RecursionLimit { depth: usize },

    /// The message is fully rendered by the factories below, with or
    /// without the user-supplied detail.
    #[error("{message}")]
    AssertionFailed { message: String },
}

#[cold]
pub fn division_by_zero() -> EvalError {
    EvalError::DivisionByZero
}

#[cold]
pub fn modulo_by_zero() -> EvalError {
    EvalError::ModuloByZero
}

#[cold]
pub fn binary_type_mismatch(
    op: &'static str,
    left: &'static str,
    right: &'static str,
) -> EvalError {
    EvalError::TypeMismatch { op, left, right }
}

#[cold]
pub fn invalid_unary_op(op: &'static str, operand: &'static str) -> EvalError {
    EvalError::InvalidUnaryOp { op, operand }
}

#[cold]
pub fn undefined_variable(name: &str) -> EvalError {
    EvalError::UndefinedVariable {
        name: name.to_string(),
    }
}

#[cold]
pub fn not_callable(type_name: &'static str) -> EvalError {
    EvalError::NotCallable { type_name }
}

#[cold]
pub fn index_out_of_range(index: i64) -> EvalError {
    EvalError::IndexOutOfRange { index }
}

#[cold]
pub fn recursion_limit(depth: usize) -> EvalError {
    EvalError::RecursionLimit { depth }
}

/// Assertion failure without a user-supplied message.
#[cold]
pub fn assertion_failed() -> EvalError {
    EvalError::AssertionFailed {
        message: "assertion failed".to_string(),
    }
}

/// Assertion failure carrying the rendered message argument.
#[cold]
pub fn assertion_failed_with(detail: &str) -> EvalError {
    EvalError::AssertionFailed {
        message: format!("assertion failed: {detail}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_failing_operation() {
        assert_eq!(division_by_zero().to_string(), "division by zero");
        assert_eq!(
            binary_type_mismatch("+", "num", "list").to_string(),
            "operator `+` cannot be applied to num and list"
        );
        assert_eq!(
            undefined_variable("velocity").to_string(),
            "undefined variable 'velocity'"
        );
        assert_eq!(not_callable("num").to_string(), "num is not callable");
        assert_eq!(
            index_out_of_range(5).to_string(),
            "index 5 out of bounds"
        );
        assert_eq!(
            recursion_limit(64).to_string(),
            "maximum recursion depth exceeded (limit: 64)"
        );
    }

    #[test]
    fn assertion_message_is_optional() {
        assert_eq!(assertion_failed().to_string(), "assertion failed");
        assert_eq!(
            assertion_failed_with("x must stay positive").to_string(),
            "assertion failed: x must stay positive"
        );
    }
}
