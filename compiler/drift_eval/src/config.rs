//! Evaluator configuration.

/// How undefined operations are handled.
///
/// Lenient mode is the language default: undefined variables warn and
/// read as null, bad operand combinations resolve to null, division by
/// zero yields zero. Strict mode turns each of those into a hard error.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Strictness {
    #[default]
    Lenient,
    Strict,
}

impl Strictness {
    #[inline]
    pub fn is_strict(self) -> bool {
        self == Strictness::Strict
    }
}

/// Evaluation limits and mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EvalConfig {
    pub strictness: Strictness,
    /// Call depth at which user-function application refuses to recurse.
    pub max_recursion_depth: usize,
    /// Iteration ceiling at which a loop exits with reason `limit`.
    pub max_loop_iterations: usize,
}

impl Default for EvalConfig {
    fn default() -> Self {
        EvalConfig {
            strictness: Strictness::Lenient,
            max_recursion_depth: 10_000,
            max_loop_iterations: 1_000_000,
        }
    }
}

impl EvalConfig {
    /// Default limits with strict error handling.
    pub fn strict() -> Self {
        EvalConfig {
            strictness: Strictness::Strict,
            ..EvalConfig::default()
        }
    }
}
