//! The tree-walking evaluator.
//!
//! Statements evaluate against a scope chain rooted at the interpreter's
//! global scope. Every assignment and call result is observed for entropy
//! and republished to the reserved `__observer__` binding, which is what
//! the state predicates and the loop stall detector read. Execution is
//! fail-soft by default: undefined operations resolve to null and the
//! program keeps running.

mod expr;

use std::rc::Rc;

use drift_diagnostic::DiagnosticQueue;
use drift_ir::{Expr, Name, Program, Stmt, StmtKind, StringInterner};
use drift_stack::ensure_sufficient_stack;
use tracing::{debug, trace};

use crate::config::EvalConfig;
use crate::environment::Scope;
use crate::errors::{EvalError, EvalResult};
use crate::observer::{observe, Observation, LOW_ENTROPY, SETTLED_DELTA, STALL_LIMIT};
use crate::print_handler::{PrintHandler, StdoutPrintHandler};
use crate::shared::Shared;
use crate::value::{FunctionValue, Value};

/// Reserved names the evaluator writes, interned once at construction.
#[derive(Clone, Copy)]
struct ReservedNames {
    observer: Name,
    loop_exit: Name,
    loop_iterations: Name,
}

impl ReservedNames {
    fn new(interner: &StringInterner) -> Self {
        ReservedNames {
            observer: interner.intern("__observer__"),
            loop_exit: interner.intern("__loop_exit__"),
            loop_iterations: interner.intern("__loop_iterations__"),
        }
    }
}

/// How a statement finished: normally, or unwinding a `return`.
#[derive(Debug)]
pub(crate) enum Flow {
    Completed(Value),
    Returning(Value),
}

impl Flow {
    pub(crate) fn into_value(self) -> Value {
        match self {
            Flow::Completed(value) | Flow::Returning(value) => value,
        }
    }
}

/// Evaluates parsed programs.
///
/// The interpreter borrows the interner that token and AST names resolve
/// through, owns the global scope, and collects warning diagnostics from
/// lenient-mode fallbacks alongside whatever the lexer and parser already
/// queued.
pub struct Interpreter<'a> {
    interner: &'a StringInterner,
    globals: Shared<Scope>,
    config: EvalConfig,
    diags: DiagnosticQueue,
    handler: Rc<dyn PrintHandler>,
    names: ReservedNames,
    depth: usize,
}

impl<'a> Interpreter<'a> {
    pub fn new(interner: &'a StringInterner) -> Self {
        Interpreter::with_config(interner, EvalConfig::default())
    }

    pub fn with_config(interner: &'a StringInterner, config: EvalConfig) -> Self {
        Interpreter {
            interner,
            globals: Shared::new(Scope::new()),
            config,
            diags: DiagnosticQueue::new(),
            handler: Rc::new(StdoutPrintHandler),
            names: ReservedNames::new(interner),
            depth: 0,
        }
    }

    /// Route `print` output somewhere other than stdout.
    #[must_use]
    pub fn with_print_handler(mut self, handler: Rc<dyn PrintHandler>) -> Self {
        self.handler = handler;
        self
    }

    pub fn print_handler(&self) -> Rc<dyn PrintHandler> {
        Rc::clone(&self.handler)
    }

    pub fn diagnostics(&self) -> &DiagnosticQueue {
        &self.diags
    }

    /// Mutable queue access, so one queue can also collect lexer and
    /// parser diagnostics for the same source.
    pub fn diagnostics_mut(&mut self) -> &mut DiagnosticQueue {
        &mut self.diags
    }

    /// Bind a host function as a single-argument native in the globals.
    pub fn register_native(
        &mut self,
        name: &str,
        f: impl Fn(Value) -> EvalResult<Value> + 'static,
    ) {
        let name = self.interner.intern(name);
        self.globals.borrow_mut().define(name, Value::native(f));
    }

    /// Read a global binding back out, for host inspection after a run.
    pub fn lookup_global(&self, name: &str) -> Option<Value> {
        self.globals.borrow().lookup(self.interner.intern(name))
    }

    /// Evaluate a whole program.
    ///
    /// The result is the value of the last completed statement; a
    /// top-level `return` ends the program early with its value.
    pub fn eval_program(&mut self, program: &Program) -> Result<Value, EvalError> {
        debug!(statements = program.stmts.len(), "eval start");
        let globals = self.globals.clone();
        let mut result = Value::null();
        for stmt in &program.stmts {
            match self.eval_stmt(stmt, &globals)? {
                Flow::Completed(value) => result = value,
                Flow::Returning(value) => return Ok(value),
            }
        }
        Ok(result)
    }

    fn eval_stmt(&mut self, stmt: &Stmt, env: &Shared<Scope>) -> Result<Flow, EvalError> {
        ensure_sufficient_stack(|| self.eval_stmt_inner(stmt, env))
    }

    fn eval_stmt_inner(&mut self, stmt: &Stmt, env: &Shared<Scope>) -> Result<Flow, EvalError> {
        match &stmt.kind {
            StmtKind::Expr(expr) => Ok(Flow::Completed(self.eval_expr(expr, env)?)),
            StmtKind::Assign { name, value } => self.eval_assign(*name, value, env),
            StmtKind::FuncDef { name, param, body } => {
                let function = Value::function(FunctionValue {
                    name: Rc::from(self.interner.lookup(*name)),
                    param: *param,
                    body: Rc::clone(body),
                    closure: env.clone(),
                });
                env.set(*name, function.clone());
                Ok(Flow::Completed(function))
            }
            StmtKind::If {
                cond,
                then_body,
                else_body,
            } => {
                if self.eval_expr(cond, env)?.is_truthy() {
                    self.eval_block(then_body, env)
                } else if let Some(else_body) = else_body {
                    self.eval_block(else_body, env)
                } else {
                    Ok(Flow::Completed(Value::null()))
                }
            }
            StmtKind::Loop { cond, body } => self.eval_loop(cond, body, env),
            StmtKind::Return(expr) => Ok(Flow::Returning(self.eval_expr(expr, env)?)),
        }
    }

    fn eval_block(&mut self, stmts: &[Stmt], env: &Shared<Scope>) -> Result<Flow, EvalError> {
        let mut result = Value::null();
        for stmt in stmts {
            match self.eval_stmt(stmt, env)? {
                Flow::Completed(value) => result = value,
                returning @ Flow::Returning(_) => return Ok(returning),
            }
        }
        Ok(Flow::Completed(result))
    }

    /// Assignment: evaluate, inherit the old binding's observation
    /// baseline, observe, bind, publish.
    fn eval_assign(
        &mut self,
        name: Name,
        value: &Expr,
        env: &Shared<Scope>,
    ) -> Result<Flow, EvalError> {
        let mut val = self.eval_expr(value, env)?;
        if let Some(previous) = env.borrow().lookup(name) {
            // carry the history forward so the next delta is measured
            // against the binding's previous state, not a fresh record
            val.obs.last_entropy = previous.obs.entropy;
            val.obs.obs_age = previous.obs.obs_age;
            val.obs.dh = previous.obs.dh;
        }
        observe(&mut val);
        env.set(name, val.clone());
        self.publish_observation(&val);
        Ok(Flow::Completed(val))
    }

    fn eval_loop(
        &mut self,
        cond: &Expr,
        body: &[Stmt],
        env: &Shared<Scope>,
    ) -> Result<Flow, EvalError> {
        let mut result = Value::null();
        let mut iterations: usize = 0;
        let mut stall_count: u32 = 0;
        let exit_reason = loop {
            if iterations >= self.config.max_loop_iterations {
                break "limit";
            }
            if !self.eval_expr(cond, env)?.is_truthy() {
                break "normal";
            }
            iterations += 1;
            match self.eval_block(body, env)? {
                Flow::Completed(value) => result = value,
                // a return unwinds immediately; no exit bindings are written
                returning @ Flow::Returning(_) => return Ok(returning),
            }
            // stall: the loop keeps running while the observed entropy has
            // stopped moving at a level that is not convergence
            let stalled = self
                .observed()
                .is_some_and(|obs| obs.dh.abs() < SETTLED_DELTA && obs.entropy >= LOW_ENTROPY);
            if stalled {
                stall_count += 1;
                if stall_count >= STALL_LIMIT {
                    break "stalled";
                }
            } else {
                stall_count = 0;
            }
        };
        trace!(iterations, exit = exit_reason, "loop exit");
        self.globals
            .borrow_mut()
            .define(self.names.loop_exit, Value::text(exit_reason));
        self.globals
            .borrow_mut()
            .define(self.names.loop_iterations, Value::num(iterations as f64));
        Ok(Flow::Completed(result))
    }

    /// Record a value into the reserved global `__observer__` binding.
    fn publish_observation(&mut self, value: &Value) {
        trace!(
            entropy = value.obs.entropy,
            dh = value.obs.dh,
            age = value.obs.obs_age,
            "observe"
        );
        self.globals
            .borrow_mut()
            .define(self.names.observer, value.clone());
    }

    /// The most recent system-wide observation, if any value has been
    /// observed yet.
    fn observed(&self) -> Option<Observation> {
        self.globals
            .borrow()
            .lookup(self.names.observer)
            .map(|value| value.obs)
    }
}
