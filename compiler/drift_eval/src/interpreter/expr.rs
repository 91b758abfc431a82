//! Expression evaluation.
//!
//! Lenient mode resolves undefined operand combinations to null rather
//! than failing; strict mode raises the corresponding error. Calls are
//! the only expressions that feed the observer: naming a value does not
//! observe it, applying a function to it does.

use std::rc::Rc;

use drift_diagnostic::Diagnostic;
use drift_ir::{BinOp, Expr, ExprKind, InterrogativeKind, Name, UnOp};
use drift_stack::ensure_sufficient_stack;

use crate::environment::Scope;
use crate::errors::{self, EvalError};
use crate::observer::{observe, predicate_holds};
use crate::shared::Shared;
use crate::value::{FunctionValue, Value, ValueKind};

use super::Interpreter;

impl Interpreter<'_> {
    pub(crate) fn eval_expr(&mut self, expr: &Expr, env: &Shared<Scope>) -> Result<Value, EvalError> {
        ensure_sufficient_stack(|| self.eval_expr_inner(expr, env))
    }

    fn eval_expr_inner(&mut self, expr: &Expr, env: &Shared<Scope>) -> Result<Value, EvalError> {
        match &expr.kind {
            ExprKind::Num(n) => Ok(Value::num(*n)),
            ExprKind::Str(text) => Ok(Value::text(self.interner.lookup(*text))),
            ExprKind::Null => Ok(Value::null()),
            ExprKind::Ident(name) => self.eval_ident(*name, env),
            ExprKind::List(elems) => {
                let mut items = Vec::with_capacity(elems.len());
                for elem in elems {
                    items.push(self.eval_expr(elem, env)?);
                }
                Ok(Value::list(items))
            }
            ExprKind::ListComp {
                expr,
                var,
                iter,
                filter,
            } => self.eval_list_comp(expr, *var, iter, filter.as_deref(), env),
            ExprKind::Binary { op, left, right } => self.eval_binary(*op, left, right, env),
            ExprKind::Unary { op, operand } => self.eval_unary(*op, operand, env),
            ExprKind::Relation { func, arg } => self.eval_relation(func, arg, env),
            ExprKind::Index { target, index } => self.eval_index(target, index, env),
            ExprKind::Interrogate { kind, target } => self.eval_interrogate(*kind, target, env),
            ExprKind::Predicate(kind) => {
                let obs = self.observed().unwrap_or_default();
                Ok(Value::num(if predicate_holds(*kind, &obs) {
                    1.0
                } else {
                    0.0
                }))
            }
        }
    }

    fn eval_ident(&mut self, name: Name, env: &Shared<Scope>) -> Result<Value, EvalError> {
        if let Some(value) = env.borrow().lookup(name) {
            return Ok(value);
        }
        let text = self.interner.lookup(name);
        if self.config.strictness.is_strict() {
            return Err(errors::undefined_variable(text));
        }
        self.diags.add(drift_diagnostic::undefined_variable(text));
        Ok(Value::null())
    }

    fn eval_binary(
        &mut self,
        op: BinOp,
        left: &Expr,
        right: &Expr,
        env: &Shared<Scope>,
    ) -> Result<Value, EvalError> {
        // and/or short-circuit and normalize to 1/0
        match op {
            BinOp::And => {
                if !self.eval_expr(left, env)?.is_truthy() {
                    return Ok(Value::num(0.0));
                }
                let right = self.eval_expr(right, env)?;
                Ok(Value::num(if right.is_truthy() { 1.0 } else { 0.0 }))
            }
            BinOp::Or => {
                if self.eval_expr(left, env)?.is_truthy() {
                    return Ok(Value::num(1.0));
                }
                let right = self.eval_expr(right, env)?;
                Ok(Value::num(if right.is_truthy() { 1.0 } else { 0.0 }))
            }
            _ => {
                let left = self.eval_expr(left, env)?;
                let right = self.eval_expr(right, env)?;
                self.apply_binary(op, &left, &right)
            }
        }
    }

    fn apply_binary(&self, op: BinOp, left: &Value, right: &Value) -> Result<Value, EvalError> {
        match op {
            BinOp::Add => {
                // either side being text renders both sides and concatenates
                if matches!(left.kind, ValueKind::Text(_))
                    || matches!(right.kind, ValueKind::Text(_))
                {
                    let mut joined = left.display_string();
                    joined.push_str(&right.display_string());
                    return Ok(Value::text(joined));
                }
                self.numeric_op(op, left, right, |a, b| a + b)
            }
            BinOp::Sub => self.numeric_op(op, left, right, |a, b| a - b),
            BinOp::Mul => self.numeric_op(op, left, right, |a, b| a * b),
            BinOp::Div => match as_nums(left, right) {
                Some((_, b)) if b == 0.0 => {
                    if self.config.strictness.is_strict() {
                        Err(errors::division_by_zero())
                    } else {
                        Ok(Value::num(0.0))
                    }
                }
                Some((a, b)) => Ok(Value::num(a / b)),
                None => self.binary_fallback(op, left, right),
            },
            BinOp::Mod => match as_nums(left, right) {
                Some((_, b)) if b == 0.0 => {
                    if self.config.strictness.is_strict() {
                        Err(errors::modulo_by_zero())
                    } else {
                        Ok(Value::num(0.0))
                    }
                }
                Some((a, b)) => Ok(Value::num(a % b)),
                None => self.binary_fallback(op, left, right),
            },
            BinOp::Eq => Ok(Value::num(if values_equal(left, right) { 1.0 } else { 0.0 })),
            BinOp::NotEq => Ok(Value::num(if values_equal(left, right) { 0.0 } else { 1.0 })),
            BinOp::Lt => self.compare_op(op, left, right, |a, b| a < b),
            BinOp::Gt => self.compare_op(op, left, right, |a, b| a > b),
            BinOp::LtEq => self.compare_op(op, left, right, |a, b| a <= b),
            BinOp::GtEq => self.compare_op(op, left, right, |a, b| a >= b),
            // short-circuit forms never reach here; eval_binary handles them
            BinOp::And | BinOp::Or => Ok(Value::null()),
        }
    }

    fn numeric_op(
        &self,
        op: BinOp,
        left: &Value,
        right: &Value,
        apply: impl Fn(f64, f64) -> f64,
    ) -> Result<Value, EvalError> {
        match as_nums(left, right) {
            Some((a, b)) => Ok(Value::num(apply(a, b))),
            None => self.binary_fallback(op, left, right),
        }
    }

    fn compare_op(
        &self,
        op: BinOp,
        left: &Value,
        right: &Value,
        apply: impl Fn(f64, f64) -> bool,
    ) -> Result<Value, EvalError> {
        match as_nums(left, right) {
            Some((a, b)) => Ok(Value::num(if apply(a, b) { 1.0 } else { 0.0 })),
            None => self.binary_fallback(op, left, right),
        }
    }

    fn binary_fallback(&self, op: BinOp, left: &Value, right: &Value) -> Result<Value, EvalError> {
        if self.config.strictness.is_strict() {
            Err(errors::binary_type_mismatch(
                op.as_symbol(),
                left.type_name(),
                right.type_name(),
            ))
        } else {
            Ok(Value::null())
        }
    }

    fn eval_unary(
        &mut self,
        op: UnOp,
        operand: &Expr,
        env: &Shared<Scope>,
    ) -> Result<Value, EvalError> {
        let value = self.eval_expr(operand, env)?;
        match op {
            UnOp::Neg => match value.kind {
                ValueKind::Num(n) => Ok(Value::num(-n)),
                _ => {
                    if self.config.strictness.is_strict() {
                        Err(errors::invalid_unary_op(op.as_symbol(), value.type_name()))
                    } else {
                        Ok(Value::null())
                    }
                }
            },
            UnOp::Not => Ok(Value::num(if value.is_truthy() { 0.0 } else { 1.0 })),
        }
    }

    /// `func of arg`: the argument evaluates before the callee.
    fn eval_relation(
        &mut self,
        func: &Expr,
        arg: &Expr,
        env: &Shared<Scope>,
    ) -> Result<Value, EvalError> {
        let arg_val = self.eval_expr(arg, env)?;
        let func_val = self.eval_expr(func, env)?;
        match &func_val.kind {
            ValueKind::Native(native) => {
                let mut result = native.call(arg_val)?;
                observe(&mut result);
                self.publish_observation(&result);
                Ok(result)
            }
            ValueKind::Function(function) => {
                let function = Rc::clone(function);
                self.call_function(&function, arg_val)
            }
            _ => {
                if self.config.strictness.is_strict() {
                    Err(errors::not_callable(func_val.type_name()))
                } else {
                    Ok(Value::null())
                }
            }
        }
    }

    fn call_function(
        &mut self,
        function: &FunctionValue,
        arg: Value,
    ) -> Result<Value, EvalError> {
        if self.depth >= self.config.max_recursion_depth {
            if self.config.strictness.is_strict() {
                return Err(errors::recursion_limit(self.config.max_recursion_depth));
            }
            self.diags.add(Diagnostic::warning(format!(
                "maximum recursion depth exceeded (limit: {})",
                self.config.max_recursion_depth
            )));
            return Ok(Value::null());
        }
        let call_env = function.closure.child();
        call_env.borrow_mut().define(function.param, arg);
        self.depth += 1;
        let flow = self.eval_block(&function.body, &call_env);
        self.depth -= 1;
        // both a falling-off body and an explicit return are observed
        let mut result = flow?.into_value();
        observe(&mut result);
        self.publish_observation(&result);
        Ok(result)
    }

    fn eval_index(
        &mut self,
        target: &Expr,
        index: &Expr,
        env: &Shared<Scope>,
    ) -> Result<Value, EvalError> {
        let target_val = self.eval_expr(target, env)?;
        let index_val = self.eval_expr(index, env)?;
        match (&target_val.kind, &index_val.kind) {
            (ValueKind::List(items), ValueKind::Num(idx)) => {
                let items = items.borrow();
                match element_position(*idx, items.len()) {
                    Some(i) => Ok(items[i].clone()),
                    None => self.index_fallback(*idx),
                }
            }
            (ValueKind::Text(text), ValueKind::Num(idx)) => {
                // indexing yields a one-character text
                let truncated = idx.trunc();
                if truncated >= 0.0 {
                    if let Some(ch) = text.chars().nth(truncated as usize) {
                        return Ok(Value::text(ch.to_string()));
                    }
                }
                self.index_fallback(*idx)
            }
            _ => {
                if self.config.strictness.is_strict() {
                    Err(errors::binary_type_mismatch(
                        "[]",
                        target_val.type_name(),
                        index_val.type_name(),
                    ))
                } else {
                    Ok(Value::null())
                }
            }
        }
    }

    fn index_fallback(&self, index: f64) -> Result<Value, EvalError> {
        if self.config.strictness.is_strict() {
            Err(errors::index_out_of_range(index as i64))
        } else {
            Ok(Value::null())
        }
    }

    fn eval_list_comp(
        &mut self,
        expr: &Expr,
        var: Name,
        iter: &Expr,
        filter: Option<&Expr>,
        env: &Shared<Scope>,
    ) -> Result<Value, EvalError> {
        let source = self.eval_expr(iter, env)?;
        let ValueKind::List(items) = &source.kind else {
            return Ok(Value::list(Vec::new()));
        };
        // snapshot the source so the body cannot observe its own growth
        let snapshot: Vec<Value> = items.borrow().clone();
        let mut collected = Vec::new();
        for item in snapshot {
            let elem_env = env.child();
            elem_env.borrow_mut().define(var, item);
            if let Some(filter) = filter {
                if !self.eval_expr(filter, &elem_env)?.is_truthy() {
                    continue;
                }
            }
            collected.push(self.eval_expr(expr, &elem_env)?);
        }
        Ok(Value::list(collected))
    }

    fn eval_interrogate(
        &mut self,
        kind: InterrogativeKind,
        target: &Expr,
        env: &Shared<Scope>,
    ) -> Result<Value, EvalError> {
        let value = self.eval_expr(target, env)?;
        Ok(match kind {
            // magnitude: the number itself, text length, element count
            InterrogativeKind::What => match &value.kind {
                ValueKind::Num(n) => Value::num(*n),
                ValueKind::Text(text) => Value::num(text.len() as f64),
                ValueKind::List(items) => Value::num(items.borrow().len() as f64),
                _ => Value::num(0.0),
            },
            // identity: the variable's own name when asked of a variable
            InterrogativeKind::Who => {
                if let ExprKind::Ident(name) = &target.kind {
                    Value::text(self.interner.lookup(*name))
                } else {
                    Value::text(match &value.kind {
                        ValueKind::Num(_) => "number",
                        ValueKind::Text(_) => "string",
                        ValueKind::List(_) => "list",
                        _ => "unknown",
                    })
                }
            }
            InterrogativeKind::When => Value::num(f64::from(value.obs.obs_age)),
            InterrogativeKind::Where => Value::num(value.obs.entropy),
            InterrogativeKind::Why => Value::num(value.obs.dh),
            // progress toward zero entropy, against the last baseline
            InterrogativeKind::How => {
                let baseline = if value.obs.last_entropy > 0.0 {
                    value.obs.last_entropy
                } else {
                    1.0
                };
                if value.obs.entropy > 0.0 {
                    Value::num(1.0 - value.obs.entropy / baseline)
                } else {
                    Value::num(1.0)
                }
            }
        })
    }
}

fn as_nums(left: &Value, right: &Value) -> Option<(f64, f64)> {
    match (&left.kind, &right.kind) {
        (ValueKind::Num(a), ValueKind::Num(b)) => Some((*a, *b)),
        _ => None,
    }
}

/// Map a numeric index onto a collection position. The fraction is
/// truncated; negative, out-of-range, and NaN indexes all miss.
fn element_position(index: f64, len: usize) -> Option<usize> {
    let truncated = index.trunc();
    if truncated >= 0.0 && truncated < len as f64 {
        Some(truncated as usize)
    } else {
        None
    }
}

/// Value equality as the language defines it: numbers by value, text by
/// content, null equal to null, everything else unequal.
fn values_equal(left: &Value, right: &Value) -> bool {
    match (&left.kind, &right.kind) {
        (ValueKind::Num(a), ValueKind::Num(b)) => a == b,
        (ValueKind::Text(a), ValueKind::Text(b)) => a == b,
        (ValueKind::Null, ValueKind::Null) => true,
        _ => false,
    }
}
