//! End-to-end scenarios: tokenize, parse, and evaluate whole programs,
//! then inspect results, captured output, warnings, and loop telemetry.

use std::rc::Rc;

use drift_diagnostic::LineOffsetTable;
use drift_eval::{
    assertion_failed_with, register_default_natives, undefined_variable, BufferPrintHandler,
    EvalConfig, EvalError, Interpreter, PrintHandler, Value, ValueKind,
};
use drift_ir::StringInterner;
use pretty_assertions::assert_eq;

struct Run {
    result: Result<Value, EvalError>,
    output: String,
    warnings: Vec<String>,
    loop_exit: Option<Value>,
    loop_iterations: Option<Value>,
}

fn run(source: &str) -> Run {
    run_with(source, EvalConfig::default(), |_| {})
}

fn run_with(
    source: &str,
    config: EvalConfig,
    customize: impl FnOnce(&mut Interpreter<'_>),
) -> Run {
    let interner = StringInterner::new();
    let buffer = Rc::new(BufferPrintHandler::new());
    let mut interp =
        Interpreter::with_config(&interner, config).with_print_handler(buffer.clone());
    register_default_natives(&mut interp);
    customize(&mut interp);
    let tokens = drift_lexer::tokenize(source, &interner, interp.diagnostics_mut());
    let line_table = LineOffsetTable::build(source);
    let program = drift_parse::parse(&tokens, &interner, &line_table, interp.diagnostics_mut());
    assert!(
        !interp.diagnostics().has_errors(),
        "parse errors: {:?}",
        interp.diagnostics()
    );
    let result = interp.eval_program(&program);
    Run {
        result,
        output: buffer.get_output(),
        warnings: interp
            .diagnostics()
            .iter()
            .map(|d| d.message.clone())
            .collect(),
        loop_exit: interp.lookup_global("__loop_exit__"),
        loop_iterations: interp.lookup_global("__loop_iterations__"),
    }
}

#[test]
fn prints_a_computed_sum() {
    let run = run("x is 42\ny is x + 8\nprint of y\n");
    assert_eq!(run.output, "50\n");
    assert_eq!(run.result, Ok(Value::null()));
    assert!(run.warnings.is_empty());
}

#[test]
fn recursive_factorial_through_the_pipeline() {
    let source = "\
define factorial as:
  if n <= 1:
    return 1
  return n * factorial of n - 1
print of factorial of 5
factorial of 5
";
    let run = run(source);
    assert_eq!(run.output, "120\n");
    assert_eq!(run.result, Ok(Value::num(120.0)));
}

#[test]
fn newton_iteration_stalls_at_the_fixed_point() {
    // x settles on sqrt(16) = 4 whose entropy stays high, so the loop can
    // never satisfy `converged` and the stall detector has to end it
    let source = "\
n is 16
x is 8
loop while not converged:
  x is (x + n / x) / 2
print of x
";
    let run = run(source);
    assert_eq!(run.loop_exit, Some(Value::text("stalled")));
    assert_eq!(run.loop_iterations, Some(Value::num(103.0)));
    assert_eq!(run.output, "4\n");
}

#[test]
fn halving_toward_zero_converges_normally() {
    // entropy falls off once |x| drops below the low-entropy bar, so the
    // predicate itself ends the loop
    let source = "\
x is 64
loop while not converged:
  x is x / 2
";
    let run = run(source);
    assert_eq!(run.loop_exit, Some(Value::text("normal")));
    assert_eq!(run.loop_iterations, Some(Value::num(20.0)));
}

#[test]
fn alternating_assignments_read_as_oscillation() {
    let source = "\
x is 10
x is 0
x is 10
report of x
";
    let run = run(source);
    assert_eq!(run.result, Ok(Value::text("oscillating")));

    let predicate = run_source_result("x is 10\nx is 0\nx is 10\noscillating");
    assert_eq!(predicate, Ok(Value::num(1.0)));
}

#[test]
fn out_of_range_indexing_is_fail_soft() {
    let run = run("items is [1, 2, 3]\nitems[5]\n");
    assert_eq!(run.result, Ok(Value::null()));
    assert!(run.warnings.is_empty());
}

#[test]
fn one_queue_collects_lexer_and_evaluator_warnings() {
    let run = run("@\nghost\n");
    assert_eq!(run.result, Ok(Value::null()));
    assert_eq!(
        run.warnings,
        vec![
            "unknown character `@`".to_string(),
            "undefined variable 'ghost'".to_string(),
        ]
    );
}

#[test]
fn strict_mode_surfaces_hard_errors() {
    let run = run_with("total is count + 1\n", EvalConfig::strict(), |_| {});
    assert_eq!(run.result, Err(undefined_variable("count")));
}

#[test]
fn hosts_can_register_their_own_natives() {
    let run = run_with("half of 9\n", EvalConfig::default(), |interp| {
        interp.register_native("half", |arg| {
            Ok(match arg.kind {
                ValueKind::Num(n) => Value::num(n / 2.0),
                _ => Value::null(),
            })
        });
    });
    assert_eq!(run.result, Ok(Value::num(4.5)));
}

#[test]
fn native_errors_propagate_to_the_host() {
    let run = run_with("always_fail of 1\n", EvalConfig::default(), |interp| {
        interp.register_native("always_fail", |_| Err(assertion_failed_with("native boom")));
    });
    assert_eq!(run.result, Err(assertion_failed_with("native boom")));
}

#[test]
fn runaway_loops_hit_the_configured_ceiling() {
    let config = EvalConfig {
        max_loop_iterations: 25,
        ..EvalConfig::default()
    };
    let run = run_with("i is 0\nloop while 1:\n  i is i + 1\n", config, |_| {});
    assert_eq!(run.loop_exit, Some(Value::text("limit")));
    assert_eq!(run.loop_iterations, Some(Value::num(25.0)));
}

#[test]
fn lists_stay_shared_through_calls() {
    let source = "\
a is [1, 2]
define push9 as:
  append of [n, 9]
  return n
push9 of a
len of a
";
    let run = run(source);
    assert_eq!(run.result, Ok(Value::num(3.0)));
}

#[test]
fn the_observer_binding_is_an_ordinary_variable() {
    // shadowing __observer__ with a fresh value redirects what the
    // predicates see next
    let run = run("x is 10\n__observer__ is 0\nimproving\n");
    assert_eq!(run.result, Ok(Value::num(1.0)));
}

fn run_source_result(source: &str) -> Result<Value, EvalError> {
    run(source).result
}
