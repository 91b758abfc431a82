//! Default native bindings.
//!
//! Natives take exactly one argument; multi-argument operations like
//! `append` and two-part `assert` take a list and destructure it. A
//! native that receives an argument it cannot use answers null rather
//! than failing, except `assert`, which is a hard error in every mode.

use crate::errors;
use crate::interpreter::Interpreter;
use crate::observer::classify;
use crate::value::{Value, ValueKind};

/// Register the standard natives into the interpreter's globals:
/// `print`, `len`, `str`, `append`, `type`, `report`, `observe`,
/// and `assert`.
pub fn register_default_natives(interp: &mut Interpreter<'_>) {
    let handler = interp.print_handler();
    interp.register_native("print", move |arg| {
        handler.println(&arg.display_string());
        Ok(Value::null())
    });

    interp.register_native("len", |arg| {
        Ok(Value::num(match &arg.kind {
            ValueKind::List(items) => items.borrow().len() as f64,
            ValueKind::Text(text) => text.len() as f64,
            _ => 0.0,
        }))
    });

    interp.register_native("str", |arg| Ok(Value::text(arg.display_string())));

    // append of [target, item]: push into the shared list, return it
    interp.register_native("append", |arg| {
        let ValueKind::List(pair) = &arg.kind else {
            return Ok(Value::null());
        };
        let (target, item) = {
            let pair = pair.borrow();
            if pair.len() < 2 {
                return Ok(Value::null());
            }
            (pair[0].clone(), pair[1].clone())
        };
        let ValueKind::List(items) = &target.kind else {
            return Ok(Value::null());
        };
        items.borrow_mut().push(item);
        Ok(target)
    });

    interp.register_native("type", |arg| Ok(Value::text(arg.type_name())));

    // report reads the argument's own record, not the global observer
    interp.register_native("report", |arg| Ok(Value::text(classify(&arg.obs))));

    interp.register_native("observe", |arg| {
        let obs = arg.obs;
        Ok(Value::list(vec![
            Value::text(classify(&obs)),
            Value::num(obs.entropy),
            Value::num(obs.dh),
            Value::num(obs.prev_dh),
        ]))
    });

    // assert of [cond, message] or assert of cond
    interp.register_native("assert", |arg| {
        if let ValueKind::List(parts) = &arg.kind {
            let parts = parts.borrow();
            if parts.len() >= 2 {
                if parts[0].is_truthy() {
                    return Ok(Value::null());
                }
                return Err(errors::assertion_failed_with(&parts[1].display_string()));
            }
        }
        if arg.is_truthy() {
            Ok(Value::null())
        } else {
            Err(errors::assertion_failed())
        }
    });
}
