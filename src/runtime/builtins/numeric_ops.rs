use crate::runtime::command::CmdId;
use crate::runtime::interpreter::Interpreter;
use crate::runtime::value::{Value, ValueKind};

/// `int E`: identity on ints, truncation from floats, int-then-float parse
/// from strings. Booleans are not convertible.
pub(super) fn cmd_int(
    interp: &mut Interpreter,
    _id: CmdId,
    name: &str,
    mut args: Vec<Value>,
) -> Result<Option<Value>, String> {
    let line = interp.curr_line;
    let value = args.swap_remove(0);
    match value.kind {
        ValueKind::Int(_) => Ok(Some(value)),
        ValueKind::Float(v) => Ok(Some(Value::int(v as i64))),
        ValueKind::Bool(_) => Err(format!(
            "{}: Can't convert boolean to integer. Line {}",
            name, line
        )),
        ValueKind::Str(text) => match Value::from_literal(text.as_bytes()).kind {
            ValueKind::Int(v) => Ok(Some(Value::int(v))),
            ValueKind::Float(v) => Ok(Some(Value::int(v as i64))),
            _ => Err(format!(
                "{}: Can't convert string to integer. Line {}",
                name, line
            )),
        },
        _ => Err(format!(
            "{}: Can't convert string to integer. Line {}",
            name, line
        )),
    }
}

/// `float E`: identity on floats, widening from ints, int-then-float parse
/// from strings. Booleans are not convertible.
pub(super) fn cmd_float(
    interp: &mut Interpreter,
    _id: CmdId,
    name: &str,
    mut args: Vec<Value>,
) -> Result<Option<Value>, String> {
    let line = interp.curr_line;
    let value = args.swap_remove(0);
    match value.kind {
        ValueKind::Float(_) => Ok(Some(value)),
        ValueKind::Int(v) => Ok(Some(Value::float(v as f64))),
        ValueKind::Bool(_) => Err(format!(
            "{}: Can't convert boolean to float. Line {}",
            name, line
        )),
        ValueKind::Str(text) => match Value::from_literal(text.as_bytes()).kind {
            ValueKind::Int(v) => Ok(Some(Value::float(v as f64))),
            ValueKind::Float(v) => Ok(Some(Value::float(v))),
            _ => Err(format!(
                "{}:Can't convert string to float. Line {}",
                name, line
            )),
        },
        _ => Err(format!(
            "{}:Can't convert string to float. Line {}",
            name, line
        )),
    }
}
