use crate::runtime::command::CmdId;
use crate::runtime::interpreter::Interpreter;
use crate::runtime::value::Value;

/// Joins the printed forms of `args` with no separator and hands the text to
/// the external expression evaluator. Variables and bracket substitutions
/// were already expanded during parsing, so the evaluator only ever sees
/// literal expressions.
///
/// Result mapping: booleans stay booleans, integers stay integers, floats
/// collapse to integers when they are exact, strings stay strings. Anything
/// else the evaluator can produce is an error.
pub(crate) fn expr_join(args: &[Value]) -> Result<Value, String> {
    let mut joined = String::with_capacity(256);
    for a in args {
        joined.push_str(&a.to_string());
    }

    match evalexpr::eval(&joined) {
        Ok(evalexpr::Value::Boolean(v)) => Ok(Value::boolean(v)),
        Ok(evalexpr::Value::Int(v)) => Ok(Value::int(v)),
        Ok(evalexpr::Value::Float(v)) => {
            if v.trunc() == v && v.is_finite() && v.abs() <= i64::MAX as f64 {
                Ok(Value::int(v as i64))
            } else {
                Ok(Value::float(v))
            }
        }
        Ok(evalexpr::Value::String(v)) => Ok(Value::str(v)),
        Ok(other) => Err(format!("expression returns unsupported type: {:?}", other)),
        Err(err) => Err(err.to_string()),
    }
}

/// `eval`/`expr` E+: expression evaluation as a command.
pub(super) fn cmd_eval(
    interp: &mut Interpreter,
    _id: CmdId,
    name: &str,
    args: Vec<Value>,
) -> Result<Option<Value>, String> {
    match expr_join(&args) {
        Ok(v) => Ok(Some(v)),
        Err(err) => Err(format!(
            "{} failed with: {} on line: {}",
            name, err, interp.curr_line
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::expr_join;
    use crate::runtime::value::{Value, ValueKind};

    #[test]
    fn arguments_join_without_separator() {
        let args = vec![Value::int(1), Value::str("<"), Value::int(10)];
        let result = expr_join(&args).unwrap();
        assert!(matches!(result.kind, ValueKind::Bool(true)));
    }

    #[test]
    fn exact_floats_collapse_to_int() {
        let result = expr_join(&[Value::str("3.0 + 1.0")]).unwrap();
        assert!(matches!(result.kind, ValueKind::Int(4)));
    }

    #[test]
    fn inexact_floats_stay_float() {
        let result = expr_join(&[Value::str("1.0 / 2.0")]).unwrap();
        assert!(matches!(result.kind, ValueKind::Float(v) if v == 0.5));
    }

    #[test]
    fn integer_arithmetic_stays_int() {
        let result = expr_join(&[Value::str("2 + 3 * 4")]).unwrap();
        assert!(matches!(result.kind, ValueKind::Int(14)));
    }

    #[test]
    fn booleans_come_back_as_bool() {
        let result = expr_join(&[Value::str("5 == 6")]).unwrap();
        assert!(matches!(result.kind, ValueKind::Bool(false)));
    }

    #[test]
    fn evaluator_failures_become_errors() {
        assert!(expr_join(&[Value::str("1 +")]).is_err());
    }
}
