use crate::runtime::command::CmdId;
use crate::runtime::interpreter::Interpreter;
use crate::runtime::value::Value;

/// `concat E+`: joins the printed forms of all arguments with no separator
/// and re-infers the result, so `concat 1 2` is the integer 12.
pub(super) fn cmd_concat(
    _interp: &mut Interpreter,
    _id: CmdId,
    _name: &str,
    args: Vec<Value>,
) -> Result<Option<Value>, String> {
    let mut joined = Vec::with_capacity(1024);
    for a in &args {
        joined.extend_from_slice(a.to_string().as_bytes());
    }
    Ok(Some(Value::from_literal(&joined)))
}

/// `print`/`puts` ?E?: writes the printed form plus newline to stdout and
/// returns it as a string. The distinct id lets shells skip echoing it again.
pub(super) fn cmd_print(
    _interp: &mut Interpreter,
    _id: CmdId,
    _name: &str,
    args: Vec<Value>,
) -> Result<Option<Value>, String> {
    let msg = match args.first() {
        Some(v) => v.to_string(),
        None => String::new(),
    };
    println!("{}", msg);
    Ok(Some(Value::str(msg)))
}

/// `width E`: byte length of the printed form.
pub(super) fn cmd_width(
    _interp: &mut Interpreter,
    _id: CmdId,
    _name: &str,
    args: Vec<Value>,
) -> Result<Option<Value>, String> {
    Ok(Some(Value::int(args[0].to_string().len() as i64)))
}
