use crate::runtime::command::CmdId;
use crate::runtime::interpreter::Interpreter;
use crate::runtime::value::{Value, ValueKind};

/// `list E*`: builds a list of the argument values.
pub(super) fn cmd_list(
    _interp: &mut Interpreter,
    _id: CmdId,
    _name: &str,
    args: Vec<Value>,
) -> Result<Option<Value>, String> {
    Ok(Some(Value::list(args)))
}

/// `append` VAR E+: extends an existing, non-const list variable in place.
pub(super) fn cmd_append(
    interp: &mut Interpreter,
    _id: CmdId,
    name: &str,
    args: Vec<Value>,
) -> Result<Option<Value>, String> {
    let var_name = args[0].to_string();
    let line = interp.curr_line;

    let mut vars = interp.curr_frame.vars.borrow_mut();
    let value = match vars.get_mut(&var_name) {
        Some(value) => value,
        None => {
            return Err(format!(
                "{}: No such variable: {}. Line {}",
                name, var_name, line
            ))
        }
    };

    if !matches!(value.kind, ValueKind::List(_)) {
        return Err(format!(
            "{}: Can't append given object. Can only append to lists. Line {}",
            name, line
        ));
    }
    if value.is_const {
        return Err(format!(
            "{}: Can't append to const list {}. Line {}",
            name, var_name, line
        ));
    }
    if let ValueKind::List(elements) = &mut value.kind {
        elements.extend(args.into_iter().skip(1));
    }
    Ok(Some(value.clone()))
}

/// `first` VAR: copy of the head of a non-empty list variable.
pub(super) fn cmd_first(
    interp: &mut Interpreter,
    _id: CmdId,
    name: &str,
    args: Vec<Value>,
) -> Result<Option<Value>, String> {
    boundary(interp, name, &args, true)
}

/// `last` VAR: copy of the tail of a non-empty list variable.
pub(super) fn cmd_last(
    interp: &mut Interpreter,
    _id: CmdId,
    name: &str,
    args: Vec<Value>,
) -> Result<Option<Value>, String> {
    boundary(interp, name, &args, false)
}

fn boundary(
    interp: &mut Interpreter,
    name: &str,
    args: &[Value],
    first: bool,
) -> Result<Option<Value>, String> {
    let var_name = args[0].to_string();
    let line = interp.curr_line;

    let vars = interp.curr_frame.vars.borrow();
    match vars.get(&var_name) {
        None => Err(format!(
            "{}: No such variable: {}. Line {}",
            name, var_name, line
        )),
        Some(value) => match &value.kind {
            ValueKind::List(elements) => {
                let element = if first {
                    elements.first()
                } else {
                    elements.last()
                };
                match element {
                    Some(e) => Ok(Some(e.clone())),
                    None => Err(format!("{}: list is empty. Line {}", name, line)),
                }
            }
            _ => Err(format!("{}: Given object isn't a list. Line {}", name, line)),
        },
    }
}

/// `len` VAR: length of a list variable.
pub(super) fn cmd_len(
    interp: &mut Interpreter,
    _id: CmdId,
    name: &str,
    args: Vec<Value>,
) -> Result<Option<Value>, String> {
    let var_name = args[0].to_string();
    let line = interp.curr_line;

    let vars = interp.curr_frame.vars.borrow();
    match vars.get(&var_name) {
        None => Err(format!(
            "{}: No such variable: {}. Line {}",
            name, var_name, line
        )),
        Some(value) => match &value.kind {
            ValueKind::List(elements) => Ok(Some(Value::int(elements.len() as i64))),
            _ => Err(format!("{}: Given object isn't a list. Line {}", name, line)),
        },
    }
}
