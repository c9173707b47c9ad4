use crate::runtime::command::CmdId;
use crate::runtime::interpreter::Interpreter;
use crate::runtime::value::{Value, ValueKind};

/// `set`/`var` VAR ?VALUE?: with one argument looks the variable up, with two
/// binds the optimized value. Returns the stored value either way.
pub(super) fn cmd_var(
    interp: &mut Interpreter,
    _id: CmdId,
    name: &str,
    mut args: Vec<Value>,
) -> Result<Option<Value>, String> {
    let var_name = args[0].to_string();
    let line = interp.curr_line;

    if args.len() == 1 {
        return match interp.curr_frame.vars.borrow().get(&var_name) {
            Some(v) => Ok(Some(v.clone())),
            None => Err(format!(
                "{}: no such variable: {}. Line: {}",
                name, var_name, line
            )),
        };
    }

    let existing_const = interp
        .curr_frame
        .vars
        .borrow()
        .get(&var_name)
        .map(|v| v.is_const)
        .unwrap_or(false);
    if existing_const {
        return Err(format!(
            "{}: Can't change const '{}'. Line: {}",
            name, var_name, line
        ));
    }

    let value = args.swap_remove(1).optimize();
    interp
        .curr_frame
        .vars
        .borrow_mut()
        .insert(var_name, value.clone());
    Ok(Some(value))
}

/// `const` VAR VALUE: binds like `set` and marks the binding immutable.
pub(super) fn cmd_const(
    interp: &mut Interpreter,
    _id: CmdId,
    name: &str,
    mut args: Vec<Value>,
) -> Result<Option<Value>, String> {
    let var_name = args[0].to_string();
    let line = interp.curr_line;

    let existing_const = interp
        .curr_frame
        .vars
        .borrow()
        .get(&var_name)
        .map(|v| v.is_const)
        .unwrap_or(false);
    if existing_const {
        return Err(format!(
            "{}: Cannot change const variable: {}. Line: {}",
            name, var_name, line
        ));
    }

    let mut value = args.swap_remove(1).optimize();
    value.is_const = true;
    interp
        .curr_frame
        .vars
        .borrow_mut()
        .insert(var_name, value.clone());
    Ok(Some(value))
}

/// `inc`/`dec` VAR ?AMOUNT?: steps a numeric variable in place. The amount
/// must match the variable's numeric tag; string amounts are parsed int
/// first, then float, with the same tag-match rule.
pub(super) fn cmd_inc_dec(
    interp: &mut Interpreter,
    id: CmdId,
    name: &str,
    args: Vec<Value>,
) -> Result<Option<Value>, String> {
    let var_name = args[0].to_string();
    let line = interp.curr_line;

    let var_is_int = {
        let vars = interp.curr_frame.vars.borrow();
        match vars.get(&var_name) {
            None => {
                return Err(format!(
                    "{}: No such variable: {}. Line {}",
                    name, var_name, line
                ))
            }
            Some(v) => {
                if !matches!(v.kind, ValueKind::Int(_) | ValueKind::Float(_)) {
                    return Err(format!("First variable isn't a number. Line {}", line));
                }
                if v.is_const {
                    return Err(format!(
                        "{}: Can't alter const variable: {}. Line {}",
                        name, var_name, line
                    ));
                }
                matches!(v.kind, ValueKind::Int(_))
            }
        }
    };

    let sign: i64 = if id == CmdId::Dec { -1 } else { 1 };
    let mut step_int = sign;
    let mut step_float = sign as f64;

    if args.len() == 2 {
        match &args[1].kind {
            ValueKind::Int(v) => {
                if !var_is_int {
                    return Err(format!("{} Mismatching types. Line {}", name, line));
                }
                step_int = step_int.wrapping_mul(*v);
            }
            ValueKind::Float(v) => {
                if var_is_int {
                    return Err(format!("{}: Mismatching types. Line {}", name, line));
                }
                step_float *= v;
            }
            ValueKind::Str(text) => match Value::from_literal(text.as_bytes()).kind {
                ValueKind::Int(v) => {
                    if !var_is_int {
                        return Err(format!(
                            "{} converted to int can't be added to float. Line {}",
                            name, line
                        ));
                    }
                    step_int = step_int.wrapping_mul(v);
                }
                ValueKind::Float(v) => {
                    if var_is_int {
                        return Err(format!(
                            "{} converted to float can't be added to int. Line {}",
                            name, line
                        ));
                    }
                    step_float *= v;
                }
                _ => {
                    return Err(format!(
                        "first argument to {} isn't a number. Line {}",
                        name, line
                    ))
                }
            },
            ValueKind::Bool(_) => {
                return Err(format!("Can't do `{}` with boolean. Line {}", name, line))
            }
            ValueKind::List(_) => {
                return Err(format!("Can't do `{}` with list. Line {}", name, line))
            }
            ValueKind::Fn(_) => {
                return Err(format!("Can't do `{}` with function. Line {}", name, line))
            }
        }
    }

    let mut vars = interp.curr_frame.vars.borrow_mut();
    match vars.get_mut(&var_name) {
        Some(v) => {
            match &mut v.kind {
                ValueKind::Int(n) => *n = n.wrapping_add(step_int),
                ValueKind::Float(f) => *f += step_float,
                _ => {
                    return Err(format!(
                        "{}: Variable {} is not a number. Line {}",
                        name, var_name, line
                    ))
                }
            }
            Ok(Some(v.clone()))
        }
        None => Err(format!(
            "{}: No such variable: {}. Line {}",
            name, var_name, line
        )),
    }
}
