use std::rc::Rc;

use crate::runtime::command::{CmdId, Command, CommandKind};
use crate::runtime::interpreter::Interpreter;
use crate::runtime::value::Value;
use crate::syntax::reader::CodeReader;

/// `fn` ?NAME? FORMALS BODY: builds a user command. Each formal word is
/// itself re-parsed; a single token is a required parameter, `{name default}`
/// an optional one. Named functions go to the head of their overload list
/// (replacing an entry with the identical arity range); anonymous ones exist
/// only through the returned fn-ref.
pub(super) fn cmd_fn(
    interp: &mut Interpreter,
    _id: CmdId,
    name: &str,
    mut args: Vec<Value>,
) -> Result<Option<Value>, String> {
    let (fn_name, formals_idx, body_idx) = if args.len() == 3 {
        (args[0].to_string(), 1, 2)
    } else {
        (String::new(), 0, 1)
    };
    let described = if fn_name.is_empty() {
        "anonymous command".to_string()
    } else {
        format!("command {}", fn_name)
    };

    let mut formals_reader = CodeReader::new(args[formals_idx].to_string(), interp.curr_line);
    let formals = interp.parse(&mut formals_reader, false).map_err(|err| {
        format!(
            "{}: Parsing arguments of {} failed with: {}. Line: {}",
            name, described, err, interp.curr_line
        )
    })?;

    let mut min_args = 0;
    for formal in &formals {
        let mut formal_reader = CodeReader::new(formal.to_string(), interp.curr_line);
        let words = interp.parse(&mut formal_reader, false).map_err(|err| {
            format!(
                "{}: Parsing argument \"{}\" of {} failed with: {}. Line: {}",
                name, formal, described, err, interp.curr_line
            )
        })?;
        if words.len() == 1 {
            min_args += 1;
        }
    }

    let id = CmdId::User(interp.alloc_fn_id());
    let max_args = formals.len() as i32;
    let command = Rc::new(Command {
        names: vec![fn_name.clone()],
        min_args,
        max_args,
        id,
        kind: CommandKind::User {
            formals,
            body: args.swap_remove(body_idx),
        },
    });

    if !fn_name.is_empty() {
        interp.define(Rc::clone(&command));
    }
    Ok(Some(Value::fn_ref(command)))
}
