use crate::runtime::builtins::expr_join;
use crate::runtime::command::CmdId;
use crate::runtime::interpreter::Interpreter;
use crate::runtime::value::Value;
use crate::syntax::reader::CodeReader;

/// `if` COND BODY: the condition text is parsed (substitutions and all) and
/// handed to the expression evaluator; the outcome lands in the frame's
/// `if_taken` bit for a following `elif`/`else`. The body runs in a block
/// scope only when taken.
pub(super) fn cmd_if(
    interp: &mut Interpreter,
    _id: CmdId,
    name: &str,
    args: Vec<Value>,
) -> Result<Option<Value>, String> {
    let mut cond_reader = CodeReader::new(args[0].to_string(), interp.curr_line);
    let cond_words = interp.parse(&mut cond_reader, false)?;
    let cond = expr_join(&cond_words).map_err(|err| {
        format!(
            "{} failed with: {} on line: {}",
            name, err, interp.curr_line
        )
    })?;

    interp.curr_frame.if_taken = cond.is_true();
    if interp.curr_frame.if_taken {
        let mut body_reader = CodeReader::new(args[1].to_string(), interp.curr_line);
        let (res, _) = interp.execute_core(&mut body_reader, true)?;
        return Ok(res);
    }
    Ok(None)
}

/// `elif` COND BODY: legal only directly after `if`/`elif`; acts as `if`
/// while the chain has not taken a branch yet.
pub(super) fn cmd_elif(
    interp: &mut Interpreter,
    _id: CmdId,
    name: &str,
    args: Vec<Value>,
) -> Result<Option<Value>, String> {
    if !matches!(
        interp.curr_frame.prev_cmd,
        Some(CmdId::If) | Some(CmdId::Elif)
    ) {
        return Err(format!(
            "{} lacks if or else if. Line: {}",
            name, interp.curr_line
        ));
    }
    if !interp.curr_frame.if_taken {
        return cmd_if(interp, CmdId::If, "if", args);
    }
    Ok(None)
}

/// `else` BODY: legal only directly after `if`/`elif`; runs when no branch
/// of the chain has been taken.
pub(super) fn cmd_else(
    interp: &mut Interpreter,
    _id: CmdId,
    name: &str,
    args: Vec<Value>,
) -> Result<Option<Value>, String> {
    if !matches!(
        interp.curr_frame.prev_cmd,
        Some(CmdId::If) | Some(CmdId::Elif)
    ) {
        return Err(format!(
            "{} lacks if or else if. Line: {}",
            name, interp.curr_line
        ));
    }
    if !interp.curr_frame.if_taken {
        let mut body_reader = CodeReader::new(args[0].to_string(), interp.curr_line);
        let (res, _) = interp.execute_core(&mut body_reader, true)?;
        return Ok(res);
    }
    Ok(None)
}

/// `while` COND BODY and `loop` BODY share this implementation, told apart
/// by id. The loop consumes break/continue flags raised in its body.
pub(super) fn cmd_while(
    interp: &mut Interpreter,
    id: CmdId,
    name: &str,
    args: Vec<Value>,
) -> Result<Option<Value>, String> {
    let body_idx = if id == CmdId::Loop { 0 } else { 1 };
    let mut res = None;

    loop {
        if id == CmdId::While {
            let mut cond_reader = CodeReader::new(args[0].to_string(), interp.curr_line);
            let cond_words = interp.parse(&mut cond_reader, false)?;
            let cond = expr_join(&cond_words).map_err(|err| {
                format!(
                    "{} failed with: {} on line: {}",
                    name, err, interp.curr_line
                )
            })?;
            if !cond.is_true() {
                break;
            }
        }

        let mut body_reader = CodeReader::new(args[body_idx].to_string(), interp.curr_line);
        let (body_res, _) = interp.execute_core(&mut body_reader, true)?;
        res = body_res;

        if interp.is_break {
            interp.is_break = false;
            break;
        }
        if interp.is_continue {
            interp.is_continue = false;
        }
    }
    Ok(res)
}

/// `break`/`continue`: raise the flag and produce nothing. Only a loop may
/// consume the flag; one that reaches top level is an error there.
pub(super) fn cmd_break_continue(
    interp: &mut Interpreter,
    id: CmdId,
    _name: &str,
    _args: Vec<Value>,
) -> Result<Option<Value>, String> {
    match id {
        CmdId::Break => interp.is_break = true,
        CmdId::Continue => interp.is_continue = true,
        _ => {}
    }
    Ok(None)
}

/// `return` ?VALUE?: re-parses VALUE as source, expects exactly one word,
/// and raises the return flag. A bare `return` yields an empty string and
/// raises nothing.
pub(super) fn cmd_return(
    interp: &mut Interpreter,
    _id: CmdId,
    name: &str,
    args: Vec<Value>,
) -> Result<Option<Value>, String> {
    if args.is_empty() {
        return Ok(Some(Value::str("")));
    }

    let mut reader = CodeReader::new(args[0].to_string(), interp.curr_line);
    match interp.parse(&mut reader, false) {
        Ok(mut words) => {
            interp.is_return = true;
            if words.len() == 1 {
                Ok(Some(words.remove(0)))
            } else {
                Err(format!(
                    "{}: Too many objects to return. Line: {}",
                    name, interp.curr_line
                ))
            }
        }
        Err(err) => Err(format!("{}: Failed return given object: {}", name, err)),
    }
}

/// Fallback for names with no table entry and no frame-local fn-ref.
pub(super) fn cmd_unknown(
    interp: &mut Interpreter,
    _id: CmdId,
    name: &str,
    _args: Vec<Value>,
) -> Result<Option<Value>, String> {
    Err(format!(
        "Unknown command: {}. Line: {}",
        name, interp.curr_line
    ))
}
