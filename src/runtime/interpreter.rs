use std::collections::HashMap;
use std::mem;
use std::rc::Rc;

use crate::runtime::builtins;
use crate::runtime::command::{CmdId, Command, CommandKind, HostFn};
use crate::runtime::frame::Frame;
use crate::runtime::value::{Value, ValueKind};
use crate::syntax::reader::CodeReader;

/// The interpreter: command table, frame stack, control-flow flags, and the
/// mutually recursive parser/executor pair.
///
/// Bracket substitution runs commands while a word is still being assembled,
/// so `parse` calls `execute_cmd` and command bodies re-enter `execute_core`.
/// All of that shares this one struct; instances are independent and
/// single-threaded.
pub struct Interpreter {
    commands: HashMap<String, Vec<Rc<Command>>>,
    pub(crate) curr_frame: Frame,
    pub(crate) frames: Vec<Frame>,
    pub(crate) curr_line: usize,
    pub(crate) is_break: bool,
    pub(crate) is_continue: bool,
    pub(crate) is_return: bool,
    next_fn_id: u32,
}

/// Accumulates one word during parsing. Raw bytes and an already-typed value
/// are mutually exclusive: a typed value survives only if nothing else joins
/// the word, otherwise everything collapses to printed text.
#[derive(Default)]
struct WordBuilder {
    bytes: Vec<u8>,
    value: Option<Value>,
    allow_empty: bool,
}

impl WordBuilder {
    fn flush_value(&mut self) {
        if let Some(v) = self.value.take() {
            self.bytes.extend_from_slice(v.to_string().as_bytes());
        }
    }

    fn push_byte(&mut self, c: u8) {
        self.flush_value();
        self.bytes.push(c);
    }

    fn push_bytes(&mut self, bytes: &[u8]) {
        self.flush_value();
        self.bytes.extend_from_slice(bytes);
    }

    fn push_value(&mut self, v: Value) {
        if self.bytes.is_empty() && self.value.is_none() {
            self.value = Some(v);
        } else {
            self.flush_value();
            self.bytes.extend_from_slice(v.to_string().as_bytes());
        }
    }

    /// Emits the pending word: inferred from bytes, or the typed value as-is,
    /// or an empty string if a brace group permitted one. `None` if the word
    /// is genuinely empty.
    fn finish(&mut self) -> Option<Value> {
        let word = if !self.bytes.is_empty() {
            Some(Value::from_literal(&self.bytes))
        } else if self.value.is_some() {
            self.value.take()
        } else if self.allow_empty {
            Some(Value::str(""))
        } else {
            None
        };
        self.bytes.clear();
        self.value = None;
        self.allow_empty = false;
        word
    }
}

fn is_ident_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_'
}

fn is_ident_char(c: u8) -> bool {
    is_ident_start(c) || c.is_ascii_digit()
}

impl Interpreter {
    pub fn new() -> Self {
        let mut commands: HashMap<String, Vec<Rc<Command>>> = HashMap::new();
        for command in builtins::commands() {
            let command = Rc::new(command);
            for name in &command.names {
                commands
                    .entry(name.clone())
                    .or_default()
                    .push(Rc::clone(&command));
            }
        }
        Self {
            commands,
            curr_frame: Frame::global(),
            frames: Vec::new(),
            curr_line: 1,
            is_break: false,
            is_continue: false,
            is_return: false,
            next_fn_id: 0,
        }
    }

    /// Runs a program in this interpreter. Returns the last command's result
    /// and id; the id lets embedders suppress echo after `print`/`puts`.
    pub fn execute(&mut self, prog: &str) -> Result<(Option<Value>, Option<CmdId>), String> {
        let mut reader = CodeReader::new(prog, 1);
        self.curr_line = 1;
        match self.execute_core(&mut reader, true) {
            Ok((res, last)) => {
                if self.is_break || self.is_continue {
                    let flag = if self.is_break { "break" } else { "continue" };
                    self.is_break = false;
                    self.is_continue = false;
                    return Err(format!("Unhandled {}. Line: {}", flag, self.curr_line));
                }
                Ok((res, last))
            }
            Err(err) => {
                // A failed program must not poison the next execute call.
                self.is_break = false;
                self.is_continue = false;
                self.is_return = false;
                Err(err)
            }
        }
    }

    /// Registers an embedder command. Arguments cross the bridge as printed
    /// strings; the returned string comes back through literal inference.
    pub fn add_native_command(
        &mut self,
        name: &str,
        min_args: i32,
        max_args: i32,
        handler: HostFn,
    ) -> Result<(), String> {
        if max_args >= 0 && max_args < min_args {
            return Err(format!(
                "{}: max_args {} is smaller than min_args {}",
                name, max_args, min_args
            ));
        }
        let id = CmdId::User(self.alloc_fn_id());
        self.define(Rc::new(Command {
            names: vec![name.to_string()],
            min_args,
            max_args,
            id,
            kind: CommandKind::Host(handler),
        }));
        Ok(())
    }

    /// Binds `name` in the topmost user-visible frame, with literal inference.
    pub fn set_var(&mut self, name: &str, value: &str) {
        self.curr_frame
            .vars
            .borrow_mut()
            .insert(name.to_string(), Value::from_literal(value.as_bytes()));
    }

    /// Looks `name` up in the topmost user-visible frame, rendered.
    pub fn get_var(&self, name: &str) -> Option<String> {
        self.curr_frame
            .vars
            .borrow()
            .get(name)
            .map(|v| v.to_string())
    }

    /// All command names (including aliases) plus the bindings of the topmost
    /// frame, sorted. Meant for shell tab completion.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.commands.keys().cloned().collect();
        names.extend(self.curr_frame.vars.borrow().keys().cloned());
        names.sort();
        names
    }

    pub(crate) fn alloc_fn_id(&mut self) -> u32 {
        let id = self.next_fn_id;
        self.next_fn_id += 1;
        id
    }

    /// Inserts a command under each of its names: an existing overload with
    /// the same arity range is replaced in place, otherwise the new command
    /// goes to the head of the overload list so it wins first-fit resolution.
    pub(crate) fn define(&mut self, command: Rc<Command>) {
        for name in command.names.clone() {
            let overloads = self.commands.entry(name).or_default();
            if let Some(existing) = overloads
                .iter_mut()
                .find(|c| c.min_args == command.min_args && c.max_args == command.max_args)
            {
                *existing = Rc::clone(&command);
            } else {
                overloads.insert(0, Rc::clone(&command));
            }
        }
    }

    /// Reads one command's words. `is_pre` means we are inside a `[…]`
    /// substitution, where `]` terminates the command.
    pub(crate) fn parse(
        &mut self,
        reader: &mut CodeReader,
        is_pre: bool,
    ) -> Result<Vec<Value>, String> {
        loop {
            reader.skip_blanks();
            if reader.is_eof() {
                return Ok(Vec::new());
            }
            if reader.peek() == b'#' {
                loop {
                    let c = reader.next();
                    if reader.is_eof() || c == b'\n' {
                        break;
                    }
                }
                continue;
            }
            break;
        }

        let mut args = Vec::new();
        let mut word = WordBuilder::default();
        let mut inside_string = false;

        while !reader.is_eof() {
            let c = reader.next();
            match c {
                b'\\' => {
                    if reader.is_eof() {
                        return Err(format!("Premature end of file. Line: {}", reader.line()));
                    }
                    match reader.next() {
                        b'a' => word.push_byte(0x07),
                        b'b' => word.push_byte(0x08),
                        b'f' => word.push_byte(0x0c),
                        b'n' => word.push_byte(b'\n'),
                        b'r' => word.push_byte(b'\r'),
                        b't' => word.push_byte(b'\t'),
                        b'v' => word.push_byte(0x0b),
                        other => {
                            word.push_byte(b'\\');
                            word.push_byte(other);
                        }
                    }
                }
                b'"' => inside_string = !inside_string,
                b';' | b'\n' if !inside_string => break,
                b']' => {
                    if is_pre {
                        break;
                    }
                    return Err(format!("Stray ]. Line: {}", reader.line()));
                }
                b'[' => {
                    self.curr_line = reader.line();
                    let sub_args = self.parse(reader, true)?;
                    if !sub_args.is_empty() {
                        if let Some(v) = self.execute_cmd(sub_args)? {
                            word.push_value(v);
                        }
                    }
                }
                b'$' => {
                    let v = self.expand_var(reader)?;
                    word.push_value(v);
                }
                b'{' => {
                    let captured = reader.until_brace_end()?;
                    word.push_bytes(&captured);
                    word.allow_empty = true;
                }
                b' ' | b'\t' if !inside_string => {
                    if let Some(w) = word.finish() {
                        args.push(w);
                    }
                }
                other => word.push_byte(other),
            }
        }
        if let Some(w) = word.finish() {
            args.push(w);
        }
        Ok(args)
    }

    /// Expands a `$name` or `${name}` reference against the current frame.
    /// Scope is not walked outward: a name missing here is missing.
    fn expand_var(&mut self, reader: &mut CodeReader) -> Result<Value, String> {
        if reader.is_eof() {
            return Err(format!("Unexpected end of file. Line: {}", reader.line()));
        }

        let name_bytes = if reader.peek() == b'{' {
            reader.next();
            reader.until_brace_end()?
        } else {
            let c = reader.next();
            if !is_ident_start(c) {
                return Err(format!(
                    "Invalid variable start character. Line: {}",
                    reader.line()
                ));
            }
            let mut name = vec![c];
            while !reader.is_eof() {
                let c = reader.peek();
                if !is_ident_char(c) {
                    break;
                }
                name.push(c);
                reader.next();
            }
            name
        };

        let name = String::from_utf8_lossy(&name_bytes).into_owned();
        let value = self.curr_frame.vars.borrow().get(&name).cloned();
        match value {
            Some(v) => Ok(v),
            None => Err(format!(
                "Unknown variable: {} Line: {}",
                name,
                reader.line()
            )),
        }
    }

    /// Dispatches one parsed command. Frame-local fn-ref bindings shadow the
    /// command table; table lookups resolve overloads first-fit by arity;
    /// anything else falls through to the `unknown` command.
    pub(crate) fn execute_cmd(&mut self, mut args: Vec<Value>) -> Result<Option<Value>, String> {
        if args.is_empty() {
            return Ok(None);
        }
        let name = args.remove(0).to_string();
        let rest = args;

        let local = match self.curr_frame.vars.borrow().get(&name) {
            Some(Value {
                kind: ValueKind::Fn(command),
                ..
            }) => Some(Rc::clone(command)),
            _ => None,
        };
        if let Some(command) = local {
            let result = self.call_user(&command, &name, rest);
            self.curr_frame.prev_cmd = Some(command.id);
            return result;
        }

        let chosen = self
            .commands
            .get(&name)
            .and_then(|overloads| overloads.iter().find(|c| c.admits(rest.len())).cloned());
        if let Some(command) = chosen {
            let result = self.run_command(&command, &name, rest);
            self.curr_frame.prev_cmd = Some(command.id);
            return result;
        }

        if let Some(overloads) = self.commands.get(&name) {
            if !overloads.is_empty() {
                let overloads = overloads.clone();
                return Err(self.arity_error(&name, &overloads, rest.len()));
            }
        }

        let unknown = self
            .commands
            .get("unknown")
            .and_then(|overloads| overloads.first().cloned());
        match unknown {
            Some(command) => {
                let result = self.run_command(&command, &name, rest);
                self.curr_frame.prev_cmd = Some(command.id);
                result
            }
            None => Err(format!(
                "Unknown command: {}. Line: {}",
                name, self.curr_line
            )),
        }
    }

    fn run_command(
        &mut self,
        command: &Rc<Command>,
        name: &str,
        args: Vec<Value>,
    ) -> Result<Option<Value>, String> {
        match &command.kind {
            CommandKind::Native(handler) => handler(self, command.id, name, args),
            CommandKind::User { .. } => self.call_user(command, name, args),
            CommandKind::Host(handler) => {
                let printed: Vec<String> = args.iter().map(|v| v.to_string()).collect();
                let out = handler(self, &printed)?;
                Ok(Some(Value::from_literal(out.as_bytes())))
            }
        }
    }

    fn arity_error(&self, name: &str, overloads: &[Rc<Command>], got: usize) -> String {
        let got_i = got as i32;
        if let Some(min) = overloads
            .iter()
            .map(|c| c.min_args)
            .filter(|m| *m >= 0)
            .min()
        {
            if got_i < min {
                return format!(
                    "{} must have at least {} argument(s). Line: {}",
                    name, min, self.curr_line
                );
            }
        }
        let max = overloads
            .iter()
            .map(|c| c.max_args)
            .filter(|m| *m >= 0 && *m < got_i)
            .max()
            .unwrap_or(0);
        format!(
            "{} must have at most {} argument(s). Line: {}",
            name, max, self.curr_line
        )
    }

    /// Calls a user-defined function: arity check, positional binds, default
    /// binds for the remaining formals, then the body in a fresh frame.
    /// Formal words and default expressions are parsed in the caller's scope.
    pub(crate) fn call_user(
        &mut self,
        command: &Rc<Command>,
        name: &str,
        args: Vec<Value>,
    ) -> Result<Option<Value>, String> {
        let (formals, body) = match &command.kind {
            CommandKind::User { formals, body } => (formals.clone(), body.to_string()),
            _ => {
                return Err(format!(
                    "{} is not a user-defined command. Line: {}",
                    name, self.curr_line
                ))
            }
        };

        if command.min_args >= 0 && (args.len() as i32) < command.min_args {
            return Err(format!(
                "Too few arguments. Got {} wants {}. Line: {}",
                args.len(),
                command.min_args,
                self.curr_line
            ));
        }
        if command.max_args >= 0 && (args.len() as i32) > command.max_args {
            return Err(format!(
                "Too many arguments. Got {} wants {}. Line: {}",
                args.len(),
                command.max_args,
                self.curr_line
            ));
        }

        let supplied = args.len();
        let mut bindings: HashMap<String, Value> = HashMap::new();
        let mut positional = args.into_iter();
        for (i, formal) in formals.iter().enumerate() {
            let mut formal_reader = CodeReader::new(formal.to_string(), self.curr_line);
            let mut words = match self.parse(&mut formal_reader, false) {
                Ok(words) if !words.is_empty() => words,
                _ => {
                    return Err(format!(
                        "{} has a malformed argument. Line: {}",
                        name, self.curr_line
                    ))
                }
            };
            let formal_name = words[0].to_string();
            if i < supplied {
                match positional.next() {
                    Some(value) => bindings.insert(formal_name, value),
                    None => break,
                };
            } else {
                if words.len() < 2 {
                    return Err(format!(
                        "{} has a malformed argument. Line: {}",
                        name, self.curr_line
                    ));
                }
                bindings.insert(formal_name, words.swap_remove(1));
            }
        }

        let frame = Frame::call(command.id);
        frame.vars.borrow_mut().extend(bindings);
        self.frames.push(mem::replace(&mut self.curr_frame, frame));

        let mut body_reader = CodeReader::new(body, self.curr_line);
        let result = self.execute_core(&mut body_reader, false);

        if let Some(parent) = self.frames.pop() {
            self.curr_frame = parent;
        }
        result.map(|(res, _)| res)
    }

    /// The statement loop: parse one command, dispatch it, apply control-flow
    /// flags. `push_frame` enters a block scope aliasing the current frame's
    /// variable map. Break/continue stop the loop and stay set for the
    /// enclosing loop command; return stops the loop and is consumed here.
    pub(crate) fn execute_core(
        &mut self,
        reader: &mut CodeReader,
        push_frame: bool,
    ) -> Result<(Option<Value>, Option<CmdId>), String> {
        if push_frame {
            let block = Frame::block(&self.curr_frame);
            self.frames.push(mem::replace(&mut self.curr_frame, block));
        }

        let mut res = None;
        let mut outcome = Ok(());
        while !reader.is_eof() {
            self.curr_line = reader.line();
            let args = match self.parse(reader, false) {
                Ok(args) => args,
                Err(err) => {
                    outcome = Err(err);
                    break;
                }
            };
            if args.is_empty() {
                continue;
            }
            match self.execute_cmd(args) {
                Ok(value) => res = value,
                Err(err) => {
                    outcome = Err(err);
                    break;
                }
            }
            if self.is_break || self.is_continue {
                break;
            }
            if self.is_return {
                self.is_return = false;
                break;
            }
        }

        let last = self.curr_frame.prev_cmd;
        if push_frame {
            if let Some(parent) = self.frames.pop() {
                self.curr_frame = parent;
            }
        }
        outcome.map(|_| (res, last))
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
