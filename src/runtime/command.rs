use crate::runtime::interpreter::Interpreter;
use crate::runtime::value::Value;

/// Handler signature for built-in commands. `id` and `name` identify which
/// alias/overload was dispatched; `args` excludes the command word itself.
/// `Ok(None)` means the command produced no value.
pub type NativeFn =
    fn(&mut Interpreter, CmdId, &str, Vec<Value>) -> Result<Option<Value>, String>;

/// Handler signature for embedder-registered commands. Arguments arrive as
/// their printed forms; the returned string goes through literal inference.
pub type HostFn = fn(&mut Interpreter, &[String]) -> Result<String, String>;

/// Stable command identity. Built-in ids are dense; user-defined commands and
/// host commands draw from the interpreter's monotonic counter instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CmdId {
    Append,
    Break,
    Concat,
    Continue,
    Const,
    Dec,
    Elif,
    Else,
    Eval,
    First,
    Float,
    Fn,
    If,
    Inc,
    Int,
    Last,
    Len,
    List,
    Loop,
    Print,
    Return,
    Unknown,
    Var,
    While,
    Width,
    User(u32),
}

/// One callable entry in the dispatch table. A name maps to an ordered list
/// of these; the first whose arity range admits the argument count wins.
#[derive(Debug, Clone)]
pub struct Command {
    /// All names this command answers to. The first is the primary name.
    pub names: Vec<String>,
    /// Minimum argument count; `-1` means unchecked.
    pub min_args: i32,
    /// Maximum argument count; `-1` means unchecked.
    pub max_args: i32,
    pub id: CmdId,
    pub kind: CommandKind,
}

#[derive(Debug, Clone)]
pub enum CommandKind {
    /// Built-in implemented in the host language.
    Native(NativeFn),
    /// User-defined function: the parsed formal words and the raw body text.
    User { formals: Vec<Value>, body: Value },
    /// Embedder callback bridged through printed-form arguments.
    Host(HostFn),
}

impl Command {
    pub fn admits(&self, count: usize) -> bool {
        (self.min_args < 0 || count >= self.min_args as usize)
            && (self.max_args < 0 || count <= self.max_args as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn probe(min_args: i32, max_args: i32) -> Command {
        Command {
            names: vec!["probe".to_string()],
            min_args,
            max_args,
            id: CmdId::User(0),
            kind: CommandKind::User {
                formals: vec![],
                body: Value::str(""),
            },
        }
    }

    #[test]
    fn arity_range_is_inclusive() {
        let command = probe(1, 2);
        assert!(!command.admits(0));
        assert!(command.admits(1));
        assert!(command.admits(2));
        assert!(!command.admits(3));
    }

    #[test]
    fn negative_bounds_are_unchecked() {
        assert!(probe(-1, -1).admits(0));
        assert!(probe(-1, -1).admits(17));
        assert!(probe(2, -1).admits(100));
        assert!(!probe(2, -1).admits(1));
        assert!(probe(-1, 1).admits(0));
        assert!(!probe(-1, 1).admits(2));
    }
}
