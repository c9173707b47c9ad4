//! Kit: a small Tcl-family scripting language.
//!
//! Programs are sequences of commands; each command is a whitespace-separated
//! list of words. Bracket substitution (`[cmd]`) and variable expansion
//! (`$name`) happen while the words are being assembled, so parsing and
//! evaluation are mutually recursive. The entry point for embedders is
//! [`runtime::interpreter::Interpreter`].

pub mod runtime;
pub mod syntax;
