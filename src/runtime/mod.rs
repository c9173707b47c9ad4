//! Runtime core: values, frames, commands, and the interpreter.
//!
//! # Control-flow flag contract
//! `break`, `continue`, and `return` travel as sideband flags on the
//! interpreter rather than in the value channel. At most one flag is set at a
//! time, and each flag is cleared by its consumer: loops clear break/continue
//! after running their body, the statement loop clears return when it stops.
//! A break or continue that reaches the top-level `execute` call is reported
//! as an error.
//!
//! # Scoping contract
//! Block bodies (`if`/`elif`/`else`/`while`/`loop` and the top-level program)
//! run in a frame that aliases the enclosing frame's variable map, so `set`
//! inside a body binds in the enclosing scope. Function calls get a fresh,
//! disjoint map; there is no lookup chain to outer frames.

pub mod builtins;
pub mod command;
pub mod frame;
pub mod interpreter;
pub mod value;
