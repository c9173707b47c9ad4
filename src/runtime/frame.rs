use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::runtime::command::CmdId;
use crate::runtime::value::Value;

/// One lexical scope: variable bindings plus the conditional-chain memory
/// (`prev_cmd` and `if_taken`) that decides `elif`/`else` legality.
///
/// Block scopes alias the parent's variable map through the `Rc`, so binding
/// inside an `if`/`while` body is visible in the enclosing scope. Call scopes
/// get a fresh map; there is no lookup chain between frames.
#[derive(Debug, Clone)]
pub struct Frame {
    pub vars: Rc<RefCell<HashMap<String, Value>>>,
    pub prev_cmd: Option<CmdId>,
    pub if_taken: bool,
}

impl Frame {
    pub fn global() -> Self {
        Self {
            vars: Rc::new(RefCell::new(HashMap::new())),
            prev_cmd: None,
            if_taken: false,
        }
    }

    /// A block scope sharing the parent's variable map.
    pub fn block(parent: &Frame) -> Self {
        Self {
            vars: Rc::clone(&parent.vars),
            prev_cmd: None,
            if_taken: false,
        }
    }

    /// A function-call scope with a disjoint variable map. `prev_cmd` is
    /// seeded with the callee's id.
    pub fn call(id: CmdId) -> Self {
        Self {
            vars: Rc::new(RefCell::new(HashMap::new())),
            prev_cmd: Some(id),
            if_taken: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_frames_alias_the_parent_map() {
        let parent = Frame::global();
        let child = Frame::block(&parent);
        child
            .vars
            .borrow_mut()
            .insert("a".to_string(), Value::int(4));
        assert!(parent.vars.borrow().contains_key("a"));
    }

    #[test]
    fn call_frames_are_disjoint() {
        let parent = Frame::global();
        parent
            .vars
            .borrow_mut()
            .insert("a".to_string(), Value::int(4));
        let callee = Frame::call(CmdId::User(0));
        assert!(!callee.vars.borrow().contains_key("a"));
        assert_eq!(callee.prev_cmd, Some(CmdId::User(0)));
    }
}
