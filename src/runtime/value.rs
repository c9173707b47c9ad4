use std::fmt;
use std::rc::Rc;

use crate::runtime::command::{Command, CommandKind};

/// Runtime value carried by words, variables, and command results.
///
/// Every value has exactly one payload plus a const marker. Values are owned:
/// cloning a list clones its elements. The only shared payload is the handle
/// behind a fn-ref, which is immutable after creation.
#[derive(Debug, Clone)]
pub struct Value {
    pub kind: ValueKind,
    pub is_const: bool,
}

#[derive(Debug, Clone)]
pub enum ValueKind {
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit floating point number.
    Float(f64),
    /// Boolean value.
    Bool(bool),
    /// Uninterpreted text.
    Str(String),
    /// Ordered collection of values.
    List(Vec<Value>),
    /// Handle to a user-defined command.
    Fn(Rc<Command>),
}

impl Value {
    pub fn int(v: i64) -> Self {
        Self {
            kind: ValueKind::Int(v),
            is_const: false,
        }
    }

    pub fn float(v: f64) -> Self {
        Self {
            kind: ValueKind::Float(v),
            is_const: false,
        }
    }

    pub fn boolean(v: bool) -> Self {
        Self {
            kind: ValueKind::Bool(v),
            is_const: false,
        }
    }

    pub fn str(v: impl Into<String>) -> Self {
        Self {
            kind: ValueKind::Str(v.into()),
            is_const: false,
        }
    }

    pub fn list(elements: Vec<Value>) -> Self {
        Self {
            kind: ValueKind::List(elements),
            is_const: false,
        }
    }

    pub fn fn_ref(command: Rc<Command>) -> Self {
        Self {
            kind: ValueKind::Fn(command),
            is_const: false,
        }
    }

    /// Infers the best-fitting tag for a literal: integer (decimal or
    /// `0x`/`0o`/`0b` prefixed), then float, then boolean, else string.
    pub fn from_literal(bytes: &[u8]) -> Self {
        let text = String::from_utf8_lossy(bytes);
        if let Some(v) = parse_int_literal(&text) {
            return Value::int(v);
        }
        if let Ok(v) = text.parse::<f64>() {
            return Value::float(v);
        }
        if text == "true" {
            return Value::boolean(true);
        }
        if text == "false" {
            return Value::boolean(false);
        }
        Value::str(text.into_owned())
    }

    /// Re-runs literal inference when the tag is still `Str`. Applied when
    /// `set`/`const` bind their right-hand side; other binding paths keep the
    /// tag they were handed.
    pub fn optimize(self) -> Self {
        match &self.kind {
            ValueKind::Str(text) => Value::from_literal(text.as_bytes()),
            _ => self,
        }
    }

    /// Condition truth is deliberately narrow: only `Bool(true)` and nonzero
    /// `Int` count. Floats, strings, and lists are never true.
    pub fn is_true(&self) -> bool {
        match self.kind {
            ValueKind::Bool(v) => v,
            ValueKind::Int(v) => v != 0,
            _ => false,
        }
    }
}

fn parse_int_literal(text: &str) -> Option<i64> {
    let (sign, rest) = match text.as_bytes().first()? {
        b'+' => ("", &text[1..]),
        b'-' => ("-", &text[1..]),
        _ => ("", text),
    };
    for (prefix, radix) in [
        ("0x", 16),
        ("0X", 16),
        ("0o", 8),
        ("0O", 8),
        ("0b", 2),
        ("0B", 2),
    ] {
        if let Some(digits) = rest.strip_prefix(prefix) {
            if digits.is_empty() {
                return None;
            }
            return i64::from_str_radix(&format!("{}{}", sign, digits), radix).ok();
        }
    }
    text.parse::<i64>().ok()
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ValueKind::Int(v) => write!(f, "{}", v),
            ValueKind::Float(v) => write!(f, "{:.6}", v),
            ValueKind::Bool(v) => write!(f, "{}", if *v { "true" } else { "false" }),
            ValueKind::Str(v) => write!(f, "{}", v),
            ValueKind::List(elements) => {
                let items: Vec<String> = elements.iter().map(|e| e.to_string()).collect();
                write!(f, "({})", items.join(", "))
            }
            ValueKind::Fn(command) => match &command.kind {
                CommandKind::User { body, .. } => write!(f, "{}", body),
                _ => write!(
                    f,
                    "<command {}>",
                    command.names.first().map(String::as_str).unwrap_or("")
                ),
            },
        }
    }
}
