//! Byte-level source cursor for the command parser.
//!
//! Invariants:
//! - `peek()` and `next()` must not be called at EOF; doing so is a
//!   programmer error and aborts.
//! - A backslash immediately followed by a newline reads as a single space:
//!   `next()` consumes both bytes, `peek()` reports the space without moving.
//! - `line()` is 1-based and counts every raw newline, folded or not.

#[derive(Debug, Clone)]
pub struct CodeReader {
    code: Vec<u8>,
    idx: usize,
    line: usize,
    eof: bool,
}

impl CodeReader {
    pub fn new(code: impl Into<Vec<u8>>, line: usize) -> Self {
        let code = code.into();
        let eof = code.is_empty();
        Self {
            code,
            idx: 0,
            line,
            eof,
        }
    }

    pub fn is_eof(&self) -> bool {
        self.eof
    }

    pub fn line(&self) -> usize {
        self.line
    }

    /// Returns the next byte without advancing. Reports a folded
    /// backslash-newline as a space.
    pub fn peek(&self) -> u8 {
        if self.eof {
            panic!("CodeReader::peek past end of input");
        }
        let c = self.code[self.idx];
        if c == b'\\' && self.code.get(self.idx + 1) == Some(&b'\n') {
            return b' ';
        }
        c
    }

    /// Consumes and returns the next byte, folding a trailing backslash
    /// before a newline into a single space.
    pub fn next(&mut self) -> u8 {
        if self.eof {
            panic!("CodeReader::next past end of input");
        }
        let mut c = self.code[self.idx];
        self.idx += 1;
        self.eof = self.idx == self.code.len();

        if !self.eof && c == b'\\' && self.code[self.idx] == b'\n' {
            self.line += 1;
            self.idx += 1;
            c = b' ';
            self.eof = self.idx == self.code.len();
        } else if c == b'\n' {
            self.line += 1;
        }
        c
    }

    /// Advances past spaces and tabs. Newlines are statement terminators, not
    /// blanks, and are left in place.
    pub fn skip_blanks(&mut self) {
        while !self.eof {
            let c = self.peek();
            if c != b' ' && c != b'\t' {
                return;
            }
            self.next();
        }
    }

    /// Captures everything up to the `}` matching an already-consumed `{`,
    /// tracking nested brace groups. A backslash escapes the following byte;
    /// both bytes are kept in the captured payload. The closing brace is
    /// consumed but not captured.
    pub fn until_brace_end(&mut self) -> Result<Vec<u8>, String> {
        let mut res = Vec::with_capacity(256);
        let mut depth = 1usize;
        loop {
            let c = self.next();
            if c == b'\\' {
                res.push(c);
                if self.eof {
                    return Err(format!("Premature end of file. Line: {}", self.line));
                }
                res.push(self.next());
                if self.eof {
                    return Err(format!("Premature end of file. Line: {}", self.line));
                }
                continue;
            }

            if c == b'}' {
                depth -= 1;
                if depth == 0 {
                    return Ok(res);
                }
            } else if c == b'{' {
                depth += 1;
            }
            res.push(c);
            if self.eof {
                return Err(format!("Premature end of file. Line: {}", self.line));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CodeReader;

    #[test]
    fn tracks_lines_across_newlines() {
        let mut reader = CodeReader::new("a\nb\nc", 1);
        assert_eq!(reader.next(), b'a');
        assert_eq!(reader.line(), 1);
        assert_eq!(reader.next(), b'\n');
        assert_eq!(reader.line(), 2);
        assert_eq!(reader.next(), b'b');
        assert_eq!(reader.next(), b'\n');
        assert_eq!(reader.line(), 3);
        assert_eq!(reader.next(), b'c');
        assert!(reader.is_eof());
    }

    #[test]
    fn folds_backslash_newline_to_space() {
        let mut reader = CodeReader::new("a\\\nb", 1);
        assert_eq!(reader.next(), b'a');
        assert_eq!(reader.peek(), b' ');
        assert_eq!(reader.next(), b' ');
        assert_eq!(reader.line(), 2);
        assert_eq!(reader.next(), b'b');
        assert!(reader.is_eof());
    }

    #[test]
    fn empty_input_is_eof_immediately() {
        let reader = CodeReader::new("", 1);
        assert!(reader.is_eof());
    }

    #[test]
    fn skip_blanks_stops_at_newline() {
        let mut reader = CodeReader::new("  \t \nx", 1);
        reader.skip_blanks();
        assert_eq!(reader.peek(), b'\n');
    }

    #[test]
    fn brace_capture_tracks_nesting() {
        let mut reader = CodeReader::new("a {b c} d} rest", 1);
        let body = reader.until_brace_end().unwrap();
        assert_eq!(body, b"a {b c} d");
        assert_eq!(reader.peek(), b' ');
    }

    #[test]
    fn brace_capture_keeps_escaped_bytes() {
        let mut reader = CodeReader::new("a \\} b} rest", 1);
        let body = reader.until_brace_end().unwrap();
        assert_eq!(body, b"a \\} b");
    }

    #[test]
    fn unterminated_brace_reports_line() {
        let mut reader = CodeReader::new("a {b\nc", 2);
        assert_eq!(reader.next(), b'a');
        assert_eq!(reader.next(), b' ');
        assert_eq!(reader.next(), b'{');
        let err = reader.until_brace_end().unwrap_err();
        assert_eq!(err, "Premature end of file. Line: 3");
    }

    #[test]
    fn trailing_escape_inside_braces_is_an_error_not_a_crash() {
        let mut reader = CodeReader::new("ab\\", 1);
        let err = reader.until_brace_end().unwrap_err();
        assert!(err.starts_with("Premature end of file."));
    }

    #[test]
    #[should_panic(expected = "past end of input")]
    fn next_past_eof_aborts() {
        let mut reader = CodeReader::new("x", 1);
        reader.next();
        reader.next();
    }
}
