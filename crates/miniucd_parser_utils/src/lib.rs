use core::fmt;

pub mod str_parser;

/// Parser error
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ParserError {
    /// Zero-based line
    pub line   : usize,
    /// Zero-based column, in characters
    pub column : usize,
    pub msg    : &'static str,
}

impl fmt::Display for ParserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line + 1, self.column + 1, self.msg)
    }
}
