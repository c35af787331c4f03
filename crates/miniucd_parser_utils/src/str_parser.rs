use crate::ParserError;

/// Parser that can parse a `&str`, keeping track of the current line and column
pub struct StrParser<'a> {
    pub line   : usize,
    pub column : usize,
    pub string : &'a str
}

impl<'a> StrParser<'a> {
    /// Create a new parser
    pub fn new(string: &'a str) -> Self {
        Self { line: 0, column: 0, string }
    }

    /// Try to consume a given character
    pub fn consume_char(&mut self, ch: char) -> bool {
        if self.string.starts_with(ch) {
            self.consume_count(ch.len_utf8());
            true
        } else {
            false
        }
    }

    /// Try to consume a given string
    pub fn consume_str(&mut self, s: &str) -> bool {
        if self.string.starts_with(s) {
            self.consume_count(s.len());
            true
        } else {
            false
        }
    }

    /// Consume `count` bytes, `count` must be on a char boundary
    pub fn consume_count(&mut self, count: usize) {
        let consumed = &self.string[..count];
        match consumed.rfind('\n') {
            Some(idx) => {
                self.line += consumed.matches('\n').count();
                self.column = consumed[idx + 1..].chars().count();
            },
            None => self.column += consumed.chars().count(),
        }
        self.string = &self.string[count..];
    }

    /// Skip past the next end-of-line
    pub fn consume_to_eol(&mut self) {
        let idx = self.string.find('\n').map_or(self.string.len(), |idx| idx + 1);
        self.consume_count(idx);
    }

    /// Skip whitespace, stopping at a newline unless `include_newline` is set
    pub fn consume_whitespace(&mut self, include_newline: bool) {
        let idx = self.string
            .find(|ch: char| !ch.is_whitespace() || (!include_newline && ch == '\n'))
            .unwrap_or(self.string.len());
        self.consume_count(idx);
    }

    /// Move the parser to the end (finish parsing)
    pub fn end(&mut self) {
        self.consume_count(self.string.len());
    }

    /// Check if there is still data to parse
    pub fn can_parse(&self) -> bool {
        !self.string.is_empty()
    }

    /// Peek at the next character
    pub fn peek(&self) -> Option<char> {
        self.string.chars().next()
    }

    pub fn starts_with(&self, s: &str) -> bool {
        self.string.starts_with(s)
    }

    /// Create an error at the current line and column
    pub fn error(&self, msg: &'static str) -> ParserError {
        ParserError { line: self.line, column: self.column, msg }
    }

    /// Find the first occurance of a non-escaped delimiter
    ///
    /// The result contains a tuple, with the index of the match, and the index after the end of the match
    pub fn find_non_escaped_delimiter(string: &str, delimiter: &str) -> Option<(usize, usize)> {
        string.match_indices(delimiter)
            .find(|(idx, _)| *idx == 0 || string.as_bytes()[idx - 1] != b'\\')
            .map(|(idx, matched)| (idx, idx + matched.len()))
    }

    /// Extract a substring that starts at the current position with `start_delimiter` and ends at the next non-escaped `end_delimiter`
    ///
    /// Returns `None` and consumes nothing if the string is not closed, or if it spans multiple lines when `multi_line` is not set.
    pub fn extract_string(&mut self, start_delimiter: &str, end_delimiter: &str, multi_line: bool) -> Option<&'a str> {
        let string = self.string;
        let rest = string.strip_prefix(start_delimiter)?;
        let (end, after) = StrParser::find_non_escaped_delimiter(rest, end_delimiter)?;

        let res = &rest[..end];
        if !multi_line && res.contains('\n') {
            return None;
        }
        self.consume_count(start_delimiter.len() + after);
        Some(res)
    }

    /// Extract until the predicate matches a character (or until the end)
    pub fn extract_until<P: FnMut(char) -> bool>(&mut self, pred: P) -> &'a str {
        let string = self.string;
        let idx = string.find(pred).unwrap_or(string.len());
        self.consume_count(idx);
        &string[..idx]
    }

    /// Extract the rest of the current line, without its line ending, and move to the start of the next line
    pub fn extract_line(&mut self) -> &'a str {
        let line = self.extract_until(|ch| ch == '\n');
        self.consume_char('\n');
        line.strip_suffix('\r').unwrap_or(line)
    }
}
