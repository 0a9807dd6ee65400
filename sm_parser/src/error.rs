use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A global header tag was missing or unreadable and a default was used.
    Header,
    /// A `#NOTES:` block was malformed and skipped.
    Block,
    Io,
}

impl ParseErrorKind {
    pub(crate) fn from_code(code: &'static str) -> Self {
        match code {
            "E1001" | "E1002" => Self::Block,
            "E2001" => Self::Io,
            "W3001" | "W3002" => Self::Header,
            _ => Self::Block,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("{code}: {message}")]
pub struct ParseError {
    pub code: &'static str,
    pub kind: ParseErrorKind,
    pub message: String,

    pub file: Option<String>,
    /// 1-based index of the `#NOTES:` block.
    pub block: Option<usize>,
    /// 1-based source line.
    pub line: Option<usize>,
}

impl ParseError {
    pub(crate) fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            kind: ParseErrorKind::from_code(code),
            message: message.into(),
            file: None,
            block: None,
            line: None,
        }
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn with_block(mut self, block: usize) -> Self {
        self.block = Some(block);
        self
    }

    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// Recoverable problems are reported but never abort a parse.
    pub fn is_recoverable(&self) -> bool {
        self.kind != ParseErrorKind::Io
    }
}
