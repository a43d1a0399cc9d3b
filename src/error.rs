use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// A statement was recognised but the token stream ends before its fixed
    /// sequence of tokens is complete.
    #[error(
        "truncated {statement} statement at line {line}: expected {expected} tokens, found {found}"
    )]
    TruncatedStatement {
        statement: &'static str,
        line: usize,
        expected: usize,
        found: usize,
    },
    /// `if` blocks nested deeper than the parser accepts.
    #[error("if statement at line {line} nests deeper than {limit} blocks")]
    NestingTooDeep { line: usize, limit: usize },
}

impl ParseError {
    pub fn line(&self) -> usize {
        match self {
            ParseError::TruncatedStatement { line, .. } => *line,
            ParseError::NestingTooDeep { line, .. } => *line,
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("output error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
