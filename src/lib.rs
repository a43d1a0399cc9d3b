//! # lipi
//!
//! A very small scripting dialect: assignment, `if` blocks and `print`, with
//! identifiers written in Latin or Telugu script.
//!
//! Source text goes through three stages, each consuming the previous one's
//! output: [`lexer::tokenize`], [`parser::Parser`] and [`interpreter::Interpreter`].
//! Only parsing can fail, and only when a statement is cut off at the end of
//! the token stream.

pub mod ast;
pub mod environment;
pub mod error;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod token;

pub use error::{Error, ParseError, Result};
pub use parser::BlockEnd;

use std::io::Write;

/// Tokenize, parse and execute `source`, writing printed values to `output`.
pub fn run_to<W: Write>(source: &str, block_end: BlockEnd, output: W) -> Result<W> {
    let tokens = lexer::tokenize(source);
    let program = parser::parse_tokens(tokens, block_end)?;
    let mut interpreter = interpreter::Interpreter::new(output);
    interpreter.execute(&program)?;
    Ok(interpreter.into_output())
}

/// Run `source` and collect everything it prints.
pub fn run(source: &str) -> Result<String> {
    let output = run_to(source, BlockEnd::default(), Vec::new())?;
    Ok(String::from_utf8_lossy(&output).into_owned())
}
