// Parser: token stream to statements

use crate::ast::{Program, Scalar, Statement};
use crate::error::ParseError;
use crate::token::{Token, TokenKind};

/// Deepest `if` nesting accepted. Parsing, execution and dropping the tree all
/// recurse once per level.
pub const MAX_NESTING: usize = 256;

/// Where the body of an `if` stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockEnd {
    /// At end of input, or at a `}` operator. The `}` itself is left for the
    /// enclosing block to skip.
    #[default]
    Brace,
    /// Always at end of input.
    EndOfInput,
}

pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
    block_end: BlockEnd,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            position: 0,
            block_end: BlockEnd::default(),
        }
    }

    pub fn with_block_end(mut self, block_end: BlockEnd) -> Self {
        self.block_end = block_end;
        self
    }

    pub fn parse(mut self) -> Result<Program, ParseError> {
        let statements = self.parse_block(0)?;
        Ok(Program { statements })
    }

    /// Statements need no separator: after each position, recognised or not,
    /// the cursor moves on by exactly one token.
    fn parse_block(&mut self, depth: usize) -> Result<Vec<Statement>, ParseError> {
        let mut statements = Vec::new();

        while let Some(token) = self.current() {
            if depth > 0 && self.block_end == BlockEnd::Brace && token.is_operator("}") {
                break;
            }
            if let Some(stmt) = self.parse_statement(depth)? {
                statements.push(stmt);
            }
            self.advance();
        }

        Ok(statements)
    }

    fn parse_statement(&mut self, depth: usize) -> Result<Option<Statement>, ParseError> {
        let Some(token) = self.current() else {
            return Ok(None);
        };

        if token.kind == TokenKind::Identifier
            && self.peek().is_some_and(|next| next.text == "=")
        {
            return self.parse_assignment().map(Some);
        }
        if token.is_keyword("if") {
            return self.parse_if(depth).map(Some);
        }
        if token.kind == TokenKind::Identifier && token.text == "print" {
            return self.parse_print().map(Some);
        }
        Ok(None)
    }

    // name = value
    fn parse_assignment(&mut self) -> Result<Statement, ParseError> {
        self.require("assignment", 3)?;
        let name = self.text_at(0);
        let value = Scalar::new(self.text_at(2));
        // Leave the cursor on the value; the block loop steps past it.
        self.position += 2;
        Ok(Statement::Assignment { name, value })
    }

    // if ( condition ) : body...
    fn parse_if(&mut self, depth: usize) -> Result<Statement, ParseError> {
        self.require("if", 5)?;
        if depth >= MAX_NESTING {
            return Err(ParseError::NestingTooDeep {
                line: self.current().map_or(0, |token| token.line),
                limit: MAX_NESTING,
            });
        }
        let condition = self.text_at(2);
        self.position += 5;
        let body = self.parse_block(depth + 1)?;
        Ok(Statement::If { condition, body })
    }

    // print ( expression )
    fn parse_print(&mut self) -> Result<Statement, ParseError> {
        self.require("print", 3)?;
        let expression = Scalar::new(self.text_at(2));
        self.position += 3;
        Ok(Statement::Print { expression })
    }

    /// Fail unless `count` tokens, starting at the cursor, are available.
    fn require(&self, statement: &'static str, count: usize) -> Result<(), ParseError> {
        let found = self.tokens.len().saturating_sub(self.position);
        if found >= count {
            return Ok(());
        }
        let line = self.current().map_or(0, |token| token.line);
        Err(ParseError::TruncatedStatement {
            statement,
            line,
            expected: count,
            found,
        })
    }

    fn text_at(&self, offset: usize) -> String {
        self.tokens[self.position + offset].text.clone()
    }

    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position + 1)
    }

    fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }
}

pub fn parse_tokens(tokens: Vec<Token>, block_end: BlockEnd) -> Result<Program, ParseError> {
    Parser::new(tokens).with_block_end(block_end).parse()
}
