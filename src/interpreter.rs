// Interpreter to execute the AST

use crate::ast::{Program, Statement};
use crate::environment::Environment;
use std::io::{self, Write};

/// Tree-walking interpreter. Printed values go to `output`, one per line.
pub struct Interpreter<W: Write> {
    environment: Environment,
    output: W,
}

impl Interpreter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Interpreter<W> {
    pub fn new(output: W) -> Self {
        Self {
            environment: Environment::new(),
            output,
        }
    }

    /// Run every top-level statement in order. The environment is kept, so a
    /// later call sees the bindings made by an earlier one.
    pub fn execute(&mut self, program: &Program) -> io::Result<()> {
        for statement in &program.statements {
            self.interpret(statement)?;
        }
        self.output.flush()
    }

    /// Only writing to the output can fail; lookups that miss fall back to a
    /// defined value.
    pub fn interpret(&mut self, statement: &Statement) -> io::Result<()> {
        match statement {
            Statement::Assignment { name, value } => {
                self.environment.set(name.as_str(), value.text());
            }
            Statement::If { condition, body } => {
                if self.environment.is_truthy(condition) {
                    for stmt in body {
                        self.interpret(stmt)?;
                    }
                }
            }
            Statement::Print { expression } => {
                let value = expression.resolve(&self.environment);
                writeln!(self.output, "{}", value)?;
            }
        }
        Ok(())
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn into_output(self) -> W {
        self.output
    }
}
