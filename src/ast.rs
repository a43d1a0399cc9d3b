// Abstract Syntax Tree definitions

use crate::environment::Environment;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Program {
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Assignment {
        name: String,
        value: Scalar,
    },
    If {
        /// Name of the variable whose truthiness gates the body.
        condition: String,
        body: Vec<Statement>,
    },
    Print {
        expression: Scalar,
    },
}

/// The raw text of a single token used as a value.
///
/// There are no expressions: a scalar is either a literal or a variable name,
/// and which one it is only gets decided when it is resolved against an
/// environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scalar(String);

impl Scalar {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn text(&self) -> &str {
        &self.0
    }

    /// The bound value if the text names a variable, otherwise the text itself.
    pub fn resolve<'a>(&'a self, env: &'a Environment) -> &'a str {
        env.get(&self.0).unwrap_or(&self.0)
    }
}
