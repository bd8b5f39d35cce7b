use std::fmt::Debug;

use thiserror::Error;

/// An IR node that a backend pass has no translation for
#[derive(Error, Clone, Debug, PartialEq, Eq)]
#[error("{message}: {node}")]
pub struct CodeGenError {
    message: String,
    node: String,
}

impl CodeGenError {
    pub fn new<S: Into<String>>(message: S, node: &impl Debug) -> Self {
        Self {
            message: message.into(),
            node: format!("{:?}", node),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The offending node, rendered with `Debug`
    pub fn node(&self) -> &str {
        &self.node
    }
}

pub type CodeGenResult<T> = Result<T, CodeGenError>;
