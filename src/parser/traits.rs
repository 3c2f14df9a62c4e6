//! Parser trait definition

use crate::parser::types::PackageSpec;

/// Trait for parsing dependency manifests
pub trait Parser {
    /// Parse the content and extract pinned packages
    fn parse(&self, content: &str) -> Result<Vec<PackageSpec>, ParseError>;
}

/// Error type for parsing operations
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Invalid syntax in the file
    #[error("Invalid syntax on line {line}: {message}")]
    InvalidSyntax { line: usize, message: String },
}
