//! Common types and utilities for protostub
//!
//! This crate contains the extracted schema model, the error taxonomy and the
//! YAML configuration shared by the parser, generator, and CLI components.

pub mod config;
pub mod schema;

pub use config::StubConfig;
pub use schema::{
    Declaration, DeclarationKind, HttpMethod, Message, MessageField, ProtoEnum, ProtoFile, Rpc,
    RpcRecord, ScopedSection, SectionType, Service,
};

use thiserror::Error;

/// Structural errors raised while extracting a schema from source text.
///
/// Every variant is terminal: the extractor aborts on the first one and no
/// partial tree is returned. Line numbers are 1-based and refer to the
/// original source.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("line {line}: declaration header is missing a name: '{text}'")]
    MalformedDeclarationHeader { line: usize, text: String },

    #[error("line {line}: invalid field declaration: '{text}'")]
    MalformedField { line: usize, text: String },

    #[error("line {line}: enum value is missing its tag: '{text}'")]
    MalformedEnumValue { line: usize, text: String },

    #[error("line {line}: service '{name}' has no body")]
    EmptyService { line: usize, name: String },

    #[error("line {line}: unexpected token outside of an rpc definition: '{text}'")]
    UnexpectedToken { line: usize, text: String },

    #[error("line {line}: invalid rpc declaration, expected 'rpc Name(Request) returns (Response)': '{text}'")]
    MalformedRpc { line: usize, text: String },

    #[error("line {line}: block opened by '{text}' is never closed")]
    UnterminatedBlock { line: usize, text: String },
}

impl SchemaError {
    /// Source line the error points at
    pub fn line(&self) -> usize {
        match self {
            SchemaError::MalformedDeclarationHeader { line, .. }
            | SchemaError::MalformedField { line, .. }
            | SchemaError::MalformedEnumValue { line, .. }
            | SchemaError::EmptyService { line, .. }
            | SchemaError::UnexpectedToken { line, .. }
            | SchemaError::MalformedRpc { line, .. }
            | SchemaError::UnterminatedBlock { line, .. } => *line,
        }
    }
}

/// Errors that can occur while parsing a schema or generating a stub
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for protostub operations
pub type Result<T> = std::result::Result<T, GeneratorError>;
