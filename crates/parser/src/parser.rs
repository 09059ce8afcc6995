//! Schema source parser

use crate::extractor::extract_scope;
use crate::header::FileHeader;
use crate::source::source_lines;
use protostub_common::{GeneratorError, ProtoFile, Result, ScopedSection};
use std::fs;
use std::path::{Path, PathBuf};

/// Parser for protobuf-like schema sources
///
/// Holds the source text only; every call to [`ProtoParser::parse`] builds a
/// new, independent tree.
pub struct ProtoParser {
    /// Source text
    source: String,

    /// File the source was read from, if any
    path: Option<PathBuf>,
}

impl ProtoParser {
    /// Read a schema source file
    ///
    /// # Example
    /// ```rust,ignore
    /// let parser = ProtoParser::from_file("greeter.proto")?;
    /// let file = parser.parse()?;
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|e| {
            GeneratorError::Parse(format!(
                "Failed to read schema file {}: {}",
                path.display(),
                e
            ))
        })?;

        Ok(Self {
            source,
            path: Some(path.to_path_buf()),
        })
    }

    /// Parser over in-memory source text
    pub fn from_source(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            path: None,
        }
    }

    /// Extract the declaration tree and file-level statements
    pub fn parse(&self) -> Result<ProtoFile> {
        let lines = source_lines(&self.source);
        let header = FileHeader::scan(&lines);
        let root = extract_scope(&lines, ScopedSection::root())?;

        tracing::debug!(
            path = ?self.path,
            lines = lines.len(),
            declarations = root.declarations.len(),
            package = ?header.package,
            "parsed schema"
        );

        Ok(ProtoFile {
            package: header.package,
            syntax: header.syntax,
            imports: header.imports,
            root,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use protostub_common::SchemaError;

    #[test]
    fn test_parse_from_source() {
        let parser = ProtoParser::from_source("package demo;\nmessage A {\n  string x = 1;\n}\n");
        let file = parser.parse().unwrap();

        assert_eq!(file.package.as_deref(), Some("demo"));
        assert_eq!(file.root.messages().count(), 1);
        assert!(parser.path().is_none());
    }

    #[test]
    fn test_schema_error_is_wrapped() {
        let err = ProtoParser::from_source("service Empty {}\n")
            .parse()
            .unwrap_err();

        assert!(matches!(
            err,
            GeneratorError::Schema(SchemaError::EmptyService { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = ProtoParser::from_file("/nonexistent/schema.proto");
        assert!(matches!(result, Err(GeneratorError::Parse(_))));
    }
}
