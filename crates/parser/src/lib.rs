//! Schema extraction for protobuf-like interface descriptions
//!
//! This crate turns schema source text into the declaration tree defined in
//! `protostub-common` (`ProtoFile` / `ScopedSection`).
//!
//! ## Parsing Strategy
//!
//! The extractor is line-oriented rather than a full tokenizer:
//! - Lines are normalized and comments dropped (`source`)
//! - Block extents are found by tallying braces (`scope`)
//! - `message`, `enum` and `service` headers dispatch to dedicated extractors;
//!   messages recurse (`extractor`)
//! - Every other meaningful line is a field (`field`)
//!
//! Services understand the compact `rpc Name(Request) returns (Response)` form
//! and HTTP mappings inside the rpc body:
//! - `get|post|put|patch|delete: "<path>"` → `Rpc::http_method`, `Rpc::endpoint`
//! - `body:` / `response_body:` → accepted, not modeled
//!
//! Grammar coverage is deliberately narrow: `oneof`, `map`, extensions and
//! nested options other than HTTP mappings are not understood.

mod cursor;
mod enums;
mod extractor;
mod field;
mod header;
mod parser;
mod scope;
mod service;
mod source;

pub use cursor::Cursor;
pub use enums::extract_enum;
pub use extractor::extract_scope;
pub use field::{header_field, parse_field};
pub use header::FileHeader;
pub use parser::ProtoParser;
pub use scope::{block_extent, declaration_name};
pub use service::extract_service;
pub use source::{is_omittable, normalize, source_lines, SourceLine};

use protostub_common::{ProtoFile, Result, SchemaError};
use std::path::Path;

/// Result of the structural extractors
pub type SchemaResult<T> = std::result::Result<T, SchemaError>;

/// Parse schema source text
///
/// # Example
/// ```
/// let file = protostub_parser::parse_str(
///     "service Greeter {\n  rpc SayHello(HelloRequest) returns (HelloReply);\n}\n",
/// )
/// .unwrap();
///
/// let records = file.rpc_records();
/// assert_eq!(records[0].rpc_name, "SayHello");
/// ```
pub fn parse_str(source: &str) -> Result<ProtoFile> {
    ProtoParser::from_source(source).parse()
}

/// Read and parse a schema source file
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<ProtoFile> {
    ProtoParser::from_file(path)?.parse()
}
