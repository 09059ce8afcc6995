//! Enum blocks

use crate::cursor::Cursor;
use crate::scope::{block_extent, declaration_name};
use crate::SchemaResult;
use protostub_common::{ProtoEnum, SchemaError};

/// Extract the enum whose header is under `cursor`
///
/// Values are collected in declaration order without their numeric tags.
/// Returns the enum and the cursor positioned after its closing brace.
pub fn extract_enum(cursor: Cursor<'_>) -> SchemaResult<(ProtoEnum, Cursor<'_>)> {
    let window = cursor.rest();
    let Some(header) = window.first() else {
        return Ok((ProtoEnum::default(), cursor));
    };

    let name = declaration_name(header)?;
    let extent = block_extent(window)?;
    let mut values = Vec::new();

    for line in &window[1..extent] {
        if line.first_token().is_some_and(|t| t.starts_with('}')) {
            break;
        }
        if line.is_omittable() {
            continue;
        }

        let tokens: Vec<&str> = line
            .text
            .split(|c: char| c == '=' || c.is_whitespace())
            .filter(|t| !t.is_empty())
            .collect();

        if tokens.len() < 2 {
            return Err(SchemaError::MalformedEnumValue {
                line: line.number,
                text: line.text.clone(),
            });
        }

        values.push(tokens[0].to_string());
    }

    tracing::trace!(name = %name, values = values.len(), "extracted enum");

    Ok((ProtoEnum { name, values }, cursor.advance(extent)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::source_lines;

    #[test]
    fn test_values_keep_declaration_order() {
        let lines = source_lines("enum Letter {\n  C = 0;\n  A = 1;\n  B=2;\n}\nmessage X {}\n");
        let (proto_enum, next) = extract_enum(Cursor::new(&lines)).unwrap();

        assert_eq!(proto_enum.name, "Letter");
        assert_eq!(proto_enum.values, vec!["C", "A", "B"]);
        assert_eq!(next.position(), 5);
        assert_eq!(next.peek().unwrap().text, "message X {}");
    }

    #[test]
    fn test_value_without_tag() {
        let lines = source_lines("enum Bad {\n  OK = 0;\n  FOO;\n}\n");
        let err = extract_enum(Cursor::new(&lines)).unwrap_err();

        assert_eq!(
            err,
            SchemaError::MalformedEnumValue {
                line: 3,
                text: "FOO;".to_string()
            }
        );
    }

    #[test]
    fn test_options_are_skipped() {
        let lines = source_lines(
            "enum Alias {\n  option allow_alias = true;\n  UNKNOWN = 0;\n  STARTED = 1;\n  RUNNING = 1;\n}\n",
        );
        let (proto_enum, _) = extract_enum(Cursor::new(&lines)).unwrap();
        assert_eq!(proto_enum.values, vec!["UNKNOWN", "STARTED", "RUNNING"]);
    }

    #[test]
    fn test_value_options_are_ignored() {
        let lines = source_lines("enum E {\n  OLD = 0 [deprecated = true];\n}\n");
        let (proto_enum, _) = extract_enum(Cursor::new(&lines)).unwrap();
        assert_eq!(proto_enum.values, vec!["OLD"]);
    }

    #[test]
    fn test_empty_enum() {
        let lines = source_lines("enum Nothing {}\n");
        let (proto_enum, next) = extract_enum(Cursor::new(&lines)).unwrap();

        assert!(proto_enum.values.is_empty());
        assert!(next.is_at_end());
    }

    #[test]
    fn test_header_without_name() {
        let lines = source_lines("enum {\n}\n");
        assert!(matches!(
            extract_enum(Cursor::new(&lines)),
            Err(SchemaError::MalformedDeclarationHeader { line: 1, .. })
        ));
    }
}
